//! Write command decoding and encoding.
//!
//! Command format:
//! - DISPLAY (1 byte): ASCII digit selecting the display index
//! - DIGIT (1 byte): ASCII digit to show on that display
//!
//! Decoding checks the digit byte before the display byte, so a buffer
//! that is wrong in both places reports the bad value first.

use core::fmt;

/// Number of bytes a command occupies
pub const COMMAND_LEN: usize = 2;

/// Offset of the display index character
const DISPLAY_INDEX: usize = 0;

/// Offset of the value character
const DIGIT_INDEX: usize = 1;

/// Errors that can occur while decoding a write buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DecodeError {
    /// Fewer than [`COMMAND_LEN`] bytes were written
    ShortWrite {
        /// Number of bytes supplied
        len: usize,
    },
    /// The value byte is not an ASCII digit
    InvalidValueByte(u8),
    /// The display byte is not an ASCII digit
    InvalidDisplayByte(u8),
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodeError::ShortWrite { len } => {
                write!(f, "short write: {} of {} bytes", len, COMMAND_LEN)
            }
            DecodeError::InvalidValueByte(b) => write!(f, "invalid value byte 0x{:02x}", b),
            DecodeError::InvalidDisplayByte(b) => write!(f, "invalid display byte 0x{:02x}", b),
        }
    }
}

/// A decoded write: show `digit` on display `display`
///
/// Both fields are always in 0-9.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct WriteCommand {
    display: u8,
    digit: u8,
}

impl WriteCommand {
    /// Create a command, if both fields fit in a single ASCII digit
    pub fn new(display: u8, digit: u8) -> Option<Self> {
        if display > 9 || digit > 9 {
            return None;
        }
        Some(Self { display, digit })
    }

    /// Display index (0-9)
    pub const fn display(&self) -> u8 {
        self.display
    }

    /// Digit to show (0-9)
    pub const fn digit(&self) -> u8 {
        self.digit
    }

    /// Decode a command from the start of a write buffer
    ///
    /// Bytes past [`COMMAND_LEN`] are ignored.
    pub fn decode(buf: &[u8]) -> Result<Self, DecodeError> {
        if buf.len() < COMMAND_LEN {
            return Err(DecodeError::ShortWrite { len: buf.len() });
        }

        let digit = ascii_digit(buf[DIGIT_INDEX])
            .ok_or(DecodeError::InvalidValueByte(buf[DIGIT_INDEX]))?;
        let display = ascii_digit(buf[DISPLAY_INDEX])
            .ok_or(DecodeError::InvalidDisplayByte(buf[DISPLAY_INDEX]))?;

        Ok(Self { display, digit })
    }

    /// Encode this command as it would be written to the device file
    pub fn encode(&self) -> [u8; COMMAND_LEN] {
        [b'0' + self.display, b'0' + self.digit]
    }
}

fn ascii_digit(byte: u8) -> Option<u8> {
    if byte.is_ascii_digit() {
        Some(byte - b'0')
    } else {
        None
    }
}
