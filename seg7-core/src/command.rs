//! Device file writes
//!
//! Decodes a write buffer, checks it against the registry and drives the
//! selected display. Nothing reaches the hardware unless every check
//! passes, and a rejected write leaves every display as it was.

use core::fmt;

use seg7_hal::LineDriver;
use seg7_protocol::{DecodeError, WriteCommand, COMMAND_LEN};

use crate::font::{pattern_for, InvalidDigit};
use crate::registry::DisplayRegistry;

/// Errors rejecting a single write
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum WriteError<E> {
    /// Fewer than two bytes were written
    ShortWrite {
        /// Number of bytes supplied
        len: usize,
    },
    /// The value byte is not an ASCII digit
    InvalidValueByte(u8),
    /// The digit has no segment pattern
    InvalidDigit(u8),
    /// The display byte does not name a registered display
    UnknownDisplay {
        /// Decoded index, or None if the byte was not a digit
        display: Option<u8>,
        /// Number of displays registered
        count: usize,
    },
    /// The line driver failed while applying the pattern
    Line(E),
}

impl<E: fmt::Debug> fmt::Display for WriteError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WriteError::ShortWrite { len } => {
                write!(f, "short write: {} of {} bytes", len, COMMAND_LEN)
            }
            WriteError::InvalidValueByte(b) => write!(f, "invalid value byte 0x{:02x}", b),
            WriteError::InvalidDigit(d) => write!(f, "{} is not a decimal digit", d),
            WriteError::UnknownDisplay {
                display: Some(d),
                count,
            } => write!(f, "display {} does not exist ({} registered)", d, count),
            WriteError::UnknownDisplay {
                display: None,
                count,
            } => write!(f, "display byte is not a digit ({} registered)", count),
            WriteError::Line(e) => write!(f, "line driver error: {:?}", e),
        }
    }
}

impl<E> From<InvalidDigit> for WriteError<E> {
    fn from(e: InvalidDigit) -> Self {
        WriteError::InvalidDigit(e.0)
    }
}

impl<E> WriteError<E> {
    fn from_decode(e: DecodeError, count: usize) -> Self {
        match e {
            DecodeError::ShortWrite { len } => WriteError::ShortWrite { len },
            DecodeError::InvalidValueByte(b) => WriteError::InvalidValueByte(b),
            DecodeError::InvalidDisplayByte(_) => WriteError::UnknownDisplay {
                display: None,
                count,
            },
        }
    }
}

/// Handle one write buffer
///
/// Returns the number of bytes consumed, which is always [`COMMAND_LEN`]
/// regardless of how many bytes were supplied.
pub fn execute<D: LineDriver, const N: usize>(
    registry: &DisplayRegistry<N>,
    driver: &mut D,
    buf: &[u8],
) -> Result<usize, WriteError<D::Error>> {
    let command =
        WriteCommand::decode(buf).map_err(|e| WriteError::from_decode(e, registry.count()))?;
    apply(registry, driver, command)?;
    Ok(COMMAND_LEN)
}

/// Show a decoded command on its display
pub fn apply<D: LineDriver, const N: usize>(
    registry: &DisplayRegistry<N>,
    driver: &mut D,
    command: WriteCommand,
) -> Result<(), WriteError<D::Error>> {
    let group = registry
        .get(usize::from(command.display()))
        .map_err(|e| WriteError::UnknownDisplay {
            display: Some(command.display()),
            count: e.count,
        })?;
    let pattern = pattern_for(command.digit())?;

    group
        .set_pattern(driver, pattern)
        .map_err(WriteError::Line)?;
    debug!(
        "display {} shows {} (segments {})",
        command.display(),
        command.digit(),
        pattern.bits()
    );
    Ok(())
}
