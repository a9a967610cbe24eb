//! Pin bank line driver
//!
//! Exposes a fixed set of `embedded-hal` output pins as numbered GPIO lines.
//! Tracks which lines are requested, and by whom, so two displays can never
//! share a line.

use embedded_hal::digital::{Error as _, ErrorKind, OutputPin, PinState};
use heapless::{String, Vec};
use seg7_hal::{LineDriver, LineId};

/// Maximum stored length of a consumer label; longer labels are truncated
pub const MAX_OWNER_LEN: usize = 16;

/// Line driver errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LineError {
    /// No pin is registered under this line id
    UnknownLine(LineId),
    /// The line is already requested
    Busy(LineId),
    /// The line was not requested
    NotRequested(LineId),
    /// A pin is already registered under this line id
    DuplicateLine(LineId),
    /// The bank holds no more pins
    BankFull,
    /// The pin itself reported an error
    Pin {
        /// Line whose pin failed
        line: LineId,
        /// Error category from the pin
        kind: ErrorKind,
    },
}

struct Slot<P> {
    line: LineId,
    pin: P,
    owner: Option<String<MAX_OWNER_LEN>>,
    high: bool,
}

/// Up to `PINS` output pins addressed by line id
pub struct PinBank<P, const PINS: usize> {
    slots: Vec<Slot<P>, PINS>,
}

impl<P: OutputPin, const PINS: usize> Default for PinBank<P, PINS> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: OutputPin, const PINS: usize> PinBank<P, PINS> {
    /// Create an empty bank
    pub const fn new() -> Self {
        Self { slots: Vec::new() }
    }

    /// Register `pin` as line `line`
    ///
    /// The pin is not driven until the line is requested.
    pub fn add_pin(&mut self, line: LineId, pin: P) -> Result<(), LineError> {
        if self.slot(line).is_some() {
            return Err(LineError::DuplicateLine(line));
        }
        self.slots
            .push(Slot {
                line,
                pin,
                owner: None,
                high: false,
            })
            .map_err(|_| LineError::BankFull)
    }

    /// Check if a line is currently requested
    pub fn is_requested(&self, line: LineId) -> bool {
        self.slot(line).is_some_and(|s| s.owner.is_some())
    }

    /// Label of the consumer holding a line
    pub fn owner(&self, line: LineId) -> Option<&str> {
        self.slot(line)?.owner.as_deref()
    }

    /// Last level driven on a line
    pub fn level(&self, line: LineId) -> Option<bool> {
        self.slot(line).map(|s| s.high)
    }

    /// Number of requested lines
    pub fn requested_count(&self) -> usize {
        self.slots.iter().filter(|s| s.owner.is_some()).count()
    }

    /// Number of registered lines
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Check if no pin is registered
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    fn slot(&self, line: LineId) -> Option<&Slot<P>> {
        self.slots.iter().find(|s| s.line == line)
    }

    fn slot_mut(&mut self, line: LineId) -> Result<&mut Slot<P>, LineError> {
        self.slots
            .iter_mut()
            .find(|s| s.line == line)
            .ok_or(LineError::UnknownLine(line))
    }
}

impl<P> Slot<P>
where
    P: OutputPin,
{
    fn drive(&mut self, high: bool) -> Result<(), LineError> {
        self.pin
            .set_state(PinState::from(high))
            .map_err(|e| LineError::Pin {
                line: self.line,
                kind: e.kind(),
            })?;
        self.high = high;
        Ok(())
    }
}

impl<P: OutputPin, const PINS: usize> LineDriver for PinBank<P, PINS> {
    type Error = LineError;

    fn request_line(
        &mut self,
        line: LineId,
        initial_high: bool,
        label: &str,
    ) -> Result<(), Self::Error> {
        let slot = self.slot_mut(line)?;
        if slot.owner.is_some() {
            return Err(LineError::Busy(line));
        }

        slot.drive(initial_high)?;

        let mut owner = String::new();
        for c in label.chars() {
            if owner.push(c).is_err() {
                break;
            }
        }
        slot.owner = Some(owner);
        Ok(())
    }

    fn free_line(&mut self, line: LineId) -> Result<(), Self::Error> {
        let slot = self.slot_mut(line)?;
        if slot.owner.take().is_none() {
            return Err(LineError::NotRequested(line));
        }
        Ok(())
    }

    fn set_line(&mut self, line: LineId, high: bool) -> Result<(), Self::Error> {
        let slot = self.slot_mut(line)?;
        if slot.owner.is_none() {
            return Err(LineError::NotRequested(line));
        }
        slot.drive(high)
    }
}
