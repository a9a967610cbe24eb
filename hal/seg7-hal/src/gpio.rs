//! GPIO line abstractions
//!
//! A line driver hands out exclusive control of numbered output lines.
//! Reservation of a whole display is built on top of these per-line calls
//! by the core, which is also responsible for unwinding partial requests.

/// Identifier of a single GPIO line as known to the line driver
pub type LineId = u32;

/// GPIO line driver
///
/// Implementations own the physical lines and arbitrate exclusive use.
/// A line must be requested before it can be driven, and freed exactly
/// once afterwards.
pub trait LineDriver {
    /// Error type for line operations
    type Error: core::fmt::Debug;

    /// Request exclusive control of a line and configure it as an output
    ///
    /// # Arguments
    /// * `line` - Line to reserve
    /// * `initial_high` - Level driven immediately after the request
    /// * `label` - Consumer label shown by the driver for this line
    ///
    /// Fails if the line does not exist or is already in use.
    fn request_line(&mut self, line: LineId, initial_high: bool, label: &str)
        -> Result<(), Self::Error>;

    /// Give a previously requested line back to the driver
    fn free_line(&mut self, line: LineId) -> Result<(), Self::Error>;

    /// Drive a requested line high or low
    fn set_line(&mut self, line: LineId, high: bool) -> Result<(), Self::Error>;
}

impl<T: LineDriver + ?Sized> LineDriver for &mut T {
    type Error = T::Error;

    fn request_line(
        &mut self,
        line: LineId,
        initial_high: bool,
        label: &str,
    ) -> Result<(), Self::Error> {
        T::request_line(self, line, initial_high, label)
    }

    fn free_line(&mut self, line: LineId) -> Result<(), Self::Error> {
        T::free_line(self, line)
    }

    fn set_line(&mut self, line: LineId, high: bool) -> Result<(), Self::Error> {
        T::set_line(self, line, high)
    }
}
