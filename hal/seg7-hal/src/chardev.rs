//! Character device file callbacks
//!
//! The host creates the device file node and dispatches these callbacks
//! with raw user buffers. Calls are serialized by the host.

/// File operations of a character device
pub trait FileOperations {
    /// Error type for a failed callback
    type Error;

    /// Called when the device file is opened
    fn open(&mut self) -> Result<(), Self::Error>;

    /// Called for each write to the device file
    ///
    /// # Arguments
    /// * `buf` - Bytes supplied by the writer
    /// * `offset` - File position of this write
    ///
    /// Returns the number of bytes consumed. Implementations advance
    /// `offset` by that count; the offset is never used to decode `buf`.
    fn write(&mut self, buf: &[u8], offset: &mut u64) -> Result<usize, Self::Error>;

    /// Called when the last handle to the device file is closed
    fn release(&mut self) -> Result<(), Self::Error>;
}
