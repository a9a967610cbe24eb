//! seg7 device file write format
//!
//! A client drives a display by writing two ASCII characters to the
//! device file:
//! ```text
//! ┌─────────┬─────────┬─────────┐
//! │ DISPLAY │ DIGIT   │ ...     │
//! │ '0'-'9' │ '0'-'9' │ ignored │
//! └─────────┴─────────┴─────────┘
//! ```
//!
//! There is no framing, length prefix or terminator. Bytes after the
//! second one are never interpreted.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod command;

pub use command::{DecodeError, WriteCommand, COMMAND_LEN};
