//! Board-agnostic core of the seg7 display driver
//!
//! This crate contains all driver logic that does not depend on a specific
//! host or GPIO controller:
//!
//! - Seven-segment digit encoding
//! - All-or-nothing reservation of a display's lines
//! - Growable registry of provisioned displays
//! - Provisioning from a hardware description, with rollback
//! - Validation and application of device file writes
//! - Attach/detach lifecycle
//!
//! The host side is reached only through the traits in `seg7-hal`.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

extern crate alloc;

// This mod MUST go first, so that the others see its macros.
mod fmt;

pub mod command;
pub mod config;
pub mod font;
pub mod lifecycle;
pub mod lines;
pub mod provision;
pub mod registry;

#[cfg(test)]
mod testing;

pub use command::WriteError;
pub use config::{DriverConfig, LINES_PER_DISPLAY};
pub use font::{pattern_for, InvalidDigit, SegmentPattern};
pub use lifecycle::{AttachError, Seg7Driver, State};
pub use lines::{LineDescriptor, LineGroup, ReservationError};
pub use provision::{provision, ProvisionError};
pub use registry::{DisplayRegistry, IndexOutOfRange, TeardownReport};
