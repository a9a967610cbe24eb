//! seg7 host abstraction layer
//!
//! This crate defines the interfaces between the seg7 driver core and the
//! environment it runs in. None of these are implemented here: a kernel-like
//! host, a firmware board or a simulator provides them.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  Host (driver lifecycle, device file)   │
//! └─────────────────────────────────────────┘
//!          │ PlatformDriver  │ FileOperations
//!          ▼                 ▼
//! ┌─────────────────────────────────────────┐
//! │  seg7-core                              │
//! └─────────────────────────────────────────┘
//!          │ DescriptionNode │ LineDriver
//!          ▼                 ▼
//! ┌───────────────┐   ┌───────────────────┐
//! │ hardware tree │   │ GPIO line driver  │
//! └───────────────┘   └───────────────────┘
//! ```
//!
//! # Traits
//!
//! - [`gpio::LineDriver`] - Exclusive GPIO line reservation and output
//! - [`tree::DescriptionNode`], [`tree::ChildDescriptor`] - Hardware description
//! - [`driver::PlatformDriver`] - Attach/detach lifecycle callbacks
//! - [`chardev::FileOperations`] - Device file open/write/close callbacks

#![no_std]
#![deny(unsafe_code)]

pub mod chardev;
pub mod driver;
pub mod gpio;
pub mod tree;

// Re-export key traits at crate root for convenience
pub use chardev::FileOperations;
pub use driver::PlatformDriver;
pub use gpio::{LineDriver, LineId};
pub use tree::{ChildDescriptor, DescriptionNode, PropertyError};
