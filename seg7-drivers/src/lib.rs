//! GPIO line driver implementations
//!
//! This crate provides concrete implementations of the line driver trait
//! defined in seg7-hal:
//!
//! - Pin bank over `embedded-hal` output pins, for boards and simulators

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod pin_bank;

pub use pin_bank::{LineError, PinBank};
