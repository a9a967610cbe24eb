//! Hardware description abstractions
//!
//! The driver is bound to one description node (a device tree node on a
//! kernel host, a config table on a simulator). Each child of that node
//! describes one display.

use core::fmt;

/// Errors reading a property from a child descriptor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PropertyError {
    /// The property does not exist on this node
    Missing,
    /// The property exists but holds a different number of elements
    WrongLength {
        /// Number of elements requested
        expected: usize,
        /// Number of elements present
        found: usize,
    },
    /// The property exists but its values are not unsigned bytes
    Unreadable,
}

impl fmt::Display for PropertyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyError::Missing => f.write_str("property missing"),
            PropertyError::WrongLength { expected, found } => {
                write!(f, "expected {} elements, found {}", expected, found)
            }
            PropertyError::Unreadable => f.write_str("property is not a byte array"),
        }
    }
}

/// One hardware sub-node
pub trait ChildDescriptor {
    /// Node name, for diagnostics
    fn name(&self) -> &str;

    /// Read a named array property of unsigned bytes
    ///
    /// The property must hold exactly `out.len()` elements. On success
    /// every element of `out` is overwritten; on error `out` is unspecified.
    fn read_u8_array(&self, property: &str, out: &mut [u8]) -> Result<(), PropertyError>;
}

/// A hardware description node the driver is attached to
pub trait DescriptionNode {
    /// Child descriptor type
    type Child: ChildDescriptor;

    /// Iterate over the direct children, in description order
    fn children(&self) -> impl Iterator<Item = &Self::Child> + '_;
}
