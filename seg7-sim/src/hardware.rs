//! TOML board description
//!
//! Stands in for the device tree node the driver binds to. Example:
//!
//! ```toml
//! compatible = "7_segment"
//! lines = 32
//!
//! [driver]
//! max_displays = 4
//!
//! [[display]]
//! name = "left"
//! pins = [0, 1, 2, 3, 4, 5, 6]
//! ```
//!
//! Every key of a `[[display]]` table other than `name` is a property the
//! driver can read.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use seg7_core::config::ConfigError;
use seg7_core::DriverConfig;
use seg7_hal::{ChildDescriptor, DescriptionNode, PropertyError};
use serde::Deserialize;
use thiserror::Error;

use crate::board::MAX_LINES;

/// Default number of GPIO lines on a simulated board
pub const DEFAULT_LINE_COUNT: u32 = 64;

/// Error type for board description loading
#[derive(Debug, Error)]
pub enum HardwareError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("invalid driver section: {0}")]
    Driver(ConfigError),
    #[error("board has {lines} lines, at most {max} are supported")]
    TooManyLines { lines: u32, max: usize },
}

/// Root node of a board description
#[derive(Debug, Clone, Deserialize)]
pub struct HardwareDescription {
    /// Compatible string matched against registered drivers
    pub compatible: String,
    /// Number of GPIO lines the board exposes, numbered from 0
    #[serde(default = "default_line_count")]
    pub lines: u32,
    /// Driver settings
    #[serde(default)]
    pub driver: DriverConfig,
    /// One child per display, in description order
    #[serde(default, rename = "display")]
    pub displays: Vec<DisplayNode>,
}

fn default_line_count() -> u32 {
    DEFAULT_LINE_COUNT
}

/// One `[[display]]` table
#[derive(Debug, Clone, Deserialize)]
pub struct DisplayNode {
    pub name: String,
    #[serde(flatten)]
    pub properties: BTreeMap<String, toml::Value>,
}

impl HardwareDescription {
    /// Load and validate a description file
    pub fn load(path: &Path) -> Result<Self, HardwareError> {
        let text = fs::read_to_string(path)?;
        Self::parse(&text)
    }

    /// Parse and validate a description
    pub fn parse(text: &str) -> Result<Self, HardwareError> {
        let description: Self = toml::from_str(text)?;
        description
            .driver
            .validate()
            .map_err(HardwareError::Driver)?;
        if description.lines as usize > MAX_LINES {
            return Err(HardwareError::TooManyLines {
                lines: description.lines,
                max: MAX_LINES,
            });
        }
        Ok(description)
    }
}

impl DescriptionNode for HardwareDescription {
    type Child = DisplayNode;

    fn children(&self) -> impl Iterator<Item = &Self::Child> + '_ {
        self.displays.iter()
    }
}

impl ChildDescriptor for DisplayNode {
    fn name(&self) -> &str {
        &self.name
    }

    fn read_u8_array(&self, property: &str, out: &mut [u8]) -> Result<(), PropertyError> {
        let value = self.properties.get(property).ok_or(PropertyError::Missing)?;
        let array = value.as_array().ok_or(PropertyError::Unreadable)?;
        if array.len() != out.len() {
            return Err(PropertyError::WrongLength {
                expected: out.len(),
                found: array.len(),
            });
        }

        for (slot, element) in out.iter_mut().zip(array) {
            *slot = element
                .as_integer()
                .and_then(|v| u8::try_from(v).ok())
                .ok_or(PropertyError::Unreadable)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BOARD: &str = r#"
        compatible = "7_segment"

        [[display]]
        name = "left"
        pins = [0, 1, 2, 3, 4, 5, 6]

        [[display]]
        name = "right"
        pins = [13, 12, 11, 10, 9, 8, 7]
        color = "red"
    "#;

    #[test]
    fn test_parse_board() {
        let board = HardwareDescription::parse(BOARD).unwrap();
        assert_eq!(board.compatible, "7_segment");
        assert_eq!(board.lines, DEFAULT_LINE_COUNT);
        assert_eq!(board.driver, DriverConfig::default());

        let names: Vec<_> = board.children().map(|c| c.name()).collect();
        assert_eq!(names, ["left", "right"]);

        let mut pins = [0u8; 7];
        board.displays[1].read_u8_array("pins", &mut pins).unwrap();
        assert_eq!(pins, [13, 12, 11, 10, 9, 8, 7]);
    }

    #[test]
    fn test_property_errors() {
        let board = HardwareDescription::parse(BOARD).unwrap();
        let right = &board.displays[1];
        let mut pins = [0u8; 7];

        assert_eq!(
            right.read_u8_array("segment-gpios", &mut pins),
            Err(PropertyError::Missing)
        );
        assert_eq!(
            right.read_u8_array("color", &mut pins),
            Err(PropertyError::Unreadable)
        );

        let mut short = [0u8; 3];
        assert_eq!(
            right.read_u8_array("pins", &mut short),
            Err(PropertyError::WrongLength {
                expected: 3,
                found: 7
            })
        );
    }

    #[test]
    fn test_out_of_range_pin() {
        let board = HardwareDescription::parse(
            r#"
            compatible = "7_segment"
            [[display]]
            name = "wide"
            pins = [0, 1, 2, 3, 4, 5, 256]
            "#,
        )
        .unwrap();
        let mut pins = [0u8; 7];
        assert_eq!(
            board.displays[0].read_u8_array("pins", &mut pins),
            Err(PropertyError::Unreadable)
        );
    }

    #[test]
    fn test_driver_section() {
        let board = HardwareDescription::parse(
            r#"
            compatible = "7_segment"
            lines = 16

            [driver]
            pins_property = "segment-gpios"
            label_prefix = "seg"
            max_displays = 2
            "#,
        )
        .unwrap();
        assert_eq!(board.lines, 16);
        assert_eq!(board.driver.pins_property.as_str(), "segment-gpios");
        assert_eq!(board.driver.label_prefix.as_str(), "seg");
        assert_eq!(board.driver.max_displays, Some(2));
        assert!(board.displays.is_empty());
    }

    #[test]
    fn test_invalid_driver_section() {
        let err = HardwareDescription::parse(
            r#"
            compatible = "7_segment"
            [driver]
            max_displays = 0
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, HardwareError::Driver(ConfigError::ZeroDisplayLimit)));
    }

    #[test]
    fn test_too_many_lines() {
        assert!(matches!(
            HardwareDescription::parse("compatible = \"7_segment\"\nlines = 1000\n"),
            Err(HardwareError::TooManyLines { lines: 1000, .. })
        ));
    }

    #[test]
    fn test_missing_compatible() {
        assert!(matches!(
            HardwareDescription::parse("[[display]]\nname = \"x\"\n"),
            Err(HardwareError::Toml(_))
        ));
    }
}
