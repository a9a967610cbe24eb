//! Driver configuration
//!
//! Identity constants the host registers the driver under, and the runtime
//! settings provisioning reads from the hardware description.

use core::fmt;

use heapless::String;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Number of GPIO lines wired to every display
pub const LINES_PER_DISPLAY: usize = 7;

/// Child property holding a display's line ids
pub const PINS_PROPERTY: &str = "pins";

/// Prefix of every line label; the segment letter is appended
pub const LABEL_PREFIX: &str = "pin";

/// Name the platform driver registers under
pub const DRIVER_NAME: &str = "7segment-display";

/// Compatible string of the description node this driver binds to
pub const COMPATIBLE: &str = "7_segment";

/// Name of the device file node
pub const DEVICE_FILE_NAME: &str = "seg7_display";

/// Name of the device class the file node is created in
pub const CLASS_NAME: &str = "seg7";

/// Maximum length of a line label, prefix and segment letter included
pub const MAX_LABEL_LEN: usize = 16;

/// Maximum length of a property name
pub const MAX_PROPERTY_LEN: usize = 32;

/// Configuration errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Property name longer than [`MAX_PROPERTY_LEN`]
    PropertyNameTooLong,
    /// Label prefix leaves no room for the segment letter
    LabelPrefixTooLong,
    /// A display limit of zero can never be provisioned
    ZeroDisplayLimit,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::PropertyNameTooLong => {
                write!(f, "property name longer than {} bytes", MAX_PROPERTY_LEN)
            }
            ConfigError::LabelPrefixTooLong => {
                write!(f, "label prefix longer than {} bytes", MAX_LABEL_LEN - 1)
            }
            ConfigError::ZeroDisplayLimit => f.write_str("display limit must be at least 1"),
        }
    }
}

/// Runtime driver configuration
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DriverConfig {
    /// Child property read for each display's line ids
    pub pins_property: String<MAX_PROPERTY_LEN>,
    /// Label prefix for reserved lines
    pub label_prefix: String<MAX_LABEL_LEN>,
    /// Upper bound on registry growth (None = unbounded)
    pub max_displays: Option<usize>,
}

impl Default for DriverConfig {
    fn default() -> Self {
        let mut pins_property = String::new();
        let _ = pins_property.push_str(PINS_PROPERTY);
        let mut label_prefix = String::new();
        let _ = label_prefix.push_str(LABEL_PREFIX);

        Self {
            pins_property,
            label_prefix,
            max_displays: None,
        }
    }
}

impl DriverConfig {
    /// Create a configuration with custom property and label names
    pub fn new(pins_property: &str, label_prefix: &str) -> Result<Self, ConfigError> {
        let mut config = Self {
            pins_property: String::new(),
            label_prefix: String::new(),
            max_displays: None,
        };
        config
            .pins_property
            .push_str(pins_property)
            .map_err(|_| ConfigError::PropertyNameTooLong)?;
        if label_prefix.len() >= MAX_LABEL_LEN {
            return Err(ConfigError::LabelPrefixTooLong);
        }
        config
            .label_prefix
            .push_str(label_prefix)
            .map_err(|_| ConfigError::LabelPrefixTooLong)?;
        Ok(config)
    }

    /// Bound the number of displays the registry may grow to
    pub fn with_max_displays(mut self, max: usize) -> Result<Self, ConfigError> {
        if max == 0 {
            return Err(ConfigError::ZeroDisplayLimit);
        }
        self.max_displays = Some(max);
        Ok(self)
    }

    /// Check limits that deserialization cannot enforce
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.label_prefix.len() >= MAX_LABEL_LEN {
            return Err(ConfigError::LabelPrefixTooLong);
        }
        if self.max_displays == Some(0) {
            return Err(ConfigError::ZeroDisplayLimit);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = DriverConfig::default();
        assert_eq!(config.pins_property.as_str(), "pins");
        assert_eq!(config.label_prefix.as_str(), "pin");
        assert_eq!(config.max_displays, None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_custom_config() {
        let config = DriverConfig::new("segment-gpios", "seg").unwrap();
        assert_eq!(config.pins_property.as_str(), "segment-gpios");
        assert_eq!(config.label_prefix.as_str(), "seg");
    }

    #[test]
    fn test_label_prefix_needs_room_for_letter() {
        let prefix = "abcdefghijklmnop"; // exactly MAX_LABEL_LEN
        assert_eq!(
            DriverConfig::new("pins", prefix),
            Err(ConfigError::LabelPrefixTooLong)
        );
        assert!(DriverConfig::new("pins", &prefix[..MAX_LABEL_LEN - 1]).is_ok());
    }

    #[test]
    fn test_property_name_too_long() {
        let name = "p".repeat(MAX_PROPERTY_LEN + 1);
        assert_eq!(
            DriverConfig::new(&name, "pin"),
            Err(ConfigError::PropertyNameTooLong)
        );
    }

    #[test]
    fn test_display_limit() {
        let config = DriverConfig::default().with_max_displays(4).unwrap();
        assert_eq!(config.max_displays, Some(4));
        assert_eq!(
            DriverConfig::default().with_max_displays(0),
            Err(ConfigError::ZeroDisplayLimit)
        );
    }
}
