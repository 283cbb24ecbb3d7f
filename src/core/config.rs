//! Flight limits and detection parameters
//!
//! The defaults mirror the envelope of a Tello-class drone. All values are
//! collected here so a properties file can override them in one place.

use crate::core::error::{Result, SimError};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Physical limits applied by the flight controller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlightConfig {
    /// Smallest accepted horizontal movement (cm)
    ///
    /// The real aircraft cannot execute translations shorter than this;
    /// smaller amounts are rejected, not clamped.
    pub min_move: f64,

    /// Largest accepted horizontal movement (cm)
    pub max_move: f64,

    /// Smallest accepted rotation (degrees)
    pub min_rotation: f64,

    /// Largest accepted rotation (degrees)
    pub max_rotation: f64,

    /// Hover altitude reached by `take_off` (cm)
    pub takeoff_altitude: f64,

    /// Safety floor for `go_down` (cm)
    ///
    /// Descents that would end at or below this altitude stop here instead.
    pub min_sec_altitude: f64,

    /// Radius within which a target counts as detected (cm, 3D distance)
    pub radius_detection: f64,
}

impl Default for FlightConfig {
    fn default() -> Self {
        Self {
            min_move: 20.0,
            max_move: 500.0,
            min_rotation: 1.0,
            max_rotation: 360.0,
            takeoff_altitude: 80.0,
            min_sec_altitude: 10.0,
            radius_detection: 50.0,
        }
    }
}

impl FlightConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate the configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        if self.min_move <= 0.0 || self.min_rotation <= 0.0 {
            return Err(SimError::InvalidConfig(
                "minimum movement and rotation must be positive".into(),
            ));
        }
        if self.min_move > self.max_move {
            return Err(SimError::InvalidConfig(format!(
                "min_move ({}) must be <= max_move ({})",
                self.min_move, self.max_move
            )));
        }
        if self.min_rotation > self.max_rotation {
            return Err(SimError::InvalidConfig(format!(
                "min_rotation ({}) must be <= max_rotation ({})",
                self.min_rotation, self.max_rotation
            )));
        }
        if self.min_sec_altitude < 0.0 {
            return Err(SimError::InvalidConfig(
                "min_sec_altitude must be >= 0".into(),
            ));
        }
        if self.takeoff_altitude <= self.min_sec_altitude {
            return Err(SimError::InvalidConfig(format!(
                "takeoff_altitude ({}) must be > min_sec_altitude ({})",
                self.takeoff_altitude, self.min_sec_altitude
            )));
        }
        if self.radius_detection <= 0.0 {
            return Err(SimError::InvalidConfig(
                "radius_detection must be positive".into(),
            ));
        }
        Ok(())
    }

    /// Parse a TOML properties document; absent keys keep their defaults
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: FlightConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load flight parameters from a TOML properties file
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(FlightConfig::default().validate().is_ok());
    }

    #[test]
    fn test_reversed_move_range_rejected() {
        let config = FlightConfig {
            min_move: 600.0,
            ..FlightConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(SimError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_takeoff_below_safety_floor_rejected() {
        let config = FlightConfig {
            takeoff_altitude: 5.0,
            ..FlightConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_toml_overrides_some_keys() {
        let config = FlightConfig::from_toml_str(
            "max_move = 300.0\ntakeoff_altitude = 100.0\n",
        )
        .unwrap();
        assert_eq!(config.max_move, 300.0);
        assert_eq!(config.takeoff_altitude, 100.0);
        // untouched keys keep their defaults
        assert_eq!(config.min_move, 20.0);
        assert_eq!(config.radius_detection, 50.0);
    }

    #[test]
    fn test_toml_with_inconsistent_values_fails_validation() {
        let err = FlightConfig::from_toml_str("max_move = 10.0\n").unwrap_err();
        assert!(matches!(err, SimError::InvalidConfig(_)));
    }

    #[test]
    fn test_malformed_toml_reports_parse_error() {
        let err = FlightConfig::from_toml_str("max_move = ").unwrap_err();
        assert!(matches!(err, SimError::ConfigParse(_)));
    }
}
