//! Simulation parameters
//!
//! One immutable `SimConfig` is shared by every blob in a simulator.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Reasons a `SimConfig` is rejected
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("{field} must be positive, got {value}")]
    NonPositive { field: &'static str, value: f32 },

    #[error("friction must be within [0, 1], got {value}")]
    FrictionOutOfRange { value: f32 },

    #[error("{field} must be finite")]
    NotFinite { field: &'static str },
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Parameter bundle for blob motion
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimConfig {
    /// Upper bound on blob speed (normalized units per time unit)
    pub max_speed: f32,
    /// Strength of the inverse-square pull toward the target
    pub gravity_constant: f32,
    /// Below this (detuned) distance the force is softened
    pub min_distance: f32,
    /// Momentum retention per step, in [0, 1]
    pub friction: f32,
    /// Integration step applied to velocity each update
    pub time_step: f32,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            max_speed: 2e-2,
            gravity_constant: 2e-4,
            min_distance: 5e-3,
            friction: 1e-2,
            time_step: 0.5,
        }
    }
}

impl SimConfig {
    /// Build and validate a config
    pub fn new(
        max_speed: f32,
        gravity_constant: f32,
        min_distance: f32,
        friction: f32,
        time_step: f32,
    ) -> ConfigResult<Self> {
        let config = Self {
            max_speed,
            gravity_constant,
            min_distance,
            friction,
            time_step,
        };
        config.validate()?;
        Ok(config)
    }

    /// Check every field; deserialized configs must pass this before use
    pub fn validate(&self) -> ConfigResult<()> {
        let positive = [
            ("max_speed", self.max_speed),
            ("gravity_constant", self.gravity_constant),
            ("min_distance", self.min_distance),
            ("time_step", self.time_step),
        ];
        for (field, value) in positive {
            if !value.is_finite() {
                return Err(ConfigError::NotFinite { field });
            }
            if value <= 0.0 {
                return Err(ConfigError::NonPositive { field, value });
            }
        }

        if !self.friction.is_finite() {
            return Err(ConfigError::NotFinite { field: "friction" });
        }
        if !(0.0..=1.0).contains(&self.friction) {
            return Err(ConfigError::FrictionOutOfRange {
                value: self.friction,
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(SimConfig::default().validate().is_ok());
    }

    #[test]
    fn test_rejects_non_positive() {
        let err = SimConfig::new(0.0, 2e-4, 5e-3, 0.5, 0.5).unwrap_err();
        assert_eq!(
            err,
            ConfigError::NonPositive {
                field: "max_speed",
                value: 0.0
            }
        );

        let err = SimConfig::new(0.02, 2e-4, 5e-3, 0.5, -1.0).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::NonPositive {
                field: "time_step",
                ..
            }
        ));
    }

    #[test]
    fn test_friction_bounds() {
        assert!(SimConfig::new(0.02, 2e-4, 5e-3, 0.0, 0.5).is_ok());
        assert!(SimConfig::new(0.02, 2e-4, 5e-3, 1.0, 0.5).is_ok());
        assert_eq!(
            SimConfig::new(0.02, 2e-4, 5e-3, 1.5, 0.5).unwrap_err(),
            ConfigError::FrictionOutOfRange { value: 1.5 }
        );
    }

    #[test]
    fn test_rejects_nan() {
        let err = SimConfig::new(0.02, f32::NAN, 5e-3, 0.5, 0.5).unwrap_err();
        assert_eq!(
            err,
            ConfigError::NotFinite {
                field: "gravity_constant"
            }
        );
        let err = SimConfig::new(0.02, 2e-4, 5e-3, f32::NAN, 0.5).unwrap_err();
        assert_eq!(err, ConfigError::NotFinite { field: "friction" });
    }

    #[test]
    fn test_deserialized_config_is_revalidated() {
        let json = r#"{"max_speed":0.02,"gravity_constant":0.0002,"min_distance":-1.0,"friction":0.5,"time_step":0.5}"#;
        let config: SimConfig = serde_json::from_str(json).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_error_message() {
        let err = ConfigError::FrictionOutOfRange { value: 2.0 };
        assert_eq!(err.to_string(), "friction must be within [0, 1], got 2");
    }
}
