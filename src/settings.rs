//! Physics configuration
//!
//! Every rider carries its own immutable copy, so independent simulations
//! never share tuning. Loaded from JSON; missing keys fall back to defaults.

use std::fmt;
use std::path::Path;

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Axis-aligned playfield limits
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Bounds {
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
}

impl Default for Bounds {
    fn default() -> Self {
        Self {
            min_x: BOUNDS_MIN_X,
            max_x: BOUNDS_MAX_X,
            min_y: BOUNDS_MIN_Y,
            max_y: BOUNDS_MAX_Y,
        }
    }
}

impl Bounds {
    /// True when `pos` lies strictly outside the limits (edges are inside)
    pub fn is_outside(&self, pos: DVec2) -> bool {
        pos.y > self.max_y || pos.y < self.min_y || pos.x < self.min_x || pos.x > self.max_x
    }
}

/// Tuning for one rider
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Downward acceleration per tick² (screen coordinates, +y is down)
    pub gravity: f64,
    /// Velocity scale applied after resolving a contact
    pub friction: f64,
    /// Velocity scale applied each airborne tick
    pub air_resistance: f64,
    /// Extra normal kick when moving into a surface (0 = none)
    pub bounce: f64,
    pub max_speed: f64,
    /// Inward normal speed that counts as a crash
    pub crash_threshold: f64,
    /// Contact search radius
    pub contact_distance: f64,
    pub bounds: Bounds,
    /// Velocity given to a newly spawned rider
    pub launch_velocity: (f64, f64),
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: GRAVITY,
            friction: FRICTION,
            air_resistance: AIR_RESISTANCE,
            bounce: BOUNCE,
            max_speed: MAX_SPEED,
            crash_threshold: CRASH_THRESHOLD,
            contact_distance: CONTACT_DISTANCE,
            bounds: Bounds::default(),
            launch_velocity: (LAUNCH_VX, LAUNCH_VY),
        }
    }
}

/// Rejected configuration
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Json(serde_json::Error),
    /// A field is NaN or infinite
    NotFinite(&'static str),
    /// A field that must be >= 0 is negative
    Negative(&'static str),
    /// min >= max on some axis
    InvertedBounds,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "failed to read config: {e}"),
            ConfigError::Json(e) => write!(f, "malformed config: {e}"),
            ConfigError::NotFinite(field) => write!(f, "config field `{field}` must be finite"),
            ConfigError::Negative(field) => {
                write!(f, "config field `{field}` must not be negative")
            }
            ConfigError::InvertedBounds => write!(f, "config bounds have min >= max"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(e) => Some(e),
            ConfigError::Json(e) => Some(e),
            _ => None,
        }
    }
}

impl PhysicsConfig {
    /// Parse a (possibly partial) JSON document and validate it
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json).map_err(ConfigError::Json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(ConfigError::Io)?;
        let config = Self::from_json(&json)?;
        log::info!("Loaded physics config from {}", path.display());
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        serde_json::to_string_pretty(self).map_err(ConfigError::Json)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let fields = [
            ("gravity", self.gravity),
            ("friction", self.friction),
            ("air_resistance", self.air_resistance),
            ("bounce", self.bounce),
            ("max_speed", self.max_speed),
            ("crash_threshold", self.crash_threshold),
            ("contact_distance", self.contact_distance),
            ("bounds.min_x", self.bounds.min_x),
            ("bounds.max_x", self.bounds.max_x),
            ("bounds.min_y", self.bounds.min_y),
            ("bounds.max_y", self.bounds.max_y),
            ("launch_velocity.0", self.launch_velocity.0),
            ("launch_velocity.1", self.launch_velocity.1),
        ];
        if let Some((name, _)) = fields.iter().find(|(_, v)| !v.is_finite()) {
            return Err(ConfigError::NotFinite(*name));
        }

        let non_negative = [
            ("friction", self.friction),
            ("air_resistance", self.air_resistance),
            ("bounce", self.bounce),
            ("max_speed", self.max_speed),
            ("crash_threshold", self.crash_threshold),
            ("contact_distance", self.contact_distance),
        ];
        if let Some((name, _)) = non_negative.iter().find(|(_, v)| *v < 0.0) {
            return Err(ConfigError::Negative(*name));
        }

        if self.bounds.min_x >= self.bounds.max_x || self.bounds.min_y >= self.bounds.max_y {
            return Err(ConfigError::InvertedBounds);
        }
        Ok(())
    }

    /// Spawn velocity as a vector
    #[inline]
    pub fn launch_vel(&self) -> DVec2 {
        DVec2::new(self.launch_velocity.0, self.launch_velocity.1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_documented_values() {
        let c = PhysicsConfig::default();
        assert_eq!(c.gravity, 0.4);
        assert_eq!(c.friction, 0.995);
        assert_eq!(c.air_resistance, 0.99);
        assert_eq!(c.bounce, 0.4);
        assert_eq!(c.max_speed, 12.0);
        assert_eq!(c.crash_threshold, 10.0);
        assert_eq!(c.contact_distance, 4.0);
        assert_eq!(c.launch_vel(), DVec2::new(1.0, 0.0));
        assert!(c.validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let c = PhysicsConfig::from_json(r#"{"gravity": 1.5, "bounds": {"max_y": 50.0}}"#).unwrap();
        assert_eq!(c.gravity, 1.5);
        assert_eq!(c.max_speed, MAX_SPEED);
        assert_eq!(c.bounds.max_y, 50.0);
        assert_eq!(c.bounds.min_x, BOUNDS_MIN_X);
    }

    #[test]
    fn test_json_round_trip() {
        let mut c = PhysicsConfig::default();
        c.crash_threshold = 3.0;
        let json = c.to_json().unwrap();
        assert_eq!(PhysicsConfig::from_json(&json).unwrap(), c);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let c = PhysicsConfig {
            max_speed: -1.0,
            ..Default::default()
        };
        assert!(matches!(c.validate(), Err(ConfigError::Negative("max_speed"))));

        let c = PhysicsConfig {
            gravity: f64::NAN,
            ..Default::default()
        };
        assert!(matches!(c.validate(), Err(ConfigError::NotFinite("gravity"))));

        let c = PhysicsConfig {
            bounds: Bounds {
                min_x: 10.0,
                max_x: 0.0,
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(matches!(c.validate(), Err(ConfigError::InvertedBounds)));
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(
            PhysicsConfig::from_json("{not json"),
            Err(ConfigError::Json(_))
        ));
    }

    #[test]
    fn test_bounds_edges_are_inside() {
        let b = Bounds::default();
        assert!(!b.is_outside(DVec2::new(200.0, 100.0)));
        assert!(!b.is_outside(DVec2::new(-10.0, -10.0)));
        assert!(b.is_outside(DVec2::new(50.0, 100.01)));
        assert!(b.is_outside(DVec2::new(-10.5, 50.0)));
    }
}
