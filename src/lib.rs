//! Line Rider - rider physics and track collision for a terminal toy
//!
//! Core modules:
//! - `sim`: Deterministic simulation (track graph, contact search, rider integration)
//! - `settings`: Physics configuration with documented defaults
//! - `maps`: Built-in tracks
//! - `persistence`: Track files on disk
//! - `view`: Read-only queries for renderers and HUDs

pub mod maps;
pub mod persistence;
pub mod settings;
pub mod sim;
pub mod view;

pub use maps::Map;
pub use settings::{Bounds, ConfigError, PhysicsConfig};
pub use sim::{Point, Rider, Simulation, Track};

use glam::DVec2;

/// Simulation configuration constants
pub mod consts {
    /// Default timestep (one tick per rendered frame)
    pub const SIM_DT: f64 = 1.0;
    /// Maximum ticks per `Simulation::advance` call
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Frame time cap fed into the accumulator
    pub const MAX_FRAME_DT: f64 = 8.0;

    /// Downward acceleration per tick²
    pub const GRAVITY: f64 = 0.4;
    /// Velocity scale applied after each contact (track friction)
    pub const FRICTION: f64 = 0.995;
    /// Velocity scale applied while airborne
    pub const AIR_RESISTANCE: f64 = 0.99;
    /// Restitution added along the normal when moving into a surface
    pub const BOUNCE: f64 = 0.4;
    /// Speed cap
    pub const MAX_SPEED: f64 = 12.0;
    /// Inward normal speed that ends the run
    pub const CRASH_THRESHOLD: f64 = 10.0;
    /// Rider-to-segment distance that counts as contact (strictly less than)
    pub const CONTACT_DISTANCE: f64 = 4.0;
    /// Initial velocity of a freshly spawned rider
    pub const LAUNCH_VX: f64 = 1.0;
    pub const LAUNCH_VY: f64 = 0.0;

    /// Playfield limits; leaving them ends the run
    pub const BOUNDS_MIN_X: f64 = -10.0;
    pub const BOUNDS_MAX_X: f64 = 200.0;
    pub const BOUNDS_MIN_Y: f64 = -10.0;
    pub const BOUNDS_MAX_Y: f64 = 100.0;

    /// Per-axis distance under which a placed point merges into an existing one
    pub const SNAP_TOLERANCE: f64 = 2.0;

    /// HUD speed tiers
    pub const SPEED_FAST: f64 = 5.0;
    pub const SPEED_BLAZING: f64 = 8.0;
}

/// Magnitude of a velocity vector
#[inline]
pub fn speed_of(vel: DVec2) -> f64 {
    vel.length()
}

/// Rescale `vel` to `max` magnitude if it exceeds it, preserving direction
#[inline]
pub fn clamp_speed(vel: DVec2, max: f64) -> DVec2 {
    let speed = speed_of(vel);
    if speed > max {
        vel / speed * max
    } else {
        vel
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_speed_preserves_direction() {
        let v = clamp_speed(DVec2::new(30.0, 40.0), 10.0);
        assert!((v.x - 6.0).abs() < 1e-12);
        assert!((v.y - 8.0).abs() < 1e-12);
    }

    #[test]
    fn test_clamp_speed_leaves_slow_vectors() {
        let v = DVec2::new(1.0, -2.0);
        assert_eq!(clamp_speed(v, 12.0), v);
    }
}
