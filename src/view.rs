//! Read-only queries for renderers and HUDs
//!
//! Nothing here mutates simulation state.

use crate::consts::{SPEED_BLAZING, SPEED_FAST};
use crate::sim::Rider;

/// Speed band used to color the rider and stats line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpeedTier {
    Slow,
    Fast,
    Blazing,
}

impl SpeedTier {
    pub fn from_speed(speed: f64) -> Self {
        if speed > SPEED_BLAZING {
            SpeedTier::Blazing
        } else if speed > SPEED_FAST {
            SpeedTier::Fast
        } else {
            SpeedTier::Slow
        }
    }
}

/// Rider sprite picked from the heading
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RiderGlyph {
    Level,
    /// Heading down the screen (+y)
    Descending,
    Climbing,
    Sloped,
    Crashed,
}

impl RiderGlyph {
    pub fn for_rider(rider: &Rider) -> Self {
        if rider.crashed() {
            return RiderGlyph::Crashed;
        }
        let angle = rider.vy().atan2(rider.vx());
        if angle.abs() < 0.5 {
            RiderGlyph::Level
        } else if angle > 1.0 {
            RiderGlyph::Descending
        } else if angle < -1.0 {
            RiderGlyph::Climbing
        } else {
            RiderGlyph::Sloped
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RiderGlyph::Level => "o>",
            RiderGlyph::Descending => "o\\",
            RiderGlyph::Climbing => "o/",
            RiderGlyph::Sloped => "o-",
            RiderGlyph::Crashed => "X",
        }
    }
}

/// HUD stats line
pub fn status_line(rider: &Rider) -> String {
    let mut line = format!(
        "Speed: {:.1} | Pos: ({:.1}, {:.1})",
        rider.speed(),
        rider.x(),
        rider.y()
    );
    if rider.crashed() {
        line.push_str(" | CRASHED!");
    }
    line
}
