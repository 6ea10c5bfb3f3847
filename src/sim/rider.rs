//! Rider integrator
//!
//! One point-mass advanced per tick: gravity, drag, position, contact
//! resolution against the nearest segment, speed cap, out-of-bounds check.
//! Screen coordinates: +y points down, so gravity is positive.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use super::collision::find_contact;
use super::track::Track;
use crate::settings::PhysicsConfig;
use crate::{clamp_speed, speed_of};

/// Contact state of the rider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiderState {
    /// Airborne, no contact resolved on the last tick
    Free,
    /// A contact was resolved on the last tick
    Grounded,
    /// Terminal; further updates do nothing
    Crashed,
}

/// Why a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CrashCause {
    /// Hit a segment with too much inward normal speed
    Impact,
    /// Left the playfield bounds
    OutOfBounds,
}

/// The simulated body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rider {
    pos: DVec2,
    vel: DVec2,
    on_track: bool,
    crash: Option<CrashCause>,
    config: PhysicsConfig,
}

impl Rider {
    /// Rider at `(x, y)` with default physics and the launch velocity (1, 0)
    pub fn new(x: f64, y: f64) -> Self {
        Self::with_config(x, y, PhysicsConfig::default())
    }

    /// Rider at `(x, y)` moving at the config's launch velocity
    pub fn with_config(x: f64, y: f64, config: PhysicsConfig) -> Self {
        Self::spawn(DVec2::new(x, y), config.launch_vel(), config)
    }

    /// Rider with an explicit initial velocity
    pub fn spawn(pos: DVec2, vel: DVec2, config: PhysicsConfig) -> Self {
        Self {
            pos,
            vel,
            on_track: false,
            crash: None,
            config,
        }
    }

    /// Advance one tick against `track`.
    ///
    /// The shared borrow of `track` lasts for the whole tick, so the track
    /// cannot be edited while a rider is being advanced:
    ///
    /// ```compile_fail
    /// use line_rider::{Rider, Track};
    ///
    /// let mut track = Track::new();
    /// track.add_point(0.0, 10.0);
    /// let mut rider = Rider::new(0.0, 10.0);
    /// let seen = &track;
    /// track.add_point(50.0, 10.0);
    /// rider.update(seen, 1.0);
    /// ```
    pub fn update(&mut self, track: &Track, dt: f64) {
        if self.crash.is_some() {
            return;
        }
        let cfg = &self.config;

        self.vel.y += cfg.gravity * dt;

        // Drag keys off the previous tick's contact flag
        if !self.on_track {
            self.vel *= cfg.air_resistance;
        }

        self.pos += self.vel * dt;

        self.on_track = false;
        if let Some(contact) = find_contact(self.pos, track, cfg.contact_distance) {
            self.on_track = true;

            let d = contact.end - contact.start;
            let length = speed_of(d);
            if length > 0.0 {
                let tangent = d / length;
                let normal = DVec2::new(-tangent.y, tangent.x);

                self.pos = contact.point;

                let normal_velocity = self.vel.dot(normal);
                if normal_velocity < -cfg.crash_threshold {
                    log::trace!(
                        "impact at ({:.2}, {:.2}) with normal velocity {normal_velocity:.2}",
                        self.pos.x,
                        self.pos.y
                    );
                    self.crash = Some(CrashCause::Impact);
                    self.vel = DVec2::ZERO;
                    return;
                }

                if normal_velocity < 0.0 {
                    self.vel -= normal * normal_velocity * (1.0 + cfg.bounce);
                }

                let tangent_velocity = self.vel.dot(tangent);
                self.vel = tangent * tangent_velocity * cfg.friction;

                let gravity_along_slope = cfg.gravity * tangent.y;
                self.vel += tangent * gravity_along_slope * dt;
            }
        }

        self.vel = clamp_speed(self.vel, cfg.max_speed);

        if cfg.bounds.is_outside(self.pos) {
            self.crash = Some(CrashCause::OutOfBounds);
        }
    }

    pub fn speed(&self) -> f64 {
        speed_of(self.vel)
    }

    pub fn x(&self) -> f64 {
        self.pos.x
    }

    pub fn y(&self) -> f64 {
        self.pos.y
    }

    pub fn vx(&self) -> f64 {
        self.vel.x
    }

    pub fn vy(&self) -> f64 {
        self.vel.y
    }

    pub fn pos(&self) -> DVec2 {
        self.pos
    }

    pub fn vel(&self) -> DVec2 {
        self.vel
    }

    /// True only if a contact was resolved during the last tick
    pub fn on_track(&self) -> bool {
        self.on_track
    }

    pub fn crashed(&self) -> bool {
        self.crash.is_some()
    }

    pub fn crash_cause(&self) -> Option<CrashCause> {
        self.crash
    }

    pub fn state(&self) -> RiderState {
        match (self.crash, self.on_track) {
            (Some(_), _) => RiderState::Crashed,
            (None, true) => RiderState::Grounded,
            (None, false) => RiderState::Free,
        }
    }

    pub fn config(&self) -> &PhysicsConfig {
        &self.config
    }
}
