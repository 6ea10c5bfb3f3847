//! Simulation driver
//!
//! Owns the track and the rider. Editing goes through `&mut Simulation`, so
//! the borrow checker rules out touching the track while a tick runs.

use glam::DVec2;

use super::rider::{CrashCause, Rider, RiderState};
use super::track::Track;
use crate::consts::*;
use crate::maps::Map;
use crate::settings::PhysicsConfig;

/// Rider state transition observed during one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimEvent {
    /// Free -> Grounded
    Landed,
    /// Grounded -> Free
    LeftTrack,
    Crashed(CrashCause),
}

/// Outcome of `Simulation::run_until_settled` and `run_observed`
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub ticks: u64,
    pub final_pos: DVec2,
    pub top_speed: f64,
    /// Ticks that ended in contact with the track
    pub ground_ticks: u64,
    pub crash: Option<CrashCause>,
}

#[derive(Debug, Clone)]
pub struct Simulation {
    track: Track,
    rider: Option<Rider>,
    config: PhysicsConfig,
    paused: bool,
    accumulator: f64,
    /// Ticks the current rider has actually advanced
    time_ticks: u64,
}

impl Simulation {
    /// New simulation with a rider already placed at the track start
    pub fn new(track: Track, config: PhysicsConfig) -> Self {
        let mut sim = Self {
            track,
            rider: None,
            config,
            paused: false,
            accumulator: 0.0,
            time_ticks: 0,
        };
        sim.reset();
        sim
    }

    pub fn from_map(map: Map, config: PhysicsConfig) -> Self {
        Self::new(map.track(), config)
    }

    /// Replace the rider with a fresh one at the track start.
    ///
    /// Leaves no rider when the track is empty.
    pub fn reset(&mut self) {
        self.rider = self
            .track
            .start_position()
            .map(|start| Rider::with_config(start.x, start.y, self.config));
        self.accumulator = 0.0;
        self.time_ticks = 0;
        if let Some(rider) = &self.rider {
            log::debug!("rider placed at ({:.1}, {:.1})", rider.x(), rider.y());
        }
    }

    /// Advance the rider one tick, reporting any state transition
    pub fn tick(&mut self, dt: f64) -> Option<SimEvent> {
        if self.paused {
            return None;
        }
        let rider = self.rider.as_mut()?;
        let before = rider.state();
        if before == RiderState::Crashed {
            return None;
        }

        rider.update(&self.track, dt);
        self.time_ticks += 1;

        let event = match (before, rider.state()) {
            (_, RiderState::Crashed) => rider.crash_cause().map(SimEvent::Crashed),
            (RiderState::Free, RiderState::Grounded) => Some(SimEvent::Landed),
            (RiderState::Grounded, RiderState::Free) => Some(SimEvent::LeftTrack),
            _ => None,
        };

        match event {
            Some(SimEvent::Crashed(cause)) => log::info!(
                "rider crashed ({cause:?}) at ({:.1}, {:.1}) after {} ticks",
                rider.x(),
                rider.y(),
                self.time_ticks
            ),
            Some(e) => log::debug!("tick {}: {e:?}", self.time_ticks),
            None => log::trace!(
                "tick {}: pos ({:.2}, {:.2}) speed {:.2}",
                self.time_ticks,
                rider.x(),
                rider.y(),
                rider.speed()
            ),
        }
        event
    }

    /// Feed wall-clock frame time through a fixed-step accumulator.
    ///
    /// Runs at most `MAX_SUBSTEPS` ticks of `SIM_DT`; returns how many ran.
    pub fn advance(&mut self, frame_dt: f64) -> u32 {
        if self.paused {
            return 0;
        }
        self.accumulator += frame_dt.clamp(0.0, MAX_FRAME_DT);

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            self.tick(SIM_DT);
            self.accumulator -= SIM_DT;
            substeps += 1;
        }
        substeps
    }

    /// Tick by `dt` until the rider crashes or `max_ticks` pass
    pub fn run_until_settled(&mut self, max_ticks: u64, dt: f64) -> RunSummary {
        self.run_observed(max_ticks, dt, |_, _, _| {})
    }

    /// Like `run_until_settled`, calling `on_tick(n, rider, event)` after
    /// every tick (`n` counts from 1)
    pub fn run_observed<F>(&mut self, max_ticks: u64, dt: f64, mut on_tick: F) -> RunSummary
    where
        F: FnMut(u64, &Rider, Option<SimEvent>),
    {
        let mut top_speed = self.rider.as_ref().map_or(0.0, Rider::speed);
        let mut ground_ticks = 0;
        let mut ticks = 0;

        while ticks < max_ticks {
            let Some(rider) = &self.rider else { break };
            if rider.crashed() || self.paused {
                break;
            }
            let event = self.tick(dt);
            ticks += 1;
            if let Some(rider) = &self.rider {
                top_speed = top_speed.max(rider.speed());
                if rider.on_track() {
                    ground_ticks += 1;
                }
                on_tick(ticks, rider, event);
            }
        }

        RunSummary {
            ticks,
            final_pos: self.rider.as_ref().map_or(DVec2::ZERO, Rider::pos),
            top_speed,
            ground_ticks,
            crash: self.rider.as_ref().and_then(Rider::crash_cause),
        }
    }

    pub fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
    }

    pub fn toggle_pause(&mut self) {
        self.paused = !self.paused;
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn track(&self) -> &Track {
        &self.track
    }

    /// Edit the track between runs
    ///
    /// ```
    /// use line_rider::{Map, PhysicsConfig, Simulation};
    ///
    /// let mut sim = Simulation::from_map(Map::BeginnerHill, PhysicsConfig::default());
    /// sim.tick(1.0);
    /// sim.track_mut().add_point(300.0, 90.0);
    /// sim.tick(1.0);
    /// assert_eq!(sim.time_ticks(), 2);
    /// ```
    ///
    /// A track reference taken from the simulation cannot outlive an edit,
    /// so no tick ever sees a half-edited track:
    ///
    /// ```compile_fail
    /// use line_rider::{Map, PhysicsConfig, Simulation};
    ///
    /// let mut sim = Simulation::from_map(Map::BeginnerHill, PhysicsConfig::default());
    /// let track = sim.track();
    /// sim.track_mut().clear();
    /// sim.tick(1.0);
    /// assert!(track.points().is_empty());
    /// ```
    pub fn track_mut(&mut self) -> &mut Track {
        &mut self.track
    }

    pub fn rider(&self) -> Option<&Rider> {
        self.rider.as_ref()
    }

    pub fn config(&self) -> &PhysicsConfig {
        &self.config
    }

    pub fn time_ticks(&self) -> u64 {
        self.time_ticks
    }
}
