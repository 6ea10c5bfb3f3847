//! Deterministic simulation module
//!
//! Everything that moves the rider lives here. This module must stay pure:
//! - Caller-supplied timestep only (no wall clock)
//! - Stable iteration order (segment insertion order)
//! - No rendering or platform dependencies

pub mod collision;
pub mod rider;
pub mod tick;
pub mod track;

pub use collision::{Contact, closest_point_on_segment, find_contact};
pub use rider::{CrashCause, Rider, RiderState};
pub use tick::{RunSummary, SimEvent, Simulation};
pub use track::{Point, Segment, Track, TrackData, TrackError};
