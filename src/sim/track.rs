//! Track graph: an append-only arena of points joined by undirected segments
//!
//! Point indices are stable for the lifetime of the track (never compacted),
//! which keeps the `{points, lines}` file shape lossless.

use std::fmt;

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::consts::SNAP_TOLERANCE;

/// A track point in plane units
pub type Point = DVec2;

/// Undirected edge between two point indices.
///
/// The stored order still matters to the integrator: the tangent runs from
/// `a` to `b`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Segment {
    pub a: usize,
    pub b: usize,
}

/// Malformed track data
#[derive(Debug, Clone, PartialEq)]
pub enum TrackError {
    /// Segment `segment` references point `index` but only `len` points exist
    PointOutOfRange {
        segment: usize,
        index: usize,
        len: usize,
    },
    /// Segment joins a point to itself
    SelfLoop { segment: usize, index: usize },
    /// Point `index` has a NaN or infinite coordinate
    NonFinitePoint { index: usize },
}

impl fmt::Display for TrackError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrackError::PointOutOfRange {
                segment,
                index,
                len,
            } => write!(
                f,
                "line {segment} references point {index}, but the track has {len} points"
            ),
            TrackError::SelfLoop { segment, index } => {
                write!(f, "line {segment} connects point {index} to itself")
            }
            TrackError::NonFinitePoint { index } => {
                write!(f, "point {index} has a non-finite coordinate")
            }
        }
    }
}

impl std::error::Error for TrackError {}

/// Serialized track shape: `{"points": [[x, y], ...], "lines": [[a, b], ...]}`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrackData {
    #[serde(default)]
    pub points: Vec<[f64; 2]>,
    #[serde(default)]
    pub lines: Vec<[usize; 2]>,
}

/// Player-authored track
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "TrackData", into = "TrackData")]
pub struct Track {
    points: Vec<Point>,
    segments: Vec<Segment>,
    /// Point that the next placement chains from
    last_point: Option<usize>,
    snap_tolerance: f64,
}

impl Default for Track {
    fn default() -> Self {
        Self::new()
    }
}

impl Track {
    pub fn new() -> Self {
        Self::with_snap_tolerance(SNAP_TOLERANCE)
    }

    /// Empty track with a custom per-axis merge distance
    pub fn with_snap_tolerance(snap_tolerance: f64) -> Self {
        Self {
            points: Vec::new(),
            segments: Vec::new(),
            last_point: None,
            snap_tolerance,
        }
    }

    /// Build a track from raw points and index pairs, validating every line.
    ///
    /// The chaining cursor starts unset: the next placement begins a new
    /// chain rather than joining the loaded track.
    pub fn from_parts(points: Vec<Point>, lines: &[[usize; 2]]) -> Result<Self, TrackError> {
        if let Some(index) = points.iter().position(|p| !p.is_finite()) {
            return Err(TrackError::NonFinitePoint { index });
        }

        let mut track = Self::new();
        track.points = points;
        for &[a, b] in lines {
            track.add_segment(a, b)?;
        }
        Ok(track)
    }

    /// Place a point, applying snap-and-chain.
    ///
    /// If an existing point lies within the snap tolerance on both axes, no
    /// point is created: a segment is chained from the previous cursor to the
    /// matched point instead (unless the cursor already is that point).
    /// Otherwise a new point is appended and chained from the cursor. Either
    /// way the cursor moves to the resulting point, which is returned.
    ///
    /// A NaN or infinite coordinate is ignored: nothing is added, the cursor
    /// stays put and `None` is returned.
    pub fn add_point(&mut self, x: f64, y: f64) -> Option<usize> {
        if !(x.is_finite() && y.is_finite()) {
            log::warn!("ignoring non-finite track point ({x}, {y})");
            return None;
        }

        let tol = self.snap_tolerance;
        let existing = self
            .points
            .iter()
            .position(|p| (p.x - x).abs() < tol && (p.y - y).abs() < tol);

        let index = match existing {
            Some(i) => {
                log::trace!("snapped ({x}, {y}) to point {i}");
                i
            }
            None => {
                self.points.push(Point::new(x, y));
                self.points.len() - 1
            }
        };

        if let Some(prev) = self.last_point {
            if prev != index {
                self.segments.push(Segment { a: prev, b: index });
                log::trace!("chained segment {prev} -> {index}");
            }
        }
        self.last_point = Some(index);
        Some(index)
    }

    /// Append a segment between two existing, distinct points
    pub fn add_segment(&mut self, a: usize, b: usize) -> Result<(), TrackError> {
        let segment = self.segments.len();
        let len = self.points.len();
        for index in [a, b] {
            if index >= len {
                return Err(TrackError::PointOutOfRange {
                    segment,
                    index,
                    len,
                });
            }
        }
        if a == b {
            return Err(TrackError::SelfLoop { segment, index: a });
        }
        self.segments.push(Segment { a, b });
        Ok(())
    }

    /// First point in insertion order, where a rider spawns
    pub fn start_position(&self) -> Option<Point> {
        self.points.first().copied()
    }

    /// Drop every point and segment and forget the cursor
    pub fn clear(&mut self) {
        self.points.clear();
        self.segments.clear();
        self.last_point = None;
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn last_point(&self) -> Option<usize> {
        self.last_point
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Endpoints of a segment, in stored order
    #[inline]
    pub fn endpoints(&self, segment: Segment) -> (Point, Point) {
        (self.points[segment.a], self.points[segment.b])
    }

    /// Endpoints of every segment, in insertion order
    pub fn segment_endpoints(&self) -> impl Iterator<Item = (Point, Point)> + '_ {
        self.segments.iter().map(|&s| self.endpoints(s))
    }

    pub fn to_data(&self) -> TrackData {
        TrackData {
            points: self.points.iter().map(|p| [p.x, p.y]).collect(),
            lines: self.segments.iter().map(|s| [s.a, s.b]).collect(),
        }
    }
}

impl TryFrom<TrackData> for Track {
    type Error = TrackError;

    fn try_from(data: TrackData) -> Result<Self, Self::Error> {
        let points = data.points.iter().map(|&[x, y]| Point::new(x, y)).collect();
        Track::from_parts(points, &data.lines)
    }
}

impl From<Track> for TrackData {
    fn from(track: Track) -> Self {
        track.to_data()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_add_point_chains_segments() {
        let mut track = Track::new();
        assert_eq!(track.add_point(0.0, 0.0), Some(0));
        assert!(track.segments().is_empty());
        assert_eq!(track.add_point(10.0, 0.0), Some(1));
        assert_eq!(track.add_point(20.0, 5.0), Some(2));
        assert_eq!(
            track.segments(),
            &[Segment { a: 0, b: 1 }, Segment { a: 1, b: 2 }]
        );
        assert_eq!(track.last_point(), Some(2));
    }

    #[test]
    fn test_snap_closes_loop() {
        let mut track = Track::new();
        track.add_point(0.0, 0.0);
        track.add_point(10.0, 0.0);
        track.add_point(10.0, 10.0);
        // Within 2 units of point 0 on both axes
        let idx = track.add_point(1.0, -1.5);
        assert_eq!(idx, Some(0));
        assert_eq!(track.points().len(), 3);
        assert_eq!(track.segments().last(), Some(&Segment { a: 2, b: 0 }));
        assert_eq!(track.last_point(), Some(0));
    }

    #[test]
    fn test_snap_requires_both_axes() {
        let mut track = Track::new();
        track.add_point(0.0, 0.0);
        // Exactly at the tolerance is not a match
        assert_eq!(track.add_point(2.0, 0.0), Some(1));
        assert_eq!(track.add_point(1.0, 5.0), Some(2));
        assert_eq!(track.points().len(), 3);
    }

    #[test]
    fn test_repeated_placement_adds_no_duplicates() {
        let mut track = Track::new();
        track.add_point(0.0, 0.0);
        track.add_point(5.0, 5.0);
        track.add_point(5.0, 5.0);
        assert_eq!(track.points().len(), 2);
        assert_eq!(track.segments(), &[Segment { a: 0, b: 1 }]);
    }

    #[test]
    fn test_non_finite_placement_is_ignored() {
        let mut track = Track::new();
        track.add_point(0.0, 0.0);
        assert_eq!(track.add_point(f64::NAN, 5.0), None);
        assert_eq!(track.add_point(3.0, f64::INFINITY), None);
        assert_eq!(track.add_point(f64::NEG_INFINITY, f64::NAN), None);
        assert_eq!(track.points(), &[Point::new(0.0, 0.0)]);
        assert!(track.segments().is_empty());
        assert_eq!(track.last_point(), Some(0));

        // Chaining resumes from the last good point
        track.add_point(10.0, 0.0);
        assert_eq!(track.segments(), &[Segment { a: 0, b: 1 }]);

        let json = serde_json::to_string(&track).unwrap();
        let reloaded: Track = serde_json::from_str(&json).unwrap();
        assert_eq!(reloaded.points(), track.points());
        assert_eq!(reloaded.segments(), track.segments());
    }

    #[test]
    fn test_start_position_and_clear() {
        let mut track = Track::new();
        assert_eq!(track.start_position(), None);
        track.add_point(3.0, 4.0);
        track.add_point(8.0, 4.0);
        assert_eq!(track.start_position(), Some(Point::new(3.0, 4.0)));

        track.clear();
        assert!(track.is_empty());
        assert!(track.segments().is_empty());
        assert_eq!(track.last_point(), None);
        assert_eq!(track.start_position(), None);

        // No segment back to the cleared cursor
        track.add_point(1.0, 1.0);
        assert!(track.segments().is_empty());
    }

    #[test]
    fn test_from_parts_rejects_dangling_index() {
        let points = vec![Point::new(0.0, 0.0), Point::new(1.0, 0.0)];
        let err = Track::from_parts(points, &[[0, 1], [1, 2]]).unwrap_err();
        assert_eq!(
            err,
            TrackError::PointOutOfRange {
                segment: 1,
                index: 2,
                len: 2
            }
        );
        assert!(err.to_string().contains("references point 2"));
    }

    #[test]
    fn test_from_parts_rejects_self_loop_and_nan() {
        let points = vec![Point::new(0.0, 0.0), Point::new(1.0, 0.0)];
        assert_eq!(
            Track::from_parts(points, &[[1, 1]]).unwrap_err(),
            TrackError::SelfLoop {
                segment: 0,
                index: 1
            }
        );

        let points = vec![Point::new(0.0, f64::NAN)];
        assert_eq!(
            Track::from_parts(points, &[]).unwrap_err(),
            TrackError::NonFinitePoint { index: 0 }
        );
    }

    #[test]
    fn test_json_shape_is_preserved() {
        let json = r#"{"points":[[10.0,20.0],[30.0,20.0],[50.0,25.0]],"lines":[[1,0],[1,2]]}"#;
        let track: Track = serde_json::from_str(json).unwrap();
        assert_eq!(track.points().len(), 3);
        assert_eq!(track.segments()[0], Segment { a: 1, b: 0 });
        assert_eq!(serde_json::to_string(&track).unwrap(), json);
    }

    #[test]
    fn test_json_accepts_integer_coordinates() {
        let json = r#"{"points":[[10,20],[30,20]],"lines":[[0,1]]}"#;
        let track: Track = serde_json::from_str(json).unwrap();
        assert_eq!(track.points()[1], Point::new(30.0, 20.0));
    }

    #[test]
    fn test_json_validation_runs_on_load() {
        let json = r#"{"points":[[0,0]],"lines":[[0,5]]}"#;
        let err = serde_json::from_str::<Track>(json).unwrap_err();
        assert!(err.to_string().contains("references point 5"));
    }

    #[test]
    fn test_loaded_track_starts_new_chain() {
        let json = r#"{"points":[[0,0],[10,0]],"lines":[[0,1]]}"#;
        let mut track: Track = serde_json::from_str(json).unwrap();
        assert_eq!(track.last_point(), None);
        track.add_point(20.0, 0.0);
        assert_eq!(track.segments().len(), 1);

        // Snapping onto a loaded point then chains from it
        track.add_point(10.5, 0.5);
        assert_eq!(track.segments().last(), Some(&Segment { a: 2, b: 1 }));
    }

    proptest! {
        #[test]
        fn prop_placement_twice_is_idempotent(
            placed in prop::collection::vec((-50.0f64..250.0, -50.0f64..150.0), 0..20),
            x in -50.0f64..250.0,
            y in -50.0f64..150.0,
        ) {
            let mut track = Track::new();
            for (px, py) in placed {
                track.add_point(px, py);
            }
            let first = track.add_point(x, y);
            let points = track.points().len();
            let segments = track.segments().len();

            let second = track.add_point(x, y);
            prop_assert_eq!(first, second);
            prop_assert_eq!(track.points().len(), points);
            prop_assert_eq!(track.segments().len(), segments);
        }

        #[test]
        fn prop_segments_always_valid(
            placed in prop::collection::vec((0.0f64..40.0, 0.0f64..40.0), 0..40),
        ) {
            let mut track = Track::new();
            for (px, py) in placed {
                track.add_point(px, py);
            }
            let len = track.points().len();
            for s in track.segments() {
                prop_assert!(s.a < len && s.b < len && s.a != s.b);
            }
            let reloaded = Track::try_from(track.to_data()).unwrap();
            prop_assert_eq!(reloaded.points(), track.points());
            prop_assert_eq!(reloaded.segments(), track.segments());
        }
    }
}
