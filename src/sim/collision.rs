//! Contact search between the rider point and track segments
//!
//! A brute-force scan over every segment. Tracks are hand-drawn and small,
//! so no spatial index is kept; adding one must not change which segment
//! wins a tie (the earliest inserted).

use glam::DVec2;

use super::track::{Point, Track};

/// Nearest qualifying segment for a query point
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    /// Index of the winning segment in `Track::segments`
    pub segment: usize,
    /// Segment endpoints in stored order
    pub start: Point,
    pub end: Point,
    /// Closest point on the finite segment
    pub point: Point,
    /// Distance from the query point to `point`
    pub distance: f64,
}

/// Closest point to `p` on the segment `a`-`b`.
///
/// Projects onto the infinite line and clamps the parameter to [0, 1].
/// A zero-length segment yields `a`.
pub fn closest_point_on_segment(p: DVec2, a: DVec2, b: DVec2) -> DVec2 {
    let d = b - a;
    if d.x == 0.0 && d.y == 0.0 {
        return a;
    }
    let t = ((p - a).dot(d) / d.length_squared()).clamp(0.0, 1.0);
    a + d * t
}

/// Find the closest segment point strictly within `max_distance` of `pos`.
///
/// Only a strictly smaller distance replaces the running best, so among equal
/// distances the first segment in insertion order wins.
pub fn find_contact(pos: DVec2, track: &Track, max_distance: f64) -> Option<Contact> {
    let mut best: Option<Contact> = None;
    let mut min_dist = max_distance;

    for (segment, (start, end)) in track.segment_endpoints().enumerate() {
        let point = closest_point_on_segment(pos, start, end);
        let distance = pos.distance(point);
        if distance < min_dist {
            min_dist = distance;
            best = Some(Contact {
                segment,
                start,
                end,
                point,
                distance,
            });
        }
    }

    best
}
