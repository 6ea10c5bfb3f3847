//! Built-in tracks offered from the main menu

use crate::sim::{Point, Track};

/// A bundled track
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Map {
    BeginnerHill,
    DeathDrop,
    LoopDeLoop,
}

const BEGINNER_HILL: &[[f64; 2]] = &[
    [10.0, 20.0],
    [30.0, 20.0],
    [50.0, 25.0],
    [70.0, 25.0],
    [90.0, 30.0],
];

const DEATH_DROP: &[[f64; 2]] = &[
    [10.0, 10.0],
    [30.0, 10.0],
    [32.0, 30.0],
    [50.0, 30.0],
    [70.0, 35.0],
];

const LOOP_DE_LOOP: &[[f64; 2]] = &[
    [10.0, 10.0],
    [20.0, 10.0],
    [25.0, 15.0],
    [30.0, 20.0],
    [35.0, 25.0],
    [40.0, 28.0],
    [45.0, 28.0],
    [50.0, 25.0],
    [55.0, 20.0],
    [60.0, 15.0],
    [65.0, 10.0],
    [80.0, 10.0],
];

impl Map {
    pub fn all() -> [Map; 3] {
        [Map::BeginnerHill, Map::DeathDrop, Map::LoopDeLoop]
    }

    pub fn name(&self) -> &'static str {
        match self {
            Map::BeginnerHill => "beginner_hill",
            Map::DeathDrop => "death_drop",
            Map::LoopDeLoop => "loop_de_loop",
        }
    }

    /// Menu title
    pub fn title(&self) -> &'static str {
        match self {
            Map::BeginnerHill => "Beginner Hill",
            Map::DeathDrop => "Death Drop",
            Map::LoopDeLoop => "Loop-de-Loop",
        }
    }

    /// Parse a map name; accepts `death_drop`, `death-drop`, `Death-Drop`, ...
    pub fn from_name(s: &str) -> Option<Self> {
        let key = s.trim().to_lowercase().replace('-', "_");
        Map::all().into_iter().find(|m| m.name() == key)
    }

    fn points(&self) -> &'static [[f64; 2]] {
        match self {
            Map::BeginnerHill => BEGINNER_HILL,
            Map::DeathDrop => DEATH_DROP,
            Map::LoopDeLoop => LOOP_DE_LOOP,
        }
    }

    /// Build the track: the points joined in order as one polyline
    pub fn track(&self) -> Track {
        let points: Vec<Point> = self.points().iter().map(|&[x, y]| Point::new(x, y)).collect();
        let lines: Vec<[usize; 2]> = (1..points.len()).map(|i| [i - 1, i]).collect();
        match Track::from_parts(points, &lines) {
            Ok(track) => track,
            Err(e) => {
                log::error!("built-in map `{}` is malformed: {e}", self.name());
                debug_assert!(false, "built-in map `{}` is malformed: {e}", self.name());
                Track::default()
            }
        }
    }
}
