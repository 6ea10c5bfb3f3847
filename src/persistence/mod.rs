//! Track files on disk
//!
//! Features:
//! - `{"points": [[x, y], ...], "lines": [[a, b], ...]}` JSON, pretty-printed
//! - Validation on load (dangling or self-referencing lines are rejected)
//! - Timestamped names for editor saves (`track_<unix secs>.json`)

use std::fmt;
use std::path::{Path, PathBuf};

use crate::sim::{Track, TrackData, TrackError};

/// Failure reading or writing a track file
#[derive(Debug)]
pub enum PersistError {
    Io { path: PathBuf, source: std::io::Error },
    Json { path: PathBuf, source: serde_json::Error },
    Invalid { path: PathBuf, source: TrackError },
}

impl fmt::Display for PersistError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PersistError::Io { path, .. } => write!(f, "I/O error on {}", path.display()),
            PersistError::Json { path, .. } => write!(f, "malformed track file {}", path.display()),
            PersistError::Invalid { path, .. } => write!(f, "invalid track in {}", path.display()),
        }
    }
}

impl std::error::Error for PersistError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PersistError::Io { source, .. } => Some(source),
            PersistError::Json { source, .. } => Some(source),
            PersistError::Invalid { source, .. } => Some(source),
        }
    }
}

/// Write `track` to `path`, creating parent directories as needed
pub fn save_track(track: &Track, path: impl AsRef<Path>) -> Result<(), PersistError> {
    let path = path.as_ref();
    let io_err = |source| PersistError::Io {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(io_err)?;
    }
    let json = serde_json::to_string_pretty(&track.to_data()).map_err(|source| {
        PersistError::Json {
            path: path.to_path_buf(),
            source,
        }
    })?;
    std::fs::write(path, json).map_err(io_err)?;

    log::info!(
        "Saved track ({} points, {} lines) to {}",
        track.points().len(),
        track.segments().len(),
        path.display()
    );
    Ok(())
}

/// Read and validate a track file
pub fn load_track(path: impl AsRef<Path>) -> Result<Track, PersistError> {
    let path = path.as_ref();
    let json = std::fs::read_to_string(path).map_err(|source| PersistError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let data: TrackData = serde_json::from_str(&json).map_err(|source| PersistError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    let track = Track::try_from(data).map_err(|source| PersistError::Invalid {
        path: path.to_path_buf(),
        source,
    })?;

    log::info!(
        "Loaded track ({} points, {} lines) from {}",
        track.points().len(),
        track.segments().len(),
        path.display()
    );
    Ok(track)
}

/// File name used for an editor save at `unix_secs`
pub fn track_file_name(unix_secs: u64) -> String {
    format!("track_{unix_secs}.json")
}

/// Save into `dir` under a timestamped name; returns the written path
pub fn save_track_in(
    dir: impl AsRef<Path>,
    track: &Track,
    unix_secs: u64,
) -> Result<PathBuf, PersistError> {
    let path = dir.as_ref().join(track_file_name(unix_secs));
    save_track(track, &path)?;
    Ok(path)
}

/// `*.json` files in `dir`, sorted by name. A missing directory is empty.
pub fn list_tracks(dir: impl AsRef<Path>) -> Result<Vec<PathBuf>, PersistError> {
    let dir = dir.as_ref();
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(source) => {
            return Err(PersistError::Io {
                path: dir.to_path_buf(),
                source,
            });
        }
    };

    let mut tracks = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| PersistError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
        let path = entry.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "json") {
            tracks.push(path);
        }
    }
    tracks.sort();
    Ok(tracks)
}

/// Load the first track in `dir`, if there is one
pub fn load_first(dir: impl AsRef<Path>) -> Result<Option<Track>, PersistError> {
    match list_tracks(dir)?.first() {
        Some(path) => load_track(path).map(Some),
        None => Ok(None),
    }
}
