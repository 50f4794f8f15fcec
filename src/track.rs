//! Track documents
//!
//! A track file is a JSON object keyed by track name:
//!
//! ```json
//! { "test_track": { "layout": [[0.0, 0.0], [50.0, 0.0], ...], "width": 6.0 } }
//! ```

use std::fs;
use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{RacingLineError, RacingLineResult};
use crate::geometry::Point;

/// Fewest layout points a track can be built from.
pub const MIN_LAYOUT_POINTS: usize = 3;

/// One track: its centerline layout and constant width.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    pub layout: Vec<Point>,
    pub width: f64,
}

impl Track {
    pub fn validate(&self) -> RacingLineResult<()> {
        if self.layout.len() < MIN_LAYOUT_POINTS {
            return Err(RacingLineError::TrackTooShort {
                min: MIN_LAYOUT_POINTS,
                got: self.layout.len(),
            });
        }
        if !self.width.is_finite() || self.width <= 0.0 {
            return Err(RacingLineError::InvalidWidth(self.width));
        }
        Ok(())
    }

    /// Length of the centerline.
    pub fn length(&self) -> f64 {
        self.layout.windows(2).map(|w| w[0].distance(&w[1])).sum()
    }
}

/// All tracks of a document, in document order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrackCatalog {
    tracks: IndexMap<String, Track>,
}

impl TrackCatalog {
    pub fn from_json_str(json: &str) -> RacingLineResult<Self> {
        let catalog: TrackCatalog = serde_json::from_str(json)?;
        for (name, track) in &catalog.tracks {
            track.validate()?;
            debug!(track = %name, points = track.layout.len(), width = track.width, "Loaded track");
        }
        Ok(catalog)
    }

    pub fn from_file(path: impl AsRef<Path>) -> RacingLineResult<Self> {
        let text = fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&text)
    }

    pub fn get(&self, name: &str) -> RacingLineResult<&Track> {
        self.tracks
            .get(name)
            .ok_or_else(|| RacingLineError::UnknownTrack(name.to_string()))
    }

    pub fn insert(&mut self, name: impl Into<String>, track: Track) {
        self.tracks.insert(name.into(), track);
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.tracks.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Track)> {
        self.tracks.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }
}
