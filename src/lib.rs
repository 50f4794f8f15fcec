//! Racing Line
//!
//! Finds a fast path around a closed track. The track is cut into
//! cross-track sectors, every sector contributes one offset between its
//! inside and outside border, and a Particle Swarm Optimization searches the
//! offsets that minimize the lap time of a point-mass vehicle.
//!
//! # Pipeline
//!
//! 1. [`track`]: load named tracks (centerline layout and width) from JSON
//! 2. [`geometry`]: offset the layout into borders and define the sectors
//! 3. [`racing_line`]: decode sector offsets into racing line points
//! 4. [`lap_time`]: spline the line and integrate distance over the
//!    grip-limited speed
//! 5. [`planner`]: run the swarm and collect the solution with its history
//!
//! ```rust,no_run
//! use racing_line::{RacingLinePlanner, RunConfig, TrackCatalog};
//!
//! let catalog = TrackCatalog::from_file("tracks/tracks.json")?;
//! let track = catalog.get("test_track")?;
//! let config = RunConfig { seed: Some(42), ..RunConfig::default() };
//!
//! let solution = RacingLinePlanner::new(track, config)?.plan()?;
//! println!("lap time: {:.3} s", solution.lap_time);
//! # Ok::<(), racing_line::RacingLineError>(())
//! ```

#![allow(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod error;
pub mod geometry;
pub mod lap_time;
pub mod planner;
pub mod racing_line;
pub mod track;

// Re-export main types for convenience
pub use config::{RunConfig, VehicleConfig};
pub use error::{RacingLineError, RacingLineResult};
pub use geometry::{define_sectors, Point, Polyline, Sectors, Side, TrackBorders};
pub use lap_time::{LapProfile, LapTimeModel};
pub use planner::{fastest, LapTimeProblem, RacingLinePlanner, RacingLineSolution};
pub use racing_line::{decode_offset, sectors_to_racing_line};
pub use track::{Track, TrackCatalog};

pub use racing_line_optimization as optimization;

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get version string
pub fn version() -> &'static str {
    VERSION
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        let ver = version();
        assert!(!ver.is_empty());
        assert_eq!(ver, "0.3.0");
    }
}
