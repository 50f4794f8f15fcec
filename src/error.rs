//! Error types for track loading, geometry and racing line planning

use racing_line_optimization::OptimizationError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RacingLineError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Track file error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config file error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Optimization error: {0}")]
    Optimization(#[from] OptimizationError),

    #[error("Track not found: {0}")]
    UnknownTrack(String),

    #[error("Track layout needs at least {min} points, got {got}")]
    TrackTooShort { min: usize, got: usize },

    #[error("Track width must be positive and finite, got {0}")]
    InvalidWidth(f64),

    #[error("Degenerate track geometry: {0}")]
    DegenerateTrack(String),

    #[error("At least {min} sectors are required, got {got}")]
    TooFewSectors { min: usize, got: usize },

    #[error("Spline needs at least {min} points, got {got}")]
    SplineTooFewPoints { min: usize, got: usize },

    #[error("Spline points {0} and {1} coincide")]
    SplineDuplicatePoint(usize, usize),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type RacingLineResult<T> = Result<T, RacingLineError>;
