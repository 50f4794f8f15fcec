use thiserror::Error;

/// Contract violations detected before a run starts.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum OptimizationError {
    #[error("Problem dimension {dim} does not match boundary vector length {boundaries}")]
    DimensionMismatch { dim: usize, boundaries: usize },

    #[error("Search space has no dimensions")]
    EmptySearchSpace,

    #[error("Swarm must contain at least one particle")]
    EmptySwarm,

    #[error("Boundary {index} must be within [0, f64::MAX / 2], got {value}")]
    InvalidBoundary { index: usize, value: f64 },
}

pub type SolverResult<T> = Result<T, OptimizationError>;
