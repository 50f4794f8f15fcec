//! Bounded Particle Swarm Optimization.
//!
//! The engine minimizes an opaque objective over a box `[0, B[0]] x ... x
//! [0, B[D-1]]` and records the global best after initialization and after
//! every iteration.
//!
//! ```rust
//! use ndarray::array;
//! use racing_line_optimization::algorithms::PSOSolver;
//! use racing_line_optimization::{SimpleProblem, SolverConfig};
//!
//! let problem = SimpleProblem::new(|v: &ndarray::Array1<f64>| v.dot(v), array![1.0, 1.0]);
//! let config = SolverConfig { population_size: 5, max_iterations: 10 };
//! let result = PSOSolver::new(config)
//!     .with_coefficients(0.5, 1.0, 1.0)
//!     .with_seed(7)
//!     .solve(&problem)
//!     .unwrap();
//!
//! assert_eq!(result.history.len(), 11);
//! ```

pub mod algorithms;
pub mod common;
pub mod error;
pub mod progress;
pub mod swarm;

/// Re-export common types
pub use common::*;
pub use error::{OptimizationError, SolverResult};
pub use swarm::{GlobalBest, Particle};
