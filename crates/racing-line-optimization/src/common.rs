use std::time::Duration;

use ndarray::Array1;
use serde::{Deserialize, Serialize};

use crate::error::{OptimizationError, SolverResult};

/// Defines the optimization problem.
///
/// Every dimension `i` of the search space is the closed interval
/// `[0, boundaries()[i]]`. A zero boundary pins that dimension to `0`.
pub trait Problem: Send + Sync {
    /// The objective function to minimize.
    fn objective(&self, variables: &Array1<f64>) -> f64;

    /// Number of variables.
    fn dim(&self) -> usize;

    /// Upper bound of each variable; the lower bound is always `0`.
    fn boundaries(&self) -> Array1<f64>;
}

/// Configuration for the solver.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SolverConfig {
    pub population_size: usize,
    pub max_iterations: usize,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            population_size: 60,
            max_iterations: 150,
        }
    }
}

/// The result of an optimization run.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct OptimizationResult {
    pub best_variables: Array1<f64>,
    pub best_fitness: f64,
    /// Global best position after initialization and after every iteration.
    pub position_history: Vec<Array1<f64>>,
    /// Cost of each entry of `position_history`.
    pub history: Vec<f64>,
    pub elapsed: Duration,
}

impl OptimizationResult {
    /// Number of completed iterations (the initialization entry excluded).
    pub fn iterations(&self) -> usize {
        self.history.len().saturating_sub(1)
    }
}

/// A simple problem defined by a closure.
pub struct SimpleProblem<F>
where
    F: Fn(&Array1<f64>) -> f64 + Send + Sync,
{
    pub objective_func: F,
    pub boundaries: Array1<f64>,
}

impl<F> SimpleProblem<F>
where
    F: Fn(&Array1<f64>) -> f64 + Send + Sync,
{
    pub fn new(objective_func: F, boundaries: Array1<f64>) -> Self {
        Self {
            objective_func,
            boundaries,
        }
    }
}

impl<F> Problem for SimpleProblem<F>
where
    F: Fn(&Array1<f64>) -> f64 + Send + Sync,
{
    fn objective(&self, variables: &Array1<f64>) -> f64 {
        (self.objective_func)(variables)
    }

    fn dim(&self) -> usize {
        self.boundaries.len()
    }

    fn boundaries(&self) -> Array1<f64> {
        self.boundaries.clone()
    }
}

/// Largest accepted boundary. Velocities are drawn from `[-B, B]`, whose
/// width must stay finite.
pub const MAX_BOUNDARY: f64 = f64::MAX / 2.0;

/// Checks the search space contract before a run starts.
///
/// Returns the validated boundary vector.
pub fn validate_search_space<P: Problem + ?Sized>(problem: &P) -> SolverResult<Array1<f64>> {
    let boundaries = problem.boundaries();
    let dim = problem.dim();

    if boundaries.is_empty() {
        return Err(OptimizationError::EmptySearchSpace);
    }
    if dim != boundaries.len() {
        return Err(OptimizationError::DimensionMismatch {
            dim,
            boundaries: boundaries.len(),
        });
    }
    if let Some((index, &value)) = boundaries
        .iter()
        .enumerate()
        .find(|(_, b)| !(0.0..=MAX_BOUNDARY).contains(*b))
    {
        return Err(OptimizationError::InvalidBoundary { index, value });
    }

    Ok(boundaries)
}
