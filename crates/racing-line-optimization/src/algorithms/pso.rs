use std::io;
use std::time::Instant;

use ndarray::Array1;
use rand::prelude::*;
use tracing::{debug, info};

use crate::common::{validate_search_space, OptimizationResult, Problem, SimpleProblem, SolverConfig};
use crate::error::{OptimizationError, SolverResult};
use crate::progress::ProgressReporter;
use crate::swarm::{GlobalBest, Particle};

/// Tuned defaults for racing line problems. Negative inertia and cognitive
/// weights are intentional.
pub const DEFAULT_W: f64 = -0.2256;
pub const DEFAULT_CP: f64 = -0.1564;
pub const DEFAULT_CG: f64 = 3.8876;

/// Global-best Particle Swarm Optimization over `[0, B[i]]` boxes.
///
/// A run is strictly sequential: every particle reads the global best as
/// left by the previous particle's update.
#[derive(Clone, Debug)]
pub struct PSOSolver {
    pub config: SolverConfig,
    pub w: f64,  // Inertia weight
    pub cp: f64, // Cognitive weight (pbest)
    pub cg: f64, // Social weight (gbest)
    pub seed: Option<u64>,
    pub verbose: bool,
}

impl PSOSolver {
    pub fn new(config: SolverConfig) -> Self {
        Self {
            config,
            w: DEFAULT_W,
            cp: DEFAULT_CP,
            cg: DEFAULT_CG,
            seed: None,
            verbose: false,
        }
    }

    pub fn with_coefficients(mut self, w: f64, cp: f64, cg: f64) -> Self {
        self.w = w;
        self.cp = cp;
        self.cg = cg;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn solve<P: Problem>(&self, problem: &P) -> SolverResult<OptimizationResult> {
        self.solve_observed(problem, |_, _| {})
    }

    /// Like [`solve`](Self::solve), calling `observer` with the swarm after
    /// initialization (iteration `0`) and after every iteration.
    pub fn solve_observed<P, O>(&self, problem: &P, observer: O) -> SolverResult<OptimizationResult>
    where
        P: Problem,
        O: FnMut(usize, &[Particle]),
    {
        match self.seed {
            Some(seed) => self.run(problem, &mut StdRng::seed_from_u64(seed), observer),
            None => self.run(problem, &mut thread_rng(), observer),
        }
    }

    fn run<P, R, O>(&self, problem: &P, rng: &mut R, mut observer: O) -> SolverResult<OptimizationResult>
    where
        P: Problem,
        R: Rng,
        O: FnMut(usize, &[Particle]),
    {
        let boundaries = validate_search_space(problem)?;
        if self.config.population_size == 0 {
            return Err(OptimizationError::EmptySwarm);
        }

        let dim = boundaries.len();
        let max_iterations = self.config.max_iterations;
        let started = Instant::now();

        let mut reporter = self
            .verbose
            .then(|| ProgressReporter::new(io::stderr(), max_iterations));
        if let Some(reporter) = reporter.as_mut() {
            reporter.banner(dim, &self.config, self.w, self.cp, self.cg);
        }

        info!(
            dim,
            particles = self.config.population_size,
            iterations = max_iterations,
            w = self.w,
            cp = self.cp,
            cg = self.cg,
            "Starting PSO run"
        );

        let mut swarm: Vec<Particle> = (0..self.config.population_size)
            .map(|_| {
                let mut particle = Particle::random(&boundaries, rng);
                particle.best_cost = problem.objective(&particle.best_position);
                particle
            })
            .collect();

        let mut global = GlobalBest::from_swarm(&swarm).ok_or(OptimizationError::EmptySwarm)?;

        let mut position_history = Vec::with_capacity(max_iterations + 1);
        let mut history = Vec::with_capacity(max_iterations + 1);
        position_history.push(global.position.clone());
        history.push(global.cost);
        observer(0, &swarm[..]);

        if let Some(reporter) = reporter.as_mut() {
            reporter.start();
        }

        for iter in 1..=max_iterations {
            for particle in swarm.iter_mut() {
                let rp: f64 = rng.gen();
                let rg: f64 = rng.gen();

                particle.step(&global.position, &boundaries, self.w, self.cp, self.cg, rp, rg);

                let cost = problem.objective(&particle.position);
                if particle.remember_if_better(cost) && global.propose(&particle.position, cost) {
                    debug!(iteration = iter, cost, "New global best");
                }
            }

            position_history.push(global.position.clone());
            history.push(global.cost);
            observer(iter, &swarm[..]);

            if let Some(reporter) = reporter.as_mut() {
                reporter.update(iter);
            }
        }

        let elapsed = started.elapsed();
        info!(
            best_cost = global.cost,
            elapsed_ms = elapsed.as_millis() as u64,
            "PSO run complete"
        );
        if let Some(reporter) = reporter.as_mut() {
            reporter.finish(elapsed.as_secs_f64(), global.cost);
        }

        Ok(OptimizationResult {
            best_variables: global.position,
            best_fitness: global.cost,
            position_history,
            history,
            elapsed,
        })
    }
}

/// Minimizes `cost_func` over `[0, boundaries[i]]` with a fresh random swarm.
///
/// Both histories of the result hold `n_iterations + 1` entries.
#[allow(clippy::too_many_arguments)]
pub fn optimize<F>(
    cost_func: F,
    n_dimensions: usize,
    boundaries: Array1<f64>,
    n_particles: usize,
    n_iterations: usize,
    w: f64,
    cp: f64,
    cg: f64,
    verbose: bool,
) -> SolverResult<OptimizationResult>
where
    F: Fn(&Array1<f64>) -> f64 + Send + Sync,
{
    if n_dimensions != boundaries.len() {
        return Err(OptimizationError::DimensionMismatch {
            dim: n_dimensions,
            boundaries: boundaries.len(),
        });
    }

    let config = SolverConfig {
        population_size: n_particles,
        max_iterations: n_iterations,
    };
    PSOSolver::new(config)
        .with_coefficients(w, cp, cg)
        .with_verbose(verbose)
        .solve(&SimpleProblem::new(cost_func, boundaries))
}
