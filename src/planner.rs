//! Racing line planning
//!
//! [`RacingLinePlanner`] turns a [`Track`] into sectors once and then runs
//! any number of swarm optimizations over the sector offsets. Each run is
//! summarized by a [`RacingLineSolution`] that keeps the whole global-best
//! history so intermediate lines can be replayed.

use std::time::Duration;

use ndarray::Array1;
use racing_line_optimization::swarm::improves;
use racing_line_optimization::{OptimizationResult, Problem};
use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, info};

use crate::config::RunConfig;
use crate::error::{RacingLineError, RacingLineResult};
use crate::geometry::{define_sectors, Point, Sectors, TrackBorders};
use crate::lap_time::{LapProfile, LapTimeModel};
use crate::racing_line::sectors_to_racing_line;
use crate::track::Track;

/// Lap time as a function of the sector offsets.
pub struct LapTimeProblem<'a> {
    sectors: &'a Sectors,
    model: &'a LapTimeModel,
}

impl<'a> LapTimeProblem<'a> {
    pub fn new(sectors: &'a Sectors, model: &'a LapTimeModel) -> Self {
        Self { sectors, model }
    }

    pub fn racing_line(&self, offsets: &Array1<f64>) -> Vec<Point> {
        sectors_to_racing_line(offsets, &self.sectors.inside, &self.sectors.outside)
    }
}

impl Problem for LapTimeProblem<'_> {
    fn objective(&self, variables: &Array1<f64>) -> f64 {
        match self.model.lap_time(&self.racing_line(variables)) {
            Ok(lap_time) => lap_time,
            Err(e) => {
                debug!(error = %e, "Racing line rejected");
                f64::INFINITY
            }
        }
    }

    fn dim(&self) -> usize {
        self.sectors.len()
    }

    fn boundaries(&self) -> Array1<f64> {
        self.sectors.boundaries()
    }
}

/// Outcome of one optimization run.
#[derive(Debug, Clone, Serialize)]
pub struct RacingLineSolution {
    pub seed: Option<u64>,
    pub sectors: Sectors,
    /// Best offset of every sector, measured from its inside point.
    pub offsets: Array1<f64>,
    pub racing_line: Vec<Point>,
    pub lap_time: f64,
    pub profile: LapProfile,
    /// Global best lap time after initialization and after every iteration.
    pub cost_history: Vec<f64>,
    pub position_history: Vec<Array1<f64>>,
    pub elapsed: Duration,
}

impl RacingLineSolution {
    pub fn iterations(&self) -> usize {
        self.cost_history.len().saturating_sub(1)
    }

    /// Racing line held as global best at history entry `index`.
    pub fn racing_line_at(&self, index: usize) -> Option<Vec<Point>> {
        self.position_history
            .get(index)
            .map(|offsets| sectors_to_racing_line(offsets, &self.sectors.inside, &self.sectors.outside))
    }

    pub fn lap_time_at(&self, index: usize) -> Option<f64> {
        self.cost_history.get(index).copied()
    }
}

/// Sector geometry and lap-time model of one track.
#[derive(Debug, Clone)]
pub struct RacingLinePlanner {
    config: RunConfig,
    borders: TrackBorders,
    sectors: Sectors,
    model: LapTimeModel,
}

impl RacingLinePlanner {
    pub fn new(track: &Track, config: RunConfig) -> RacingLineResult<Self> {
        config.validate()?;

        let borders = TrackBorders::from_track(track)?;
        let sectors = define_sectors(
            &borders.center,
            &borders.inside,
            &borders.outside,
            config.n_sectors,
            config.border_samples,
        )?;
        let model = LapTimeModel::new(&config.vehicle, config.spline_samples);

        info!(
            sectors = sectors.len(),
            track_length = borders.center.length(),
            width = track.width,
            "Track prepared"
        );

        Ok(Self {
            config,
            borders,
            sectors,
            model,
        })
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    pub fn borders(&self) -> &TrackBorders {
        &self.borders
    }

    pub fn sectors(&self) -> &Sectors {
        &self.sectors
    }

    pub fn model(&self) -> &LapTimeModel {
        &self.model
    }

    pub fn problem(&self) -> LapTimeProblem<'_> {
        LapTimeProblem::new(&self.sectors, &self.model)
    }

    /// Runs with the configured seed.
    pub fn plan(&self) -> RacingLineResult<RacingLineSolution> {
        self.run(self.config.seed, self.config.verbose)
    }

    pub fn plan_with_seed(&self, seed: Option<u64>) -> RacingLineResult<RacingLineSolution> {
        self.run(seed, self.config.verbose)
    }

    /// One independent run per seed, in parallel. Progress output is
    /// suppressed; solutions come back in seed order.
    pub fn plan_batch(&self, seeds: &[u64]) -> RacingLineResult<Vec<RacingLineSolution>> {
        info!(runs = seeds.len(), "Starting batch");
        seeds
            .par_iter()
            .map(|&seed| self.run(Some(seed), false))
            .collect()
    }

    /// Lap time of the line through the middle of every sector.
    pub fn baseline_lap_time(&self) -> RacingLineResult<f64> {
        let offsets = self.sectors.boundaries() / 2.0;
        self.model.lap_time(&self.problem().racing_line(&offsets))
    }

    fn run(&self, seed: Option<u64>, verbose: bool) -> RacingLineResult<RacingLineSolution> {
        let solver = self.config.solver(seed).with_verbose(verbose);
        let result = solver.solve(&self.problem())?;
        self.solution(seed, result)
    }

    fn solution(&self, seed: Option<u64>, result: OptimizationResult) -> RacingLineResult<RacingLineSolution> {
        if !result.best_fitness.is_finite() {
            return Err(RacingLineError::DegenerateTrack(format!(
                "no valid racing line after {} iterations over {} sectors",
                result.iterations(),
                self.sectors.len()
            )));
        }

        let racing_line = self.problem().racing_line(&result.best_variables);
        let profile = self.model.profile(&racing_line)?;

        info!(
            seed = ?seed,
            lap_time = result.best_fitness,
            elapsed_ms = result.elapsed.as_millis() as u64,
            "Racing line found"
        );

        Ok(RacingLineSolution {
            seed,
            sectors: self.sectors.clone(),
            offsets: result.best_variables,
            racing_line,
            lap_time: result.best_fitness,
            profile,
            cost_history: result.history,
            position_history: result.position_history,
            elapsed: result.elapsed,
        })
    }
}

/// Fastest solution; the earliest one wins a tie.
pub fn fastest(solutions: &[RacingLineSolution]) -> Option<&RacingLineSolution> {
    solutions.iter().fold(None, |best, s| match best {
        Some(b) if !improves(s.lap_time, b.lap_time) => Some(b),
        _ => Some(s),
    })
}
