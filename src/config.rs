//! Run configuration
//!
//! Defaults reproduce the tuned racing line setup. A YAML file may override
//! any subset of the keys:
//!
//! ```yaml
//! n_sectors: 30
//! n_iterations: 200
//! seed: 7
//! vehicle:
//!   friction: 0.2
//! ```

use std::fs;
use std::path::Path;

use racing_line_optimization::algorithms::{PSOSolver, DEFAULT_CG, DEFAULT_CP, DEFAULT_W};
use racing_line_optimization::SolverConfig;
use serde::{Deserialize, Serialize};

use crate::error::{RacingLineError, RacingLineResult};
use crate::geometry::sectors::MIN_SECTORS;

pub const DEFAULT_SECTORS: usize = 40;
pub const DEFAULT_PARTICLES: usize = 60;
pub const DEFAULT_ITERATIONS: usize = 150;
pub const DEFAULT_SPLINE_SAMPLES: usize = 1000;
pub const DEFAULT_BORDER_SAMPLES: usize = 1000;

/// Vehicle parameters of the lap-time model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VehicleConfig {
    /// Tyre friction coefficient
    pub friction: f64,
    /// Gravitational acceleration (m/s^2)
    pub gravity: f64,
    /// Top speed (m/s)
    pub max_speed: f64,
}

impl Default for VehicleConfig {
    fn default() -> Self {
        Self {
            friction: 0.13,
            gravity: 9.81,
            max_speed: 10.0,
        }
    }
}

/// Everything needed to plan a racing line on one track.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    pub n_sectors: usize,
    pub n_particles: usize,
    pub n_iterations: usize,
    /// Inertia weight
    pub w: f64,
    /// Cognitive weight
    pub cp: f64,
    /// Social weight
    pub cg: f64,
    /// Seed for reproducible runs (None = fresh entropy)
    pub seed: Option<u64>,
    pub verbose: bool,
    pub vehicle: VehicleConfig,
    /// Spline samples per lap evaluation
    pub spline_samples: usize,
    /// Border samples used to project sector end points
    pub border_samples: usize,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            n_sectors: DEFAULT_SECTORS,
            n_particles: DEFAULT_PARTICLES,
            n_iterations: DEFAULT_ITERATIONS,
            w: DEFAULT_W,
            cp: DEFAULT_CP,
            cg: DEFAULT_CG,
            seed: None,
            verbose: false,
            vehicle: VehicleConfig::default(),
            spline_samples: DEFAULT_SPLINE_SAMPLES,
            border_samples: DEFAULT_BORDER_SAMPLES,
        }
    }
}

impl RunConfig {
    pub fn from_yaml_str(yaml: &str) -> RacingLineResult<Self> {
        let config: RunConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_yaml_file(path: impl AsRef<Path>) -> RacingLineResult<Self> {
        let text = fs::read_to_string(path.as_ref())?;
        Self::from_yaml_str(&text)
    }

    pub fn validate(&self) -> RacingLineResult<()> {
        if self.n_sectors < MIN_SECTORS {
            return Err(RacingLineError::TooFewSectors {
                min: MIN_SECTORS,
                got: self.n_sectors,
            });
        }
        if self.n_particles == 0 {
            return Err(RacingLineError::InvalidConfig(
                "n_particles must be greater than zero".to_string(),
            ));
        }
        if self.spline_samples < 2 || self.border_samples < 2 {
            return Err(RacingLineError::InvalidConfig(
                "spline_samples and border_samples must be at least 2".to_string(),
            ));
        }
        let v = &self.vehicle;
        if [v.friction, v.gravity, v.max_speed]
            .iter()
            .any(|x| !x.is_finite() || *x <= 0.0)
        {
            return Err(RacingLineError::InvalidConfig(format!(
                "vehicle parameters must be positive, got {:?}",
                v
            )));
        }
        Ok(())
    }

    pub fn solver_config(&self) -> SolverConfig {
        SolverConfig {
            population_size: self.n_particles,
            max_iterations: self.n_iterations,
        }
    }

    /// Solver for this configuration, seeded with `seed` when given.
    pub fn solver(&self, seed: Option<u64>) -> PSOSolver {
        let solver = PSOSolver::new(self.solver_config())
            .with_coefficients(self.w, self.cp, self.cg)
            .with_verbose(self.verbose);
        match seed {
            Some(seed) => solver.with_seed(seed),
            None => solver,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = RunConfig::default();
        assert_eq!(config.n_sectors, 40);
        assert_eq!(config.n_particles, 60);
        assert_eq!(config.n_iterations, 150);
        assert_eq!((config.w, config.cp, config.cg), (-0.2256, -0.1564, 3.8876));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config = RunConfig::from_yaml_str("n_sectors: 12\nseed: 5\nvehicle:\n  friction: 0.2\n").unwrap();

        assert_eq!(config.n_sectors, 12);
        assert_eq!(config.seed, Some(5));
        assert_eq!(config.vehicle.friction, 0.2);
        assert_eq!(config.vehicle.max_speed, 10.0);
        assert_eq!(config.n_particles, 60);
    }

    #[test]
    fn test_invalid_configs() {
        assert!(matches!(
            RunConfig::from_yaml_str("n_sectors: 2"),
            Err(RacingLineError::TooFewSectors { .. })
        ));
        assert!(matches!(
            RunConfig::from_yaml_str("n_particles: 0"),
            Err(RacingLineError::InvalidConfig(_))
        ));
        assert!(matches!(
            RunConfig::from_yaml_str("vehicle:\n  gravity: -1.0"),
            Err(RacingLineError::InvalidConfig(_))
        ));
        assert!(matches!(
            RunConfig::from_yaml_str("n_sectors: [1, 2]"),
            Err(RacingLineError::Yaml(_))
        ));
    }

    #[test]
    fn test_solver_carries_coefficients() {
        let config = RunConfig {
            w: 0.5,
            cp: 1.0,
            cg: 1.5,
            n_iterations: 3,
            ..RunConfig::default()
        };
        let solver = config.solver(Some(9));

        assert_eq!((solver.w, solver.cp, solver.cg), (0.5, 1.0, 1.5));
        assert_eq!(solver.seed, Some(9));
        assert_eq!(solver.config.max_iterations, 3);
    }
}
