//! Particle and swarm state for the PSO engine.
//!
//! Positions live in `[0, B[i]]` and velocities in `[-B[i], B[i]]` for every
//! dimension `i`. Both invariants are re-established after every update.

use ndarray::Array1;
use rand::Rng;
use serde::Serialize;

/// One candidate solution plus its search memory.
#[derive(Clone, Debug, Serialize)]
pub struct Particle {
    pub position: Array1<f64>,
    pub velocity: Array1<f64>,
    pub best_position: Array1<f64>,
    /// Cost of `best_position`. Never re-evaluated: the objective is pure.
    pub best_cost: f64,
}

impl Particle {
    /// Random particle inside the search space. `best_cost` is left at
    /// infinity until the caller evaluates it.
    pub fn random<R: Rng>(boundaries: &Array1<f64>, rng: &mut R) -> Self {
        let position = boundaries.mapv(|b| uniform(rng, 0.0, b));
        let velocity = boundaries.mapv(|b| uniform(rng, -b, b));

        Self {
            best_position: position.clone(),
            position,
            velocity,
            best_cost: f64::INFINITY,
        }
    }

    /// Applies one velocity/position step.
    ///
    /// `rp` and `rg` are shared by every dimension of this step.
    #[allow(clippy::too_many_arguments)]
    pub fn step(
        &mut self,
        global_best: &Array1<f64>,
        boundaries: &Array1<f64>,
        w: f64,
        cp: f64,
        cg: f64,
        rp: f64,
        rg: f64,
    ) {
        for i in 0..self.position.len() {
            let bound = boundaries[i];
            let x = self.position[i];

            let v = w * self.velocity[i]
                + cp * rp * (self.best_position[i] - x)
                + cg * rg * (global_best[i] - x);
            let v = v.clamp(-bound, bound);

            self.velocity[i] = v;
            self.position[i] = (x + v).clamp(0.0, bound);
        }
    }

    /// Adopts the current position as personal best when `cost` improves on it.
    pub fn remember_if_better(&mut self, cost: f64) -> bool {
        if improves(cost, self.best_cost) {
            self.best_position.assign(&self.position);
            self.best_cost = cost;
            true
        } else {
            false
        }
    }
}

/// Swarm-wide best. Only changed through [`GlobalBest::propose`].
#[derive(Clone, Debug, Serialize)]
pub struct GlobalBest {
    pub position: Array1<f64>,
    pub cost: f64,
}

impl GlobalBest {
    /// Reduces the swarm to its best personal best, seeded with the first
    /// particle. Ties keep the earlier particle.
    ///
    /// Returns `None` for an empty swarm.
    pub fn from_swarm(particles: &[Particle]) -> Option<Self> {
        let (first, rest) = particles.split_first()?;
        let seed = Self {
            position: first.best_position.clone(),
            cost: first.best_cost,
        };

        Some(rest.iter().fold(seed, |mut best, particle| {
            best.propose(&particle.best_position, particle.best_cost);
            best
        }))
    }

    /// Replaces the incumbent when `cost` is a strict improvement.
    pub fn propose(&mut self, position: &Array1<f64>, cost: f64) -> bool {
        if improves(cost, self.cost) {
            self.position.assign(position);
            self.cost = cost;
            true
        } else {
            false
        }
    }
}

/// Strict improvement test used for every best-so-far comparison.
///
/// A non-finite candidate never improves. A finite candidate always improves
/// on a non-finite incumbent.
pub fn improves(candidate: f64, incumbent: f64) -> bool {
    candidate.is_finite() && (!incumbent.is_finite() || candidate < incumbent)
}

fn uniform<R: Rng>(rng: &mut R, low: f64, high: f64) -> f64 {
    if high > low {
        rng.gen_range(low..=high)
    } else {
        low
    }
}
