use racing_line_optimization::algorithms::*;
use racing_line_optimization::common::*;
use ndarray::{Array1, array};

struct SphereProblem;

impl Problem for SphereProblem {
    fn objective(&self, variables: &Array1<f64>) -> f64 {
        variables.iter().map(|&x| x * x).sum()
    }

    fn dim(&self) -> usize { 2 }

    fn boundaries(&self) -> Array1<f64> {
        array![1.0, 1.0]
    }
}

fn scenario_solver(seed: u64) -> PSOSolver {
    let config = SolverConfig { population_size: 5, max_iterations: 10 };
    PSOSolver::new(config)
        .with_coefficients(0.5, 1.0, 1.0)
        .with_seed(seed)
}

#[test]
fn test_pso_sphere_scenario() {
    let problem = SphereProblem;
    let mut converged = 0;

    for seed in 0..20 {
        let result = scenario_solver(seed).solve(&problem).unwrap();

        for pair in result.history.windows(2) {
            assert!(pair[1] <= pair[0], "cost history increased: {:?}", result.history);
        }
        if result.best_fitness < 0.1 {
            converged += 1;
        }
    }

    assert!(converged >= 18, "only {} of 20 seeded runs reached cost < 0.1", converged);
}

#[test]
fn test_pso_history_cardinality() {
    let problem = SphereProblem;
    for iterations in [0, 1, 7, 25] {
        let config = SolverConfig { population_size: 4, max_iterations: iterations };
        let result = PSOSolver::new(config).with_seed(11).solve(&problem).unwrap();

        assert_eq!(result.history.len(), iterations + 1);
        assert_eq!(result.position_history.len(), iterations + 1);
        assert_eq!(result.iterations(), iterations);
    }
}

#[test]
fn test_pso_best_position_consistency() {
    let problem = SphereProblem;
    let result = scenario_solver(5).solve(&problem).unwrap();

    let recomputed = problem.objective(&result.best_variables);
    assert!((recomputed - result.best_fitness).abs() < 1e-12);
    assert_eq!(result.position_history.last(), Some(&result.best_variables));
    assert_eq!(result.history.last(), Some(&result.best_fitness));

    for (position, cost) in result.position_history.iter().zip(&result.history) {
        assert!((problem.objective(position) - cost).abs() < 1e-12);
    }
}

#[test]
fn test_pso_zero_iterations_returns_initial_best() {
    let problem = SphereProblem;
    let config = SolverConfig { population_size: 6, max_iterations: 0 };
    let mut initial_best = f64::INFINITY;

    let result = PSOSolver::new(config)
        .with_seed(21)
        .solve_observed(&problem, |iter, swarm| {
            assert_eq!(iter, 0);
            initial_best = swarm
                .iter()
                .map(|p| p.best_cost)
                .fold(f64::INFINITY, f64::min);
        })
        .unwrap();

    assert_eq!(result.history, vec![result.best_fitness]);
    assert_eq!(result.best_fitness, initial_best);
}

#[test]
fn test_pso_boundary_invariant_every_iteration() {
    let boundaries = array![3.0, 0.25, 1.0, 10.0];
    let problem = SimpleProblem::new(
        |v: &Array1<f64>| (v[0] - 1.0).powi(2) + (v[3] - 7.5).abs() - v[1],
        boundaries.clone(),
    );
    let config = SolverConfig { population_size: 15, max_iterations: 40 };
    let mut checks = 0;

    PSOSolver::new(config)
        .with_coefficients(0.9, 2.0, 2.0)
        .with_seed(99)
        .solve_observed(&problem, |_, swarm| {
            for particle in swarm {
                for i in 0..boundaries.len() {
                    assert!(0.0 <= particle.position[i] && particle.position[i] <= boundaries[i]);
                    assert!(-boundaries[i] <= particle.velocity[i] && particle.velocity[i] <= boundaries[i]);
                    assert!(0.0 <= particle.best_position[i] && particle.best_position[i] <= boundaries[i]);
                }
                checks += 1;
            }
        })
        .unwrap();

    assert_eq!(checks, 15 * 41);
}

#[test]
fn test_pso_degenerate_dimension_stays_zero() {
    let boundaries = array![1.0, 0.0, 2.0];
    let problem = SimpleProblem::new(|v: &Array1<f64>| (v[0] - 0.5).powi(2) + (v[2] - 1.5).powi(2), boundaries);

    let result = PSOSolver::new(SolverConfig { population_size: 10, max_iterations: 30 })
        .with_seed(4)
        .solve_observed(&problem, |_, swarm| {
            for particle in swarm {
                assert_eq!(particle.position[1], 0.0);
                assert_eq!(particle.velocity[1], 0.0);
            }
        })
        .unwrap();

    assert_eq!(result.best_variables[1], 0.0);
    assert!(result.best_fitness.is_finite());
}

#[test]
fn test_pso_non_finite_costs_never_become_best() {
    // NaN on the right half of the first axis.
    let problem = SimpleProblem::new(
        |v: &Array1<f64>| if v[0] > 0.5 { f64::NAN } else { v[0] + v[1] },
        array![1.0, 1.0],
    );

    for seed in 0..10 {
        let result = PSOSolver::new(SolverConfig { population_size: 8, max_iterations: 20 })
            .with_seed(seed)
            .solve(&problem)
            .unwrap();

        // The seeding particle may be the only one evaluated, and it may be NaN;
        // once any finite cost is seen the best stays finite.
        let first_finite = result.history.iter().position(|c| c.is_finite());
        if let Some(start) = first_finite {
            assert!(result.history[start..].iter().all(|c| c.is_finite()));
            assert!(result.best_variables[0] <= 0.5);
        }
    }
}

#[test]
fn test_optimize_entry_point() {
    let result = optimize(
        |v: &Array1<f64>| v.iter().map(|x| (x - 0.25).powi(2)).sum(),
        3,
        array![1.0, 1.0, 1.0],
        20,
        60,
        0.5,
        1.0,
        1.0,
        false,
    )
    .unwrap();

    assert_eq!(result.history.len(), 61);
    assert!(result.best_fitness < 1e-2, "fitness {}", result.best_fitness);
}

#[test]
fn test_contract_violations_fail_fast() {
    let empty = SimpleProblem::new(|_: &Array1<f64>| 0.0, Array1::zeros(0));
    let mut calls = 0;
    let err = PSOSolver::new(SolverConfig::default())
        .solve_observed(&empty, |_, _| calls += 1)
        .unwrap_err();

    assert!(matches!(err, racing_line_optimization::OptimizationError::EmptySearchSpace));
    assert_eq!(calls, 0);
}

/// Swarm run written out by hand: every particle draws exactly one `rp` and
/// one `rg` per iteration, shared by all of its dimensions.
fn replay_sphere(boundaries: &[f64], particles: usize, iterations: usize, seed: u64, (w, cp, cg): (f64, f64, f64)) -> (Vec<f64>, Vec<f64>) {
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    let cost = |x: &[f64]| -> f64 { x.iter().map(|v| v * v).sum() };
    let mut rng = StdRng::seed_from_u64(seed);

    let mut pos: Vec<Vec<f64>> = Vec::new();
    let mut vel: Vec<Vec<f64>> = Vec::new();
    for _ in 0..particles {
        pos.push(boundaries.iter().map(|&b| rng.gen_range(0.0..=b)).collect());
        vel.push(boundaries.iter().map(|&b| rng.gen_range(-b..=b)).collect());
    }
    let mut best = pos.clone();
    let mut best_cost: Vec<f64> = best.iter().map(|p| cost(&p[..])).collect();

    let mut global = best[0].clone();
    let mut global_cost = best_cost[0];
    for k in 1..particles {
        if best_cost[k] < global_cost {
            global = best[k].clone();
            global_cost = best_cost[k];
        }
    }

    let mut history = vec![global_cost];
    for _ in 0..iterations {
        for k in 0..particles {
            let rp: f64 = rng.gen();
            let rg: f64 = rng.gen();
            for i in 0..boundaries.len() {
                let b = boundaries[i];
                let x = pos[k][i];
                let v = w * vel[k][i] + cp * rp * (best[k][i] - x) + cg * rg * (global[i] - x);
                let v = v.clamp(-b, b);
                vel[k][i] = v;
                pos[k][i] = (x + v).clamp(0.0, b);
            }

            let c = cost(&pos[k][..]);
            if c < best_cost[k] {
                best[k] = pos[k].clone();
                best_cost[k] = c;
                if c < global_cost {
                    global = pos[k].clone();
                    global_cost = c;
                }
            }
        }
        history.push(global_cost);
    }

    (global, history)
}

#[test]
fn test_one_random_pair_per_particle_per_iteration() {
    let boundaries = [1.0, 2.0, 0.5];
    let coefficients = (0.5, 1.0, 1.5);
    let problem = SimpleProblem::new(
        |v: &Array1<f64>| v.iter().map(|x| x * x).sum(),
        Array1::from(boundaries.to_vec()),
    );

    for seed in [3, 17, 99] {
        let result = PSOSolver::new(SolverConfig { population_size: 6, max_iterations: 25 })
            .with_coefficients(coefficients.0, coefficients.1, coefficients.2)
            .with_seed(seed)
            .solve(&problem)
            .unwrap();

        let (best, history) = replay_sphere(&boundaries, 6, 25, seed, coefficients);

        assert_eq!(result.history, history, "seed {}", seed);
        assert_eq!(result.best_variables.to_vec(), best, "seed {}", seed);
    }
}
