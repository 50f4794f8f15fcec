pub mod pso;

pub use pso::{optimize, PSOSolver, DEFAULT_CG, DEFAULT_CP, DEFAULT_W};
