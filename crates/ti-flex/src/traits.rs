//! Solver-facing contracts: the cost function is the only contract this
//! core exposes to the solver, split Strategy-pattern style between the
//! objective (what to minimize) and the backend (how to minimize it).

use serde::{Deserialize, Serialize};
use ti_core::TiResult;

/// A black-box cost function: no hidden state, takes a decision vector,
/// returns a scalar to minimize.
pub trait BlackBoxObjective: Send + Sync {
    fn evaluate(&self, x: &[f64]) -> TiResult<f64>;
    fn dimension(&self) -> usize;
    fn bounds(&self) -> Vec<(f64, f64)>;
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolverConfig {
    pub max_generations: usize,
    pub population_size: usize,
    pub mutation: f64,
    pub recombination: f64,
    pub tolerance: f64,
    /// `0` lets the backend pick a pool size (typically `num_cpus::get()`).
    #[serde(default)]
    pub cpu_pool_size: usize,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            max_generations: 200,
            population_size: 40,
            mutation: 0.8,
            recombination: 0.9,
            tolerance: 1e-6,
            cpu_pool_size: 0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SolverOutcome {
    pub best_value: f64,
    pub best_position: Vec<f64>,
    pub generations_run: usize,
}

/// Implements the actual numerical search: how to solve, as opposed to
/// what to minimize.
pub trait SolverBackend: Send + Sync {
    fn id(&self) -> &str;
    fn minimize(
        &self,
        objective: &dyn BlackBoxObjective,
        config: &SolverConfig,
        seed: u64,
    ) -> TiResult<SolverOutcome>;
}
