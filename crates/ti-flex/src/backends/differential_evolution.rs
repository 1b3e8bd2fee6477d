//! Wrapper around the `differential-evolution` crate's population-based
//! search, the external evolutionary library this core ships as its one
//! solver. Kept in its own module so a future backend swap (or a
//! version bump of this crate) touches one file.
//!
//! The crate works in `f32` and drives its population through an
//! iterator (each `.next()`/`.nth()` step evolves one generation) rather
//! than an explicit `evolve()` method, so this module does the
//! `f64`/`f32` conversion at the boundary and threads a seeded RNG
//! through `self_adaptive_de_with_rng` so distinct multi-start seeds
//! explore distinct, reproducible regions.

use differential_evolution::self_adaptive_de_with_rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use ti_core::{TiError, TiResult};

use crate::traits::{BlackBoxObjective, SolverBackend, SolverConfig, SolverOutcome};

pub struct DifferentialEvolutionBackend;

impl SolverBackend for DifferentialEvolutionBackend {
    fn id(&self) -> &str {
        "differential_evolution"
    }

    fn minimize(
        &self,
        objective: &dyn BlackBoxObjective,
        config: &SolverConfig,
        seed: u64,
    ) -> TiResult<SolverOutcome> {
        let bounds = objective.bounds();
        if bounds.len() != objective.dimension() {
            return Err(TiError::Config(format!(
                "objective declared dimension {} but returned {} bounds",
                objective.dimension(),
                bounds.len()
            )));
        }
        let bounds_f32: Vec<(f32, f32)> = bounds
            .iter()
            .map(|&(lo, hi)| (lo as f32, hi as f32))
            .collect();

        let rng = ChaCha8Rng::seed_from_u64(seed);
        let mut population = self_adaptive_de_with_rng(bounds_f32, rng, |x: &[f32]| {
            let x64: Vec<f64> = x.iter().map(|&v| v as f64).collect();
            objective.evaluate(&x64).unwrap_or(f64::INFINITY) as f32
        });

        let generations_run = config.max_generations;
        if generations_run > 0 {
            population.iter().nth(generations_run - 1);
        }

        let (best_value, best_position) = population
            .best()
            .ok_or_else(|| TiError::NumericalFailure("differential evolution produced no population".into()))?;

        let best_value = *best_value as f64;
        if !best_value.is_finite() {
            return Err(TiError::NumericalFailure(
                "differential evolution best value is not finite".into(),
            ));
        }

        Ok(SolverOutcome {
            best_value,
            best_position: best_position.iter().map(|&v| v as f64).collect(),
            generations_run,
        })
    }
}
