//! Multi-start driver: run the solver `n_multistart` times with
//! independent deterministic seeds, recovering per-run
//! failures (`EmptyRoi`, or any other error) as `+∞` rather than
//! propagating them, then select the best finite result.

use ti_core::{ProgressSink, TiError, TiResult};

use crate::config::FlexConfig;
use crate::traits::{BlackBoxObjective, SolverBackend, SolverOutcome};

#[derive(Debug, Clone)]
pub struct MultistartRunRecord {
    pub run_index: usize,
    pub seed: u64,
    pub value: f64,
    pub position: Option<Vec<f64>>,
    pub failed: bool,
}

#[derive(Debug, Clone)]
pub struct MultistartResult {
    pub runs: Vec<MultistartRunRecord>,
    pub best_index: usize,
}

pub fn run_multistart(
    backend: &dyn SolverBackend,
    objective: &dyn BlackBoxObjective,
    config: &FlexConfig,
    sink: &dyn ProgressSink,
) -> TiResult<MultistartResult> {
    config.validate()?;

    let mut runs = Vec::with_capacity(config.n_multistart);
    for run_index in 0..config.n_multistart {
        if sink.is_cancelled() {
            sink.warn("flex-search multi-start cancelled");
            return Err(TiError::Cancelled);
        }
        let seed = config.run_seed(run_index);
        match backend.minimize(objective, &config.solver, seed) {
            Ok(SolverOutcome {
                best_value,
                best_position,
                ..
            }) if best_value.is_finite() => {
                sink.info(&format!("flex run {run_index}: value={best_value:.6}"));
                runs.push(MultistartRunRecord {
                    run_index,
                    seed,
                    value: best_value,
                    position: Some(best_position),
                    failed: false,
                });
            }
            Ok(_) => {
                sink.warn(&format!("flex run {run_index}: solver returned a non-finite value"));
                runs.push(MultistartRunRecord {
                    run_index,
                    seed,
                    value: f64::INFINITY,
                    position: None,
                    failed: true,
                });
            }
            Err(err) => {
                sink.warn(&format!("flex run {run_index} failed: {err}"));
                runs.push(MultistartRunRecord {
                    run_index,
                    seed,
                    value: f64::INFINITY,
                    position: None,
                    failed: true,
                });
            }
        }
    }

    let best_index = runs
        .iter()
        .enumerate()
        .filter(|(_, r)| !r.failed)
        .min_by(|(_, a), (_, b)| a.value.partial_cmp(&b.value).unwrap())
        .map(|(i, _)| i)
        .ok_or_else(|| TiError::NoValidRuns(format!("all {} multi-start runs failed", config.n_multistart)))?;

    Ok(MultistartResult { runs, best_index })
}
