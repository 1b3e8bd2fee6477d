//! Drives a focality-goal flex-search run for each point of a validated
//! sweep grid, persisting partial results after every point so a
//! cancelled sweep still leaves a usable `pareto_results.json`.

use std::path::Path;

use ti_core::{Leadfield, ProgressSink, RoiMask, TiError, TiResult};
use ti_flex::{FlexConfig, FlexObjective, Goal, GoalConfig, SolverRegistry};

use crate::grid::{SweepPoint, SweepStatus};
use crate::output::save_results;

pub struct SweepRunConfig {
    pub channel_limit_ma: f64,
    pub n_multistart: usize,
    pub session_seed: u64,
    pub solver: ti_flex::traits::SolverConfig,
    pub backend: String,
}

/// Run flex-search with a `Focality` goal for every point in `points`,
/// in order, writing `pareto_results.json`/`pareto_sweep_plot.png`/
/// `pareto_summary.txt` after each point completes so progress survives
/// a cancellation partway through the grid.
pub fn run_sweep(
    leadfield: &Leadfield,
    roi_mask: &RoiMask,
    points: &mut [SweepPoint],
    achievable_roi_mean: f64,
    output_folder: &Path,
    run_config: &SweepRunConfig,
    sink: &dyn ProgressSink,
) -> TiResult<()> {
    let registry = SolverRegistry::default();
    let backend = registry.build(&run_config.backend)?;

    for idx in 0..points.len() {
        if sink.is_cancelled() {
            sink.warn("pareto sweep cancelled; persisting partial results");
            save_results(points, achievable_roi_mean, output_folder)?;
            return Err(TiError::Cancelled);
        }

        points[idx].status = SweepStatus::Running.as_str().to_string();
        sink.info(&format!(
            "sweep point {}: roi={}% nonroi={}%",
            points[idx].run_index, points[idx].roi_pct, points[idx].nonroi_pct
        ));

        let roi_threshold_vm = points[idx].roi_threshold_vm;
        let nonroi_threshold_vm = points[idx].nonroi_threshold_vm;
        let run_index = points[idx].run_index;

        let flex_config = FlexConfig {
            goal: GoalConfig::Focality {
                roi_threshold_vm,
                nonroi_threshold_vm,
            },
            channel_limit_ma: run_config.channel_limit_ma,
            n_multistart: run_config.n_multistart,
            session_seed: run_config.session_seed.wrapping_add(run_index as u64),
            solver: run_config.solver.clone(),
            backend: run_config.backend.clone(),
        };

        let objective = FlexObjective::new(
            leadfield,
            roi_mask.clone(),
            Goal::Focality,
            run_config.channel_limit_ma,
            Some((roi_threshold_vm, nonroi_threshold_vm)),
        )?;

        match ti_flex::run_multistart(backend.as_ref(), &objective, &flex_config, sink) {
            Ok(result) => {
                let best = &result.runs[result.best_index];
                points[idx].focality_score = Some(best.value);
                points[idx].status = SweepStatus::Done.as_str().to_string();
            }
            Err(TiError::Cancelled) => {
                points[idx].status = SweepStatus::Failed.as_str().to_string();
                save_results(points, achievable_roi_mean, output_folder)?;
                return Err(TiError::Cancelled);
            }
            Err(err) => {
                sink.warn(&format!("sweep point {run_index} failed: {err}"));
                points[idx].focality_score = None;
                points[idx].status = SweepStatus::Failed.as_str().to_string();
            }
        }

        save_results(points, achievable_roi_mean, output_folder)?;
    }

    Ok(())
}
