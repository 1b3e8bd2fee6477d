use std::path::{Path, PathBuf};

use clap::Parser;
use tracing::{error, info, warn};
use tracing_subscriber::FmtSubscriber;

use ti_core::StdoutSink;
use ti_exsearch::{write_analysis_json, write_final_csv, ExSearchConfig};
use ti_flex::{FlexConfig, FlexObjective, Goal, GoalConfig, SolverRegistry};
use ti_sweep::{compute_sweep_grid, save_results, validate_grid, SweepRunConfig};

mod cli;
mod roi;

use cli::{Cli, Commands, GoalArg, PostProc};

fn project_path(project_dir: &Option<String>, out: &str) -> PathBuf {
    match project_dir {
        Some(dir) => Path::new(dir).join(out),
        None => PathBuf::from(out),
    }
}

fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let subscriber = FmtSubscriber::builder().with_max_level(cli.log_level).finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default tracing subscriber failed");

    // The core's cancellation contract is a flag polled
    // between evaluations, not a signal handler; this binary never
    // flips it itself, so every run proceeds to completion or failure.
    let sink = StdoutSink::new();

    match &cli.command {
        Commands::ExSearch {
            leadfield,
            roi,
            e1_plus,
            e1_minus,
            e2_plus,
            e2_minus,
            current,
            current_step,
            channel_limit,
            cpus,
            out,
        } => {
            info!("loading leadfield from {leadfield}");
            let lf = ti_io::load_leadfield(Path::new(leadfield))?;
            let roi_spec = roi::roi_spec_from_args(roi)?;
            let roi_mask = ti_core::resolve_roi(&roi_spec, &lf.mesh)?;

            let config = ExSearchConfig {
                e1_plus: e1_plus.clone(),
                e1_minus: e1_minus.clone(),
                e2_plus: e2_plus.clone(),
                e2_minus: e2_minus.clone(),
                total_current_ma: *current,
                current_step_ma: *current_step,
                channel_limit_ma: *channel_limit,
                threads: *cpus,
            };

            let records = ti_exsearch::run_ex_search(&lf, &config, &roi_mask, &sink)?;
            let out_dir = project_path(&cli.project_dir, out);
            std::fs::create_dir_all(&out_dir)?;
            write_final_csv(&out_dir, &records)?;
            write_analysis_json(&out_dir, &records)?;
            if let Err(err) = ti_exsearch::write_montage_distributions(&out_dir, &records) {
                warn!("montage distribution histogram not rendered: {err}");
            }
            info!("ex-search done: {} montages evaluated, results in {}", records.len(), out_dir.display());
        }
        Commands::FlexSearch {
            leadfield,
            roi,
            goal,
            postproc,
            thresholds,
            channel_limit,
            n_multistart,
            population_size,
            max_iterations,
            cpus,
            session_seed,
            out,
        } => {
            if !matches!(postproc, PostProc::MaxTi) {
                warn!("postproc {postproc:?} requested but this build only carries surface normals-free envelope magnitude (max_TI); falling back to max_TI");
            }

            info!("loading leadfield from {leadfield}");
            let lf = ti_io::load_leadfield(Path::new(leadfield))?;
            let roi_spec = roi::roi_spec_from_args(roi)?;
            let roi_mask = ti_core::resolve_roi(&roi_spec, &lf.mesh)?;

            let (goal_config, goal_kind, focality_thresholds) = match goal {
                GoalArg::Mean => (GoalConfig::Mean, Goal::Mean, None),
                GoalArg::Max => (GoalConfig::Max, Goal::Max, None),
                GoalArg::Focality => {
                    if thresholds.len() != 2 {
                        anyhow::bail!("--goal focality requires --thresholds <nonroi_thr,roi_thr>");
                    }
                    let (nonroi_thr, roi_thr) = (thresholds[0], thresholds[1]);
                    (
                        GoalConfig::Focality {
                            roi_threshold_vm: roi_thr,
                            nonroi_threshold_vm: nonroi_thr,
                        },
                        Goal::Focality,
                        Some((roi_thr, nonroi_thr)),
                    )
                }
            };

            let objective = FlexObjective::new(&lf, roi_mask, goal_kind, *channel_limit, focality_thresholds)?;
            let flex_config = FlexConfig {
                goal: goal_config,
                channel_limit_ma: *channel_limit,
                n_multistart: *n_multistart,
                session_seed: *session_seed,
                solver: ti_flex::traits::SolverConfig {
                    max_generations: *max_iterations,
                    population_size: *population_size,
                    cpu_pool_size: *cpus,
                    ..ti_flex::traits::SolverConfig::default()
                },
                backend: "differential_evolution".into(),
            };

            let registry = SolverRegistry::default();
            let backend = registry.build(&flex_config.backend)?;
            let result = ti_flex::run_multistart(backend.as_ref(), &objective, &flex_config, &sink)?;
            let best = &result.runs[result.best_index];

            let out_dir = project_path(&cli.project_dir, out);
            std::fs::create_dir_all(&out_dir)?;
            if let Some(position) = &best.position {
                ti_flex::write_electrode_positions(&out_dir, &lf, position)?;
            }
            info!(
                "flex-search done: best value {:.6} from run {} (seed {}), results in {}",
                best.value,
                best.run_index,
                best.seed,
                out_dir.display()
            );
        }
        Commands::ParetoSweep {
            leadfield,
            roi,
            roi_pcts,
            nonroi_pcts,
            achievable_roi_mean,
            channel_limit,
            n_multistart,
            population_size,
            max_iterations,
            session_seed,
            out,
        } => {
            validate_grid(roi_pcts, nonroi_pcts)?;

            info!("loading leadfield from {leadfield}");
            let lf = ti_io::load_leadfield(Path::new(leadfield))?;
            let roi_spec = roi::roi_spec_from_args(roi)?;
            let roi_mask = ti_core::resolve_roi(&roi_spec, &lf.mesh)?;

            let out_dir = project_path(&cli.project_dir, out);
            let mut points = compute_sweep_grid(roi_pcts, nonroi_pcts, *achievable_roi_mean, out_dir.to_string_lossy().as_ref());

            let run_config = SweepRunConfig {
                channel_limit_ma: *channel_limit,
                n_multistart: *n_multistart,
                session_seed: *session_seed,
                solver: ti_flex::traits::SolverConfig {
                    max_generations: *max_iterations,
                    population_size: *population_size,
                    ..ti_flex::traits::SolverConfig::default()
                },
                backend: "differential_evolution".into(),
            };

            ti_sweep::run_sweep(&lf, &roi_mask, &mut points, *achievable_roi_mean, &out_dir, &run_config, &sink)?;
            let saved = save_results(&points, *achievable_roi_mean, &out_dir)?;
            info!("pareto sweep done, results in {}", saved.json_path.display());
        }
    }

    Ok(())
}

fn main() {
    if let Err(err) = run() {
        error!("{err:?}");
        std::process::exit(1);
    }
}
