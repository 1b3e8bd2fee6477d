//! Command-line surface: subcommands, ROI method, goal, and postproc
//! shapes mirror the underlying config structs one-to-one.

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(name = "ti-optim", author, version, about, long_about = None)]
pub struct Cli {
    /// Set the logging level
    #[arg(long, default_value = "info")]
    pub log_level: tracing::Level,

    /// Project directory root; subcommands write under `<project-dir>/<out>`.
    #[arg(long)]
    pub project_dir: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Exhaustive enumeration over an electrode/current grid.
    ExSearch {
        /// Path to the leadfield artifact.
        #[arg(long)]
        leadfield: String,
        #[command(flatten)]
        roi: RoiArgs,
        /// First-channel "+" electrode candidates (comma separated).
        #[arg(long, value_delimiter = ',')]
        e1_plus: Vec<String>,
        /// First-channel "-" electrode candidates (comma separated).
        #[arg(long, value_delimiter = ',')]
        e1_minus: Vec<String>,
        /// Second-channel "+" electrode candidates (comma separated).
        #[arg(long, value_delimiter = ',')]
        e2_plus: Vec<String>,
        /// Second-channel "-" electrode candidates (comma separated).
        #[arg(long, value_delimiter = ',')]
        e2_minus: Vec<String>,
        /// Total current across both channels, in mA.
        #[arg(long)]
        current: f64,
        /// Current-ratio grid step, in mA.
        #[arg(long, default_value_t = 0.2)]
        current_step: f64,
        /// Largest current any one channel may carry, in mA.
        #[arg(long)]
        channel_limit: f64,
        /// Worker threads (`0` picks the number of CPUs).
        #[arg(long, default_value_t = 0)]
        cpus: usize,
        /// Output directory.
        #[arg(short, long, default_value = "ex_search_out")]
        out: String,
    },
    /// Continuous black-box optimization via multi-start differential evolution.
    FlexSearch {
        #[arg(long)]
        leadfield: String,
        #[command(flatten)]
        roi: RoiArgs,
        /// Optimization goal.
        #[arg(long, value_enum, default_value_t = GoalArg::Mean)]
        goal: GoalArg,
        /// Post-processing of the composed field.
        #[arg(long, value_enum, default_value_t = PostProc::MaxTi)]
        postproc: PostProc,
        /// `nonroi_threshold,roi_threshold` in V/m, required for `--goal focality`.
        #[arg(long, value_delimiter = ',')]
        thresholds: Vec<f64>,
        /// Largest current any one channel may carry, in mA.
        #[arg(long)]
        channel_limit: f64,
        /// Number of independent random-start optimizer runs.
        #[arg(long, default_value_t = 8)]
        n_multistart: usize,
        /// Differential-evolution population size.
        #[arg(long, default_value_t = 40)]
        population_size: usize,
        /// Differential-evolution generation budget.
        #[arg(long, default_value_t = 200)]
        max_iterations: usize,
        /// Worker threads hint passed to the solver backend.
        #[arg(long, default_value_t = 0)]
        cpus: usize,
        /// Session seed; per-run seeds are derived from it deterministically.
        #[arg(long, default_value_t = 0)]
        session_seed: u64,
        /// Output directory.
        #[arg(short, long, default_value = "flex_search_out")]
        out: String,
    },
    /// Grid of focality-goal flex-search runs across ROI/non-ROI threshold percentages.
    ParetoSweep {
        #[arg(long)]
        leadfield: String,
        #[command(flatten)]
        roi: RoiArgs,
        /// ROI threshold percentages (comma separated), outer loop.
        #[arg(long, value_delimiter = ',')]
        roi_pcts: Vec<f64>,
        /// Non-ROI threshold percentages (comma separated), inner loop.
        #[arg(long, value_delimiter = ',')]
        nonroi_pcts: Vec<f64>,
        /// The achievable ROI mean (V/m) that percentages scale against.
        #[arg(long)]
        achievable_roi_mean: f64,
        /// Largest current any one channel may carry, in mA.
        #[arg(long)]
        channel_limit: f64,
        /// Independent random-start runs per grid point.
        #[arg(long, default_value_t = 4)]
        n_multistart: usize,
        /// Differential-evolution population size per grid point.
        #[arg(long, default_value_t = 40)]
        population_size: usize,
        /// Differential-evolution generation budget per grid point.
        #[arg(long, default_value_t = 200)]
        max_iterations: usize,
        /// Session seed; per-point seeds are derived from it deterministically.
        #[arg(long, default_value_t = 0)]
        session_seed: u64,
        /// Output directory.
        #[arg(short, long, default_value = "pareto_sweep_out")]
        out: String,
    },
}

#[derive(clap::Args, Debug, Clone)]
pub struct RoiArgs {
    /// ROI resolution method.
    #[arg(long, value_enum, default_value_t = RoiMethod::Spherical)]
    pub roi_method: RoiMethod,
    /// Sphere center X, in mm (spherical mode). Falls back to `ROI_X`.
    #[arg(long)]
    pub roi_x: Option<f64>,
    /// Sphere center Y, in mm (spherical mode). Falls back to `ROI_Y`.
    #[arg(long)]
    pub roi_y: Option<f64>,
    /// Sphere center Z, in mm (spherical mode). Falls back to `ROI_Z`.
    #[arg(long)]
    pub roi_z: Option<f64>,
    /// Sphere radius, in mm (spherical mode). Falls back to `ROI_RADIUS`.
    #[arg(long)]
    pub roi_radius: Option<f64>,
    /// Atlas file path (`atlas`/`subcortical` modes).
    #[arg(long)]
    pub atlas_path: Option<String>,
    /// Atlas label or subcortical parcel name/id.
    #[arg(long)]
    pub roi_name: Option<String>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoiMethod {
    Spherical,
    Atlas,
    Subcortical,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum GoalArg {
    Mean,
    Max,
    Focality,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostProc {
    MaxTi,
    DirTiNormal,
    DirTiTangential,
}
