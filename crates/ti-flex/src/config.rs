//! Explicit per-run configuration for flex-search.

use serde::{Deserialize, Serialize};
use ti_core::{TiError, TiResult};

use crate::objective::Goal;
use crate::traits::SolverConfig;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlexConfig {
    pub goal: GoalConfig,
    pub channel_limit_ma: f64,
    pub n_multistart: usize,
    pub session_seed: u64,
    pub solver: SolverConfig,
    pub backend: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GoalConfig {
    Mean,
    Max,
    Focality { roi_threshold_vm: f64, nonroi_threshold_vm: f64 },
}

impl GoalConfig {
    pub fn goal(&self) -> Goal {
        match self {
            GoalConfig::Mean => Goal::Mean,
            GoalConfig::Max => Goal::Max,
            GoalConfig::Focality { .. } => Goal::Focality,
        }
    }

    pub fn thresholds(&self) -> Option<(f64, f64)> {
        match self {
            GoalConfig::Focality {
                roi_threshold_vm,
                nonroi_threshold_vm,
            } => Some((*roi_threshold_vm, *nonroi_threshold_vm)),
            _ => None,
        }
    }
}

impl FlexConfig {
    /// Per-run seeds derived deterministically from the session seed, so
    /// a run can be reproduced exactly from its seed and run index.
    pub fn run_seed(&self, run_index: usize) -> u64 {
        self.session_seed
            .wrapping_mul(6364136223846793005)
            .wrapping_add(run_index as u64)
    }

    pub fn validate(&self) -> TiResult<()> {
        if self.n_multistart == 0 {
            return Err(TiError::Config("n_multistart must be at least 1".into()));
        }
        if self.channel_limit_ma <= 0.0 {
            return Err(TiError::Config("channel_limit_mA must be positive".into()));
        }
        Ok(())
    }
}
