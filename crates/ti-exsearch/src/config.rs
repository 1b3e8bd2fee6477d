//! Explicit configuration for an ex-search run, in place of the
//! keyword-argument/env-var configuration style this replaces.

use serde::{Deserialize, Serialize};
use ti_core::{TiError, TiResult};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExSearchConfig {
    pub e1_plus: Vec<String>,
    pub e1_minus: Vec<String>,
    pub e2_plus: Vec<String>,
    pub e2_minus: Vec<String>,
    pub total_current_ma: f64,
    pub current_step_ma: f64,
    pub channel_limit_ma: f64,
    /// Rayon worker count; `0` auto-detects via `num_cpus::get()`.
    #[serde(default)]
    pub threads: usize,
}

impl ExSearchConfig {
    pub fn validate(&self) -> TiResult<()> {
        let k = self.e1_plus.len();
        for (name, set) in [
            ("e1_plus", &self.e1_plus),
            ("e1_minus", &self.e1_minus),
            ("e2_plus", &self.e2_plus),
            ("e2_minus", &self.e2_minus),
        ] {
            if set.len() != k {
                return Err(TiError::Config(format!(
                    "electrode label set '{name}' has length {} but e1_plus has length {k}",
                    set.len()
                )));
            }
            if set.is_empty() {
                return Err(TiError::Config(format!("electrode label set '{name}' is empty")));
            }
        }
        if self.total_current_ma <= 0.0 {
            return Err(TiError::Config("total_current_mA must be positive".into()));
        }
        Ok(())
    }

    pub fn total_combinations(&self) -> usize {
        self.e1_plus.len() * self.e1_minus.len() * self.e2_plus.len() * self.e2_minus.len()
    }
}
