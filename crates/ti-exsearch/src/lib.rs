//! Exhaustive ex-search scheduling: Cartesian enumeration of
//! electrode/current combinations, parallel evaluation via `ti-field`,
//! and result writing.

pub mod config;
pub mod histogram;
pub mod montage;
pub mod output;
pub mod ratios;
pub mod scheduler;

pub use config::ExSearchConfig;
pub use histogram::write_montage_distributions;
pub use montage::{json_key, montage_display, montage_key};
pub use output::{write_analysis_json, write_final_csv};
pub use ratios::generate_current_ratios;
pub use scheduler::{run_ex_search, MontageRecord};
