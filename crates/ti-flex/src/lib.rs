//! Flex-search: a black-box multi-start evolutionary optimizer over
//! continuous electrode positions and currents.

pub mod backends;
pub mod config;
pub mod multistart;
pub mod objective;
pub mod output;
pub mod registry;
pub mod traits;

pub use config::{FlexConfig, GoalConfig};
pub use multistart::{run_multistart, MultistartResult, MultistartRunRecord};
pub use objective::{decode, Decoded, FlexObjective, Goal};
pub use output::write_electrode_positions;
pub use registry::SolverRegistry;
pub use traits::{BlackBoxObjective, SolverBackend, SolverConfig, SolverOutcome};
