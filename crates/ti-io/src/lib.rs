//! File-format I/O for the TI optimization core: the leadfield/atlas
//! binary container, electrode-set helpers, and the JSON/CSV result
//! writers used by ex-search, flex-search, and Pareto sweeping.

pub mod atlas;
pub mod container;
pub mod electrodes;
pub mod leadfield_loader;

pub use atlas::load_atlas_tags;
pub use container::{Container, DType, Section};
pub use electrodes::nearest_electrode;
pub use leadfield_loader::load as load_leadfield;
