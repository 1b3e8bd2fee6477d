//! Shared data model and utilities for the TI optimization core.
//!
//! Every other crate in this workspace depends on `ti-core` for the
//! leadfield/mesh/ROI types, the unified error type, and the progress and
//! result-writing plumbing; it has no knowledge of ex-search, flex-search,
//! or Pareto sweeping itself.

pub mod channel;
pub mod error;
pub mod geometry;
pub mod leadfield;
pub mod mesh;
pub mod progress;
pub mod result;
pub mod roi;
pub mod units;

pub use channel::{ChannelAssignment, ElectrodePair};
pub use error::{TiError, TiResult};
pub use geometry::Vec3;
pub use leadfield::{ElectrodeMeta, Leadfield};
pub use mesh::{Mesh, GREY_MATTER_TAGS};
pub use progress::{CancellationToken, LogKind, NullSink, ProgressSink, StdoutSink};
pub use result::{write_csv, write_json_pretty};
pub use roi::{resolve as resolve_roi, RoiMask, RoiSpec};
pub use units::{Amperes, Milliamperes};
