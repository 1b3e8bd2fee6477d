//! The field engine: channel field assembly, TI envelope formulas,
//! and volume-weighted ROI reduction. The numerical heart of the
//! optimization core; everything else (ex-search, flex-search, Pareto
//! sweeping) calls into this crate for every evaluation.

pub mod channel;
pub mod envelope;
pub mod reduce;

pub use channel::{channel_field, field_at};
pub use envelope::{mti_max, ti_envelope, ti_normal};
pub use reduce::{reduce_roi, RoiMetrics};
