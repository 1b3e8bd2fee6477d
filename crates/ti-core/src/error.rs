//! Unified error type for the TI optimization core.
//!
//! Mirrors the role of a single crate-wide error enum: every subsystem
//! (leadfield loading, ROI resolution, field evaluation, scheduling,
//! optimization) converts its failures into [`TiError`] at its public
//! boundary so callers only ever match on one type.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TiError {
    /// I/O errors (file access, etc.)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed CLI flag, missing required argument, illegal sweep grid.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Missing leadfield, mesh, or atlas file.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Leadfield magic bytes / shape / field names wrong.
    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    /// A required field is absent from a container file.
    #[error("Missing field: {0}")]
    MissingField(String),

    /// A dataset's shape does not match what was declared or expected.
    #[error("Invalid shape: {0}")]
    InvalidShape(String),

    /// ROI mask resolved (or became, mid-trial) empty.
    #[error("Empty ROI: {0}")]
    EmptyRoi(String),

    /// Tensor/array shapes inconsistent with the leadfield.
    #[error("Dimension mismatch: {0}")]
    DimensionMismatch(String),

    /// Solver raised internally; caller should score the trial as failed.
    #[error("Numerical failure: {0}")]
    NumericalFailure(String),

    /// Cooperative cancellation observed at a checkpoint.
    #[error("Cancelled")]
    Cancelled,

    /// Every multi-start run failed or returned a non-finite value.
    #[error("No valid runs: {0}")]
    NoValidRuns(String),

    /// Configuration parsing/validation errors.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generic errors (wrapping external errors).
    #[error("{0}")]
    Other(String),
}

pub type TiResult<T> = Result<T, TiError>;

impl From<anyhow::Error> for TiError {
    fn from(err: anyhow::Error) -> Self {
        TiError::Other(err.to_string())
    }
}

impl From<String> for TiError {
    fn from(s: String) -> Self {
        TiError::Other(s)
    }
}

impl From<&str> for TiError {
    fn from(s: &str) -> Self {
        TiError::Other(s.to_string())
    }
}

impl From<serde_json::Error> for TiError {
    fn from(err: serde_json::Error) -> Self {
        TiError::InvalidFormat(err.to_string())
    }
}

impl TiError {
    /// True for errors that a per-trial evaluation should recover from
    /// locally (§7: `EmptyRoi`, `NumericalFailure`) rather than abort a
    /// whole ex-search/flex/sweep run.
    pub fn is_recoverable_per_trial(&self) -> bool {
        matches!(self, TiError::EmptyRoi(_) | TiError::NumericalFailure(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = TiError::EmptyRoi("sphere ROI matched no elements".into());
        assert!(err.to_string().contains("Empty ROI"));
        assert!(err.is_recoverable_per_trial());
    }

    #[test]
    fn dimension_mismatch_not_recoverable_per_trial() {
        let err = TiError::DimensionMismatch("N mismatch".into());
        assert!(!err.is_recoverable_per_trial());
    }

    #[test]
    fn io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let ti_err: TiError = io_err.into();
        assert!(matches!(ti_err, TiError::Io(_)));
    }
}
