//! Cooperative progress reporting and cancellation.
//!
//! Long-running operations (ex-search, flex multi-start, Pareto sweeps)
//! accept a `&dyn ProgressSink` instead of an ad-hoc callback pair. The
//! sink is polled for cancellation only between evaluations (§5); a single
//! evaluation already in flight always runs to completion.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogKind {
    Info,
    Warning,
    Error,
    Debug,
}

pub trait ProgressSink: Send + Sync {
    fn log(&self, kind: LogKind, msg: &str);
    fn is_cancelled(&self) -> bool;

    fn info(&self, msg: &str) {
        self.log(LogKind::Info, msg);
    }
    fn warn(&self, msg: &str) {
        self.log(LogKind::Warning, msg);
    }
    fn error(&self, msg: &str) {
        self.log(LogKind::Error, msg);
    }
}

/// A shared cooperative cancellation flag, flippable from another thread.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    pub fn new() -> Self {
        Self(Arc::new(AtomicBool::new(false)))
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Emits progress through `tracing` at the matching level; cancellation
/// is driven by an internal [`CancellationToken`] the caller can clone out
/// via [`StdoutSink::cancellation_token`] and flip from elsewhere.
pub struct StdoutSink {
    token: CancellationToken,
}

impl StdoutSink {
    pub fn new() -> Self {
        Self {
            token: CancellationToken::new(),
        }
    }

    pub fn cancellation_token(&self) -> CancellationToken {
        self.token.clone()
    }
}

impl Default for StdoutSink {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressSink for StdoutSink {
    fn log(&self, kind: LogKind, msg: &str) {
        match kind {
            LogKind::Info => info!("{msg}"),
            LogKind::Warning => warn!("{msg}"),
            LogKind::Error => error!("{msg}"),
            LogKind::Debug => debug!("{msg}"),
        }
    }

    fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }
}

/// A sink that discards all log output and never cancels. Useful for
/// library callers (and tests) that don't want a progress UI.
#[derive(Debug, Default)]
pub struct NullSink;

impl ProgressSink for NullSink {
    fn log(&self, _kind: LogKind, _msg: &str) {}
    fn is_cancelled(&self) -> bool {
        false
    }
}
