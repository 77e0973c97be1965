//! Progress notification port
//!
//! One short human-readable note per loop iteration, in order. Sinks are
//! fire-and-forget: the loop never waits on a consumer, and delivery is
//! best-effort if the process dies mid-run.

/// Receives ordered progress notes during a synergy run
pub trait ProgressSink: Send + Sync {
    fn on_step(&self, note: &str);
}

/// No-op sink for when progress reporting is not needed
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn on_step(&self, _note: &str) {}
}
