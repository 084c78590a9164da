use crate::engine::Aggregates;

/// Trait for reporting reconciliation progress.
///
/// The CLI implements it with indicatif bars. All methods have default no-op implementations.
pub trait ProgressReporter: Send + Sync {
    fn on_scan_start(&self, _asset_root: &str) {}
    fn on_scan_complete(&self, _entries: usize, _duration_secs: f64) {}
    fn on_classify_progress(&self, _processed: usize, _total: usize) {}
    fn on_reconcile_complete(&self, _aggregates: &Aggregates, _duration_secs: f64) {}
}

/// No-op progress reporter for silent operation.
pub struct SilentReporter;

impl ProgressReporter for SilentReporter {}
