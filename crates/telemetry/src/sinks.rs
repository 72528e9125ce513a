// Path: crates/telemetry/src/sinks.rs
//! Defines abstract traits for metrics reporting, decoupling core logic from the backend.

use once_cell::sync::OnceCell;

/// A no-op sink for use in tests or when telemetry is disabled.
#[derive(Debug, Clone, Copy)]
pub struct NopSink;

/// A lazily-initialized static reference to the global validation metrics sink.
pub static SINK: OnceCell<&'static dyn ValidationMetricsSink> = OnceCell::new();
static NOP_SINK: NopSink = NopSink;

/// Returns a static reference to the configured validation metrics sink.
/// If no sink has been initialized, it returns a no-op sink.
pub fn validation_metrics() -> &'static dyn ValidationMetricsSink {
    SINK.get().copied().unwrap_or(&NOP_SINK)
}

/// A sink for metrics related to key-level endorsement validation.
pub trait ValidationMetricsSink: Send + Sync + std::fmt::Debug {
    /// Increments the counter of policy evaluations, labeled by the policy
    /// kind (`"chaincode"` or `"key_level"`).
    fn inc_policy_evaluations(&self, kind: &'static str);
    /// Increments the counter of transactions whose dependency extraction was
    /// skipped, labeled by the decode step that failed.
    fn inc_extraction_skipped(&self, step: &'static str);
    /// Increments the counter of reported validation outcomes, labeled by
    /// outcome code (`"VALID"` or an error code).
    fn inc_tx_outcome(&self, outcome: &'static str);
}

impl ValidationMetricsSink for NopSink {
    fn inc_policy_evaluations(&self, _kind: &'static str) {}
    fn inc_extraction_skipped(&self, _step: &'static str) {}
    fn inc_tx_outcome(&self, _outcome: &'static str) {}
}
