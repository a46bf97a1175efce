//! Port for structured run logging.
//!
//! Defines the [`RunLogger`] trait for recording run events (page scraped,
//! task extracted, answer computed, verdict received) to a structured log.
//!
//! This is separate from `tracing`-based operation logs: tracing handles
//! human-readable diagnostic messages, while this port captures the full
//! run transcript in a machine-readable format (JSONL).

use serde_json::Value;

/// A structured run event for logging.
pub struct RunEvent {
    /// Run this event belongs to.
    pub run_id: String,
    /// Event type identifier (e.g., "page_scraped", "answer_submitted").
    pub event_type: &'static str,
    /// JSON payload with event-specific data.
    pub payload: Value,
}

impl RunEvent {
    pub fn new(run_id: impl Into<String>, event_type: &'static str, payload: Value) -> Self {
        Self {
            run_id: run_id.into(),
            event_type,
            payload,
        }
    }
}

/// Port for logging run events to a structured log.
///
/// The `log` method is synchronous and non-fallible; logging failures
/// must not interrupt a run.
pub trait RunLogger: Send + Sync {
    /// Record a run event.
    fn log(&self, event: RunEvent);
}

/// No-op implementation for tests and when logging is disabled.
pub struct NoRunLogger;

impl RunLogger for NoRunLogger {
    fn log(&self, _event: RunEvent) {}
}
