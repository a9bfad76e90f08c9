//! Port for structured review event logging.
//!
//! Defines the [`ReviewEventLogger`] trait for recording pipeline events
//! (retrieval results, prompts, raw model output, gate overrides) to a
//! machine-readable audit log.
//!
//! This is separate from `tracing`-based operation logs: tracing handles
//! human-readable diagnostics, while this port captures the full evidence
//! trail of each review (JSONL).

use serde_json::Value;

/// A structured review event.
///
/// Each event has a type string and a JSON payload containing
/// event-specific fields. The adapter adds the timestamp.
pub struct ReviewEvent {
    /// Event type identifier (e.g., "retrieval_completed", "llm_response").
    pub event_type: &'static str,
    /// JSON payload with event-specific data.
    pub payload: Value,
}

impl ReviewEvent {
    pub fn new(event_type: &'static str, payload: Value) -> Self {
        Self {
            event_type,
            payload,
        }
    }
}

/// Port for logging review events.
///
/// `log` is synchronous and infallible; adapters swallow write failures so
/// that auditing never changes a review's outcome.
pub trait ReviewEventLogger: Send + Sync {
    fn log(&self, event: ReviewEvent);
}

/// No-op implementation for tests and when logging is disabled.
pub struct NoReviewLogger;

impl ReviewEventLogger for NoReviewLogger {
    fn log(&self, _event: ReviewEvent) {}
}
