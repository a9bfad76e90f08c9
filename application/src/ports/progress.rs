//! Progress notification port
//!
//! Defines the interface for reporting progress through the review pipeline.

use review_domain::ReviewStage;

/// Callback for progress updates during a review
///
/// Implementations live in the presentation layer and can display
/// progress in various ways (spinner, plain log lines, etc.)
pub trait ProgressNotifier: Send + Sync {
    /// Called when a stage starts
    fn on_stage_start(&self, stage: ReviewStage);

    /// Called when a stage completes
    fn on_stage_complete(&self, stage: ReviewStage);

    /// Called when the coverage gate rejects without consulting the model
    fn on_short_circuit(&self, _coverage: f64) {}

    /// Called before a decision attempt is retried after a parse failure
    fn on_retry(&self, _attempt: usize, _reason: &str) {}
}

/// No-op progress notifier for when progress reporting is not needed
pub struct NoProgress;

impl ProgressNotifier for NoProgress {
    fn on_stage_start(&self, _stage: ReviewStage) {}
    fn on_stage_complete(&self, _stage: ReviewStage) {}
}
