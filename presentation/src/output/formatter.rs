//! Output formatter trait

use review_application::HealthReport;
use review_domain::{FinalDecision, ReviewFailure};

/// Renders review outcomes for the terminal or for machines
pub trait OutputFormatter: Send + Sync {
    /// Format a completed review
    fn format_decision(&self, decision: &FinalDecision) -> String;

    /// Format a failed review
    fn format_failure(&self, failure: &ReviewFailure) -> String;

    /// Format a health report
    fn format_health(&self, report: &HealthReport) -> String;
}
