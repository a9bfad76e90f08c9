//! JSON envelope around review results
//!
//! Completed reviews are `{"message": "review completed", "data": ...}`,
//! failures are `{"message": "review failed", "error": {"kind", "message"}}`.

use crate::output::formatter::OutputFormatter;
use review_application::HealthReport;
use review_domain::{FinalDecision, ReviewErrorKind, ReviewFailure};
use serde::Serialize;

pub const REVIEW_COMPLETED: &str = "review completed";
pub const REVIEW_FAILED: &str = "review failed";

#[derive(Debug, Serialize)]
pub struct ErrorBody<'a> {
    #[serde(skip_serializing_if = "str::is_empty")]
    pub task_id: &'a str,
    pub kind: ReviewErrorKind,
    pub message: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum Envelope<'a> {
    Data {
        message: &'static str,
        data: serde_json::Value,
    },
    Error {
        message: &'static str,
        error: ErrorBody<'a>,
    },
}

impl<'a> Envelope<'a> {
    pub fn completed(decision: &FinalDecision) -> Self {
        Envelope::Data {
            message: REVIEW_COMPLETED,
            data: serde_json::to_value(decision).unwrap_or_default(),
        }
    }

    pub fn failed(failure: &'a ReviewFailure) -> Self {
        Envelope::Error {
            message: REVIEW_FAILED,
            error: ErrorBody {
                task_id: &failure.task_id,
                kind: failure.kind,
                message: &failure.message,
            },
        }
    }

    pub fn health(report: &HealthReport) -> Self {
        Envelope::Data {
            message: if report.is_healthy() {
                "healthy"
            } else {
                "unhealthy"
            },
            data: serde_json::to_value(report).unwrap_or_default(),
        }
    }

    /// Single-line JSON
    pub fn to_line(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string())
    }
}

/// Compact JSON, one envelope per line
pub struct JsonFormatter;

impl OutputFormatter for JsonFormatter {
    fn format_decision(&self, decision: &FinalDecision) -> String {
        Envelope::completed(decision).to_line()
    }

    fn format_failure(&self, failure: &ReviewFailure) -> String {
        Envelope::failed(failure).to_line()
    }

    fn format_health(&self, report: &HealthReport) -> String {
        Envelope::health(report).to_line()
    }
}
