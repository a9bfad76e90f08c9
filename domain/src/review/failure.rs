//! Structured failure report

use serde::{Deserialize, Serialize};

/// Kind of a fatal review error.
///
/// Every kind aborts the request; no partial decision is produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewErrorKind {
    /// The inbound request failed validation
    InvalidRequest,
    /// The embedding backend could not embed the task text
    EmbeddingFailed,
    /// The similarity store could not be queried
    RetrievalUnavailable,
    /// The model's output was not a valid decision object
    DecisionParseError,
    /// The language model backend could not be reached
    LlmUnavailable,
    /// An external call exceeded its time budget
    Timeout,
    /// The caller cancelled the request
    Cancelled,
}

impl ReviewErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReviewErrorKind::InvalidRequest => "invalid_request",
            ReviewErrorKind::EmbeddingFailed => "embedding_failed",
            ReviewErrorKind::RetrievalUnavailable => "retrieval_unavailable",
            ReviewErrorKind::DecisionParseError => "decision_parse_error",
            ReviewErrorKind::LlmUnavailable => "llm_unavailable",
            ReviewErrorKind::Timeout => "timeout",
            ReviewErrorKind::Cancelled => "cancelled",
        }
    }
}

impl std::fmt::Display for ReviewErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Failure reported to the caller instead of a decision
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewFailure {
    pub task_id: String,
    pub kind: ReviewErrorKind,
    pub message: String,
}

impl ReviewFailure {
    pub fn new(
        task_id: impl Into<String>,
        kind: ReviewErrorKind,
        message: impl Into<String>,
    ) -> Self {
        Self {
            task_id: task_id.into(),
            kind,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ReviewFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}: {}", self.task_id, self.kind, self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_serializes_snake_case() {
        let json = serde_json::to_string(&ReviewErrorKind::DecisionParseError).unwrap();
        assert_eq!(json, "\"decision_parse_error\"");
        assert_eq!(
            ReviewErrorKind::RetrievalUnavailable.to_string(),
            "retrieval_unavailable"
        );
    }

    #[test]
    fn test_failure_display() {
        let failure = ReviewFailure::new("T-1", ReviewErrorKind::Timeout, "decide timed out");
        assert_eq!(failure.to_string(), "[T-1] timeout: decide timed out");
    }
}
