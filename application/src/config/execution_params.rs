//! Execution parameters: pipeline limits and external-call control.
//!
//! [`ExecutionParams`] groups the static parameters that control how
//! [`RunReviewUseCase`](crate::use_cases::run_review::RunReviewUseCase)
//! talks to its ports. These are application-layer concerns, not domain
//! policy; the gate thresholds live in the domain.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Pipeline control parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionParams {
    /// Number of chunks to retrieve (K).
    pub top_k: usize,
    /// Retrieved passages longer than this are trimmed.
    pub max_passage_chars: usize,
    /// Combined passage text allowed into the decision prompt.
    pub max_context_chars: usize,
    /// Bound on embedding plus similarity search.
    pub retrieval_timeout: Option<Duration>,
    /// Bound on each decision attempt.
    pub decision_timeout: Option<Duration>,
    /// Extra decision attempts after an unparseable response.
    pub parse_retries: usize,
}

impl Default for ExecutionParams {
    fn default() -> Self {
        Self {
            top_k: 4,
            max_passage_chars: 1500,
            max_context_chars: 5000,
            retrieval_timeout: Some(Duration::from_secs(30)),
            decision_timeout: Some(Duration::from_secs(60)),
            parse_retries: 1,
        }
    }
}

impl ExecutionParams {
    // ==================== Builder Methods ====================

    pub fn with_top_k(mut self, k: usize) -> Self {
        self.top_k = k;
        self
    }

    pub fn with_max_passage_chars(mut self, max: usize) -> Self {
        self.max_passage_chars = max;
        self
    }

    pub fn with_max_context_chars(mut self, max: usize) -> Self {
        self.max_context_chars = max;
        self
    }

    pub fn with_retrieval_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.retrieval_timeout = timeout;
        self
    }

    pub fn with_decision_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.decision_timeout = timeout;
        self
    }

    pub fn with_parse_retries(mut self, retries: usize) -> Self {
        self.parse_retries = retries;
        self
    }

    /// Total decision attempts, including the first
    pub fn decision_attempts(&self) -> usize {
        self.parse_retries + 1
    }
}
