//! Review request value objects

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};

/// Maximum task identifier length, in characters
pub const MAX_TASK_ID_CHARS: usize = 255;

/// Maximum task details length, in characters
pub const MAX_DETAILS_CHARS: usize = 10_000;

/// Inbound review request as received from a caller: `{task_id, details}`.
///
/// Unvalidated; convert with [`ReviewRequest::validate`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewRequest {
    pub task_id: String,
    pub details: String,
}

impl ReviewRequest {
    pub fn new(task_id: impl Into<String>, details: impl Into<String>) -> Self {
        Self {
            task_id: task_id.into(),
            details: details.into(),
        }
    }

    /// Validate into a [`TaskRequest`]
    pub fn validate(&self) -> Result<TaskRequest, DomainError> {
        TaskRequest::try_new(&self.task_id, &self.details)
    }
}

/// A validated task submitted for review (Value Object).
///
/// Both fields are trimmed, non-empty, and within length limits.
/// `task_id` is caller-supplied and not checked for global uniqueness.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskRequest {
    task_id: String,
    details: String,
}

impl TaskRequest {
    pub fn try_new(
        task_id: impl AsRef<str>,
        details: impl AsRef<str>,
    ) -> Result<Self, DomainError> {
        let task_id = task_id.as_ref().trim();
        let details = details.as_ref().trim();

        if task_id.is_empty() {
            return Err(DomainError::EmptyTaskId);
        }
        let task_id_len = task_id.chars().count();
        if task_id_len > MAX_TASK_ID_CHARS {
            return Err(DomainError::TaskIdTooLong {
                max: MAX_TASK_ID_CHARS,
                actual: task_id_len,
            });
        }

        if details.is_empty() {
            return Err(DomainError::EmptyDetails);
        }
        let details_len = details.chars().count();
        if details_len > MAX_DETAILS_CHARS {
            return Err(DomainError::DetailsTooLong {
                max: MAX_DETAILS_CHARS,
                actual: details_len,
            });
        }

        Ok(Self {
            task_id: task_id.to_string(),
            details: details.to_string(),
        })
    }

    pub fn task_id(&self) -> &str {
        &self.task_id
    }

    pub fn details(&self) -> &str {
        &self.details
    }
}

impl TryFrom<ReviewRequest> for TaskRequest {
    type Error = DomainError;

    fn try_from(request: ReviewRequest) -> Result<Self, Self::Error> {
        request.validate()
    }
}
