//! Domain error types

use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("task_id cannot be empty or whitespace")]
    EmptyTaskId,

    #[error("details cannot be empty or whitespace")]
    EmptyDetails,

    #[error("task_id is too long: {actual} characters (max {max})")]
    TaskIdTooLong { max: usize, actual: usize },

    #[error("details is too long: {actual} characters (max {max})")]
    DetailsTooLong { max: usize, actual: usize },
}

impl DomainError {
    /// Name of the request field this error refers to
    pub fn field(&self) -> &'static str {
        match self {
            DomainError::EmptyTaskId | DomainError::TaskIdTooLong { .. } => "task_id",
            DomainError::EmptyDetails | DomainError::DetailsTooLong { .. } => "details",
        }
    }
}
