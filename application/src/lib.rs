//! Application layer for task-review
//!
//! This crate contains use cases, port definitions, and application configuration.
//! It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::{ExecutionParams, ReviewConfig};
pub use ports::{
    embedding::{EmbeddingError, EmbeddingPort},
    llm_gateway::{GatewayError, LlmGateway, LlmSession},
    progress::{NoProgress, ProgressNotifier},
    review_logger::{NoReviewLogger, ReviewEvent, ReviewEventLogger},
    similarity_store::{SimilarityStore, StoreError},
};
pub use use_cases::decide::{AgentDecision, DecideError, DecisionAgent, Proposal};
pub use use_cases::health::{HealthCheckUseCase, HealthReport, HealthStatus};
pub use use_cases::retrieve::{RetrieveError, Retriever};
pub use use_cases::run_review::{ReviewError, RunReviewUseCase};
