//! Infrastructure layer for task-review
//!
//! Adapters for the ports defined in the application layer: the in-memory
//! corpus store, OpenAI-compatible embedding and chat providers, and the
//! JSONL review event logger. Also owns configuration file loading.

pub mod config;
pub mod corpus;
pub mod logging;
pub mod providers;

// Re-export commonly used types
pub use config::{ConfigLoader, ConfigValidationError, FileConfig};
pub use corpus::{CorpusLoadError, CorpusRecord, InMemoryCorpusStore};
pub use logging::JsonlReviewLogger;
pub use providers::{OpenAiChatGateway, OpenAiEmbeddingClient, ProviderEndpoint};
pub use providers::openai_compat::HttpFailure;
