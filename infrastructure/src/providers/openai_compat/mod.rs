//! OpenAI-compatible HTTP provider
//!
//! `POST {base_url}embeddings` backs the [`EmbeddingPort`] and
//! `POST {base_url}chat/completions` backs the [`LlmGateway`].
//!
//! [`EmbeddingPort`]: review_application::EmbeddingPort
//! [`LlmGateway`]: review_application::LlmGateway

mod chat;
mod embedding;
mod endpoint;
mod types;

pub use chat::{OpenAiChatGateway, OpenAiChatSession};
pub use embedding::OpenAiEmbeddingClient;
pub use endpoint::{HttpFailure, ProviderEndpoint};
