//! External model providers.
//!
//! Only OpenAI-compatible HTTP APIs are supported; Gemini, OpenAI and most
//! local servers (Ollama, vLLM, LM Studio) expose this surface.

pub mod openai_compat;

pub use openai_compat::{OpenAiChatGateway, OpenAiEmbeddingClient, ProviderEndpoint};
