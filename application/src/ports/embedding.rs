//! Embedding port
//!
//! Turns query text into a vector comparable with the ingested corpus.

use async_trait::async_trait;
use thiserror::Error;

/// Errors raised by an embedding backend
#[derive(Error, Debug)]
pub enum EmbeddingError {
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Embedding request failed: {0}")]
    RequestFailed(String),

    #[error("Invalid embedding response: {0}")]
    InvalidResponse(String),

    #[error("Embedding request timed out")]
    Timeout,
}

/// Text embedding backend
#[async_trait]
pub trait EmbeddingPort: Send + Sync {
    /// Embed a single text
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError>;

    /// Model identifier, for diagnostics
    fn model_name(&self) -> &str;

    /// Vector length produced by [`embed`](Self::embed)
    fn dimensions(&self) -> usize;
}
