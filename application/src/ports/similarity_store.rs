//! Similarity store port
//!
//! Read-only nearest-neighbour search over ingested chunks.

use async_trait::async_trait;
use review_domain::Chunk;
use thiserror::Error;

/// Errors raised by a similarity store
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Similarity store unavailable: {0}")]
    Unavailable(String),

    #[error("Query vector has {actual} dimensions, store expects {expected}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Similarity search timed out")]
    Timeout,
}

/// Nearest-neighbour search over the chunk corpus
#[async_trait]
pub trait SimilarityStore: Send + Sync {
    /// Return at most `k` chunks ordered by descending similarity.
    ///
    /// Each returned chunk carries its similarity score. Fewer than `k`
    /// chunks (including none) is a valid answer.
    async fn search(&self, query: &[f32], k: usize) -> Result<Vec<Chunk>, StoreError>;

    /// Number of chunks available for search
    async fn chunk_count(&self) -> Result<usize, StoreError>;
}
