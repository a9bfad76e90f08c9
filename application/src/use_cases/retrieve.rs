//! Retriever
//!
//! Embeds the task details, searches the similarity store and scores the
//! result. One attempt per request; any failure is reported to the caller.

use crate::config::ExecutionParams;
use crate::ports::embedding::{EmbeddingError, EmbeddingPort};
use crate::ports::similarity_store::{SimilarityStore, StoreError};
use review_domain::core::string::truncate_chars;
use review_domain::{Chunk, CoverageWeights, RetrievalResult};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

/// Errors that can occur during retrieval
#[derive(Error, Debug)]
pub enum RetrieveError {
    #[error("Embedding failed: {0}")]
    Embedding(#[from] EmbeddingError),

    #[error("Similarity search failed: {0}")]
    Store(#[from] StoreError),

    #[error("Retrieval timed out after {}s", .0.as_secs())]
    Timeout(Duration),
}

/// Query-side retrieval over the ingested corpus
#[derive(Clone)]
pub struct Retriever {
    embedder: Arc<dyn EmbeddingPort>,
    store: Arc<dyn SimilarityStore>,
}

impl Retriever {
    pub fn new(embedder: Arc<dyn EmbeddingPort>, store: Arc<dyn SimilarityStore>) -> Self {
        Self { embedder, store }
    }

    /// Retrieve up to `params.top_k` chunks for `query` and compute coverage.
    ///
    /// An empty store yields an empty result with coverage 0, not an error.
    /// `params.retrieval_timeout` bounds embedding and search together.
    pub async fn retrieve(
        &self,
        query: &str,
        params: &ExecutionParams,
        weights: &CoverageWeights,
    ) -> Result<RetrievalResult, RetrieveError> {
        if params.top_k == 0 {
            return Ok(RetrievalResult::empty());
        }

        let work = self.embed_and_search(query, params.top_k);
        let mut chunks = match params.retrieval_timeout {
            Some(timeout) => tokio::time::timeout(timeout, work)
                .await
                .map_err(|_| RetrieveError::Timeout(timeout))??,
            None => work.await?,
        };

        chunks.truncate(params.top_k);
        for chunk in &mut chunks {
            if chunk.text.chars().count() > params.max_passage_chars {
                chunk.text = truncate_chars(&chunk.text, params.max_passage_chars).to_string();
            }
        }

        let result = RetrievalResult::new(chunks, weights);
        debug!(
            chunks = result.len(),
            coverage = result.coverage(),
            "Retrieval completed"
        );
        Ok(result)
    }

    async fn embed_and_search(
        &self,
        query: &str,
        k: usize,
    ) -> Result<Vec<Chunk>, RetrieveError> {
        let vector = self.embedder.embed(query).await?;
        if vector.is_empty() {
            return Err(EmbeddingError::InvalidResponse("empty embedding vector".to_string()).into());
        }
        Ok(self.store.search(&vector, k).await?)
    }
}
