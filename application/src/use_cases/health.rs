//! Health check use case
//!
//! Reports whether the corpus is loaded and which embedding model serves
//! queries. Makes no model calls.

use crate::ports::embedding::EmbeddingPort;
use crate::ports::similarity_store::SimilarityStore;
use serde::Serialize;
use std::sync::Arc;

/// Overall service status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Unhealthy,
}

/// Health report
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HealthReport {
    pub status: HealthStatus,
    /// Chunks available for search
    pub chunks: usize,
    pub embedding_model: String,
    pub embedding_dimensions: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl HealthReport {
    pub fn is_healthy(&self) -> bool {
        self.status == HealthStatus::Healthy
    }
}

pub struct HealthCheckUseCase {
    embedder: Arc<dyn EmbeddingPort>,
    store: Arc<dyn SimilarityStore>,
}

impl HealthCheckUseCase {
    pub fn new(embedder: Arc<dyn EmbeddingPort>, store: Arc<dyn SimilarityStore>) -> Self {
        Self { embedder, store }
    }

    /// An empty or unreachable store is unhealthy: every review would be
    /// rejected by the coverage gate.
    pub async fn execute(&self) -> HealthReport {
        let (chunks, reason) = match self.store.chunk_count().await {
            Ok(0) => (0, Some("corpus is empty".to_string())),
            Ok(n) => (n, None),
            Err(e) => (0, Some(e.to_string())),
        };

        HealthReport {
            status: if reason.is_none() {
                HealthStatus::Healthy
            } else {
                HealthStatus::Unhealthy
            },
            chunks,
            embedding_model: self.embedder.model_name().to_string(),
            embedding_dimensions: self.embedder.dimensions(),
            reason,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::embedding::EmbeddingError;
    use crate::ports::similarity_store::StoreError;
    use async_trait::async_trait;
    use review_domain::Chunk;

    struct StubEmbedder;

    #[async_trait]
    impl EmbeddingPort for StubEmbedder {
        async fn embed(&self, _text: &str) -> Result<Vec<f32>, EmbeddingError> {
            Ok(vec![0.0; 768])
        }

        fn model_name(&self) -> &str {
            "text-embedding-004"
        }

        fn dimensions(&self) -> usize {
            768
        }
    }

    struct CountingStore(Result<usize, ()>);

    #[async_trait]
    impl SimilarityStore for CountingStore {
        async fn search(&self, _query: &[f32], _k: usize) -> Result<Vec<Chunk>, StoreError> {
            Ok(Vec::new())
        }

        async fn chunk_count(&self) -> Result<usize, StoreError> {
            self.0
                .map_err(|_| StoreError::Unavailable("disk gone".to_string()))
        }
    }

    fn check(store: CountingStore) -> HealthCheckUseCase {
        HealthCheckUseCase::new(Arc::new(StubEmbedder), Arc::new(store))
    }

    #[tokio::test]
    async fn test_healthy_with_chunks() {
        let report = check(CountingStore(Ok(42))).execute().await;
        assert!(report.is_healthy());
        assert_eq!(report.chunks, 42);
        assert_eq!(report.embedding_model, "text-embedding-004");
        assert_eq!(report.embedding_dimensions, 768);

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["status"], "healthy");
        assert!(json.get("reason").is_none());
    }

    #[tokio::test]
    async fn test_empty_corpus_unhealthy() {
        let report = check(CountingStore(Ok(0))).execute().await;
        assert_eq!(report.status, HealthStatus::Unhealthy);
        assert_eq!(report.reason.as_deref(), Some("corpus is empty"));
    }

    #[tokio::test]
    async fn test_store_error_unhealthy() {
        let report = check(CountingStore(Err(()))).execute().await;
        assert!(!report.is_healthy());
        assert!(report.reason.unwrap().contains("disk gone"));
    }
}
