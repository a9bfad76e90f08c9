//! Embedding backend over `POST /embeddings`

use super::endpoint::{HttpFailure, ProviderEndpoint};
use super::types::{EmbeddingRequest, EmbeddingResponse};
use async_trait::async_trait;
use review_application::{EmbeddingError, EmbeddingPort};
use tracing::debug;

pub struct OpenAiEmbeddingClient {
    endpoint: ProviderEndpoint,
    model: String,
    dimensions: usize,
}

impl OpenAiEmbeddingClient {
    pub fn new(endpoint: ProviderEndpoint, model: impl Into<String>, dimensions: usize) -> Self {
        Self {
            endpoint,
            model: model.into(),
            dimensions,
        }
    }

    /// Pick the single vector out of a response, checking its length.
    fn extract_vector(
        &self,
        response: EmbeddingResponse,
    ) -> Result<Vec<f32>, EmbeddingError> {
        let data = response
            .data
            .into_iter()
            .min_by_key(|d| d.index)
            .ok_or_else(|| {
                EmbeddingError::InvalidResponse("response contained no embeddings".to_string())
            })?;

        let vector = data.embedding;
        if vector.len() != self.dimensions {
            return Err(EmbeddingError::InvalidResponse(format!(
                "expected {} dimensions from {}, got {}",
                self.dimensions,
                self.model,
                vector.len()
            )));
        }
        if vector.iter().any(|v| !v.is_finite()) {
            return Err(EmbeddingError::InvalidResponse(
                "embedding contains non-finite values".to_string(),
            ));
        }

        Ok(vector)
    }
}

impl From<HttpFailure> for EmbeddingError {
    fn from(failure: HttpFailure) -> Self {
        match &failure {
            HttpFailure::Connect { .. } => EmbeddingError::Connection(failure.to_string()),
            HttpFailure::Timeout { .. } => EmbeddingError::Timeout,
            HttpFailure::Status { .. } => EmbeddingError::RequestFailed(failure.to_string()),
            HttpFailure::Decode { .. } => EmbeddingError::InvalidResponse(failure.to_string()),
        }
    }
}

#[async_trait]
impl EmbeddingPort for OpenAiEmbeddingClient {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        debug!(model = %self.model, chars = text.chars().count(), "Requesting embedding");

        let request = EmbeddingRequest {
            model: &self.model,
            input: text,
        };
        let response: EmbeddingResponse = self.endpoint.post_json("embeddings", &request).await?;
        self.extract_vector(response)
    }

    fn model_name(&self) -> &str {
        &self.model
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }
}
