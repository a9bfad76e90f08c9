//! Retrieval result

use super::chunk::{Chunk, CitationToken};
use super::coverage::{CoverageWeights, coverage};
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::BTreeSet;

/// Evidence retrieved for one review request.
///
/// Created once per request by the Retriever and never mutated afterwards.
/// Chunks are ordered by descending similarity; ties are broken by
/// `(document_id, id)` so the order is deterministic for a fixed corpus.
///
/// # Example
///
/// ```
/// use review_domain::retrieval::{Chunk, CoverageWeights, RetrievalResult};
///
/// let result = RetrievalResult::new(
///     vec![
///         Chunk::new(2, 10, "b").with_similarity(0.4),
///         Chunk::new(1, 10, "a").with_similarity(0.8),
///     ],
///     &CoverageWeights::default(),
/// );
/// assert_eq!(result.chunks()[0].id, 1);
/// assert_eq!(result.retrieved_doc_ids(), vec![10]);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RetrievalResult {
    chunks: Vec<Chunk>,
    coverage: f64,
    retrieved_doc_ids: BTreeSet<u64>,
}

impl RetrievalResult {
    /// Order the chunks and compute coverage over however many were returned.
    pub fn new(mut chunks: Vec<Chunk>, weights: &CoverageWeights) -> Self {
        chunks.sort_by(compare_chunks);

        let scores: Vec<f64> = chunks.iter().map(|c| c.similarity).collect();
        let coverage = coverage(&scores, weights);
        let retrieved_doc_ids = chunks.iter().map(|c| c.document_id).collect();

        Self {
            chunks,
            coverage,
            retrieved_doc_ids,
        }
    }

    /// A result with no evidence (coverage 0)
    pub fn empty() -> Self {
        Self {
            chunks: Vec::new(),
            coverage: 0.0,
            retrieved_doc_ids: BTreeSet::new(),
        }
    }

    pub fn chunks(&self) -> &[Chunk] {
        &self.chunks
    }

    pub fn coverage(&self) -> f64 {
        self.coverage
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    /// Distinct document ids, ascending
    pub fn retrieved_doc_ids(&self) -> Vec<u64> {
        self.retrieved_doc_ids.iter().copied().collect()
    }

    /// Citation tokens for every retrieved chunk, in retrieval order
    pub fn citation_tokens(&self) -> Vec<CitationToken> {
        self.chunks.iter().map(Chunk::citation_token).collect()
    }

    /// Whether `token` references a chunk in this result
    pub fn contains_citation(&self, token: &CitationToken) -> bool {
        self.chunks
            .iter()
            .any(|c| c.citation_token() == *token)
    }

    /// Similarity scores in retrieval order
    pub fn similarities(&self) -> Vec<f64> {
        self.chunks.iter().map(|c| c.similarity).collect()
    }
}

fn compare_chunks(a: &Chunk, b: &Chunk) -> Ordering {
    b.similarity
        .total_cmp(&a.similarity)
        .then_with(|| a.document_id.cmp(&b.document_id))
        .then_with(|| a.id.cmp(&b.id))
}
