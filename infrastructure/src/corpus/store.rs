//! In-memory similarity store over a JSONL corpus

use super::record::CorpusRecord;
use async_trait::async_trait;
use review_application::{SimilarityStore, StoreError};
use review_domain::Chunk;
use std::collections::HashSet;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

/// Errors raised while loading a corpus file
#[derive(Error, Debug)]
pub enum CorpusLoadError {
    #[error("Failed to read corpus {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid corpus record on line {line}: {message}")]
    InvalidRecord { line: usize, message: String },

    #[error("Corpus record on line {line} has an empty embedding")]
    EmptyEmbedding { line: usize },

    #[error("Corpus record on line {line} has {actual} dimensions, expected {expected}")]
    DimensionMismatch {
        line: usize,
        expected: usize,
        actual: usize,
    },

    #[error("Duplicate chunk doc:{document_id}#chunk:{chunk_id} on line {line}")]
    DuplicateChunk {
        line: usize,
        document_id: u64,
        chunk_id: u64,
    },
}

struct Entry {
    chunk: Chunk,
    embedding: Vec<f32>,
    norm: f64,
}

/// Exhaustive cosine search over chunks held in memory.
///
/// Results are ordered by descending similarity, then by document and chunk
/// id, so identical queries always return identical results.
pub struct InMemoryCorpusStore {
    entries: Vec<Entry>,
    dimensions: Option<usize>,
}

impl InMemoryCorpusStore {
    /// Load a JSONL corpus file. Blank lines are skipped.
    pub fn load(path: &Path) -> Result<Self, CorpusLoadError> {
        let file = File::open(path).map_err(|source| CorpusLoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let mut records = Vec::new();
        for (index, line) in BufReader::new(file).lines().enumerate() {
            let line = line.map_err(|source| CorpusLoadError::Io {
                path: path.to_path_buf(),
                source,
            })?;
            if line.trim().is_empty() {
                continue;
            }
            let record: CorpusRecord =
                serde_json::from_str(&line).map_err(|e| CorpusLoadError::InvalidRecord {
                    line: index + 1,
                    message: e.to_string(),
                })?;
            records.push((index + 1, record));
        }

        let store = Self::from_numbered_records(records)?;
        info!(
            path = %path.display(),
            chunks = store.len(),
            dimensions = store.dimensions().unwrap_or(0),
            "Loaded corpus"
        );
        Ok(store)
    }

    /// Build a store from records; every embedding must share one length.
    pub fn from_records(records: Vec<CorpusRecord>) -> Result<Self, CorpusLoadError> {
        Self::from_numbered_records(
            records
                .into_iter()
                .enumerate()
                .map(|(i, r)| (i + 1, r))
                .collect(),
        )
    }

    fn from_numbered_records(records: Vec<(usize, CorpusRecord)>) -> Result<Self, CorpusLoadError> {
        let mut entries = Vec::with_capacity(records.len());
        let mut dimensions = None;
        let mut seen = HashSet::new();

        for (line, record) in records {
            let (chunk, embedding) = record.into_parts();

            if embedding.is_empty() {
                return Err(CorpusLoadError::EmptyEmbedding { line });
            }
            let expected = *dimensions.get_or_insert(embedding.len());
            if embedding.len() != expected {
                return Err(CorpusLoadError::DimensionMismatch {
                    line,
                    expected,
                    actual: embedding.len(),
                });
            }
            if !seen.insert((chunk.document_id, chunk.id)) {
                return Err(CorpusLoadError::DuplicateChunk {
                    line,
                    document_id: chunk.document_id,
                    chunk_id: chunk.id,
                });
            }

            let norm = norm(&embedding);
            entries.push(Entry {
                chunk,
                embedding,
                norm,
            });
        }

        Ok(Self {
            entries,
            dimensions,
        })
    }

    /// Embedding length shared by all chunks; `None` for an empty corpus
    pub fn dimensions(&self) -> Option<usize> {
        self.dimensions
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn rank(&self, query: &[f32], k: usize) -> Vec<Chunk> {
        let query_norm = norm(query);
        let mut scored: Vec<(f64, &Entry)> = self
            .entries
            .iter()
            .map(|entry| (cosine(query, query_norm, &entry.embedding, entry.norm), entry))
            .collect();

        scored.sort_by(|(a, ea), (b, eb)| {
            b.total_cmp(a)
                .then(ea.chunk.document_id.cmp(&eb.chunk.document_id))
                .then(ea.chunk.id.cmp(&eb.chunk.id))
        });

        scored
            .into_iter()
            .take(k)
            .map(|(similarity, entry)| entry.chunk.clone().with_similarity(similarity))
            .collect()
    }
}

#[async_trait]
impl SimilarityStore for InMemoryCorpusStore {
    async fn search(&self, query: &[f32], k: usize) -> Result<Vec<Chunk>, StoreError> {
        if let Some(expected) = self.dimensions
            && query.len() != expected
        {
            return Err(StoreError::DimensionMismatch {
                expected,
                actual: query.len(),
            });
        }
        Ok(self.rank(query, k))
    }

    async fn chunk_count(&self) -> Result<usize, StoreError> {
        Ok(self.entries.len())
    }
}

fn norm(v: &[f32]) -> f64 {
    v.iter()
        .map(|x| (*x as f64) * (*x as f64))
        .sum::<f64>()
        .sqrt()
}

/// Cosine similarity with precomputed norms; zero vectors score 0
fn cosine(a: &[f32], norm_a: f64, b: &[f32], norm_b: f64) -> f64 {
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    let dot: f64 = a
        .iter()
        .zip(b.iter())
        .map(|(x, y)| (*x as f64) * (*y as f64))
        .sum();
    let similarity = dot / (norm_a * norm_b);
    if similarity.is_finite() { similarity } else { 0.0 }
}
