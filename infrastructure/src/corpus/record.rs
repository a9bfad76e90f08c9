//! Corpus file record

use review_domain::Chunk;
use serde::{Deserialize, Serialize};

/// One line of the corpus JSONL file
///
/// ```json
/// {"chunk_id": 17, "document_id": 3, "text": "...", "title": "Security Policy", "embedding": [0.01, ...]}
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorpusRecord {
    pub chunk_id: u64,
    pub document_id: u64,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub section: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_start: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_end: Option<u32>,
    /// Embedding vector of `text`
    pub embedding: Vec<f32>,
}

impl CorpusRecord {
    /// Split into the searchable chunk and its vector
    pub fn into_parts(self) -> (Chunk, Vec<f32>) {
        let chunk = Chunk {
            id: self.chunk_id,
            document_id: self.document_id,
            text: self.text,
            similarity: 0.0,
            title: self.title,
            section: self.section,
            page_start: self.page_start,
            page_end: self.page_end,
        };
        (chunk, self.embedding)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_minimal_record() {
        let line = r#"{"chunk_id": 1, "document_id": 2, "text": "hello", "embedding": [0.5, 0.5]}"#;
        let record: CorpusRecord = serde_json::from_str(line).unwrap();
        let (chunk, embedding) = record.into_parts();

        assert_eq!(chunk.id, 1);
        assert_eq!(chunk.document_id, 2);
        assert!(chunk.title.is_none());
        assert_eq!(embedding, vec![0.5, 0.5]);
    }

    #[test]
    fn test_deserialize_with_metadata() {
        let line = r#"{"chunk_id": 1, "document_id": 2, "text": "t", "title": "Policy", "section": "Access", "page_start": 3, "page_end": 4, "embedding": [1.0]}"#;
        let record: CorpusRecord = serde_json::from_str(line).unwrap();
        let (chunk, _) = record.into_parts();
        assert_eq!(chunk.source_label().as_deref(), Some("Policy / Access (pp. 3-4)"));
    }
}
