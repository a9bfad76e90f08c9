//! Chunk and citation token types

use serde::{Deserialize, Serialize};

/// A unit of ingested document text, as returned by a similarity search.
///
/// Chunks are produced by offline ingestion and are read-only here.
/// `similarity` is only meaningful after retrieval.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chunk {
    /// Stable chunk identifier
    pub id: u64,
    /// Document this chunk was cut from
    pub document_id: u64,
    /// Chunk text
    pub text: String,
    /// Similarity to the query (cosine, in [-1, 1])
    #[serde(default)]
    pub similarity: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub section: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_start: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_end: Option<u32>,
}

impl Chunk {
    pub fn new(id: u64, document_id: u64, text: impl Into<String>) -> Self {
        Self {
            id,
            document_id,
            text: text.into(),
            similarity: 0.0,
            title: None,
            section: None,
            page_start: None,
            page_end: None,
        }
    }

    pub fn with_similarity(mut self, similarity: f64) -> Self {
        self.similarity = similarity;
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_section(mut self, section: impl Into<String>) -> Self {
        self.section = Some(section.into());
        self
    }

    pub fn with_pages(mut self, start: u32, end: u32) -> Self {
        self.page_start = Some(start);
        self.page_end = Some(end);
        self
    }

    /// Citation token the model must use to reference this chunk
    pub fn citation_token(&self) -> CitationToken {
        CitationToken::new(self.document_id, self.id)
    }

    /// Human-readable source label, e.g. `"Security Policy / Access (pp. 3-4)"`
    pub fn source_label(&self) -> Option<String> {
        let mut parts = Vec::new();
        if let Some(title) = &self.title {
            parts.push(title.clone());
        }
        if let Some(section) = &self.section {
            parts.push(section.clone());
        }
        let mut label = parts.join(" / ");

        match (self.page_start, self.page_end) {
            (Some(start), Some(end)) if start != end => {
                label.push_str(&format!(" (pp. {}-{})", start, end));
            }
            (Some(page), _) | (None, Some(page)) => {
                label.push_str(&format!(" (p. {})", page));
            }
            (None, None) => {}
        }

        let label = label.trim().to_string();
        if label.is_empty() { None } else { Some(label) }
    }
}

/// Stable string identifying one retrieved chunk: `doc:<document_id>#chunk:<chunk_id>`.
///
/// # Example
///
/// ```
/// use review_domain::retrieval::CitationToken;
///
/// let token = CitationToken::new(3, 17);
/// assert_eq!(token.as_str(), "doc:3#chunk:17");
/// assert_eq!(CitationToken::parse(" doc:3#chunk:17 "), Some(token));
/// assert_eq!(CitationToken::parse("doc:3"), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CitationToken(String);

impl CitationToken {
    pub fn new(document_id: u64, chunk_id: u64) -> Self {
        Self(format!("doc:{}#chunk:{}", document_id, chunk_id))
    }

    /// Parse a token as written by a model.
    ///
    /// Tolerates surrounding whitespace, brackets and quotes; anything else
    /// that does not match the exact shape yields `None`.
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw
            .trim()
            .trim_matches(|c: char| matches!(c, '[' | ']' | '"' | '\'' | '`'));
        let rest = trimmed.strip_prefix("doc:")?;
        let (doc, chunk) = rest.split_once("#chunk:")?;
        let document_id: u64 = doc.parse().ok()?;
        let chunk_id: u64 = chunk.parse().ok()?;
        Some(Self::new(document_id, chunk_id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl std::fmt::Display for CitationToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
