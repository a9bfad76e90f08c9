//! Citation filtering against the retrieved set

use crate::retrieval::{CitationToken, RetrievalResult};
use std::collections::HashSet;

/// Result of [`filter_citations`]
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CitationFilterOutcome {
    /// Canonical tokens of retrieved chunks, in first-seen order, deduplicated
    pub kept: Vec<String>,
    /// Raw citations that were dropped (unknown chunk, malformed or duplicate)
    pub dropped: Vec<String>,
}

impl CitationFilterOutcome {
    pub fn has_dropped(&self) -> bool {
        !self.dropped.is_empty()
    }
}

/// Keep only citations that name a chunk present in `retrieval`.
///
/// Dropping is silent; the caller decides whether to surface it. Running
/// the filter on its own output returns the same list.
///
/// # Example
///
/// ```
/// use review_domain::response::filter_citations;
/// use review_domain::retrieval::{Chunk, CoverageWeights, RetrievalResult};
///
/// let retrieval = RetrievalResult::new(
///     vec![Chunk::new(1, 10, "text").with_similarity(0.8)],
///     &CoverageWeights::default(),
/// );
/// let cited = vec!["doc:10#chunk:1".to_string(), "doc:99#chunk:5".to_string()];
///
/// let outcome = filter_citations(&cited, &retrieval);
/// assert_eq!(outcome.kept, vec!["doc:10#chunk:1"]);
/// assert_eq!(outcome.dropped, vec!["doc:99#chunk:5"]);
/// ```
pub fn filter_citations(citations: &[String], retrieval: &RetrievalResult) -> CitationFilterOutcome {
    let mut seen: HashSet<CitationToken> = HashSet::new();
    let mut outcome = CitationFilterOutcome::default();

    for raw in citations {
        match CitationToken::parse(raw) {
            Some(token) if retrieval.contains_citation(&token) && seen.insert(token.clone()) => {
                outcome.kept.push(token.into_string());
            }
            _ => outcome.dropped.push(raw.clone()),
        }
    }

    outcome
}
