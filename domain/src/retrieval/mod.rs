//! Retrieval evidence
//!
//! Chunks returned by the similarity store, the coverage score summarizing
//! how well they support a query, and the immutable [`RetrievalResult`]
//! handed from the Retriever to the gates and the Decision Agent.

pub mod chunk;
pub mod coverage;
pub mod result;

pub use chunk::{Chunk, CitationToken};
pub use coverage::{CoverageWeights, coverage};
pub use result::RetrievalResult;
