//! Read-only chunk corpus
//!
//! The corpus is produced by offline ingestion as a JSONL file, one
//! embedded chunk per line, and served from memory.

mod record;
mod store;

pub use record::CorpusRecord;
pub use store::{CorpusLoadError, InMemoryCorpusStore};
