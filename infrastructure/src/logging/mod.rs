//! Logging infrastructure: structured review event logging.
//!
//! Provides [`JsonlReviewLogger`], a JSONL file writer that implements
//! the [`ReviewEventLogger`](review_application::ReviewEventLogger) port.

mod jsonl_review_logger;

pub use jsonl_review_logger::JsonlReviewLogger;
