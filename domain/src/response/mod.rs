//! Model response handling
//!
//! Raw model text becomes a [`ProposedDecision`](crate::review::ProposedDecision)
//! in three steps:
//!
//! 1. [`parse_decision_response`] extracts and validates the JSON object
//! 2. [`sanitize_decision`] neutralizes markup in free-text fields
//! 3. [`filter_citations`] drops citations that do not name a retrieved chunk
//!
//! Only step 1 can fail. Steps 2 and 3 correct the decision in place and
//! report what they changed.

pub mod citation;
pub mod parsing;
pub mod sanitize;

pub use citation::{CitationFilterOutcome, filter_citations};
pub use parsing::{DecisionParseError, parse_decision_response};
pub use sanitize::{Sanitized, sanitize_decision, sanitize_text};
