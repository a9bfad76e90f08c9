//! Domain layer for task-review
//!
//! This crate contains the core business logic, entities, and value objects.
//! It has no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Evidence
//!
//! A review request is answered only from retrieved policy excerpts:
//!
//! - **Chunk**: a unit of ingested document text, addressable by a
//!   [`CitationToken`] such as `doc:3#chunk:17`
//! - **Coverage**: a score in [0, 1] summarizing how well the retrieved
//!   chunks support the request
//!
//! ## Gates
//!
//! - **Coverage Gate**: rejects before any model call when coverage is low
//! - **Policy Gate**: final authority; downgrades approvals lacking
//!   citations or coverage
//!
//! A [`FinalDecision`] can only be built from a [`GatedDecision`], so an
//! approval that skipped the gates cannot be represented.

pub mod core;
pub mod gate;
pub mod prompt;
pub mod response;
pub mod retrieval;
pub mod review;

// Re-export commonly used types
pub use core::{
    error::DomainError,
    model::{DEFAULT_DECISION_MODEL, ModelSpec},
};
pub use gate::{
    CoverageGate, CoverageGateOutcome, GateThresholds, GatedDecision, PolicyGate, PolicyOutcome,
    PolicyViolation,
};
pub use prompt::{DecisionPrompt, DecisionPromptTemplate};
pub use response::{
    CitationFilterOutcome, DecisionParseError, Sanitized, filter_citations,
    parse_decision_response, sanitize_decision, sanitize_text,
};
pub use retrieval::{Chunk, CitationToken, CoverageWeights, RetrievalResult, coverage};
pub use review::{
    FinalDecision, ProposedDecision, ReviewErrorKind, ReviewFailure, ReviewRequest, ReviewStage,
    TaskRequest, Verdict,
};
