//! Review request and outcome contracts
//!
//! - [`request::ReviewRequest`]: the inbound wire shape, validated into a [`request::TaskRequest`]
//! - [`outcome::ProposedDecision`]: the model's verdict after parsing
//! - [`outcome::FinalDecision`]: the only entity returned to the caller
//! - [`failure::ReviewFailure`]: structured report for fatal errors

pub mod failure;
pub mod outcome;
pub mod request;
pub mod stage;

pub use failure::{ReviewErrorKind, ReviewFailure};
pub use outcome::{FinalDecision, ProposedDecision, Verdict};
pub use request::{MAX_DETAILS_CHARS, MAX_TASK_ID_CHARS, ReviewRequest, TaskRequest};
pub use stage::ReviewStage;
