//! Core domain concepts shared across all subdomains.
//!
//! - [`model::ModelSpec`]: the language model used for decisions
//! - [`error::DomainError`]: domain-level validation errors

pub mod error;
pub mod model;
pub mod string;
