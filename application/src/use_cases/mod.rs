//! Use cases (application services)
//!
//! Use cases orchestrate domain logic and coordinate with external systems via ports.

pub mod decide;
pub mod health;
pub mod retrieve;
pub mod run_review;
