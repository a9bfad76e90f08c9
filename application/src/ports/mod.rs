//! Port definitions (interfaces for external adapters)
//!
//! Ports define the contracts that infrastructure adapters must implement.

pub mod embedding;
pub mod llm_gateway;
pub mod progress;
pub mod review_logger;
pub mod similarity_store;
