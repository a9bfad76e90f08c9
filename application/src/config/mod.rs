//! Application-level configuration.
//!
//! This module provides configuration types that control how use cases behave:
//!
//! - [`ExecutionParams`]: retrieval width, context limits, timeouts and retries
//! - [`ReviewConfig`]: container for everything a review needs besides its ports

pub mod execution_params;
pub mod review_config;

pub use execution_params::ExecutionParams;
pub use review_config::ReviewConfig;
