//! Configuration file loading for task-review
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. Environment: `TASK_REVIEW_<SECTION>__<KEY>`
//! 2. `--config <path>` specified file
//! 3. Project root: `./review.toml` or `./.review.toml`
//! 4. XDG config: `$XDG_CONFIG_HOME/task-review/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    ConfigValidationError, DEFAULT_API_BASE_URL, DEFAULT_API_KEY_ENV,
    DEFAULT_EMBEDDING_DIMENSIONS, DEFAULT_EMBEDDING_MODEL, FileConfig, FileCorpusConfig,
    FileCoverageConfig, FileDecisionConfig, FileEmbeddingConfig, FileGatesConfig, FileLlmConfig,
    FileLoggingConfig, FileRetrievalConfig, FileTimeoutsConfig,
};
pub use loader::ConfigLoader;
