//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! Every field has a default, so a partial file (or none) is valid.

use review_application::{ExecutionParams, ReviewConfig};
use review_domain::{CoverageWeights, DEFAULT_DECISION_MODEL, GateThresholds, ModelSpec};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Base URL of Gemini's OpenAI-compatible endpoint
pub const DEFAULT_API_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/openai/";
pub const DEFAULT_EMBEDDING_MODEL: &str = "text-embedding-004";
pub const DEFAULT_EMBEDDING_DIMENSIONS: usize = 768;
pub const DEFAULT_API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Configuration validation errors
#[derive(Debug, Error, PartialEq)]
pub enum ConfigValidationError {
    #[error("timeouts.{0} cannot be 0")]
    InvalidTimeout(&'static str),

    #[error("retrieval.top_k cannot be 0")]
    InvalidTopK,

    #[error("{0} cannot be 0")]
    InvalidLimit(&'static str),

    #[error("gates.{field} must be within [0, 1], got {value}")]
    ThresholdOutOfRange { field: &'static str, value: f64 },

    #[error("coverage weights must be non-negative and not both zero (top {top}, mean {mean})")]
    InvalidCoverageWeights { top: f64, mean: f64 },

    #[error("{0} cannot be empty")]
    EmptyModelName(&'static str),

    #[error("embedding.dimensions cannot be 0")]
    InvalidDimensions,
}

/// `[retrieval]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileRetrievalConfig {
    /// Chunks to retrieve per request
    pub top_k: usize,
    /// Retrieved passages are trimmed to this many characters
    pub max_passage_chars: usize,
}

impl Default for FileRetrievalConfig {
    fn default() -> Self {
        let params = ExecutionParams::default();
        Self {
            top_k: params.top_k,
            max_passage_chars: params.max_passage_chars,
        }
    }
}

/// `[coverage]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileCoverageConfig {
    pub top_weight: f64,
    pub mean_weight: f64,
}

impl Default for FileCoverageConfig {
    fn default() -> Self {
        let weights = CoverageWeights::default();
        Self {
            top_weight: weights.top_weight,
            mean_weight: weights.mean_weight,
        }
    }
}

/// `[gates]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileGatesConfig {
    pub coverage_min: f64,
    pub approve_coverage_min: f64,
    pub min_citations_for_approval: usize,
}

impl Default for FileGatesConfig {
    fn default() -> Self {
        let thresholds = GateThresholds::default();
        Self {
            coverage_min: thresholds.coverage_min,
            approve_coverage_min: thresholds.approve_coverage_min,
            min_citations_for_approval: thresholds.min_citations_for_approval,
        }
    }
}

/// `[decision]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileDecisionConfig {
    pub model: String,
    pub temperature: f32,
    pub max_output_tokens: u32,
    /// Combined passage text allowed into the prompt
    pub max_context_chars: usize,
    /// Extra attempts after unparseable model output
    pub parse_retries: usize,
}

impl Default for FileDecisionConfig {
    fn default() -> Self {
        let model = ModelSpec::default();
        let params = ExecutionParams::default();
        Self {
            model: DEFAULT_DECISION_MODEL.to_string(),
            temperature: model.temperature,
            max_output_tokens: model.max_output_tokens,
            max_context_chars: params.max_context_chars,
            parse_retries: params.parse_retries,
        }
    }
}

/// `[timeouts]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileTimeoutsConfig {
    /// Bound on embedding plus similarity search
    pub retrieval_seconds: u64,
    /// Bound on each decision attempt
    pub decision_seconds: u64,
}

impl Default for FileTimeoutsConfig {
    fn default() -> Self {
        Self {
            retrieval_seconds: 30,
            decision_seconds: 60,
        }
    }
}

/// `[embedding]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileEmbeddingConfig {
    pub base_url: String,
    pub model: String,
    pub dimensions: usize,
    /// Environment variable holding the API key
    pub api_key_env: String,
}

impl Default for FileEmbeddingConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE_URL.to_string(),
            model: DEFAULT_EMBEDDING_MODEL.to_string(),
            dimensions: DEFAULT_EMBEDDING_DIMENSIONS,
            api_key_env: DEFAULT_API_KEY_ENV.to_string(),
        }
    }
}

/// `[llm]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLlmConfig {
    pub base_url: String,
    /// Environment variable holding the API key
    pub api_key_env: String,
}

impl Default for FileLlmConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE_URL.to_string(),
            api_key_env: DEFAULT_API_KEY_ENV.to_string(),
        }
    }
}

/// `[corpus]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileCorpusConfig {
    /// JSONL file of embedded chunks
    pub path: PathBuf,
}

impl Default for FileCorpusConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("corpus.jsonl"),
        }
    }
}

/// `[logging]`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLoggingConfig {
    /// JSONL review event log; disabled when unset
    pub review_log: Option<PathBuf>,
}

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub retrieval: FileRetrievalConfig,
    pub coverage: FileCoverageConfig,
    pub gates: FileGatesConfig,
    pub decision: FileDecisionConfig,
    pub timeouts: FileTimeoutsConfig,
    pub embedding: FileEmbeddingConfig,
    pub llm: FileLlmConfig,
    pub corpus: FileCorpusConfig,
    pub logging: FileLoggingConfig,
}

impl FileConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.timeouts.retrieval_seconds == 0 {
            return Err(ConfigValidationError::InvalidTimeout("retrieval_seconds"));
        }
        if self.timeouts.decision_seconds == 0 {
            return Err(ConfigValidationError::InvalidTimeout("decision_seconds"));
        }

        if self.retrieval.top_k == 0 {
            return Err(ConfigValidationError::InvalidTopK);
        }
        if self.retrieval.max_passage_chars == 0 {
            return Err(ConfigValidationError::InvalidLimit(
                "retrieval.max_passage_chars",
            ));
        }
        if self.decision.max_context_chars == 0 {
            return Err(ConfigValidationError::InvalidLimit(
                "decision.max_context_chars",
            ));
        }

        for (field, value) in [
            ("coverage_min", self.gates.coverage_min),
            ("approve_coverage_min", self.gates.approve_coverage_min),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigValidationError::ThresholdOutOfRange { field, value });
            }
        }

        if !self.coverage_weights().is_valid() {
            return Err(ConfigValidationError::InvalidCoverageWeights {
                top: self.coverage.top_weight,
                mean: self.coverage.mean_weight,
            });
        }

        if self.decision.model.trim().is_empty() {
            return Err(ConfigValidationError::EmptyModelName("decision.model"));
        }
        if self.embedding.model.trim().is_empty() {
            return Err(ConfigValidationError::EmptyModelName("embedding.model"));
        }
        if self.embedding.dimensions == 0 {
            return Err(ConfigValidationError::InvalidDimensions);
        }

        Ok(())
    }

    pub fn coverage_weights(&self) -> CoverageWeights {
        CoverageWeights::new(self.coverage.top_weight, self.coverage.mean_weight)
    }

    pub fn gate_thresholds(&self) -> GateThresholds {
        GateThresholds::default()
            .with_coverage_min(self.gates.coverage_min)
            .with_approve_coverage_min(self.gates.approve_coverage_min)
            .with_min_citations_for_approval(self.gates.min_citations_for_approval)
    }

    pub fn model_spec(&self) -> ModelSpec {
        ModelSpec::new(self.decision.model.trim())
            .with_temperature(self.decision.temperature)
            .with_max_output_tokens(self.decision.max_output_tokens)
    }

    pub fn execution_params(&self) -> ExecutionParams {
        ExecutionParams::default()
            .with_top_k(self.retrieval.top_k)
            .with_max_passage_chars(self.retrieval.max_passage_chars)
            .with_max_context_chars(self.decision.max_context_chars)
            .with_retrieval_timeout(Some(Duration::from_secs(self.timeouts.retrieval_seconds)))
            .with_decision_timeout(Some(Duration::from_secs(self.timeouts.decision_seconds)))
            .with_parse_retries(self.decision.parse_retries)
    }

    /// Application-level configuration handed to the orchestrator
    pub fn to_review_config(&self) -> ReviewConfig {
        ReviewConfig::new(
            self.gate_thresholds(),
            self.coverage_weights(),
            self.execution_params(),
            self.model_spec(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_full_config() {
        let toml_str = r#"
[retrieval]
top_k = 6
max_passage_chars = 800

[coverage]
top_weight = 0.5
mean_weight = 0.5

[gates]
coverage_min = 0.3
approve_coverage_min = 0.5
min_citations_for_approval = 3

[decision]
model = "gemini-2.0-flash"
temperature = 0.0
max_output_tokens = 512
max_context_chars = 4000
parse_retries = 2

[timeouts]
retrieval_seconds = 10
decision_seconds = 45

[embedding]
base_url = "http://localhost:8080/v1/"
model = "nomic-embed-text"
dimensions = 384
api_key_env = "LOCAL_KEY"

[llm]
base_url = "http://localhost:8080/v1/"
api_key_env = "LOCAL_KEY"

[corpus]
path = "data/policies.jsonl"

[logging]
review_log = "reviews.jsonl"
"#;

        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert!(config.validate().is_ok());

        assert_eq!(config.retrieval.top_k, 6);
        assert_eq!(config.gates.min_citations_for_approval, 3);
        assert_eq!(config.decision.model, "gemini-2.0-flash");
        assert_eq!(config.embedding.dimensions, 384);
        assert_eq!(config.corpus.path, PathBuf::from("data/policies.jsonl"));
        assert_eq!(
            config.logging.review_log,
            Some(PathBuf::from("reviews.jsonl"))
        );

        let review = config.to_review_config();
        assert_eq!(review.thresholds().coverage_min, 0.3);
        assert_eq!(review.weights().top_weight, 0.5);
        assert_eq!(review.execution().top_k, 6);
        assert_eq!(review.execution().max_context_chars, 4000);
        assert_eq!(review.execution().parse_retries, 2);
        assert_eq!(
            review.execution().decision_timeout,
            Some(Duration::from_secs(45))
        );
        assert_eq!(review.model().name, "gemini-2.0-flash");
        assert_eq!(review.model().max_output_tokens, 512);
    }

    #[test]
    fn test_defaults_match_domain_defaults() {
        let config = FileConfig::default();
        assert!(config.validate().is_ok());

        let review = config.to_review_config();
        assert_eq!(review.thresholds(), &GateThresholds::default());
        assert_eq!(review.weights(), &CoverageWeights::default());
        assert_eq!(review.model(), &ModelSpec::default());
        assert_eq!(review.execution().top_k, 4);
        assert_eq!(config.embedding.model, DEFAULT_EMBEDDING_MODEL);
        assert_eq!(config.embedding.dimensions, 768);
        assert!(config.logging.review_log.is_none());
    }

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config: FileConfig = toml::from_str("[gates]\ncoverage_min = 0.2\n").unwrap();
        assert_eq!(config.gates.coverage_min, 0.2);
        assert_eq!(config.gates.approve_coverage_min, 0.45);
        assert_eq!(config.retrieval.top_k, 4);
    }

    #[test]
    fn test_validate_zero_timeout() {
        let config: FileConfig = toml::from_str("[timeouts]\ndecision_seconds = 0\n").unwrap();
        assert_eq!(
            config.validate(),
            Err(ConfigValidationError::InvalidTimeout("decision_seconds"))
        );
    }

    #[test]
    fn test_validate_zero_top_k() {
        let config: FileConfig = toml::from_str("[retrieval]\ntop_k = 0\n").unwrap();
        assert_eq!(config.validate(), Err(ConfigValidationError::InvalidTopK));
    }

    #[test]
    fn test_validate_threshold_range() {
        let config: FileConfig =
            toml::from_str("[gates]\napprove_coverage_min = 1.5\n").unwrap();
        assert!(matches!(
            config.validate(),
            Err(ConfigValidationError::ThresholdOutOfRange {
                field: "approve_coverage_min",
                ..
            })
        ));
    }

    #[test]
    fn test_validate_weights() {
        let config: FileConfig =
            toml::from_str("[coverage]\ntop_weight = 0.0\nmean_weight = 0.0\n").unwrap();
        assert!(matches!(
            config.validate(),
            Err(ConfigValidationError::InvalidCoverageWeights { .. })
        ));

        let config: FileConfig = toml::from_str("[coverage]\ntop_weight = -0.1\n").unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_empty_model_name() {
        let config: FileConfig = toml::from_str("[decision]\nmodel = \"  \"\n").unwrap();
        assert_eq!(
            config.validate(),
            Err(ConfigValidationError::EmptyModelName("decision.model"))
        );
    }
}
