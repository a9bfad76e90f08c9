//! Decision model specification

use serde::{Deserialize, Serialize};

/// Default chat model for decisions
pub const DEFAULT_DECISION_MODEL: &str = "gemini-1.5-flash";

/// Language model used by the Decision Agent, with its sampling settings.
///
/// Low temperature keeps verdicts reproducible across identical inputs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelSpec {
    /// Provider-side model identifier
    pub name: String,
    /// Sampling temperature
    pub temperature: f32,
    /// Upper bound on generated tokens
    pub max_output_tokens: u32,
}

impl ModelSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_max_output_tokens(mut self, max: u32) -> Self {
        self.max_output_tokens = max;
        self
    }
}

impl Default for ModelSpec {
    fn default() -> Self {
        Self {
            name: DEFAULT_DECISION_MODEL.to_string(),
            temperature: 0.1,
            max_output_tokens: 1000,
        }
    }
}

impl std::fmt::Display for ModelSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default() {
        let spec = ModelSpec::default();
        assert_eq!(spec.name, DEFAULT_DECISION_MODEL);
        assert_eq!(spec.max_output_tokens, 1000);
    }

    #[test]
    fn test_builder() {
        let spec = ModelSpec::new("gpt-4o-mini")
            .with_temperature(0.0)
            .with_max_output_tokens(512);
        assert_eq!(spec.to_string(), "gpt-4o-mini");
        assert_eq!(spec.temperature, 0.0);
        assert_eq!(spec.max_output_tokens, 512);
    }
}
