//! Review configuration container.

use super::ExecutionParams;
use review_domain::{CoverageWeights, GateThresholds, ModelSpec};

/// Everything [`RunReviewUseCase`](crate::use_cases::run_review::RunReviewUseCase)
/// needs besides its ports.
///
/// Built by the infrastructure config loader; tests build it directly.
#[derive(Debug, Clone, Default)]
pub struct ReviewConfig {
    thresholds: GateThresholds,
    weights: CoverageWeights,
    execution: ExecutionParams,
    model: ModelSpec,
}

impl ReviewConfig {
    pub fn new(
        thresholds: GateThresholds,
        weights: CoverageWeights,
        execution: ExecutionParams,
        model: ModelSpec,
    ) -> Self {
        Self {
            thresholds,
            weights,
            execution,
            model,
        }
    }

    // ==================== Accessors ====================

    pub fn thresholds(&self) -> &GateThresholds {
        &self.thresholds
    }

    pub fn weights(&self) -> &CoverageWeights {
        &self.weights
    }

    pub fn execution(&self) -> &ExecutionParams {
        &self.execution
    }

    pub fn model(&self) -> &ModelSpec {
        &self.model
    }

    // ==================== Builder Methods ====================

    pub fn with_thresholds(mut self, thresholds: GateThresholds) -> Self {
        self.thresholds = thresholds;
        self
    }

    pub fn with_weights(mut self, weights: CoverageWeights) -> Self {
        self.weights = weights;
        self
    }

    pub fn with_execution(mut self, execution: ExecutionParams) -> Self {
        self.execution = execution;
        self
    }

    pub fn with_model(mut self, model: ModelSpec) -> Self {
        self.model = model;
        self
    }
}
