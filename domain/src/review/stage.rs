//! Review pipeline stages

use serde::{Deserialize, Serialize};

/// Stages of the review state machine, in execution order.
///
/// ```text
/// RETRIEVE → COVERAGE_GATE ─pass→ DECIDE → FILTER_CITATIONS → POLICY_GATE → FINALIZE
///                          └fail─────────────────────────────────────────→ FINALIZE
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewStage {
    Retrieve,
    CoverageGate,
    Decide,
    FilterCitations,
    PolicyGate,
    Finalize,
}

impl ReviewStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReviewStage::Retrieve => "retrieve",
            ReviewStage::CoverageGate => "coverage_gate",
            ReviewStage::Decide => "decide",
            ReviewStage::FilterCitations => "filter_citations",
            ReviewStage::PolicyGate => "policy_gate",
            ReviewStage::Finalize => "finalize",
        }
    }

    /// Whether this stage performs an external call
    pub fn is_external(&self) -> bool {
        matches!(self, ReviewStage::Retrieve | ReviewStage::Decide)
    }
}

impl std::fmt::Display for ReviewStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
