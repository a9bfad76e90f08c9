//! Deterministic decision gates
//!
//! Two pure functions bracket the model call:
//!
//! ```text
//! ┌────────────┐   ┌───────────────┐   ┌────────────────┐   ┌─────────────┐
//! │ Retrieval  │ → │ Coverage Gate │ → │ Decision Agent │ → │ Policy Gate │
//! └────────────┘   └──────┬────────┘   └────────────────┘   └─────────────┘
//!                         │ coverage < coverage_min
//!                         └──→ reject, no model call
//! ```
//!
//! - [`CoverageGate`] runs before any model call and short-circuits requests
//!   with too little evidence.
//! - [`PolicyGate`] is the final authority over the verdict and downgrades
//!   approvals lacking citations or coverage.
//!
//! Both produce a [`GatedDecision`], the only input accepted by
//! [`FinalDecision::new`](crate::review::FinalDecision::new).

pub mod coverage_gate;
pub mod policy_gate;

pub use coverage_gate::{CoverageGate, CoverageGateOutcome};
pub use policy_gate::{PolicyGate, PolicyOutcome, PolicyViolation};

use crate::review::ProposedDecision;
use serde::{Deserialize, Serialize};

/// Numeric thresholds enforced by the gates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GateThresholds {
    /// Below this coverage the request is rejected without a model call
    pub coverage_min: f64,
    /// Minimum coverage for an approval to stand
    pub approve_coverage_min: f64,
    /// Minimum number of distinct valid citations for an approval to stand
    pub min_citations_for_approval: usize,
}

impl Default for GateThresholds {
    fn default() -> Self {
        Self {
            coverage_min: 0.35,
            approve_coverage_min: 0.45,
            min_citations_for_approval: 2,
        }
    }
}

impl GateThresholds {
    pub fn with_coverage_min(mut self, value: f64) -> Self {
        self.coverage_min = value;
        self
    }

    pub fn with_approve_coverage_min(mut self, value: f64) -> Self {
        self.approve_coverage_min = value;
        self
    }

    pub fn with_min_citations_for_approval(mut self, value: usize) -> Self {
        self.min_citations_for_approval = value;
        self
    }

    /// Human-readable summary, e.g. for `--show-config`
    pub fn description(&self) -> String {
        format!(
            "coverage >= {:.2} to consult the model; approval needs coverage >= {:.2} and {} citation(s)",
            self.coverage_min, self.approve_coverage_min, self.min_citations_for_approval
        )
    }
}

impl std::fmt::Display for GateThresholds {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.description())
    }
}

/// A decision that has passed through one of the gates.
///
/// Cannot be constructed outside this crate.
#[derive(Debug, Clone, PartialEq)]
pub struct GatedDecision(ProposedDecision);

impl GatedDecision {
    pub(crate) fn new(decision: ProposedDecision) -> Self {
        Self(decision)
    }

    pub fn as_proposed(&self) -> &ProposedDecision {
        &self.0
    }

    pub fn into_inner(self) -> ProposedDecision {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_thresholds() {
        let t = GateThresholds::default();
        assert_eq!(t.coverage_min, 0.35);
        assert_eq!(t.approve_coverage_min, 0.45);
        assert_eq!(t.min_citations_for_approval, 2);
    }

    #[test]
    fn test_builder() {
        let t = GateThresholds::default()
            .with_coverage_min(0.2)
            .with_approve_coverage_min(0.6)
            .with_min_citations_for_approval(3);
        assert_eq!(t.coverage_min, 0.2);
        assert_eq!(t.approve_coverage_min, 0.6);
        assert_eq!(t.min_citations_for_approval, 3);
    }

    #[test]
    fn test_description() {
        assert_eq!(
            GateThresholds::default().to_string(),
            "coverage >= 0.35 to consult the model; approval needs coverage >= 0.45 and 2 citation(s)"
        );
    }
}
