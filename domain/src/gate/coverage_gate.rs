//! Coverage gate: pre-model evidence check

use super::{GateThresholds, GatedDecision};
use crate::review::ProposedDecision;

/// Required action attached to every low-coverage rejection
pub const PROVIDE_MORE_CONTEXT: &str =
    "provide_more_context: Provide additional detail or documentation; the corpus does not sufficiently cover this task";

/// Result of the coverage gate
#[derive(Debug, Clone, PartialEq)]
pub enum CoverageGateOutcome {
    /// Enough evidence to consult the model
    Pass,
    /// Short-circuit rejection; no model call must follow
    Insufficient(GatedDecision),
}

impl CoverageGateOutcome {
    pub fn is_pass(&self) -> bool {
        matches!(self, CoverageGateOutcome::Pass)
    }
}

/// Pre-model gate.
///
/// Identical low-coverage inputs always produce the identical rejection,
/// independent of any model behavior.
///
/// # Example
///
/// ```
/// use review_domain::gate::{CoverageGate, GateThresholds};
///
/// let thresholds = GateThresholds::default();
/// assert!(CoverageGate::evaluate(0.5, &thresholds).is_pass());
/// assert!(!CoverageGate::evaluate(0.09, &thresholds).is_pass());
/// ```
pub struct CoverageGate;

impl CoverageGate {
    pub fn evaluate(coverage: f64, thresholds: &GateThresholds) -> CoverageGateOutcome {
        // NaN fails the comparison and is rejected
        if coverage >= thresholds.coverage_min {
            return CoverageGateOutcome::Pass;
        }

        let rationale = format!(
            "Insufficient contextual information available for review. Coverage {:.2} is below required threshold {:.2}.",
            coverage, thresholds.coverage_min
        );
        let decision =
            ProposedDecision::reject(rationale, vec![PROVIDE_MORE_CONTEXT.to_string()]);

        CoverageGateOutcome::Insufficient(GatedDecision::new(decision))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::review::Verdict;

    #[test]
    fn test_pass_at_threshold() {
        let t = GateThresholds::default();
        assert!(CoverageGate::evaluate(0.35, &t).is_pass());
        assert!(CoverageGate::evaluate(1.0, &t).is_pass());
    }

    #[test]
    fn test_below_threshold_rejects() {
        let t = GateThresholds::default();
        let CoverageGateOutcome::Insufficient(gated) = CoverageGate::evaluate(0.34, &t) else {
            panic!("expected short-circuit");
        };
        let decision = gated.as_proposed();
        assert_eq!(decision.decision, Verdict::Reject);
        assert!(decision.citations.is_empty());
        assert_eq!(decision.confidence, 0.0);
        assert_eq!(decision.required_actions, vec![PROVIDE_MORE_CONTEXT.to_string()]);
        assert!(decision.rationale.contains("0.34"));
        assert!(decision.rationale.contains("0.35"));
    }

    #[test]
    fn test_nan_coverage_rejects() {
        assert!(!CoverageGate::evaluate(f64::NAN, &GateThresholds::default()).is_pass());
    }

    #[test]
    fn test_deterministic() {
        let t = GateThresholds::default();
        for c in [0.0, 0.09, 0.2, 0.349] {
            assert_eq!(CoverageGate::evaluate(c, &t), CoverageGate::evaluate(c, &t));
        }
    }
}
