//! Policy gate: final authority over the verdict

use super::{GateThresholds, GatedDecision};
use crate::review::{ProposedDecision, Verdict};
use std::collections::HashSet;

/// A failed approval condition
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PolicyViolation {
    InsufficientCitations { found: usize, required: usize },
    InsufficientCoverage { coverage: f64, required: f64 },
}

impl std::fmt::Display for PolicyViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PolicyViolation::InsufficientCitations { found, required } => write!(
                f,
                "insufficient citations: found {}, require {}",
                found, required
            ),
            PolicyViolation::InsufficientCoverage { coverage, required } => write!(
                f,
                "insufficient coverage: found {:.2}, require {:.2}",
                coverage, required
            ),
        }
    }
}

/// Result of the policy gate
#[derive(Debug, Clone, PartialEq)]
pub struct PolicyOutcome {
    pub decision: GatedDecision,
    /// Conditions that forced a downgrade; empty when the proposal stood
    pub violations: Vec<PolicyViolation>,
}

impl PolicyOutcome {
    /// Whether a proposed approval was downgraded to reject
    pub fn is_overridden(&self) -> bool {
        !self.violations.is_empty()
    }
}

/// Post-model gate.
///
/// An approval stands only if it cites at least
/// `min_citations_for_approval` distinct chunks and coverage is at least
/// `approve_coverage_min`. Otherwise the verdict becomes reject,
/// `required_actions` lists every failed condition, and the model's
/// confidence is kept as stated. Rejections pass through unchanged.
///
/// # Example
///
/// ```
/// use review_domain::gate::{GateThresholds, PolicyGate};
/// use review_domain::review::{ProposedDecision, Verdict};
///
/// let proposed = ProposedDecision::approve(
///     "Complies with policy",
///     vec!["doc:1#chunk:1".to_string()],
///     0.9,
/// );
/// let outcome = PolicyGate::evaluate(proposed, 0.5, &GateThresholds::default());
///
/// assert!(outcome.is_overridden());
/// let decision = outcome.decision.as_proposed();
/// assert_eq!(decision.decision, Verdict::Reject);
/// assert_eq!(decision.required_actions, vec!["insufficient citations: found 1, require 2"]);
/// assert_eq!(decision.confidence, 0.9);
/// ```
pub struct PolicyGate;

impl PolicyGate {
    pub fn evaluate(
        proposed: ProposedDecision,
        coverage: f64,
        thresholds: &GateThresholds,
    ) -> PolicyOutcome {
        if proposed.decision == Verdict::Reject {
            return PolicyOutcome {
                decision: GatedDecision::new(proposed),
                violations: Vec::new(),
            };
        }

        let violations = Self::violations(&proposed, coverage, thresholds);
        if violations.is_empty() {
            return PolicyOutcome {
                decision: GatedDecision::new(proposed),
                violations,
            };
        }

        let reasons: Vec<String> = violations.iter().map(|v| v.to_string()).collect();
        let downgraded = ProposedDecision {
            decision: Verdict::Reject,
            rationale: format!(
                "Proposed approval withheld by policy ({}). Model rationale: {}",
                reasons.join("; "),
                proposed.rationale
            ),
            citations: proposed.citations,
            required_actions: reasons,
            confidence: proposed.confidence,
        };

        PolicyOutcome {
            decision: GatedDecision::new(downgraded),
            violations,
        }
    }

    /// Approval conditions that `proposed` fails, in a fixed order
    pub fn violations(
        proposed: &ProposedDecision,
        coverage: f64,
        thresholds: &GateThresholds,
    ) -> Vec<PolicyViolation> {
        let mut violations = Vec::new();

        let distinct: HashSet<&str> = proposed.citations.iter().map(String::as_str).collect();
        if distinct.len() < thresholds.min_citations_for_approval {
            violations.push(PolicyViolation::InsufficientCitations {
                found: distinct.len(),
                required: thresholds.min_citations_for_approval,
            });
        }

        // NaN fails the comparison and counts as a violation
        if !(coverage >= thresholds.approve_coverage_min) {
            violations.push(PolicyViolation::InsufficientCoverage {
                coverage,
                required: thresholds.approve_coverage_min,
            });
        }

        violations
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn citations(n: usize) -> Vec<String> {
        (1..=n).map(|i| format!("doc:1#chunk:{i}")).collect()
    }

    #[test]
    fn test_approval_stands_when_all_conditions_hold() {
        let proposed = ProposedDecision::approve("ok", citations(3), 0.8);
        let outcome = PolicyGate::evaluate(proposed.clone(), 0.855, &GateThresholds::default());

        assert!(!outcome.is_overridden());
        assert_eq!(outcome.decision.as_proposed(), &proposed);
    }

    #[test]
    fn test_single_citation_forces_reject() {
        let proposed = ProposedDecision::approve("ok", citations(1), 0.7);
        let outcome = PolicyGate::evaluate(proposed, 0.5, &GateThresholds::default());

        assert_eq!(
            outcome.violations,
            vec![PolicyViolation::InsufficientCitations {
                found: 1,
                required: 2
            }]
        );
        let decision = outcome.decision.as_proposed();
        assert_eq!(decision.decision, Verdict::Reject);
        assert_eq!(
            decision.required_actions,
            vec!["insufficient citations: found 1, require 2".to_string()]
        );
        assert_eq!(decision.confidence, 0.7);
        assert_eq!(decision.citations, citations(1));
    }

    #[test]
    fn test_low_coverage_forces_reject() {
        let proposed = ProposedDecision::approve("ok", citations(2), 0.9);
        let outcome = PolicyGate::evaluate(proposed, 0.40, &GateThresholds::default());

        assert_eq!(outcome.violations.len(), 1);
        assert_eq!(
            outcome.decision.as_proposed().required_actions,
            vec!["insufficient coverage: found 0.40, require 0.45".to_string()]
        );
    }

    #[test]
    fn test_both_violations_reported_in_order() {
        let proposed = ProposedDecision::approve("ok", vec![], 0.9);
        let outcome = PolicyGate::evaluate(proposed, 0.1, &GateThresholds::default());

        let actions = &outcome.decision.as_proposed().required_actions;
        assert_eq!(actions.len(), 2);
        assert!(actions[0].starts_with("insufficient citations"));
        assert!(actions[1].starts_with("insufficient coverage"));
    }

    #[test]
    fn test_duplicate_citations_count_once() {
        let proposed = ProposedDecision::approve(
            "ok",
            vec!["doc:1#chunk:1".to_string(), "doc:1#chunk:1".to_string()],
            0.9,
        );
        let outcome = PolicyGate::evaluate(proposed, 0.9, &GateThresholds::default());
        assert!(outcome.is_overridden());
    }

    #[test]
    fn test_reject_passes_through() {
        let proposed = ProposedDecision::reject("no", vec!["fix it".to_string()]).with_confidence(0.6);
        let outcome = PolicyGate::evaluate(proposed.clone(), 0.0, &GateThresholds::default());

        assert!(!outcome.is_overridden());
        assert_eq!(outcome.decision.into_inner(), proposed);
    }

    #[test]
    fn test_custom_thresholds() {
        let thresholds = GateThresholds::default()
            .with_min_citations_for_approval(3)
            .with_approve_coverage_min(0.8);

        let proposed = ProposedDecision::approve("ok", citations(3), 0.9);
        assert!(!PolicyGate::evaluate(proposed.clone(), 0.8, &thresholds).is_overridden());
        assert!(PolicyGate::evaluate(proposed, 0.79, &thresholds).is_overridden());
    }

    #[test]
    fn test_approval_invariant_over_grid() {
        let thresholds = GateThresholds::default();
        for n in 0..5 {
            for step in 0..=20 {
                let coverage = step as f64 / 20.0;
                let proposed = ProposedDecision::approve("ok", citations(n), 0.5);
                let outcome = PolicyGate::evaluate(proposed, coverage, &thresholds);
                let decision = outcome.decision.as_proposed();
                if decision.decision == Verdict::Approve {
                    assert!(decision.citations.len() >= thresholds.min_citations_for_approval);
                    assert!(coverage >= thresholds.approve_coverage_min);
                }
            }
        }
    }
}
