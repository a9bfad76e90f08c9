//! Decision outcome types
//!
//! A [`ProposedDecision`] is what the model said, after parsing and citation
//! filtering. A [`FinalDecision`] can only be assembled from a
//! [`GatedDecision`], which only the gates produce, so an approval that
//! violates the policy thresholds is unrepresentable.

use super::request::TaskRequest;
use crate::gate::GatedDecision;
use crate::retrieval::RetrievalResult;
use serde::{Deserialize, Serialize};

/// Approve / reject verdict
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    Approve,
    Reject,
}

impl Verdict {
    pub fn is_approve(&self) -> bool {
        matches!(self, Verdict::Approve)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Verdict::Approve => "approve",
            Verdict::Reject => "reject",
        }
    }
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Verdict {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "approve" => Ok(Verdict::Approve),
            "reject" => Ok(Verdict::Reject),
            other => Err(format!(
                "Unknown decision: {}. Valid: approve, reject",
                other
            )),
        }
    }
}

/// Verdict proposed by the Decision Agent.
///
/// `citations` may still contain tokens for chunks that were never retrieved
/// until the citation filter has run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProposedDecision {
    pub decision: Verdict,
    pub rationale: String,
    pub citations: Vec<String>,
    /// Only meaningful when rejecting
    pub required_actions: Vec<String>,
    /// Model's stated confidence, in [0, 1]
    pub confidence: f64,
}

impl ProposedDecision {
    pub fn approve(rationale: impl Into<String>, citations: Vec<String>, confidence: f64) -> Self {
        Self {
            decision: Verdict::Approve,
            rationale: rationale.into(),
            citations,
            required_actions: Vec::new(),
            confidence: confidence.clamp(0.0, 1.0),
        }
    }

    pub fn reject(rationale: impl Into<String>, required_actions: Vec<String>) -> Self {
        Self {
            decision: Verdict::Reject,
            rationale: rationale.into(),
            citations: Vec::new(),
            required_actions,
            confidence: 0.0,
        }
    }

    pub fn with_citations(mut self, citations: Vec<String>) -> Self {
        self.citations = citations;
        self
    }

    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = confidence.clamp(0.0, 1.0);
        self
    }
}

/// Decision returned to the caller.
///
/// Invariant: `decision == Approve` implies at least the configured minimum
/// of valid citations and coverage at or above the approval minimum.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FinalDecision {
    task_id: String,
    decision: Verdict,
    rationale: String,
    citations: Vec<String>,
    retrieved_doc_ids: Vec<u64>,
    coverage: f64,
    latency_ms: u64,
    required_actions: Vec<String>,
    confidence: f64,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    warnings: Vec<String>,
}

impl FinalDecision {
    pub fn new(
        task: &TaskRequest,
        gated: GatedDecision,
        retrieval: &RetrievalResult,
        latency_ms: u64,
    ) -> Self {
        let proposed = gated.into_inner();
        Self {
            task_id: task.task_id().to_string(),
            decision: proposed.decision,
            rationale: proposed.rationale,
            citations: proposed.citations,
            retrieved_doc_ids: retrieval.retrieved_doc_ids(),
            coverage: retrieval.coverage(),
            latency_ms,
            required_actions: proposed.required_actions,
            confidence: proposed.confidence,
            warnings: Vec::new(),
        }
    }

    /// Attach non-fatal warnings (dropped citations, sanitized fields)
    pub fn with_warnings(mut self, warnings: Vec<String>) -> Self {
        self.warnings = warnings;
        self
    }

    pub fn task_id(&self) -> &str {
        &self.task_id
    }

    pub fn decision(&self) -> Verdict {
        self.decision
    }

    pub fn is_approved(&self) -> bool {
        self.decision.is_approve()
    }

    pub fn rationale(&self) -> &str {
        &self.rationale
    }

    pub fn citations(&self) -> &[String] {
        &self.citations
    }

    pub fn retrieved_doc_ids(&self) -> &[u64] {
        &self.retrieved_doc_ids
    }

    pub fn coverage(&self) -> f64 {
        self.coverage
    }

    pub fn latency_ms(&self) -> u64 {
        self.latency_ms
    }

    pub fn required_actions(&self) -> &[String] {
        &self.required_actions
    }

    pub fn confidence(&self) -> f64 {
        self.confidence
    }

    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gate::{CoverageGate, CoverageGateOutcome, GateThresholds};

    #[test]
    fn test_verdict_parse() {
        assert_eq!("approve".parse::<Verdict>(), Ok(Verdict::Approve));
        assert_eq!(" REJECT ".parse::<Verdict>(), Ok(Verdict::Reject));
        assert!("maybe".parse::<Verdict>().is_err());
    }

    #[test]
    fn test_verdict_serde() {
        assert_eq!(serde_json::to_string(&Verdict::Approve).unwrap(), "\"approve\"");
        let v: Verdict = serde_json::from_str("\"reject\"").unwrap();
        assert_eq!(v, Verdict::Reject);
    }

    #[test]
    fn test_proposed_confidence_clamped() {
        let p = ProposedDecision::approve("ok", vec![], 1.7);
        assert_eq!(p.confidence, 1.0);
        let p = p.with_confidence(-2.0);
        assert_eq!(p.confidence, 0.0);
    }

    #[test]
    fn test_final_decision_serialization_shape() {
        let task = TaskRequest::try_new("T-1", "details").unwrap();
        let retrieval = RetrievalResult::empty();
        let CoverageGateOutcome::Insufficient(gated) =
            CoverageGate::evaluate(retrieval.coverage(), &GateThresholds::default())
        else {
            panic!("empty retrieval must fail the coverage gate");
        };

        let decision = FinalDecision::new(&task, gated, &retrieval, 12);
        let json = serde_json::to_value(&decision).unwrap();

        assert_eq!(json["task_id"], "T-1");
        assert_eq!(json["decision"], "reject");
        assert_eq!(json["latency_ms"], 12);
        assert_eq!(json["citations"], serde_json::json!([]));
        assert_eq!(json["retrieved_doc_ids"], serde_json::json!([]));
        assert!(json.get("warnings").is_none());

        let with_warnings = decision.with_warnings(vec!["w".to_string()]);
        let json = serde_json::to_value(&with_warnings).unwrap();
        assert_eq!(json["warnings"], serde_json::json!(["w"]));
    }
}
