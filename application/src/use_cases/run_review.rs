//! Run Review use case
//!
//! Orchestrates one review through the pipeline:
//!
//! ```text
//! START → RETRIEVE → COVERAGE_GATE ─pass→ DECIDE → FILTER_CITATIONS → POLICY_GATE → FINALIZE → END
//!                                  └fail→ FINALIZE (no model call)
//! ```
//!
//! Every external-call error is fatal to the request. There is no partial
//! or best-effort decision.

use crate::config::ReviewConfig;
use crate::ports::embedding::{EmbeddingError, EmbeddingPort};
use crate::ports::llm_gateway::{GatewayError, LlmGateway};
use crate::ports::progress::{NoProgress, ProgressNotifier};
use crate::ports::review_logger::{NoReviewLogger, ReviewEvent, ReviewEventLogger};
use crate::ports::similarity_store::{SimilarityStore, StoreError};
use crate::use_cases::decide::{DecideError, DecisionAgent};
use crate::use_cases::retrieve::{RetrieveError, Retriever};
use review_domain::{
    CoverageGate, CoverageGateOutcome, DecisionParseError, DomainError, FinalDecision,
    GatedDecision, PolicyGate, RetrievalResult, ReviewErrorKind, ReviewFailure, ReviewRequest,
    ReviewStage, TaskRequest,
};
use serde_json::json;
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Errors that end a review without a decision
#[derive(Error, Debug)]
pub enum ReviewError {
    #[error("Invalid request: {0}")]
    InvalidRequest(#[from] DomainError),

    #[error("Embedding failed: {0}")]
    EmbeddingFailed(EmbeddingError),

    #[error("Retrieval unavailable: {0}")]
    RetrievalUnavailable(StoreError),

    #[error("Decision could not be parsed after {attempts} attempt(s): {source}")]
    DecisionParse {
        attempts: usize,
        #[source]
        source: DecisionParseError,
    },

    #[error("LLM unavailable: {0}")]
    LlmUnavailable(GatewayError),

    #[error("Timeout during {stage}: {detail}")]
    Timeout { stage: ReviewStage, detail: String },

    #[error("Review cancelled")]
    Cancelled,
}

impl ReviewError {
    pub fn kind(&self) -> ReviewErrorKind {
        match self {
            ReviewError::InvalidRequest(_) => ReviewErrorKind::InvalidRequest,
            ReviewError::EmbeddingFailed(_) => ReviewErrorKind::EmbeddingFailed,
            ReviewError::RetrievalUnavailable(_) => ReviewErrorKind::RetrievalUnavailable,
            ReviewError::DecisionParse { .. } => ReviewErrorKind::DecisionParseError,
            ReviewError::LlmUnavailable(_) => ReviewErrorKind::LlmUnavailable,
            ReviewError::Timeout { .. } => ReviewErrorKind::Timeout,
            ReviewError::Cancelled => ReviewErrorKind::Cancelled,
        }
    }

    /// Structured failure report for the caller
    pub fn to_failure(&self, task_id: impl Into<String>) -> ReviewFailure {
        ReviewFailure::new(task_id, self.kind(), self.to_string())
    }
}

impl From<RetrieveError> for ReviewError {
    fn from(e: RetrieveError) -> Self {
        let timeout = |detail: String| ReviewError::Timeout {
            stage: ReviewStage::Retrieve,
            detail,
        };
        match e {
            RetrieveError::Embedding(EmbeddingError::Timeout) => {
                timeout("embedding request timed out".to_string())
            }
            RetrieveError::Embedding(e) => ReviewError::EmbeddingFailed(e),
            RetrieveError::Store(StoreError::Timeout) => {
                timeout("similarity search timed out".to_string())
            }
            RetrieveError::Store(e) => ReviewError::RetrievalUnavailable(e),
            RetrieveError::Timeout(after) => {
                timeout(format!("no result after {}s", after.as_secs()))
            }
        }
    }
}

impl From<DecideError> for ReviewError {
    fn from(e: DecideError) -> Self {
        match e {
            DecideError::LlmUnavailable(GatewayError::Timeout) => ReviewError::Timeout {
                stage: ReviewStage::Decide,
                detail: "model request timed out".to_string(),
            },
            DecideError::LlmUnavailable(e) => ReviewError::LlmUnavailable(e),
            DecideError::Parse { attempts, source } => {
                ReviewError::DecisionParse { attempts, source }
            }
            DecideError::Timeout(after) => ReviewError::Timeout {
                stage: ReviewStage::Decide,
                detail: format!("no response after {}s", after.as_secs()),
            },
        }
    }
}

/// Use case for reviewing one task against the corpus.
///
/// Holds no per-request state; one instance serves concurrent reviews.
#[derive(Clone)]
pub struct RunReviewUseCase {
    retriever: Retriever,
    agent: DecisionAgent,
    config: ReviewConfig,
    logger: Arc<dyn ReviewEventLogger>,
    cancellation_token: Option<CancellationToken>,
}

impl RunReviewUseCase {
    pub fn new(
        embedder: Arc<dyn EmbeddingPort>,
        store: Arc<dyn SimilarityStore>,
        gateway: Arc<dyn LlmGateway>,
        config: ReviewConfig,
    ) -> Self {
        Self {
            retriever: Retriever::new(embedder, store),
            agent: DecisionAgent::new(gateway),
            config,
            logger: Arc::new(NoReviewLogger),
            cancellation_token: None,
        }
    }

    /// Record review events to `logger`
    pub fn with_logger(mut self, logger: Arc<dyn ReviewEventLogger>) -> Self {
        self.agent = self.agent.with_logger(logger.clone());
        self.logger = logger;
        self
    }

    /// Abort in-flight reviews when `token` is cancelled
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation_token = Some(token);
        self
    }

    pub fn config(&self) -> &ReviewConfig {
        &self.config
    }

    /// Execute the use case with default (no-op) progress
    pub async fn execute(&self, request: ReviewRequest) -> Result<FinalDecision, ReviewError> {
        self.execute_with_progress(request, &NoProgress).await
    }

    /// Execute the use case with progress callbacks
    pub async fn execute_with_progress(
        &self,
        request: ReviewRequest,
        progress: &dyn ProgressNotifier,
    ) -> Result<FinalDecision, ReviewError> {
        let started = Instant::now();
        let task = request.validate()?;

        let pipeline = self.run_pipeline(&task, progress, started);
        let result = if let Some(ref token) = self.cancellation_token {
            tokio::select! {
                biased;
                _ = token.cancelled() => Err(ReviewError::Cancelled),
                result = pipeline => result,
            }
        } else {
            pipeline.await
        };

        match &result {
            Ok((decision, model_calls)) => {
                info!(
                    task_id = decision.task_id(),
                    decision = %decision.decision(),
                    coverage = decision.coverage(),
                    citations = decision.citations().len(),
                    model_calls,
                    latency_ms = decision.latency_ms(),
                    "Review completed"
                );
                self.logger.log(ReviewEvent::new(
                    "review_completed",
                    json!({
                        "task_id": decision.task_id(),
                        "decision": decision.decision(),
                        "coverage": decision.coverage(),
                        "citations": decision.citations(),
                        "model_calls": model_calls,
                        "latency_ms": decision.latency_ms(),
                    }),
                ));
            }
            Err(e) => {
                warn!(
                    task_id = task.task_id(),
                    kind = %e.kind(),
                    latency_ms = elapsed_ms(started),
                    "Review failed: {}",
                    e
                );
                self.logger.log(ReviewEvent::new(
                    "review_failed",
                    json!({
                        "task_id": task.task_id(),
                        "kind": e.kind(),
                        "message": e.to_string(),
                    }),
                ));
            }
        }

        result.map(|(decision, _)| decision)
    }

    /// Run every stage; also returns the number of model calls made.
    async fn run_pipeline(
        &self,
        task: &TaskRequest,
        progress: &dyn ProgressNotifier,
        started: Instant,
    ) -> Result<(FinalDecision, usize), ReviewError> {
        let thresholds = self.config.thresholds();
        let execution = self.config.execution();

        // Retrieve
        progress.on_stage_start(ReviewStage::Retrieve);
        let retrieval = self
            .retriever
            .retrieve(task.details(), execution, self.config.weights())
            .await?;
        progress.on_stage_complete(ReviewStage::Retrieve);
        self.log_retrieval(task, &retrieval);

        // Coverage gate
        progress.on_stage_start(ReviewStage::CoverageGate);
        let gate = CoverageGate::evaluate(retrieval.coverage(), thresholds);
        progress.on_stage_complete(ReviewStage::CoverageGate);

        if let CoverageGateOutcome::Insufficient(rejection) = gate {
            info!(
                task_id = task.task_id(),
                coverage = retrieval.coverage(),
                "Coverage below {:.2}, rejecting without model call",
                thresholds.coverage_min
            );
            progress.on_short_circuit(retrieval.coverage());
            self.logger.log(ReviewEvent::new(
                "coverage_gate_rejected",
                json!({
                    "task_id": task.task_id(),
                    "coverage": retrieval.coverage(),
                    "coverage_min": thresholds.coverage_min,
                }),
            ));
            let decision = self.finalize(task, rejection, &retrieval, Vec::new(), started, progress);
            return Ok((decision, 0));
        }

        // Decide
        progress.on_stage_start(ReviewStage::Decide);
        let proposal = self
            .agent
            .propose(task, &retrieval, self.config.model(), execution, progress)
            .await?;
        progress.on_stage_complete(ReviewStage::Decide);

        // Filter citations
        progress.on_stage_start(ReviewStage::FilterCitations);
        let decision = DecisionAgent::filter(proposal, &retrieval);
        progress.on_stage_complete(ReviewStage::FilterCitations);
        let warnings = decision.warnings();
        let model_calls = decision.attempts;

        // Policy gate
        progress.on_stage_start(ReviewStage::PolicyGate);
        let proposed_verdict = decision.decision.decision;
        let outcome = PolicyGate::evaluate(decision.decision, retrieval.coverage(), thresholds);
        progress.on_stage_complete(ReviewStage::PolicyGate);

        if outcome.is_overridden() {
            let violations: Vec<String> = outcome.violations.iter().map(|v| v.to_string()).collect();
            info!(
                task_id = task.task_id(),
                "Policy gate overrode {}: {}",
                proposed_verdict,
                violations.join("; ")
            );
            self.logger.log(ReviewEvent::new(
                "policy_gate_override",
                json!({
                    "task_id": task.task_id(),
                    "proposed": proposed_verdict,
                    "violations": violations,
                }),
            ));
        }

        let decision = self.finalize(task, outcome.decision, &retrieval, warnings, started, progress);
        Ok((decision, model_calls))
    }

    fn finalize(
        &self,
        task: &TaskRequest,
        gated: GatedDecision,
        retrieval: &RetrievalResult,
        warnings: Vec<String>,
        started: Instant,
        progress: &dyn ProgressNotifier,
    ) -> FinalDecision {
        progress.on_stage_start(ReviewStage::Finalize);
        let decision =
            FinalDecision::new(task, gated, retrieval, elapsed_ms(started)).with_warnings(warnings);
        progress.on_stage_complete(ReviewStage::Finalize);
        decision
    }

    fn log_retrieval(&self, task: &TaskRequest, retrieval: &RetrievalResult) {
        debug!(
            task_id = task.task_id(),
            chunks = retrieval.len(),
            coverage = retrieval.coverage(),
            "Retrieved evidence"
        );
        let chunks: Vec<_> = retrieval
            .chunks()
            .iter()
            .map(|c| {
                json!({
                    "citation": c.citation_token(),
                    "similarity": c.similarity,
                })
            })
            .collect();
        self.logger.log(ReviewEvent::new(
            "retrieval_completed",
            json!({
                "task_id": task.task_id(),
                "coverage": retrieval.coverage(),
                "retrieved_doc_ids": retrieval.retrieved_doc_ids(),
                "chunks": chunks,
            }),
        ));
    }
}

fn elapsed_ms(started: Instant) -> u64 {
    u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX)
}
