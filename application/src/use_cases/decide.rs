//! Decision Agent
//!
//! Prompts the model with the task and its evidence, parses the structured
//! verdict, neutralizes markup and drops citations to chunks the model was
//! not shown. The agent never decides on its own: its output is a
//! [`ProposedDecision`] for the Policy Gate.

use crate::config::ExecutionParams;
use crate::ports::llm_gateway::{GatewayError, LlmGateway};
use crate::ports::progress::ProgressNotifier;
use crate::ports::review_logger::{NoReviewLogger, ReviewEvent, ReviewEventLogger};
use review_domain::core::string::preview;
use review_domain::{
    CitationToken, DecisionParseError, DecisionPromptTemplate, ModelSpec, ProposedDecision,
    RetrievalResult, TaskRequest, filter_citations, parse_decision_response, sanitize_decision,
};
use serde_json::json;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

/// Errors that can occur while obtaining a decision
#[derive(Error, Debug)]
pub enum DecideError {
    #[error("LLM unavailable: {0}")]
    LlmUnavailable(#[from] GatewayError),

    #[error("Unparseable decision after {attempts} attempt(s): {source}")]
    Parse {
        attempts: usize,
        #[source]
        source: DecisionParseError,
    },

    #[error("Decision timed out after {}s", .0.as_secs())]
    Timeout(Duration),
}

/// Parsed and sanitized model output, before citation filtering
#[derive(Debug, Clone)]
pub struct Proposal {
    pub decision: ProposedDecision,
    /// Fields rewritten by markup sanitization
    pub sanitized_fields: Vec<&'static str>,
    /// Retrieved chunks left out of the prompt by the context limit
    pub omitted_chunks: usize,
    /// Chunks whose text was in the prompt; only these may be cited
    pub prompted: Vec<CitationToken>,
    /// Model calls made, including the successful one
    pub attempts: usize,
}

/// Decision ready for the Policy Gate
#[derive(Debug, Clone)]
pub struct AgentDecision {
    pub decision: ProposedDecision,
    pub dropped_citations: Vec<String>,
    pub sanitized_fields: Vec<&'static str>,
    pub omitted_chunks: usize,
    pub attempts: usize,
}

impl AgentDecision {
    /// Non-fatal corrections worth surfacing to the caller
    pub fn warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();
        if !self.dropped_citations.is_empty() {
            warnings.push(format!(
                "dropped {} citation(s) outside the evidence shown to the model: {}",
                self.dropped_citations.len(),
                self.dropped_citations
                    .iter()
                    .map(|c| preview(c, 60))
                    .collect::<Vec<_>>()
                    .join(", ")
            ));
        }
        for field in &self.sanitized_fields {
            warnings.push(format!("markup removed from {}", field));
        }
        if self.omitted_chunks > 0 {
            warnings.push(format!(
                "{} retrieved chunk(s) left out of the prompt by the context limit",
                self.omitted_chunks
            ));
        }
        warnings
    }
}

/// LLM-backed decision maker
#[derive(Clone)]
pub struct DecisionAgent {
    gateway: Arc<dyn LlmGateway>,
    logger: Arc<dyn ReviewEventLogger>,
}

impl DecisionAgent {
    pub fn new(gateway: Arc<dyn LlmGateway>) -> Self {
        Self {
            gateway,
            logger: Arc::new(NoReviewLogger),
        }
    }

    pub fn with_logger(mut self, logger: Arc<dyn ReviewEventLogger>) -> Self {
        self.logger = logger;
        self
    }

    /// Propose a decision and filter its citations against `retrieval`.
    pub async fn decide(
        &self,
        task: &TaskRequest,
        retrieval: &RetrievalResult,
        model: &ModelSpec,
        params: &ExecutionParams,
        progress: &dyn ProgressNotifier,
    ) -> Result<AgentDecision, DecideError> {
        let proposal = self.propose(task, retrieval, model, params, progress).await?;
        Ok(Self::filter(proposal, retrieval))
    }

    /// Ask the model for a verdict.
    ///
    /// Unparseable output is retried up to `params.parse_retries` times with
    /// a fresh session. Gateway errors and timeouts are not retried.
    pub async fn propose(
        &self,
        task: &TaskRequest,
        retrieval: &RetrievalResult,
        model: &ModelSpec,
        params: &ExecutionParams,
        progress: &dyn ProgressNotifier,
    ) -> Result<Proposal, DecideError> {
        let prompt =
            DecisionPromptTemplate::decision_prompt(task, retrieval, params.max_context_chars);
        let attempts = params.decision_attempts();
        let mut last_error = DecisionParseError::NoJsonObject;

        for attempt in 1..=attempts {
            self.logger.log(ReviewEvent::new(
                "llm_prompt",
                json!({
                    "task_id": task.task_id(),
                    "attempt": attempt,
                    "model": model.name,
                    "included_citations": prompt.included_citations,
                    "omitted_chunks": prompt.omitted_chunks,
                    "prompt": prompt.text,
                }),
            ));

            let response = self
                .complete(model, &prompt.text, params.decision_timeout)
                .await?;

            self.logger.log(ReviewEvent::new(
                "llm_response",
                json!({
                    "task_id": task.task_id(),
                    "attempt": attempt,
                    "model": model.name,
                    "bytes": response.len(),
                    "text": response,
                }),
            ));

            match parse_decision_response(&response) {
                Ok(mut decision) => {
                    let sanitized_fields = sanitize_decision(&mut decision);
                    if !sanitized_fields.is_empty() {
                        warn!(
                            task_id = task.task_id(),
                            fields = ?sanitized_fields,
                            "Markup removed from model output"
                        );
                    }
                    debug!(
                        task_id = task.task_id(),
                        attempt,
                        decision = %decision.decision,
                        "Model proposed decision"
                    );
                    return Ok(Proposal {
                        decision,
                        sanitized_fields,
                        omitted_chunks: prompt.omitted_chunks,
                        prompted: prompt.included_citations,
                        attempts: attempt,
                    });
                }
                Err(e) => {
                    warn!(
                        task_id = task.task_id(),
                        attempt,
                        "Unparseable model output: {} ({})",
                        e,
                        preview(&response, 120)
                    );
                    if attempt < attempts {
                        progress.on_retry(attempt, &e.to_string());
                    }
                    last_error = e;
                }
            }
        }

        Err(DecideError::Parse {
            attempts,
            source: last_error,
        })
    }

    /// Drop citations that do not name a retrieved chunk whose text was in
    /// the prompt.
    ///
    /// Chunks cut by the context limit were retrieved but never shown, so
    /// citing them is treated like citing an unknown chunk.
    pub fn filter(proposal: Proposal, retrieval: &RetrievalResult) -> AgentDecision {
        let Proposal {
            mut decision,
            sanitized_fields,
            omitted_chunks,
            prompted,
            attempts,
        } = proposal;

        let mut filtered = filter_citations(&decision.citations, retrieval);
        let shown: HashSet<&str> = prompted.iter().map(CitationToken::as_str).collect();
        let (kept, unseen): (Vec<String>, Vec<String>) = filtered
            .kept
            .into_iter()
            .partition(|citation| shown.contains(citation.as_str()));
        filtered.kept = kept;
        filtered.dropped.extend(unseen);

        if filtered.has_dropped() {
            debug!(dropped = ?filtered.dropped, "Dropped citations outside the prompted evidence");
        }
        decision.citations = filtered.kept;

        AgentDecision {
            decision,
            dropped_citations: filtered.dropped,
            sanitized_fields,
            omitted_chunks,
            attempts,
        }
    }

    /// One model call on a fresh session
    async fn complete(
        &self,
        model: &ModelSpec,
        prompt: &str,
        timeout: Option<Duration>,
    ) -> Result<String, DecideError> {
        let call = async {
            let session = self
                .gateway
                .create_session_with_system_prompt(model, DecisionPromptTemplate::system())
                .await?;
            session.send(prompt).await
        };

        let response = match timeout {
            Some(timeout) => tokio::time::timeout(timeout, call)
                .await
                .map_err(|_| DecideError::Timeout(timeout))?,
            None => call.await,
        };
        Ok(response?)
    }
}
