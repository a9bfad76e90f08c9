//! Decision prompt template

use crate::core::string::truncate_chars;
use crate::retrieval::{CitationToken, RetrievalResult};
use crate::review::TaskRequest;

/// A rendered decision prompt
#[derive(Debug, Clone, PartialEq)]
pub struct DecisionPrompt {
    pub text: String,
    /// Tokens of the chunks that made it into the prompt, in prompt order
    pub included_citations: Vec<CitationToken>,
    /// Retrieved chunks left out because the context budget ran out
    pub omitted_chunks: usize,
}

/// Templates for the decision call
pub struct DecisionPromptTemplate;

impl DecisionPromptTemplate {
    /// System prompt for the decision call
    pub fn system() -> &'static str {
        r#"You are a compliance reviewer deciding whether a task may proceed.
Base your decision only on the policy excerpts provided with the task.
Every excerpt is labelled with a citation token such as [doc:3#chunk:17].
Cite excerpts by copying their tokens exactly. Never invent tokens.
If the excerpts do not clearly support approval, reject and say what is missing.
Respond with a single JSON object and nothing else."#
    }

    /// User prompt embedding the task and the retrieved excerpts.
    ///
    /// Excerpts are added in retrieval order until their combined text
    /// would exceed `max_context_chars`. The first excerpt is always
    /// included, truncated if necessary.
    pub fn decision_prompt(
        task: &TaskRequest,
        retrieval: &RetrievalResult,
        max_context_chars: usize,
    ) -> DecisionPrompt {
        let mut context = String::new();
        let mut included_citations = Vec::new();
        let mut used = 0usize;

        for chunk in retrieval.chunks() {
            let text_len = chunk.text.chars().count();
            let text = if used + text_len <= max_context_chars {
                chunk.text.as_str()
            } else if included_citations.is_empty() {
                truncate_chars(&chunk.text, max_context_chars)
            } else {
                break;
            };
            used += text.chars().count();

            let token = chunk.citation_token();
            context.push_str(&format!("\n[{}]", token));
            if let Some(label) = chunk.source_label() {
                context.push_str(&format!(" {}", label));
            }
            context.push('\n');
            context.push_str(text);
            context.push('\n');
            included_citations.push(token);
        }

        let omitted_chunks = retrieval.len() - included_citations.len();

        let text = format!(
            r#"Task ID: {task_id}

Task details:
{details}

Policy excerpts:
{context}
Decide whether the task should be approved or rejected.

Return only a JSON object with exactly these fields:
{{
  "decision": "approve" | "reject",
  "rationale": "<why, referring to the excerpts>",
  "citations": ["<citation tokens of the excerpts you relied on>"],
  "required_actions": ["<what must change before approval; empty when approving>"],
  "confidence": <number between 0 and 1>
}}

Approval needs at least two distinct supporting excerpts."#,
            task_id = task.task_id(),
            details = task.details(),
            context = context,
        );

        DecisionPrompt {
            text,
            included_citations,
            omitted_chunks,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::retrieval::{Chunk, CoverageWeights};

    fn task() -> TaskRequest {
        TaskRequest::try_new("CHG-42", "Rotate production database credentials").unwrap()
    }

    fn retrieval(chunks: Vec<Chunk>) -> RetrievalResult {
        RetrievalResult::new(chunks, &CoverageWeights::default())
    }

    #[test]
    fn test_prompt_contains_task_and_tagged_chunks() {
        let result = retrieval(vec![
            Chunk::new(1, 10, "Credentials rotate every 90 days.")
                .with_similarity(0.9)
                .with_title("Security Policy"),
            Chunk::new(2, 11, "Changes need a ticket.").with_similarity(0.7),
        ]);

        let prompt = DecisionPromptTemplate::decision_prompt(&task(), &result, 5000);

        assert!(prompt.text.contains("CHG-42"));
        assert!(prompt.text.contains("Rotate production database credentials"));
        assert!(prompt.text.contains("[doc:10#chunk:1] Security Policy\nCredentials rotate"));
        assert!(prompt.text.contains("[doc:11#chunk:2]\nChanges need a ticket."));
        assert!(prompt.text.contains("\"decision\""));
        assert_eq!(
            prompt.included_citations,
            vec![CitationToken::new(10, 1), CitationToken::new(11, 2)]
        );
        assert_eq!(prompt.omitted_chunks, 0);
    }

    #[test]
    fn test_context_budget_stops_adding_chunks() {
        let result = retrieval(vec![
            Chunk::new(1, 1, "a".repeat(30)).with_similarity(0.9),
            Chunk::new(2, 1, "b".repeat(30)).with_similarity(0.8),
            Chunk::new(3, 1, "c".repeat(30)).with_similarity(0.7),
        ]);

        let prompt = DecisionPromptTemplate::decision_prompt(&task(), &result, 70);

        assert_eq!(prompt.included_citations.len(), 2);
        assert_eq!(prompt.omitted_chunks, 1);
        assert!(!prompt.text.contains("doc:1#chunk:3"));
    }

    #[test]
    fn test_oversized_first_chunk_truncated() {
        let result = retrieval(vec![Chunk::new(1, 1, "x".repeat(100)).with_similarity(0.9)]);

        let prompt = DecisionPromptTemplate::decision_prompt(&task(), &result, 40);

        assert_eq!(prompt.included_citations.len(), 1);
        assert!(prompt.text.contains(&"x".repeat(40)));
        assert!(!prompt.text.contains(&"x".repeat(41)));
    }

    #[test]
    fn test_empty_retrieval() {
        let prompt =
            DecisionPromptTemplate::decision_prompt(&task(), &RetrievalResult::empty(), 5000);
        assert!(prompt.included_citations.is_empty());
        assert_eq!(prompt.omitted_chunks, 0);
    }

    #[test]
    fn test_system_prompt_demands_json() {
        assert!(DecisionPromptTemplate::system().contains("JSON"));
    }
}
