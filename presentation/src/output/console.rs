//! Console output formatter for review results

use crate::output::formatter::OutputFormatter;
use colored::Colorize;
use review_application::HealthReport;
use review_domain::{FinalDecision, ReviewFailure, Verdict};

/// Formats review results for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{:^60}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn section(output: &mut String, title: &str, items: &[String], bullet: &str) {
        if items.is_empty() {
            return;
        }
        output.push_str(&format!("\n{}\n", title.cyan().bold()));
        for item in items {
            output.push_str(&format!("  {} {}\n", bullet, item));
        }
    }

    /// Indent a multi-line string
    pub fn indent(text: &str, prefix: &str) -> String {
        text.lines()
            .map(|line| format!("{}{}", prefix, line))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format_decision(&self, decision: &FinalDecision) -> String {
        let mut output = String::new();

        output.push_str(&Self::header(&format!("Review {}", decision.task_id())));
        output.push('\n');

        let verdict = match decision.decision() {
            Verdict::Approve => "APPROVE".green().bold(),
            Verdict::Reject => "REJECT".red().bold(),
        };
        output.push_str(&format!("{} {}\n", "Decision:".cyan().bold(), verdict));
        output.push_str(&format!(
            "{} {:.2}   {} {:.2}   {} {} ms\n",
            "Coverage:".dimmed(),
            decision.coverage(),
            "Confidence:".dimmed(),
            decision.confidence(),
            "Latency:".dimmed(),
            decision.latency_ms()
        ));

        output.push_str(&format!("\n{}\n", "Rationale:".cyan().bold()));
        output.push_str(&Self::indent(decision.rationale(), "  "));
        output.push('\n');

        Self::section(&mut output, "Citations:", decision.citations(), "*");

        if !decision.retrieved_doc_ids().is_empty() {
            let ids: Vec<String> = decision
                .retrieved_doc_ids()
                .iter()
                .map(|id| id.to_string())
                .collect();
            output.push_str(&format!(
                "\n{} {}\n",
                "Retrieved documents:".cyan().bold(),
                ids.join(", ")
            ));
        }

        Self::section(
            &mut output,
            "Required actions:",
            decision.required_actions(),
            "-",
        );

        if !decision.warnings().is_empty() {
            output.push_str(&format!("\n{}\n", "Warnings:".yellow().bold()));
            for warning in decision.warnings() {
                output.push_str(&format!("  {} {}\n", "!".yellow(), warning));
            }
        }

        output.push_str(&format!("\n{}\n", "=".repeat(60).cyan()));
        output
    }

    fn format_failure(&self, failure: &ReviewFailure) -> String {
        let subject = if failure.task_id.is_empty() {
            String::new()
        } else {
            format!(" {}", failure.task_id)
        };
        format!(
            "{}{} {} ({})\n",
            "Review failed".red().bold(),
            subject,
            failure.message,
            failure.kind.to_string().yellow()
        )
    }

    fn format_health(&self, report: &HealthReport) -> String {
        let status = if report.is_healthy() {
            "healthy".green().bold()
        } else {
            "unhealthy".red().bold()
        };

        let mut output = format!("{} {}\n", "Status:".cyan().bold(), status);
        output.push_str(&format!("  Corpus chunks: {}\n", report.chunks));
        output.push_str(&format!(
            "  Embedding model: {} ({} dimensions)\n",
            report.embedding_model, report.embedding_dimensions
        ));
        if let Some(ref reason) = report.reason {
            output.push_str(&format!("  Reason: {}\n", reason));
        }
        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use review_application::HealthStatus;
    use review_domain::{
        Chunk, CoverageWeights, GateThresholds, PolicyGate, ProposedDecision, RetrievalResult,
        ReviewErrorKind, TaskRequest,
    };

    fn downgraded_decision() -> FinalDecision {
        let task = TaskRequest::try_new("T-7", "Drop the legacy audit table").unwrap();
        let retrieval = RetrievalResult::new(
            vec![Chunk::new(1, 4, "Audit tables are retained for 7 years.").with_similarity(0.7)],
            &CoverageWeights::default(),
        );
        let proposed =
            ProposedDecision::approve("Looks safe.", vec!["doc:4#chunk:1".to_string()], 0.6);
        let outcome = PolicyGate::evaluate(proposed, retrieval.coverage(), &GateThresholds::default());
        FinalDecision::new(&task, outcome.decision, &retrieval, 840)
            .with_warnings(vec!["dropped 1 citation not present in retrieved evidence".to_string()])
    }

    #[test]
    fn test_format_decision_sections() {
        let text = ConsoleFormatter.format_decision(&downgraded_decision());

        assert!(text.contains("Review T-7"));
        assert!(text.contains("REJECT"));
        assert!(text.contains("doc:4#chunk:1"));
        assert!(text.contains("insufficient citations: found 1, require 2"));
        assert!(text.contains("dropped 1 citation"));
        assert!(text.contains("840 ms"));
    }

    #[test]
    fn test_format_failure() {
        let failure = ReviewFailure::new("T-3", ReviewErrorKind::LlmUnavailable, "connection refused");
        let text = ConsoleFormatter.format_failure(&failure);
        assert!(text.contains("T-3"));
        assert!(text.contains("connection refused"));
        assert!(text.contains("llm_unavailable"));
    }

    #[test]
    fn test_format_health() {
        let report = HealthReport {
            status: HealthStatus::Healthy,
            chunks: 1280,
            embedding_model: "text-embedding-004".to_string(),
            embedding_dimensions: 768,
            reason: None,
        };
        let text = ConsoleFormatter.format_health(&report);
        assert!(text.contains("1280"));
        assert!(text.contains("768 dimensions"));
        assert!(!text.contains("Reason"));
    }

    #[test]
    fn test_indent() {
        assert_eq!(ConsoleFormatter::indent("a\nb", "  "), "  a\n  b");
    }
}
