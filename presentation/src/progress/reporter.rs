//! Progress reporting for review execution

use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use review_application::ProgressNotifier;
use review_domain::ReviewStage;
use std::sync::Mutex;
use std::time::Duration;

fn stage_display_name(stage: ReviewStage) -> &'static str {
    match stage {
        ReviewStage::Retrieve => "Retrieving evidence",
        ReviewStage::CoverageGate => "Checking coverage",
        ReviewStage::Decide => "Consulting decision model",
        ReviewStage::FilterCitations => "Filtering citations",
        ReviewStage::PolicyGate => "Applying policy",
        ReviewStage::Finalize => "Finalizing",
    }
}

/// Spinner on stderr that follows the current stage
pub struct ProgressReporter {
    spinner: Mutex<Option<ProgressBar>>,
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self {
            spinner: Mutex::new(None),
        }
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {prefix:.bold.cyan} {msg} {elapsed:.dim}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
    }

    fn with_spinner(&self, f: impl FnOnce(&ProgressBar)) {
        let Ok(mut guard) = self.spinner.lock() else {
            return;
        };
        let spinner = guard.get_or_insert_with(|| {
            let pb = ProgressBar::new_spinner();
            pb.set_style(Self::spinner_style());
            pb.enable_steady_tick(Duration::from_millis(100));
            pb
        });
        f(spinner);
    }

    /// Remove the spinner before printing results
    pub fn finish(&self) {
        if let Ok(mut guard) = self.spinner.lock()
            && let Some(pb) = guard.take()
        {
            pb.finish_and_clear();
        }
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressNotifier for ProgressReporter {
    fn on_stage_start(&self, stage: ReviewStage) {
        self.with_spinner(|pb| {
            pb.set_prefix(stage_display_name(stage));
            pb.set_message("...");
        });
    }

    fn on_stage_complete(&self, stage: ReviewStage) {
        if stage.is_external() {
            self.with_spinner(|pb| {
                pb.println(format!("{} {}", "v".green(), stage_display_name(stage)));
            });
        }
        if stage == ReviewStage::Finalize {
            self.finish();
        }
    }

    fn on_short_circuit(&self, coverage: f64) {
        self.with_spinner(|pb| {
            pb.println(format!(
                "{} Coverage {:.2} below minimum; skipping model",
                "!".yellow(),
                coverage
            ));
        });
    }

    fn on_retry(&self, attempt: usize, reason: &str) {
        self.with_spinner(|pb| {
            pb.set_message(format!("retrying (attempt {}): {}", attempt, reason));
        });
    }
}

impl Drop for ProgressReporter {
    fn drop(&mut self) {
        self.finish();
    }
}

/// Plain stage lines on stderr, for terminals without spinner support
pub struct SimpleProgress;

impl ProgressNotifier for SimpleProgress {
    fn on_stage_start(&self, stage: ReviewStage) {
        eprintln!("{} {}", "->".cyan(), stage_display_name(stage).bold());
    }

    fn on_stage_complete(&self, _stage: ReviewStage) {}

    fn on_short_circuit(&self, coverage: f64) {
        eprintln!(
            "  {} coverage {:.2} below minimum; skipping model",
            "!".yellow(),
            coverage
        );
    }

    fn on_retry(&self, attempt: usize, reason: &str) {
        eprintln!("  {} retry {}: {}", "x".red(), attempt, reason);
    }
}
