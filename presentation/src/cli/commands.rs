//! CLI command definitions

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Output format for review results
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Colored, human-readable report
    Human,
    /// JSON envelope, one object per review
    Json,
}

/// CLI arguments for task-review
#[derive(Parser, Debug)]
#[command(name = "task-review")]
#[command(author, version, about = "Evidence-gated task review against a document corpus")]
#[command(long_about = r#"
task-review decides whether a task should be approved, grounding every
approval in retrieved evidence.

Each review runs these stages:
1. Retrieve: embed the task and fetch the most similar corpus chunks
2. Coverage gate: reject without consulting the model if evidence is weak
3. Decide: ask the model for a verdict citing retrieved chunks
4. Policy gate: downgrade approvals lacking citations or coverage

Configuration files are loaded from (in priority order):
1. TASK_REVIEW_* environment variables (e.g. TASK_REVIEW_GATES__COVERAGE_MIN)
2. --config <path>     Explicit config file
3. ./review.toml       Project-level config
4. ~/.config/task-review/config.toml   Global config

Example:
  task-review review T-42 "Migrate the billing cron job to the new scheduler"
  task-review review --request task.json --output json
  task-review batch tasks.jsonl --concurrency 8
  task-review health
"#)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "human", global = true)]
    pub output: OutputFormat,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long, global = true)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,

    /// Also write diagnostic logs to this file
    #[arg(long, value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Review a single task
    Review {
        /// Caller-supplied task identifier
        #[arg(required_unless_present = "request")]
        task_id: Option<String>,

        /// Task description to review
        #[arg(required_unless_present = "request")]
        details: Option<String>,

        /// Read `{"task_id", "details"}` from a JSON file ("-" for stdin)
        #[arg(long, value_name = "PATH", conflicts_with_all = ["task_id", "details"])]
        request: Option<PathBuf>,
    },

    /// Review every request in a JSONL file ("-" for stdin)
    Batch {
        /// One `{"task_id", "details"}` object per line
        file: PathBuf,

        /// Reviews in flight at once
        #[arg(short, long, default_value_t = 4, value_parser = clap::value_parser!(u16).range(1..))]
        concurrency: u16,
    },

    /// Check corpus and embedding configuration
    Health,
}
