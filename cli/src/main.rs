//! CLI entrypoint for task-review
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, anyhow, bail};
use clap::{CommandFactory, Parser};
use futures::stream::{self, StreamExt};
use review_application::{
    EmbeddingPort, HealthCheckUseCase, LlmGateway, ReviewEventLogger, RunReviewUseCase,
    SimilarityStore,
};
use review_domain::{ReviewErrorKind, ReviewFailure, ReviewRequest};
use review_infrastructure::{
    ConfigLoader, FileConfig, InMemoryCorpusStore, JsonlReviewLogger, OpenAiChatGateway,
    OpenAiEmbeddingClient, ProviderEndpoint,
};
use review_presentation::{
    Cli, Command, ConsoleFormatter, JsonFormatter, OutputFormat, OutputFormatter,
    ProgressReporter,
};
use std::io::Read;
use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt};

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let _log_guard = init_tracing(cli.verbose, cli.log_file.as_deref())?;

    if cli.show_config {
        ConfigLoader::print_config_sources(cli.config.as_deref());
        return Ok(ExitCode::SUCCESS);
    }

    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        return Ok(ExitCode::SUCCESS);
    };

    // === Configuration ===
    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_deref())
            .map_err(|e| anyhow!("Failed to load configuration: {}", e))?
    };
    config.validate().context("Invalid configuration")?;

    info!("Starting task-review");

    // === Dependency Injection ===
    let services = Services::build(&config)?;

    let formatter: Box<dyn OutputFormatter> = match cli.output {
        OutputFormat::Human => Box::new(ConsoleFormatter),
        OutputFormat::Json => Box::new(JsonFormatter),
    };

    match command {
        Command::Health => {
            let report = HealthCheckUseCase::new(services.embedder, services.store)
                .execute()
                .await;
            println!("{}", formatter.format_health(&report));
            Ok(exit_code(report.is_healthy()))
        }
        Command::Review {
            task_id,
            details,
            request,
        } => {
            let request = match request {
                Some(path) => read_request(&path)?,
                None => ReviewRequest::new(
                    task_id.unwrap_or_default(),
                    details.unwrap_or_default(),
                ),
            };

            let use_case = services.review_use_case(&config, cancel_on_ctrl_c());
            let show_progress = !cli.quiet && cli.output == OutputFormat::Human;
            let ok = run_single(&use_case, formatter.as_ref(), request, show_progress).await;
            Ok(exit_code(ok))
        }
        Command::Batch { file, concurrency } => {
            let use_case = services.review_use_case(&config, cancel_on_ctrl_c());
            let ok = run_batch(&use_case, formatter.as_ref(), &file, concurrency as usize).await?;
            Ok(exit_code(ok))
        }
    }
}

/// Install the tracing subscriber.
///
/// `RUST_LOG` wins over `-v`. The returned guard must live until exit so
/// buffered file output is flushed.
fn init_tracing(verbose: u8, log_file: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace", // -vvv or more
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let stderr_layer = fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr);

    let (file_layer, guard) = match log_file {
        Some(path) => {
            let file_name = path
                .file_name()
                .ok_or_else(|| anyhow!("--log-file must name a file: {}", path.display()))?;
            let dir = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or_else(|| Path::new("."));
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create log directory {}", dir.display()))?;

            let appender = tracing_appender::rolling::never(dir, file_name);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer().with_ansi(false).with_writer(writer);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer)
        .init();

    Ok(guard)
}

/// Adapters shared by every command
struct Services {
    embedder: Arc<dyn EmbeddingPort>,
    store: Arc<dyn SimilarityStore>,
    gateway: Arc<dyn LlmGateway>,
    logger: Option<Arc<dyn ReviewEventLogger>>,
}

impl Services {
    fn build(config: &FileConfig) -> Result<Self> {
        let corpus = InMemoryCorpusStore::load(&config.corpus.path)
            .with_context(|| format!("Failed to load corpus {}", config.corpus.path.display()))?;
        if let Some(dims) = corpus.dimensions()
            && dims != config.embedding.dimensions
        {
            warn!(
                corpus_dimensions = dims,
                configured_dimensions = config.embedding.dimensions,
                "Corpus and embedding model dimensions differ; retrieval will fail"
            );
        }
        info!(
            chunks = corpus.len(),
            path = %config.corpus.path.display(),
            "Corpus loaded"
        );

        let embedding_endpoint =
            ProviderEndpoint::from_env(&config.embedding.base_url, &config.embedding.api_key_env)
                .context("Failed to create embedding client")?;
        let llm_endpoint =
            ProviderEndpoint::from_env(&config.llm.base_url, &config.llm.api_key_env)
                .context("Failed to create LLM client")?;

        let logger: Option<Arc<dyn ReviewEventLogger>> = match &config.logging.review_log {
            Some(path) => match JsonlReviewLogger::open(path) {
                Ok(logger) => {
                    info!(path = %path.display(), "Recording review events");
                    Some(Arc::new(logger))
                }
                Err(e) => {
                    warn!("Review event log disabled, cannot open {}: {}", path.display(), e);
                    None
                }
            },
            None => None,
        };

        Ok(Self {
            embedder: Arc::new(OpenAiEmbeddingClient::new(
                embedding_endpoint,
                config.embedding.model.clone(),
                config.embedding.dimensions,
            )),
            store: Arc::new(corpus),
            gateway: Arc::new(OpenAiChatGateway::new(llm_endpoint)),
            logger,
        })
    }

    fn review_use_case(&self, config: &FileConfig, token: CancellationToken) -> RunReviewUseCase {
        let use_case = RunReviewUseCase::new(
            self.embedder.clone(),
            self.store.clone(),
            self.gateway.clone(),
            config.to_review_config(),
        )
        .with_cancellation(token);

        match &self.logger {
            Some(logger) => use_case.with_logger(logger.clone()),
            None => use_case,
        }
    }
}

/// Token cancelled on the first Ctrl-C
fn cancel_on_ctrl_c() -> CancellationToken {
    let token = CancellationToken::new();
    let trigger = token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted; cancelling in-flight reviews");
            trigger.cancel();
        }
    });
    token
}

async fn run_single(
    use_case: &RunReviewUseCase,
    formatter: &dyn OutputFormatter,
    request: ReviewRequest,
    show_progress: bool,
) -> bool {
    let task_id = request.task_id.clone();

    let result = if show_progress {
        let reporter = ProgressReporter::new();
        let result = use_case.execute_with_progress(request, &reporter).await;
        reporter.finish();
        result
    } else {
        use_case.execute(request).await
    };

    match result {
        Ok(decision) => {
            println!("{}", formatter.format_decision(&decision));
            true
        }
        Err(e) => {
            println!("{}", formatter.format_failure(&e.to_failure(task_id)));
            false
        }
    }
}

/// Review each JSONL line concurrently, printing results as they finish.
///
/// Returns false if any review failed.
async fn run_batch(
    use_case: &RunReviewUseCase,
    formatter: &dyn OutputFormatter,
    path: &Path,
    concurrency: usize,
) -> Result<bool> {
    let content = read_input(path)?;
    let lines: Vec<(usize, &str)> = content
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(i, line)| (i + 1, line))
        .collect();

    info!(requests = lines.len(), concurrency, "Starting batch");

    let mut results = stream::iter(lines)
        .map(|(line_no, line)| async move {
            match serde_json::from_str::<ReviewRequest>(line) {
                Ok(request) => {
                    let task_id = request.task_id.clone();
                    use_case
                        .execute(request)
                        .await
                        .map_err(|e| e.to_failure(task_id))
                }
                Err(e) => Err(ReviewFailure::new(
                    "",
                    ReviewErrorKind::InvalidRequest,
                    format!("line {}: {}", line_no, e),
                )),
            }
        })
        .buffer_unordered(concurrency.max(1));

    let mut total = 0usize;
    let mut failed = 0usize;
    while let Some(result) = results.next().await {
        total += 1;
        match result {
            Ok(decision) => println!("{}", formatter.format_decision(&decision)),
            Err(failure) => {
                failed += 1;
                println!("{}", formatter.format_failure(&failure));
            }
        }
    }

    info!(total, failed, "Batch finished");
    Ok(failed == 0)
}

fn read_request(path: &Path) -> Result<ReviewRequest> {
    let content = read_input(path)?;
    serde_json::from_str(&content)
        .with_context(|| format!("Invalid review request in {}", path.display()))
}

/// Read a file, or stdin when `path` is "-"
fn read_input(path: &Path) -> Result<String> {
    if path.as_os_str() == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read stdin")?;
        return Ok(buf);
    }

    if !path.exists() {
        bail!("File not found: {}", path.display());
    }
    std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

fn exit_code(ok: bool) -> ExitCode {
    if ok {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
