//! CLI entrypoint for scriptorium
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, bail};
use clap::Parser;
use scriptorium_application::{
    NoProgress, NoRunLogger, ProgressNotifier, RunLogger, RunPipelineInput, RunPipelineUseCase,
};
use scriptorium_domain::{OutputFormat, RunOutcome, Topic};
use scriptorium_infrastructure::{
    ConfigLoader, FileConfig, JsonlRunLogger, OpenAiCompatibleGateway,
};
use scriptorium_presentation::{
    Cli, ConsoleFormatter, OutputFormatter, ProgressReporter, SimpleProgress, set_color_enabled,
};
use std::io::IsTerminal;
use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

/// Exit code for a run that ended in an abort reason
const EXIT_ABORTED: u8 = 2;

/// Extra HTTP budget on top of the controller's per-call deadline
const HTTP_TIMEOUT_MARGIN: Duration = Duration::from_secs(5);

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    if cli.show_config {
        ConfigLoader::print_config_sources(cli.config.as_ref());
        return Ok(ExitCode::SUCCESS);
    }

    // === Configuration ===
    let mut config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref()).context("failed to load configuration")?
    };
    apply_cli_overrides(&mut config, &cli);

    let _log_guard = init_tracing(cli.verbose, config.logging.file.as_deref())?;

    let warnings = config.check()?;
    for issue in &warnings {
        warn!("config: {}", issue);
    }

    set_color_enabled(config.output.color && !cli.no_color && std::io::stdout().is_terminal());

    let Some(topic) = cli.topic.as_deref() else {
        bail!("A research topic is required. Use --help for usage.");
    };
    let topic = Topic::new(topic)?;

    // === Dependency Injection ===
    let api_key = config.gateway.resolve_api_key();
    if api_key.is_none() {
        warn!(
            "{} is not set; calling {} without credentials",
            config.gateway.api_key_env, config.gateway.base_url
        );
    }
    let gateway = Arc::new(OpenAiCompatibleGateway::new(
        config.gateway.base_url.clone(),
        api_key,
        config.call_timeout() + HTTP_TIMEOUT_MARGIN,
    )?);

    let run_logger: Arc<dyn RunLogger> = match config.logging.run_log.as_deref() {
        Some(path) => match JsonlRunLogger::new(path) {
            Some(logger) => {
                info!("Writing run transcript to {}", logger.path().display());
                Arc::new(logger)
            }
            None => Arc::new(NoRunLogger),
        },
        None => Arc::new(NoRunLogger),
    };

    let token = CancellationToken::new();
    let ctrl_c_token = token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted, cancelling run");
            ctrl_c_token.cancel();
        }
    });

    let use_case = RunPipelineUseCase::new(gateway, config.to_role_configs())
        .with_params(config.to_pipeline_params())
        .with_evaluator(config.to_source_evaluator())
        .with_run_logger(run_logger)
        .with_cancellation(token);

    let format = config.output.format.unwrap_or_default();
    let progress: Box<dyn ProgressNotifier> = if cli.quiet {
        Box::new(NoProgress)
    } else if std::io::stderr().is_terminal() {
        Box::new(ProgressReporter::new())
    } else {
        Box::new(SimpleProgress)
    };

    if !cli.quiet && format != OutputFormat::Json {
        eprintln!("Topic: {}", topic);
        eprintln!();
    }

    let outcome = use_case
        .execute_with_progress(RunPipelineInput::new(topic), progress.as_ref())
        .await;

    println!("{}", ConsoleFormatter.render(&outcome, format));

    Ok(match outcome {
        RunOutcome::Completed(_) => ExitCode::SUCCESS,
        RunOutcome::Aborted(_) => ExitCode::from(EXIT_ABORTED),
    })
}

/// CLI flags win over every configuration source.
fn apply_cli_overrides(config: &mut FileConfig, cli: &Cli) {
    if let Some(format) = cli.output {
        config.output.format = Some(format.into());
    }
    if let Some(max_iterations) = cli.max_iterations {
        config.pipeline.max_iterations = max_iterations;
    }
    if let Some(concurrency) = cli.concurrency {
        config.pipeline.concurrency_limit = concurrency;
    }
    if let Some(threshold) = cli.threshold {
        config.evaluation.threshold = threshold;
    }
    if let Some(path) = &cli.run_log {
        config.logging.run_log = Some(path.clone());
    }
    if let Some(path) = &cli.log_file {
        config.logging.file = Some(path.clone());
    }
}

/// Stderr logging by verbosity, plus an optional plain-text log file.
///
/// `RUST_LOG` overrides the verbosity flags for stderr.
fn init_tracing(verbose: u8, log_file: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let stderr_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_filter(stderr_filter);

    let (file_layer, guard) = match log_file {
        Some(path) => {
            let dir = path.parent().filter(|p| !p.as_os_str().is_empty());
            let name = path
                .file_name()
                .with_context(|| format!("log file path has no file name: {}", path.display()))?;
            let dir = dir.unwrap_or_else(|| Path::new("."));
            std::fs::create_dir_all(dir)
                .with_context(|| format!("failed to create log directory {}", dir.display()))?;

            let appender = tracing_appender::rolling::never(dir, name);
            let (non_blocking, guard) = tracing_appender::non_blocking(appender);
            let layer = tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(non_blocking)
                .with_filter(EnvFilter::new("debug"));
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(file_layer)
        .init();

    Ok(guard)
}
