//! Formcast main entry point
//!
//! This is the command-line interface for the formcast schema extractor and
//! submission dispatcher.

use anyhow::{bail, Context};
use clap::Parser;
use formcast::answers::{load_overrides, override_handoff, OverrideMap};
use formcast::config::{load_config_with_hash, validate, Config};
use formcast::dispatch::{DispatchConfig, Dispatcher, LogProgress, StatsRecorder};
use formcast::http::build_http_client;
use formcast::report::{print_schema, print_summary};
use formcast::schema::extract;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

/// Terminal outcomes between progress log lines
const PROGRESS_EVERY: u64 = 10;

/// Formcast: form schema extraction and bulk submission
///
/// Formcast reads a public form page, recovers its questions from the
/// embedded data blob, and sends synthesized or fixed answers through a
/// bounded pool of workers with retry and backoff.
#[derive(Parser, Debug)]
#[command(name = "formcast")]
#[command(version)]
#[command(about = "Form schema extractor and submission dispatcher", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Form URL, replacing `form.url` from the config
    #[arg(long)]
    url: Option<String>,

    /// Number of submissions to send
    #[arg(long)]
    count: Option<u64>,

    /// Number of concurrent workers
    #[arg(long)]
    workers: Option<u32>,

    /// Answer for every free-text question
    #[arg(long)]
    default_text: Option<String>,

    /// Seed for reproducible answers
    #[arg(long)]
    seed: Option<u64>,

    /// Override file merged over the configured overrides
    #[arg(long, value_name = "FILE")]
    answers: Option<PathBuf>,

    /// Extract and print the schema without submitting anything
    #[arg(long)]
    dry_run: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (mut config, config_hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("failed to load {}", cli.config.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", config_hash);

    apply_cli_overrides(&mut config, &cli);
    validate(&config).context("invalid configuration after command-line overrides")?;

    let timeout = Duration::from_secs(config.dispatch.request_timeout_secs);
    let client = build_http_client(&config.user_agent, timeout)?;
    let schema = extract(&client, &config.form.url)
        .await
        .with_context(|| format!("could not extract a schema from {}", config.form.url))?;

    print_schema(&schema);

    if cli.dry_run {
        println!("✓ Dry run: nothing submitted");
        return Ok(());
    }
    if schema.is_empty() {
        bail!("form has no answerable questions");
    }

    let overrides = configure_overrides(&config, cli.answers.clone()).await?;
    if !overrides.is_empty() {
        tracing::info!("Using {} fixed answers", overrides.len());
    }

    handle_run(config, Arc::new(schema), overrides).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("formcast=info,warn"),
            1 => EnvFilter::new("formcast=debug,info"),
            2 => EnvFilter::new("formcast=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

fn apply_cli_overrides(config: &mut Config, cli: &Cli) {
    if let Some(url) = &cli.url {
        config.form.url = url.clone();
    }
    if let Some(count) = cli.count {
        config.dispatch.count = count;
    }
    if let Some(workers) = cli.workers {
        config.dispatch.workers = workers;
    }
    if let Some(text) = &cli.default_text {
        config.answers.default_text = Some(text.clone());
    }
    if let Some(seed) = cli.seed {
        config.answers.seed = Some(seed);
    }
}

/// Resolves the override map through the one-shot handoff
///
/// The configurator task starts from the configured overrides and merges the
/// `--answers` file over them. The run waits for exactly one resolution.
async fn configure_overrides(
    config: &Config,
    answers_path: Option<PathBuf>,
) -> anyhow::Result<OverrideMap> {
    let (sender, receiver) = override_handoff();
    let mut base = config.answers.overrides.clone();

    let configurator = tokio::task::spawn_blocking(move || -> anyhow::Result<()> {
        if let Some(path) = answers_path {
            let extra = load_overrides(&path)
                .with_context(|| format!("failed to load answers from {}", path.display()))?;
            base.extend(extra);
        }
        sender.resolve(base);
        Ok(())
    });

    let overrides = receiver.wait().await;
    configurator.await??;
    Ok(overrides)
}

/// Handles the submission run, printing a summary even when interrupted
async fn handle_run(
    config: Config,
    schema: Arc<formcast::FormSchema>,
    overrides: OverrideMap,
) -> anyhow::Result<()> {
    let count = config.dispatch.count;
    let progress = Arc::new(LogProgress::new(count, PROGRESS_EVERY));

    let dispatcher = Dispatcher::new(schema, DispatchConfig::from_config(&config))?
        .with_overrides(overrides)
        .with_default_text(config.answers.default_text.clone())
        .with_seed(config.answers.seed)
        .with_observer(progress.clone());

    let stats = StatsRecorder::new();
    let final_stats = tokio::select! {
        finished = dispatcher.run_with_stats(count, stats.clone()) => finished,
        _ = tokio::signal::ctrl_c() => {
            tracing::warn!("Interrupted, stopping workers");
            stats.snapshot()
        }
    };

    print_summary(count, &final_stats);

    if progress.done() < count {
        tracing::warn!(
            "Run ended early: {} of {} submissions completed",
            progress.done(),
            count
        );
    }

    Ok(())
}
