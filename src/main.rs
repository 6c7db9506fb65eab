//! marinetraffic-bridge
//!
//! Polls the MarineTraffic export API (or reads saved payloads) and writes
//! Signal K vessel deltas to stdout, one JSON document per line.
//!
//! # Usage
//!
//! ```bash
//! # Poll the live API with ./bridge_config.toml
//! marinetraffic-bridge
//!
//! # Translate one saved export payload
//! marinetraffic-bridge --file export.json
//!
//! # Translate payloads piped one per line
//! curl -s "$EXPORT_URL" | marinetraffic-bridge --stdin
//! ```
//!
//! # Environment Variables
//!
//! - `MT_BRIDGE_CONFIG`: Path to the TOML config (default: ./bridge_config.toml)
//! - `RUST_LOG`: Logging level (default: info)
//! - `MT_BRIDGE_LOG_JSON`: Set to "true" for JSON log lines (same as `--log-json`)

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use marinetraffic_bridge::acquisition::{MarineTrafficClient, Translator};
use marinetraffic_bridge::config::{self, defaults, BridgeConfig};
use marinetraffic_bridge::pipeline::{
    ApiSource, BatchSource, FileSource, LoopExit, ProcessingLoop, Publisher, StdinSource,
};
use marinetraffic_bridge::types::NormalizedEvent;

// ============================================================================
// CLI Arguments
// ============================================================================

#[derive(Parser, Debug)]
#[command(name = "marinetraffic-bridge")]
#[command(about = "MarineTraffic AIS to Signal K vessel deltas")]
#[command(version)]
struct CliArgs {
    /// Translate one saved MarineTraffic export payload and exit
    #[arg(long, value_name = "PATH", conflicts_with = "stdin")]
    file: Option<PathBuf>,

    /// Read export payloads from stdin, one JSON document per line
    #[arg(long)]
    stdin: bool,

    /// Config file (overrides MT_BRIDGE_CONFIG and ./bridge_config.toml)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Emit logs as JSON lines on stderr
    #[arg(long, env = "MT_BRIDGE_LOG_JSON")]
    log_json: bool,
}

// ============================================================================
// Task Names for Supervisor Logging
// ============================================================================

#[derive(Debug, Clone, Copy)]
enum TaskName {
    Publisher,
    BatchProcessor,
}

impl std::fmt::Display for TaskName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TaskName::Publisher => write!(f, "Publisher"),
            TaskName::BatchProcessor => write!(f, "BatchProcessor"),
        }
    }
}

// ============================================================================
// Supervisor
// ============================================================================

/// Run the supervisor loop: monitor tasks, cancel on failure.
async fn run_supervisor(
    task_set: &mut JoinSet<Result<TaskName>>,
    cancel_token: CancellationToken,
) -> Result<()> {
    info!("Supervisor: all tasks spawned, monitoring");

    // Sources stop on cancellation and drop their senders, which ends the
    // publisher, so keep joining until the set is empty.
    while let Some(result) = task_set.join_next().await {
        match result {
            Ok(Ok(task_name)) => {
                info!("Supervisor: task {} completed normally", task_name);
            }
            Ok(Err(e)) => {
                error!("Supervisor: task failed with error: {}", e);
                cancel_token.cancel();
                task_set.shutdown().await;
                return Err(e);
            }
            Err(e) => {
                error!("Supervisor: task panicked: {}", e);
                cancel_token.cancel();
                task_set.shutdown().await;
                return Err(anyhow::anyhow!("Task panicked: {}", e));
            }
        }
    }

    info!("Supervisor: all tasks completed");
    Ok(())
}

/// Spawn the publisher writing deltas to stdout.
fn spawn_publisher(
    task_set: &mut JoinSet<Result<TaskName>>,
    events: mpsc::Receiver<NormalizedEvent>,
    pretty: bool,
) {
    task_set.spawn(async move {
        let publisher = Publisher::new(tokio::io::stdout()).pretty(pretty);
        publisher.run(events).await?;
        Ok(TaskName::Publisher)
    });
}

/// Spawn one processing loop for `source`.
fn spawn_processor<S: BatchSource>(
    task_set: &mut JoinSet<Result<TaskName>>,
    mut source: S,
    events: mpsc::Sender<NormalizedEvent>,
    cancel_token: CancellationToken,
) {
    task_set.spawn(async move {
        let processing_loop = ProcessingLoop::new(Translator::default(), events, cancel_token);
        let (stats, exit) = processing_loop.run(&mut source).await;
        if exit == LoopExit::SourceError {
            return Err(anyhow::anyhow!(
                "{} source failed after {} batches",
                source.source_name(),
                stats.batches
            ));
        }
        Ok(TaskName::BatchProcessor)
    });
}

// ============================================================================
// Pipeline Runner
// ============================================================================

/// Run one or more sources into a shared publisher until they finish or
/// Ctrl+C.
async fn run_pipeline<S: BatchSource>(
    sources: Vec<S>,
    pretty: bool,
    cancel_token: CancellationToken,
) -> Result<()> {
    let (tx, rx) = mpsc::channel(defaults::EVENT_CHANNEL_CAPACITY);
    let mut task_set: JoinSet<Result<TaskName>> = JoinSet::new();

    spawn_publisher(&mut task_set, rx, pretty);
    for source in sources {
        info!(source = source.source_name(), "Input source registered");
        spawn_processor(&mut task_set, source, tx.clone(), cancel_token.clone());
    }
    // Publisher ends once every processor has dropped its sender
    drop(tx);

    run_supervisor(&mut task_set, cancel_token).await
}

/// Build one API source per enabled tier.
fn api_sources(bridge: &BridgeConfig) -> Result<Vec<ApiSource>> {
    bridge
        .validate_for_polling()
        .context("Configuration is not usable for polling")?;

    let client = MarineTrafficClient::new(&bridge.api)?;
    let polling = &bridge.polling;
    let sources = polling
        .enabled_tiers()
        .into_iter()
        .filter_map(|tier| {
            let interval = polling.interval(tier)?;
            info!(tier = %tier, interval_secs = interval.as_secs(), "Polling tier enabled");
            Some(ApiSource::new(client.clone(), tier, interval, polling.jitter_secs))
        })
        .collect();
    Ok(sources)
}

/// Install the tracing subscriber. Logs go to stderr; stdout carries deltas.
fn init_logging(json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

// ============================================================================
// Main Entry Point
// ============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    let args = CliArgs::parse();
    init_logging(args.log_json);

    let bridge_config = match &args.config {
        Some(path) => BridgeConfig::load_from_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => BridgeConfig::load(),
    };
    config::init(bridge_config);
    let bridge = config::get();

    // Graceful shutdown via Ctrl+C
    let cancel_token = CancellationToken::new();
    let shutdown_token = cancel_token.clone();
    tokio::spawn(async move {
        tokio::signal::ctrl_c().await.ok();
        info!("Received Ctrl+C, initiating shutdown");
        shutdown_token.cancel();
    });

    let pretty = bridge.output.pretty;
    if let Some(path) = args.file {
        info!(path = %path.display(), "Input: saved export payload");
        run_pipeline(vec![FileSource::new(path)], pretty, cancel_token).await?;
    } else if args.stdin {
        info!("Input: stdin (one export payload per line)");
        run_pipeline(vec![StdinSource::stdin()], pretty, cancel_token).await?;
    } else {
        info!(
            timespan_minutes = bridge.api.timespan_minutes,
            mmsi = ?bridge.api.mmsi,
            "Input: MarineTraffic export API"
        );
        let sources = api_sources(bridge)?;
        if sources.is_empty() {
            warn!("No polling tier enabled, nothing to do");
            return Ok(());
        }
        run_pipeline(sources, pretty, cancel_token).await?;
    }

    info!("marinetraffic-bridge shutdown complete");
    Ok(())
}
