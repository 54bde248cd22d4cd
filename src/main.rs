//! call-log demo binary.
//!
//! Wires the full stack (config, subscriber, tracing backend, registry,
//! interceptor) and drives instrumented calls from worker tasks.
//!
//! ```text
//! call-log-demo --config call-log.toml check
//! call-log-demo --config call-log.toml run --workers 4 --iterations 0 --watch
//! ```

mod demo;

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use notify::RecommendedWatcher;
use tokio::sync::watch;

use call_log::backend::ThresholdTable;
use call_log::config::{load_config, ConfigWatcher};
use call_log::observability::logging::init_logging;
use call_log::{CallInterceptor, CallLogConfig, LoggerRegistry, TracingBackend};

use crate::demo::Calculator;

#[derive(Parser)]
#[command(name = "call-log-demo")]
#[command(about = "Drive instrumented calls through the call-log interceptor", long_about = None)]
struct Cli {
    /// TOML config file; defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate the config and print the effective settings as JSON
    Check,
    /// Run workers that call instrumented methods
    Run {
        /// Number of concurrent worker tasks
        #[arg(long, default_value_t = 2)]
        workers: usize,
        /// Rounds per worker; 0 runs until Ctrl-C
        #[arg(long, default_value_t = 3)]
        iterations: u64,
        /// Delay between rounds
        #[arg(long, default_value_t = 500)]
        interval_ms: u64,
        /// Apply threshold changes from the config file while running
        #[arg(long)]
        watch: bool,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => CallLogConfig::default(),
    };

    match cli.command {
        Commands::Check => {
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
        Commands::Run {
            workers,
            iterations,
            interval_ms,
            watch,
        } => {
            init_logging(&config.logging)?;
            tracing::info!("call-log-demo v0.1.0 starting");

            let backend = TracingBackend::from_config(&config.thresholds);
            let registry = Arc::new(LoggerRegistry::new(backend.clone()));
            let interceptor = Arc::new(CallInterceptor::from_config(registry.clone(), &config.interceptor));

            let _watcher = match (watch, cli.config.as_deref()) {
                (true, Some(path)) => Some(spawn_reloader(path, backend)?),
                (true, None) => {
                    tracing::warn!("--watch needs --config, thresholds stay fixed");
                    None
                }
                (false, _) => None,
            };

            run_workers(interceptor, workers, iterations, Duration::from_millis(interval_ms)).await?;

            tracing::info!(loggers = registry.len(), "Shutdown complete");
        }
    }

    Ok(())
}

/// Swap backend thresholds whenever the config file changes.
fn spawn_reloader(path: &Path, backend: TracingBackend) -> Result<RecommendedWatcher, notify::Error> {
    let (watcher, mut updates) = ConfigWatcher::new(path);
    let watcher = watcher.run()?;

    tokio::spawn(async move {
        while let Some(new_config) = updates.recv().await {
            backend.update_thresholds(ThresholdTable::from_config(&new_config.thresholds));
        }
    });

    Ok(watcher)
}

async fn run_workers(
    interceptor: Arc<CallInterceptor>,
    workers: usize,
    iterations: u64,
    interval: Duration,
) -> Result<(), tokio::task::JoinError> {
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Ctrl-C received, stopping workers");
            let _ = shutdown_tx.send(true);
        }
    });

    let handles: Vec<_> = (0..workers)
        .map(|worker| {
            let calculator = Calculator::new(interceptor.clone());
            let mut shutdown = shutdown_rx.clone();

            tokio::spawn(async move {
                let mut ticker = tokio::time::interval(interval);
                let mut round = 0;
                while iterations == 0 || round < iterations {
                    tokio::select! {
                        _ = ticker.tick() => {}
                        _ = shutdown.changed() => break,
                    }
                    calculator.exercise(worker, round).await;
                    round += 1;
                }
                tracing::debug!(worker, rounds = round, "Worker finished");
            })
        })
        .collect();

    for handle in handles {
        handle.await?;
    }
    Ok(())
}
