//! fswatcher CLI - watch files and symlinks for changes by polling
//!
//! This binary tracks the given paths and prints one line per change until
//! interrupted.

#![deny(warnings)]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]

use anyhow::Result;
use clap::Parser;
use fswatcher::Watcher;
use fswatcher_cli::{load_config, run_until, Overrides};
use std::path::PathBuf;
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "fswatcher")]
#[command(about = "Poll files and symlinks for create, write and remove events")]
#[command(version)]
struct Cli {
    /// Paths to watch (they do not need to exist yet)
    #[arg(value_name = "PATH")]
    paths: Vec<PathBuf>,

    /// Configuration file path
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Poll interval in milliseconds
    #[arg(short, long, value_name = "MS")]
    interval: Option<u64>,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    init_logging(cli.verbose)?;

    let config = load_config(
        cli.config.as_deref(),
        Overrides {
            paths: cli.paths,
            poll_interval_ms: cli.interval,
        },
    )?;

    let watcher = Watcher::new(config.paths, config.watcher)?;

    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for Ctrl-C: {e}");
        }
    };

    let summary = run_until(watcher, shutdown).await?;
    info!("Exiting after {} errors", summary.errors);
    Ok(())
}

/// Initialize logging system
fn init_logging(verbose: bool) -> Result<()> {
    let level = if verbose { "debug" } else { "info" };

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "fswatcher={level},fswatcher_core={level},fswatcher_cli={level}"
        ))
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {e}"))
}
