//! Library interface for the fswatcher CLI
//!
//! This module exposes the configuration merging and the event loop for
//! integration testing while keeping argument parsing in main.rs.

use anyhow::{Context, Result};
use fswatcher::{Op, Watcher};
use fswatcher_core::config::Config;
use std::future::Future;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Default configuration file, looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "fswatcher.toml";

/// Command line values that take precedence over the configuration file
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    /// Extra paths to track, appended to the configured ones
    pub paths: Vec<PathBuf>,
    /// Poll interval in milliseconds
    pub poll_interval_ms: Option<u64>,
}

/// Counters reported when the event loop ends
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub creates: usize,
    pub writes: usize,
    pub removes: usize,
    pub errors: usize,
}

impl RunSummary {
    fn record(&mut self, op: Op) {
        if op.has(Op::CREATE) {
            self.creates += 1;
        }
        if op.has(Op::WRITE) {
            self.writes += 1;
        }
        if op.has(Op::REMOVE) {
            self.removes += 1;
        }
    }
}

/// Load configuration from `config_path` (or the default file) and apply
/// command line overrides
pub fn load_config(config_path: Option<&Path>, overrides: Overrides) -> Result<Config> {
    let path = config_path.unwrap_or_else(|| Path::new(DEFAULT_CONFIG_FILE));
    if config_path.is_some() && !path.exists() {
        anyhow::bail!("Configuration file {path:?} does not exist");
    }

    let mut config = Config::from_file(path).context("Failed to load configuration")?;

    config.paths.extend(overrides.paths);
    if let Some(ms) = overrides.poll_interval_ms {
        config.watcher.poll_interval_ms = ms;
    }

    config.validate().context("Invalid configuration")?;
    if config.paths.is_empty() {
        anyhow::bail!("No paths to watch: pass them as arguments or set `paths` in {path:?}");
    }

    debug!("Resolved configuration: {:?}", config);
    Ok(config)
}

/// Report events and errors until `shutdown` resolves, then close the watcher
pub async fn run_until<F>(watcher: Watcher, shutdown: F) -> Result<RunSummary>
where
    F: Future<Output = ()>,
{
    let mut summary = RunSummary::default();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = &mut shutdown => {
                info!("Shutdown requested");
                break;
            }
            Ok(event) = watcher.events().recv_async() => {
                info!("{}", event);
                println!("{}\t{}", event.op, event.name.display());
                summary.record(event.op);
            }
            Ok(error) = watcher.errors().recv_async() => {
                warn!("{}", error);
                summary.errors += 1;
            }
        }
    }

    watcher.close().await.context("Failed to stop watcher")?;
    info!(
        "Watcher summary: {} created, {} written, {} removed, {} errors",
        summary.creates, summary.writes, summary.removes, summary.errors
    );
    Ok(summary)
}
