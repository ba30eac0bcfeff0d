//! Configuration module for the fswatcher system
//!
//! This module provides configuration structures and loading mechanisms for
//! the watcher. Configuration can be loaded from TOML files and/or environment
//! variables.

mod defaults;
mod loading;


use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use defaults::*;

/// Top-level configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Watcher configuration
    #[serde(default)]
    pub watcher: WatcherConfig,

    /// Paths to track. They do not need to exist yet.
    #[serde(default)]
    pub paths: Vec<PathBuf>,
}

/// Configuration for the polling watcher
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WatcherConfig {
    /// Interval between polling cycles in milliseconds (default: 5000ms)
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
}

impl WatcherConfig {
    /// Create configuration from builder
    pub fn builder() -> WatcherConfigBuilder {
        WatcherConfigBuilder::default()
    }

    /// Configuration with a short poll interval, for test suites
    pub fn testing() -> Self {
        Self {
            poll_interval_ms: TEST_POLL_INTERVAL_MS,
        }
    }

    /// Get the poll interval duration
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    /// Validates the configuration
    pub fn validate(&self) -> Result<()> {
        if self.poll_interval_ms == 0 {
            return Err(Error::config(
                "Invalid poll interval: must be greater than 0ms",
            ));
        }
        Ok(())
    }
}

impl Default for WatcherConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: default_poll_interval_ms(),
        }
    }
}

/// Builder for WatcherConfig
#[derive(Debug, Default)]
pub struct WatcherConfigBuilder {
    config: WatcherConfig,
}

impl WatcherConfigBuilder {
    /// Set poll interval in milliseconds
    pub fn poll_interval_ms(mut self, ms: u64) -> Self {
        self.config.poll_interval_ms = ms;
        self
    }

    /// Set poll interval
    pub fn poll_interval(mut self, interval: Duration) -> Self {
        self.config.poll_interval_ms = u64::try_from(interval.as_millis()).unwrap_or(u64::MAX);
        self
    }

    /// Build the configuration
    pub fn build(self) -> WatcherConfig {
        self.config
    }
}

impl Config {
    /// Creates a config from a TOML string (useful for testing)
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::config(format!("Failed to parse TOML: {e}")))
    }

    /// Validates the configuration
    pub fn validate(&self) -> Result<()> {
        self.watcher.validate()?;

        if let Some(empty) = self.paths.iter().position(|p| p.as_os_str().is_empty()) {
            return Err(Error::config(format!(
                "Invalid path at index {empty}: paths must not be empty"
            )));
        }

        Ok(())
    }
}
