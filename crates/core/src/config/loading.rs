//! Configuration loading from files and environment variables

use crate::error::{Error, Result};
use config::{Config as ConfigLib, Environment, File};
use std::path::Path;
use tracing::debug;

use super::defaults::*;
use super::Config;

impl Config {
    /// Loads configuration from a TOML file with environment variable overrides
    ///
    /// The file is optional. Environment variables are prefixed with
    /// `FSWATCHER_` and use double underscores for nested values. For example:
    /// - `FSWATCHER_WATCHER__POLL_INTERVAL_MS=250`
    pub fn from_file(path: &Path) -> Result<Self> {
        let mut builder = ConfigLib::builder()
            // config crate doesn't apply serde defaults for missing sections
            .set_default("watcher.poll_interval_ms", default_poll_interval_ms() as i64)
            .map_err(|e| Error::config(format!("Failed to set poll interval default: {e}")))?;

        if path.exists() {
            debug!("Loading configuration from {:?}", path);
            builder = builder.add_source(File::from(path));
        }

        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder
            .build()
            .map_err(|e| Error::config(format!("Failed to build config: {e}")))?;

        let config: Config = config
            .try_deserialize()
            .map_err(|e| Error::config(format!("Failed to deserialize config: {e}")))?;

        config.validate()?;
        Ok(config)
    }
}
