//! Default values and functions for configuration

/// How often tracked paths are checked for changes in production
pub(crate) const DEFAULT_POLL_INTERVAL_MS: u64 = 5_000;

/// Poll interval used by test suites so they do not wait on the production period
pub(crate) const TEST_POLL_INTERVAL_MS: u64 = 50;

/// Prefix for environment variable overrides
pub(crate) const ENV_PREFIX: &str = "FSWATCHER";

pub(crate) fn default_poll_interval_ms() -> u64 {
    DEFAULT_POLL_INTERVAL_MS
}
