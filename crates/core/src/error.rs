use std::path::PathBuf;
use thiserror::Error;

/// Result type for fswatcher operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for fswatcher operations
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// A tracked path could not be stat'ed for a reason other than not existing
    #[error("Failed to stat {path:?}: {source}")]
    Stat {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The resolved target of a tracked symlink could not be stat'ed for a
    /// reason other than not existing
    #[error("Failed to stat target {target:?} of symlink {path:?}: {source}")]
    TargetStat {
        path: PathBuf,
        target: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// File watching errors
    #[error("Watcher error: {0}")]
    Watcher(String),
}

impl Error {
    /// Creates a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Creates a stat error for a tracked path
    pub fn stat(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Stat {
            path: path.into(),
            source,
        }
    }

    /// Creates a stat error for the target of a tracked symlink
    pub fn target_stat(
        path: impl Into<PathBuf>,
        target: impl Into<PathBuf>,
        source: std::io::Error,
    ) -> Self {
        Self::TargetStat {
            path: path.into(),
            target: target.into(),
            source,
        }
    }

    /// Creates a watcher error
    pub fn watcher(msg: impl Into<String>) -> Self {
        Self::Watcher(msg.into())
    }

    /// The tracked path this error concerns, if it is a per-path error
    pub fn path(&self) -> Option<&std::path::Path> {
        match self {
            Self::Stat { path, .. } | Self::TargetStat { path, .. } => Some(path),
            _ => None,
        }
    }
}
