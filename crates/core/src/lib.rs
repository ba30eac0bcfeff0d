#![deny(warnings)]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]

//! Core types for the fswatcher polling file watcher
//!
//! This crate provides the foundational pieces shared by the watcher and the
//! command line front-end:
//!
//! - **Configuration**: watcher settings loaded from TOML and the environment
//! - **Error handling**: unified error types
//!

pub mod config;
pub mod error;

// Re-export main types for convenience
pub use config::{Config, WatcherConfig, WatcherConfigBuilder};
pub use error::{Error, Result};

