#![deny(warnings)]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]

//! Polling file watcher for a fixed set of paths
//!
//! This crate watches individual files that may not exist yet, without any OS
//! notification mechanism:
//! - Create, write and remove events as an fsnotify-style bitmask
//! - Symlink support for orchestrator secret and volume mounts, including
//!   relative links and atomic repointing
//! - Unbuffered delivery with backpressure and prompt, leak-free shutdown
//!
//! # Example
//!
//! ```no_run
//! use fswatcher::{Op, Watcher, WatcherConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let watcher = Watcher::new(
//!     ["/etc/certs/tls.crt", "/etc/certs/tls.key"],
//!     WatcherConfig::default(),
//! )?;
//!
//! loop {
//!     tokio::select! {
//!         Ok(event) = watcher.events().recv_async() => {
//!             if event.has(Op::CREATE | Op::WRITE) {
//!                 println!("reload {}", event.name.display());
//!             }
//!         }
//!         Ok(error) = watcher.errors().recv_async() => {
//!             eprintln!("watch error: {error}");
//!         }
//!         else => break,
//!     }
//! }
//!
//! watcher.close().await?;
//! # Ok(())
//! # }
//! ```

// Private implementation modules
mod diff;
mod dispatcher;
mod events;
mod registry;
mod resolver;
mod state;
mod watcher;

// Public exports - minimal API surface
pub use events::{Event, Op};
pub use fswatcher_core::config::{WatcherConfig, WatcherConfigBuilder};
pub use fswatcher_core::error::{Error, Result};
pub use watcher::Watcher;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::events::{Event, Op};
    pub use crate::watcher::Watcher;
    pub use fswatcher_core::config::WatcherConfig;
}
