//! Polling watcher and its background loop
//!
//! One tokio task owns the registry for the watcher's whole life. It wakes on
//! a fixed interval, observes every tracked path, stores the new state and
//! hands any resulting event or error to the consumer before moving on.

use crate::{
    diff::diff,
    dispatcher::{Delivery, Dispatcher},
    events::Event,
    registry::{Registry, TrackedEntry},
    resolver::{observe, Observation},
};
use fswatcher_core::config::WatcherConfig;
use fswatcher_core::error::{Error, Result};
use std::ops::ControlFlow;
use std::path::PathBuf;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, trace, warn};

/// Polls a fixed set of paths and reports create, write and remove events.
///
/// Paths do not need to exist when the watcher is created. Symlinks are
/// followed: a tracked symlink reports changes of its target under the
/// symlink's own name, and repointing it is reported as a write (or as a
/// remove/create when the old or new target is missing).
///
/// Both channels are unbuffered. The consumer must keep reading them, as
/// polling stalls until each event or error is received.
#[derive(Debug)]
pub struct Watcher {
    events: flume::Receiver<Event>,
    errors: flume::Receiver<Error>,
    tracked: Vec<PathBuf>,
    poll_interval: Duration,
    cancellation_token: CancellationToken,
    task: Option<JoinHandle<()>>,
}

impl Watcher {
    /// Start watching `paths`.
    ///
    /// Performs no filesystem access; the first poll happens one interval
    /// after construction. Must be called from within a tokio runtime.
    pub fn new<I, P>(paths: I, config: WatcherConfig) -> Result<Self>
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        config.validate()?;
        let runtime = tokio::runtime::Handle::try_current().map_err(|e| {
            Error::watcher(format!("Watcher must be created within a tokio runtime: {e}"))
        })?;

        let registry = Registry::new(paths);
        let tracked = registry.paths();
        if registry.is_empty() {
            warn!("Watcher created without any paths to track");
        }

        let (events_tx, events_rx) = flume::bounded(0);
        let (errors_tx, errors_rx) = flume::bounded(0);
        let cancellation_token = CancellationToken::new();

        let poll_loop = PollLoop {
            registry,
            dispatcher: Dispatcher::new(events_tx, errors_tx, cancellation_token.clone()),
            poll_interval: config.poll_interval(),
            cancellation_token: cancellation_token.clone(),
        };
        let task = runtime.spawn(poll_loop.run());

        info!(
            "Watching {} path(s) every {:?}",
            tracked.len(),
            config.poll_interval()
        );

        Ok(Self {
            events: events_rx,
            errors: errors_rx,
            tracked,
            poll_interval: config.poll_interval(),
            cancellation_token,
            task: Some(task),
        })
    }

    /// Start watching `paths` with the production poll interval
    pub fn with_defaults<I, P>(paths: I) -> Result<Self>
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self::new(paths, WatcherConfig::default())
    }

    /// Changes to tracked paths. Every `Event::name` is one of the tracked
    /// paths, verbatim.
    pub fn events(&self) -> &flume::Receiver<Event> {
        &self.events
    }

    /// Stat failures other than "not found"
    pub fn errors(&self) -> &flume::Receiver<Error> {
        &self.errors
    }

    /// Tracked paths, with duplicates removed
    pub fn tracked_paths(&self) -> &[PathBuf] {
        &self.tracked
    }

    /// Interval between polling cycles
    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    /// Stop polling and wait for the background task to exit.
    ///
    /// Unblocks a pending send if the consumer is not reading. Once this
    /// returns nothing is sent on either channel again.
    pub async fn close(mut self) -> Result<()> {
        self.cancellation_token.cancel();
        if let Some(task) = self.task.take() {
            task.await
                .map_err(|e| Error::watcher(format!("Poll loop terminated abnormally: {e}")))?;
        }
        info!("Watcher stopped");
        Ok(())
    }
}

impl Drop for Watcher {
    fn drop(&mut self) {
        // The loop exits on its own; close() is the way to wait for it
        self.cancellation_token.cancel();
    }
}

/// State owned by the background task
struct PollLoop {
    registry: Registry,
    dispatcher: Dispatcher,
    poll_interval: Duration,
    cancellation_token: CancellationToken,
}

impl PollLoop {
    async fn run(mut self) {
        let mut ticker = interval_at(Instant::now() + self.poll_interval, self.poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                biased;
                _ = self.cancellation_token.cancelled() => break,
                _ = ticker.tick() => {
                    if self.poll().await.is_break() {
                        break;
                    }
                }
            }
        }

        debug!("Poll loop stopped");
    }

    /// Run one polling cycle over every tracked path. Breaks when shutdown
    /// interrupts a delivery.
    async fn poll(&mut self) -> ControlFlow<()> {
        for entry in self.registry.iter_mut() {
            let observation = match observe(entry.path()).await {
                Ok(observation) => observation,
                Err(error) => {
                    debug!("Stat failed for {:?}: {}", entry.path(), error);
                    if self.dispatcher.send_error(error).await == Delivery::Cancelled {
                        return ControlFlow::Break(());
                    }
                    continue;
                }
            };

            let Some(event) = record(entry, observation) else {
                continue;
            };
            match entry.state().target_path() {
                Some(target) => debug!("{} (target {:?})", event, target),
                None => debug!("{}", event),
            }
            if self.dispatcher.send_event(event).await == Delivery::Cancelled {
                return ControlFlow::Break(());
            }
        }

        trace!(
            "Poll cycle complete: {}/{} tracked paths exist",
            self.registry.iter().filter(|e| e.state().exists()).count(),
            self.registry.len()
        );
        ControlFlow::Continue(())
    }
}

/// Store a fresh observation for `entry` and return the event it produces.
/// An unreadable symlink leaves the stored state as it was.
fn record(entry: &mut TrackedEntry, observation: Observation) -> Option<Event> {
    let Observation::State(current) = observation else {
        return None;
    };
    let previous = entry.replace(current);
    let op = diff(&previous, entry.state())?;
    Some(Event::new(entry.path(), op))
}
