//! Blocking delivery of events and errors to the consumer
//!
//! Both channels are rendezvous channels: a send completes only once the
//! consumer has taken the item. Every send races the shutdown token so the
//! poll loop never stays parked on a consumer that stopped reading.

use crate::events::Event;
use fswatcher_core::error::Error;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// What happened to an item handed to the dispatcher
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Delivery {
    /// The consumer received it
    Delivered,
    /// The receiving side is gone; the item was discarded
    Disconnected,
    /// Shutdown was signalled before the consumer received it
    Cancelled,
}

/// Sending halves of the consumer channels plus the shutdown token
#[derive(Debug, Clone)]
pub(crate) struct Dispatcher {
    events: flume::Sender<Event>,
    errors: flume::Sender<Error>,
    cancellation_token: CancellationToken,
}

impl Dispatcher {
    pub(crate) fn new(
        events: flume::Sender<Event>,
        errors: flume::Sender<Error>,
        cancellation_token: CancellationToken,
    ) -> Self {
        Self {
            events,
            errors,
            cancellation_token,
        }
    }

    /// Hand an event to the consumer, waiting until it is received or
    /// shutdown is signalled
    pub(crate) async fn send_event(&self, event: Event) -> Delivery {
        tokio::select! {
            biased;
            _ = self.cancellation_token.cancelled() => Delivery::Cancelled,
            result = self.events.send_async(event) => match result {
                Ok(()) => Delivery::Delivered,
                Err(flume::SendError(event)) => {
                    debug!("Event receiver dropped, discarding {}", event);
                    Delivery::Disconnected
                }
            },
        }
    }

    /// Hand an error to the consumer, waiting until it is received or
    /// shutdown is signalled
    pub(crate) async fn send_error(&self, error: Error) -> Delivery {
        tokio::select! {
            biased;
            _ = self.cancellation_token.cancelled() => Delivery::Cancelled,
            result = self.errors.send_async(error) => match result {
                Ok(()) => Delivery::Delivered,
                Err(flume::SendError(error)) => {
                    debug!("Error receiver dropped, discarding: {}", error);
                    Delivery::Disconnected
                }
            },
        }
    }
}
