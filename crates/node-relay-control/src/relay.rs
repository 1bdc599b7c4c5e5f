//! Event relay pipeline.
//!
//! HTTP handlers hand validated events to an `EventQueue`; a single
//! `Dispatcher` task drains the queue and invokes the publisher command once
//! per message.
//!
//! # Ordering
//!
//! The queue is FIFO and has exactly one consumer, so messages reach the bus
//! in the order they were enqueued. A slow publish stalls every message
//! behind it; the command timeout bounds how long.
//!
//! # Backpressure
//!
//! The queue is bounded. When it is full, `enqueue` waits for the dispatcher
//! to free a slot rather than dropping the message.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use node_relay_core::{InboundEvent, QueuedMessage, TopicPath};
use serde::Serialize;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::error::{CommandError, ControlError, Result};
use crate::runner::{CommandOutput, CommandRunner, CommandSpec};
use crate::types::RelayConfig;

#[derive(Debug, Default)]
struct RelayStats {
    enqueued: AtomicU64,
    published: AtomicU64,
    failed: AtomicU64,
}

/// Point-in-time view of the relay counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RelaySnapshot {
    /// Messages waiting for the dispatcher.
    pub depth: usize,
    /// Maximum number of waiting messages.
    pub capacity: usize,
    /// Messages accepted since start.
    pub enqueued: u64,
    /// Publish attempts that succeeded.
    pub published: u64,
    /// Publish attempts that failed.
    pub failed: u64,
}

/// Producer handle for the relay queue.
///
/// Cheap to clone; every HTTP handler holds one.
#[derive(Debug, Clone)]
pub struct EventQueue {
    sender: mpsc::Sender<QueuedMessage>,
    stats: Arc<RelayStats>,
}

impl EventQueue {
    /// Validate an event and queue it for publishing.
    ///
    /// Returns the topic the event will be published on. An invalid event is
    /// rejected without touching the queue.
    ///
    /// # Errors
    ///
    /// Returns `ControlError::Validation` for a malformed event and
    /// `ControlError::QueueClosed` if the dispatcher has stopped.
    pub async fn submit(&self, event: &InboundEvent) -> Result<TopicPath> {
        let message = QueuedMessage::from_event(event)?;
        let topic = message.topic().clone();
        self.enqueue(message).await?;
        Ok(topic)
    }

    /// Queue a message, waiting for space if the queue is full.
    ///
    /// # Errors
    ///
    /// Returns `ControlError::QueueClosed` if the dispatcher has stopped.
    pub async fn enqueue(&self, message: QueuedMessage) -> Result<()> {
        if self.sender.capacity() == 0 {
            tracing::warn!(
                capacity = self.capacity(),
                topic = %message.topic(),
                "Event queue full, waiting for dispatcher"
            );
        }

        self.sender
            .send(message)
            .await
            .map_err(|_| ControlError::QueueClosed)?;
        self.stats.enqueued.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    /// Number of messages waiting for the dispatcher.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.sender.max_capacity() - self.sender.capacity()
    }

    /// Maximum number of waiting messages.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.sender.max_capacity()
    }

    /// Current relay counters.
    #[must_use]
    pub fn snapshot(&self) -> RelaySnapshot {
        RelaySnapshot {
            depth: self.depth(),
            capacity: self.capacity(),
            enqueued: self.stats.enqueued.load(Ordering::Relaxed),
            published: self.stats.published.load(Ordering::Relaxed),
            failed: self.stats.failed.load(Ordering::Relaxed),
        }
    }
}

/// The single consumer of the relay queue.
pub struct Dispatcher<R: CommandRunner> {
    receiver: mpsc::Receiver<QueuedMessage>,
    runner: Arc<R>,
    publisher: CommandSpec,
    stats: Arc<RelayStats>,
}

impl<R: CommandRunner> Dispatcher<R> {
    /// Drain the queue until every `EventQueue` handle is dropped.
    pub async fn run(mut self) {
        tracing::info!(publisher = %self.publisher, "Event dispatcher started");

        while let Some(message) = self.receiver.recv().await {
            let result = self.publish(&message).await;
            self.record(&message, result);
        }

        tracing::info!("Event queue closed, dispatcher stopping");
    }

    /// Make exactly one publish attempt for `message`.
    async fn publish(
        &self,
        message: &QueuedMessage,
    ) -> std::result::Result<CommandOutput, CommandError> {
        self.runner
            .run(
                &self.publisher,
                &[message.topic().as_str(), message.payload()],
            )
            .await
    }

    fn record(
        &self,
        message: &QueuedMessage,
        result: std::result::Result<CommandOutput, CommandError>,
    ) {
        let queued_ms = (Utc::now() - message.enqueued_at()).num_milliseconds();

        match result {
            Ok(_) => {
                self.stats.published.fetch_add(1, Ordering::Relaxed);
                tracing::debug!(
                    topic = %message.topic(),
                    queued_ms,
                    "Published event"
                );
            }
            Err(e) => {
                self.stats.failed.fetch_add(1, Ordering::Relaxed);
                tracing::error!(
                    topic = %message.topic(),
                    payload = %message.payload(),
                    queued_ms,
                    error = %e,
                    "Failed to publish event"
                );
            }
        }
    }
}

/// Build a queue and its dispatcher without starting the dispatcher.
///
/// A capacity of zero is raised to one.
pub fn pipeline<R: CommandRunner>(
    capacity: usize,
    publisher: CommandSpec,
    runner: Arc<R>,
) -> (EventQueue, Dispatcher<R>) {
    let (sender, receiver) = mpsc::channel(capacity.max(1));
    let stats = Arc::new(RelayStats::default());

    let queue = EventQueue {
        sender,
        stats: Arc::clone(&stats),
    };
    let dispatcher = Dispatcher {
        receiver,
        runner,
        publisher,
        stats,
    };
    (queue, dispatcher)
}

/// Entry point for the relay pipeline.
pub struct EventRelay;

impl EventRelay {
    /// Create the queue and spawn its dispatcher task.
    ///
    /// Must be called from within a Tokio runtime. The dispatcher runs until
    /// every clone of the returned `EventQueue` is dropped.
    pub fn start<R: CommandRunner + 'static>(
        config: &RelayConfig,
        runner: Arc<R>,
    ) -> (EventQueue, JoinHandle<()>) {
        let (queue, dispatcher) = pipeline(config.queue_capacity, config.publisher.clone(), runner);
        let handle = tokio::spawn(dispatcher.run());
        (queue, handle)
    }
}
