//! Messages queued for publishing.

use chrono::{DateTime, Utc};

use crate::error::Result;
use crate::event::InboundEvent;
use crate::topic::TopicPath;

/// A validated, serialized event waiting to be published.
///
/// Fields are fixed at construction.
#[derive(Debug, Clone)]
pub struct QueuedMessage {
    topic: TopicPath,
    payload: String,
    enqueued_at: DateTime<Utc>,
}

impl QueuedMessage {
    /// Build a message from an already-derived topic and serialized payload.
    #[must_use]
    pub fn new(topic: TopicPath, payload: String) -> Self {
        Self {
            topic,
            payload,
            enqueued_at: Utc::now(),
        }
    }

    /// Validate an event, derive its topic and serialize it.
    ///
    /// # Errors
    ///
    /// Returns a `CoreError` if the event is invalid or cannot be serialized.
    pub fn from_event(event: &InboundEvent) -> Result<Self> {
        let topic = event.topic_path()?;
        let payload = event.to_json()?;
        Ok(Self::new(topic, payload))
    }

    /// The bus topic.
    #[must_use]
    pub fn topic(&self) -> &TopicPath {
        &self.topic
    }

    /// The serialized JSON payload.
    #[must_use]
    pub fn payload(&self) -> &str {
        &self.payload
    }

    /// When the message was created.
    #[must_use]
    pub const fn enqueued_at(&self) -> DateTime<Utc> {
        self.enqueued_at
    }
}
