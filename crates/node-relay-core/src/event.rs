//! Inbound state-change events.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::Result;
use crate::topic::{derive_path, TopicPath};

/// A state-change event as posted by a device on this node.
///
/// Only `hostname` and `eventCause` are interpreted. Every other field of the
/// posted record is kept in `payload` and published unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InboundEvent {
    /// Device hostname, conventionally `{building}-{room}-{device}`.
    pub hostname: String,
    /// What caused the event (e.g. `statechange`). Becomes the topic root.
    pub event_cause: String,
    /// The rest of the record.
    #[serde(flatten)]
    pub payload: Map<String, Value>,
}

impl InboundEvent {
    /// Create an event with an empty payload.
    #[must_use]
    pub fn new(hostname: impl Into<String>, event_cause: impl Into<String>) -> Self {
        Self {
            hostname: hostname.into(),
            event_cause: event_cause.into(),
            payload: Map::new(),
        }
    }

    /// Add a payload field.
    #[must_use]
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.payload.insert(key.into(), value.into());
        self
    }

    /// Derive the bus topic for this event.
    ///
    /// # Errors
    ///
    /// Returns a validation error if the cause is empty or the hostname has
    /// no building/room segments.
    pub fn topic_path(&self) -> Result<TopicPath> {
        derive_path(&self.event_cause, &self.hostname)
    }

    /// Serialize the full event, payload included, to JSON.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Serialization` if encoding fails.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}
