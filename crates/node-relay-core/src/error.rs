//! Validation errors for inbound events.

use thiserror::Error;

/// A result type using `CoreError`.
pub type Result<T> = std::result::Result<T, CoreError>;

/// Errors raised while validating or encoding an inbound event.
///
/// Every variant is a validation failure: the event is rejected before it
/// reaches the queue.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A required field or route parameter was empty.
    #[error("{0} must not be empty")]
    EmptyField(&'static str),

    /// The hostname does not carry a building and room segment.
    #[error("hostname {0:?} must have the form building-room[-device]")]
    InvalidHostname(String),

    /// The event could not be serialized for publishing.
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for CoreError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}
