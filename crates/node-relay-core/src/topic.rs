//! Topic path derivation.
//!
//! Events are addressed on the bus as `{cause}/{building}/{room}`, where the
//! building and room come from the first two `-`-separated hostname segments.

use std::fmt;

use serde::Serialize;

use crate::error::{CoreError, Result};

/// A hierarchical bus address such as `statechange/ITB/1101`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct TopicPath(String);

impl TopicPath {
    /// Returns the path as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TopicPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for TopicPath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Derive the topic path for an event.
///
/// Segments after the room (usually the device name) are ignored.
///
/// # Errors
///
/// Returns `CoreError::EmptyField` for an empty cause and
/// `CoreError::InvalidHostname` when the hostname has fewer than two segments
/// or an empty building/room segment.
pub fn derive_path(event_cause: &str, hostname: &str) -> Result<TopicPath> {
    if event_cause.is_empty() {
        return Err(CoreError::EmptyField("eventCause"));
    }

    let mut segments = hostname.split('-');
    let building = segments.next().filter(|s| !s.is_empty());
    let room = segments.next().filter(|s| !s.is_empty());

    match (building, room) {
        (Some(building), Some(room)) => {
            Ok(TopicPath(format!("{event_cause}/{building}/{room}")))
        }
        _ => Err(CoreError::InvalidHostname(hostname.to_string())),
    }
}

/// Validate the `{type}/{cause}` route parameters of an event submission.
///
/// # Errors
///
/// Returns `CoreError::EmptyField` naming the first empty parameter.
pub fn validate_route(event_type: &str, cause: &str) -> Result<()> {
    if event_type.is_empty() {
        return Err(CoreError::EmptyField("type"));
    }
    if cause.is_empty() {
        return Err(CoreError::EmptyField("cause"));
    }
    Ok(())
}
