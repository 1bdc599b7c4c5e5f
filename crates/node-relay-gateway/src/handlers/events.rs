//! Event submission endpoint.
//!
//! Accepted events are queued and published in the background. The caller
//! gets `"Success"` as soon as the event is queued and never learns whether
//! the publish itself succeeded.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;

use node_relay_control::CommandRunner;
use node_relay_core::{validate_route, InboundEvent};

use crate::error::ApiError;
use crate::state::GatewayState;

/// Queue an event for publishing on the bus.
///
/// # Example
///
/// ```text
/// POST /event/user/statechange
/// {"hostname": "ITB-1101-CP1", "eventCause": "statechange", "event": {...}}
///
/// Response: 200 OK
/// "Success"
/// ```
///
/// # Errors
///
/// Returns `400 Bad Request` if the route parameters are empty, the body is
/// not a valid event, or the hostname lacks building/room segments.
pub async fn submit_event<R>(
    State(state): State<Arc<GatewayState<R>>>,
    Path((event_type, cause)): Path<(String, String)>,
    body: Result<Json<InboundEvent>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError>
where
    R: CommandRunner + 'static,
{
    validate_route(&event_type, &cause)?;
    let Json(event) = body?;

    let topic = state.queue.submit(&event).await?;

    tracing::debug!(
        event_type = %event_type,
        cause = %cause,
        hostname = %event.hostname,
        topic = %topic,
        "Queued event"
    );

    Ok(Json("Success"))
}
