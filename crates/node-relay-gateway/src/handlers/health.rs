//! Health check endpoint.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;

use node_relay_control::{CommandRunner, RelaySnapshot};

use crate::state::GatewayState;

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Service status.
    pub status: &'static str,
    /// Service version.
    pub version: &'static str,
    /// Event relay counters.
    pub queue: RelaySnapshot,
}

/// Health check handler.
///
/// Reports the service version and the event relay counters. Publish
/// failures are only visible here and in the logs.
///
/// # Example
///
/// ```text
/// GET /health
///
/// Response: 200 OK
/// {
///   "status": "healthy",
///   "version": "0.1.0",
///   "queue": {"depth": 0, "capacity": 1000, "enqueued": 12, "published": 11, "failed": 1}
/// }
/// ```
pub async fn health<R>(State(state): State<Arc<GatewayState<R>>>) -> impl IntoResponse
where
    R: CommandRunner + 'static,
{
    let response = HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        queue: state.queue.snapshot(),
    };

    (StatusCode::OK, Json(response))
}
