//! Passthrough maintenance endpoints.

use std::sync::Arc;

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;

use node_relay_control::CommandRunner;

use crate::error::ApiError;
use crate::state::GatewayState;

/// Reboot the node.
///
/// # Errors
///
/// Returns `500` if the reboot command fails.
pub async fn reboot<R>(
    State(state): State<Arc<GatewayState<R>>>,
) -> Result<impl IntoResponse, ApiError>
where
    R: CommandRunner + 'static,
{
    state.system.reboot().await?;
    Ok(Json("Rebooting"))
}

/// Return the raw container listing as plain text.
///
/// # Errors
///
/// Returns `500` if the listing command fails.
pub async fn docker_status<R>(
    State(state): State<Arc<GatewayState<R>>>,
) -> Result<impl IntoResponse, ApiError>
where
    R: CommandRunner + 'static,
{
    let output = state.system.container_status().await?;
    Ok(output)
}
