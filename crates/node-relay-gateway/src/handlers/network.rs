//! Network addressing mode endpoints.

use std::sync::Arc;

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;

use node_relay_control::CommandRunner;

use crate::error::ApiError;
use crate::state::GatewayState;

/// Report the current addressing mode as `"dhcp"` or `"static"`.
///
/// # Errors
///
/// Returns `500` if the active configuration file cannot be read.
pub async fn get_mode<R>(
    State(state): State<Arc<GatewayState<R>>>,
) -> Result<impl IntoResponse, ApiError>
where
    R: CommandRunner + 'static,
{
    let mode = state.network.current_mode().await?;
    Ok(Json(mode))
}

/// Toggle the addressing mode and report the mode afterwards.
///
/// # Errors
///
/// Returns `500` if either configuration file is missing, a rename fails,
/// or the service restart fails.
pub async fn toggle_mode<R>(
    State(state): State<Arc<GatewayState<R>>>,
) -> Result<impl IntoResponse, ApiError>
where
    R: CommandRunner + 'static,
{
    tracing::info!("Toggling network addressing mode");
    let mode = state.network.toggle().await?;
    Ok(Json(mode))
}
