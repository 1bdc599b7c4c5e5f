//! Router configuration.
//!
//! This module sets up the Axum router with all routes and middleware.

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use node_relay_control::CommandRunner;

use crate::handlers::{events, health, network, system};
use crate::state::GatewayState;

/// Create the gateway router with all routes and middleware.
///
/// # Routes
///
/// - `GET /health` - Health check and relay counters
/// - `POST /event/:type/:cause` - Queue an event for the bus
/// - `GET /dhcp` - Current addressing mode
/// - `PUT /dhcp` - Toggle the addressing mode
/// - `GET /reboot` - Reboot the node
/// - `GET /dockerStatus` - List running containers
pub fn create_router<R>(state: GatewayState<R>) -> Router
where
    R: CommandRunner + 'static,
{
    // Extract config values before moving state
    let max_body_bytes = state.config.max_body_bytes;
    let request_timeout = state.config.request_timeout();

    let state = Arc::new(state);

    Router::new()
        .route("/health", get(health::health::<R>))
        // Event relay
        .route("/event/:type/:cause", post(events::submit_event::<R>))
        // Network addressing mode
        .route(
            "/dhcp",
            get(network::get_mode::<R>).put(network::toggle_mode::<R>),
        )
        // Passthrough
        .route("/reboot", get(system::reboot::<R>))
        .route("/dockerStatus", get(system::docker_status::<R>))
        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(RequestBodyLimitLayer::new(max_body_bytes))
        .layer(TimeoutLayer::new(request_timeout))
        .with_state(state)
}
