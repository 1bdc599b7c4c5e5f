//! Node Relay - control-plane agent for a managed device fleet.
//!
//! This is the main entry point for the agent. It relays local state-change
//! events onto the fleet bus and exposes the node's network addressing mode.
//!
//! # Configuration
//!
//! Defaults suit a stock node. The following environment variables override
//! them:
//!
//! - `LISTEN_ADDR` - HTTP listen address (default `0.0.0.0:7010`)
//! - `QUEUE_CAPACITY` - maximum queued events (default `1000`)
//! - `DHCPCD_CONF` - active DHCP client configuration file
//! - `DHCPCD_CONF_OTHER` - alternate configuration swapped in on toggle
//! - `COMMAND_TIMEOUT_SECONDS` - limit for every external command (default `30`)
//!
//! Queued events are held in memory only and are lost when the process exits.

use std::path::PathBuf;
use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use node_relay_control::{ControlConfig, NetworkConfig, ProcessRunner};
use node_relay_gateway::{create_router, GatewayConfig, GatewayState};

fn env_parse<T: std::str::FromStr>(name: &str) -> Option<T> {
    let value = std::env::var(name).ok()?;
    match value.parse() {
        Ok(parsed) => Some(parsed),
        Err(_) => {
            tracing::warn!(name, value = %value, "Ignoring unparseable environment variable");
            None
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,node_relay=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Node Relay");

    // Load configuration from environment
    let mut gateway_config = GatewayConfig::default();
    if let Ok(addr) = std::env::var("LISTEN_ADDR") {
        gateway_config.listen_addr = addr;
    }

    let mut control = ControlConfig::default();
    if let Some(capacity) = env_parse("QUEUE_CAPACITY") {
        control.relay.queue_capacity = capacity;
    }
    if let Some(active) = env_parse::<PathBuf>("DHCPCD_CONF") {
        control.network = NetworkConfig::with_active_path(active);
    }
    if let Some(backup) = env_parse::<PathBuf>("DHCPCD_CONF_OTHER") {
        control.network.backup_path = backup;
    }
    if let Some(seconds) = env_parse("COMMAND_TIMEOUT_SECONDS") {
        control.command.timeout_seconds = seconds;
    }

    tracing::info!(
        listen_addr = %gateway_config.listen_addr,
        queue_capacity = control.relay.queue_capacity,
        publisher = %control.relay.publisher,
        active_config = %control.network.active_path.display(),
        backup_config = %control.network.backup_path.display(),
        command_timeout_seconds = control.command.timeout_seconds,
        "Agent configuration loaded"
    );

    // Build services and start the dispatcher
    let runner = Arc::new(ProcessRunner::new(control.command.timeout()));
    let listen_addr = gateway_config.listen_addr.clone();
    let (state, _dispatcher) = GatewayState::start(&control, runner, gateway_config);

    let app = create_router(state);
    tracing::info!("Router configured with all API endpoints");

    // Start HTTP server
    tracing::info!(listen_addr = %listen_addr, "Starting HTTP server");
    let listener = tokio::net::TcpListener::bind(&listen_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
