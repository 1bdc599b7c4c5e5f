//! HTTP ingress for the node-relay agent.
//!
//! This crate exposes the agent's local API:
//!
//! - Event submission onto the fleet bus (fire-and-forget)
//! - Reading and toggling the network addressing mode
//! - Passthrough maintenance commands (reboot, container listing)
//!
//! Authentication is left to whatever sits in front of the agent.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                  Local clients (touch panels)                │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     node-relay-gateway                       │
//! │  ┌─────────────┐ ┌─────────────┐ ┌─────────────────────┐   │
//! │  │   Events    │ │   Network   │ │      System         │   │
//! │  │  Handlers   │ │   Handlers  │ │     Handlers        │   │
//! │  └─────────────┘ └─────────────┘ └─────────────────────┘   │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!               ┌──────────────┼──────────────┐
//!               ▼              ▼              ▼
//!        ┌──────────┐   ┌──────────┐   ┌──────────┐
//!        │  Event   │   │ dhcpcd   │   │  Command │
//!        │  Queue   │   │  files   │   │  Runner  │
//!        └──────────┘   └──────────┘   └──────────┘
//! ```
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use node_relay_control::{ControlConfig, ProcessRunner};
//! use node_relay_gateway::{create_router, GatewayConfig, GatewayState};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let control = ControlConfig::default();
//! let runner = Arc::new(ProcessRunner::new(control.command.timeout()));
//!
//! let (state, _dispatcher) = GatewayState::start(&control, runner, GatewayConfig::default());
//! let app = create_router(state);
//!
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:7010").await?;
//! axum::serve(listener, app).await?;
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;

pub use config::GatewayConfig;
pub use error::ApiError;
pub use routes::create_router;
pub use state::GatewayState;
