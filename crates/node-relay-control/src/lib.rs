//! Event relay and network mode control for node-relay.
//!
//! This crate holds the logic behind the node agent's HTTP surface. It
//! coordinates between the ingress, the local filesystem and the external
//! commands the agent drives.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      Gateway (HTTP)                          │
//! └─────────────────────────────────────────────────────────────┘
//!                  │                          │
//!                  ▼                          ▼
//! ┌──────────────────────────────┐ ┌──────────────────────────────┐
//! │          EventQueue          │ │    NetworkModeController     │
//! │   (bounded, FIFO, blocking)  │ │   (locked file swap + read)  │
//! └──────────────────────────────┘ └──────────────────────────────┘
//!                  │                          │
//!                  ▼                          │
//! ┌──────────────────────────────┐            │
//! │   Dispatcher (single task)   │            │
//! └──────────────────────────────┘            │
//!                  │                          │
//!                  ▼                          ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                CommandRunner (publisher, systemctl)          │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```no_run
//! use std::sync::Arc;
//! use node_relay_control::{EventRelay, InboundEvent, ProcessRunner, RelayConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let runner = Arc::new(ProcessRunner::default());
//! let (queue, _dispatcher) = EventRelay::start(&RelayConfig::default(), runner);
//!
//! let event = InboundEvent::new("ITB-1101-CP1", "statechange");
//! let topic = queue.submit(&event).await?;
//! println!("queued on {topic}");
//! # Ok(())
//! # }
//! ```
//!
//! # Delivery
//!
//! Publishing is fire-and-forget. A submission succeeds once the message is
//! queued; publish failures are logged and counted but never retried.
//! Queued messages live only in memory and are lost if the process exits.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod error;
#[cfg(any(test, feature = "test-utils"))]
pub mod mock;
pub mod network;
pub mod relay;
pub mod runner;
pub mod system;
pub mod types;

pub use error::{CommandError, ControlError, Result};
#[cfg(any(test, feature = "test-utils"))]
pub use mock::{Invocation, MockCommandRunner};
pub use network::{detect_mode, NetworkMode, NetworkModeController};
pub use relay::{Dispatcher, EventQueue, EventRelay, RelaySnapshot};
pub use runner::{CommandOutput, CommandRunner, CommandSpec, ProcessRunner};
pub use system::SystemCommands;
pub use types::{CommandConfig, ControlConfig, NetworkConfig, RelayConfig, SystemConfig};

// Re-export commonly used types from dependencies for convenience
pub use node_relay_core::{CoreError, InboundEvent, QueuedMessage, TopicPath};
