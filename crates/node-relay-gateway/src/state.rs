//! Gateway application state.
//!
//! This module defines the shared state that is available to all request handlers.

use std::sync::Arc;

use node_relay_control::{
    CommandRunner, ControlConfig, EventQueue, EventRelay, NetworkModeController, SystemCommands,
};
use tokio::task::JoinHandle;

use crate::config::GatewayConfig;

/// Shared application state for the gateway.
///
/// This struct holds references to all services needed by the HTTP handlers.
pub struct GatewayState<R>
where
    R: CommandRunner,
{
    /// Producer handle for the event relay.
    pub queue: EventQueue,
    /// The network addressing mode controller.
    pub network: Arc<NetworkModeController<R>>,
    /// Passthrough maintenance commands.
    pub system: Arc<SystemCommands<R>>,
    /// Gateway configuration.
    pub config: GatewayConfig,
}

impl<R> GatewayState<R>
where
    R: CommandRunner,
{
    /// Create a new gateway state from already-built services.
    #[must_use]
    pub fn new(
        queue: EventQueue,
        network: Arc<NetworkModeController<R>>,
        system: Arc<SystemCommands<R>>,
        config: GatewayConfig,
    ) -> Self {
        Self {
            queue,
            network,
            system,
            config,
        }
    }
}

impl<R> GatewayState<R>
where
    R: CommandRunner + 'static,
{
    /// Build every service from `control` and start the event dispatcher.
    ///
    /// Must be called from within a Tokio runtime. Returns the dispatcher's
    /// task handle alongside the state.
    #[must_use]
    pub fn start(
        control: &ControlConfig,
        runner: Arc<R>,
        config: GatewayConfig,
    ) -> (Self, JoinHandle<()>) {
        let (queue, dispatcher) = EventRelay::start(&control.relay, Arc::clone(&runner));
        let network = Arc::new(NetworkModeController::new(
            control.network.clone(),
            Arc::clone(&runner),
        ));
        let system = Arc::new(SystemCommands::new(control.system.clone(), runner));

        (Self::new(queue, network, system, config), dispatcher)
    }
}

impl<R> Clone for GatewayState<R>
where
    R: CommandRunner,
{
    fn clone(&self) -> Self {
        Self {
            queue: self.queue.clone(),
            network: Arc::clone(&self.network),
            system: Arc::clone(&self.system),
            config: self.config.clone(),
        }
    }
}
