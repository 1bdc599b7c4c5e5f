//! Passthrough system commands.
//!
//! These endpoints carry no state of their own: they run a configured command
//! and report the outcome.

use std::sync::Arc;

use crate::error::Result;
use crate::runner::CommandRunner;
use crate::types::SystemConfig;

/// Runs the node's maintenance commands.
pub struct SystemCommands<R: CommandRunner> {
    config: SystemConfig,
    runner: Arc<R>,
}

impl<R: CommandRunner> SystemCommands<R> {
    /// Create a new command set.
    #[must_use]
    pub fn new(config: SystemConfig, runner: Arc<R>) -> Self {
        Self { config, runner }
    }

    /// Reboot the node.
    ///
    /// # Errors
    ///
    /// Returns `ControlError::Command` if the reboot command fails.
    pub async fn reboot(&self) -> Result<()> {
        tracing::warn!(command = %self.config.reboot, "Rebooting node");
        let output = self.runner.run(&self.config.reboot, &[]).await?;
        tracing::debug!(stdout = %output.stdout, "Reboot command accepted");
        Ok(())
    }

    /// List running containers.
    ///
    /// Returns the command's standard output unchanged.
    ///
    /// # Errors
    ///
    /// Returns `ControlError::Command` if the listing command fails.
    pub async fn container_status(&self) -> Result<String> {
        tracing::debug!(command = %self.config.container_status, "Listing containers");
        let output = self.runner.run(&self.config.container_status, &[]).await?;
        Ok(output.stdout)
    }
}
