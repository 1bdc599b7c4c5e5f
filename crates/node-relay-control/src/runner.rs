//! External command execution.
//!
//! Every process the agent starts (the bus publisher, the service restart,
//! the passthrough commands) goes through the `CommandRunner` trait so the
//! relay and network logic can be exercised against a substitute runner.

use std::fmt;
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::process::Command;

use crate::error::CommandError;

/// A program and its fixed leading arguments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandSpec {
    /// Executable name or path.
    pub program: String,
    /// Arguments passed before any per-call arguments.
    #[serde(default)]
    pub args: Vec<String>,
}

impl CommandSpec {
    /// Create a command specification.
    pub fn new<I, S>(program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

/// Result of a command that exited successfully.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit code, `None` if killed by a signal.
    pub exit_code: Option<i32>,
    /// Captured standard output.
    pub stdout: String,
    /// Captured standard error.
    pub stderr: String,
}

/// Trait for running external commands.
///
/// This trait abstracts process execution, allowing for mock
/// implementations in tests.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Run `spec` with `extra_args` appended and wait for it to finish.
    ///
    /// # Errors
    ///
    /// Returns `CommandError::Spawn` if the process cannot be started,
    /// `CommandError::Timeout` if it runs too long, and
    /// `CommandError::NonZeroExit` if it reports failure.
    async fn run(
        &self,
        spec: &CommandSpec,
        extra_args: &[&str],
    ) -> Result<CommandOutput, CommandError>;
}

/// Runs commands as child processes of the agent.
///
/// Children are killed if they outlive the timeout.
#[derive(Debug, Clone)]
pub struct ProcessRunner {
    timeout: Duration,
}

impl ProcessRunner {
    /// Create a runner with the given per-command timeout.
    #[must_use]
    pub const fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    /// The per-command timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl Default for ProcessRunner {
    fn default() -> Self {
        Self::new(Duration::from_secs(30))
    }
}

#[async_trait]
impl CommandRunner for ProcessRunner {
    async fn run(
        &self,
        spec: &CommandSpec,
        extra_args: &[&str],
    ) -> Result<CommandOutput, CommandError> {
        let mut cmd = Command::new(&spec.program);
        cmd.args(&spec.args)
            .args(extra_args)
            .stdin(Stdio::null())
            .kill_on_drop(true);

        tracing::debug!(command = %spec, extra_args = extra_args.len(), "Running command");

        let output = tokio::time::timeout(self.timeout, cmd.output())
            .await
            .map_err(|_| CommandError::Timeout {
                program: spec.program.clone(),
                seconds: self.timeout.as_secs(),
            })?
            .map_err(|source| CommandError::Spawn {
                program: spec.program.clone(),
                source,
            })?;

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

        if output.status.success() {
            Ok(CommandOutput {
                exit_code: output.status.code(),
                stdout,
                stderr,
            })
        } else {
            Err(CommandError::NonZeroExit {
                program: spec.program.clone(),
                code: output.status.code(),
                stderr: stderr.trim().to_string(),
            })
        }
    }
}
