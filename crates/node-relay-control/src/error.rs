//! Error types for the control layer.
//!
//! This module defines all errors that can occur while relaying events,
//! running external commands, and switching the network addressing mode.

use std::io;
use std::path::PathBuf;

use node_relay_core::CoreError;
use thiserror::Error;

/// A result type using `ControlError`.
pub type Result<T> = std::result::Result<T, ControlError>;

/// Failure of an external command.
#[derive(Debug, Error)]
pub enum CommandError {
    /// The process could not be started.
    #[error("failed to execute {program}: {source}")]
    Spawn {
        /// The program that was invoked.
        program: String,
        /// The underlying OS error.
        #[source]
        source: io::Error,
    },

    /// The process did not finish within the configured timeout.
    #[error("{program} timed out after {seconds}s")]
    Timeout {
        /// The program that was invoked.
        program: String,
        /// The timeout that expired.
        seconds: u64,
    },

    /// The process ran but reported failure.
    #[error("{program} exited with status {code:?}: {stderr}")]
    NonZeroExit {
        /// The program that was invoked.
        program: String,
        /// Exit code, `None` if killed by a signal.
        code: Option<i32>,
        /// Captured standard error.
        stderr: String,
    },
}

/// Errors that can occur in control operations.
#[derive(Debug, Error)]
pub enum ControlError {
    /// The inbound event or request parameters were malformed.
    #[error("invalid request: {0}")]
    Validation(#[from] CoreError),

    /// A file could not be read, inspected or renamed.
    #[error("I/O error on {path:?}: {source}")]
    Io {
        /// The file involved.
        path: PathBuf,
        /// The underlying OS error.
        #[source]
        source: io::Error,
    },

    /// An external command failed.
    #[error("external command failed: {0}")]
    Command(#[from] CommandError),

    /// A toggle was attempted without both configuration files present.
    #[error("cannot toggle network mode: {0}")]
    Precondition(String),

    /// The dispatcher has stopped and no longer accepts messages.
    #[error("event queue is closed")]
    QueueClosed,
}

impl ControlError {
    /// Build an `Io` error for the given path.
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Returns the appropriate HTTP status code for this error.
    #[must_use]
    pub const fn http_status_code(&self) -> u16 {
        match self {
            Self::Validation(_) => 400,
            Self::QueueClosed => 503,
            Self::Io { .. } | Self::Command(_) | Self::Precondition(_) => 500,
        }
    }

    /// Returns the error category name.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation",
            Self::Io { .. } => "io",
            Self::Command(_) => "external_command",
            Self::Precondition(_) => "precondition",
            Self::QueueClosed => "queue_closed",
        }
    }
}
