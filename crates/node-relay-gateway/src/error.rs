//! API error types and responses.
//!
//! This module defines the standard error format for all API responses.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

use node_relay_control::ControlError;
use node_relay_core::CoreError;

/// API error type that implements `IntoResponse`.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Invalid request body or parameters.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// The network configuration files required for a toggle are missing.
    #[error("precondition failed: {0}")]
    PreconditionFailed(String),

    /// An external command failed or timed out.
    #[error("command failed: {0}")]
    CommandFailed(String),

    /// A filesystem operation failed.
    #[error("i/o error: {0}")]
    Io(String),

    /// The event relay is shutting down.
    #[error("service unavailable")]
    Unavailable,
}

/// Error response body.
#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: ErrorBody,
}

/// Error details.
#[derive(Debug, Serialize)]
struct ErrorBody {
    code: &'static str,
    message: String,
}

impl ApiError {
    /// Get the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::PreconditionFailed(_) | Self::CommandFailed(_) | Self::Io(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            Self::Unavailable => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    /// Get the error code string for this error.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::BadRequest(_) => "bad_request",
            Self::PreconditionFailed(_) => "precondition_failed",
            Self::CommandFailed(_) => "command_failed",
            Self::Io(_) => "io_error",
            Self::Unavailable => "unavailable",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let code = self.code();
        let message = self.to_string();

        let body = ErrorResponse {
            error: ErrorBody { code, message },
        };

        (status, Json(body)).into_response()
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        Self::BadRequest(err.to_string())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl From<ControlError> for ApiError {
    fn from(err: ControlError) -> Self {
        match err {
            ControlError::Validation(core_err) => Self::from(core_err),
            ControlError::Precondition(msg) => {
                tracing::error!(error = %msg, "Toggle precondition failed");
                Self::PreconditionFailed(msg)
            }
            ControlError::Command(cmd_err) => {
                tracing::error!(error = %cmd_err, "External command failed");
                Self::CommandFailed(cmd_err.to_string())
            }
            err @ ControlError::Io { .. } => {
                tracing::error!(error = %err, "Filesystem error");
                Self::Io(err.to_string())
            }
            ControlError::QueueClosed => {
                tracing::error!("Event submitted after dispatcher stopped");
                Self::Unavailable
            }
        }
    }
}
