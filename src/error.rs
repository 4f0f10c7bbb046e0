//! Error types for the authorization core

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Authorization core error type
#[derive(Error, Debug)]
pub enum AuthError {
    /// Missing or malformed required input
    #[error("validation error: {0}")]
    Validation(String),

    /// Missing, invalid, or expired credentials
    #[error("authentication required: {0}")]
    Authentication(String),

    /// Role or tenant status forbids the action
    #[error("forbidden: {0}")]
    Authorization(String),

    /// Identifier does not resolve
    #[error("not found: {0}")]
    NotFound(String),

    /// Action missing from the permission table
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Unexpected failure
    #[error("internal error: {0}")]
    Internal(String),
}

impl AuthError {
    /// HTTP status consumed by collaborators
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Authentication(_) => StatusCode::UNAUTHORIZED,
            Self::Authorization(_) => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Configuration(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Stable machine-readable code for the response body
    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation_error",
            Self::Authentication(_) => "unauthenticated",
            Self::Authorization(_) => "forbidden",
            Self::NotFound(_) => "not_found",
            Self::Configuration(_) => "configuration_error",
            Self::Internal(_) => "internal_error",
        }
    }

    /// Generic client-facing message; detail stays in logs
    fn public_message(&self) -> &'static str {
        match self {
            Self::Validation(_) => "invalid request",
            Self::Authentication(_) => "authentication required",
            Self::Authorization(_) => "forbidden",
            Self::NotFound(_) => "not found",
            Self::Configuration(_) | Self::Internal(_) => "internal error",
        }
    }
}

/// Error body rendered to collaborators
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Machine-readable error code
    pub code: String,
    /// Generic message, no internal detail
    pub message: String,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        } else {
            tracing::debug!(error = %self, "request rejected");
        }
        let body = ErrorBody {
            code: self.code().to_string(),
            message: self.public_message().to_string(),
        };
        (status, Json(body)).into_response()
    }
}

/// Result type for the authorization core
pub type AuthResult<T> = Result<T, AuthError>;
