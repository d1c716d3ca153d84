//! # API Error Types
//!
//! Structured error type implementing `axum::response::IntoResponse`.
//! Maps path validation, selection and ledger node failures to HTTP status
//! codes with a JSON body of the form `{"error": {"code", "message"}}`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use loanbook_node_client::NodeRpcError;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

use crate::select::SelectionError;

/// Structured JSON error response body.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

/// Inner error detail.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorDetail {
    /// Machine-readable error code (e.g., "NOT_FOUND", "UPSTREAM_ERROR").
    pub code: String,
    /// Human-readable error message.
    pub message: String,
}

/// Application-level error type that implements [`IntoResponse`] for Axum.
#[derive(Error, Debug)]
pub enum AppError {
    /// A path parameter could not be parsed (400).
    #[error("bad request: {0}")]
    BadRequest(String),

    /// No record matched the request (404).
    #[error("not found: {0}")]
    NotFound(String),

    /// More than one record matched where exactly one was required (409).
    #[error("ambiguous match: {0}")]
    Ambiguous(String),

    /// Response encoding failed (500). Message is logged but not returned to client.
    #[error("internal error: {0}")]
    Internal(String),

    /// The ledger node failed, rejected the flow, or sent an unreadable reply (502).
    #[error("ledger node error: {0}")]
    Upstream(String),

    /// Ledger node not configured or not ready (503).
    #[error("service unavailable: {0}")]
    ServiceUnavailable(String),
}

impl AppError {
    /// Return the HTTP status code and machine-readable error code for this error.
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            Self::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            Self::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            Self::Ambiguous(_) => (StatusCode::CONFLICT, "AMBIGUOUS_MATCH"),
            Self::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
            Self::Upstream(_) => (StatusCode::BAD_GATEWAY, "UPSTREAM_ERROR"),
            Self::ServiceUnavailable(_) => (StatusCode::SERVICE_UNAVAILABLE, "SERVICE_UNAVAILABLE"),
        }
    }

    /// Construct a service unavailable error (503).
    pub fn service_unavailable(msg: &str) -> Self {
        Self::ServiceUnavailable(msg.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        // Upstream messages are passed through so callers can see why the
        // node refused a flow; internal ones are not.
        let message = match &self {
            Self::Internal(_) => "An internal error occurred".to_string(),
            other => other.to_string(),
        };

        match &self {
            Self::Internal(_) => tracing::error!(error = %self, "internal server error"),
            Self::Upstream(_) => tracing::error!(error = %self, "ledger node call failed"),
            Self::ServiceUnavailable(_) => tracing::warn!(error = %self, "service unavailable"),
            _ => tracing::debug!(error = %self, "request rejected"),
        }

        let body = ErrorBody {
            error: ErrorDetail {
                code: code.to_string(),
                message,
            },
        };

        (status, Json(body)).into_response()
    }
}

impl From<NodeRpcError> for AppError {
    fn from(err: NodeRpcError) -> Self {
        Self::Upstream(err.to_string())
    }
}

impl From<SelectionError> for AppError {
    fn from(err: SelectionError) -> Self {
        match err {
            SelectionError::NotFound { .. } => Self::NotFound(err.to_string()),
            SelectionError::Ambiguous { .. } => Self::Ambiguous(err.to_string()),
        }
    }
}

impl From<loanbook_core::ValidationError> for AppError {
    fn from(err: loanbook_core::ValidationError) -> Self {
        Self::BadRequest(err.to_string())
    }
}
