//! API error type and its HTTP mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;
use tracing::error;

use bondstress_core::CoreError;
use bondstress_ext_file::IngestError;
use bondstress_scenario::ScenarioError;
use bondstress_traits::RepositoryError;

/// A specialized Result type for handlers.
pub type ApiResult<T> = Result<T, ApiError>;

/// Handler failure, rendered as `{"error": message}`.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request or its payload is invalid (400).
    #[error("{0}")]
    BadRequest(String),

    /// Referenced data does not exist (404).
    #[error("{0}")]
    NotFound(String),

    /// Unexpected failure (500).
    #[error("{0}")]
    Internal(String),
}

/// Error body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    error: String,
}

impl ApiError {
    /// HTTP status for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(error = %self, "request failed");
        }
        (
            status,
            Json(ErrorResponse {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}

impl From<RepositoryError> for ApiError {
    fn from(e: RepositoryError) -> Self {
        match e {
            RepositoryError::MissingData { .. } => Self::NotFound(e.to_string()),
            RepositoryError::Conflict { .. } => Self::BadRequest(e.to_string()),
            RepositoryError::Storage(_) => Self::Internal(e.to_string()),
        }
    }
}

impl From<ScenarioError> for ApiError {
    fn from(e: ScenarioError) -> Self {
        match e {
            ScenarioError::MissingData { .. } => Self::NotFound(e.to_string()),
            ScenarioError::Repository(inner) => inner.into(),
            ScenarioError::Internal(_) => Self::Internal(e.to_string()),
            _ => Self::BadRequest(e.to_string()),
        }
    }
}

impl From<IngestError> for ApiError {
    fn from(e: IngestError) -> Self {
        if e.is_client_error() {
            Self::BadRequest(e.to_string())
        } else {
            Self::Internal(e.to_string())
        }
    }
}

impl From<CoreError> for ApiError {
    fn from(e: CoreError) -> Self {
        Self::BadRequest(e.to_string())
    }
}
