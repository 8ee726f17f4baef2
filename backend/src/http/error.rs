//! HTTP error handling and response types.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::db::repository::RepositoryError;
use crate::services::QueueStatusError;

/// API error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Optional additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

/// Application error type for HTTP handlers.
#[derive(Debug)]
pub enum AppError {
    /// Invalid request parameters
    BadRequest(String),
    /// Internal server error
    Internal(String),
    /// Failure reported by the queue status engine
    QueueStatus(QueueStatusError),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::QueueStatus(e) => match e {
                QueueStatusError::Configuration(_) | QueueStatusError::Validation(_) => {
                    StatusCode::BAD_REQUEST
                }
                QueueStatusError::Evaluator { .. } => StatusCode::BAD_GATEWAY,
                QueueStatusError::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let error = match self {
            AppError::BadRequest(msg) => ApiError::new("BAD_REQUEST", msg),
            AppError::Internal(msg) => ApiError::new("INTERNAL_ERROR", msg),
            AppError::QueueStatus(e) => {
                let error = ApiError::new(e.code(), e.to_string());
                match &e {
                    QueueStatusError::Evaluator { source, .. } => {
                        error.with_details(source.context().to_string())
                    }
                    _ => error,
                }
            }
        };

        if status.is_server_error() {
            tracing::error!("{}: {}", error.code, error.message);
        }

        (status, Json(error)).into_response()
    }
}

impl From<QueueStatusError> for AppError {
    fn from(err: QueueStatusError) -> Self {
        AppError::QueueStatus(err)
    }
}

impl From<RepositoryError> for AppError {
    fn from(err: RepositoryError) -> Self {
        AppError::QueueStatus(err.into())
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}
