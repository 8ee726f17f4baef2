//! Errors raised by the queue status engine.

use chrono::{DateTime, Utc};

use crate::db::repository::RepositoryError;

/// Result type for queue status operations.
pub type QueueStatusResult<T> = Result<T, QueueStatusError>;

/// Error type for queue status computation.
#[derive(Debug, thiserror::Error)]
pub enum QueueStatusError {
    /// Required input or site configuration is missing.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A filter value is not acceptable (e.g. unknown affiliation code).
    #[error("Validation error: {0}")]
    Validation(String),

    /// The MSB query evaluator failed for one sampled hour. No partial
    /// result is returned.
    #[error("MSB query failed for {hour}: {source}")]
    Evaluator {
        hour: DateTime<Utc>,
        #[source]
        source: RepositoryError,
    },

    /// Any other repository failure (affiliation table, project queues).
    #[error(transparent)]
    Repository(RepositoryError),
}

impl QueueStatusError {
    /// Short machine-readable code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Configuration(_) => "CONFIGURATION_ERROR",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Evaluator { .. } => "EVALUATOR_ERROR",
            Self::Repository(_) => "REPOSITORY_ERROR",
        }
    }
}

impl From<RepositoryError> for QueueStatusError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::ConfigurationError { message, .. } => Self::Configuration(message),
            RepositoryError::ValidationError { message, .. } => Self::Validation(message),
            other => Self::Repository(other),
        }
    }
}
