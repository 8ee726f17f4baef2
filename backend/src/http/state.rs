//! Application state for the HTTP server.

use std::sync::Arc;

use crate::config::AppConfig;
use crate::db::repository::FullRepository;

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Repository instance backing the MSB query evaluator
    pub repository: Arc<dyn FullRepository>,
    /// Site windows and known affiliation codes
    pub config: Arc<AppConfig>,
}

impl AppState {
    /// Create a new application state with the given repository and configuration.
    pub fn new(repository: Arc<dyn FullRepository>, config: AppConfig) -> Self {
        Self {
            repository,
            config: Arc::new(config),
        }
    }
}
