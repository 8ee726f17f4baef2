//! Repository factory for dependency injection.
//!
//! Creates repository instances from runtime configuration.

use std::str::FromStr;
use std::sync::Arc;

use super::repositories::LocalRepository;
use super::repository::{FullRepository, RepositoryResult};
use crate::config::AppConfig;

/// Repository type configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepositoryType {
    /// In-memory local repository
    Local,
}

impl FromStr for RepositoryType {
    type Err = String;

    /// Parse repository type from string (`"local"`, `"memory"`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "local" | "memory" => Ok(Self::Local),
            _ => Err(format!("Unknown repository type: {}", s)),
        }
    }
}

/// Repository factory for creating repository instances.
///
/// # Example
/// ```
/// use omp_qstatus::config::AppConfig;
/// use omp_qstatus::db::{MsbRepository, RepositoryFactory};
///
/// let repo = RepositoryFactory::from_config(&AppConfig::default()).unwrap();
/// assert!(repo.health_check().unwrap());
/// ```
pub struct RepositoryFactory;

impl RepositoryFactory {
    /// Create an empty in-memory local repository.
    pub fn create_local() -> Arc<dyn FullRepository> {
        Arc::new(LocalRepository::new())
    }

    /// Create the repository described by `config`.
    ///
    /// A local repository loads `repository.catalog` when one is configured.
    ///
    /// # Errors
    /// `ConfigurationError` for an unknown type or an unreadable catalog.
    pub fn from_config(config: &AppConfig) -> RepositoryResult<Arc<dyn FullRepository>> {
        match config.repository_type()? {
            RepositoryType::Local => match &config.repository.catalog {
                Some(path) => {
                    let repo = LocalRepository::from_json_file(path)?;
                    Ok(Arc::new(repo) as Arc<dyn FullRepository>)
                }
                None => {
                    log::warn!("No MSB catalog configured; local repository starts empty");
                    Ok(Self::create_local())
                }
            },
        }
    }
}
