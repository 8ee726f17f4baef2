//! Database module for the queue status engine.
//!
//! The engine talks to its collaborators (MSB query evaluator, affiliation
//! table, project queue metadata) only through the traits in [`repository`],
//! so backends can be swapped without touching the engine.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │  HTTP layer (axum handlers)                             │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼─────────────────────────────────────┐
//! │  Services - queue status accumulation, grouping,        │
//! │  priority ordering                                      │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼─────────────────────────────────────┐
//! │  Repository traits (repository/)                        │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//!     ┌───────────────▼──────────────────────────────┐
//!     │             Local Repository                  │
//!     │        (in-memory MSB catalog)                │
//!     └──────────────────────────────────────────────┘
//! ```

#[cfg(not(feature = "local-repo"))]
compile_error!("Enable at least one repository backend feature.");

pub mod factory;
pub mod models;
pub mod repositories;
pub mod repository;

pub use factory::{RepositoryFactory, RepositoryType};
pub use models::{CatalogMsb, DailyWindow, MsbCatalog, ObservableWindow};
pub use repositories::LocalRepository;
pub use repository::{
    AffiliationRepository, ErrorContext, FullRepository, MsbRepository, ProjectRepository,
    RepositoryError, RepositoryResult,
};
