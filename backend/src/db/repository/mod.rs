//! Repository trait definitions for the queue status engine.
//!
//! The engine only depends on these traits, never on a concrete store.
//!
//! # Module Organization
//!
//! - [`error`]: Error types for repository operations
//! - [`msb`]: MSB query evaluation
//! - [`affiliation`]: Project affiliation table
//! - [`project`]: Project queue metadata and TAG adjustments
//!
//! # Convenience Trait Bound
//!
//! ```ignore
//! fn my_service<R: FullRepository + ?Sized>(repo: &R) -> RepositoryResult<()> {
//!     let table = repo.get_all_affiliations()?;
//!     let msbs = repo.query_msbs(&query)?;
//!     Ok(())
//! }
//! ```

pub mod affiliation;
pub mod error;
pub mod msb;
pub mod project;

pub use error::{ErrorContext, RepositoryError, RepositoryResult};

pub use affiliation::AffiliationRepository;
pub use msb::MsbRepository;
pub use project::ProjectRepository;

/// Composite trait bound for a complete repository implementation.
///
/// Implemented automatically for any type implementing all three traits.
pub trait FullRepository: MsbRepository + AffiliationRepository + ProjectRepository {}

impl<T> FullRepository for T where T: MsbRepository + AffiliationRepository + ProjectRepository {}
