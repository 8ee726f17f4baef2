//! Project affiliation lookup.

use super::error::RepositoryResult;
use crate::models::AffiliationTable;

/// Repository trait for the project affiliation table.
pub trait AffiliationRepository: Send + Sync {
    /// Fetch affiliation fractions for every project.
    ///
    /// The whole table is returned in one call; it is meant to be loaded
    /// once and consulted in memory.
    fn get_all_affiliations(&self) -> RepositoryResult<AffiliationTable>;
}
