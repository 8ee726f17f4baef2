//! MSB query evaluator trait.
//!
//! Answers "which MSBs satisfy these constraints at this instant". The queue
//! status engine calls it once per sampled hour.

use super::error::RepositoryResult;
use crate::models::{Msb, MsbQuery};

/// Repository trait for evaluating MSB queries.
///
/// # Thread Safety
/// Implementations must be `Send + Sync` so a single instance can serve
/// concurrent HTTP requests.
pub trait MsbRepository: Send + Sync {
    /// Check if the backing store is reachable.
    ///
    /// # Returns
    /// - `Ok(true)` if the store is healthy
    /// - `Ok(false)` if it is unhealthy but no error occurred
    /// - `Err(RepositoryError)` if the check itself failed
    fn health_check(&self) -> RepositoryResult<bool>;

    /// Evaluate `query` and return every MSB observable at `query.date`.
    ///
    /// Repeated calls with the same query may return new values for the same
    /// logical MSB; callers identify blocks by [`crate::models::MsbKey`].
    ///
    /// # Errors
    /// Any failure of the underlying store.
    fn query_msbs(&self, query: &MsbQuery) -> RepositoryResult<Vec<Msb>>;
}
