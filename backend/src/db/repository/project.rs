//! Project queue metadata used for priority adjustments.

use super::error::RepositoryResult;
use crate::models::ProjectQueue;

/// Repository trait for project queue membership and TAG adjustments.
pub trait ProjectRepository: Send + Sync {
    /// Queue information for a project.
    ///
    /// # Returns
    /// * `Ok(Some(ProjectQueue))` - the project's primary queue and adjustments
    /// * `Ok(None)` - no queue record for the project
    /// * `Err(RepositoryError)` - if the lookup fails
    fn get_project_queue(&self, projectid: &str) -> RepositoryResult<Option<ProjectQueue>>;
}
