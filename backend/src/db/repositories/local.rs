//! In-memory local repository implementation.
//!
//! Evaluates MSB queries against an [`MsbCatalog`] held in memory. Suitable
//! for unit testing and local development: fast, deterministic and isolated.

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::db::models::{CatalogMsb, MsbCatalog};
use crate::db::repository::*;
use crate::models::{AffiliationTable, Msb, MsbQuery, ProjectQueue};

/// In-memory local repository.
///
/// Besides serving queries it counts how often the evaluator and the
/// affiliation table were hit, and can be told to fail, so tests can observe
/// how the queue status engine drives its collaborators.
///
/// # Example
/// ```
/// use omp_qstatus::db::repositories::LocalRepository;
/// use omp_qstatus::db::repository::MsbRepository;
///
/// let repo = LocalRepository::new();
/// assert!(repo.health_check().unwrap());
/// ```
#[derive(Clone)]
pub struct LocalRepository {
    data: Arc<RwLock<LocalData>>,
    msb_queries: Arc<AtomicUsize>,
    affiliation_fetches: Arc<AtomicUsize>,
}

struct LocalData {
    msbs: Vec<CatalogMsb>,
    affiliations: AffiliationTable,
    projects: HashMap<String, ProjectQueue>,

    // Failure injection
    failing_instant: Option<DateTime<Utc>>,
    is_healthy: bool,
}

impl Default for LocalData {
    fn default() -> Self {
        Self {
            msbs: Vec::new(),
            affiliations: AffiliationTable::new(),
            projects: HashMap::new(),
            failing_instant: None,
            is_healthy: true,
        }
    }
}

impl LocalRepository {
    /// Create a new empty local repository.
    pub fn new() -> Self {
        Self {
            data: Arc::new(RwLock::new(LocalData::default())),
            msb_queries: Arc::new(AtomicUsize::new(0)),
            affiliation_fetches: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Create a repository pre-populated from a catalog.
    pub fn from_catalog(catalog: MsbCatalog) -> Self {
        let repo = Self::new();
        repo.load_catalog(catalog);
        repo
    }

    /// Create a repository from a JSON catalog file.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> RepositoryResult<Self> {
        let catalog = MsbCatalog::from_json_file(path)?;
        log::info!(
            "Loaded MSB catalog: {} MSBs, {} project queues",
            catalog.msbs.len(),
            catalog.projects.len()
        );
        Ok(Self::from_catalog(catalog))
    }

    /// Add every entry of `catalog` to the repository.
    pub fn load_catalog(&self, catalog: MsbCatalog) {
        let mut data = self.data.write();
        data.msbs.extend(catalog.msbs);
        data.affiliations.extend(catalog.affiliations);
        for project in catalog.projects {
            data.projects.insert(project.projectid.clone(), project);
        }
    }

    /// Add a single MSB with its constraints.
    pub fn add_msb(&self, entry: CatalogMsb) {
        self.data.write().msbs.push(entry);
    }

    /// Record an affiliation fraction for a project.
    pub fn add_affiliation(&self, projectid: &str, affiliation: &str, fraction: f64) {
        self.data
            .write()
            .affiliations
            .insert(projectid, affiliation, fraction);
    }

    /// Add or replace the queue record of a project.
    pub fn set_project_queue(&self, queue: ProjectQueue) {
        self.data
            .write()
            .projects
            .insert(queue.projectid.clone(), queue);
    }

    /// Make queries evaluated at `instant` fail with a query error.
    pub fn fail_queries_at(&self, instant: DateTime<Utc>) {
        self.data.write().failing_instant = Some(instant);
    }

    /// Set the health status for testing connection failures.
    pub fn set_healthy(&self, healthy: bool) {
        self.data.write().is_healthy = healthy;
    }

    /// Number of MSB queries evaluated so far.
    pub fn msb_query_count(&self) -> usize {
        self.msb_queries.load(Ordering::SeqCst)
    }

    /// Number of affiliation table fetches so far.
    pub fn affiliation_fetch_count(&self) -> usize {
        self.affiliation_fetches.load(Ordering::SeqCst)
    }

    pub fn msb_count(&self) -> usize {
        self.data.read().msbs.len()
    }

    /// Clear all data from the repository.
    pub fn clear(&self) {
        let mut data = self.data.write();
        let is_healthy = data.is_healthy;
        *data = LocalData {
            is_healthy,
            ..Default::default()
        };
    }

    /// Helper to check health and return error if unhealthy.
    fn check_health(&self) -> RepositoryResult<()> {
        if !self.data.read().is_healthy {
            return Err(RepositoryError::connection("Database is not healthy"));
        }
        Ok(())
    }
}

impl Default for LocalRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl MsbRepository for LocalRepository {
    fn health_check(&self) -> RepositoryResult<bool> {
        Ok(self.data.read().is_healthy)
    }

    fn query_msbs(&self, query: &MsbQuery) -> RepositoryResult<Vec<Msb>> {
        self.msb_queries.fetch_add(1, Ordering::SeqCst);
        self.check_health()
            .map_err(|e| e.with_operation("query_msbs"))?;

        let data = self.data.read();
        if data.failing_instant == Some(query.date) {
            return Err(RepositoryError::query_with_context(
                "MSB query failed",
                ErrorContext::new("query_msbs")
                    .with_entity("msb")
                    .with_details(format!("date={}", query.date)),
            ));
        }

        Ok(data
            .msbs
            .iter()
            .filter(|entry| entry.matches(query))
            .map(|entry| entry.msb.clone())
            .collect())
    }
}

impl AffiliationRepository for LocalRepository {
    fn get_all_affiliations(&self) -> RepositoryResult<AffiliationTable> {
        self.affiliation_fetches.fetch_add(1, Ordering::SeqCst);
        self.check_health()
            .map_err(|e| e.with_operation("get_all_affiliations"))?;
        Ok(self.data.read().affiliations.clone())
    }
}

impl ProjectRepository for LocalRepository {
    fn get_project_queue(&self, projectid: &str) -> RepositoryResult<Option<ProjectQueue>> {
        self.check_health()
            .map_err(|e| e.with_operation("get_project_queue"))?;
        Ok(self.data.read().projects.get(projectid).cloned())
    }
}
