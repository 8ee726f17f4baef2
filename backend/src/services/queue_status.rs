//! Queue status accumulation.
//!
//! Probes the MSB query evaluator once per UT hour over a night and records,
//! for every logical MSB, in which hours it was observable. This is the
//! hour-by-hour reconstruction of the observing queue that grouping,
//! ordering and reporting work from.
//!
//! ## Algorithm
//! 1. Resolve the sampling window ([`resolve_window`]).
//! 2. Validate the affiliation filter, then load the affiliation table once.
//! 3. For each sampled hour, query the evaluator with the fixed filters and
//!    `date = hour`, drop MSBs outside the affiliation, and merge each MSB
//!    into its `(projectid, checksum)` record.
//!
//! Any evaluator failure aborts the whole run.

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

use super::error::{QueueStatusError, QueueStatusResult};
use super::time_window::resolve_window;
use crate::config::{QueueStatusConfig, SiteConfig};
use crate::db::repository::{AffiliationRepository, MsbRepository};
use crate::models::{AffiliationTable, MsbKey, MsbObservation, MsbQuery, TimeWindow, WeatherBand};

/// Logical MSBs keyed by projectid, then checksum.
pub type ProjectMsbs = BTreeMap<String, BTreeMap<String, MsbObservation>>;

/// Filters for one queue status run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueueStatusRequest {
    pub telescope: Option<String>,
    /// UT date; today when absent.
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub full_day: bool,
    #[serde(default)]
    pub country: Vec<String>,
    pub semester: Option<String>,
    #[serde(default)]
    pub instrument: Vec<String>,
    /// Explicit tau. Takes precedence over `band`.
    pub tau: Option<f64>,
    pub band: Option<WeatherBand>,
    pub affiliation: Option<String>,
}

impl QueueStatusRequest {
    pub fn new(telescope: impl Into<String>) -> Self {
        Self {
            telescope: Some(telescope.into()),
            ..Default::default()
        }
    }

    pub fn on_date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    pub fn full_day(mut self) -> Self {
        self.full_day = true;
        self
    }

    pub fn with_country(mut self, country: impl Into<String>) -> Self {
        self.country.push(country.into());
        self
    }

    pub fn with_semester(mut self, semester: impl Into<String>) -> Self {
        self.semester = Some(semester.into());
        self
    }

    pub fn with_instrument(mut self, instrument: impl Into<String>) -> Self {
        self.instrument.push(instrument.into());
        self
    }

    pub fn with_tau(mut self, tau: f64) -> Self {
        self.tau = Some(tau);
        self
    }

    pub fn with_band(mut self, band: WeatherBand) -> Self {
        self.band = Some(band);
        self
    }

    pub fn with_affiliation(mut self, affiliation: impl Into<String>) -> Self {
        self.affiliation = Some(affiliation.into());
        self
    }

    /// Tau handed to the evaluator.
    pub fn effective_tau(&self) -> Option<f64> {
        self.tau.or_else(|| self.band.map(WeatherBand::tau_midpoint))
    }
}

/// Result of a queue status run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueueStatus {
    pub telescope: String,
    pub window: TimeWindow,
    pub projects: ProjectMsbs,
}

impl QueueStatus {
    pub fn is_empty(&self) -> bool {
        self.projects.is_empty()
    }

    pub fn project_ids(&self) -> impl Iterator<Item = &str> {
        self.projects.keys().map(String::as_str)
    }

    /// Number of logical MSBs across all projects.
    pub fn msb_count(&self) -> usize {
        self.projects.values().map(BTreeMap::len).sum()
    }

    pub fn observation(&self, key: &MsbKey) -> Option<&MsbObservation> {
        self.projects
            .get(&key.projectid)
            .and_then(|msbs| msbs.get(&key.checksum))
    }
}

/// Reconstruct hour by hour which MSBs are observable over a night.
///
/// # Arguments
/// * `repo` - MSB query evaluator and affiliation table
/// * `sites` - Nightly observing windows per telescope
/// * `config` - Known affiliation codes
/// * `request` - Filters for this run
///
/// # Errors
/// * `Configuration` - telescope missing or no observing window
/// * `Validation` - unknown affiliation code, raised before any query runs
/// * `Evaluator` - the evaluator failed for some hour
/// * `Repository` - the affiliation table could not be loaded
pub fn query_queue_status<R>(
    repo: &R,
    sites: &SiteConfig,
    config: &QueueStatusConfig,
    request: &QueueStatusRequest,
) -> QueueStatusResult<QueueStatus>
where
    R: MsbRepository + AffiliationRepository + ?Sized,
{
    let date = request.date.unwrap_or_else(|| Utc::now().date_naive());
    let window = resolve_window(sites, request.telescope.as_deref(), date, request.full_day)?;
    // resolve_window has already rejected a missing telescope
    let telescope = request.telescope.as_deref().unwrap_or_default().trim().to_string();

    let affiliation = match request.affiliation.as_deref() {
        Some(code) => {
            if !config.is_known_affiliation(code) {
                return Err(QueueStatusError::Validation(format!(
                    "Unknown affiliation '{}'",
                    code
                )));
            }
            let table = repo.get_all_affiliations()?;
            if table.is_empty() {
                log::warn!("Affiliation table is empty; no project matches '{}'", code);
            }
            Some(AffiliationFilter { code, table })
        }
        None => None,
    };

    let base = MsbQuery {
        telescope: telescope.clone(),
        date: window.start,
        country: request.country.clone(),
        semester: request.semester.clone(),
        instrument: request.instrument.clone(),
        tau: request.effective_tau(),
    };

    log::info!(
        "Queue status for {} from {} to {} ({} hours)",
        telescope,
        window.start,
        window.end,
        window.sample_count()
    );

    let mut projects = ProjectMsbs::new();
    for hour in window.hours() {
        let msbs = repo
            .query_msbs(&base.at(hour))
            .map_err(|source| QueueStatusError::Evaluator { hour, source })?;

        let mut seen_this_hour: HashSet<MsbKey> = HashSet::new();
        for msb in msbs {
            if let Some(filter) = &affiliation {
                if !filter.admits(&msb.projectid) {
                    continue;
                }
            }
            if !seen_this_hour.insert(msb.key()) {
                continue;
            }

            let observation = projects
                .entry(msb.projectid.clone())
                .or_default()
                .entry(msb.checksum.clone())
                .or_insert_with(|| MsbObservation::new(msb));
            observation.hours.record(hour);
        }

        log::debug!("{}: {} observable MSBs", hour, seen_this_hour.len());
    }

    let status = QueueStatus {
        telescope,
        window,
        projects,
    };
    log::info!(
        "Queue status found {} MSBs in {} projects",
        status.msb_count(),
        status.projects.len()
    );
    Ok(status)
}

struct AffiliationFilter<'a> {
    code: &'a str,
    table: AffiliationTable,
}

impl AffiliationFilter<'_> {
    fn admits(&self, projectid: &str) -> bool {
        self.table.has_affiliation(projectid, self.code)
    }
}
