//! Presentation-ready queue status report.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::error::QueueStatusResult;
use super::grouping::{group_queue_status, QueueStatusSummary};
use super::priority::{rank_projects, ProjectOrder};
use super::queue_status::QueueStatus;
use crate::db::repository::ProjectRepository;
use crate::models::{HourVector, MsbObservation};

/// One project row of a [`QueueStatusReport`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectStatus {
    pub projectid: String,
    /// Priority of the representative MSB.
    pub priority: Option<f64>,
    pub adjustment: f64,
    /// Key the project was ranked by in the priority modes.
    pub effective_priority: Option<f64>,
    pub hours: HourVector,
    pub msb_count: usize,
    pub instruments: BTreeMap<String, usize>,
    /// MSBs ordered by checksum.
    pub msbs: Vec<MsbObservation>,
}

/// Ordered queue status with per-project aggregates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueueStatusReport {
    pub telescope: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub sample_count: usize,
    pub order: ProjectOrder,
    pub projects: Vec<ProjectStatus>,
}

/// Combine grouping and ordering of `status` into a report.
pub fn build_report<R>(
    repo: &R,
    status: &QueueStatus,
    order: ProjectOrder,
) -> QueueStatusResult<QueueStatusReport>
where
    R: ProjectRepository + ?Sized,
{
    let QueueStatusSummary {
        mut hours,
        mut msb_counts,
        mut instrument_counts,
    } = group_queue_status(status);

    let projects = rank_projects(repo, status, order)?
        .into_iter()
        .map(|ranked| {
            let effective_priority = ranked.effective_priority();
            let id = ranked.projectid;
            ProjectStatus {
                effective_priority,
                hours: hours.remove(&id).unwrap_or_default(),
                msb_count: msb_counts.remove(&id).unwrap_or_default(),
                instruments: instrument_counts.remove(&id).unwrap_or_default(),
                msbs: status
                    .projects
                    .get(&id)
                    .map(|msbs| msbs.values().cloned().collect())
                    .unwrap_or_default(),
                priority: ranked.priority,
                adjustment: ranked.adjustment,
                projectid: id,
            }
        })
        .collect();

    Ok(QueueStatusReport {
        telescope: status.telescope.clone(),
        start: status.window.start,
        end: status.window.end,
        sample_count: status.window.sample_count(),
        order,
        projects,
    })
}
