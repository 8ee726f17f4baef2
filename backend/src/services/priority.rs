//! Project ordering for queue status output.
//!
//! Projects are ranked either by projectid or by the TAG priority of a
//! representative MSB, optionally shifted by the TAG adjustment of the
//! project's primary queue.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use super::error::QueueStatusResult;
use super::queue_status::QueueStatus;
use crate::db::repository::ProjectRepository;
use crate::models::MsbObservation;

/// Ordering applied to the projects of a queue status run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ProjectOrder {
    /// Lexical by projectid.
    #[default]
    #[serde(rename = "projectid")]
    ProjectId,
    /// Representative MSB priority, ascending.
    #[serde(rename = "priority")]
    Priority,
    /// Representative MSB priority plus the primary queue's TAG adjustment.
    #[serde(rename = "adj-priority")]
    AdjustedPriority,
}

impl FromStr for ProjectOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "projectid" => Ok(Self::ProjectId),
            "priority" => Ok(Self::Priority),
            "adj-priority" => Ok(Self::AdjustedPriority),
            other => Err(format!("Unknown project order: {}", other)),
        }
    }
}

impl fmt::Display for ProjectOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::ProjectId => "projectid",
            Self::Priority => "priority",
            Self::AdjustedPriority => "adj-priority",
        };
        f.write_str(name)
    }
}

/// A project with the priorities used to rank it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedProject {
    pub projectid: String,
    /// Priority of the representative MSB.
    pub priority: Option<f64>,
    /// Adjustment added in [`ProjectOrder::AdjustedPriority`] mode, else zero.
    pub adjustment: f64,
}

impl RankedProject {
    pub fn effective_priority(&self) -> Option<f64> {
        self.priority.map(|p| p + self.adjustment)
    }
}

/// The MSB whose priority stands for the whole project: lowest checksum.
pub fn representative_msb(msbs: &BTreeMap<String, MsbObservation>) -> Option<&MsbObservation> {
    msbs.values().next()
}

/// Rank the projects of `status`.
///
/// Ties keep projectid order. Projects without a representative MSB sort
/// last in the priority modes.
///
/// # Errors
/// `Repository` if project queue metadata cannot be read (adjusted mode only).
pub fn rank_projects<R>(
    repo: &R,
    status: &QueueStatus,
    order: ProjectOrder,
) -> QueueStatusResult<Vec<RankedProject>>
where
    R: ProjectRepository + ?Sized,
{
    let mut ranked = Vec::with_capacity(status.projects.len());
    for (projectid, msbs) in &status.projects {
        let priority = representative_msb(msbs).map(|obs| obs.msb.priority);
        let adjustment = match order {
            ProjectOrder::AdjustedPriority => repo
                .get_project_queue(projectid)?
                .map_or(0.0, |queue| queue.primary_adjustment()),
            _ => 0.0,
        };
        ranked.push(RankedProject {
            projectid: projectid.clone(),
            priority,
            adjustment,
        });
    }

    // `status.projects` iterates in projectid order and sort_by is stable.
    if order != ProjectOrder::ProjectId {
        ranked.sort_by(|a, b| {
            let a = a.effective_priority().unwrap_or(f64::INFINITY);
            let b = b.effective_priority().unwrap_or(f64::INFINITY);
            a.total_cmp(&b)
        });
    }

    Ok(ranked)
}

/// Ordered projectids of `status`.
pub fn order_projects<R>(
    repo: &R,
    status: &QueueStatus,
    order: ProjectOrder,
) -> QueueStatusResult<Vec<String>>
where
    R: ProjectRepository + ?Sized,
{
    Ok(rank_projects(repo, status, order)?
        .into_iter()
        .map(|project| project.projectid)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repositories::LocalRepository;
    use crate::models::{Msb, ProjectQueue, TimeWindow};
    use crate::services::queue_status::ProjectMsbs;
    use chrono::{TimeZone, Utc};

    fn msb(projectid: &str, checksum: &str, priority: f64) -> MsbObservation {
        MsbObservation::new(Msb {
            checksum: checksum.to_string(),
            projectid: projectid.to_string(),
            priority,
            instrument: "HARP".to_string(),
            msbid: None,
            title: String::new(),
            remaining: 1,
            time_estimate: 0.0,
        })
    }

    fn status(observations: Vec<MsbObservation>) -> QueueStatus {
        let mut projects = ProjectMsbs::new();
        for obs in observations {
            projects
                .entry(obs.msb.projectid.clone())
                .or_default()
                .insert(obs.msb.checksum.clone(), obs);
        }
        QueueStatus {
            telescope: "JCMT".to_string(),
            window: TimeWindow {
                start: Utc.with_ymd_and_hms(2024, 3, 1, 4, 0, 0).unwrap(),
                end: Utc.with_ymd_and_hms(2024, 3, 1, 16, 0, 0).unwrap(),
            },
            projects,
        }
    }

    fn queue(projectid: &str, queue: &str, adjustment: f64) -> ProjectQueue {
        ProjectQueue {
            projectid: projectid.to_string(),
            primary_queue: queue.to_string(),
            tag_adjustments: BTreeMap::from([(queue.to_string(), adjustment)]),
        }
    }

    #[test]
    fn test_projectid_order_is_lexical() {
        let repo = LocalRepository::new();
        let input = status(vec![
            msb("M22AU01", "a", 1.0),
            msb("M22AU02", "a", 0.5),
            msb("M21BP05", "a", 9.0),
        ]);
        let ordered = order_projects(&repo, &input, ProjectOrder::ProjectId).unwrap();
        assert_eq!(ordered, vec!["M21BP05", "M22AU01", "M22AU02"]);
    }

    #[test]
    fn test_priority_order_ascending() {
        let repo = LocalRepository::new();
        let input = status(vec![msb("A", "x", 10.0), msb("B", "x", 5.0), msb("C", "x", 20.0)]);
        let ordered = order_projects(&repo, &input, ProjectOrder::Priority).unwrap();
        assert_eq!(ordered, vec!["B", "A", "C"]);
    }

    #[test]
    fn test_adjusted_priority_order() {
        let repo = LocalRepository::new();
        repo.set_project_queue(queue("A", "X", 5.0));
        repo.set_project_queue(queue("B", "Y", -5.0));
        let input = status(vec![msb("A", "x", 10.0), msb("B", "x", 10.0)]);

        let ranked = rank_projects(&repo, &input, ProjectOrder::AdjustedPriority).unwrap();
        let ids: Vec<&str> = ranked.iter().map(|p| p.projectid.as_str()).collect();
        assert_eq!(ids, vec!["B", "A"]);
        assert_eq!(ranked[0].effective_priority(), Some(5.0));
        assert_eq!(ranked[1].effective_priority(), Some(15.0));
    }

    #[test]
    fn test_missing_queue_record_means_no_adjustment() {
        let repo = LocalRepository::new();
        repo.set_project_queue(queue("B", "Y", 3.0));
        let input = status(vec![msb("A", "x", 10.0), msb("B", "x", 8.0)]);
        let ordered = order_projects(&repo, &input, ProjectOrder::AdjustedPriority).unwrap();
        // B: 11, A: 10
        assert_eq!(ordered, vec!["A", "B"]);
    }

    #[test]
    fn test_representative_is_lowest_checksum() {
        let repo = LocalRepository::new();
        let input = status(vec![
            msb("A", "zz", 1.0),
            msb("A", "aa", 30.0),
            msb("B", "mm", 20.0),
        ]);
        let ordered = order_projects(&repo, &input, ProjectOrder::Priority).unwrap();
        assert_eq!(ordered, vec!["B", "A"]);
    }

    #[test]
    fn test_ties_keep_projectid_order() {
        let repo = LocalRepository::new();
        let input = status(vec![msb("C", "x", 1.0), msb("A", "x", 1.0), msb("B", "x", 1.0)]);
        let ordered = order_projects(&repo, &input, ProjectOrder::Priority).unwrap();
        assert_eq!(ordered, vec!["A", "B", "C"]);
    }

    #[test]
    fn test_adjusted_mode_propagates_repository_errors() {
        let repo = LocalRepository::new();
        repo.set_healthy(false);
        let input = status(vec![msb("A", "x", 1.0)]);
        assert!(rank_projects(&repo, &input, ProjectOrder::AdjustedPriority).is_err());
        // other modes never consult project metadata
        assert!(rank_projects(&repo, &input, ProjectOrder::Priority).is_ok());
    }

    #[test]
    fn test_order_parse_and_display() {
        for name in ["projectid", "priority", "adj-priority"] {
            let order: ProjectOrder = name.parse().unwrap();
            assert_eq!(order.to_string(), name);
        }
        assert!("tagpriority".parse::<ProjectOrder>().is_err());
    }
}
