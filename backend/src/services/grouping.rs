//! Per-project aggregation of a queue status run.
//!
//! Reduces the per-MSB hour vectors into the three project-level views used
//! for plotting and tables: hour availability, distinct MSB counts and
//! instrument usage.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::queue_status::QueueStatus;
use crate::models::HourVector;

/// Project-level aggregates keyed by projectid.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueueStatusSummary {
    /// Element-wise sum of the project's MSB hour vectors. Counts MSB-hours,
    /// so several MSBs observable in the same hour all contribute.
    pub hours: BTreeMap<String, HourVector>,
    /// Distinct MSBs observed at least once.
    pub msb_counts: BTreeMap<String, usize>,
    /// Instrument token to number of MSBs using it.
    pub instrument_counts: BTreeMap<String, BTreeMap<String, usize>>,
}

/// Group a queue status run by project.
///
/// Pure function of its input: calling it repeatedly on the same status
/// yields identical summaries.
pub fn group_queue_status(status: &QueueStatus) -> QueueStatusSummary {
    let mut summary = QueueStatusSummary::default();

    for (projectid, msbs) in &status.projects {
        let hours = summary.hours.entry(projectid.clone()).or_default();
        for observation in msbs.values() {
            hours.add(&observation.hours);
        }

        summary.msb_counts.insert(projectid.clone(), msbs.len());

        let instruments = summary
            .instrument_counts
            .entry(projectid.clone())
            .or_default();
        for observation in msbs.values() {
            for token in observation.msb.instruments() {
                *instruments.entry(token).or_insert(0) += 1;
            }
        }
    }

    summary
}
