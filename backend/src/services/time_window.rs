//! Sampling window for a queue status run.
//!
//! Turns a telescope and UT date into the hour-aligned [`TimeWindow`] whose
//! hours are probed one by one.

use chrono::{Duration, NaiveDate};

use super::error::{QueueStatusError, QueueStatusResult};
use crate::config::SiteConfig;
use crate::models::{TimeWindow, HOURS_PER_DAY};

/// Resolve the sampling window for `telescope` on UT `date`.
///
/// With `full_day` the window covers the 24 hour starts of the date
/// (`00:00` to `23:00`). Otherwise the telescope's nightly observing window
/// is looked up in `sites` and expanded outward to whole hours. Site windows
/// are validated when configured, so the result never samples more than 24
/// hours.
///
/// # Errors
/// `Configuration` when the telescope is missing or has no configured
/// window.
pub fn resolve_window(
    sites: &SiteConfig,
    telescope: Option<&str>,
    date: NaiveDate,
    full_day: bool,
) -> QueueStatusResult<TimeWindow> {
    let telescope = telescope
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| QueueStatusError::Configuration("Telescope not specified".to_string()))?;

    if full_day {
        let start = date
            .and_hms_opt(0, 0, 0)
            .ok_or_else(|| QueueStatusError::Configuration(format!("Invalid date {}", date)))?
            .and_utc();
        return Ok(TimeWindow {
            start,
            end: start + Duration::hours(HOURS_PER_DAY as i64 - 1),
        });
    }

    let (start, end) = sites.nightly_observing_window(telescope, date)?;
    Ok(TimeWindow::expand_to_hours(start, end))
}
