use chrono::{DateTime, Duration, DurationRound, Timelike, Utc};
use serde::{Deserialize, Serialize};

/// Number of UT hour slots in a day.
pub const HOURS_PER_DAY: usize = 24;

/// Per-hour hit counter indexed by UT hour of day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct HourVector([u32; HOURS_PER_DAY]);

impl HourVector {
    /// Record one hit for the UT hour of `instant`.
    pub fn record(&mut self, instant: DateTime<Utc>) {
        self.0[instant.hour() as usize] += 1;
    }

    /// Count for a given hour of day. Out of range hours read as zero.
    pub fn get(&self, hour: usize) -> u32 {
        self.0.get(hour).copied().unwrap_or(0)
    }

    /// Element-wise accumulate `other` into `self`.
    pub fn add(&mut self, other: &HourVector) {
        for (slot, value) in self.0.iter_mut().zip(other.0.iter()) {
            *slot += value;
        }
    }

    pub fn total(&self) -> u32 {
        self.0.iter().sum()
    }

    pub fn as_slice(&self) -> &[u32] {
        &self.0
    }
}

/// Inclusive, hour-aligned UT sampling window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeWindow {
    /// Build a window expanded outward to whole hours.
    ///
    /// The start is floored to its hour; an end with non-zero minutes or
    /// seconds is moved up to the next hour.
    pub fn expand_to_hours(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self {
            start: floor_hour(start),
            end: ceil_hour(end),
        }
    }

    /// Sample instants `start, start + 1h, ..., end`.
    pub fn hours(&self) -> impl Iterator<Item = DateTime<Utc>> {
        let end = self.end;
        std::iter::successors(Some(self.start), |h| Some(*h + Duration::hours(1)))
            .take_while(move |h| *h <= end)
    }

    /// Number of sample instants in the window.
    pub fn sample_count(&self) -> usize {
        if self.end < self.start {
            return 0;
        }
        ((self.end - self.start).num_hours() + 1) as usize
    }

    pub fn is_hour_aligned(&self) -> bool {
        is_on_hour(self.start) && is_on_hour(self.end)
    }
}

fn is_on_hour(instant: DateTime<Utc>) -> bool {
    instant.minute() == 0 && instant.second() == 0 && instant.nanosecond() == 0
}

/// Truncate an instant to the start of its hour.
pub fn floor_hour(instant: DateTime<Utc>) -> DateTime<Utc> {
    instant
        .duration_trunc(Duration::hours(1))
        .unwrap_or(instant)
}

/// Round an instant up to the next whole hour, unless already on one.
pub fn ceil_hour(instant: DateTime<Utc>) -> DateTime<Utc> {
    let floored = floor_hour(instant);
    if floored == instant {
        instant
    } else {
        floored + Duration::hours(1)
    }
}

#[cfg(test)]
#[path = "time_tests.rs"]
mod tests;
