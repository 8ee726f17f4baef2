//! MSB (Minimum Schedulable Block) types returned by the query evaluator.
//!
//! An [`Msb`] is produced fresh by every query. The same logical block shows up
//! again in later hourly queries as a new value, so identity is carried by
//! [`MsbKey`] rather than by the value itself.

use serde::{Deserialize, Serialize};

use super::time::HourVector;

/// One schedulable block as answered by the MSB query evaluator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Msb {
    /// Content checksum, unique within a project only.
    pub checksum: String,
    /// Owning project identifier (e.g. `M22AU01`).
    pub projectid: String,
    /// TAG priority. Lower values are scheduled first.
    pub priority: f64,
    /// Slash-separated instrument names (e.g. `HARP/SCUBA-2`).
    pub instrument: String,
    #[serde(default)]
    pub msbid: Option<i64>,
    #[serde(default)]
    pub title: String,
    /// Number of repeats still to be observed.
    #[serde(default = "default_remaining")]
    pub remaining: i32,
    /// Estimated duration of one repeat, in seconds.
    #[serde(default)]
    pub time_estimate: f64,
}

fn default_remaining() -> i32 {
    1
}

impl Msb {
    /// Composite identity of this block.
    pub fn key(&self) -> MsbKey {
        MsbKey::new(&self.projectid, &self.checksum)
    }

    /// Instrument tokens from the slash-separated instrument field.
    ///
    /// Tokens are trimmed and upper-cased; empty tokens are dropped.
    pub fn instruments(&self) -> Vec<String> {
        self.instrument
            .split('/')
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .map(str::to_uppercase)
            .collect()
    }
}

/// `(projectid, checksum)` identity of a logical MSB.
///
/// Checksums may repeat across projects, never within one.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MsbKey {
    pub projectid: String,
    pub checksum: String,
}

impl MsbKey {
    pub fn new(projectid: impl Into<String>, checksum: impl Into<String>) -> Self {
        Self {
            projectid: projectid.into(),
            checksum: checksum.into(),
        }
    }
}

impl std::fmt::Display for MsbKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.projectid, self.checksum)
    }
}

/// A logical MSB observed during a queue-status run.
///
/// Holds the first instance seen as representative, together with the
/// number of times the block was observable in each UT hour of the day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MsbObservation {
    pub msb: Msb,
    pub hours: HourVector,
}

impl MsbObservation {
    pub fn new(msb: Msb) -> Self {
        Self {
            msb,
            hours: HourVector::default(),
        }
    }

    /// Total number of hourly hits recorded for this block.
    pub fn total_hits(&self) -> u32 {
        self.hours.total()
    }
}
