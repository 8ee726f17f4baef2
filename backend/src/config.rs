//! Configuration file support.
//!
//! Reads `qstatus.toml`: which repository backend to use, the affiliation
//! codes the queue status engine accepts, and each telescope's nightly
//! observing window in UT.
//!
//! ```toml
//! [repository]
//! type = "local"
//! catalog = "data/catalog.json"
//!
//! [queue_status]
//! affiliations = ["ca", "cn", "uk"]
//!
//! [sites.JCMT]
//! night_start = "03:30"
//! night_end = "16:30"
//! ```

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Timelike, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::db::factory::RepositoryType;
use crate::db::repository::{ErrorContext, RepositoryError};
use crate::models::HOURS_PER_DAY;

/// Environment variable naming an explicit configuration file.
pub const CONFIG_ENV_VAR: &str = "QSTATUS_CONFIG";

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub repository: RepositorySettings,
    #[serde(default)]
    pub queue_status: QueueStatusConfig,
    #[serde(default)]
    pub sites: SiteConfig,
}

/// Repository type settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepositorySettings {
    #[serde(rename = "type", default = "default_repo_type")]
    pub repo_type: String,
    /// JSON catalog loaded into the local repository.
    #[serde(default)]
    pub catalog: Option<PathBuf>,
}

impl Default for RepositorySettings {
    fn default() -> Self {
        Self {
            repo_type: default_repo_type(),
            catalog: None,
        }
    }
}

fn default_repo_type() -> String {
    "local".to_string()
}

/// Settings consumed by the queue status engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueueStatusConfig {
    /// Affiliation codes accepted as a filter.
    #[serde(default = "default_affiliations")]
    pub affiliations: Vec<String>,
}

impl Default for QueueStatusConfig {
    fn default() -> Self {
        Self {
            affiliations: default_affiliations(),
        }
    }
}

fn default_affiliations() -> Vec<String> {
    ["ca", "cn", "ea", "id", "in", "jp", "kr", "my", "th", "tw", "uk", "vn"]
        .iter()
        .map(|code| code.to_string())
        .collect()
}

impl QueueStatusConfig {
    pub fn is_known_affiliation(&self, code: &str) -> bool {
        self.affiliations.iter().any(|known| known == code)
    }
}

/// Nightly observing window of a telescope, as UT times of day.
///
/// An end time before the start time means the night runs into the
/// following UT day. Windows are validated on construction: start and end
/// must differ and, once widened to whole hours, the night may sample at
/// most [`HOURS_PER_DAY`] hours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawObservingWindow", into = "RawObservingWindow")]
pub struct ObservingWindow {
    night_start: NaiveTime,
    night_end: NaiveTime,
}

#[derive(Serialize, Deserialize)]
struct RawObservingWindow {
    #[serde(serialize_with = "serialize_ut_time", deserialize_with = "deserialize_ut_time")]
    night_start: NaiveTime,
    #[serde(serialize_with = "serialize_ut_time", deserialize_with = "deserialize_ut_time")]
    night_end: NaiveTime,
}

impl TryFrom<RawObservingWindow> for ObservingWindow {
    type Error = RepositoryError;

    fn try_from(raw: RawObservingWindow) -> Result<Self, Self::Error> {
        Self::new(raw.night_start, raw.night_end)
    }
}

impl From<ObservingWindow> for RawObservingWindow {
    fn from(window: ObservingWindow) -> Self {
        Self {
            night_start: window.night_start,
            night_end: window.night_end,
        }
    }
}

impl ObservingWindow {
    /// # Errors
    /// `ConfigurationError` for an empty window or one sampling more than a day.
    pub fn new(night_start: NaiveTime, night_end: NaiveTime) -> Result<Self, RepositoryError> {
        let window = Self {
            night_start,
            night_end,
        };
        let context = || {
            ErrorContext::new("observing_window").with_details(format!(
                "{}-{}",
                night_start.format("%H:%M:%S"),
                night_end.format("%H:%M:%S")
            ))
        };
        if night_start == night_end {
            return Err(RepositoryError::configuration_with_context(
                "Observing window starts and ends at the same time",
                context(),
            ));
        }
        if window.sample_count() > HOURS_PER_DAY {
            return Err(RepositoryError::configuration_with_context(
                format!(
                    "Observing window spans {} hours, more than one day",
                    window.sample_count()
                ),
                context(),
            ));
        }
        Ok(window)
    }

    pub fn night_start(&self) -> NaiveTime {
        self.night_start
    }

    pub fn night_end(&self) -> NaiveTime {
        self.night_end
    }

    pub fn crosses_midnight(&self) -> bool {
        self.night_end < self.night_start
    }

    /// Hour starts sampled once the window is widened to whole hours.
    pub fn sample_count(&self) -> usize {
        let start_hour = self.night_start.hour() as usize;
        let mut end_secs = self.night_end.num_seconds_from_midnight() as usize;
        if self.crosses_midnight() {
            end_secs += 24 * 3600;
        }
        let on_hour = end_secs % 3600 == 0 && self.night_end.nanosecond() == 0;
        let end_hour = end_secs / 3600 + usize::from(!on_hour);
        end_hour - start_hour + 1
    }

    /// Absolute instants of the night starting on UT `date`.
    pub fn resolve(&self, date: NaiveDate) -> (DateTime<Utc>, DateTime<Utc>) {
        let start = date.and_time(self.night_start).and_utc();
        let mut end = date.and_time(self.night_end).and_utc();
        if self.crosses_midnight() {
            end += Duration::days(1);
        }
        (start, end)
    }
}

fn parse_ut_time(value: &str) -> Result<NaiveTime, String> {
    NaiveTime::parse_from_str(value, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M"))
        .map_err(|_| format!("Invalid UT time '{}', expected HH:MM or HH:MM:SS", value))
}

fn deserialize_ut_time<'de, D>(deserializer: D) -> Result<NaiveTime, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_ut_time(&raw).map_err(serde::de::Error::custom)
}

fn serialize_ut_time<S>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&time.format("%H:%M").to_string())
}

/// Observing windows keyed by upper-case telescope name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    from = "BTreeMap<String, ObservingWindow>",
    into = "BTreeMap<String, ObservingWindow>"
)]
pub struct SiteConfig {
    telescopes: BTreeMap<String, ObservingWindow>,
}

impl From<BTreeMap<String, ObservingWindow>> for SiteConfig {
    fn from(windows: BTreeMap<String, ObservingWindow>) -> Self {
        Self {
            telescopes: windows
                .into_iter()
                .map(|(name, window)| (name.to_uppercase(), window))
                .collect(),
        }
    }
}

impl From<SiteConfig> for BTreeMap<String, ObservingWindow> {
    fn from(sites: SiteConfig) -> Self {
        sites.telescopes
    }
}

fn ut_window(start: (u32, u32), end: (u32, u32)) -> ObservingWindow {
    let time = |(hour, minute)| NaiveTime::from_hms_opt(hour, minute, 0).unwrap_or_default();
    ObservingWindow {
        night_start: time(start),
        night_end: time(end),
    }
}

impl Default for SiteConfig {
    /// JCMT and UKIRT on Maunakea, HST = UT - 10.
    fn default() -> Self {
        let mut sites = Self::empty();
        sites.insert("JCMT", ut_window((3, 30), (16, 30)));
        sites.insert("UKIRT", ut_window((4, 0), (16, 0)));
        sites
    }
}

impl SiteConfig {
    pub fn empty() -> Self {
        Self {
            telescopes: BTreeMap::new(),
        }
    }

    pub fn insert(&mut self, telescope: &str, window: ObservingWindow) {
        self.telescopes.insert(telescope.to_uppercase(), window);
    }

    pub fn window(&self, telescope: &str) -> Option<&ObservingWindow> {
        self.telescopes.get(&telescope.to_uppercase())
    }

    pub fn telescopes(&self) -> impl Iterator<Item = &str> {
        self.telescopes.keys().map(String::as_str)
    }

    /// Start and end instants of the night beginning on UT `date`.
    ///
    /// # Errors
    /// `ConfigurationError` when the telescope has no configured window.
    pub fn nightly_observing_window(
        &self,
        telescope: &str,
        date: NaiveDate,
    ) -> Result<(DateTime<Utc>, DateTime<Utc>), RepositoryError> {
        self.window(telescope)
            .map(|window| window.resolve(date))
            .ok_or_else(|| {
                RepositoryError::configuration_with_context(
                    format!("No observing window configured for telescope {}", telescope),
                    ErrorContext::new("nightly_observing_window")
                        .with_entity("telescope")
                        .with_entity_id(telescope),
                )
            })
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, RepositoryError> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| {
            RepositoryError::configuration(format!("Failed to read config file: {}", e))
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, RepositoryError> {
        let config: AppConfig = toml::from_str(content).map_err(|e| {
            RepositoryError::configuration(format!("Failed to parse config file: {}", e))
        })?;
        config.repository_type()?;
        Ok(config)
    }

    /// Load configuration from the default location.
    ///
    /// Searches for `qstatus.toml` in:
    /// 1. Current directory
    /// 2. `backend/` directory
    /// 3. Parent directory
    pub fn from_default_location() -> Result<Self, RepositoryError> {
        let search_paths = [
            PathBuf::from("qstatus.toml"),
            PathBuf::from("backend/qstatus.toml"),
            PathBuf::from("../qstatus.toml"),
        ];

        for path in search_paths {
            if path.exists() {
                return Self::from_file(&path);
            }
        }

        Err(RepositoryError::configuration(
            "No qstatus.toml found in standard locations",
        ))
    }

    /// Load from `QSTATUS_CONFIG`, then the default locations, then built-in
    /// defaults.
    pub fn load() -> Result<Self, RepositoryError> {
        if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
            log::info!("Loading configuration from {}", path);
            return Self::from_file(path);
        }
        match Self::from_default_location() {
            Ok(config) => Ok(config),
            Err(e) => {
                log::warn!("{}; using built-in defaults", e);
                Ok(Self::default())
            }
        }
    }

    /// Get the repository type from configuration.
    pub fn repository_type(&self) -> Result<RepositoryType, RepositoryError> {
        RepositoryType::from_str(&self.repository.repo_type).map_err(|e| {
            RepositoryError::configuration(format!("Invalid repository type: {}", e))
        })
    }
}
