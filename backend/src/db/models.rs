//! Storage-side models for the MSB catalog.
//!
//! A catalog is the data behind [`crate::db::repositories::LocalRepository`]:
//! MSBs with the scheduling constraints the evaluator matches against, the
//! affiliation table and project queue records.

use chrono::{DateTime, Timelike, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use super::repository::{ErrorContext, RepositoryError, RepositoryResult};
use crate::models::{AffiliationTable, Msb, MsbQuery, ProjectQueue};

/// Absolute UT interval `[start, end)` during which an MSB is observable.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ObservableWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl ObservableWindow {
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.start <= instant && instant < self.end
    }
}

/// UT hour-of-day range `[start_hour, end_hour)` repeated every day.
///
/// Wraps past midnight when `end_hour <= start_hour`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyWindow {
    pub start_hour: u32,
    pub end_hour: u32,
}

impl DailyWindow {
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        let hour = instant.hour();
        if self.start_hour < self.end_hour {
            hour >= self.start_hour && hour < self.end_hour
        } else {
            hour >= self.start_hour || hour < self.end_hour
        }
    }
}

/// An MSB together with the constraints deciding when it can be observed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogMsb {
    #[serde(flatten)]
    pub msb: Msb,
    pub telescope: String,
    /// Queue code the MSB is scheduled under.
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub semester: Option<String>,
    #[serde(default)]
    pub tau_min: Option<f64>,
    #[serde(default)]
    pub tau_max: Option<f64>,
    /// Absolute observability windows.
    #[serde(default)]
    pub windows: Vec<ObservableWindow>,
    /// Recurring daily observability.
    #[serde(default)]
    pub daily: Option<DailyWindow>,
}

impl CatalogMsb {
    /// Whether this MSB satisfies every constraint of `query`.
    pub fn matches(&self, query: &MsbQuery) -> bool {
        self.msb.remaining > 0
            && self.telescope.eq_ignore_ascii_case(&query.telescope)
            && self.matches_country(&query.country)
            && self.matches_semester(query.semester.as_deref())
            && self.matches_instrument(&query.instrument)
            && self.matches_tau(query.tau)
            && self.is_observable_at(query.date)
    }

    fn matches_country(&self, countries: &[String]) -> bool {
        if countries.is_empty() {
            return true;
        }
        match &self.country {
            Some(country) => countries.iter().any(|c| c.eq_ignore_ascii_case(country)),
            None => false,
        }
    }

    fn matches_semester(&self, semester: Option<&str>) -> bool {
        match (semester, &self.semester) {
            (None, _) => true,
            (Some(wanted), Some(own)) => wanted.eq_ignore_ascii_case(own),
            (Some(_), None) => false,
        }
    }

    fn matches_instrument(&self, instruments: &[String]) -> bool {
        if instruments.is_empty() {
            return true;
        }
        let own = self.msb.instruments();
        instruments
            .iter()
            .any(|wanted| own.iter().any(|token| token.eq_ignore_ascii_case(wanted)))
    }

    fn matches_tau(&self, tau: Option<f64>) -> bool {
        let Some(tau) = tau else {
            return true;
        };
        self.tau_min.map_or(true, |min| tau >= min) && self.tau_max.map_or(true, |max| tau <= max)
    }

    fn constraint_problem(&self) -> Option<String> {
        if let Some(daily) = self.daily {
            if daily.start_hour >= 24 || daily.end_hour >= 24 {
                return Some(format!(
                    "Daily window {}-{} outside UT hours 0-23",
                    daily.start_hour, daily.end_hour
                ));
            }
        }
        if let Some(window) = self.windows.iter().find(|w| w.end <= w.start) {
            return Some(format!(
                "Observable window {} - {} ends before it starts",
                window.start, window.end
            ));
        }
        match (self.tau_min, self.tau_max) {
            (Some(min), Some(max)) if min > max => {
                Some(format!("tau_min {} above tau_max {}", min, max))
            }
            _ => None,
        }
    }

    /// With no windows at all the MSB is always observable.
    fn is_observable_at(&self, instant: DateTime<Utc>) -> bool {
        if self.windows.is_empty() && self.daily.is_none() {
            return true;
        }
        self.windows.iter().any(|w| w.contains(instant))
            || self.daily.is_some_and(|d| d.contains(instant))
    }
}

/// Serialized catalog loaded into the local repository.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MsbCatalog {
    #[serde(default)]
    pub msbs: Vec<CatalogMsb>,
    #[serde(default)]
    pub affiliations: AffiliationTable,
    #[serde(default)]
    pub projects: Vec<ProjectQueue>,
}

impl MsbCatalog {
    /// Load a catalog from a JSON file.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> RepositoryResult<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            RepositoryError::configuration_with_context(
                format!("Failed to read MSB catalog: {}", e),
                ErrorContext::new("load_catalog").with_entity_id(path.display()),
            )
        })?;
        Self::from_json_str(&content)
    }

    pub fn from_json_str(content: &str) -> RepositoryResult<Self> {
        let catalog: Self = serde_json::from_str(content).map_err(|e| {
            RepositoryError::configuration_with_context(
                format!("Failed to parse MSB catalog: {}", e),
                ErrorContext::new("load_catalog").with_entity("catalog"),
            )
        })?;
        catalog.validate()?;
        Ok(catalog)
    }

    /// Reject observability constraints that could never match.
    ///
    /// # Errors
    /// `ValidationError` naming the offending MSB.
    pub fn validate(&self) -> RepositoryResult<()> {
        for entry in &self.msbs {
            if let Some(problem) = entry.constraint_problem() {
                return Err(RepositoryError::validation_with_context(
                    problem,
                    ErrorContext::new("load_catalog")
                        .with_entity("msb")
                        .with_entity_id(entry.msb.key()),
                ));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn ut(h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 2, 10, h, 0, 0).unwrap()
    }

    fn entry() -> CatalogMsb {
        CatalogMsb {
            msb: Msb {
                checksum: "a1".to_string(),
                projectid: "M24AU01".to_string(),
                priority: 3.0,
                instrument: "HARP/RXA3".to_string(),
                msbid: Some(10),
                title: "Orion".to_string(),
                remaining: 2,
                time_estimate: 1800.0,
            },
            telescope: "JCMT".to_string(),
            country: Some("UK".to_string()),
            semester: Some("24A".to_string()),
            tau_min: Some(0.05),
            tau_max: Some(0.12),
            windows: vec![ObservableWindow {
                start: ut(6),
                end: ut(9),
            }],
            daily: None,
        }
    }

    #[test]
    fn test_matches_all_constraints() {
        let mut query = MsbQuery::new("jcmt", ut(7));
        query.country = vec!["uk".to_string(), "CN".to_string()];
        query.semester = Some("24a".to_string());
        query.instrument = vec!["harp".to_string()];
        query.tau = Some(0.08);
        assert!(entry().matches(&query));
    }

    #[test]
    fn test_window_end_is_exclusive() {
        assert!(entry().matches(&MsbQuery::new("JCMT", ut(6))));
        assert!(!entry().matches(&MsbQuery::new("JCMT", ut(9))));
    }

    #[test]
    fn test_rejects_wrong_tau_and_instrument() {
        let mut query = MsbQuery::new("JCMT", ut(7));
        query.tau = Some(0.2);
        assert!(!entry().matches(&query));

        let mut query = MsbQuery::new("JCMT", ut(7));
        query.instrument = vec!["SCUBA-2".to_string()];
        assert!(!entry().matches(&query));
    }

    #[test]
    fn test_completed_msb_never_matches() {
        let mut done = entry();
        done.msb.remaining = 0;
        assert!(!done.matches(&MsbQuery::new("JCMT", ut(7))));
    }

    #[test]
    fn test_country_filter_requires_country() {
        let mut no_country = entry();
        no_country.country = None;
        let mut query = MsbQuery::new("JCMT", ut(7));
        query.country = vec!["UK".to_string()];
        assert!(!no_country.matches(&query));
    }

    #[test]
    fn test_daily_window_wraps_midnight() {
        let daily = DailyWindow {
            start_hour: 22,
            end_hour: 3,
        };
        assert!(daily.contains(ut(23)));
        assert!(daily.contains(ut(0)));
        assert!(!daily.contains(ut(3)));
        assert!(!daily.contains(ut(12)));
    }

    #[test]
    fn test_no_windows_means_always_observable() {
        let mut always = entry();
        always.windows.clear();
        assert!(always.matches(&MsbQuery::new("JCMT", ut(15))));
    }

    #[test]
    fn test_catalog_parse_flattens_msb_fields() {
        let json = r#"{
            "msbs": [{
                "checksum": "c1",
                "projectid": "M24AU01",
                "priority": 1.5,
                "instrument": "SCUBA-2",
                "telescope": "JCMT",
                "daily": {"start_hour": 4, "end_hour": 16}
            }],
            "affiliations": {"M24AU01": {"uk": 1.0}},
            "projects": [{"projectid": "M24AU01", "primary_queue": "UK"}]
        }"#;
        let catalog = MsbCatalog::from_json_str(json).unwrap();
        assert_eq!(catalog.msbs.len(), 1);
        assert_eq!(catalog.msbs[0].msb.checksum, "c1");
        assert!(catalog.affiliations.has_affiliation("M24AU01", "uk"));
        assert_eq!(catalog.projects[0].primary_adjustment(), 0.0);
    }

    #[test]
    fn test_catalog_parse_error_is_configuration_error() {
        let err = MsbCatalog::from_json_str("{not json").unwrap_err();
        assert!(matches!(err, RepositoryError::ConfigurationError { .. }));
    }

    fn catalog_json(daily: &str) -> String {
        format!(
            r#"{{"msbs": [{{"checksum": "c1", "projectid": "M24AU01", "priority": 1.0,
                "instrument": "HARP", "telescope": "JCMT", "daily": {}}}]}}"#,
            daily
        )
    }

    #[test]
    fn test_daily_hour_out_of_range_rejected() {
        let err = MsbCatalog::from_json_str(&catalog_json(r#"{"start_hour": 22, "end_hour": 24}"#))
            .unwrap_err();
        assert!(matches!(err, RepositoryError::ValidationError { .. }));
        assert_eq!(err.context().entity_id.as_deref(), Some("M24AU01/c1"));
    }

    #[test]
    fn test_valid_daily_window_accepted() {
        let catalog =
            MsbCatalog::from_json_str(&catalog_json(r#"{"start_hour": 22, "end_hour": 0}"#)).unwrap();
        assert_eq!(catalog.msbs.len(), 1);
    }

    #[test]
    fn test_inverted_constraints_rejected() {
        let mut inverted = entry();
        inverted.windows[0].end = ut(5);
        let catalog = MsbCatalog {
            msbs: vec![inverted],
            ..Default::default()
        };
        assert!(matches!(
            catalog.validate(),
            Err(RepositoryError::ValidationError { .. })
        ));

        let mut tau = entry();
        tau.tau_min = Some(0.2);
        let catalog = MsbCatalog {
            msbs: vec![tau],
            ..Default::default()
        };
        assert!(catalog.validate().is_err());
    }
}
