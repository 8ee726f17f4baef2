//! Data Transfer Objects for the HTTP API.
//!
//! Report types from the service layer already derive Serialize and are
//! re-exported here. List-valued query parameters arrive comma separated.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

pub use crate::services::{ProjectStatus, QueueStatusReport, QueueStatusSummary};
use crate::models::WeatherBand;
use crate::services::{ProjectOrder, QueueStatusRequest};

use super::error::AppError;

/// Query parameters shared by the queue status endpoints.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QueueStatusQuery {
    #[serde(default)]
    pub telescope: Option<String>,
    /// UT date, `YYYY-MM-DD`
    #[serde(default)]
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub full_day: Option<bool>,
    /// Comma-separated country codes
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub semester: Option<String>,
    /// Comma-separated instrument names
    #[serde(default)]
    pub instrument: Option<String>,
    /// Weather band 1-5
    #[serde(default)]
    pub band: Option<u8>,
    #[serde(default)]
    pub tau: Option<f64>,
    #[serde(default)]
    pub affiliation: Option<String>,
    /// `projectid`, `priority` or `adj-priority`
    #[serde(default)]
    pub order: Option<String>,
}

impl QueueStatusQuery {
    /// Validate the raw parameters and build the service request.
    pub fn into_request(self) -> Result<(QueueStatusRequest, ProjectOrder), AppError> {
        let band = self
            .band
            .map(WeatherBand::try_from)
            .transpose()
            .map_err(AppError::BadRequest)?;
        let order = self
            .order
            .as_deref()
            .map(str::parse::<ProjectOrder>)
            .transpose()
            .map_err(AppError::BadRequest)?
            .unwrap_or_default();
        if let Some(tau) = self.tau {
            if !tau.is_finite() || tau < 0.0 {
                return Err(AppError::BadRequest(format!("Invalid tau: {}", tau)));
            }
        }

        let request = QueueStatusRequest {
            telescope: self.telescope,
            date: self.date,
            full_day: self.full_day.unwrap_or(false),
            country: split_list(self.country.as_deref()),
            semester: self.semester.filter(|s| !s.trim().is_empty()),
            instrument: split_list(self.instrument.as_deref()),
            tau: self.tau,
            band,
            affiliation: self.affiliation.filter(|a| !a.trim().is_empty()),
        };
        Ok((request, order))
    }
}

fn split_list(value: Option<&str>) -> Vec<String> {
    value
        .map(|v| {
            v.split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub database: String,
}

/// Grouped view of a queue status run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryResponse {
    pub telescope: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub sample_count: usize,
    /// Project ids in the requested order
    pub order: Vec<String>,
    #[serde(flatten)]
    pub summary: QueueStatusSummary,
}
