//! Constraint set handed to the MSB query evaluator.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Constraints for a single "what is observable at this instant" query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MsbQuery {
    pub telescope: String,
    pub date: DateTime<Utc>,
    /// Queue codes; empty means any queue.
    #[serde(default)]
    pub country: Vec<String>,
    #[serde(default)]
    pub semester: Option<String>,
    /// Instrument tokens; empty means any instrument.
    #[serde(default)]
    pub instrument: Vec<String>,
    /// Site quality as a tau value.
    #[serde(default)]
    pub tau: Option<f64>,
}

impl MsbQuery {
    pub fn new(telescope: impl Into<String>, date: DateTime<Utc>) -> Self {
        Self {
            telescope: telescope.into(),
            date,
            country: Vec::new(),
            semester: None,
            instrument: Vec::new(),
            tau: None,
        }
    }

    /// Same constraints evaluated at another instant.
    pub fn at(&self, date: DateTime<Utc>) -> Self {
        Self {
            date,
            ..self.clone()
        }
    }
}

/// JCMT-style weather band, mapped onto a 225 GHz tau range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum WeatherBand {
    Band1,
    Band2,
    Band3,
    Band4,
    Band5,
}

impl WeatherBand {
    pub const ALL: [WeatherBand; 5] = [
        WeatherBand::Band1,
        WeatherBand::Band2,
        WeatherBand::Band3,
        WeatherBand::Band4,
        WeatherBand::Band5,
    ];

    pub fn number(self) -> u8 {
        match self {
            WeatherBand::Band1 => 1,
            WeatherBand::Band2 => 2,
            WeatherBand::Band3 => 3,
            WeatherBand::Band4 => 4,
            WeatherBand::Band5 => 5,
        }
    }

    /// Inclusive tau range covered by the band.
    pub fn tau_range(self) -> (f64, f64) {
        match self {
            WeatherBand::Band1 => (0.0, 0.05),
            WeatherBand::Band2 => (0.05, 0.08),
            WeatherBand::Band3 => (0.08, 0.12),
            WeatherBand::Band4 => (0.12, 0.20),
            WeatherBand::Band5 => (0.20, 100.0),
        }
    }

    /// Tau used to represent the band in a query.
    pub fn tau_midpoint(self) -> f64 {
        let (min, max) = self.tau_range();
        (min + max) / 2.0
    }
}

impl TryFrom<u8> for WeatherBand {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(WeatherBand::Band1),
            2 => Ok(WeatherBand::Band2),
            3 => Ok(WeatherBand::Band3),
            4 => Ok(WeatherBand::Band4),
            5 => Ok(WeatherBand::Band5),
            other => Err(format!("Weather band must be 1-5, got {}", other)),
        }
    }
}

impl From<WeatherBand> for u8 {
    fn from(band: WeatherBand) -> Self {
        band.number()
    }
}

impl FromStr for WeatherBand {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value: u8 = s
            .trim()
            .parse()
            .map_err(|_| format!("Invalid weather band: {}", s))?;
        WeatherBand::try_from(value)
    }
}

impl fmt::Display for WeatherBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Band {}", self.number())
    }
}
