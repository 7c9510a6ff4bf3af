//! Weather data models
//!
//! Field names follow the 3-hourly forecast feed the engine consumes:
//! `pop` is the probability of precipitation (0.0-1.0), rain and snow
//! amounts are millimetres accumulated over the 3-hour step.

use chrono::{DateTime, FixedOffset, NaiveDate, Offset, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Spacing between consecutive forecast samples, in hours.
pub const SAMPLE_SPACING_HOURS: u32 = 3;

/// A weather observation or forecast step at a point in time
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WeatherSample {
    pub timestamp: DateTime<Utc>,
    pub temperature_celsius: f64,
    pub humidity_percent: f64,
    pub wind_speed_mps: f64,
    /// Condition category: Clear, Clouds, Rain, Drizzle, Thunderstorm, Snow, Mist, ...
    pub condition: String,
    /// Human-readable condition text; empty means "use the category".
    #[serde(default)]
    pub description: String,
    /// Probability of precipitation, 0.0-1.0
    #[serde(default)]
    pub pop: f64,
    #[serde(default)]
    pub rain_3h_mm: f64,
    #[serde(default)]
    pub snow_3h_mm: f64,
}

impl WeatherSample {
    /// Lowercased condition category for substring checks.
    pub fn condition_lower(&self) -> String {
        self.condition.to_lowercase()
    }

    /// Condition text for display, falling back to the category.
    pub fn display_conditions(&self) -> &str {
        if self.description.is_empty() {
            &self.condition
        } else {
            &self.description
        }
    }
}

/// Error raised when a raw feed entry cannot be turned into a usable sample
#[derive(Debug, Error, PartialEq, Eq)]
pub enum WeatherDataError {
    #[error("sample is missing required field `{0}`")]
    MissingField(&'static str),
}

/// Lenient mirror of [`WeatherSample`] used at the provider boundary.
///
/// Optional precipitation fields default to zero; a missing required field
/// makes the entry unusable and it is skipped by the series builder.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawSample {
    pub timestamp: Option<DateTime<Utc>>,
    pub temperature_celsius: Option<f64>,
    pub humidity_percent: Option<f64>,
    pub wind_speed_mps: Option<f64>,
    pub condition: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    pub pop: Option<f64>,
    pub rain_3h_mm: Option<f64>,
    pub snow_3h_mm: Option<f64>,
}

impl TryFrom<RawSample> for WeatherSample {
    type Error = WeatherDataError;

    fn try_from(raw: RawSample) -> Result<Self, Self::Error> {
        Ok(WeatherSample {
            timestamp: raw
                .timestamp
                .ok_or(WeatherDataError::MissingField("timestamp"))?,
            temperature_celsius: raw
                .temperature_celsius
                .ok_or(WeatherDataError::MissingField("temperature_celsius"))?,
            humidity_percent: raw
                .humidity_percent
                .ok_or(WeatherDataError::MissingField("humidity_percent"))?,
            wind_speed_mps: raw
                .wind_speed_mps
                .ok_or(WeatherDataError::MissingField("wind_speed_mps"))?,
            condition: raw
                .condition
                .ok_or(WeatherDataError::MissingField("condition"))?,
            description: raw.description.unwrap_or_default(),
            pop: raw.pop.unwrap_or(0.0),
            rain_3h_mm: raw.rain_3h_mm.unwrap_or(0.0),
            snow_3h_mm: raw.snow_3h_mm.unwrap_or(0.0),
        })
    }
}

/// An ordered 3-hourly forecast for one location
///
/// Timestamps are strictly increasing with [`SAMPLE_SPACING_HOURS`] spacing;
/// typically 40 samples spanning 5 days.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ForecastSeries {
    /// Offset of the location's local time from UTC, in seconds
    pub timezone_offset_seconds: i32,
    pub samples: Vec<WeatherSample>,
}

impl ForecastSeries {
    pub fn new(timezone_offset_seconds: i32, samples: Vec<WeatherSample>) -> Self {
        Self {
            timezone_offset_seconds,
            samples,
        }
    }

    /// Build a series from raw feed entries, dropping unusable ones.
    ///
    /// Returns the series and the number of entries that were skipped.
    pub fn from_raw(timezone_offset_seconds: i32, raw: Vec<RawSample>) -> (Self, usize) {
        let total = raw.len();
        let samples: Vec<WeatherSample> = raw
            .into_iter()
            .filter_map(|entry| WeatherSample::try_from(entry).ok())
            .collect();
        let skipped = total - samples.len();
        (Self::new(timezone_offset_seconds, samples), skipped)
    }

    fn offset(&self) -> FixedOffset {
        // Out-of-range offsets fall back to UTC
        FixedOffset::east_opt(self.timezone_offset_seconds).unwrap_or_else(|| Utc.fix())
    }

    /// A timestamp shifted into the location's local time.
    pub fn local_time(&self, timestamp: DateTime<Utc>) -> DateTime<FixedOffset> {
        timestamp.with_timezone(&self.offset())
    }

    /// The local calendar day a timestamp falls on.
    pub fn local_date(&self, timestamp: DateTime<Utc>) -> NaiveDate {
        self.local_time(timestamp).date_naive()
    }
}
