//! Analysis result models produced by the decision engine

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{RainRisk, Suitability};

/// Drying-suitability verdict for a single weather sample
///
/// Derived, never mutated after creation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScoreResult {
    /// Final score, clamped to 0-100
    pub score: i32,
    pub issues: Vec<String>,
    pub recommendations: Vec<String>,
    pub suitability: Suitability,
    pub pop: f64,
    pub rain_amount_mm: f64,
}

/// Severity of a recommendation verdict
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AlertLevel {
    Default,
    Destructive,
}

/// Human-readable verdict derived from a [`ScoreResult`]
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Recommendation {
    pub message: String,
    pub level: AlertLevel,
}

/// Composite drying outlook for one local calendar day
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DayAggregate {
    pub date: NaiveDate,
    /// Average sample score minus day-level precipitation penalties,
    /// floored at zero (no upper clamp at day level)
    pub score: f64,
    pub suitability: Suitability,
    pub rain_risk: RainRisk,
    pub has_rain: bool,
    pub max_pop: f64,
    pub total_rain_mm: f64,
    pub avg_humidity: f64,
    pub avg_temp: f64,
    pub avg_wind: f64,
    /// Distinct condition categories seen during the day, first-seen order
    pub conditions: Vec<String>,
}

/// Conditions of one sample inside a rain-free window
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WindowSample {
    pub temperature_celsius: f64,
    pub humidity_percent: f64,
    pub wind_speed_mps: f64,
    pub timestamp: DateTime<Utc>,
}

/// A contiguous dry interval suitable for outdoor drying
///
/// Every member sample has pop < 0.3 and humidity < 75; the duration is at
/// least 6 hours and a multiple of the sample spacing. Recomputed on each
/// analysis, never persisted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RainFreeWindow {
    /// Index of the first member sample within the scanned horizon
    pub start_index: usize,
    pub duration_hours: u32,
    pub samples: Vec<WindowSample>,
    /// Desirability: avg_wind * 2 + (100 - avg_humidity) + min(avg_temp, 20)
    pub score: f64,
}

impl RainFreeWindow {
    pub fn avg_temperature(&self) -> f64 {
        average(self.samples.iter().map(|s| s.temperature_celsius))
    }

    pub fn avg_humidity(&self) -> f64 {
        average(self.samples.iter().map(|s| s.humidity_percent))
    }

    pub fn avg_wind(&self) -> f64 {
        average(self.samples.iter().map(|s| s.wind_speed_mps))
    }

    /// Timestamp of the first member sample, if any.
    pub fn starts_at(&self) -> Option<DateTime<Utc>> {
        self.samples.first().map(|s| s.timestamp)
    }
}

fn average(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, count) = values.fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

/// A near-term slot worth starting laundry in
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TimeSlot {
    /// Local clock time, e.g. "14:00"
    pub time: String,
    /// Local day label, e.g. "Sat, Jun 1"
    pub day: String,
    pub score: i32,
    pub conditions: String,
}
