//! Common types used across the platform

use serde::{Deserialize, Serialize};

/// Qualitative drying-suitability bucket derived from a numeric score
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Suitability {
    Excellent,
    Good,
    Fair,
    Poor,
}

impl Suitability {
    /// Bucket a score: excellent >= 70, good >= 50, fair >= 30, else poor.
    pub fn from_score(score: f64) -> Self {
        if score >= 70.0 {
            Suitability::Excellent
        } else if score >= 50.0 {
            Suitability::Good
        } else if score >= 30.0 {
            Suitability::Fair
        } else {
            Suitability::Poor
        }
    }
}

/// Rain risk level for a forecast day
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RainRisk {
    High,
    Moderate,
    Low,
}

impl RainRisk {
    /// Derive risk from the day's maximum precipitation probability.
    pub fn from_max_pop(max_pop: f64) -> Self {
        if max_pop > 0.7 {
            RainRisk::High
        } else if max_pop > 0.3 {
            RainRisk::Moderate
        } else {
            RainRisk::Low
        }
    }
}
