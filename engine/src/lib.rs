//! Laundry Advisor - Decision Engine
//!
//! Turns a raw meteorological time series (current conditions plus a
//! multi-day 3-hourly forecast) into actionable laundry-drying guidance:
//! a 0-100 suitability score, ranked drying days, ranked time slots, and a
//! deduplicated, priority-triaged alert feed.

pub mod clock;
pub mod config;
pub mod error;
pub mod external;
pub mod services;

pub use config::Config;
pub use error::{EngineError, EngineResult};
