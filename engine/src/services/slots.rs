//! Near-term time-slot ranking
//!
//! Filters the next 24 hours of forecast samples by score threshold.
//! Filtering is order-preserving: the result stays chronological, ranking
//! is implicit in the threshold.

use shared::{ForecastSeries, TimeSlot};

use crate::services::scoring::score_sample;

/// Number of leading samples considered (24 hours at 3-hour spacing).
pub const SLOT_HORIZON_SAMPLES: usize = 8;

/// Minimum sample score for a slot to qualify.
pub const MIN_SLOT_SCORE: i32 = 60;

/// Maximum number of slots returned.
pub const MAX_SLOTS: usize = 3;

/// The first three qualifying slots within the next 24 hours.
pub fn best_time_slots(forecast: &ForecastSeries) -> Vec<TimeSlot> {
    forecast
        .samples
        .iter()
        .take(SLOT_HORIZON_SAMPLES)
        .filter_map(|sample| {
            let result = score_sample(sample);
            if result.score < MIN_SLOT_SCORE {
                return None;
            }
            let local = forecast.local_time(sample.timestamp);
            Some(TimeSlot {
                time: local.format("%H:%M").to_string(),
                day: local.format("%a, %b %-d").to_string(),
                score: result.score,
                conditions: sample.display_conditions().to_string(),
            })
        })
        .take(MAX_SLOTS)
        .collect()
}
