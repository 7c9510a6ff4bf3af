//! Rain-free window detection over the 48-hour horizon
//!
//! A single growing candidate scans the chronological samples; a sample
//! extends the candidate when pop < 0.3 and humidity < 75. The candidate
//! is committed on the first disqualifying sample, or at the end of the
//! scan, when it covers at least 6 hours.

use shared::{RainFreeWindow, WeatherSample, WindowSample, SAMPLE_SPACING_HOURS};

/// Number of leading samples scanned (48 hours at 3-hour spacing).
pub const WINDOW_HORIZON_SAMPLES: usize = 16;

/// Minimum committed window length, in hours.
pub const MIN_WINDOW_HOURS: u32 = 6;

/// Find all rain-free windows within the 48-hour horizon.
pub fn detect_windows(samples: &[WeatherSample]) -> Vec<RainFreeWindow> {
    let horizon = &samples[..samples.len().min(WINDOW_HORIZON_SAMPLES)];

    let mut windows = Vec::new();
    let mut candidate: Option<(usize, Vec<WindowSample>)> = None;

    for (index, sample) in horizon.iter().enumerate() {
        if sample.pop < 0.3 && sample.humidity_percent < 75.0 {
            let (_, members) = candidate.get_or_insert_with(|| (index, Vec::new()));
            members.push(WindowSample {
                temperature_celsius: sample.temperature_celsius,
                humidity_percent: sample.humidity_percent,
                wind_speed_mps: sample.wind_speed_mps,
                timestamp: sample.timestamp,
            });
        } else {
            commit(&mut windows, candidate.take());
        }
    }
    // A window running to the end of the horizon still counts
    commit(&mut windows, candidate.take());

    windows
}

/// Pick the most desirable window, if any qualifies.
///
/// Selection uses strict greater-than, so the earliest-occurring window
/// keeps the lead on ties.
pub fn best_window(samples: &[WeatherSample]) -> Option<RainFreeWindow> {
    let mut best: Option<RainFreeWindow> = None;
    for window in detect_windows(samples) {
        let lead = best.as_ref().map_or(f64::NEG_INFINITY, |b| b.score);
        if window.score > lead {
            best = Some(window);
        }
    }
    best
}

fn commit(windows: &mut Vec<RainFreeWindow>, candidate: Option<(usize, Vec<WindowSample>)>) {
    let Some((start_index, samples)) = candidate else {
        return;
    };
    let duration_hours = samples.len() as u32 * SAMPLE_SPACING_HOURS;
    if duration_hours < MIN_WINDOW_HOURS {
        return;
    }
    let score = desirability(&samples);
    windows.push(RainFreeWindow {
        start_index,
        duration_hours,
        samples,
        score,
    });
}

/// Desirability of a window: windy, dry air, warm up to 20 degrees.
fn desirability(samples: &[WindowSample]) -> f64 {
    let count = samples.len().max(1) as f64;
    let avg_wind: f64 = samples.iter().map(|s| s.wind_speed_mps).sum::<f64>() / count;
    let avg_humidity: f64 = samples.iter().map(|s| s.humidity_percent).sum::<f64>() / count;
    let avg_temp: f64 = samples.iter().map(|s| s.temperature_celsius).sum::<f64>() / count;

    avg_wind * 2.0 + (100.0 - avg_humidity) + avg_temp.min(20.0)
}
