//! Laundry Advisor - CLI entry point
//!
//! Loads a current-conditions snapshot and a 3-hourly forecast from JSON
//! files, runs the full analysis, performs one notification pass, and
//! prints the report as JSON.

use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use laundry_advisor_engine::clock::SystemClock;
use laundry_advisor_engine::error::EngineError;
use laundry_advisor_engine::external::LogAlertSink;
use laundry_advisor_engine::services::notifier::NotificationEngine;
use laundry_advisor_engine::services::{days, scoring, slots, windows};
use laundry_advisor_engine::Config;
use shared::{
    DayAggregate, ForecastSeries, Notification, RainFreeWindow, RawSample, Recommendation,
    ScoreResult, TimeSlot, WeatherSample,
};

/// Forecast file shape: timezone offset plus raw 3-hourly entries
#[derive(Debug, Deserialize)]
struct ForecastFile {
    #[serde(default)]
    timezone_offset_seconds: i32,
    samples: Vec<RawSample>,
}

/// Full analysis output
#[derive(Debug, Serialize)]
struct Report {
    current: ScoreResult,
    recommendation: Recommendation,
    best_days: Vec<DayAggregate>,
    best_window: Option<RainFreeWindow>,
    best_times: Vec<TimeSlot>,
    notifications: Vec<Notification>,
}

fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "laundry_advisor=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = Config::load()?;

    tracing::info!("Starting Laundry Advisor");
    tracing::info!("Environment: {}", config.environment);

    let mut args = std::env::args().skip(1);
    let (Some(current_path), Some(forecast_path)) = (args.next(), args.next()) else {
        anyhow::bail!("usage: laundry-advisor <current.json> <forecast.json>");
    };

    let current = load_current(Path::new(&current_path))?;
    let forecast = load_forecast(Path::new(&forecast_path))?;

    let report = run_analysis(&config, &current, &forecast);
    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(())
}

fn load_current(path: &Path) -> Result<WeatherSample, EngineError> {
    let raw: RawSample = serde_json::from_str(&std::fs::read_to_string(path)?)?;
    Ok(WeatherSample::try_from(raw)?)
}

fn load_forecast(path: &Path) -> Result<ForecastSeries, EngineError> {
    let file: ForecastFile = serde_json::from_str(&std::fs::read_to_string(path)?)?;
    let (series, skipped) = ForecastSeries::from_raw(file.timezone_offset_seconds, file.samples);
    if skipped > 0 {
        tracing::warn!(skipped, "dropped unusable forecast entries");
    }
    if series.samples.is_empty() {
        return Err(EngineError::EmptyForecast);
    }
    Ok(series)
}

fn run_analysis(config: &Config, current: &WeatherSample, forecast: &ForecastSeries) -> Report {
    let best_times = slots::best_time_slots(forecast);

    let mut engine = NotificationEngine::new(
        config.notifications.clone(),
        Arc::new(SystemClock),
        Arc::new(LogAlertSink),
    );
    engine.set_alerts_enabled(true);
    engine.analyze(current, forecast);
    engine.notify_best_times(&best_times);

    let current_score = scoring::score_sample(current);
    Report {
        recommendation: scoring::recommendation_message(&current_score),
        current: current_score,
        best_days: days::rank_days(forecast),
        best_window: windows::best_window(&forecast.samples),
        best_times,
        notifications: engine.snapshot(),
    }
}
