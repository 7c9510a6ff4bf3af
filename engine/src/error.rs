//! Error handling for the Laundry Advisor engine
//!
//! No error in this subsystem is fatal to the hosting process: analysis
//! passes catch failures at the pass boundary and alert-sink delivery
//! failures are logged and ignored.

use thiserror::Error;

/// Engine error types
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("weather data error: {0}")]
    WeatherData(#[from] shared::WeatherDataError),

    #[error("forecast series contains no usable samples")]
    EmptyForecast,

    #[error("configuration error: {0}")]
    Configuration(#[from] config::ConfigError),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

/// Result type alias for engine operations
pub type EngineResult<T> = Result<T, EngineError>;
