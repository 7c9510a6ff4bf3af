//! Configuration management for the Laundry Advisor engine
//!
//! Supports hierarchical configuration loading:
//! 1. Default values in code
//! 2. Configuration files (development.toml, production.toml)
//! 3. Environment variable overrides with LAUNDRY_ prefix

use config::{ConfigError, Environment, File};
use serde::Deserialize;

/// Main application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Current environment (development, production)
    pub environment: String,

    /// Analysis scheduling configuration
    pub analysis: AnalysisConfig,

    /// Notification queue configuration
    pub notifications: NotificationConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AnalysisConfig {
    /// Minutes between periodic re-analysis passes
    pub interval_minutes: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct NotificationConfig {
    /// Seconds within which a repeated (kind, title) alert is suppressed
    pub dedup_window_secs: i64,

    /// Maximum number of queued notifications; oldest evicted beyond this
    pub queue_capacity: usize,

    /// Seconds a low-priority notification lives unless read or removed
    pub low_priority_ttl_secs: i64,
}

impl Config {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let environment =
            std::env::var("LAUNDRY_ENVIRONMENT").unwrap_or_else(|_| "development".into());

        let config = config::Config::builder()
            // Start with default values
            .set_default("environment", environment.clone())?
            .set_default("analysis.interval_minutes", 30)?
            .set_default("notifications.dedup_window_secs", 300)?
            .set_default("notifications.queue_capacity", 10)?
            .set_default("notifications.low_priority_ttl_secs", 8)?
            // Load environment-specific config file
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // Override with environment variables (LAUNDRY_ prefix)
            .add_source(
                Environment::with_prefix("LAUNDRY")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            interval_minutes: 30,
        }
    }
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            dedup_window_secs: 300,
            queue_capacity: 10,
            low_priority_ttl_secs: 8,
        }
    }
}
