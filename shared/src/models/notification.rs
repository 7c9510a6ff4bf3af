//! Notification models for the alert feed

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Alert kinds emitted by the notification engine
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum NotificationType {
    /// Heavy rain imminent, act now
    UrgentLaundry,
    /// Rain likely within the next 24 hours
    RainComing,
    /// A good drying window was found
    GoodTime,
    /// Current conditions are ideal
    PerfectConditions,
    /// General rain warning (tomorrow's outlook, high humidity)
    RainAlert,
    /// Strong wind speeding up drying
    WindAdvantage,
    /// Reminder pointing at the next best time slot
    LaundryReminder,
}

/// Notification priority
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
}

/// An entry in the alert feed
///
/// Constructed only by the notification engine; consumers may mark it read
/// or ask for its removal, never build one themselves.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    pub id: Uuid,
    pub kind: NotificationType,
    pub title: String,
    pub message: String,
    pub priority: Priority,
    pub timestamp: DateTime<Utc>,
    pub read: bool,
    /// Structured metrics that triggered the alert
    pub payload: serde_json::Value,
}
