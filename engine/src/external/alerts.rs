//! OS/browser-level alert delivery capability
//!
//! High-priority notifications are pushed through this sink when the user
//! has granted permission. Delivery is fire-and-forget: a failure is logged
//! by the caller and never retried, the in-app queue stays the source of
//! truth.

use shared::Notification;

/// A destination for high-priority alerts outside the in-app queue
pub trait AlertSink: Send + Sync {
    fn deliver(&self, notification: &Notification) -> Result<(), String>;
}

/// Sink that drops every alert; used when no OS-level channel exists
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopAlertSink;

impl AlertSink for NoopAlertSink {
    fn deliver(&self, _notification: &Notification) -> Result<(), String> {
        Ok(())
    }
}

/// Sink that writes alerts to the log
#[derive(Debug, Clone, Copy, Default)]
pub struct LogAlertSink;

impl AlertSink for LogAlertSink {
    fn deliver(&self, notification: &Notification) -> Result<(), String> {
        tracing::info!(
            kind = ?notification.kind,
            title = %notification.title,
            message = %notification.message,
            "alert delivered"
        );
        Ok(())
    }
}
