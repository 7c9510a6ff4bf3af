//! External capability boundaries

pub mod alerts;

pub use alerts::{AlertSink, LogAlertSink, NoopAlertSink};
