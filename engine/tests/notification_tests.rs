//! Notification engine tests
//!
//! Exercises the rule set, the dedup window, the queue bound, the
//! per-hour analysis key, and low-priority expiry, all against a manual
//! clock and a recording alert sink.

use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, TimeZone, Utc};
use serde_json::json;

use laundry_advisor_engine::clock::ManualClock;
use laundry_advisor_engine::config::NotificationConfig;
use laundry_advisor_engine::external::AlertSink;
use laundry_advisor_engine::services::notifier::NotificationEngine;
use laundry_advisor_engine::services::slots::best_time_slots;
use shared::{
    ForecastSeries, Notification, NotificationType, Priority, WeatherSample, SAMPLE_SPACING_HOURS,
};

/// Sink that records every delivered title
#[derive(Clone, Default)]
struct RecordingSink {
    delivered: Arc<Mutex<Vec<String>>>,
}

impl RecordingSink {
    fn titles(&self) -> Vec<String> {
        self.delivered.lock().unwrap().clone()
    }
}

impl AlertSink for RecordingSink {
    fn deliver(&self, notification: &Notification) -> Result<(), String> {
        self.delivered
            .lock()
            .unwrap()
            .push(notification.title.clone());
        Ok(())
    }
}

fn start_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 9, 0, 0).unwrap()
}

fn engine_with(clock: &ManualClock, sink: &RecordingSink) -> NotificationEngine {
    NotificationEngine::new(
        NotificationConfig::default(),
        Arc::new(clock.clone()),
        Arc::new(sink.clone()),
    )
}

fn current(condition: &str, temp: f64, humidity: f64, wind: f64, pop: f64) -> WeatherSample {
    WeatherSample {
        timestamp: start_time(),
        temperature_celsius: temp,
        humidity_percent: humidity,
        wind_speed_mps: wind,
        condition: condition.to_string(),
        description: String::new(),
        pop,
        rain_3h_mm: 0.0,
        snow_3h_mm: 0.0,
    }
}

/// A forecast where every sample shares the same pop/humidity profile.
fn flat_forecast(len: usize, pop: f64, humidity: f64) -> ForecastSeries {
    let samples = (0..len)
        .map(|i| WeatherSample {
            timestamp: start_time()
                + Duration::hours(i as i64 * i64::from(SAMPLE_SPACING_HOURS)),
            temperature_celsius: 20.0,
            humidity_percent: humidity,
            wind_speed_mps: 2.0,
            condition: "Clouds".to_string(),
            description: String::new(),
            pop,
            rain_3h_mm: 0.0,
            snow_3h_mm: 0.0,
        })
        .collect();
    ForecastSeries::new(0, samples)
}

fn kinds(engine: &NotificationEngine) -> Vec<NotificationType> {
    engine.notifications().iter().map(|n| n.kind).collect()
}

// ============================================================================
// Queue mechanics
// ============================================================================

#[cfg(test)]
mod queue_tests {
    use super::*;

    /// Same (kind, title) again after 4 minutes is suppressed; after 6
    /// minutes it goes through.
    #[test]
    fn test_dedup_window() {
        let clock = ManualClock::new(start_time());
        let sink = RecordingSink::default();
        let mut engine = engine_with(&clock, &sink);

        assert!(engine.add_notification(
            NotificationType::RainComing,
            "Rain Expected Soon",
            "first",
            Priority::Medium,
            json!({}),
        ));

        clock.advance(Duration::minutes(4));
        assert!(!engine.add_notification(
            NotificationType::RainComing,
            "Rain Expected Soon",
            "repeat",
            Priority::Medium,
            json!({}),
        ));
        assert_eq!(engine.notifications().len(), 1);

        clock.advance(Duration::minutes(2));
        assert!(engine.add_notification(
            NotificationType::RainComing,
            "Rain Expected Soon",
            "repeat",
            Priority::Medium,
            json!({}),
        ));
        assert_eq!(engine.notifications().len(), 2);
    }

    /// Inserting 15 distinct notifications leaves the 10 most recent,
    /// newest first.
    #[test]
    fn test_queue_capped_at_ten() {
        let clock = ManualClock::new(start_time());
        let sink = RecordingSink::default();
        let mut engine = engine_with(&clock, &sink);

        for i in 0..15 {
            engine.add_notification(
                NotificationType::RainAlert,
                format!("alert {}", i),
                "msg",
                Priority::Medium,
                json!({}),
            );
        }

        let titles: Vec<&str> = engine
            .notifications()
            .iter()
            .map(|n| n.title.as_str())
            .collect();
        assert_eq!(titles.len(), 10);
        assert_eq!(titles.first(), Some(&"alert 14"));
        assert_eq!(titles.last(), Some(&"alert 5"));
    }

    /// mark_read is idempotent and counts toward unread tracking.
    #[test]
    fn test_mark_read_and_remove() {
        let clock = ManualClock::new(start_time());
        let sink = RecordingSink::default();
        let mut engine = engine_with(&clock, &sink);

        engine.add_notification(
            NotificationType::GoodTime,
            "window",
            "msg",
            Priority::Medium,
            json!({}),
        );
        let id = engine.notifications()[0].id;

        assert_eq!(engine.unread_count(), 1);
        assert!(engine.mark_read(id));
        assert!(engine.mark_read(id));
        assert_eq!(engine.unread_count(), 0);

        assert!(engine.remove(id));
        assert!(!engine.remove(id));
        assert!(engine.notifications().is_empty());

        engine.add_notification(
            NotificationType::GoodTime,
            "window",
            "msg",
            Priority::Medium,
            json!({}),
        );
        engine.clear();
        assert!(engine.notifications().is_empty());
    }

    /// Low-priority entries expire after the TTL unless read first.
    #[test]
    fn test_low_priority_expiry() {
        let clock = ManualClock::new(start_time());
        let sink = RecordingSink::default();
        let mut engine = engine_with(&clock, &sink);

        engine.add_notification(
            NotificationType::PerfectConditions,
            "perfect",
            "msg",
            Priority::Low,
            json!({}),
        );
        engine.add_notification(
            NotificationType::WindAdvantage,
            "windy but read",
            "msg",
            Priority::Low,
            json!({}),
        );
        let kept = engine.notifications()[0].id;
        engine.mark_read(kept);

        clock.advance(Duration::seconds(7));
        assert_eq!(engine.purge_expired(), 0);
        assert_eq!(engine.notifications().len(), 2);

        clock.advance(Duration::seconds(2));
        assert_eq!(engine.purge_expired(), 1);
        let titles: Vec<&str> = engine
            .notifications()
            .iter()
            .map(|n| n.title.as_str())
            .collect();
        assert_eq!(titles, vec!["windy but read"]);
    }

    /// High-priority notifications reach the sink only after permission
    /// was granted.
    #[test]
    fn test_sink_respects_permission() {
        let clock = ManualClock::new(start_time());
        let sink = RecordingSink::default();
        let mut engine = engine_with(&clock, &sink);

        engine.add_notification(
            NotificationType::UrgentLaundry,
            "without permission",
            "msg",
            Priority::High,
            json!({}),
        );
        assert!(sink.titles().is_empty());

        engine.set_alerts_enabled(true);
        engine.add_notification(
            NotificationType::UrgentLaundry,
            "with permission",
            "msg",
            Priority::High,
            json!({}),
        );
        assert_eq!(sink.titles(), vec!["with permission"]);

        // medium priority never reaches the sink
        engine.add_notification(
            NotificationType::RainComing,
            "medium",
            "msg",
            Priority::Medium,
            json!({}),
        );
        assert_eq!(sink.titles().len(), 1);
    }
}

// ============================================================================
// Analysis rules
// ============================================================================

#[cfg(test)]
mod rule_tests {
    use super::*;

    /// Imminent heavy rain produces a single high-priority alert; the
    /// medium "rain coming" rule is mutually exclusive with it.
    #[test]
    fn test_heavy_rain_suppresses_rain_coming() {
        let clock = ManualClock::new(start_time());
        let sink = RecordingSink::default();
        let mut engine = engine_with(&clock, &sink);

        let forecast = flat_forecast(8, 0.9, 90.0);
        engine.analyze(&current("Clouds", 20.0, 80.0, 2.0, 0.5), &forecast);

        let kinds = kinds(&engine);
        assert!(kinds.contains(&NotificationType::UrgentLaundry));
        assert!(!kinds.contains(&NotificationType::RainComing));

        let urgent = &engine.notifications()[0];
        assert_eq!(urgent.priority, Priority::High);
        assert_eq!(urgent.payload["rain_probability"], json!(90));
    }

    /// With pop between 0.6 and 0.8 the medium rule fires instead.
    #[test]
    fn test_rain_coming_fires_below_heavy_threshold() {
        let clock = ManualClock::new(start_time());
        let sink = RecordingSink::default();
        let mut engine = engine_with(&clock, &sink);

        engine.analyze(
            &current("Clouds", 20.0, 80.0, 2.0, 0.5),
            &flat_forecast(8, 0.7, 90.0),
        );

        let kinds = kinds(&engine);
        assert!(kinds.contains(&NotificationType::RainComing));
        assert!(!kinds.contains(&NotificationType::UrgentLaundry));
    }

    /// Rules 1 and 2 are excluded while it is already raining.
    #[test]
    fn test_rain_rules_skipped_when_already_raining() {
        let clock = ManualClock::new(start_time());
        let sink = RecordingSink::default();
        let mut engine = engine_with(&clock, &sink);

        engine.analyze(
            &current("Rain", 20.0, 80.0, 2.0, 0.9),
            &flat_forecast(8, 0.9, 90.0),
        );

        let kinds = kinds(&engine);
        assert!(!kinds.contains(&NotificationType::UrgentLaundry));
        assert!(!kinds.contains(&NotificationType::RainComing));
    }

    /// Ideal current conditions raise a low-priority alert.
    #[test]
    fn test_perfect_conditions_rule() {
        let clock = ManualClock::new(start_time());
        let sink = RecordingSink::default();
        let mut engine = engine_with(&clock, &sink);

        engine.analyze(
            &current("Clear", 22.0, 45.0, 4.0, 0.1),
            &flat_forecast(8, 0.0, 90.0),
        );

        let perfect = engine
            .notifications()
            .iter()
            .find(|n| n.kind == NotificationType::PerfectConditions)
            .expect("perfect-conditions alert");
        assert_eq!(perfect.priority, Priority::Low);
        assert!(perfect.message.contains("22\u{B0}C"));
    }

    /// A qualifying rain-free window produces the drying-window alert
    /// with its duration in the message.
    #[test]
    fn test_window_rule_reports_duration() {
        let clock = ManualClock::new(start_time());
        let sink = RecordingSink::default();
        let mut engine = engine_with(&clock, &sink);

        engine.analyze(
            &current("Clouds", 20.0, 80.0, 1.0, 0.0),
            &flat_forecast(8, 0.0, 50.0),
        );

        let window = engine
            .notifications()
            .iter()
            .find(|n| n.kind == NotificationType::GoodTime)
            .expect("drying-window alert");
        assert_eq!(window.priority, Priority::Medium);
        assert!(window.message.starts_with("24h rain-free period today"));
        assert_eq!(window.payload["duration_hours"], json!(24));
    }

    /// Rain in the 24-48h range triggers the tomorrow warning with the
    /// worst probability found there.
    #[test]
    fn test_tomorrow_rain_rule() {
        let clock = ManualClock::new(start_time());
        let sink = RecordingSink::default();
        let mut engine = engine_with(&clock, &sink);

        let mut forecast = flat_forecast(16, 0.0, 90.0);
        forecast.samples[9].pop = 0.6;
        forecast.samples[12].pop = 0.75;

        engine.analyze(&current("Clouds", 20.0, 80.0, 1.0, 0.0), &forecast);

        let tomorrow = engine
            .notifications()
            .iter()
            .find(|n| n.kind == NotificationType::RainAlert)
            .expect("tomorrow alert");
        assert_eq!(tomorrow.payload["tomorrow_rain_chance"], json!(75));
    }

    /// Strong wind with dry air raises the wind-advantage alert; muggy
    /// still air raises the humidity alert.
    #[test]
    fn test_wind_and_humidity_rules() {
        let clock = ManualClock::new(start_time());
        let sink = RecordingSink::default();
        let mut engine = engine_with(&clock, &sink);
        engine.analyze(
            &current("Clouds", 20.0, 55.0, 6.0, 0.1),
            &flat_forecast(8, 0.0, 90.0),
        );
        assert!(kinds(&engine).contains(&NotificationType::WindAdvantage));

        let clock2 = ManualClock::new(start_time() + Duration::hours(1));
        let mut engine2 = engine_with(&clock2, &sink);
        engine2.analyze(
            &current("Clouds", 20.0, 90.0, 1.0, 0.0),
            &flat_forecast(8, 0.0, 90.0),
        );
        let humidity = engine2
            .notifications()
            .iter()
            .find(|n| n.kind == NotificationType::RainAlert)
            .expect("humidity alert");
        assert_eq!(humidity.priority, Priority::Medium);
        assert!(humidity.message.contains("90%"));
    }

    /// A second pass in the same (day, hour) is skipped; the next hour
    /// runs again.
    #[test]
    fn test_analysis_key_gates_passes() {
        let clock = ManualClock::new(start_time());
        let sink = RecordingSink::default();
        let mut engine = engine_with(&clock, &sink);
        let snapshot = current("Clear", 22.0, 45.0, 4.0, 0.1);
        let forecast = flat_forecast(8, 0.0, 90.0);

        assert!(engine.analyze(&snapshot, &forecast) > 0);
        let count = engine.notifications().len();

        clock.advance(Duration::minutes(20));
        assert_eq!(engine.analyze(&snapshot, &forecast), 0);
        assert_eq!(engine.notifications().len(), count);

        clock.advance(Duration::minutes(41));
        assert!(engine.analyze(&snapshot, &forecast) > 0);
        assert!(engine.notifications().len() > count);
    }

    /// The best-times reminder points at the first slot.
    #[test]
    fn test_best_times_reminder() {
        let clock = ManualClock::new(start_time());
        let sink = RecordingSink::default();
        let mut engine = engine_with(&clock, &sink);

        let slots = best_time_slots(&flat_forecast(8, 0.0, 50.0));
        assert!(!slots.is_empty());
        assert!(engine.notify_best_times(&slots));

        let reminder = &engine.notifications()[0];
        assert_eq!(reminder.kind, NotificationType::LaundryReminder);
        assert!(reminder
            .message
            .contains(&format!("Best time to start laundry: {}", slots[0].time)));

        // an empty slot list emits nothing
        assert!(!engine.notify_best_times(&[]));
    }
}
