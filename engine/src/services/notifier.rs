//! Stateful notification generation
//!
//! The engine runs the analysis services on each new snapshot/forecast
//! pair, evaluates seven alert rules, deduplicates repeats, and maintains
//! a bounded in-memory queue. One engine instance serves one active
//! location/session; all queue mutation happens through the engine (or the
//! command channel of [`spawn_engine`]), so consumers never observe a
//! partially-updated queue.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use chrono::{DateTime, Datelike, Duration, Timelike, Utc};
use serde_json::json;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use uuid::Uuid;

use shared::{
    ForecastSeries, Notification, NotificationType, Priority, TimeSlot, WeatherSample,
};

use crate::clock::Clock;
use crate::config::NotificationConfig;
use crate::error::EngineResult;
use crate::external::AlertSink;
use crate::services::windows;

/// Rules 1, 2 and 5 look at these slices of the forecast.
const NEAR_TERM_SAMPLES: usize = 8;
const TOMORROW_RANGE: std::ops::Range<usize> = 8..16;

/// Stateful alert generator owning the notification queue
pub struct NotificationEngine {
    config: NotificationConfig,
    clock: Arc<dyn Clock>,
    sink: Arc<dyn AlertSink>,
    queue: VecDeque<Notification>,
    /// Scheduled auto-removal deadlines for low-priority entries
    expiries: HashMap<Uuid, DateTime<Utc>>,
    /// (local day-of-month, hour) of the previous analysis pass
    last_analysis_key: Option<(u32, u32)>,
    alerts_enabled: bool,
}

impl NotificationEngine {
    pub fn new(
        config: NotificationConfig,
        clock: Arc<dyn Clock>,
        sink: Arc<dyn AlertSink>,
    ) -> Self {
        Self {
            config,
            clock,
            sink,
            queue: VecDeque::new(),
            expiries: HashMap::new(),
            last_analysis_key: None,
            alerts_enabled: false,
        }
    }

    /// Whether high-priority alerts may reach the external sink.
    pub fn set_alerts_enabled(&mut self, enabled: bool) {
        self.alerts_enabled = enabled;
    }

    /// Current queue contents, newest first.
    pub fn notifications(&self) -> &VecDeque<Notification> {
        &self.queue
    }

    /// Cloned queue contents, newest first.
    pub fn snapshot(&self) -> Vec<Notification> {
        self.queue.iter().cloned().collect()
    }

    pub fn unread_count(&self) -> usize {
        self.queue.iter().filter(|n| !n.read).count()
    }

    /// Run one analysis pass over the given data.
    ///
    /// Skipped entirely when the (local day, hour) key matches the previous
    /// pass. Any failure inside the pass is caught here, logged, and leaves
    /// the queue exactly as it was. Returns the number of notifications
    /// inserted.
    pub fn analyze(&mut self, current: &WeatherSample, forecast: &ForecastSeries) -> usize {
        let now = self.clock.now();
        let local_now = forecast.local_time(now);
        let key = (local_now.day(), local_now.hour());
        if self.last_analysis_key == Some(key) {
            tracing::debug!(?key, "analysis already ran this hour, skipping");
            return 0;
        }
        self.last_analysis_key = Some(key);

        match self.run_rules(now, current, forecast) {
            Ok(inserted) => {
                tracing::debug!(inserted, "analysis pass complete");
                inserted
            }
            Err(err) => {
                tracing::error!(error = %err, "analysis pass failed; queue unchanged");
                0
            }
        }
    }

    fn run_rules(
        &mut self,
        now: DateTime<Utc>,
        current: &WeatherSample,
        forecast: &ForecastSeries,
    ) -> EngineResult<usize> {
        let mut inserted = 0usize;
        let condition = current.condition_lower();
        let currently_raining = condition.contains("rain");
        let near_term = &forecast.samples[..forecast.samples.len().min(NEAR_TERM_SAMPLES)];

        // 1. Heavy rain imminent
        let heavy_rain = near_term.iter().find(|s| s.pop > 0.8);
        if let (Some(sample), false) = (heavy_rain, currently_raining) {
            let hours = hours_until(now, sample.timestamp);
            if self.add_notification(
                NotificationType::UrgentLaundry,
                "\u{1F6A8} Heavy Rain Alert!",
                format!(
                    "Heavy rain expected in {} hours. Bring laundry inside or start indoor drying now!",
                    hours
                ),
                Priority::High,
                json!({
                    "hours_until_rain": hours,
                    "rain_probability": percent(sample.pop),
                }),
            ) {
                inserted += 1;
            }
        }
        // 2. Rain likely within 24h, only when rule 1 did not fire
        else if let (Some(sample), false) = (
            near_term.iter().find(|s| s.pop > 0.6),
            currently_raining,
        ) {
            let hours = hours_until(now, sample.timestamp);
            if self.add_notification(
                NotificationType::RainComing,
                "\u{1F327}\u{FE0F} Rain Expected Soon",
                format!(
                    "Rain likely in {} hours ({}% chance). Plan accordingly for drying.",
                    hours,
                    percent(sample.pop)
                ),
                Priority::Medium,
                json!({
                    "hours_until_rain": hours,
                    "rain_probability": percent(sample.pop),
                }),
            ) {
                inserted += 1;
            }
        }

        // 3. Perfect conditions right now
        if current.wind_speed_mps > 3.0
            && current.humidity_percent < 60.0
            && current.temperature_celsius > 15.0
            && current.temperature_celsius < 30.0
            && current.pop < 0.2
        {
            if self.add_notification(
                NotificationType::PerfectConditions,
                "\u{2600}\u{FE0F} Perfect Laundry Weather!",
                format!(
                    "Ideal conditions now: {}\u{B0}C, {}% humidity, {:.1} m/s wind. Great time to start laundry!",
                    current.temperature_celsius.round() as i64,
                    current.humidity_percent.round() as i64,
                    current.wind_speed_mps
                ),
                Priority::Low,
                json!({
                    "temp": current.temperature_celsius,
                    "humidity": current.humidity_percent,
                    "wind": current.wind_speed_mps,
                }),
            ) {
                inserted += 1;
            }
        }

        // 4. Best rain-free window within 48 hours
        if let Some(window) = windows::best_window(&forecast.samples) {
            if let Some(start) = window.starts_at() {
                let start_local = forecast.local_time(start);
                let is_today = start_local.date_naive() == forecast.local_date(now);
                if self.add_notification(
                    NotificationType::GoodTime,
                    "\u{23F0} Optimal Drying Window",
                    format!(
                        "{}h rain-free period {} starting {}. Perfect for outdoor drying!",
                        window.duration_hours,
                        if is_today { "today" } else { "tomorrow" },
                        start_local.format("%H:%M")
                    ),
                    Priority::Medium,
                    json!({
                        "duration_hours": window.duration_hours,
                        "start_time": start,
                        "avg_conditions": {
                            "temp": window.avg_temperature().round() as i64,
                            "humidity": window.avg_humidity().round() as i64,
                        },
                    }),
                ) {
                    inserted += 1;
                }
            }
        }

        // 5. Rain likely tomorrow (hours 24-48)
        let tomorrow_start = TOMORROW_RANGE.start.min(forecast.samples.len());
        let tomorrow_end = TOMORROW_RANGE.end.min(forecast.samples.len());
        let tomorrow_max_pop = forecast.samples[tomorrow_start..tomorrow_end]
            .iter()
            .filter(|s| s.pop > 0.5)
            .fold(None::<f64>, |max, s| {
                Some(max.map_or(s.pop, |m| m.max(s.pop)))
            });
        if let Some(max_pop) = tomorrow_max_pop {
            if self.add_notification(
                NotificationType::RainAlert,
                "\u{1F326}\u{FE0F} Tomorrow's Weather",
                format!(
                    "Rain expected tomorrow ({}% chance). Consider doing laundry today or plan for indoor drying.",
                    percent(max_pop)
                ),
                Priority::Medium,
                json!({ "tomorrow_rain_chance": percent(max_pop) }),
            ) {
                inserted += 1;
            }
        }

        // 6. Strong wind, dry air, low rain chance
        if current.wind_speed_mps > 5.0
            && current.humidity_percent < 70.0
            && current.pop < 0.3
        {
            if self.add_notification(
                NotificationType::WindAdvantage,
                "\u{1F4A8} Great Wind Conditions",
                format!(
                    "Strong wind ({:.1} m/s) and low humidity. Clothes will dry quickly outdoors!",
                    current.wind_speed_mps
                ),
                Priority::Low,
                json!({
                    "wind_speed": current.wind_speed_mps,
                    "humidity": current.humidity_percent,
                }),
            ) {
                inserted += 1;
            }
        }

        // 7. Very high humidity, still air
        if current.humidity_percent > 85.0 && current.wind_speed_mps < 2.0 {
            if self.add_notification(
                NotificationType::RainAlert,
                "\u{1F4A7} High Humidity Alert",
                format!(
                    "Very high humidity ({}%) and low wind. Consider indoor drying or wait for better conditions.",
                    current.humidity_percent.round() as i64
                ),
                Priority::Medium,
                json!({
                    "humidity": current.humidity_percent,
                    "wind": current.wind_speed_mps,
                }),
            ) {
                inserted += 1;
            }
        }

        Ok(inserted)
    }

    /// Remind about the next best time slot, when one exists.
    pub fn notify_best_times(&mut self, slots: &[TimeSlot]) -> bool {
        let Some(first) = slots.first() else {
            return false;
        };
        self.add_notification(
            NotificationType::LaundryReminder,
            "\u{23F0} Optimal Laundry Time",
            format!("Best time to start laundry: {}", first.time),
            Priority::Medium,
            json!({ "best_time": first }),
        )
    }

    /// Insert a notification, applying dedup, the queue cap, sink delivery
    /// and low-priority expiry scheduling. Returns false when suppressed as
    /// a duplicate.
    pub fn add_notification(
        &mut self,
        kind: NotificationType,
        title: impl Into<String>,
        message: impl Into<String>,
        priority: Priority,
        payload: serde_json::Value,
    ) -> bool {
        let title = title.into();
        let now = self.clock.now();
        let dedup_window = Duration::seconds(self.config.dedup_window_secs);

        let duplicate = self
            .queue
            .iter()
            .any(|n| n.kind == kind && n.title == title && now - n.timestamp < dedup_window);
        if duplicate {
            tracing::debug!(?kind, %title, "duplicate notification suppressed");
            return false;
        }

        let notification = Notification {
            id: Uuid::new_v4(),
            kind,
            title,
            message: message.into(),
            priority,
            timestamp: now,
            read: false,
            payload,
        };

        if priority == Priority::High && self.alerts_enabled {
            if let Err(err) = self.sink.deliver(&notification) {
                tracing::warn!(error = %err, "alert sink delivery failed; queue remains source of truth");
            }
        }

        if priority == Priority::Low {
            self.expiries.insert(
                notification.id,
                now + Duration::seconds(self.config.low_priority_ttl_secs),
            );
        }

        self.queue.push_front(notification);
        while self.queue.len() > self.config.queue_capacity {
            if let Some(evicted) = self.queue.pop_back() {
                self.expiries.remove(&evicted.id);
            }
        }

        true
    }

    /// Mark a notification read. Idempotent; cancels a pending expiry.
    pub fn mark_read(&mut self, id: Uuid) -> bool {
        let Some(notification) = self.queue.iter_mut().find(|n| n.id == id) else {
            return false;
        };
        notification.read = true;
        self.expiries.remove(&id);
        true
    }

    /// Remove a notification by id.
    pub fn remove(&mut self, id: Uuid) -> bool {
        let before = self.queue.len();
        self.queue.retain(|n| n.id != id);
        self.expiries.remove(&id);
        self.queue.len() != before
    }

    /// Drop the whole queue.
    pub fn clear(&mut self) {
        self.queue.clear();
        self.expiries.clear();
    }

    /// Remove low-priority notifications whose TTL has elapsed.
    pub fn purge_expired(&mut self) -> usize {
        let now = self.clock.now();
        let due: Vec<Uuid> = self
            .expiries
            .iter()
            .filter(|(_, deadline)| **deadline <= now)
            .map(|(id, _)| *id)
            .collect();
        for id in &due {
            self.remove(*id);
        }
        due.len()
    }
}

fn percent(pop: f64) -> i64 {
    (pop * 100.0).round() as i64
}

/// Whole hours until a timestamp, rounded up, never negative.
fn hours_until(now: DateTime<Utc>, at: DateTime<Utc>) -> i64 {
    let seconds = (at - now).num_seconds();
    ((seconds + 3599).div_euclid(3600)).max(0)
}

/// Commands accepted by the engine task
#[derive(Debug)]
pub enum EngineCommand {
    Submit {
        current: WeatherSample,
        forecast: ForecastSeries,
    },
    NotifyBestTimes {
        slots: Vec<TimeSlot>,
    },
    MarkRead {
        id: Uuid,
    },
    Remove {
        id: Uuid,
    },
    Clear,
    SetAlertsEnabled {
        enabled: bool,
    },
    List {
        reply: oneshot::Sender<Vec<Notification>>,
    },
}

/// Handle to a running engine task
///
/// Dropping every handle closes the command channel, which stops the task
/// and its timers.
#[derive(Clone)]
pub struct EngineHandle {
    tx: mpsc::Sender<EngineCommand>,
}

impl EngineHandle {
    pub async fn submit(&self, current: WeatherSample, forecast: ForecastSeries) {
        self.send(EngineCommand::Submit { current, forecast }).await;
    }

    pub async fn notify_best_times(&self, slots: Vec<TimeSlot>) {
        self.send(EngineCommand::NotifyBestTimes { slots }).await;
    }

    pub async fn mark_read(&self, id: Uuid) {
        self.send(EngineCommand::MarkRead { id }).await;
    }

    pub async fn remove(&self, id: Uuid) {
        self.send(EngineCommand::Remove { id }).await;
    }

    pub async fn clear(&self) {
        self.send(EngineCommand::Clear).await;
    }

    pub async fn set_alerts_enabled(&self, enabled: bool) {
        self.send(EngineCommand::SetAlertsEnabled { enabled }).await;
    }

    /// Snapshot of the queue, newest first.
    pub async fn notifications(&self) -> Vec<Notification> {
        let (reply, rx) = oneshot::channel();
        self.send(EngineCommand::List { reply }).await;
        rx.await.unwrap_or_default()
    }

    async fn send(&self, command: EngineCommand) {
        if self.tx.send(command).await.is_err() {
            tracing::warn!("engine task has stopped; command dropped");
        }
    }
}

/// Spawn the engine event loop.
///
/// The task re-runs the analysis on the most recent data every
/// `analysis_interval` and sweeps expired low-priority notifications once
/// a second. Single-threaded from the engine's point of view: one command
/// or timer fires at a time, and each pass runs to completion before the
/// next.
pub fn spawn_engine(
    mut engine: NotificationEngine,
    analysis_interval: std::time::Duration,
) -> (EngineHandle, JoinHandle<()>) {
    let (tx, mut rx) = mpsc::channel::<EngineCommand>(32);

    let task = tokio::spawn(async move {
        let mut reanalyze = tokio::time::interval(analysis_interval);
        reanalyze.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        let mut purge = tokio::time::interval(std::time::Duration::from_secs(1));
        purge.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        let mut latest: Option<(WeatherSample, ForecastSeries)> = None;

        loop {
            tokio::select! {
                maybe_command = rx.recv() => {
                    match maybe_command {
                        Some(command) => apply(&mut engine, &mut latest, command),
                        None => break,
                    }
                }
                _ = reanalyze.tick() => {
                    if let Some((current, forecast)) = latest.as_ref() {
                        engine.analyze(current, forecast);
                    }
                }
                _ = purge.tick() => {
                    engine.purge_expired();
                }
            }
        }
        tracing::debug!("notification engine task stopped");
    });

    (EngineHandle { tx }, task)
}

fn apply(
    engine: &mut NotificationEngine,
    latest: &mut Option<(WeatherSample, ForecastSeries)>,
    command: EngineCommand,
) {
    match command {
        EngineCommand::Submit { current, forecast } => {
            engine.analyze(&current, &forecast);
            *latest = Some((current, forecast));
        }
        EngineCommand::NotifyBestTimes { slots } => {
            engine.notify_best_times(&slots);
        }
        EngineCommand::MarkRead { id } => {
            engine.mark_read(id);
        }
        EngineCommand::Remove { id } => {
            engine.remove(id);
        }
        EngineCommand::Clear => engine.clear(),
        EngineCommand::SetAlertsEnabled { enabled } => engine.set_alerts_enabled(enabled),
        EngineCommand::List { reply } => {
            let _ = reply.send(engine.snapshot());
        }
    }
}
