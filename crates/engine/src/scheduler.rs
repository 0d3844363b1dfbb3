//! Tick-driven scheduler for reminders and week rollover.
//!
//! A single loop wakes on a fixed interval, checks which wall-clock slots
//! the current minute matches, and fires each at most once per slot per
//! day. Delivery failures and transient database errors are logged and
//! retried implicitly on the next matching tick; they never stop the loop.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Datelike, NaiveDate, Timelike, Utc, Weekday};
use tokio_util::sync::CancellationToken;

use crate::dispatch::NotificationDispatcher;
use crate::lifecycle::Rollover;
use crate::reminder;
use crate::service::RotaService;

const DEFAULT_TICK_SECS: u64 = 60;

/// Wall-clock slots, all UTC.
#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    /// Days on which reminders go out.
    pub reminder_days: Vec<Weekday>,
    /// Hours (at minute zero) on which reminders go out.
    pub reminder_hours: Vec<u32>,
    pub rollover_hour: u32,
    pub rollover_minute: u32,
    /// How often the loop wakes to check slots.
    pub tick: Duration,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            reminder_days: vec![Weekday::Tue, Weekday::Fri],
            reminder_hours: vec![10, 18],
            rollover_hour: 23,
            rollover_minute: 59,
            tick: Duration::from_secs(DEFAULT_TICK_SECS),
        }
    }
}

impl SchedulerConfig {
    /// Defaults, with the tick interval overridable via
    /// `SCHEDULER_TICK_SECS`.
    pub fn from_env() -> Self {
        let tick_secs: u64 = std::env::var("SCHEDULER_TICK_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_TICK_SECS);
        Self {
            tick: Duration::from_secs(tick_secs),
            ..Self::default()
        }
    }

    /// The reminder slot key matching `now`, if any. Slots are minute
    /// zero of the configured hours on the configured days.
    fn reminder_slot(&self, now: DateTime<Utc>) -> Option<String> {
        if !self.reminder_days.contains(&now.weekday()) {
            return None;
        }
        if now.minute() != 0 || !self.reminder_hours.contains(&now.hour()) {
            return None;
        }
        Some(format!("reminder-{:02}", now.hour()))
    }

    fn rollover_slot(&self, now: DateTime<Utc>) -> Option<String> {
        (now.hour() == self.rollover_hour && now.minute() == self.rollover_minute)
            .then(|| "rollover".to_string())
    }
}

/// Keys fired so far today. Clears itself on day change, so the set never
/// grows past one day's worth of slots.
#[derive(Debug)]
struct FiredSlots {
    day: NaiveDate,
    keys: HashSet<String>,
}

impl FiredSlots {
    fn new(day: NaiveDate) -> Self {
        Self {
            day,
            keys: HashSet::new(),
        }
    }

    fn roll_to(&mut self, day: NaiveDate) {
        if day != self.day {
            self.day = day;
            self.keys.clear();
        }
    }

    fn contains(&self, key: &str) -> bool {
        self.keys.contains(key)
    }

    /// True the first time a key fires today.
    fn fire(&mut self, key: String) -> bool {
        self.keys.insert(key)
    }
}

/// Run the scheduler loop until `cancel` is triggered.
pub async fn run(
    service: RotaService,
    dispatcher: Arc<dyn NotificationDispatcher>,
    config: SchedulerConfig,
    cancel: CancellationToken,
) {
    tracing::info!(
        reminder_days = ?config.reminder_days,
        reminder_hours = ?config.reminder_hours,
        rollover = format!("{:02}:{:02}", config.rollover_hour, config.rollover_minute),
        tick_secs = config.tick.as_secs(),
        "Scheduler started"
    );

    let mut interval = tokio::time::interval(config.tick);
    let mut fired = FiredSlots::new(Utc::now().date_naive());

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Scheduler stopping");
                break;
            }
            _ = interval.tick() => {
                tick(&service, dispatcher.as_ref(), &config, &mut fired, Utc::now()).await;
            }
        }
    }
}

/// One scheduler wake-up. A slot key is consumed only after its body ran
/// without a transient failure, so an errored slot is retried on the next
/// matching tick instead of being lost for the rest of the day.
async fn tick(
    service: &RotaService,
    dispatcher: &dyn NotificationDispatcher,
    config: &SchedulerConfig,
    fired: &mut FiredSlots,
    now: DateTime<Utc>,
) {
    fired.roll_to(now.date_naive());

    if let Some(key) = config.reminder_slot(now) {
        if !fired.contains(&key) && send_reminder(service, dispatcher).await {
            fired.fire(key);
        }
    } else if let Some(key) = config.rollover_slot(now) {
        if !fired.contains(&key) && run_rollover(service, dispatcher).await {
            fired.fire(key);
        }
    }
}

/// Returns true when the slot is settled: the reminder was delivered, or
/// a domain condition means there is nothing to deliver.
async fn send_reminder(service: &RotaService, dispatcher: &dyn NotificationDispatcher) -> bool {
    match service.build_reminder_payload().await {
        Ok(payload) => {
            tracing::info!(done = payload.done, "Sending reminder");
            if let Err(e) = dispatcher.send(&payload.message).await {
                tracing::error!(error = %e, "Reminder dispatch failed");
                return false;
            }
            true
        }
        Err(e) if e.domain().is_some() => {
            tracing::debug!(error = %e, "Reminder skipped");
            true
        }
        Err(e) => {
            tracing::error!(error = %e, "Reminder check failed");
            false
        }
    }
}

/// Returns true when the rollover check committed. Dispatch failures after
/// the commit are logged but do not re-arm the slot; the state change
/// cannot be replayed.
async fn run_rollover(service: &RotaService, dispatcher: &dyn NotificationDispatcher) -> bool {
    match service.check_and_rollover().await {
        Ok(Rollover::NotDue) => {
            tracing::debug!("Rollover not due");
            true
        }
        Ok(Rollover::Started { ensured }) => {
            let announcement = reminder::new_week_announcement(&ensured, service.targets());
            if let Err(e) = dispatcher.send(&announcement).await {
                tracing::error!(error = %e, "New-week announcement dispatch failed");
            }
            true
        }
        Ok(Rollover::RolledOver { snapshot, ensured }) => {
            let summary = reminder::rollover_summary(&snapshot);
            if let Err(e) = dispatcher.send(&summary).await {
                tracing::error!(error = %e, "Rollover summary dispatch failed");
            }
            let announcement = reminder::new_week_announcement(&ensured, service.targets());
            if let Err(e) = dispatcher.send(&announcement).await {
                tracing::error!(error = %e, "New-week announcement dispatch failed");
            }
            true
        }
        Err(e) => {
            tracing::error!(error = %e, "Rollover check failed");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use chrono::TimeZone;
    use sqlx::PgPool;

    use rota_core::CategoryTargets;
    use rota_db::seed::seed_task_types;

    use super::*;
    use crate::lifecycle::ensure_active_week;

    /// Dispatcher that refuses the first `failures` deliveries and records
    /// the rest.
    struct FlakyDispatcher {
        failures: AtomicUsize,
        sent: Mutex<Vec<String>>,
    }

    impl FlakyDispatcher {
        fn failing(failures: usize) -> Self {
            Self {
                failures: AtomicUsize::new(failures),
                sent: Mutex::new(Vec::new()),
            }
        }

        fn sent_count(&self) -> usize {
            self.sent.lock().unwrap().len()
        }
    }

    #[async_trait::async_trait]
    impl NotificationDispatcher for FlakyDispatcher {
        async fn send(&self, text: &str) -> anyhow::Result<()> {
            if self
                .failures
                .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
                .is_ok()
            {
                anyhow::bail!("delivery refused");
            }
            self.sent.lock().unwrap().push(text.to_string());
            Ok(())
        }
    }

    fn at(weekday_date: (i32, u32, u32), h: u32, m: u32) -> DateTime<Utc> {
        let (y, mo, d) = weekday_date;
        Utc.with_ymd_and_hms(y, mo, d, h, m, 0).unwrap()
    }

    // 2025-01-14 is a Tuesday, 2025-01-15 a Wednesday.

    #[test]
    fn reminder_slot_matches_configured_days_and_hours() {
        let config = SchedulerConfig::default();
        assert_eq!(
            config.reminder_slot(at((2025, 1, 14), 10, 0)),
            Some("reminder-10".to_string())
        );
        assert_eq!(
            config.reminder_slot(at((2025, 1, 14), 18, 0)),
            Some("reminder-18".to_string())
        );
        // Wrong day, wrong hour, wrong minute.
        assert_eq!(config.reminder_slot(at((2025, 1, 15), 10, 0)), None);
        assert_eq!(config.reminder_slot(at((2025, 1, 14), 11, 0)), None);
        assert_eq!(config.reminder_slot(at((2025, 1, 14), 10, 1)), None);
    }

    #[test]
    fn rollover_slot_matches_exact_minute() {
        let config = SchedulerConfig::default();
        assert!(config.rollover_slot(at((2025, 1, 15), 23, 59)).is_some());
        assert!(config.rollover_slot(at((2025, 1, 15), 23, 58)).is_none());
        assert!(config.rollover_slot(at((2025, 1, 15), 22, 59)).is_none());
    }

    #[sqlx::test(migrations = "../db/migrations")]
    async fn failed_dispatch_leaves_slot_armed(pool: PgPool) {
        seed_task_types(&pool).await.unwrap();
        // Tuesday 10:00, a reminder slot.
        let slot = Utc.with_ymd_and_hms(2025, 1, 14, 10, 0, 0).unwrap();
        ensure_active_week(&pool, slot).await.unwrap();

        let service = RotaService::new(pool, CategoryTargets::default());
        let config = SchedulerConfig::default();
        let dispatcher = FlakyDispatcher::failing(1);
        let mut fired = FiredSlots::new(slot.date_naive());

        // Delivery fails, so the slot stays armed for the next wake-up.
        tick(&service, &dispatcher, &config, &mut fired, slot).await;
        assert!(!fired.contains("reminder-10"));
        assert_eq!(dispatcher.sent_count(), 0);

        // A later wake-up in the same minute retries and settles the slot.
        let retry = slot + chrono::Duration::seconds(30);
        tick(&service, &dispatcher, &config, &mut fired, retry).await;
        assert!(fired.contains("reminder-10"));
        assert_eq!(dispatcher.sent_count(), 1);

        tick(&service, &dispatcher, &config, &mut fired, retry).await;
        assert_eq!(dispatcher.sent_count(), 1);
    }

    #[test]
    fn fired_slots_dedupe_within_a_day_and_reset_across_days() {
        let day1 = NaiveDate::from_ymd_opt(2025, 1, 14).unwrap();
        let day2 = NaiveDate::from_ymd_opt(2025, 1, 15).unwrap();
        let mut fired = FiredSlots::new(day1);

        assert!(fired.fire("reminder-10".to_string()));
        assert!(!fired.fire("reminder-10".to_string()));
        assert!(fired.fire("rollover".to_string()));

        fired.roll_to(day1);
        assert!(!fired.fire("reminder-10".to_string()));

        fired.roll_to(day2);
        assert!(fired.fire("reminder-10".to_string()));
    }
}
