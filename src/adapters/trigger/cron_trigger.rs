//! CronTrigger - background service that fires scheduler passes.
//!
//! Each pass has its own cron expression, evaluated in the organisation's
//! timezone. When several passes fall due at the same instant they run in
//! tick order (reminder, check-in, rollover).
//!
//! ## Configuration
//!
//! | Setting | Default | Description |
//! |---------|---------|-------------|
//! | `reminder_cron` | `0 8 * * Mon-Sat` | Reminder pass |
//! | `check_in_cron` | `0 15 * * Mon-Sat` | Check-in pass |
//! | `rollover_cron` | `30 23 * * Mon-Sat` | Rollover pass |
//! | `batch_timeout` | 300s | Upper bound on a single pass |
//! | `run_on_startup` | false | Run a full tick before waiting |
//!
//! Expressions use five fields (minute hour day month weekday). Prefer
//! weekday names over numbers: the underlying parser counts Sunday as 1.
//!
//! ## Graceful Shutdown
//!
//! The service listens on a `watch` channel and stops between passes. A
//! pass that exceeds `batch_timeout` is abandoned; meetings it did not reach
//! are picked up by the next firing through the catch-up window.

use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use cron::Schedule;
use tokio::sync::watch;
use tokio::time;

use crate::application::handlers::scheduler::{MeetingLifecycleScheduler, PassKind, PassReport};
use crate::domain::foundation::DomainError;

/// Configuration for the CronTrigger service.
#[derive(Debug, Clone)]
pub struct CronTriggerConfig {
    pub reminder_cron: String,
    pub check_in_cron: String,
    pub rollover_cron: String,

    /// Timezone the expressions are evaluated in.
    pub timezone: Tz,

    /// Maximum time a single pass may run.
    pub batch_timeout: Duration,

    /// Run reminder, check-in and rollover once at startup.
    pub run_on_startup: bool,
}

impl Default for CronTriggerConfig {
    fn default() -> Self {
        Self {
            reminder_cron: "0 8 * * Mon-Sat".to_string(),
            check_in_cron: "0 15 * * Mon-Sat".to_string(),
            rollover_cron: "30 23 * * Mon-Sat".to_string(),
            timezone: chrono_tz::UTC,
            batch_timeout: Duration::from_secs(300),
            run_on_startup: false,
        }
    }
}

impl CronTriggerConfig {
    pub fn with_timezone(mut self, tz: Tz) -> Self {
        self.timezone = tz;
        self
    }

    pub fn with_cron(mut self, pass: PassKind, expr: impl Into<String>) -> Self {
        let expr = expr.into();
        match pass {
            PassKind::Reminder => self.reminder_cron = expr,
            PassKind::CheckIn => self.check_in_cron = expr,
            PassKind::Rollover => self.rollover_cron = expr,
        }
        self
    }

    pub fn with_batch_timeout(mut self, timeout: Duration) -> Self {
        self.batch_timeout = timeout;
        self
    }

    pub fn with_run_on_startup(mut self, run: bool) -> Self {
        self.run_on_startup = run;
        self
    }

    fn expression(&self, pass: PassKind) -> &str {
        match pass {
            PassKind::Reminder => &self.reminder_cron,
            PassKind::CheckIn => &self.check_in_cron,
            PassKind::Rollover => &self.rollover_cron,
        }
    }
}

/// Parse a five-field cron expression.
///
/// The cron crate expects a leading seconds field, so one is added.
pub fn parse_cron(expr: &str) -> Result<Schedule, DomainError> {
    let full_expr = format!("0 {}", expr.trim());
    Schedule::from_str(&full_expr).map_err(|e| {
        DomainError::validation("cron", format!("Invalid cron expression '{}': {}", expr, e))
    })
}

/// Background service that runs scheduler passes on their cron schedules.
pub struct CronTrigger {
    scheduler: Arc<MeetingLifecycleScheduler>,
    schedules: Vec<(PassKind, Schedule)>,
    config: CronTriggerConfig,
}

impl CronTrigger {
    /// Parses every expression up front; an invalid one fails construction.
    pub fn new(
        scheduler: Arc<MeetingLifecycleScheduler>,
        config: CronTriggerConfig,
    ) -> Result<Self, DomainError> {
        let schedules = PassKind::TICK_ORDER
            .iter()
            .map(|pass| parse_cron(config.expression(*pass)).map(|s| (*pass, s)))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            scheduler,
            schedules,
            config,
        })
    }

    /// Next instant strictly after `after` at which any pass fires, with the
    /// passes due then in tick order.
    pub fn next_fire(&self, after: DateTime<Utc>) -> Option<(DateTime<Utc>, Vec<PassKind>)> {
        let local = after.with_timezone(&self.config.timezone);
        let upcoming: Vec<(PassKind, DateTime<Utc>)> = self
            .schedules
            .iter()
            .filter_map(|(pass, schedule)| {
                schedule
                    .after(&local)
                    .next()
                    .map(|at| (*pass, at.with_timezone(&Utc)))
            })
            .collect();

        let earliest = upcoming.iter().map(|(_, at)| *at).min()?;
        let passes = upcoming
            .into_iter()
            .filter(|(_, at)| *at == earliest)
            .map(|(pass, _)| pass)
            .collect();
        Some((earliest, passes))
    }

    /// Run the trigger loop until shutdown signal is received.
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) -> Result<(), DomainError> {
        tracing::info!(
            timezone = %self.config.timezone,
            reminder = %self.config.reminder_cron,
            check_in = %self.config.check_in_cron,
            rollover = %self.config.rollover_cron,
            "Cron trigger started"
        );

        if self.config.run_on_startup {
            self.run_tick().await;
        }

        loop {
            let now = Utc::now();
            let Some((at, passes)) = self.next_fire(now) else {
                tracing::warn!("No upcoming cron firings, trigger stopping");
                return Ok(());
            };
            let wait = (at - now).to_std().unwrap_or(Duration::ZERO);
            tracing::debug!(next_fire = %at, passes = ?passes, "Waiting for next firing");

            tokio::select! {
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        tracing::info!("Cron trigger shutting down");
                        return Ok(());
                    }
                }

                _ = time::sleep(wait) => {
                    for pass in passes {
                        self.fire(pass).await;
                    }
                }
            }
        }
    }

    /// Runs all three passes in tick order.
    pub async fn run_tick(&self) -> Vec<PassReport> {
        let mut reports = Vec::new();
        for pass in PassKind::TICK_ORDER {
            if let Some(report) = self.fire(pass).await {
                reports.push(report);
            }
        }
        reports
    }

    /// Runs one pass bounded by the batch timeout.
    ///
    /// Errors are logged, not returned; the next firing tries again.
    pub async fn fire(&self, pass: PassKind) -> Option<PassReport> {
        match time::timeout(self.config.batch_timeout, self.scheduler.run_pass(pass)).await {
            Ok(Ok(report)) => Some(report),
            Ok(Err(e)) => {
                tracing::error!(pass = %pass, error = %e, "Scheduler pass failed");
                None
            }
            Err(_) => {
                tracing::error!(
                    pass = %pass,
                    timeout_secs = self.config.batch_timeout.as_secs(),
                    "Scheduler pass timed out"
                );
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::clock::FixedClock;
    use crate::adapters::notification::RecordingDispatcher;
    use crate::adapters::storage::InMemoryMeetingRepository;
    use crate::application::handlers::scheduler::LifecycleSettings;
    use crate::domain::calendar::{BusinessCalendar, Frequency, SaturdayPolicy};
    use crate::domain::foundation::{MeetingId, UserId};
    use crate::domain::meeting::{MeetingDetails, RecurringMeeting, StakeholderRef, UserRef};
    use crate::ports::{MeetingRepository, NotificationKind};
    use chrono::{NaiveDate, TimeZone};
    use chrono_tz::Asia::Kolkata;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn scheduler_on(
        today: NaiveDate,
    ) -> (
        Arc<MeetingLifecycleScheduler>,
        Arc<InMemoryMeetingRepository>,
        Arc<RecordingDispatcher>,
    ) {
        let repo = Arc::new(InMemoryMeetingRepository::new());
        let dispatcher = Arc::new(RecordingDispatcher::new());
        let scheduler = Arc::new(MeetingLifecycleScheduler::new(
            repo.clone(),
            dispatcher.clone(),
            Arc::new(FixedClock::on_date(today, chrono_tz::UTC)),
            BusinessCalendar::new(SaturdayPolicy::None),
            LifecycleSettings::default(),
        ));
        (scheduler, repo, dispatcher)
    }

    fn weekly_meeting(anchor: NaiveDate) -> RecurringMeeting {
        let user =
            UserRef::new(UserId::new("u-1").unwrap(), "Ana", "ana@example.com", None).unwrap();
        RecurringMeeting::schedule(
            MeetingId::new(),
            MeetingDetails {
                title: "Vendor sync".to_string(),
                stakeholder: StakeholderRef::new("Kim Park", None).unwrap(),
                frequency: Frequency::Weekly,
                assigned_to: vec![user],
                notes: None,
            },
            anchor,
            UserId::new("u-1").unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn parse_cron_accepts_five_fields_with_day_names() {
        assert!(parse_cron("0 8 * * Mon-Sat").is_ok());
        assert!(parse_cron("30 23 * * Mon-Fri").is_ok());
    }

    #[test]
    fn parse_cron_rejects_garbage() {
        let err = parse_cron("every morning").unwrap_err();
        assert_eq!(err.details.get("field").map(String::as_str), Some("cron"));
    }

    #[test]
    fn invalid_expression_fails_construction() {
        let (scheduler, _, _) = scheduler_on(date(2026, 3, 9));
        let config = CronTriggerConfig::default().with_cron(PassKind::CheckIn, "61 * * * *");

        assert!(CronTrigger::new(scheduler, config).is_err());
    }

    #[test]
    fn next_fire_is_evaluated_in_configured_timezone() {
        let (scheduler, _, _) = scheduler_on(date(2026, 3, 9));
        let trigger =
            CronTrigger::new(scheduler, CronTriggerConfig::default().with_timezone(Kolkata))
                .unwrap();

        // Mon 2026-03-09 00:00 UTC is 05:30 in Kolkata; next is 08:00 local.
        let after = Utc.with_ymd_and_hms(2026, 3, 9, 0, 0, 0).unwrap();
        let (at, passes) = trigger.next_fire(after).unwrap();

        assert_eq!(at, Utc.with_ymd_and_hms(2026, 3, 9, 2, 30, 0).unwrap());
        assert_eq!(passes, vec![PassKind::Reminder]);
    }

    #[test]
    fn next_fire_skips_sunday() {
        let (scheduler, _, _) = scheduler_on(date(2026, 3, 9));
        let trigger = CronTrigger::new(scheduler, CronTriggerConfig::default()).unwrap();

        // Sat 2026-03-07 23:45 UTC: Sunday has no firings, Monday 08:00 is next.
        let after = Utc.with_ymd_and_hms(2026, 3, 7, 23, 45, 0).unwrap();
        let (at, passes) = trigger.next_fire(after).unwrap();

        assert_eq!(at, Utc.with_ymd_and_hms(2026, 3, 9, 8, 0, 0).unwrap());
        assert_eq!(passes, vec![PassKind::Reminder]);
    }

    #[test]
    fn coincident_passes_come_back_in_tick_order() {
        let (scheduler, _, _) = scheduler_on(date(2026, 3, 9));
        let config = CronTriggerConfig::default()
            .with_cron(PassKind::Rollover, "0 18 * * *")
            .with_cron(PassKind::CheckIn, "0 18 * * *");
        let trigger = CronTrigger::new(scheduler, config).unwrap();

        let after = Utc.with_ymd_and_hms(2026, 3, 9, 12, 0, 0).unwrap();
        let (_, passes) = trigger.next_fire(after).unwrap();

        assert_eq!(passes, vec![PassKind::CheckIn, PassKind::Rollover]);
    }

    #[tokio::test]
    async fn run_tick_drives_all_passes() {
        // Mon 2026-03-09 opens the week of a meeting anchored on Wed 03-11.
        let (scheduler, repo, dispatcher) = scheduler_on(date(2026, 3, 9));
        let meeting = weekly_meeting(date(2026, 3, 11));
        repo.save(&meeting).await.unwrap();
        let trigger = CronTrigger::new(scheduler, CronTriggerConfig::default()).unwrap();

        let reports = trigger.run_tick().await;

        assert_eq!(reports.len(), 3);
        assert_eq!(dispatcher.count(NotificationKind::Reminder), 1);
        assert_eq!(dispatcher.count(NotificationKind::CheckIn), 0);
        assert!(repo.find_by_id(&meeting.id).await.unwrap().unwrap().reminder_sent);
    }

    #[tokio::test]
    async fn run_stops_on_shutdown_signal() {
        let (scheduler, _, _) = scheduler_on(date(2026, 3, 9));
        let trigger = Arc::new(CronTrigger::new(scheduler, CronTriggerConfig::default()).unwrap());
        let (tx, rx) = watch::channel(false);

        let handle = {
            let trigger = trigger.clone();
            tokio::spawn(async move { trigger.run(rx).await })
        };
        tx.send(true).unwrap();

        let result = time::timeout(Duration::from_secs(5), handle).await;
        assert!(matches!(result, Ok(Ok(Ok(())))));
    }

    #[tokio::test]
    async fn run_on_startup_fires_before_waiting() {
        let (scheduler, repo, dispatcher) = scheduler_on(date(2026, 3, 9));
        repo.save(&weekly_meeting(date(2026, 3, 11))).await.unwrap();
        let config = CronTriggerConfig::default().with_run_on_startup(true);
        let trigger = Arc::new(CronTrigger::new(scheduler, config).unwrap());
        let (tx, rx) = watch::channel(false);

        let handle = {
            let trigger = trigger.clone();
            tokio::spawn(async move { trigger.run(rx).await })
        };
        // Startup tick completes before the loop starts waiting.
        for _ in 0..50 {
            if dispatcher.count(NotificationKind::Reminder) > 0 {
                break;
            }
            time::sleep(Duration::from_millis(20)).await;
        }
        tx.send(true).unwrap();
        handle.await.unwrap().unwrap();

        assert_eq!(dispatcher.count(NotificationKind::Reminder), 1);
    }
}
