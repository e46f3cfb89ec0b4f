//! Integration tests for the meeting lifecycle.
//!
//! These tests drive a meeting through several cycles:
//! 1. Create the meeting (assignees are notified)
//! 2. Advance a fixed clock day by day and run scheduler ticks
//! 3. Close cycles manually through the command handlers
//! 4. Check flags, anchors and compliance after each step
//!
//! Uses in-memory and file adapters, no external services.

use std::sync::Arc;

use chrono::NaiveDate;
use chrono_tz::Tz;

use meeting_scheduler::adapters::{
    FileMeetingRepository, FixedClock, InMemoryMeetingRepository, RecordingDispatcher,
};
use meeting_scheduler::application::handlers::{
    AddMinutesOfMeetingCommand, AddMinutesOfMeetingHandler, AssigneeInput, CreateMeetingCommand,
    CreateMeetingHandler, DeactivateMeetingCommand, DeactivateMeetingHandler, DispatchPolicy,
    LifecycleSettings, MeetingLifecycleScheduler, PassKind,
};
use meeting_scheduler::domain::calendar::{BusinessCalendar, Frequency, SaturdayPolicy};
use meeting_scheduler::domain::foundation::{Actor, MeetingId, UserId};
use meeting_scheduler::domain::meeting::{MeetingStatus, RecurringMeeting, NO_MINUTES_REASON};
use meeting_scheduler::ports::{MeetingRepository, NotificationKind};

// =============================================================================
// Test Infrastructure
// =============================================================================

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn calendar() -> BusinessCalendar {
    BusinessCalendar::new(SaturdayPolicy::None)
}

fn owner() -> Actor {
    Actor::user(UserId::new("u-1").unwrap())
}

struct Harness {
    repository: Arc<dyn MeetingRepository>,
    dispatcher: Arc<RecordingDispatcher>,
    clock: Arc<FixedClock>,
    scheduler: MeetingLifecycleScheduler,
}

impl Harness {
    fn new(repository: Arc<dyn MeetingRepository>, start: NaiveDate) -> Self {
        let dispatcher = Arc::new(RecordingDispatcher::new());
        let clock = Arc::new(FixedClock::on_date(start, Tz::UTC));
        let scheduler = MeetingLifecycleScheduler::new(
            repository.clone(),
            dispatcher.clone(),
            clock.clone(),
            calendar(),
            LifecycleSettings::default(),
        );
        Self {
            repository,
            dispatcher,
            clock,
            scheduler,
        }
    }

    fn in_memory(start: NaiveDate) -> Self {
        Self::new(Arc::new(InMemoryMeetingRepository::new()), start)
    }

    async fn create_weekly(&self, anchor: NaiveDate) -> MeetingId {
        let handler = CreateMeetingHandler::new(
            self.repository.clone(),
            self.dispatcher.clone(),
            self.clock.clone(),
            calendar(),
            DispatchPolicy::default(),
        );
        let result = handler
            .handle(CreateMeetingCommand {
                actor: owner(),
                title: "Vendor sync".to_string(),
                stakeholder_name: "Kim Park".to_string(),
                stakeholder_company: Some("Globex".to_string()),
                frequency: Frequency::Weekly,
                assigned_to: vec![
                    AssigneeInput {
                        id: "u-1".to_string(),
                        name: "Ana".to_string(),
                        email: "ana@example.com".to_string(),
                        mobile: None,
                    },
                    AssigneeInput {
                        id: "u-2".to_string(),
                        name: "Ben".to_string(),
                        email: "ben@example.com".to_string(),
                        mobile: Some("+15550100".to_string()),
                    },
                ],
                anchor_date: anchor,
                notes: None,
            })
            .await
            .unwrap();
        result.meeting.id
    }

    async fn tick_on(&self, day: NaiveDate) {
        self.clock.set_date(day);
        let reports = self.scheduler.run_tick().await.unwrap();
        let passes: Vec<PassKind> = reports.iter().map(|r| r.pass).collect();
        assert_eq!(passes, PassKind::TICK_ORDER.to_vec());
        for report in reports {
            assert!(report.failures.is_empty(), "{:?}", report.failures);
        }
    }

    async fn load(&self, id: MeetingId) -> RecurringMeeting {
        self.repository.find_by_id(&id).await.unwrap().unwrap()
    }
}

// =============================================================================
// Lifecycle Tests
// =============================================================================

#[tokio::test]
async fn weekly_meeting_runs_through_three_cycles() {
    let harness = Harness::in_memory(date(2026, 3, 9));
    let id = harness.create_weekly(date(2026, 3, 11)).await;
    assert_eq!(harness.dispatcher.count(NotificationKind::MeetingCreated), 2);

    // Week one: reminder Monday, nothing midweek, check-in and rollover Friday.
    harness.tick_on(date(2026, 3, 9)).await;
    assert!(harness.load(id).await.reminder_sent);
    assert_eq!(harness.dispatcher.count(NotificationKind::Reminder), 2);

    harness.tick_on(date(2026, 3, 11)).await;
    assert_eq!(harness.dispatcher.count(NotificationKind::Reminder), 2);
    assert_eq!(harness.dispatcher.count(NotificationKind::CheckIn), 0);

    harness.tick_on(date(2026, 3, 13)).await;
    let meeting = harness.load(id).await;
    assert_eq!(harness.dispatcher.count(NotificationKind::CheckIn), 2);
    assert_eq!(meeting.anchor_date, date(2026, 3, 18));
    assert_eq!(meeting.status, MeetingStatus::Scheduled);
    assert_eq!(meeting.compliance.total_missed, 1);
    assert_eq!(meeting.missed_reasons[0].reason, NO_MINUTES_REASON);
    assert!(!meeting.reminder_sent);
    assert!(!meeting.check_in_sent);

    // Week two: minutes recorded midweek close the cycle early.
    harness.tick_on(date(2026, 3, 16)).await;
    assert_eq!(harness.dispatcher.count(NotificationKind::Reminder), 4);

    let minutes = AddMinutesOfMeetingHandler::new(harness.repository.clone(), calendar());
    let result = minutes
        .handle(AddMinutesOfMeetingCommand {
            meeting_id: id,
            actor: owner(),
            date: date(2026, 3, 18),
            content: "Renewal agreed".to_string(),
            attendees: vec!["Ana".to_string(), "Kim".to_string()],
            action_items: Vec::new(),
        })
        .await
        .unwrap();
    assert_eq!(result.rollover.next_anchor, date(2026, 3, 25));

    // Friday of week two belongs to a closed cycle: no check-in, no rollover.
    harness.tick_on(date(2026, 3, 20)).await;
    let meeting = harness.load(id).await;
    assert_eq!(harness.dispatcher.count(NotificationKind::CheckIn), 2);
    assert_eq!(meeting.anchor_date, date(2026, 3, 25));
    assert_eq!(meeting.compliance.total_attended, 1);

    // Week three: the Friday run is missed, Saturday catches up.
    harness.tick_on(date(2026, 3, 23)).await;
    harness.tick_on(date(2026, 3, 28)).await;
    let meeting = harness.load(id).await;
    assert_eq!(harness.dispatcher.count(NotificationKind::CheckIn), 4);
    assert_eq!(meeting.anchor_date, date(2026, 4, 1));
    assert_eq!(meeting.compliance.total_scheduled, 4);
    assert_eq!(meeting.compliance.total_missed, 2);
    assert_eq!(meeting.compliance.percentage(), 33);
    assert_eq!(meeting.missed_reasons[1].date, date(2026, 3, 27));
}

#[tokio::test]
async fn meeting_left_behind_by_downtime_catches_up() {
    let harness = Harness::in_memory(date(2026, 3, 9));
    let id = harness.create_weekly(date(2026, 3, 11)).await;

    // No tick runs for three weeks.
    harness.tick_on(date(2026, 3, 30)).await;

    let meeting = harness.load(id).await;
    assert_eq!(meeting.anchor_date, date(2026, 4, 1));
    assert_eq!(meeting.compliance.total_scheduled, 4);
    assert_eq!(meeting.compliance.total_missed, 3);
    let missed_on: Vec<NaiveDate> = meeting.missed_reasons.iter().map(|r| r.date).collect();
    assert_eq!(
        missed_on,
        vec![date(2026, 3, 13), date(2026, 3, 20), date(2026, 3, 27)]
    );
    assert_eq!(harness.dispatcher.count(NotificationKind::CheckIn), 0);

    // The new cycle starts today, so the next tick sends its reminder.
    harness.tick_on(date(2026, 3, 30)).await;
    assert!(harness.load(id).await.reminder_sent);
    assert_eq!(harness.dispatcher.count(NotificationKind::Reminder), 2);
}

#[tokio::test]
async fn failed_reminder_is_retried_within_catch_up_window() {
    let harness = Harness::in_memory(date(2026, 3, 9));
    let id = harness.create_weekly(date(2026, 3, 11)).await;
    harness.dispatcher.fail_for(UserId::new("u-1").unwrap());
    harness.dispatcher.fail_for(UserId::new("u-2").unwrap());

    harness.clock.set_date(date(2026, 3, 9));
    let report = harness
        .scheduler
        .run_pass(PassKind::Reminder)
        .await
        .unwrap();
    assert_eq!(report.triggered, 1);
    assert_eq!(report.failures.len(), 1);
    assert!(report.failures[0].retryable);
    assert!(!harness.load(id).await.reminder_sent);

    harness.dispatcher.recover_all();
    harness.tick_on(date(2026, 3, 10)).await;
    assert!(harness.load(id).await.reminder_sent);
}

#[tokio::test]
async fn reminder_outside_catch_up_window_is_not_sent() {
    let harness = Harness::in_memory(date(2026, 3, 11));
    let id = harness.create_weekly(date(2026, 3, 11)).await;

    harness.tick_on(date(2026, 3, 11)).await;

    assert!(!harness.load(id).await.reminder_sent);
    assert_eq!(harness.dispatcher.count(NotificationKind::Reminder), 0);
}

#[tokio::test]
async fn deactivated_meeting_is_left_alone() {
    let harness = Harness::in_memory(date(2026, 3, 9));
    let id = harness.create_weekly(date(2026, 3, 11)).await;

    DeactivateMeetingHandler::new(harness.repository.clone())
        .handle(DeactivateMeetingCommand {
            meeting_id: id,
            actor: owner(),
        })
        .await
        .unwrap();

    harness.tick_on(date(2026, 3, 9)).await;
    harness.tick_on(date(2026, 3, 13)).await;

    let meeting = harness.load(id).await;
    assert!(!meeting.active);
    assert_eq!(meeting.anchor_date, date(2026, 3, 11));
    assert_eq!(harness.dispatcher.count(NotificationKind::Reminder), 0);
}

#[tokio::test]
async fn file_storage_keeps_state_between_instances() {
    let dir = tempfile::TempDir::new().unwrap();
    let harness = Harness::new(Arc::new(FileMeetingRepository::new(dir.path())), date(2026, 3, 9));
    let id = harness.create_weekly(date(2026, 3, 11)).await;

    harness.tick_on(date(2026, 3, 9)).await;
    harness.tick_on(date(2026, 3, 13)).await;

    let reopened = FileMeetingRepository::new(dir.path());
    let meeting = reopened.find_by_id(&id).await.unwrap().unwrap();
    assert_eq!(meeting.anchor_date, date(2026, 3, 18));
    assert_eq!(meeting.compliance.total_missed, 1);
    assert!(meeting.version >= 3);
}
