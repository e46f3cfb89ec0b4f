//! Mocks and fixtures shared by the meeting handler tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::domain::calendar::{BusinessCalendar, Frequency, SaturdayPolicy};
use crate::domain::foundation::{Actor, DomainError, ErrorCode, MeetingId, Timestamp, UserId};
use crate::domain::meeting::{MeetingDetails, MeetingStatus, RecurringMeeting, StakeholderRef, UserRef};
use crate::ports::{
    ChannelOutcome, Clock, DispatchResult, MeetingRepository, NotificationDispatcher,
    NotificationKind,
};

// ════════════════════════════════════════════════════════════════════════════════
// Mock Implementations
// ════════════════════════════════════════════════════════════════════════════════

pub struct MockMeetingRepository {
    meetings: Mutex<HashMap<MeetingId, RecurringMeeting>>,
    conflict_on_save: AtomicBool,
}

impl MockMeetingRepository {
    pub fn with(meetings: Vec<RecurringMeeting>) -> Self {
        Self {
            meetings: Mutex::new(meetings.into_iter().map(|m| (m.id, m)).collect()),
            conflict_on_save: AtomicBool::new(false),
        }
    }

    pub fn reject_saves_with_conflict(&self) {
        self.conflict_on_save.store(true, Ordering::SeqCst);
    }

    pub fn get(&self, id: &MeetingId) -> RecurringMeeting {
        self.meetings.lock().unwrap().get(id).cloned().unwrap()
    }

    pub fn len(&self) -> usize {
        self.meetings.lock().unwrap().len()
    }
}

#[async_trait]
impl MeetingRepository for MockMeetingRepository {
    async fn save(&self, meeting: &RecurringMeeting) -> Result<u64, DomainError> {
        if self.conflict_on_save.load(Ordering::SeqCst) {
            return Err(
                DomainError::new(ErrorCode::ConcurrencyConflict, "stale version")
                    .with_detail("meeting_id", meeting.id.to_string()),
            );
        }
        let mut stored = meeting.clone();
        stored.version += 1;
        let version = stored.version;
        self.meetings.lock().unwrap().insert(meeting.id, stored);
        Ok(version)
    }

    async fn find_by_id(&self, id: &MeetingId) -> Result<Option<RecurringMeeting>, DomainError> {
        Ok(self.meetings.lock().unwrap().get(id).cloned())
    }

    async fn find_active(&self) -> Result<Vec<RecurringMeeting>, DomainError> {
        Ok(self
            .meetings
            .lock()
            .unwrap()
            .values()
            .filter(|m| m.active)
            .cloned()
            .collect())
    }

    async fn find_active_scheduled(&self) -> Result<Vec<RecurringMeeting>, DomainError> {
        Ok(self
            .meetings
            .lock()
            .unwrap()
            .values()
            .filter(|m| m.active && m.status == MeetingStatus::Scheduled)
            .cloned()
            .collect())
    }
}

#[derive(Debug)]
pub struct StaticClock(pub NaiveDate);

impl Clock for StaticClock {
    fn now(&self) -> Timestamp {
        Timestamp::now()
    }

    fn today(&self) -> NaiveDate {
        self.0
    }
}

pub struct MockDispatcher {
    calls: Mutex<Vec<(NotificationKind, UserId)>>,
    email: ChannelOutcome,
}

impl MockDispatcher {
    pub fn delivering() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            email: ChannelOutcome::Delivered,
        }
    }

    pub fn failing() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            email: ChannelOutcome::Failed("smtp relay down".to_string()),
        }
    }

    pub fn count(&self, kind: NotificationKind) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|(k, _)| *k == kind)
            .count()
    }

    fn record(&self, kind: NotificationKind, user: &UserRef) -> DispatchResult {
        self.calls.lock().unwrap().push((kind, user.id.clone()));
        DispatchResult::new(self.email.clone(), ChannelOutcome::Skipped)
    }
}

#[async_trait]
impl NotificationDispatcher for MockDispatcher {
    async fn send_reminder(&self, user: &UserRef, _meeting: &RecurringMeeting) -> DispatchResult {
        self.record(NotificationKind::Reminder, user)
    }

    async fn send_check_in(&self, user: &UserRef, _meeting: &RecurringMeeting) -> DispatchResult {
        self.record(NotificationKind::CheckIn, user)
    }

    async fn send_meeting_created(
        &self,
        user: &UserRef,
        _meeting: &RecurringMeeting,
    ) -> DispatchResult {
        self.record(NotificationKind::MeetingCreated, user)
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Fixtures
// ════════════════════════════════════════════════════════════════════════════════

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn calendar() -> BusinessCalendar {
    BusinessCalendar::new(SaturdayPolicy::None)
}

pub fn user_ref(id: &str) -> UserRef {
    UserRef::new(UserId::new(id).unwrap(), id, format!("{}@example.com", id), None).unwrap()
}

pub fn admin_actor() -> Actor {
    Actor::admin(UserId::new("admin-1").unwrap())
}

/// Assigned to the meeting built by [`weekly_meeting`].
pub fn assignee_actor() -> Actor {
    Actor::user(UserId::new("u-1").unwrap())
}

/// Weekly meeting anchored on Wed 2026-03-11, created by `creator-1`.
pub fn weekly_meeting() -> RecurringMeeting {
    RecurringMeeting::schedule(
        MeetingId::new(),
        MeetingDetails {
            title: "Vendor sync".to_string(),
            stakeholder: StakeholderRef::new("Kim Park", Some("Globex".to_string())).unwrap(),
            frequency: Frequency::Weekly,
            assigned_to: vec![user_ref("u-1"), user_ref("u-2")],
            notes: None,
        },
        date(2026, 3, 11),
        UserId::new("creator-1").unwrap(),
    )
    .unwrap()
}
