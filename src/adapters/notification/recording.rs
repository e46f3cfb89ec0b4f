//! Recording dispatcher for tests.
//!
//! Captures every notification instead of sending it, and can be told to
//! fail the email channel for selected users.
//!
//! # Panics
//!
//! Methods may panic if internal locks are poisoned. This adapter is for
//! tests and should not be used in production.

use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::Mutex;

use crate::domain::foundation::{MeetingId, UserId};
use crate::domain::meeting::{RecurringMeeting, UserRef};
use crate::ports::{ChannelOutcome, DispatchResult, NotificationDispatcher, NotificationKind};

/// One captured notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentNotification {
    pub kind: NotificationKind,
    pub meeting_id: MeetingId,
    pub user_id: UserId,
    pub delivered: bool,
}

#[derive(Debug, Default)]
pub struct RecordingDispatcher {
    sent: Mutex<Vec<SentNotification>>,
    failing: Mutex<HashSet<UserId>>,
}

impl RecordingDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes email delivery fail for `user_id` from now on.
    pub fn fail_for(&self, user_id: UserId) {
        self.failing.lock().expect("lock poisoned").insert(user_id);
    }

    /// Restores delivery for every user.
    pub fn recover_all(&self) {
        self.failing.lock().expect("lock poisoned").clear();
    }

    pub fn sent(&self) -> Vec<SentNotification> {
        self.sent.lock().expect("lock poisoned").clone()
    }

    pub fn count(&self, kind: NotificationKind) -> usize {
        self.sent
            .lock()
            .expect("lock poisoned")
            .iter()
            .filter(|n| n.kind == kind)
            .count()
    }

    pub fn clear(&self) {
        self.sent.lock().expect("lock poisoned").clear();
    }

    fn record(&self, kind: NotificationKind, user: &UserRef, meeting: &RecurringMeeting) -> DispatchResult {
        let failing = self.failing.lock().expect("lock poisoned").contains(&user.id);
        self.sent.lock().expect("lock poisoned").push(SentNotification {
            kind,
            meeting_id: meeting.id,
            user_id: user.id.clone(),
            delivered: !failing,
        });

        let email = if failing {
            ChannelOutcome::Failed("simulated delivery failure".to_string())
        } else {
            ChannelOutcome::Delivered
        };
        let chat = if user.mobile.is_some() {
            ChannelOutcome::Delivered
        } else {
            ChannelOutcome::Skipped
        };
        DispatchResult::new(email, chat)
    }
}

#[async_trait]
impl NotificationDispatcher for RecordingDispatcher {
    async fn send_reminder(&self, user: &UserRef, meeting: &RecurringMeeting) -> DispatchResult {
        self.record(NotificationKind::Reminder, user, meeting)
    }

    async fn send_check_in(&self, user: &UserRef, meeting: &RecurringMeeting) -> DispatchResult {
        self.record(NotificationKind::CheckIn, user, meeting)
    }

    async fn send_meeting_created(
        &self,
        user: &UserRef,
        meeting: &RecurringMeeting,
    ) -> DispatchResult {
        self.record(NotificationKind::MeetingCreated, user, meeting)
    }
}
