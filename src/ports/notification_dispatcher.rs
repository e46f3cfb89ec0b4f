//! NotificationDispatcher port - outbound messages to meeting assignees.
//!
//! Email is the primary channel. A chat channel (SMS/WhatsApp style) is used
//! in addition when the user has a mobile number. Delivery outcome is
//! reported per channel and never raised as an error; the caller decides
//! what a failed channel means for the meeting.

use async_trait::async_trait;
use serde::Serialize;
use std::fmt;

use crate::domain::meeting::{RecurringMeeting, UserRef};

/// Which message is being sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    Reminder,
    CheckIn,
    MeetingCreated,
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            NotificationKind::Reminder => "reminder",
            NotificationKind::CheckIn => "check_in",
            NotificationKind::MeetingCreated => "meeting_created",
        };
        write!(f, "{}", s)
    }
}

/// Outcome on a single channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "reason", rename_all = "snake_case")]
pub enum ChannelOutcome {
    Delivered,
    Failed(String),
    /// Channel not configured or not applicable to this user.
    Skipped,
}

impl ChannelOutcome {
    pub fn is_delivered(&self) -> bool {
        matches!(self, ChannelOutcome::Delivered)
    }

    pub fn is_attempted(&self) -> bool {
        !matches!(self, ChannelOutcome::Skipped)
    }

    pub fn failure(&self) -> Option<&str> {
        match self {
            ChannelOutcome::Failed(reason) => Some(reason),
            _ => None,
        }
    }
}

/// Per-channel result of one notification to one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DispatchResult {
    pub email: ChannelOutcome,
    pub chat: ChannelOutcome,
}

impl DispatchResult {
    pub fn new(email: ChannelOutcome, chat: ChannelOutcome) -> Self {
        Self { email, chat }
    }

    pub fn primary_attempted(&self) -> bool {
        self.email.is_attempted()
    }

    pub fn primary_delivered(&self) -> bool {
        self.email.is_delivered()
    }
}

/// Port for sending meeting notifications.
///
/// Implementations must not panic or return early on a single channel
/// failure; every applicable channel is tried and reported.
#[async_trait]
pub trait NotificationDispatcher: Send + Sync {
    /// Reminder sent on the first working day of a cycle.
    async fn send_reminder(&self, user: &UserRef, meeting: &RecurringMeeting) -> DispatchResult;

    /// Check-in sent on the last working day of a cycle.
    async fn send_check_in(&self, user: &UserRef, meeting: &RecurringMeeting) -> DispatchResult;

    /// Announcement sent to assignees when a meeting is created.
    async fn send_meeting_created(
        &self,
        user: &UserRef,
        meeting: &RecurringMeeting,
    ) -> DispatchResult;
}
