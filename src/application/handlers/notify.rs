//! Assignee fan-out shared by the scheduler passes and manual overrides.
//!
//! Every assignee is notified independently; one user's failure never
//! prevents delivery to the others.

use futures::stream::{self, StreamExt};
use serde::Serialize;

use crate::domain::foundation::UserId;
use crate::domain::meeting::{RecurringMeeting, UserRef};
use crate::ports::{DispatchResult, NotificationDispatcher, NotificationKind};

/// How notifications are fanned out and when a send counts as done.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchPolicy {
    /// Maximum in-flight sends for a single meeting.
    pub concurrency: usize,
    /// When true, a send is confirmed only if some assignee's email was
    /// delivered. When false, an attempted email is enough.
    pub require_delivery: bool,
}

impl Default for DispatchPolicy {
    fn default() -> Self {
        Self {
            concurrency: 4,
            require_delivery: true,
        }
    }
}

/// Outcome for one assignee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssigneeDispatch {
    pub user_id: UserId,
    pub result: DispatchResult,
}

/// Outcome for all assignees of one meeting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FanOutReport {
    pub kind: NotificationKind,
    pub dispatches: Vec<AssigneeDispatch>,
}

impl FanOutReport {
    pub fn any_primary_delivered(&self) -> bool {
        self.dispatches.iter().any(|d| d.result.primary_delivered())
    }

    pub fn any_primary_attempted(&self) -> bool {
        self.dispatches.iter().any(|d| d.result.primary_attempted())
    }

    /// Whether the meeting's sent flag may be set.
    pub fn is_confirmed(&self, policy: &DispatchPolicy) -> bool {
        if policy.require_delivery {
            self.any_primary_delivered()
        } else {
            self.any_primary_attempted()
        }
    }

    /// Human-readable summary of primary-channel failures.
    pub fn failure_summary(&self) -> String {
        let failures: Vec<String> = self
            .dispatches
            .iter()
            .filter_map(|d| {
                d.result
                    .email
                    .failure()
                    .map(|reason| format!("{}: {}", d.user_id, reason))
            })
            .collect();
        if failures.is_empty() {
            "no email channel available".to_string()
        } else {
            failures.join("; ")
        }
    }
}

async fn send_one(
    dispatcher: &dyn NotificationDispatcher,
    kind: NotificationKind,
    user: &UserRef,
    meeting: &RecurringMeeting,
) -> AssigneeDispatch {
    let result = match kind {
        NotificationKind::Reminder => dispatcher.send_reminder(user, meeting).await,
        NotificationKind::CheckIn => dispatcher.send_check_in(user, meeting).await,
        NotificationKind::MeetingCreated => dispatcher.send_meeting_created(user, meeting).await,
    };

    if let Some(reason) = result.email.failure() {
        tracing::warn!(
            meeting_id = %meeting.id,
            user_id = %user.id,
            kind = %kind,
            error = %reason,
            "Email notification failed"
        );
    }
    if let Some(reason) = result.chat.failure() {
        tracing::warn!(
            meeting_id = %meeting.id,
            user_id = %user.id,
            kind = %kind,
            error = %reason,
            "Chat notification failed"
        );
    }

    AssigneeDispatch {
        user_id: user.id.clone(),
        result,
    }
}

/// Sends `kind` to every assignee of `meeting` with bounded concurrency.
pub async fn notify_assignees(
    dispatcher: &dyn NotificationDispatcher,
    kind: NotificationKind,
    meeting: &RecurringMeeting,
    policy: &DispatchPolicy,
) -> FanOutReport {
    let assignees: Vec<UserRef> = meeting.assigned_to.iter().cloned().collect();
    let dispatches: Vec<AssigneeDispatch> = stream::iter(assignees)
        .map(|user| async move { send_one(dispatcher, kind, &user, meeting).await })
        .buffer_unordered(policy.concurrency.max(1))
        .collect()
        .await;

    FanOutReport { kind, dispatches }
}
