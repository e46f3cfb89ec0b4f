//! Manual reminder and check-in sends.
//!
//! Both commands notify every assignee immediately, regardless of the
//! calendar, and set the matching sent flag once the send is confirmed.

use std::sync::Arc;

use crate::application::handlers::notify::{notify_assignees, DispatchPolicy, FanOutReport};
use crate::domain::foundation::{Actor, MeetingId};
use crate::domain::meeting::{MeetingError, RecurringMeeting};
use crate::ports::{MeetingRepository, NotificationDispatcher, NotificationKind};

use super::access::load_for_update;

/// Command to send the cycle reminder now.
#[derive(Debug, Clone)]
pub struct SendReminderManuallyCommand {
    pub meeting_id: MeetingId,
    pub actor: Actor,
}

/// Command to send the cycle check-in now.
#[derive(Debug, Clone)]
pub struct SendCheckInManuallyCommand {
    pub meeting_id: MeetingId,
    pub actor: Actor,
}

/// Meeting after a manual send, with per-assignee outcomes.
#[derive(Debug, Clone)]
pub struct ManualNotificationResult {
    pub meeting: RecurringMeeting,
    pub report: FanOutReport,
}

pub struct SendReminderManuallyHandler {
    repository: Arc<dyn MeetingRepository>,
    dispatcher: Arc<dyn NotificationDispatcher>,
    policy: DispatchPolicy,
}

impl SendReminderManuallyHandler {
    pub fn new(
        repository: Arc<dyn MeetingRepository>,
        dispatcher: Arc<dyn NotificationDispatcher>,
        policy: DispatchPolicy,
    ) -> Self {
        Self {
            repository,
            dispatcher,
            policy,
        }
    }

    pub async fn handle(
        &self,
        cmd: SendReminderManuallyCommand,
    ) -> Result<ManualNotificationResult, MeetingError> {
        send_manually(
            self.repository.as_ref(),
            self.dispatcher.as_ref(),
            &self.policy,
            NotificationKind::Reminder,
            cmd.meeting_id,
            &cmd.actor,
        )
        .await
    }
}

pub struct SendCheckInManuallyHandler {
    repository: Arc<dyn MeetingRepository>,
    dispatcher: Arc<dyn NotificationDispatcher>,
    policy: DispatchPolicy,
}

impl SendCheckInManuallyHandler {
    pub fn new(
        repository: Arc<dyn MeetingRepository>,
        dispatcher: Arc<dyn NotificationDispatcher>,
        policy: DispatchPolicy,
    ) -> Self {
        Self {
            repository,
            dispatcher,
            policy,
        }
    }

    pub async fn handle(
        &self,
        cmd: SendCheckInManuallyCommand,
    ) -> Result<ManualNotificationResult, MeetingError> {
        send_manually(
            self.repository.as_ref(),
            self.dispatcher.as_ref(),
            &self.policy,
            NotificationKind::CheckIn,
            cmd.meeting_id,
            &cmd.actor,
        )
        .await
    }
}

async fn send_manually(
    repository: &dyn MeetingRepository,
    dispatcher: &dyn NotificationDispatcher,
    policy: &DispatchPolicy,
    kind: NotificationKind,
    meeting_id: MeetingId,
    actor: &Actor,
) -> Result<ManualNotificationResult, MeetingError> {
    let mut meeting = load_for_update(repository, meeting_id, actor).await?;

    let report = notify_assignees(dispatcher, kind, &meeting, policy).await;
    if !report.is_confirmed(policy) {
        return Err(MeetingError::notification_failed(report.failure_summary()));
    }

    match kind {
        NotificationKind::CheckIn => meeting.mark_check_in_sent(),
        _ => meeting.mark_reminder_sent(),
    }
    meeting.version = repository.save(&meeting).await?;

    tracing::info!(
        meeting_id = %meeting.id,
        user_id = %actor.user_id,
        kind = %kind,
        recipients = report.dispatches.len(),
        "Manual notification sent"
    );

    Ok(ManualNotificationResult { meeting, report })
}
