//! Dispatcher that writes notifications to the log instead of sending them.
//!
//! Used when no relay is configured, so a development instance still runs
//! its whole lifecycle.

use async_trait::async_trait;

use crate::domain::meeting::{RecurringMeeting, UserRef};
use crate::ports::{ChannelOutcome, DispatchResult, NotificationDispatcher, NotificationKind};

use super::templates::MessageTemplates;

/// Logs each rendered message and reports email as delivered.
#[derive(Debug, Clone, Default)]
pub struct LoggingDispatcher {
    templates: MessageTemplates,
}

impl LoggingDispatcher {
    pub fn new(templates: MessageTemplates) -> Self {
        Self { templates }
    }

    fn log(&self, kind: NotificationKind, user: &UserRef, meeting: &RecurringMeeting) -> DispatchResult {
        let message = self.templates.render(kind, user, meeting);
        tracing::info!(
            meeting_id = %meeting.id,
            user_id = %user.id,
            email = %user.email,
            kind = %kind,
            subject = %message.subject,
            "Notification (log only)"
        );
        DispatchResult::new(ChannelOutcome::Delivered, ChannelOutcome::Skipped)
    }
}

#[async_trait]
impl NotificationDispatcher for LoggingDispatcher {
    async fn send_reminder(&self, user: &UserRef, meeting: &RecurringMeeting) -> DispatchResult {
        self.log(NotificationKind::Reminder, user, meeting)
    }

    async fn send_check_in(&self, user: &UserRef, meeting: &RecurringMeeting) -> DispatchResult {
        self.log(NotificationKind::CheckIn, user, meeting)
    }

    async fn send_meeting_created(
        &self,
        user: &UserRef,
        meeting: &RecurringMeeting,
    ) -> DispatchResult {
        self.log(NotificationKind::MeetingCreated, user, meeting)
    }
}
