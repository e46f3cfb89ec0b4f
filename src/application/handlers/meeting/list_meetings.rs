//! ListMeetingsHandler - the caller's active meetings, soonest first.

use std::sync::Arc;

use crate::domain::calendar::BusinessCalendar;
use crate::domain::foundation::Actor;
use crate::domain::meeting::MeetingError;
use crate::ports::MeetingRepository;

use super::get_meeting::MeetingView;

#[derive(Debug, Clone)]
pub struct ListMeetingsQuery {
    pub actor: Actor,
}

/// Admins see every active meeting; users see the ones assigned to them.
/// Results are ordered by anchor date.
pub struct ListMeetingsHandler {
    repository: Arc<dyn MeetingRepository>,
    calendar: BusinessCalendar,
}

impl ListMeetingsHandler {
    pub fn new(repository: Arc<dyn MeetingRepository>, calendar: BusinessCalendar) -> Self {
        Self {
            repository,
            calendar,
        }
    }

    pub async fn handle(&self, query: ListMeetingsQuery) -> Result<Vec<MeetingView>, MeetingError> {
        let mut meetings = self.repository.find_active().await?;
        if !query.actor.is_admin() {
            meetings.retain(|m| m.is_assigned(&query.actor.user_id));
        }
        meetings.sort_by(|a, b| {
            a.anchor_date
                .cmp(&b.anchor_date)
                .then_with(|| a.title.cmp(&b.title))
        });

        tracing::debug!(
            user_id = %query.actor.user_id,
            count = meetings.len(),
            "Meetings listed"
        );

        Ok(meetings
            .into_iter()
            .map(|meeting| MeetingView {
                compliance_percentage: meeting.compliance_percentage(),
                current_period: meeting.current_period(&self.calendar),
                meeting,
            })
            .collect())
    }
}
