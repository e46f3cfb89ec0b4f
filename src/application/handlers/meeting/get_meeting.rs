//! GetMeetingHandler - reads a meeting with its derived figures.

use std::sync::Arc;

use crate::domain::calendar::{BusinessCalendar, BusinessPeriod};
use crate::domain::foundation::{Actor, MeetingId};
use crate::domain::meeting::{MeetingError, RecurringMeeting};
use crate::ports::MeetingRepository;

use super::access::load_meeting;

#[derive(Debug, Clone)]
pub struct GetMeetingQuery {
    pub meeting_id: MeetingId,
    pub actor: Actor,
}

/// Meeting plus values computed from the calendar.
#[derive(Debug, Clone)]
pub struct MeetingView {
    pub meeting: RecurringMeeting,
    pub compliance_percentage: u8,
    pub current_period: BusinessPeriod,
}

/// Admins, assignees and the creator may read a meeting, active or not.
pub struct GetMeetingHandler {
    repository: Arc<dyn MeetingRepository>,
    calendar: BusinessCalendar,
}

impl GetMeetingHandler {
    pub fn new(repository: Arc<dyn MeetingRepository>, calendar: BusinessCalendar) -> Self {
        Self {
            repository,
            calendar,
        }
    }

    pub async fn handle(&self, query: GetMeetingQuery) -> Result<MeetingView, MeetingError> {
        let meeting = load_meeting(self.repository.as_ref(), query.meeting_id).await?;

        let allowed = meeting.can_be_managed_by(&query.actor)
            || meeting.created_by == query.actor.user_id;
        if !allowed {
            return Err(MeetingError::forbidden(meeting.id, query.actor.user_id));
        }

        Ok(MeetingView {
            compliance_percentage: meeting.compliance_percentage(),
            current_period: meeting.current_period(&self.calendar),
            meeting,
        })
    }
}
