//! UpdateMeetingHandler - edits or reschedules an active meeting.

use std::sync::Arc;

use chrono::NaiveDate;

use crate::domain::calendar::{BusinessCalendar, Frequency};
use crate::domain::foundation::{Actor, MeetingId, UserId};
use crate::domain::meeting::{MeetingChanges, MeetingError, RecurringMeeting, StakeholderRef, UserRef};
use crate::ports::{Clock, MeetingRepository};

use super::access::load_for_update;
use super::create_meeting::AssigneeInput;

/// Command to change a meeting. Fields left as `None` are untouched.
#[derive(Debug, Clone)]
pub struct UpdateMeetingCommand {
    pub meeting_id: MeetingId,
    pub actor: Actor,
    pub title: Option<String>,
    /// Replaces the stakeholder when set, together with `stakeholder_company`.
    pub stakeholder_name: Option<String>,
    pub stakeholder_company: Option<String>,
    pub frequency: Option<Frequency>,
    pub assigned_to: Option<Vec<AssigneeInput>>,
    pub anchor_date: Option<NaiveDate>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone)]
pub struct UpdateMeetingResult {
    pub meeting: RecurringMeeting,
    /// True when the edit moved the cycle and cleared the sent flags.
    pub cycle_moved: bool,
}

/// Admins and assignees may edit an active meeting.
pub struct UpdateMeetingHandler {
    repository: Arc<dyn MeetingRepository>,
    clock: Arc<dyn Clock>,
    calendar: BusinessCalendar,
}

impl UpdateMeetingHandler {
    pub fn new(
        repository: Arc<dyn MeetingRepository>,
        clock: Arc<dyn Clock>,
        calendar: BusinessCalendar,
    ) -> Self {
        Self {
            repository,
            clock,
            calendar,
        }
    }

    pub async fn handle(&self, cmd: UpdateMeetingCommand) -> Result<UpdateMeetingResult, MeetingError> {
        let mut meeting =
            load_for_update(self.repository.as_ref(), cmd.meeting_id, &cmd.actor).await?;

        let stakeholder = cmd
            .stakeholder_name
            .map(|name| StakeholderRef::new(name, cmd.stakeholder_company))
            .transpose()?;
        let assigned_to = cmd
            .assigned_to
            .map(|inputs| {
                inputs
                    .into_iter()
                    .map(|a| UserRef::new(UserId::new(a.id)?, a.name, a.email, a.mobile))
                    .collect::<Result<Vec<_>, _>>()
            })
            .transpose()?;

        let previous_anchor = meeting.anchor_date;
        let cycle_moved = meeting.reschedule(
            MeetingChanges {
                title: cmd.title,
                stakeholder,
                frequency: cmd.frequency,
                assigned_to,
                anchor_date: cmd.anchor_date,
                notes: cmd.notes,
            },
            &self.calendar,
            self.clock.today(),
        )?;

        meeting.version = self.repository.save(&meeting).await?;

        tracing::info!(
            meeting_id = %meeting.id,
            user_id = %cmd.actor.user_id,
            previous_anchor = %previous_anchor,
            anchor_date = %meeting.anchor_date,
            frequency = %meeting.frequency,
            cycle_moved,
            "Meeting updated"
        );

        Ok(UpdateMeetingResult {
            meeting,
            cycle_moved,
        })
    }
}
