//! AddMinutesOfMeetingHandler - records minutes and closes the cycle as attended.

use std::sync::Arc;

use chrono::NaiveDate;

use crate::domain::calendar::BusinessCalendar;
use crate::domain::foundation::{Actor, MeetingId};
use crate::domain::meeting::{
    ActionItem, ActionItemStatus, MeetingError, MinutesOfMeeting, RecurringMeeting, Rollover,
};
use crate::ports::MeetingRepository;

use super::access::load_for_update;

/// Raw action item as submitted by a caller.
#[derive(Debug, Clone)]
pub struct ActionItemInput {
    pub task: String,
    pub assigned_to: Option<String>,
    pub due_date: Option<NaiveDate>,
    pub status: ActionItemStatus,
}

/// Command to record minutes for the current cycle.
#[derive(Debug, Clone)]
pub struct AddMinutesOfMeetingCommand {
    pub meeting_id: MeetingId,
    pub actor: Actor,
    pub date: NaiveDate,
    pub content: String,
    pub attendees: Vec<String>,
    pub action_items: Vec<ActionItemInput>,
}

/// Meeting after a manual cycle close.
#[derive(Debug, Clone)]
pub struct MeetingCycleResult {
    pub meeting: RecurringMeeting,
    pub rollover: Rollover,
}

/// Handler for manual minutes submission.
///
/// Performs the attended rollover immediately instead of waiting for the
/// cycle's last working day.
pub struct AddMinutesOfMeetingHandler {
    repository: Arc<dyn MeetingRepository>,
    calendar: BusinessCalendar,
}

impl AddMinutesOfMeetingHandler {
    pub fn new(repository: Arc<dyn MeetingRepository>, calendar: BusinessCalendar) -> Self {
        Self {
            repository,
            calendar,
        }
    }

    pub async fn handle(
        &self,
        cmd: AddMinutesOfMeetingCommand,
    ) -> Result<MeetingCycleResult, MeetingError> {
        // 1. Load and authorise
        let mut meeting =
            load_for_update(self.repository.as_ref(), cmd.meeting_id, &cmd.actor).await?;

        // 2. Build the entry (validation)
        let action_items = cmd
            .action_items
            .into_iter()
            .map(|item| {
                ActionItem::new(item.task, item.assigned_to, item.due_date)
                    .map(|a| a.with_status(item.status))
            })
            .collect::<Result<Vec<_>, _>>()?;
        let minutes = MinutesOfMeeting::new(cmd.date, cmd.content, cmd.attendees, action_items)?;

        // 3. Close the cycle (domain logic)
        let rollover = meeting.record_minutes(minutes, &self.calendar)?;

        // 4. Persist
        meeting.version = self.repository.save(&meeting).await?;

        tracing::info!(
            meeting_id = %meeting.id,
            user_id = %cmd.actor.user_id,
            next_anchor = %rollover.next_anchor,
            "Minutes recorded"
        );

        Ok(MeetingCycleResult { meeting, rollover })
    }
}
