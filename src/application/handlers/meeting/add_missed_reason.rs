//! AddMissedReasonHandler - explains a missed cycle and closes it.

use std::sync::Arc;

use chrono::NaiveDate;

use crate::domain::calendar::BusinessCalendar;
use crate::domain::foundation::{Actor, MeetingId};
use crate::domain::meeting::{MeetingError, MissedReason};
use crate::ports::MeetingRepository;

use super::access::load_for_update;
use super::MeetingCycleResult;

/// Command to record why the current cycle's meeting did not happen.
#[derive(Debug, Clone)]
pub struct AddMissedReasonCommand {
    pub meeting_id: MeetingId,
    pub actor: Actor,
    pub date: NaiveDate,
    pub reason: String,
}

/// Handler for manual missed-reason submission.
pub struct AddMissedReasonHandler {
    repository: Arc<dyn MeetingRepository>,
    calendar: BusinessCalendar,
}

impl AddMissedReasonHandler {
    pub fn new(repository: Arc<dyn MeetingRepository>, calendar: BusinessCalendar) -> Self {
        Self {
            repository,
            calendar,
        }
    }

    pub async fn handle(
        &self,
        cmd: AddMissedReasonCommand,
    ) -> Result<MeetingCycleResult, MeetingError> {
        let mut meeting =
            load_for_update(self.repository.as_ref(), cmd.meeting_id, &cmd.actor).await?;

        let reason = MissedReason::new(cmd.date, cmd.reason)?;
        let rollover = meeting.record_missed_reason(reason, &self.calendar)?;

        meeting.version = self.repository.save(&meeting).await?;

        tracing::info!(
            meeting_id = %meeting.id,
            user_id = %cmd.actor.user_id,
            next_anchor = %rollover.next_anchor,
            "Missed reason recorded"
        );

        Ok(MeetingCycleResult { meeting, rollover })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::meeting::test_support::*;
    use crate::domain::meeting::CycleOutcome;

    fn command(meeting_id: MeetingId, reason: &str) -> AddMissedReasonCommand {
        AddMissedReasonCommand {
            meeting_id,
            actor: assignee_actor(),
            date: date(2026, 3, 12),
            reason: reason.to_string(),
        }
    }

    #[tokio::test]
    async fn records_reason_and_counts_missed() {
        let meeting = weekly_meeting();
        let id = meeting.id;
        let repo = Arc::new(MockMeetingRepository::with(vec![meeting]));
        let handler = AddMissedReasonHandler::new(repo.clone(), calendar());

        let result = handler
            .handle(command(id, "Stakeholder on leave"))
            .await
            .unwrap();

        assert_eq!(result.rollover.outcome, CycleOutcome::Missed);
        let stored = repo.get(&id);
        assert_eq!(stored.compliance.total_missed, 1);
        assert_eq!(stored.compliance.total_scheduled, 2);
        assert_eq!(stored.missed_reasons[0].reason, "Stakeholder on leave");
        assert_eq!(stored.missed_reasons[0].date, date(2026, 3, 12));
        assert!(!stored.reminder_sent);
    }

    #[tokio::test]
    async fn blank_reason_is_rejected() {
        let meeting = weekly_meeting();
        let id = meeting.id;
        let repo = Arc::new(MockMeetingRepository::with(vec![meeting]));
        let handler = AddMissedReasonHandler::new(repo.clone(), calendar());

        let err = handler.handle(command(id, "")).await.unwrap_err();

        assert!(matches!(err, MeetingError::ValidationFailed { ref field, .. } if field == "reason"));
        assert_eq!(repo.get(&id).compliance.total_missed, 0);
    }
}
