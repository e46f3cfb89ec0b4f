//! DeactivateMeetingHandler - soft-deletes a meeting.

use std::sync::Arc;

use crate::domain::foundation::{Actor, MeetingId};
use crate::domain::meeting::{MeetingError, RecurringMeeting};
use crate::ports::MeetingRepository;

use super::access::load_meeting;

#[derive(Debug, Clone)]
pub struct DeactivateMeetingCommand {
    pub meeting_id: MeetingId,
    pub actor: Actor,
}

/// Only admins and the meeting's creator may deactivate it. Deactivating
/// an already inactive meeting is a no-op.
pub struct DeactivateMeetingHandler {
    repository: Arc<dyn MeetingRepository>,
}

impl DeactivateMeetingHandler {
    pub fn new(repository: Arc<dyn MeetingRepository>) -> Self {
        Self { repository }
    }

    pub async fn handle(
        &self,
        cmd: DeactivateMeetingCommand,
    ) -> Result<RecurringMeeting, MeetingError> {
        let mut meeting = load_meeting(self.repository.as_ref(), cmd.meeting_id).await?;

        if !cmd.actor.is_admin() && meeting.created_by != cmd.actor.user_id {
            tracing::warn!(
                meeting_id = %meeting.id,
                user_id = %cmd.actor.user_id,
                "Deactivation denied"
            );
            return Err(MeetingError::forbidden(meeting.id, cmd.actor.user_id));
        }

        if !meeting.active {
            return Ok(meeting);
        }

        meeting.deactivate();
        meeting.version = self.repository.save(&meeting).await?;

        tracing::info!(
            meeting_id = %meeting.id,
            user_id = %cmd.actor.user_id,
            "Meeting deactivated"
        );

        Ok(meeting)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::meeting::test_support::*;
    use crate::domain::foundation::UserId;

    #[tokio::test]
    async fn creator_can_deactivate() {
        let meeting = weekly_meeting();
        let id = meeting.id;
        let repo = Arc::new(MockMeetingRepository::with(vec![meeting]));
        let handler = DeactivateMeetingHandler::new(repo.clone());

        let result = handler
            .handle(DeactivateMeetingCommand {
                meeting_id: id,
                actor: Actor::user(UserId::new("creator-1").unwrap()),
            })
            .await
            .unwrap();

        assert!(!result.active);
        assert!(!repo.get(&id).active);
    }

    #[tokio::test]
    async fn assignee_cannot_deactivate() {
        let meeting = weekly_meeting();
        let id = meeting.id;
        let repo = Arc::new(MockMeetingRepository::with(vec![meeting]));
        let handler = DeactivateMeetingHandler::new(repo.clone());

        let err = handler
            .handle(DeactivateMeetingCommand {
                meeting_id: id,
                actor: assignee_actor(),
            })
            .await
            .unwrap_err();

        assert!(matches!(err, MeetingError::Forbidden { .. }));
        assert!(repo.get(&id).active);
    }

    #[tokio::test]
    async fn deactivating_twice_is_a_no_op() {
        let mut meeting = weekly_meeting();
        meeting.deactivate();
        let id = meeting.id;
        let repo = Arc::new(MockMeetingRepository::with(vec![meeting]));
        repo.reject_saves_with_conflict();
        let handler = DeactivateMeetingHandler::new(repo);

        let result = handler
            .handle(DeactivateMeetingCommand {
                meeting_id: id,
                actor: admin_actor(),
            })
            .await
            .unwrap();

        assert!(!result.active);
    }
}
