//! Loading and authorising meetings for manual operations.
//!
//! Every manual operation follows the same steps: load the meeting, check
//! the caller may touch it, log the decision, then act.

use crate::domain::foundation::{Actor, MeetingId};
use crate::domain::meeting::{MeetingError, RecurringMeeting};
use crate::ports::MeetingRepository;

pub(crate) async fn load_meeting(
    repository: &dyn MeetingRepository,
    meeting_id: MeetingId,
) -> Result<RecurringMeeting, MeetingError> {
    repository
        .find_by_id(&meeting_id)
        .await?
        .ok_or_else(|| MeetingError::not_found(meeting_id))
}

/// Admins and assignees may manage a meeting.
pub(crate) fn authorize_manage(
    meeting: &RecurringMeeting,
    actor: &Actor,
) -> Result<(), MeetingError> {
    if meeting.can_be_managed_by(actor) {
        Ok(())
    } else {
        tracing::warn!(
            meeting_id = %meeting.id,
            user_id = %actor.user_id,
            role = %actor.role,
            "Meeting access denied"
        );
        Err(MeetingError::forbidden(meeting.id, actor.user_id.clone()))
    }
}

/// Loads an active meeting the actor may manage.
pub(crate) async fn load_for_update(
    repository: &dyn MeetingRepository,
    meeting_id: MeetingId,
    actor: &Actor,
) -> Result<RecurringMeeting, MeetingError> {
    let meeting = load_meeting(repository, meeting_id).await?;
    authorize_manage(&meeting, actor)?;
    if !meeting.active {
        return Err(MeetingError::inactive(meeting_id));
    }
    Ok(meeting)
}
