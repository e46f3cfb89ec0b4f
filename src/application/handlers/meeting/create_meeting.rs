//! CreateMeetingHandler - schedules a new recurring meeting.

use std::sync::Arc;

use chrono::NaiveDate;

use crate::application::handlers::notify::{notify_assignees, DispatchPolicy, FanOutReport};
use crate::domain::calendar::{BusinessCalendar, Frequency};
use crate::domain::foundation::{Actor, MeetingId, UserId};
use crate::domain::meeting::{
    MeetingDetails, MeetingError, RecurringMeeting, StakeholderRef, UserRef,
};
use crate::ports::{Clock, MeetingRepository, NotificationDispatcher, NotificationKind};

/// Assignee contact details as submitted by a caller.
#[derive(Debug, Clone)]
pub struct AssigneeInput {
    pub id: String,
    pub name: String,
    pub email: String,
    pub mobile: Option<String>,
}

/// Command to create a meeting.
#[derive(Debug, Clone)]
pub struct CreateMeetingCommand {
    pub actor: Actor,
    pub title: String,
    pub stakeholder_name: String,
    pub stakeholder_company: Option<String>,
    pub frequency: Frequency,
    pub assigned_to: Vec<AssigneeInput>,
    pub anchor_date: NaiveDate,
    pub notes: Option<String>,
}

/// Result of a successful create.
#[derive(Debug, Clone)]
pub struct CreateMeetingResult {
    pub meeting: RecurringMeeting,
    /// Outcome of the meeting-created notifications. Failures here do not
    /// undo the create.
    pub notifications: FanOutReport,
}

/// Handler for meeting creation.
///
/// The anchor must fall in a period that has not yet closed; otherwise the
/// meeting would start life overdue.
pub struct CreateMeetingHandler {
    repository: Arc<dyn MeetingRepository>,
    dispatcher: Arc<dyn NotificationDispatcher>,
    clock: Arc<dyn Clock>,
    calendar: BusinessCalendar,
    policy: DispatchPolicy,
}

impl CreateMeetingHandler {
    pub fn new(
        repository: Arc<dyn MeetingRepository>,
        dispatcher: Arc<dyn NotificationDispatcher>,
        clock: Arc<dyn Clock>,
        calendar: BusinessCalendar,
        policy: DispatchPolicy,
    ) -> Self {
        Self {
            repository,
            dispatcher,
            clock,
            calendar,
            policy,
        }
    }

    pub async fn handle(&self, cmd: CreateMeetingCommand) -> Result<CreateMeetingResult, MeetingError> {
        let assignees = cmd
            .assigned_to
            .into_iter()
            .map(|a| UserRef::new(UserId::new(a.id)?, a.name, a.email, a.mobile))
            .collect::<Result<Vec<_>, _>>()?;
        let stakeholder = StakeholderRef::new(cmd.stakeholder_name, cmd.stakeholder_company)?;
        RecurringMeeting::ensure_anchor_current(
            &self.calendar,
            cmd.anchor_date,
            cmd.frequency,
            self.clock.today(),
        )?;

        let mut meeting = RecurringMeeting::schedule(
            MeetingId::new(),
            MeetingDetails {
                title: cmd.title,
                stakeholder,
                frequency: cmd.frequency,
                assigned_to: assignees,
                notes: cmd.notes,
            },
            cmd.anchor_date,
            cmd.actor.user_id.clone(),
        )?;

        meeting.version = self.repository.save(&meeting).await?;

        tracing::info!(
            meeting_id = %meeting.id,
            created_by = %meeting.created_by,
            frequency = %meeting.frequency,
            anchor_date = %meeting.anchor_date,
            "Meeting created"
        );

        let notifications = notify_assignees(
            self.dispatcher.as_ref(),
            NotificationKind::MeetingCreated,
            &meeting,
            &self.policy,
        )
        .await;

        Ok(CreateMeetingResult {
            meeting,
            notifications,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::meeting::test_support::*;

    fn assignee(id: &str, email: &str) -> AssigneeInput {
        AssigneeInput {
            id: id.to_string(),
            name: format!("User {}", id),
            email: email.to_string(),
            mobile: None,
        }
    }

    fn handler(
        repo: Arc<MockMeetingRepository>,
        dispatcher: Arc<MockDispatcher>,
        today: NaiveDate,
    ) -> CreateMeetingHandler {
        CreateMeetingHandler::new(
            repo,
            dispatcher,
            Arc::new(StaticClock(today)),
            calendar(),
            DispatchPolicy::default(),
        )
    }

    fn command(assigned_to: Vec<AssigneeInput>) -> CreateMeetingCommand {
        CreateMeetingCommand {
            actor: assignee_actor(),
            title: "Quarterly business review".to_string(),
            stakeholder_name: "Dana Lee".to_string(),
            stakeholder_company: Some("Initech".to_string()),
            frequency: Frequency::Quarterly,
            assigned_to,
            anchor_date: date(2026, 3, 2),
            notes: Some("Bring renewal numbers".to_string()),
        }
    }

    #[tokio::test]
    async fn creates_meeting_and_notifies_assignees() {
        let repo = Arc::new(MockMeetingRepository::with(Vec::new()));
        let dispatcher = Arc::new(MockDispatcher::delivering());
        let handler = handler(repo.clone(), dispatcher.clone(), date(2026, 3, 2));

        let result = handler
            .handle(command(vec![
                assignee("u-1", "one@example.com"),
                assignee("u-2", "two@example.com"),
            ]))
            .await
            .unwrap();

        let stored = repo.get(&result.meeting.id);
        assert_eq!(stored.title, "Quarterly business review");
        assert_eq!(stored.compliance.total_scheduled, 1);
        assert!(stored.active);
        assert_eq!(stored.created_by.as_str(), "u-1");
        assert_eq!(result.meeting.version, 1);
        assert_eq!(dispatcher.count(NotificationKind::MeetingCreated), 2);
        assert_eq!(result.notifications.dispatches.len(), 2);
    }

    #[tokio::test]
    async fn notification_failure_does_not_undo_create() {
        let repo = Arc::new(MockMeetingRepository::with(Vec::new()));
        let handler = handler(repo.clone(), Arc::new(MockDispatcher::failing()), date(2026, 3, 2));

        let result = handler
            .handle(command(vec![assignee("u-1", "one@example.com")]))
            .await
            .unwrap();

        assert_eq!(repo.len(), 1);
        assert!(!result.notifications.any_primary_delivered());
    }

    #[tokio::test]
    async fn requires_an_assignee() {
        let repo = Arc::new(MockMeetingRepository::with(Vec::new()));
        let handler = handler(repo.clone(), Arc::new(MockDispatcher::delivering()), date(2026, 3, 2));

        let err = handler.handle(command(Vec::new())).await.unwrap_err();

        assert!(
            matches!(err, MeetingError::ValidationFailed { ref field, .. } if field == "assigned_to")
        );
        assert_eq!(repo.len(), 0);
    }

    #[tokio::test]
    async fn rejects_malformed_assignee_email() {
        let repo = Arc::new(MockMeetingRepository::with(Vec::new()));
        let handler = handler(repo, Arc::new(MockDispatcher::delivering()), date(2026, 3, 2));

        let err = handler
            .handle(command(vec![assignee("u-1", "not-an-email")]))
            .await
            .unwrap_err();

        assert!(matches!(err, MeetingError::ValidationFailed { ref field, .. } if field == "email"));
    }

    #[tokio::test]
    async fn rejects_anchor_in_a_period_that_already_closed() {
        let repo = Arc::new(MockMeetingRepository::with(Vec::new()));
        let dispatcher = Arc::new(MockDispatcher::delivering());
        let handler = handler(repo.clone(), dispatcher.clone(), date(2026, 3, 16));
        let mut cmd = command(vec![assignee("u-1", "one@example.com")]);
        cmd.frequency = Frequency::Weekly;
        cmd.anchor_date = date(2026, 3, 4);

        let err = handler.handle(cmd).await.unwrap_err();

        assert!(
            matches!(err, MeetingError::ValidationFailed { ref field, .. } if field == "anchor_date")
        );
        assert_eq!(repo.len(), 0);
        assert_eq!(dispatcher.count(NotificationKind::MeetingCreated), 0);
    }

    #[tokio::test]
    async fn accepts_past_anchor_while_its_period_is_open() {
        // Quarterly anchor on 2 March; the quarter runs to 31 March.
        let repo = Arc::new(MockMeetingRepository::with(Vec::new()));
        let handler = handler(repo.clone(), Arc::new(MockDispatcher::delivering()), date(2026, 3, 20));

        handler
            .handle(command(vec![assignee("u-1", "one@example.com")]))
            .await
            .unwrap();

        assert_eq!(repo.len(), 1);
    }
}
