//! In-Memory Meeting Repository
//!
//! Keeps meetings in a map behind a tokio `RwLock`.
//! Useful for testing and development.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::foundation::{DomainError, MeetingId};
use crate::domain::meeting::{MeetingStatus, RecurringMeeting};
use crate::ports::MeetingRepository;

use super::next_version;

/// In-memory storage for meetings
#[derive(Debug, Clone, Default)]
pub struct InMemoryMeetingRepository {
    meetings: Arc<RwLock<HashMap<MeetingId, RecurringMeeting>>>,
}

impl InMemoryMeetingRepository {
    /// Create a new, empty repository
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the number of stored meetings
    pub async fn count(&self) -> usize {
        self.meetings.read().await.len()
    }

    /// Clear all stored data (useful for tests)
    pub async fn clear(&self) {
        self.meetings.write().await.clear();
    }

    async fn list_where(&self, keep: impl Fn(&RecurringMeeting) -> bool) -> Vec<RecurringMeeting> {
        let meetings = self.meetings.read().await;
        let mut found: Vec<RecurringMeeting> =
            meetings.values().filter(|m| keep(*m)).cloned().collect();
        found.sort_by_key(|m| m.id);
        found
    }
}

#[async_trait]
impl MeetingRepository for InMemoryMeetingRepository {
    async fn save(&self, meeting: &RecurringMeeting) -> Result<u64, DomainError> {
        // Check and write under one lock so the version check is atomic.
        let mut meetings = self.meetings.write().await;
        let version = next_version(meetings.get(&meeting.id).map(|m| m.version), meeting)?;

        let mut stored = meeting.clone();
        stored.version = version;
        meetings.insert(meeting.id, stored);
        Ok(version)
    }

    async fn find_by_id(&self, id: &MeetingId) -> Result<Option<RecurringMeeting>, DomainError> {
        Ok(self.meetings.read().await.get(id).cloned())
    }

    async fn find_active(&self) -> Result<Vec<RecurringMeeting>, DomainError> {
        Ok(self.list_where(|m| m.active).await)
    }

    async fn find_active_scheduled(&self) -> Result<Vec<RecurringMeeting>, DomainError> {
        Ok(self
            .list_where(|m| m.active && m.status == MeetingStatus::Scheduled)
            .await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::calendar::Frequency;
    use crate::domain::foundation::{ErrorCode, UserId};
    use crate::domain::meeting::{MeetingDetails, StakeholderRef, UserRef};
    use chrono::NaiveDate;

    fn meeting() -> RecurringMeeting {
        let user = UserRef::new(UserId::new("u-1").unwrap(), "Ana", "ana@example.com", None)
            .unwrap();
        RecurringMeeting::schedule(
            MeetingId::new(),
            MeetingDetails {
                title: "Supplier review".to_string(),
                stakeholder: StakeholderRef::new("Sam", None).unwrap(),
                frequency: Frequency::Monthly,
                assigned_to: vec![user],
                notes: None,
            },
            NaiveDate::from_ymd_opt(2026, 3, 2).unwrap(),
            UserId::new("u-1").unwrap(),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn insert_then_update_bumps_version() {
        let repo = InMemoryMeetingRepository::new();
        let mut m = meeting();

        m.version = repo.save(&m).await.unwrap();
        assert_eq!(m.version, 1);

        m.mark_reminder_sent();
        m.version = repo.save(&m).await.unwrap();
        assert_eq!(m.version, 2);

        let stored = repo.find_by_id(&m.id).await.unwrap().unwrap();
        assert!(stored.reminder_sent);
        assert_eq!(stored.version, 2);
    }

    #[tokio::test]
    async fn stale_save_is_a_conflict() {
        let repo = InMemoryMeetingRepository::new();
        let mut m = meeting();
        m.version = repo.save(&m).await.unwrap();

        let stale = m.clone();
        m.mark_check_in_sent();
        repo.save(&m).await.unwrap();

        let err = repo.save(&stale).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ConcurrencyConflict);
        assert_eq!(err.details.get("meeting_id"), Some(&stale.id.to_string()));
    }

    #[tokio::test]
    async fn inserting_with_nonzero_version_is_a_conflict() {
        let repo = InMemoryMeetingRepository::new();
        let mut m = meeting();
        m.version = 3;

        let err = repo.save(&m).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ConcurrencyConflict);
        assert_eq!(repo.count().await, 0);
    }

    #[tokio::test]
    async fn active_scheduled_excludes_inactive() {
        let repo = InMemoryMeetingRepository::new();
        let keep = meeting();
        let mut gone = meeting();
        gone.deactivate();
        repo.save(&keep).await.unwrap();
        repo.save(&gone).await.unwrap();

        let found = repo.find_active_scheduled().await.unwrap();

        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, keep.id);
        assert_eq!(repo.find_active().await.unwrap().len(), 1);
    }
}
