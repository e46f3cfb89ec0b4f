//! Meeting repository port.
//!
//! Defines the contract for persisting and retrieving RecurringMeeting
//! aggregates.
//!
//! # Concurrency
//!
//! `save` is an atomic, version-checked upsert. The scheduler and the manual
//! override handlers both follow load → mutate → save; whichever saves
//! second sees `ConcurrencyConflict` and must not retry blindly, since the
//! other writer may already have rolled the cycle over.
//!
//! # Example
//!
//! ```ignore
//! let mut meeting = repo
//!     .find_by_id(&id)
//!     .await?
//!     .ok_or_else(|| MeetingError::not_found(id))?;
//! meeting.mark_reminder_sent();
//! meeting.version = repo.save(&meeting).await?;
//! ```

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, MeetingId};
use crate::domain::meeting::RecurringMeeting;

/// Repository port for RecurringMeeting persistence.
#[async_trait]
pub trait MeetingRepository: Send + Sync {
    /// Insert or update a meeting, returning the stored version.
    ///
    /// A meeting with `version == 0` that is not yet stored is inserted.
    /// Otherwise the stored version must equal `meeting.version`.
    ///
    /// # Errors
    ///
    /// - `ConcurrencyConflict` if the stored version differs
    /// - `DatabaseError` on persistence failure
    async fn save(&self, meeting: &RecurringMeeting) -> Result<u64, DomainError>;

    /// Find a meeting by its ID, active or not.
    async fn find_by_id(&self, id: &MeetingId) -> Result<Option<RecurringMeeting>, DomainError>;

    /// All active meetings, whatever their status.
    async fn find_active(&self) -> Result<Vec<RecurringMeeting>, DomainError>;

    /// All meetings that are active and resting in `Scheduled`.
    async fn find_active_scheduled(&self) -> Result<Vec<RecurringMeeting>, DomainError>;
}
