//! Storage Adapters
//!
//! Implementations of the MeetingRepository port.
//!
//! ## Available Adapters
//!
//! - **FileMeetingRepository** - One JSON document per meeting on disk
//! - **InMemoryMeetingRepository** - Meetings in memory (testing/development)
//!
//! Both enforce the same optimistic version check on `save`.
//!
//! ## Usage
//!
//! ```ignore
//! use adapters::storage::{FileMeetingRepository, InMemoryMeetingRepository};
//!
//! // Production: file-based storage
//! let repo = FileMeetingRepository::new("./data/meetings");
//!
//! // Testing: in-memory storage
//! let repo = InMemoryMeetingRepository::new();
//! ```

mod file_meeting_repository;
mod in_memory_meeting_repository;

pub use file_meeting_repository::FileMeetingRepository;
pub use in_memory_meeting_repository::InMemoryMeetingRepository;

use crate::domain::foundation::{DomainError, ErrorCode};
use crate::domain::meeting::RecurringMeeting;

/// Version the meeting will be stored under, given what is stored now.
///
/// A missing record accepts only version 0; an existing record must match.
pub(crate) fn next_version(
    stored: Option<u64>,
    meeting: &RecurringMeeting,
) -> Result<u64, DomainError> {
    match stored {
        None if meeting.version == 0 => Ok(1),
        Some(current) if current == meeting.version => Ok(current + 1),
        stored => Err(DomainError::new(
            ErrorCode::ConcurrencyConflict,
            format!(
                "Meeting was modified concurrently (expected version {}, stored {})",
                meeting.version,
                stored.map_or_else(|| "none".to_string(), |v| v.to_string())
            ),
        )
        .with_detail("meeting_id", meeting.id.to_string())),
    }
}
