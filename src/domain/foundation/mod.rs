//! Foundation module - Shared domain primitives.
//!
//! Contains value objects, identifiers, and error types
//! that form the vocabulary of the meeting scheduling domain.

mod actor;
mod errors;
mod ids;
mod state_machine;
mod timestamp;

pub use actor::{Actor, Role};
pub use errors::{DomainError, ErrorCode, ValidationError};
pub use ids::{MeetingId, UserId};
pub use state_machine::StateMachine;
pub use timestamp::Timestamp;
