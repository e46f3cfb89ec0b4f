//! Meeting module - recurring stakeholder meetings and their cycle history.
//!
//! # Module Structure
//!
//! - `aggregate` - RecurringMeeting with rollover logic
//! - `status` - MeetingStatus state machine
//! - `compliance` - attendance counters
//! - `records` - minutes, action items, missed reasons
//! - `participants` - assignees and stakeholders
//! - `errors` - MeetingError

mod aggregate;
mod compliance;
mod errors;
mod participants;
mod records;
mod status;

pub use aggregate::{CycleOutcome, MeetingChanges, MeetingDetails, RecurringMeeting, Rollover};
pub use compliance::ComplianceStats;
pub use errors::MeetingError;
pub use participants::{StakeholderRef, UserRef};
pub use records::{ActionItem, ActionItemStatus, MinutesOfMeeting, MissedReason, NO_MINUTES_REASON};
pub use status::MeetingStatus;
