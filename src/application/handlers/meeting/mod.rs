//! Meeting handlers.
//!
//! Command and query handlers for manual meeting operations:
//!
//! ## Commands
//! - Creating a meeting
//! - Editing or rescheduling a meeting
//! - Recording minutes or a missed reason (closes the current cycle)
//! - Sending a reminder or check-in on demand
//! - Deactivating a meeting
//!
//! ## Queries
//! - Get meeting details
//! - List the caller's active meetings

mod access;
mod add_minutes_of_meeting;
mod add_missed_reason;
mod create_meeting;
mod deactivate_meeting;
mod get_meeting;
mod list_meetings;
mod manual_notifications;
mod update_meeting;

#[cfg(test)]
pub(crate) mod test_support;

// Commands
pub use add_minutes_of_meeting::{
    ActionItemInput, AddMinutesOfMeetingCommand, AddMinutesOfMeetingHandler, MeetingCycleResult,
};
pub use add_missed_reason::{AddMissedReasonCommand, AddMissedReasonHandler};
pub use create_meeting::{
    AssigneeInput, CreateMeetingCommand, CreateMeetingHandler, CreateMeetingResult,
};
pub use deactivate_meeting::{DeactivateMeetingCommand, DeactivateMeetingHandler};
pub use manual_notifications::{
    ManualNotificationResult, SendCheckInManuallyCommand, SendCheckInManuallyHandler,
    SendReminderManuallyCommand, SendReminderManuallyHandler,
};
pub use update_meeting::{UpdateMeetingCommand, UpdateMeetingHandler, UpdateMeetingResult};

// Queries
pub use get_meeting::{GetMeetingHandler, GetMeetingQuery, MeetingView};
pub use list_meetings::{ListMeetingsHandler, ListMeetingsQuery};
