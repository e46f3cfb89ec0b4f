//! Application handlers.
//!
//! Command and query handlers that orchestrate domain operations.

pub mod meeting;
pub mod notify;
pub mod scheduler;

pub use meeting::{
    ActionItemInput, AddMinutesOfMeetingCommand, AddMinutesOfMeetingHandler,
    AddMissedReasonCommand, AddMissedReasonHandler, AssigneeInput, CreateMeetingCommand,
    CreateMeetingHandler, CreateMeetingResult, DeactivateMeetingCommand, DeactivateMeetingHandler,
    GetMeetingHandler, GetMeetingQuery, ListMeetingsHandler, ListMeetingsQuery,
    ManualNotificationResult, MeetingCycleResult, MeetingView, SendCheckInManuallyCommand,
    SendCheckInManuallyHandler, SendReminderManuallyCommand, SendReminderManuallyHandler,
    UpdateMeetingCommand, UpdateMeetingHandler, UpdateMeetingResult,
};
pub use notify::{notify_assignees, AssigneeDispatch, DispatchPolicy, FanOutReport};
pub use scheduler::{
    LifecycleSettings, MeetingFailure, MeetingLifecycleScheduler, PassKind, PassReport,
};
