//! Application layer - Commands, Queries, and Handlers.
//!
//! This layer orchestrates domain operations and coordinates between ports.
//! Manual operations come in through the meeting handlers; the lifecycle
//! scheduler drives the same aggregate from the clock.

pub mod handlers;

pub use handlers::{
    CreateMeetingCommand, CreateMeetingHandler, DispatchPolicy, LifecycleSettings,
    MeetingLifecycleScheduler, PassKind, PassReport,
};
