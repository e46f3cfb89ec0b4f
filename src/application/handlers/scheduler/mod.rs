//! Scheduler handlers - periodic reminder, check-in and rollover passes.

mod lifecycle_scheduler;

pub use lifecycle_scheduler::{
    LifecycleSettings, MeetingFailure, MeetingLifecycleScheduler, PassKind, PassReport,
};
