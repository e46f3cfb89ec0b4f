//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! - `MeetingRepository` - version-checked meeting persistence
//! - `NotificationDispatcher` - reminder, check-in and creation messages
//! - `Clock` - current time and the organisation's calendar date

mod clock;
mod meeting_repository;
mod notification_dispatcher;

pub use clock::Clock;
pub use meeting_repository::MeetingRepository;
pub use notification_dispatcher::{
    ChannelOutcome, DispatchResult, NotificationDispatcher, NotificationKind,
};
