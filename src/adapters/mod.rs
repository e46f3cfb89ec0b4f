//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `clock` - System and fixed clocks in a configured timezone
//! - `http` - Axum REST API
//! - `notification` - Email/chat relays, logging and recording dispatchers
//! - `storage` - In-memory and JSON file meeting repositories
//! - `trigger` - Cron-driven scheduler passes

pub mod clock;
pub mod http;
pub mod notification;
pub mod storage;
pub mod trigger;

pub use clock::{FixedClock, SystemClock};
pub use notification::{
    HttpRelayConfig, HttpRelayDispatcher, LoggingDispatcher, MessageTemplates, RecordingDispatcher,
};
pub use storage::{FileMeetingRepository, InMemoryMeetingRepository};
pub use trigger::{CronTrigger, CronTriggerConfig};
