//! Notification Adapters
//!
//! Implementations of the NotificationDispatcher port.
//!
//! ## Available Adapters
//!
//! - `HttpRelayDispatcher` - Email relay and chat API over HTTP
//! - `LoggingDispatcher` - Writes messages to the log (development)
//! - `RecordingDispatcher` - Captures messages for assertions (testing)
//! - `MessageTemplates` - Subject, HTML and chat text for each message kind

mod http_relay;
mod logging;
mod recording;
mod templates;

pub use http_relay::{HttpRelayConfig, HttpRelayDispatcher};
pub use logging::LoggingDispatcher;
pub use recording::{RecordingDispatcher, SentNotification};
pub use templates::{MessageTemplates, RenderedMessage};
