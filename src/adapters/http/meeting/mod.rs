//! HTTP adapter for meeting endpoints.

mod dto;
mod handlers;
mod routes;

pub use dto::*;
pub use handlers::{health, AuthenticatedUser, MeetingApiError, MeetingAppState};
pub use routes::{meeting_router, meeting_routes};
