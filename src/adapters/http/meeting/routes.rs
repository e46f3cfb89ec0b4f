//! Axum router configuration for meeting endpoints.

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{
    add_minutes_of_meeting, add_missed_reason, create_meeting, deactivate_meeting, get_meeting,
    list_meetings, send_check_in, send_reminder, update_meeting, MeetingAppState,
};

/// Create the meeting API router.
///
/// # Routes
///
/// All routes require the `X-User-Id` header.
/// - `GET /` - Active meetings visible to the caller, soonest anchor first
/// - `POST /` - Create a meeting and notify its assignees
/// - `GET /:id` - Get meeting details with compliance and current period
/// - `PUT /:id` - Edit or reschedule a meeting
/// - `DELETE /:id` - Deactivate a meeting (admin or creator)
/// - `POST /:id/minutes` - Record minutes, closing the current cycle
/// - `POST /:id/missed` - Record a missed reason, closing the current cycle
/// - `POST /:id/reminder` - Send the cycle reminder now
/// - `POST /:id/check-in` - Send the cycle check-in now
pub fn meeting_routes() -> Router<MeetingAppState> {
    Router::new()
        .route("/", get(list_meetings).post(create_meeting))
        .route(
            "/:id",
            get(get_meeting)
                .put(update_meeting)
                .delete(deactivate_meeting),
        )
        .route("/:id/minutes", post(add_minutes_of_meeting))
        .route("/:id/missed", post(add_missed_reason))
        .route("/:id/reminder", post(send_reminder))
        .route("/:id/check-in", post(send_check_in))
}

/// Create the complete meeting module router, suitable for mounting at `/api`.
///
/// # Example
///
/// ```ignore
/// let app = Router::new()
///     .nest("/api", meeting_router())
///     .with_state(app_state);
/// ```
pub fn meeting_router() -> Router<MeetingAppState> {
    Router::new().nest("/meetings", meeting_routes())
}
