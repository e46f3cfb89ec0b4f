//! HTTP adapters - REST API implementations.

pub mod meeting;

use axum::routing::get;
use axum::Router;

pub use meeting::{meeting_router, MeetingAppState};

/// Full application router: the meeting API under `/api` plus `GET /health`.
pub fn app_router(state: MeetingAppState) -> Router {
    Router::new()
        .route("/health", get(meeting::health))
        .nest("/api", meeting_router())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    use super::*;
    use crate::adapters::clock::SystemClock;
    use crate::adapters::notification::RecordingDispatcher;
    use crate::adapters::storage::InMemoryMeetingRepository;
    use crate::application::handlers::DispatchPolicy;
    use crate::domain::calendar::BusinessCalendar;

    #[tokio::test]
    async fn health_needs_no_authentication() {
        let state = MeetingAppState {
            meeting_repository: Arc::new(InMemoryMeetingRepository::new()),
            dispatcher: Arc::new(RecordingDispatcher::new()),
            clock: Arc::new(SystemClock::default()),
            calendar: BusinessCalendar::default(),
            dispatch_policy: DispatchPolicy::default(),
        };

        let response = app_router(state)
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["status"], "ok");
    }
}
