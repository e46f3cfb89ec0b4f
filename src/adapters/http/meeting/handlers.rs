//! HTTP handlers for meeting endpoints.
//!
//! These handlers connect Axum routes to application layer command/query handlers.

use std::sync::Arc;

use axum::extract::{Json, Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use crate::application::handlers::{
    ActionItemInput, AddMinutesOfMeetingCommand, AddMinutesOfMeetingHandler,
    AddMissedReasonCommand, AddMissedReasonHandler, AssigneeInput, CreateMeetingCommand,
    CreateMeetingHandler, DeactivateMeetingCommand, DeactivateMeetingHandler, DispatchPolicy,
    GetMeetingHandler, GetMeetingQuery, ListMeetingsHandler, ListMeetingsQuery,
    ManualNotificationResult, SendCheckInManuallyCommand, SendCheckInManuallyHandler,
    SendReminderManuallyCommand, SendReminderManuallyHandler, UpdateMeetingCommand,
    UpdateMeetingHandler,
};
use crate::domain::calendar::{BusinessCalendar, Frequency};
use crate::domain::foundation::{Actor, DomainError, MeetingId, Role, UserId};
use crate::domain::meeting::MeetingError;
use crate::ports::{Clock, MeetingRepository, NotificationDispatcher};

use super::dto::{
    AddMinutesRequest, AddMissedReasonRequest, AssigneeRequest, CreateMeetingRequest,
    CycleClosedResponse, ErrorResponse, HealthResponse, MeetingResponse, MeetingUpdatedResponse,
    MeetingWithNotificationsResponse, UpdateMeetingRequest,
};

// ════════════════════════════════════════════════════════════════════════════════
// Application State
// ════════════════════════════════════════════════════════════════════════════════

/// Shared application state containing all dependencies.
///
/// This struct is cloned for each request and contains Arc-wrapped dependencies
/// for efficient sharing across handlers.
#[derive(Clone)]
pub struct MeetingAppState {
    pub meeting_repository: Arc<dyn MeetingRepository>,
    pub dispatcher: Arc<dyn NotificationDispatcher>,
    pub clock: Arc<dyn Clock>,
    pub calendar: BusinessCalendar,
    pub dispatch_policy: DispatchPolicy,
}

impl MeetingAppState {
    /// Create handlers on demand from the shared state.
    pub fn create_meeting_handler(&self) -> CreateMeetingHandler {
        CreateMeetingHandler::new(
            self.meeting_repository.clone(),
            self.dispatcher.clone(),
            self.clock.clone(),
            self.calendar,
            self.dispatch_policy,
        )
    }

    pub fn update_meeting_handler(&self) -> UpdateMeetingHandler {
        UpdateMeetingHandler::new(
            self.meeting_repository.clone(),
            self.clock.clone(),
            self.calendar,
        )
    }

    pub fn get_meeting_handler(&self) -> GetMeetingHandler {
        GetMeetingHandler::new(self.meeting_repository.clone(), self.calendar)
    }

    pub fn list_meetings_handler(&self) -> ListMeetingsHandler {
        ListMeetingsHandler::new(self.meeting_repository.clone(), self.calendar)
    }

    pub fn deactivate_meeting_handler(&self) -> DeactivateMeetingHandler {
        DeactivateMeetingHandler::new(self.meeting_repository.clone())
    }

    pub fn add_minutes_handler(&self) -> AddMinutesOfMeetingHandler {
        AddMinutesOfMeetingHandler::new(self.meeting_repository.clone(), self.calendar)
    }

    pub fn add_missed_reason_handler(&self) -> AddMissedReasonHandler {
        AddMissedReasonHandler::new(self.meeting_repository.clone(), self.calendar)
    }

    pub fn send_reminder_handler(&self) -> SendReminderManuallyHandler {
        SendReminderManuallyHandler::new(
            self.meeting_repository.clone(),
            self.dispatcher.clone(),
            self.dispatch_policy,
        )
    }

    pub fn send_check_in_handler(&self) -> SendCheckInManuallyHandler {
        SendCheckInManuallyHandler::new(
            self.meeting_repository.clone(),
            self.dispatcher.clone(),
            self.dispatch_policy,
        )
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// User Context (set by the fronting identity proxy)
// ════════════════════════════════════════════════════════════════════════════════

/// Authenticated caller extracted from request headers.
///
/// `X-User-Id` is required. `X-User-Role` is optional and defaults to `user`;
/// an unrecognised role is treated as unauthenticated.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub actor: Actor,
}

/// Rejection type for AuthenticatedUser extraction.
pub struct AuthenticationRequired;

impl IntoResponse for AuthenticationRequired {
    fn into_response(self) -> axum::response::Response {
        let error = ErrorResponse::new("AUTHENTICATION_REQUIRED", "Authentication is required");
        (StatusCode::UNAUTHORIZED, Json(error)).into_response()
    }
}

impl<S> axum::extract::FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = AuthenticationRequired;

    fn from_request_parts<'life0, 'life1, 'async_trait>(
        parts: &'life0 mut axum::http::request::Parts,
        _state: &'life1 S,
    ) -> std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Self, Self::Rejection>> + Send + 'async_trait>,
    >
    where
        'life0: 'async_trait,
        'life1: 'async_trait,
        Self: 'async_trait,
    {
        Box::pin(async move {
            let user_id = parts
                .headers
                .get("X-User-Id")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| UserId::new(s).ok())
                .ok_or(AuthenticationRequired)?;

            let role = match parts.headers.get("X-User-Role") {
                None => Role::User,
                Some(value) => value
                    .to_str()
                    .ok()
                    .and_then(|s| s.parse::<Role>().ok())
                    .ok_or(AuthenticationRequired)?,
            };

            Ok(AuthenticatedUser {
                actor: Actor::new(user_id, role),
            })
        })
    }
}

fn parse_meeting_id(raw: &str) -> Result<MeetingId, MeetingApiError> {
    raw.parse::<MeetingId>().map_err(|_| {
        MeetingApiError(MeetingError::validation(
            "meeting_id",
            format!("'{}' is not a valid meeting id", raw),
        ))
    })
}

// ════════════════════════════════════════════════════════════════════════════════
// Query Handlers (GET endpoints)
// ════════════════════════════════════════════════════════════════════════════════

/// GET /health - Liveness check
pub async fn health() -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// GET /api/meetings - Active meetings visible to the caller, by anchor date
pub async fn list_meetings(
    State(state): State<MeetingAppState>,
    user: AuthenticatedUser,
) -> Result<impl IntoResponse, MeetingApiError> {
    let handler = state.list_meetings_handler();
    let views = handler
        .handle(ListMeetingsQuery { actor: user.actor })
        .await?;

    let response: Vec<MeetingResponse> = views.into_iter().map(MeetingResponse::from).collect();
    Ok(Json(response))
}

/// GET /api/meetings/:id - Get meeting details
pub async fn get_meeting(
    State(state): State<MeetingAppState>,
    user: AuthenticatedUser,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, MeetingApiError> {
    let handler = state.get_meeting_handler();
    let query = GetMeetingQuery {
        meeting_id: parse_meeting_id(&id)?,
        actor: user.actor,
    };

    let view = handler.handle(query).await?;

    Ok(Json(MeetingResponse::from(view)))
}

// ════════════════════════════════════════════════════════════════════════════════
// Command Handlers (POST/DELETE endpoints)
// ════════════════════════════════════════════════════════════════════════════════

/// POST /api/meetings - Create a meeting
pub async fn create_meeting(
    State(state): State<MeetingAppState>,
    user: AuthenticatedUser,
    Json(request): Json<CreateMeetingRequest>,
) -> Result<impl IntoResponse, MeetingApiError> {
    let frequency: Frequency = request.frequency.parse()?;
    let handler = state.create_meeting_handler();
    let cmd = CreateMeetingCommand {
        actor: user.actor,
        title: request.title,
        stakeholder_name: request.stakeholder.name,
        stakeholder_company: request.stakeholder.company,
        frequency,
        assigned_to: assignee_inputs(request.assigned_to),
        anchor_date: request.anchor_date,
        notes: request.notes,
    };

    let result = handler.handle(cmd).await?;

    let response = MeetingWithNotificationsResponse {
        meeting: MeetingResponse::from_meeting(result.meeting, &state.calendar),
        notifications: result.notifications.into(),
    };
    Ok((StatusCode::CREATED, Json(response)))
}

/// PUT /api/meetings/:id - Edit or reschedule a meeting
pub async fn update_meeting(
    State(state): State<MeetingAppState>,
    user: AuthenticatedUser,
    Path(id): Path<String>,
    Json(request): Json<UpdateMeetingRequest>,
) -> Result<impl IntoResponse, MeetingApiError> {
    let meeting_id = parse_meeting_id(&id)?;
    let frequency = request
        .frequency
        .map(|raw| raw.parse::<Frequency>())
        .transpose()?;
    let (stakeholder_name, stakeholder_company) = match request.stakeholder {
        Some(stakeholder) => (Some(stakeholder.name), stakeholder.company),
        None => (None, None),
    };

    let handler = state.update_meeting_handler();
    let cmd = UpdateMeetingCommand {
        meeting_id,
        actor: user.actor,
        title: request.title,
        stakeholder_name,
        stakeholder_company,
        frequency,
        assigned_to: request.assigned_to.map(assignee_inputs),
        anchor_date: request.anchor_date,
        notes: request.notes,
    };

    let result = handler.handle(cmd).await?;

    Ok(Json(MeetingUpdatedResponse {
        cycle_moved: result.cycle_moved,
        meeting: MeetingResponse::from_meeting(result.meeting, &state.calendar),
    }))
}

/// DELETE /api/meetings/:id - Deactivate a meeting
pub async fn deactivate_meeting(
    State(state): State<MeetingAppState>,
    user: AuthenticatedUser,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, MeetingApiError> {
    let handler = state.deactivate_meeting_handler();
    let cmd = DeactivateMeetingCommand {
        meeting_id: parse_meeting_id(&id)?,
        actor: user.actor,
    };

    let meeting = handler.handle(cmd).await?;

    Ok(Json(MeetingResponse::from_meeting(meeting, &state.calendar)))
}

/// POST /api/meetings/:id/minutes - Record minutes and close the cycle
pub async fn add_minutes_of_meeting(
    State(state): State<MeetingAppState>,
    user: AuthenticatedUser,
    Path(id): Path<String>,
    Json(request): Json<AddMinutesRequest>,
) -> Result<impl IntoResponse, MeetingApiError> {
    let handler = state.add_minutes_handler();
    let cmd = AddMinutesOfMeetingCommand {
        meeting_id: parse_meeting_id(&id)?,
        actor: user.actor,
        date: request.date.unwrap_or_else(|| state.clock.today()),
        content: request.content,
        attendees: request.attendees,
        action_items: request
            .action_items
            .into_iter()
            .map(|item| ActionItemInput {
                task: item.task,
                assigned_to: item.assigned_to,
                due_date: item.due_date,
                status: item.status,
            })
            .collect(),
    };

    let result = handler.handle(cmd).await?;

    Ok(Json(CycleClosedResponse::new(result, &state.calendar)))
}

/// POST /api/meetings/:id/missed - Record a missed reason and close the cycle
pub async fn add_missed_reason(
    State(state): State<MeetingAppState>,
    user: AuthenticatedUser,
    Path(id): Path<String>,
    Json(request): Json<AddMissedReasonRequest>,
) -> Result<impl IntoResponse, MeetingApiError> {
    let handler = state.add_missed_reason_handler();
    let cmd = AddMissedReasonCommand {
        meeting_id: parse_meeting_id(&id)?,
        actor: user.actor,
        date: request.date.unwrap_or_else(|| state.clock.today()),
        reason: request.reason,
    };

    let result = handler.handle(cmd).await?;

    Ok(Json(CycleClosedResponse::new(result, &state.calendar)))
}

/// POST /api/meetings/:id/reminder - Send the reminder now
pub async fn send_reminder(
    State(state): State<MeetingAppState>,
    user: AuthenticatedUser,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, MeetingApiError> {
    let handler = state.send_reminder_handler();
    let cmd = SendReminderManuallyCommand {
        meeting_id: parse_meeting_id(&id)?,
        actor: user.actor,
    };

    let result = handler.handle(cmd).await?;

    Ok(Json(notification_response(result, &state.calendar)))
}

/// POST /api/meetings/:id/check-in - Send the check-in now
pub async fn send_check_in(
    State(state): State<MeetingAppState>,
    user: AuthenticatedUser,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, MeetingApiError> {
    let handler = state.send_check_in_handler();
    let cmd = SendCheckInManuallyCommand {
        meeting_id: parse_meeting_id(&id)?,
        actor: user.actor,
    };

    let result = handler.handle(cmd).await?;

    Ok(Json(notification_response(result, &state.calendar)))
}

fn assignee_inputs(requests: Vec<AssigneeRequest>) -> Vec<AssigneeInput> {
    requests
        .into_iter()
        .map(|a| AssigneeInput {
            id: a.id,
            name: a.name,
            email: a.email,
            mobile: a.mobile,
        })
        .collect()
}

fn notification_response(
    result: ManualNotificationResult,
    calendar: &BusinessCalendar,
) -> MeetingWithNotificationsResponse {
    MeetingWithNotificationsResponse {
        meeting: MeetingResponse::from_meeting(result.meeting, calendar),
        notifications: result.report.into(),
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Error Handling
// ════════════════════════════════════════════════════════════════════════════════

/// API error wrapper that converts MeetingError to HTTP responses.
#[derive(Debug)]
pub struct MeetingApiError(pub MeetingError);

impl From<MeetingError> for MeetingApiError {
    fn from(err: MeetingError) -> Self {
        Self(err)
    }
}

impl From<DomainError> for MeetingApiError {
    fn from(err: DomainError) -> Self {
        Self(MeetingError::from(err))
    }
}

impl From<crate::domain::foundation::ValidationError> for MeetingApiError {
    fn from(err: crate::domain::foundation::ValidationError) -> Self {
        Self(MeetingError::from(err))
    }
}

impl IntoResponse for MeetingApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, error_code) = match &self.0 {
            MeetingError::NotFound(_) => (StatusCode::NOT_FOUND, "MEETING_NOT_FOUND"),
            MeetingError::Inactive(_) => (StatusCode::CONFLICT, "MEETING_INACTIVE"),
            MeetingError::Forbidden { .. } => (StatusCode::FORBIDDEN, "FORBIDDEN"),
            MeetingError::ValidationFailed { .. } => {
                (StatusCode::BAD_REQUEST, "VALIDATION_FAILED")
            }
            MeetingError::InvalidState { .. } => {
                (StatusCode::CONFLICT, "INVALID_STATE_TRANSITION")
            }
            MeetingError::Conflict(_) => (StatusCode::CONFLICT, "CONCURRENCY_CONFLICT"),
            MeetingError::NotificationFailed { .. } => {
                (StatusCode::BAD_GATEWAY, "NOTIFICATION_FAILED")
            }
            MeetingError::Infrastructure(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR")
            }
        };

        if status.is_server_error() {
            tracing::error!(error = %self.0, "Meeting request failed");
        }

        let message = self.0.message();
        let body = match &self.0 {
            MeetingError::ValidationFailed { field, .. } => {
                ErrorResponse::with_details(error_code, message, json!({ "field": field }))
            }
            _ => ErrorResponse::new(error_code, message),
        };
        (status, Json(body)).into_response()
    }
}
