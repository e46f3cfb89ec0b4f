//! Meeting-specific error types.
//!
//! # HTTP Status Mapping
//!
//! | Error | HTTP Status |
//! |-------|-------------|
//! | NotFound | 404 |
//! | Inactive | 409 |
//! | InvalidState | 409 |
//! | Conflict | 409 |
//! | Forbidden | 403 |
//! | ValidationFailed | 400 |
//! | NotificationFailed | 502 |
//! | Infrastructure | 500 |

use crate::domain::foundation::{DomainError, ErrorCode, MeetingId, UserId, ValidationError};

/// Errors raised by meeting commands and queries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MeetingError {
    /// Meeting does not exist.
    NotFound(MeetingId),

    /// Meeting has been deactivated.
    Inactive(MeetingId),

    /// Caller is neither an admin nor assigned to the meeting.
    Forbidden { meeting_id: MeetingId, user_id: UserId },

    /// Input failed validation.
    ValidationFailed { field: String, message: String },

    /// Status change not allowed from the current status.
    InvalidState { current: String, attempted: String },

    /// Another writer updated the meeting first.
    Conflict(MeetingId),

    /// No assignee could be reached on the primary channel.
    NotificationFailed { reason: String },

    /// Storage or other infrastructure failure.
    Infrastructure(String),
}

impl MeetingError {
    pub fn not_found(id: MeetingId) -> Self {
        MeetingError::NotFound(id)
    }

    pub fn inactive(id: MeetingId) -> Self {
        MeetingError::Inactive(id)
    }

    pub fn forbidden(meeting_id: MeetingId, user_id: UserId) -> Self {
        MeetingError::Forbidden {
            meeting_id,
            user_id,
        }
    }

    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        MeetingError::ValidationFailed {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn invalid_state(current: impl Into<String>, attempted: impl Into<String>) -> Self {
        MeetingError::InvalidState {
            current: current.into(),
            attempted: attempted.into(),
        }
    }

    pub fn conflict(id: MeetingId) -> Self {
        MeetingError::Conflict(id)
    }

    pub fn notification_failed(reason: impl Into<String>) -> Self {
        MeetingError::NotificationFailed {
            reason: reason.into(),
        }
    }

    pub fn infrastructure(message: impl Into<String>) -> Self {
        MeetingError::Infrastructure(message.into())
    }

    /// Returns the error code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            MeetingError::NotFound(_) => ErrorCode::MeetingNotFound,
            MeetingError::Inactive(_) => ErrorCode::MeetingInactive,
            MeetingError::Forbidden { .. } => ErrorCode::Forbidden,
            MeetingError::ValidationFailed { .. } => ErrorCode::ValidationFailed,
            MeetingError::InvalidState { .. } => ErrorCode::InvalidStateTransition,
            MeetingError::Conflict(_) => ErrorCode::ConcurrencyConflict,
            MeetingError::NotificationFailed { .. } => ErrorCode::NotificationFailed,
            MeetingError::Infrastructure(_) => ErrorCode::DatabaseError,
        }
    }

    /// Returns a user-friendly error message.
    pub fn message(&self) -> String {
        match self {
            MeetingError::NotFound(id) => format!("Meeting not found: {}", id),
            MeetingError::Inactive(id) => format!("Meeting {} is no longer active", id),
            MeetingError::Forbidden {
                meeting_id,
                user_id,
            } => format!(
                "User {} is not allowed to manage meeting {}",
                user_id, meeting_id
            ),
            MeetingError::ValidationFailed { field, message } => {
                format!("Validation failed for '{}': {}", field, message)
            }
            MeetingError::InvalidState { current, attempted } => {
                format!("Cannot {} meeting in {} state", attempted, current)
            }
            MeetingError::Conflict(id) => {
                format!("Meeting {} was modified concurrently, retry the request", id)
            }
            MeetingError::NotificationFailed { reason } => {
                format!("Notification could not be delivered: {}", reason)
            }
            MeetingError::Infrastructure(msg) => format!("Error: {}", msg),
        }
    }

    /// Returns true if repeating the operation may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            MeetingError::Conflict(_)
                | MeetingError::NotificationFailed { .. }
                | MeetingError::Infrastructure(_)
        )
    }
}

impl std::fmt::Display for MeetingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for MeetingError {}

impl From<DomainError> for MeetingError {
    fn from(err: DomainError) -> Self {
        let field = err
            .details
            .get("field")
            .cloned()
            .unwrap_or_else(|| "unknown".to_string());
        match err.code {
            ErrorCode::ValidationFailed
            | ErrorCode::EmptyField
            | ErrorCode::OutOfRange
            | ErrorCode::InvalidFormat => MeetingError::ValidationFailed {
                field,
                message: err.message,
            },
            ErrorCode::InvalidStateTransition => MeetingError::InvalidState {
                current: err
                    .details
                    .get("current")
                    .cloned()
                    .unwrap_or_else(|| "unknown".to_string()),
                attempted: err.message,
            },
            ErrorCode::NotificationFailed => MeetingError::NotificationFailed {
                reason: err.message,
            },
            ErrorCode::ConcurrencyConflict | ErrorCode::MeetingNotFound => {
                let id = err
                    .details
                    .get("meeting_id")
                    .and_then(|raw| raw.parse::<MeetingId>().ok());
                match (err.code, id) {
                    (ErrorCode::ConcurrencyConflict, Some(id)) => MeetingError::Conflict(id),
                    (ErrorCode::MeetingNotFound, Some(id)) => MeetingError::NotFound(id),
                    _ => MeetingError::Infrastructure(err.to_string()),
                }
            }
            _ => MeetingError::Infrastructure(err.to_string()),
        }
    }
}

impl From<ValidationError> for MeetingError {
    fn from(err: ValidationError) -> Self {
        MeetingError::ValidationFailed {
            field: err.field().to_string(),
            message: err.to_string(),
        }
    }
}

impl From<MeetingError> for DomainError {
    fn from(err: MeetingError) -> Self {
        DomainError::new(err.code(), err.message())
    }
}
