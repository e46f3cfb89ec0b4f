//! HTTP DTOs (Data Transfer Objects) for meeting endpoints.
//!
//! These types define the JSON request/response structure for the meeting API.
//! They serve as the boundary between HTTP and the application layer.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::application::handlers::{
    AssigneeDispatch, FanOutReport, MeetingCycleResult, MeetingView,
};
use crate::domain::calendar::{BusinessCalendar, BusinessPeriod, Frequency};
use crate::domain::foundation::{MeetingId, Timestamp, UserId};
use crate::domain::meeting::{
    ActionItemStatus, CycleOutcome, MeetingStatus, MinutesOfMeeting, MissedReason,
    RecurringMeeting, StakeholderRef, UserRef,
};
use crate::ports::NotificationKind;

// ════════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Deserialize)]
pub struct StakeholderRequest {
    pub name: String,
    #[serde(default)]
    pub company: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AssigneeRequest {
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub mobile: Option<String>,
}

/// Request to create a meeting.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateMeetingRequest {
    pub title: String,
    pub stakeholder: StakeholderRequest,
    /// One of weekly, biweekly, monthly, quarterly. Anything else is rejected.
    pub frequency: String,
    pub assigned_to: Vec<AssigneeRequest>,
    /// Date the first cycle is anchored on.
    #[serde(alias = "next_meeting_date")]
    pub anchor_date: NaiveDate,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Request to edit a meeting. Omitted fields keep their current value.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateMeetingRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub stakeholder: Option<StakeholderRequest>,
    #[serde(default)]
    pub frequency: Option<String>,
    #[serde(default)]
    pub assigned_to: Option<Vec<AssigneeRequest>>,
    #[serde(default, alias = "next_meeting_date")]
    pub anchor_date: Option<NaiveDate>,
    /// An empty string clears the notes.
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ActionItemRequest {
    pub task: String,
    #[serde(default)]
    pub assigned_to: Option<String>,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub status: ActionItemStatus,
}

/// Request to record minutes. `date` defaults to today.
#[derive(Debug, Clone, Deserialize)]
pub struct AddMinutesRequest {
    #[serde(default)]
    pub date: Option<NaiveDate>,
    pub content: String,
    #[serde(default)]
    pub attendees: Vec<String>,
    #[serde(default)]
    pub action_items: Vec<ActionItemRequest>,
}

/// Request to record why a meeting was missed. `date` defaults to today.
#[derive(Debug, Clone, Deserialize)]
pub struct AddMissedReasonRequest {
    #[serde(default)]
    pub date: Option<NaiveDate>,
    pub reason: String,
}

// ════════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Serialize)]
pub struct ComplianceResponse {
    pub total_scheduled: u32,
    pub total_attended: u32,
    pub total_missed: u32,
    pub percentage: u8,
}

/// Full meeting view for API responses.
#[derive(Debug, Clone, Serialize)]
pub struct MeetingResponse {
    pub id: MeetingId,
    pub title: String,
    pub stakeholder: StakeholderRef,
    pub frequency: Frequency,
    pub anchor_date: NaiveDate,
    pub current_period: BusinessPeriod,
    pub status: MeetingStatus,
    pub reminder_sent: bool,
    pub check_in_sent: bool,
    pub compliance: ComplianceResponse,
    pub minutes_of_meeting: Vec<MinutesOfMeeting>,
    pub missed_reasons: Vec<MissedReason>,
    pub assigned_to: Vec<UserRef>,
    pub notes: Option<String>,
    pub active: bool,
    pub created_by: UserId,
    pub version: u64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl MeetingResponse {
    pub fn from_meeting(meeting: RecurringMeeting, calendar: &BusinessCalendar) -> Self {
        let current_period = meeting.current_period(calendar);
        let percentage = meeting.compliance_percentage();
        Self::build(meeting, current_period, percentage)
    }

    fn build(meeting: RecurringMeeting, current_period: BusinessPeriod, percentage: u8) -> Self {
        Self {
            id: meeting.id,
            title: meeting.title,
            stakeholder: meeting.stakeholder,
            frequency: meeting.frequency,
            anchor_date: meeting.anchor_date,
            current_period,
            status: meeting.status,
            reminder_sent: meeting.reminder_sent,
            check_in_sent: meeting.check_in_sent,
            compliance: ComplianceResponse {
                total_scheduled: meeting.compliance.total_scheduled,
                total_attended: meeting.compliance.total_attended,
                total_missed: meeting.compliance.total_missed,
                percentage,
            },
            minutes_of_meeting: meeting.minutes_of_meeting,
            missed_reasons: meeting.missed_reasons,
            assigned_to: meeting.assigned_to.into_iter().collect(),
            notes: meeting.notes,
            active: meeting.active,
            created_by: meeting.created_by,
            version: meeting.version,
            created_at: meeting.created_at,
            updated_at: meeting.updated_at,
        }
    }
}

impl From<MeetingView> for MeetingResponse {
    fn from(view: MeetingView) -> Self {
        Self::build(view.meeting, view.current_period, view.compliance_percentage)
    }
}

/// Response after minutes or a missed reason closed a cycle.
#[derive(Debug, Clone, Serialize)]
pub struct CycleClosedResponse {
    pub outcome: CycleOutcome,
    pub closed_period: BusinessPeriod,
    pub previous_anchor: NaiveDate,
    pub next_anchor: NaiveDate,
    pub meeting: MeetingResponse,
}

impl CycleClosedResponse {
    pub fn new(result: MeetingCycleResult, calendar: &BusinessCalendar) -> Self {
        Self {
            outcome: result.rollover.outcome,
            closed_period: result.rollover.closed_period,
            previous_anchor: result.rollover.previous_anchor,
            next_anchor: result.rollover.next_anchor,
            meeting: MeetingResponse::from_meeting(result.meeting, calendar),
        }
    }
}

/// Response after an edit.
#[derive(Debug, Clone, Serialize)]
pub struct MeetingUpdatedResponse {
    /// True when the edit moved the cycle and cleared the sent flags.
    pub cycle_moved: bool,
    pub meeting: MeetingResponse,
}

/// Per-assignee outcome of a notification fan-out.
#[derive(Debug, Clone, Serialize)]
pub struct NotificationReportResponse {
    pub kind: NotificationKind,
    pub dispatches: Vec<AssigneeDispatch>,
}

impl From<FanOutReport> for NotificationReportResponse {
    fn from(report: FanOutReport) -> Self {
        Self {
            kind: report.kind,
            dispatches: report.dispatches,
        }
    }
}

/// Response for create and manual-send operations.
#[derive(Debug, Clone, Serialize)]
pub struct MeetingWithNotificationsResponse {
    pub meeting: MeetingResponse,
    pub notifications: NotificationReportResponse,
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

/// Standard error response.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling.
    pub error_code: String,
    /// Human-readable error message.
    pub message: String,
    /// Additional details (optional).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorResponse {
    pub fn new(error_code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error_code: error_code.into(),
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(
        error_code: impl Into<String>,
        message: impl Into<String>,
        details: serde_json::Value,
    ) -> Self {
        Self {
            error_code: error_code.into(),
            message: message.into(),
            details: Some(details),
        }
    }
}
