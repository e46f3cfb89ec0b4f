//! Meeting cycle status.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::StateMachine;

/// Status of the current meeting cycle.
///
/// Meetings rest in `Scheduled` between cycles. `Completed` and `Missed`
/// are only observable while a rollover is being applied.
///
/// ```text
/// Scheduled ──► Completed ──► Scheduled
///     │                          ▲
///     └────────► Missed ─────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MeetingStatus {
    #[default]
    Scheduled,
    Completed,
    Missed,
}

impl StateMachine for MeetingStatus {
    fn valid_transitions(&self) -> Vec<Self> {
        match self {
            MeetingStatus::Scheduled => vec![MeetingStatus::Completed, MeetingStatus::Missed],
            MeetingStatus::Completed | MeetingStatus::Missed => vec![MeetingStatus::Scheduled],
        }
    }
}

impl fmt::Display for MeetingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            MeetingStatus::Scheduled => "scheduled",
            MeetingStatus::Completed => "completed",
            MeetingStatus::Missed => "missed",
        };
        write!(f, "{}", s)
    }
}
