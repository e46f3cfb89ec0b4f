//! Append-only history kept on a meeting: minutes and missed reasons.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::domain::foundation::ValidationError;

/// Reason text appended when a cycle closes without minutes.
pub const NO_MINUTES_REASON: &str = "No minutes of meeting recorded";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ActionItemStatus {
    #[default]
    Pending,
    Completed,
}

/// Follow-up task agreed during a meeting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionItem {
    pub task: String,
    pub assigned_to: Option<String>,
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub status: ActionItemStatus,
}

impl ActionItem {
    pub fn new(
        task: impl Into<String>,
        assigned_to: Option<String>,
        due_date: Option<NaiveDate>,
    ) -> Result<Self, ValidationError> {
        let task = task.into();
        if task.trim().is_empty() {
            return Err(ValidationError::empty_field("action_items.task"));
        }
        Ok(Self {
            task,
            assigned_to,
            due_date,
            status: ActionItemStatus::Pending,
        })
    }

    pub fn with_status(mut self, status: ActionItemStatus) -> Self {
        self.status = status;
        self
    }
}

/// Minutes recorded for one held meeting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MinutesOfMeeting {
    pub date: NaiveDate,
    pub content: String,
    #[serde(default)]
    pub attendees: BTreeSet<String>,
    #[serde(default)]
    pub action_items: Vec<ActionItem>,
}

impl MinutesOfMeeting {
    pub fn new(
        date: NaiveDate,
        content: impl Into<String>,
        attendees: impl IntoIterator<Item = String>,
        action_items: Vec<ActionItem>,
    ) -> Result<Self, ValidationError> {
        let content = content.into();
        if content.trim().is_empty() {
            return Err(ValidationError::empty_field("content"));
        }
        Ok(Self {
            date,
            content,
            attendees: attendees.into_iter().collect(),
            action_items,
        })
    }

    pub fn pending_action_items(&self) -> impl Iterator<Item = &ActionItem> {
        self.action_items
            .iter()
            .filter(|item| item.status == ActionItemStatus::Pending)
    }
}

/// Explanation for a cycle that did not take place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MissedReason {
    pub date: NaiveDate,
    pub reason: String,
}

impl MissedReason {
    pub fn new(date: NaiveDate, reason: impl Into<String>) -> Result<Self, ValidationError> {
        let reason = reason.into();
        if reason.trim().is_empty() {
            return Err(ValidationError::empty_field("reason"));
        }
        Ok(Self { date, reason })
    }

    /// Entry written by the scheduler when no minutes exist for a cycle.
    pub fn no_minutes(date: NaiveDate) -> Self {
        Self {
            date,
            reason: NO_MINUTES_REASON.to_string(),
        }
    }

    pub fn is_system_generated(&self) -> bool {
        self.reason == NO_MINUTES_REASON
    }
}
