//! MeetingLifecycleScheduler - the periodic driver of every meeting cycle.
//!
//! Each pass loads the active scheduled meetings, asks the business calendar
//! whether today is a trigger day for the meeting, and applies one step:
//!
//! | Pass | Trigger day | Step |
//! |------|-------------|------|
//! | Reminder | first working day | notify assignees, set `reminder_sent` |
//! | Check-in | last working day | notify assignees, set `check_in_sent` |
//! | Rollover | last working day | close the cycle, advance the anchor |
//!
//! A meeting whose last working day fell outside the catch-up window is
//! overdue; the rollover pass closes each such cycle as missed until the
//! anchor reaches the current period.
//!
//! A tick runs the three passes in that order. A failure on one meeting is
//! logged and reported; the rest of the batch carries on.
//!
//! ## Configuration
//!
//! | Setting | Default | Description |
//! |---------|---------|-------------|
//! | `catch_up_days` | 1 | Days a missed trigger stays due |
//! | `meeting_concurrency` | 8 | Meetings processed in parallel |
//! | `dispatch` | 4 / delivery required | Per-meeting fan-out policy |

use std::fmt;
use std::sync::Arc;

use chrono::NaiveDate;
use futures::stream::{self, StreamExt};
use serde::{Deserialize, Serialize};

use crate::application::handlers::notify::{notify_assignees, DispatchPolicy};
use crate::domain::calendar::BusinessCalendar;
use crate::domain::foundation::{DomainError, MeetingId};
use crate::domain::meeting::{MeetingError, RecurringMeeting};
use crate::ports::{Clock, MeetingRepository, NotificationDispatcher, NotificationKind};

/// Tuning for scheduler passes.
#[derive(Debug, Clone)]
pub struct LifecycleSettings {
    /// Days after a trigger day during which it is still honoured.
    pub catch_up_days: u32,

    /// Maximum meetings processed concurrently within a pass.
    pub meeting_concurrency: usize,

    /// Fan-out policy for assignee notifications.
    pub dispatch: DispatchPolicy,
}

impl Default for LifecycleSettings {
    fn default() -> Self {
        Self {
            catch_up_days: 1,
            meeting_concurrency: 8,
            dispatch: DispatchPolicy::default(),
        }
    }
}

impl LifecycleSettings {
    pub fn with_catch_up_days(mut self, days: u32) -> Self {
        self.catch_up_days = days;
        self
    }

    pub fn with_meeting_concurrency(mut self, concurrency: usize) -> Self {
        self.meeting_concurrency = concurrency;
        self
    }

    pub fn with_dispatch(mut self, dispatch: DispatchPolicy) -> Self {
        self.dispatch = dispatch;
        self
    }
}

/// One of the three scheduler passes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PassKind {
    Reminder,
    CheckIn,
    Rollover,
}

impl PassKind {
    /// Fixed order within a tick.
    pub const TICK_ORDER: [PassKind; 3] = [PassKind::Reminder, PassKind::CheckIn, PassKind::Rollover];
}

impl fmt::Display for PassKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PassKind::Reminder => "reminder",
            PassKind::CheckIn => "check_in",
            PassKind::Rollover => "rollover",
        };
        write!(f, "{}", s)
    }
}

/// A meeting that could not be processed in a pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MeetingFailure {
    pub meeting_id: MeetingId,
    pub error: String,
    pub retryable: bool,
}

/// Summary of one pass over the active meetings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PassReport {
    pub pass: PassKind,
    pub today: NaiveDate,
    /// Meetings loaded for the pass.
    pub examined: usize,
    /// Meetings whose trigger day matched.
    pub triggered: usize,
    /// Meetings successfully updated.
    pub updated: usize,
    pub failures: Vec<MeetingFailure>,
}

enum Step {
    NotDue,
    Updated,
}

/// Drives reminders, check-ins and rollovers for all active meetings.
pub struct MeetingLifecycleScheduler {
    repository: Arc<dyn MeetingRepository>,
    dispatcher: Arc<dyn NotificationDispatcher>,
    clock: Arc<dyn Clock>,
    calendar: BusinessCalendar,
    settings: LifecycleSettings,
}

impl MeetingLifecycleScheduler {
    pub fn new(
        repository: Arc<dyn MeetingRepository>,
        dispatcher: Arc<dyn NotificationDispatcher>,
        clock: Arc<dyn Clock>,
        calendar: BusinessCalendar,
        settings: LifecycleSettings,
    ) -> Self {
        Self {
            repository,
            dispatcher,
            clock,
            calendar,
            settings,
        }
    }

    pub fn settings(&self) -> &LifecycleSettings {
        &self.settings
    }

    pub async fn run_reminder_pass(&self) -> Result<PassReport, DomainError> {
        self.run_pass(PassKind::Reminder).await
    }

    pub async fn run_check_in_pass(&self) -> Result<PassReport, DomainError> {
        self.run_pass(PassKind::CheckIn).await
    }

    pub async fn run_rollover_pass(&self) -> Result<PassReport, DomainError> {
        self.run_pass(PassKind::Rollover).await
    }

    /// Runs reminder, check-in and rollover passes in order.
    ///
    /// Each pass reloads meetings, so the rollover sees the flags written by
    /// the passes before it.
    pub async fn run_tick(&self) -> Result<Vec<PassReport>, DomainError> {
        let mut reports = Vec::with_capacity(PassKind::TICK_ORDER.len());
        for pass in PassKind::TICK_ORDER {
            reports.push(self.run_pass(pass).await?);
        }
        Ok(reports)
    }

    /// Runs a single pass over every active scheduled meeting.
    ///
    /// Only a failure to list meetings is returned as an error; per-meeting
    /// failures end up in the report.
    pub async fn run_pass(&self, pass: PassKind) -> Result<PassReport, DomainError> {
        let today = self.clock.today();
        let meetings = self.repository.find_active_scheduled().await?;
        let examined = meetings.len();

        let outcomes: Vec<(MeetingId, Result<Step, MeetingError>)> = stream::iter(meetings)
            .map(|meeting| async move {
                let id = meeting.id;
                (id, self.process(pass, meeting, today).await)
            })
            .buffer_unordered(self.settings.meeting_concurrency.max(1))
            .collect()
            .await;

        let mut report = PassReport {
            pass,
            today,
            examined,
            triggered: 0,
            updated: 0,
            failures: Vec::new(),
        };

        for (meeting_id, outcome) in outcomes {
            match outcome {
                Ok(Step::NotDue) => {}
                Ok(Step::Updated) => {
                    report.triggered += 1;
                    report.updated += 1;
                }
                Err(e) => {
                    report.triggered += 1;
                    tracing::warn!(
                        pass = %pass,
                        meeting_id = %meeting_id,
                        error = %e,
                        retryable = e.is_retryable(),
                        "Meeting skipped in scheduler pass"
                    );
                    report.failures.push(MeetingFailure {
                        meeting_id,
                        error: e.to_string(),
                        retryable: e.is_retryable(),
                    });
                }
            }
        }

        tracing::info!(
            pass = %pass,
            today = %today,
            examined = report.examined,
            triggered = report.triggered,
            updated = report.updated,
            failed = report.failures.len(),
            "Scheduler pass finished"
        );

        Ok(report)
    }

    async fn process(
        &self,
        pass: PassKind,
        mut meeting: RecurringMeeting,
        today: NaiveDate,
    ) -> Result<Step, MeetingError> {
        let catch_up = self.settings.catch_up_days;
        match pass {
            PassKind::Reminder => {
                if !meeting.is_reminder_due(&self.calendar, today, catch_up) {
                    return Ok(Step::NotDue);
                }
                self.notify(NotificationKind::Reminder, &meeting).await?;
                meeting.mark_reminder_sent();
            }
            PassKind::CheckIn => {
                if !meeting.is_check_in_due(&self.calendar, today, catch_up) {
                    return Ok(Step::NotDue);
                }
                self.notify(NotificationKind::CheckIn, &meeting).await?;
                meeting.mark_check_in_sent();
            }
            PassKind::Rollover => {
                let rollovers = meeting.roll_over_through(&self.calendar, today, catch_up)?;
                if rollovers.is_empty() {
                    return Ok(Step::NotDue);
                }
                if rollovers.len() > 1 {
                    tracing::warn!(
                        meeting_id = %meeting.id,
                        cycles = rollovers.len(),
                        "Overdue meeting cycles closed as missed"
                    );
                }
                for rollover in &rollovers {
                    tracing::info!(
                        meeting_id = %meeting.id,
                        outcome = ?rollover.outcome,
                        previous_anchor = %rollover.previous_anchor,
                        next_anchor = %rollover.next_anchor,
                        "Meeting cycle rolled over"
                    );
                }
            }
        }

        self.repository.save(&meeting).await?;
        Ok(Step::Updated)
    }

    async fn notify(
        &self,
        kind: NotificationKind,
        meeting: &RecurringMeeting,
    ) -> Result<(), MeetingError> {
        let report = notify_assignees(
            self.dispatcher.as_ref(),
            kind,
            meeting,
            &self.settings.dispatch,
        )
        .await;

        if report.is_confirmed(&self.settings.dispatch) {
            tracing::info!(
                meeting_id = %meeting.id,
                kind = %kind,
                recipients = report.dispatches.len(),
                "Meeting notification sent"
            );
            Ok(())
        } else {
            Err(MeetingError::notification_failed(report.failure_summary()))
        }
    }
}
