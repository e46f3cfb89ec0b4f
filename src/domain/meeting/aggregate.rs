//! RecurringMeeting aggregate entity.
//!
//! A recurring meeting is anchored on one date per cycle. The business
//! calendar derives the cycle's first and last working day from that anchor;
//! reminders go out on the first, check-ins and the rollover happen on the
//! last. Rollover decides attended vs missed, then moves the anchor forward.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::domain::calendar::{is_trigger_due, BusinessCalendar, BusinessPeriod, Frequency};
use crate::domain::foundation::{
    Actor, DomainError, ErrorCode, MeetingId, StateMachine, Timestamp, UserId,
};

use super::{
    ComplianceStats, MeetingStatus, MinutesOfMeeting, MissedReason, StakeholderRef, UserRef,
};

/// Caller-supplied fields for a new meeting.
#[derive(Debug, Clone)]
pub struct MeetingDetails {
    pub title: String,
    pub stakeholder: StakeholderRef,
    pub frequency: Frequency,
    pub assigned_to: Vec<UserRef>,
    pub notes: Option<String>,
}

/// Edits to an existing meeting. `None` leaves the field as it is.
#[derive(Debug, Clone, Default)]
pub struct MeetingChanges {
    pub title: Option<String>,
    pub stakeholder: Option<StakeholderRef>,
    pub frequency: Option<Frequency>,
    pub assigned_to: Option<Vec<UserRef>>,
    pub anchor_date: Option<NaiveDate>,
    /// An empty string clears the notes.
    pub notes: Option<String>,
}

/// How a cycle ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CycleOutcome {
    Attended,
    Missed,
}

/// Result of closing one cycle and opening the next.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Rollover {
    pub outcome: CycleOutcome,
    pub closed_period: BusinessPeriod,
    pub previous_anchor: NaiveDate,
    pub next_anchor: NaiveDate,
}

/// RecurringMeeting aggregate.
///
/// # Invariants
///
/// - `assigned_to` is never empty
/// - `anchor_date` strictly increases on every rollover
/// - each rollover adds one to exactly one of attended/missed, then one to scheduled
/// - `reminder_sent` and `check_in_sent` are reset together
/// - minutes and missed reasons are append-only
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecurringMeeting {
    pub id: MeetingId,
    pub title: String,
    pub stakeholder: StakeholderRef,
    #[serde(deserialize_with = "Frequency::deserialize_lenient")]
    pub frequency: Frequency,

    /// Date the current cycle is anchored on.
    pub anchor_date: NaiveDate,

    pub status: MeetingStatus,
    pub reminder_sent: bool,
    pub check_in_sent: bool,
    pub compliance: ComplianceStats,
    pub minutes_of_meeting: Vec<MinutesOfMeeting>,
    pub missed_reasons: Vec<MissedReason>,
    pub assigned_to: BTreeSet<UserRef>,
    pub notes: Option<String>,

    /// Soft-delete flag. Inactive meetings are never scheduled.
    pub active: bool,

    pub created_by: UserId,

    /// Optimistic concurrency token, bumped by the repository on save.
    #[serde(default)]
    pub version: u64,

    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl RecurringMeeting {
    /// Creates a meeting in its first cycle.
    pub fn schedule(
        id: MeetingId,
        details: MeetingDetails,
        anchor_date: NaiveDate,
        created_by: UserId,
    ) -> Result<Self, DomainError> {
        if details.title.trim().is_empty() {
            return Err(DomainError::validation("title", "Title is required"));
        }
        let assigned_to: BTreeSet<UserRef> = details.assigned_to.into_iter().collect();
        if assigned_to.is_empty() {
            return Err(DomainError::validation(
                "assigned_to",
                "At least one assignee is required",
            ));
        }

        let now = Timestamp::now();
        Ok(Self {
            id,
            title: details.title.trim().to_string(),
            stakeholder: details.stakeholder,
            frequency: details.frequency,
            anchor_date,
            status: MeetingStatus::Scheduled,
            reminder_sent: false,
            check_in_sent: false,
            compliance: ComplianceStats::default(),
            minutes_of_meeting: Vec::new(),
            missed_reasons: Vec::new(),
            assigned_to,
            notes: details.notes.filter(|n| !n.trim().is_empty()),
            active: true,
            created_by,
            version: 0,
            created_at: now,
            updated_at: now,
        })
    }

    /// Rejects an anchor whose period closed before `today`.
    pub fn ensure_anchor_current(
        calendar: &BusinessCalendar,
        anchor_date: NaiveDate,
        frequency: Frequency,
        today: NaiveDate,
    ) -> Result<(), DomainError> {
        let last = calendar.last_working_day_of_period(anchor_date, frequency);
        if last < today {
            return Err(DomainError::validation(
                "anchor_date",
                format!(
                    "The {} period of {} ended on {}",
                    frequency, anchor_date, last
                ),
            ));
        }
        Ok(())
    }

    pub fn is_assigned(&self, user_id: &UserId) -> bool {
        self.assigned_to.iter().any(|u| &u.id == user_id)
    }

    /// Admins manage every meeting; users only those assigned to them.
    pub fn can_be_managed_by(&self, actor: &Actor) -> bool {
        actor.is_admin() || self.is_assigned(&actor.user_id)
    }

    pub fn ensure_active(&self) -> Result<(), DomainError> {
        if self.active {
            Ok(())
        } else {
            Err(DomainError::new(
                ErrorCode::MeetingInactive,
                format!("Meeting {} is no longer active", self.id),
            )
            .with_detail("meeting_id", self.id.to_string()))
        }
    }

    pub fn current_period(&self, calendar: &BusinessCalendar) -> BusinessPeriod {
        calendar.period(self.anchor_date, self.frequency)
    }

    fn is_open(&self) -> bool {
        self.active && self.status == MeetingStatus::Scheduled
    }

    pub fn is_reminder_due(
        &self,
        calendar: &BusinessCalendar,
        today: NaiveDate,
        catch_up_days: u32,
    ) -> bool {
        self.is_open()
            && !self.reminder_sent
            && is_trigger_due(
                calendar.first_working_day_of_period(self.anchor_date, self.frequency),
                today,
                catch_up_days,
            )
    }

    pub fn is_check_in_due(
        &self,
        calendar: &BusinessCalendar,
        today: NaiveDate,
        catch_up_days: u32,
    ) -> bool {
        self.is_open()
            && !self.check_in_sent
            && is_trigger_due(
                calendar.last_working_day_of_period(self.anchor_date, self.frequency),
                today,
                catch_up_days,
            )
    }

    /// Rollover ignores the check-in flag: the cycle closes on its last
    /// working day whether or not the check-in went out.
    pub fn is_rollover_due(
        &self,
        calendar: &BusinessCalendar,
        today: NaiveDate,
        catch_up_days: u32,
    ) -> bool {
        self.is_open()
            && is_trigger_due(
                calendar.last_working_day_of_period(self.anchor_date, self.frequency),
                today,
                catch_up_days,
            )
    }

    /// Whether the current cycle's last working day is further back than the
    /// catch-up window, so no rollover pass will ever see it as due.
    pub fn is_overdue(
        &self,
        calendar: &BusinessCalendar,
        today: NaiveDate,
        catch_up_days: u32,
    ) -> bool {
        let last = calendar.last_working_day_of_period(self.anchor_date, self.frequency);
        self.is_open() && (today - last).num_days() > i64::from(catch_up_days)
    }

    pub fn has_minutes_within(&self, period: &BusinessPeriod) -> bool {
        self.minutes_of_meeting
            .iter()
            .any(|mom| period.contains(mom.date))
    }

    pub fn mark_reminder_sent(&mut self) {
        self.reminder_sent = true;
        self.updated_at = Timestamp::now();
    }

    pub fn mark_check_in_sent(&mut self) {
        self.check_in_sent = true;
        self.updated_at = Timestamp::now();
    }

    /// Closes the current cycle based on the minutes on record.
    ///
    /// Minutes dated inside the cycle's working period count as attended;
    /// otherwise a missed reason dated on the period's last working day is
    /// appended.
    pub fn roll_over(&mut self, calendar: &BusinessCalendar) -> Result<Rollover, DomainError> {
        self.ensure_active()?;
        let period = self.current_period(calendar);
        if self.has_minutes_within(&period) {
            self.close_cycle(CycleOutcome::Attended, calendar)
        } else {
            self.missed_reasons.push(MissedReason::no_minutes(period.last));
            self.close_cycle(CycleOutcome::Missed, calendar)
        }
    }

    /// Rolls over every cycle that is overdue, then the current one if its
    /// rollover is due today.
    ///
    /// Afterwards the anchor's period ends on or after `today`.
    pub fn roll_over_through(
        &mut self,
        calendar: &BusinessCalendar,
        today: NaiveDate,
        catch_up_days: u32,
    ) -> Result<Vec<Rollover>, DomainError> {
        let mut rollovers = Vec::new();
        while self.is_overdue(calendar, today, catch_up_days)
            || self.is_rollover_due(calendar, today, catch_up_days)
        {
            rollovers.push(self.roll_over(calendar)?);
        }
        Ok(rollovers)
    }

    /// Appends minutes and closes the current cycle as attended.
    pub fn record_minutes(
        &mut self,
        minutes: MinutesOfMeeting,
        calendar: &BusinessCalendar,
    ) -> Result<Rollover, DomainError> {
        self.ensure_active()?;
        self.ensure_status(MeetingStatus::Completed)?;
        self.minutes_of_meeting.push(minutes);
        self.close_cycle(CycleOutcome::Attended, calendar)
    }

    /// Appends a caller-supplied reason and closes the current cycle as missed.
    pub fn record_missed_reason(
        &mut self,
        reason: MissedReason,
        calendar: &BusinessCalendar,
    ) -> Result<Rollover, DomainError> {
        self.ensure_active()?;
        self.ensure_status(MeetingStatus::Missed)?;
        self.missed_reasons.push(reason);
        self.close_cycle(CycleOutcome::Missed, calendar)
    }

    /// Applies caller edits to an active meeting.
    ///
    /// The anchor only moves forward, and a moved cycle must not already be
    /// over. When the edit changes the cycle's working period both sent flags
    /// are cleared so the new period gets its own reminder and check-in.
    /// Returns whether that happened. Nothing is applied if any field is
    /// rejected.
    pub fn reschedule(
        &mut self,
        changes: MeetingChanges,
        calendar: &BusinessCalendar,
        today: NaiveDate,
    ) -> Result<bool, DomainError> {
        self.ensure_active()?;

        let title = match changes.title {
            Some(title) if title.trim().is_empty() => {
                return Err(DomainError::validation("title", "Title is required"));
            }
            Some(title) => title.trim().to_string(),
            None => self.title.clone(),
        };

        let assigned_to = match changes.assigned_to {
            Some(users) => {
                let users: BTreeSet<UserRef> = users.into_iter().collect();
                if users.is_empty() {
                    return Err(DomainError::validation(
                        "assigned_to",
                        "At least one assignee is required",
                    ));
                }
                users
            }
            None => self.assigned_to.clone(),
        };

        let frequency = changes.frequency.unwrap_or(self.frequency);
        let anchor_date = changes.anchor_date.unwrap_or(self.anchor_date);
        if anchor_date < self.anchor_date {
            return Err(DomainError::validation(
                "anchor_date",
                format!("Anchor cannot move before {}", self.anchor_date),
            ));
        }

        let previous_period = self.current_period(calendar);
        let period = calendar.period(anchor_date, frequency);
        let cycle_moved = period != previous_period;
        if cycle_moved {
            Self::ensure_anchor_current(calendar, anchor_date, frequency, today)?;
        }

        self.title = title;
        if let Some(stakeholder) = changes.stakeholder {
            self.stakeholder = stakeholder;
        }
        self.assigned_to = assigned_to;
        self.frequency = frequency;
        self.anchor_date = anchor_date;
        if let Some(notes) = changes.notes {
            self.notes = Some(notes).filter(|n| !n.trim().is_empty());
        }
        if cycle_moved {
            self.reminder_sent = false;
            self.check_in_sent = false;
        }
        self.updated_at = Timestamp::now();

        Ok(cycle_moved)
    }

    /// Soft delete. History is kept and the meeting drops out of scheduling.
    pub fn deactivate(&mut self) {
        self.active = false;
        self.updated_at = Timestamp::now();
    }

    pub fn compliance_percentage(&self) -> u8 {
        self.compliance.percentage()
    }

    fn close_cycle(
        &mut self,
        outcome: CycleOutcome,
        calendar: &BusinessCalendar,
    ) -> Result<Rollover, DomainError> {
        let closed_period = self.current_period(calendar);
        let previous_anchor = self.anchor_date;

        match outcome {
            CycleOutcome::Attended => {
                self.transition_to(MeetingStatus::Completed)?;
                self.compliance.record_attended();
            }
            CycleOutcome::Missed => {
                self.transition_to(MeetingStatus::Missed)?;
                self.compliance.record_missed();
            }
        }

        // The fixed increment can stay inside a long period (a month with
        // worked Saturdays has more than 21 business days); the next anchor
        // must open a later period so the cycle is not evaluated twice.
        let mut next_anchor = calendar.next_anchor(previous_anchor, self.frequency);
        if next_anchor <= closed_period.last {
            next_anchor = calendar.next_business_day(closed_period.last);
        }

        self.anchor_date = next_anchor;
        self.compliance.schedule_next();
        self.reminder_sent = false;
        self.check_in_sent = false;
        self.transition_to(MeetingStatus::Scheduled)?;
        self.updated_at = Timestamp::now();

        Ok(Rollover {
            outcome,
            closed_period,
            previous_anchor,
            next_anchor,
        })
    }

    fn ensure_status(&self, target: MeetingStatus) -> Result<(), DomainError> {
        if self.status.can_transition_to(&target) {
            Ok(())
        } else {
            Err(self.invalid_transition(target))
        }
    }

    fn transition_to(&mut self, target: MeetingStatus) -> Result<(), DomainError> {
        self.status = self
            .status
            .transition_to(target)
            .map_err(|_| self.invalid_transition(target))?;
        Ok(())
    }

    fn invalid_transition(&self, target: MeetingStatus) -> DomainError {
        DomainError::new(
            ErrorCode::InvalidStateTransition,
            format!("move to {}", target),
        )
        .with_detail("current", self.status.to_string())
    }
}
