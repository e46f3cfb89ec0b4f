//! Business-day arithmetic and frequency periods.
//!
//! All functions are pure over calendar dates. Callers truncate "now" to a
//! date in the organisation's timezone before asking anything here.
//!
//! # Period boundaries
//!
//! | Frequency | Period start | Period end |
//! |-----------|--------------|------------|
//! | Weekly | Monday of the anchor's week | Sunday of that week |
//! | Biweekly | Monday of the anchor's week | Sunday of the following week |
//! | Monthly | 1st of the month | last day of the month |
//! | Quarterly | 1st of the quarter | last day of the quarter |
//!
//! The first working day walks forward from the start (inclusive); the last
//! working day walks backward from the end (inclusive).

use chrono::{Datelike, Days, Months, NaiveDate, Weekday};
use serde::Serialize;

use super::{Frequency, SaturdayPolicy};

/// Inclusive range of working days making up one meeting cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BusinessPeriod {
    pub first: NaiveDate,
    pub last: NaiveDate,
}

impl BusinessPeriod {
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.first <= date && date <= self.last
    }
}

/// Organisation calendar: Monday to Friday plus the Saturdays admitted by
/// the configured [`SaturdayPolicy`]. Sunday is never a business day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BusinessCalendar {
    saturday_policy: SaturdayPolicy,
}

impl BusinessCalendar {
    pub fn new(saturday_policy: SaturdayPolicy) -> Self {
        Self { saturday_policy }
    }

    pub fn saturday_policy(&self) -> SaturdayPolicy {
        self.saturday_policy
    }

    pub fn is_business_day(&self, date: NaiveDate) -> bool {
        match date.weekday() {
            Weekday::Sun => false,
            Weekday::Sat => self.saturday_policy.is_working_saturday(date.day()),
            _ => true,
        }
    }

    /// The given date if it is a business day, otherwise the next one.
    pub fn business_day_on_or_after(&self, date: NaiveDate) -> NaiveDate {
        let mut current = date;
        while !self.is_business_day(current) {
            current = current + Days::new(1);
        }
        current
    }

    /// The given date if it is a business day, otherwise the previous one.
    pub fn business_day_on_or_before(&self, date: NaiveDate) -> NaiveDate {
        let mut current = date;
        while !self.is_business_day(current) {
            current = current - Days::new(1);
        }
        current
    }

    /// First business day strictly after `date`.
    pub fn next_business_day(&self, date: NaiveDate) -> NaiveDate {
        self.business_day_on_or_after(date + Days::new(1))
    }

    /// Advances `date` by exactly `n` business days.
    ///
    /// The start date itself is never counted, so a non-business start
    /// behaves like the business day before it.
    pub fn add_business_days(&self, date: NaiveDate, n: u32) -> NaiveDate {
        let mut current = date;
        let mut remaining = n;
        while remaining > 0 {
            current = current + Days::new(1);
            if self.is_business_day(current) {
                remaining -= 1;
            }
        }
        current
    }

    /// Anchor date of the cycle following the one anchored at `anchor`.
    pub fn next_anchor(&self, anchor: NaiveDate, frequency: Frequency) -> NaiveDate {
        self.add_business_days(anchor, frequency.business_day_increment())
    }

    pub fn first_working_day_of_period(&self, date: NaiveDate, frequency: Frequency) -> NaiveDate {
        self.business_day_on_or_after(period_start(date, frequency))
    }

    pub fn last_working_day_of_period(&self, date: NaiveDate, frequency: Frequency) -> NaiveDate {
        self.business_day_on_or_before(period_end(date, frequency))
    }

    pub fn period(&self, date: NaiveDate, frequency: Frequency) -> BusinessPeriod {
        BusinessPeriod {
            first: self.first_working_day_of_period(date, frequency),
            last: self.last_working_day_of_period(date, frequency),
        }
    }

    pub fn is_today_first_working_day(
        &self,
        anchor: NaiveDate,
        frequency: Frequency,
        today: NaiveDate,
    ) -> bool {
        self.first_working_day_of_period(anchor, frequency) == today
    }

    pub fn is_today_last_working_day(
        &self,
        anchor: NaiveDate,
        frequency: Frequency,
        today: NaiveDate,
    ) -> bool {
        self.last_working_day_of_period(anchor, frequency) == today
    }
}

/// Whether a trigger scheduled for `trigger_day` should fire on `today`.
///
/// A trigger stays due for `catch_up_days` after its day so that a skipped
/// tick is honoured late instead of never. Zero means exact-day matching.
pub fn is_trigger_due(trigger_day: NaiveDate, today: NaiveDate, catch_up_days: u32) -> bool {
    today >= trigger_day && (today - trigger_day).num_days() <= i64::from(catch_up_days)
}

fn week_start(date: NaiveDate) -> NaiveDate {
    date - Days::new(u64::from(date.weekday().num_days_from_monday()))
}

fn month_start(date: NaiveDate) -> NaiveDate {
    date - Days::new(u64::from(date.day0()))
}

fn quarter_start(date: NaiveDate) -> NaiveDate {
    month_start(date) - Months::new(date.month0() % 3)
}

fn period_start(date: NaiveDate, frequency: Frequency) -> NaiveDate {
    match frequency {
        Frequency::Weekly | Frequency::Biweekly => week_start(date),
        Frequency::Monthly => month_start(date),
        Frequency::Quarterly => quarter_start(date),
    }
}

fn period_end(date: NaiveDate, frequency: Frequency) -> NaiveDate {
    match frequency {
        Frequency::Weekly => week_start(date) + Days::new(6),
        Frequency::Biweekly => week_start(date) + Days::new(13),
        Frequency::Monthly => month_start(date) + Months::new(1) - Days::new(1),
        Frequency::Quarterly => quarter_start(date) + Months::new(3) - Days::new(1),
    }
}
