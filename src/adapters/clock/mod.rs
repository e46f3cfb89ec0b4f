//! Clock adapters.
//!
//! - `SystemClock` - wall clock, dates observed in the organisation's timezone
//! - `FixedClock` - settable clock for tests and replays

use std::sync::RwLock;

use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;

use crate::domain::foundation::Timestamp;
use crate::ports::Clock;

/// Production clock. `today()` is the current date in `tz`, not in UTC.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    tz: Tz,
}

impl SystemClock {
    pub fn new(tz: Tz) -> Self {
        Self { tz }
    }

    pub fn timezone(&self) -> Tz {
        self.tz
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new(chrono_tz::UTC)
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Timestamp::now()
    }

    fn today(&self) -> NaiveDate {
        self.now().date_in(&self.tz)
    }
}

/// Clock pinned to a chosen instant until moved.
#[derive(Debug)]
pub struct FixedClock {
    tz: Tz,
    instant: RwLock<DateTime<Utc>>,
}

impl FixedClock {
    pub fn at(instant: DateTime<Utc>, tz: Tz) -> Self {
        Self {
            tz,
            instant: RwLock::new(instant),
        }
    }

    /// Clock at midday of `date` in `tz`.
    pub fn on_date(date: NaiveDate, tz: Tz) -> Self {
        let local = date.and_time(NaiveTime::from_hms_opt(12, 0, 0).unwrap_or(NaiveTime::MIN));
        let instant = tz
            .from_local_datetime(&local)
            .earliest()
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or_else(|| Utc.from_utc_datetime(&local));
        Self::at(instant, tz)
    }

    pub fn set(&self, instant: DateTime<Utc>) {
        if let Ok(mut guard) = self.instant.write() {
            *guard = instant;
        }
    }

    /// Moves the clock to midday of `date`.
    pub fn set_date(&self, date: NaiveDate) {
        let moved = Self::on_date(date, self.tz);
        self.set(*moved.now().as_datetime());
    }
}

impl Clock for FixedClock {
    fn now(&self) -> Timestamp {
        let instant = self
            .instant
            .read()
            .map(|guard| *guard)
            .unwrap_or_else(|poisoned| *poisoned.into_inner());
        Timestamp::from_datetime(instant)
    }

    fn today(&self) -> NaiveDate {
        self.now().date_in(&self.tz)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono_tz::{America::New_York, Asia::Kolkata};

    #[test]
    fn today_follows_the_configured_timezone() {
        // 20:00 UTC is already the next day in Kolkata (+05:30).
        let instant = Utc.with_ymd_and_hms(2026, 3, 10, 20, 0, 0).unwrap();

        let kolkata = FixedClock::at(instant, Kolkata);
        let new_york = FixedClock::at(instant, New_York);

        assert_eq!(kolkata.today(), NaiveDate::from_ymd_opt(2026, 3, 11).unwrap());
        assert_eq!(new_york.today(), NaiveDate::from_ymd_opt(2026, 3, 10).unwrap());
    }

    #[test]
    fn set_date_moves_today() {
        let clock = FixedClock::on_date(NaiveDate::from_ymd_opt(2026, 3, 9).unwrap(), Kolkata);
        clock.set_date(NaiveDate::from_ymd_opt(2026, 3, 13).unwrap());

        assert_eq!(clock.today(), NaiveDate::from_ymd_opt(2026, 3, 13).unwrap());
    }

    #[test]
    fn system_clock_today_is_close_to_utc_today() {
        let clock = SystemClock::default();
        let diff = (clock.today() - Utc::now().date_naive()).num_days().abs();
        assert!(diff <= 1);
    }
}
