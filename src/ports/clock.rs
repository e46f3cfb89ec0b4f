//! Clock port - the scheduler's notion of "today".

use chrono::NaiveDate;
use std::fmt;

use crate::domain::foundation::Timestamp;

/// Source of the current time.
///
/// `today` is the calendar date in the organisation's timezone; every
/// business-day comparison uses it rather than the UTC date.
pub trait Clock: Send + Sync + fmt::Debug {
    fn now(&self) -> Timestamp;

    fn today(&self) -> NaiveDate;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clock_is_object_safe() {
        fn _accepts_dyn(_clock: &dyn Clock) {}
    }
}
