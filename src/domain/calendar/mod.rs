//! Business calendar - pure date arithmetic for recurring meetings.
//!
//! Answers three questions for the scheduler:
//! - is a date a business day under the configured Saturday rule
//! - which working days open and close a meeting's current period
//! - where the next cycle's anchor lands

mod business_calendar;
mod frequency;
mod saturday_policy;

pub use business_calendar::{is_trigger_due, BusinessCalendar, BusinessPeriod};
pub use frequency::Frequency;
pub use saturday_policy::SaturdayPolicy;
