//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (value objects, IDs, errors)
//! - `calendar` - Business-day arithmetic and frequency periods
//! - `meeting` - RecurringMeeting aggregate and cycle history

pub mod calendar;
pub mod foundation;
pub mod meeting;
