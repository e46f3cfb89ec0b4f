//! Trigger sources that drive the lifecycle scheduler.
//!
//! - `CronTrigger` - fires scheduler passes on cron expressions in a timezone

mod cron_trigger;

pub use cron_trigger::{parse_cron, CronTrigger, CronTriggerConfig};
