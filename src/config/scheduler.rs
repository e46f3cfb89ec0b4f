//! Scheduler configuration

use std::time::Duration;

use serde::Deserialize;

use super::error::ValidationError;
use crate::adapters::trigger::{parse_cron, CronTriggerConfig};
use crate::application::handlers::{DispatchPolicy, LifecycleSettings, PassKind};

/// Cron expressions and tuning for the lifecycle passes.
#[derive(Debug, Clone, Deserialize)]
pub struct SchedulerConfig {
    /// Run the cron trigger at all
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Reminder pass (minute hour day month weekday)
    #[serde(default = "default_reminder_cron")]
    pub reminder_cron: String,

    /// Check-in pass
    #[serde(default = "default_check_in_cron")]
    pub check_in_cron: String,

    /// Rollover pass
    #[serde(default = "default_rollover_cron")]
    pub rollover_cron: String,

    /// Days after a trigger day that a missed pass is still honoured
    #[serde(default = "default_catch_up_days")]
    pub catch_up_days: u32,

    /// Meetings processed concurrently within a pass
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,

    /// Assignee sends in flight per meeting
    #[serde(default = "default_dispatch_concurrency")]
    pub dispatch_concurrency: usize,

    /// Only count a send once an email was actually delivered
    #[serde(default = "default_require_delivery")]
    pub require_delivery: bool,

    /// Upper bound on one pass, in seconds
    #[serde(default = "default_batch_timeout")]
    pub batch_timeout_secs: u64,

    /// Run a full tick immediately at startup
    #[serde(default)]
    pub run_on_startup: bool,
}

impl SchedulerConfig {
    pub fn dispatch_policy(&self) -> DispatchPolicy {
        DispatchPolicy {
            concurrency: self.dispatch_concurrency,
            require_delivery: self.require_delivery,
        }
    }

    pub fn lifecycle_settings(&self) -> LifecycleSettings {
        LifecycleSettings::default()
            .with_catch_up_days(self.catch_up_days)
            .with_meeting_concurrency(self.concurrency)
            .with_dispatch(self.dispatch_policy())
    }

    pub fn trigger_config(&self, timezone: chrono_tz::Tz) -> CronTriggerConfig {
        CronTriggerConfig::default()
            .with_timezone(timezone)
            .with_cron(PassKind::Reminder, self.reminder_cron.clone())
            .with_cron(PassKind::CheckIn, self.check_in_cron.clone())
            .with_cron(PassKind::Rollover, self.rollover_cron.clone())
            .with_batch_timeout(Duration::from_secs(self.batch_timeout_secs))
            .with_run_on_startup(self.run_on_startup)
    }

    /// Validate scheduler configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        for (pass, expr) in [
            ("reminder_cron", &self.reminder_cron),
            ("check_in_cron", &self.check_in_cron),
            ("rollover_cron", &self.rollover_cron),
        ] {
            parse_cron(expr).map_err(|e| ValidationError::InvalidCron {
                pass,
                reason: e.message,
            })?;
        }
        if self.concurrency == 0 {
            return Err(ValidationError::InvalidConcurrency("concurrency"));
        }
        if self.dispatch_concurrency == 0 {
            return Err(ValidationError::InvalidConcurrency("dispatch_concurrency"));
        }
        if self.catch_up_days > 6 {
            return Err(ValidationError::InvalidCatchUpDays);
        }
        if self.batch_timeout_secs == 0 {
            return Err(ValidationError::InvalidBatchTimeout);
        }
        Ok(())
    }
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            reminder_cron: default_reminder_cron(),
            check_in_cron: default_check_in_cron(),
            rollover_cron: default_rollover_cron(),
            catch_up_days: default_catch_up_days(),
            concurrency: default_concurrency(),
            dispatch_concurrency: default_dispatch_concurrency(),
            require_delivery: default_require_delivery(),
            batch_timeout_secs: default_batch_timeout(),
            run_on_startup: false,
        }
    }
}

fn default_enabled() -> bool {
    true
}

fn default_reminder_cron() -> String {
    "0 8 * * Mon-Sat".to_string()
}

fn default_check_in_cron() -> String {
    "0 15 * * Mon-Sat".to_string()
}

fn default_rollover_cron() -> String {
    "30 23 * * Mon-Sat".to_string()
}

fn default_catch_up_days() -> u32 {
    1
}

fn default_concurrency() -> usize {
    8
}

fn default_dispatch_concurrency() -> usize {
    4
}

fn default_require_delivery() -> bool {
    true
}

fn default_batch_timeout() -> u64 {
    300
}
