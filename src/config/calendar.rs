//! Business calendar configuration

use chrono_tz::Tz;
use serde::Deserialize;

use super::error::ValidationError;
use crate::domain::calendar::{BusinessCalendar, SaturdayPolicy};

/// Working-day rules and the organisation's timezone.
#[derive(Debug, Clone, Deserialize)]
pub struct CalendarConfig {
    /// Which Saturdays are worked: `none` or `week_of_month` (alias `day_of_month_groups`)
    #[serde(default)]
    pub saturday_policy: SaturdayPolicy,

    /// IANA timezone used for "today" and for cron evaluation
    #[serde(default = "default_timezone")]
    pub timezone: String,
}

impl CalendarConfig {
    pub fn business_calendar(&self) -> BusinessCalendar {
        BusinessCalendar::new(self.saturday_policy)
    }

    /// Parsed timezone
    pub fn tz(&self) -> Result<Tz, ValidationError> {
        self.timezone
            .parse::<Tz>()
            .map_err(|_| ValidationError::InvalidTimezone(self.timezone.clone()))
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        self.tz().map(|_| ())
    }
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self {
            saturday_policy: SaturdayPolicy::default(),
            timezone: default_timezone(),
        }
    }
}

fn default_timezone() -> String {
    "UTC".to_string()
}
