//! Which Saturdays count as working days.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::ValidationError;

/// Rule deciding whether a given Saturday is a business day.
///
/// | Policy | Working Saturdays |
/// |--------|-------------------|
/// | `None` | never |
/// | `WeekOfMonth` | `ceil(day / 7)` is 1, 3 or 5 (days 1-7, 15-21, 29-31) |
///
/// Grouping days as `(day - 1) / 7` and working groups 0, 2 and 4 picks the
/// same Saturdays, so `day_of_month_groups` is accepted as another name for
/// `week_of_month`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SaturdayPolicy {
    None,
    #[default]
    #[serde(alias = "day_of_month_groups")]
    WeekOfMonth,
}

impl SaturdayPolicy {
    /// Whether a Saturday falling on `day_of_month` (1-based) is worked.
    pub fn is_working_saturday(&self, day_of_month: u32) -> bool {
        match self {
            SaturdayPolicy::None => false,
            SaturdayPolicy::WeekOfMonth => {
                let week = (day_of_month + 6) / 7;
                matches!(week, 1 | 3 | 5)
            }
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SaturdayPolicy::None => "none",
            SaturdayPolicy::WeekOfMonth => "week_of_month",
        }
    }
}

impl fmt::Display for SaturdayPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for SaturdayPolicy {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" => Ok(SaturdayPolicy::None),
            "week_of_month" | "day_of_month_groups" => Ok(SaturdayPolicy::WeekOfMonth),
            other => Err(ValidationError::invalid_format(
                "saturday_policy",
                format!("unknown policy '{}'", other),
            )),
        }
    }
}
