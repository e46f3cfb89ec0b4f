//! Meeting recurrence frequency.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::ValidationError;

/// How often a recurring meeting takes place.
///
/// The frequency picks both the calendar period used for trigger days
/// and the number of business days the anchor advances on rollover.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    #[default]
    Weekly,
    Biweekly,
    Monthly,
    Quarterly,
}

impl Frequency {
    pub const ALL: [Frequency; 4] = [
        Frequency::Weekly,
        Frequency::Biweekly,
        Frequency::Monthly,
        Frequency::Quarterly,
    ];

    /// Business days added to the anchor date when a cycle rolls over.
    pub fn business_day_increment(&self) -> u32 {
        match self {
            Frequency::Weekly => 5,
            Frequency::Biweekly => 10,
            Frequency::Monthly => 21,
            Frequency::Quarterly => 63,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Frequency::Weekly => "weekly",
            Frequency::Biweekly => "biweekly",
            Frequency::Monthly => "monthly",
            Frequency::Quarterly => "quarterly",
        }
    }

    /// Parses a stored label, treating anything unrecognised as weekly.
    pub fn from_label_or_weekly(label: &str) -> Self {
        label.parse().unwrap_or(Frequency::Weekly)
    }

    /// Serde hook for persisted records: unknown labels become weekly
    /// instead of failing the whole record.
    pub fn deserialize_lenient<'de, D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let label = String::deserialize(deserializer)?;
        Ok(Self::from_label_or_weekly(&label))
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Frequency {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "weekly" => Ok(Frequency::Weekly),
            "biweekly" => Ok(Frequency::Biweekly),
            "monthly" => Ok(Frequency::Monthly),
            "quarterly" => Ok(Frequency::Quarterly),
            other => Err(ValidationError::invalid_format(
                "frequency",
                format!(
                    "'{}' is not one of weekly, biweekly, monthly, quarterly",
                    other
                ),
            )),
        }
    }
}
