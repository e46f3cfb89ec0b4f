//! Attendance counters for a recurring meeting.

use serde::{Deserialize, Serialize};

/// Cumulative cycle counters. Every field only ever grows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplianceStats {
    pub total_scheduled: u32,
    pub total_attended: u32,
    pub total_missed: u32,
}

impl Default for ComplianceStats {
    fn default() -> Self {
        Self {
            total_scheduled: 1,
            total_attended: 0,
            total_missed: 0,
        }
    }
}

impl ComplianceStats {
    pub fn record_attended(&mut self) {
        self.total_attended += 1;
    }

    pub fn record_missed(&mut self) {
        self.total_missed += 1;
    }

    /// Counts the cycle that starts after a rollover.
    pub fn schedule_next(&mut self) {
        self.total_scheduled += 1;
    }

    /// Cycles whose outcome has been decided.
    pub fn evaluated(&self) -> u32 {
        self.total_attended + self.total_missed
    }

    /// Share of evaluated cycles that were attended, rounded to a whole
    /// percent. A meeting with no evaluated cycles is fully compliant.
    pub fn percentage(&self) -> u8 {
        let evaluated = self.evaluated();
        if evaluated == 0 {
            return 100;
        }
        let pct = (f64::from(self.total_attended) / f64::from(evaluated) * 100.0).round();
        pct as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_meeting_counts_first_cycle() {
        let stats = ComplianceStats::default();
        assert_eq!(stats.total_scheduled, 1);
        assert_eq!(stats.evaluated(), 0);
    }

    #[test]
    fn percentage_is_full_without_history() {
        assert_eq!(ComplianceStats::default().percentage(), 100);
    }

    #[test]
    fn percentage_rounds_to_nearest() {
        let stats = ComplianceStats {
            total_scheduled: 4,
            total_attended: 2,
            total_missed: 1,
        };
        assert_eq!(stats.percentage(), 67);
    }

    #[test]
    fn percentage_zero_when_everything_missed() {
        let stats = ComplianceStats {
            total_scheduled: 3,
            total_attended: 0,
            total_missed: 2,
        };
        assert_eq!(stats.percentage(), 0);
    }

    #[test]
    fn counters_increment_independently() {
        let mut stats = ComplianceStats::default();
        stats.record_attended();
        stats.record_missed();
        stats.schedule_next();
        assert_eq!(
            stats,
            ComplianceStats {
                total_scheduled: 2,
                total_attended: 1,
                total_missed: 1,
            }
        );
    }
}
