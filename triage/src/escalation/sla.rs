//! SLA policy: response deadline from priority.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::classify::Priority;

/// Longest SLA window a policy may configure (ten years)
pub const MAX_SLA_HOURS: i64 = 10 * 365 * 24;

/// Response-time budget per priority, in hours
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SlaPolicy {
    pub critical_hours: i64,
    pub high_hours: i64,
    pub medium_hours: i64,
    pub low_hours: i64,
}

impl Default for SlaPolicy {
    fn default() -> Self {
        Self {
            critical_hours: 2,
            high_hours: 4,
            medium_hours: 24,
            low_hours: 48,
        }
    }
}

impl SlaPolicy {
    pub fn hours_for(&self, priority: Priority) -> i64 {
        match priority {
            Priority::Critical => self.critical_hours,
            Priority::High => self.high_hours,
            Priority::Medium => self.medium_hours,
            Priority::Low => self.low_hours,
        }
    }

    /// Deadline for `priority` counted from `reference` (creation time, or
    /// the time of the latest escalation). Saturates at the latest
    /// representable instant instead of overflowing.
    pub fn deadline(&self, priority: Priority, reference: DateTime<Utc>) -> DateTime<Utc> {
        Duration::try_hours(self.hours_for(priority))
            .and_then(|budget| reference.checked_add_signed(budget))
            .unwrap_or(DateTime::<Utc>::MAX_UTC)
    }

    /// Hours must be positive, at most [`MAX_SLA_HOURS`], and must not
    /// loosen as priority rises
    pub fn validate(&self) -> Result<(), String> {
        let ladder = [
            ("low_hours", self.low_hours),
            ("medium_hours", self.medium_hours),
            ("high_hours", self.high_hours),
            ("critical_hours", self.critical_hours),
        ];
        if let Some((name, _)) = ladder.iter().find(|(_, h)| *h <= 0) {
            return Err(format!("sla.{} must be positive", name));
        }
        if let Some((name, hours)) = ladder.iter().find(|(_, h)| *h > MAX_SLA_HOURS) {
            return Err(format!(
                "sla.{} ({}) exceeds the {} hour limit",
                name, hours, MAX_SLA_HOURS
            ));
        }
        for pair in ladder.windows(2) {
            if pair[1].1 > pair[0].1 {
                return Err(format!(
                    "sla.{} ({}) exceeds sla.{} ({})",
                    pair[1].0, pair[1].1, pair[0].0, pair[0].1
                ));
            }
        }
        Ok(())
    }
}
