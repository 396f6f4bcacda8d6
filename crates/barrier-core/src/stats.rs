//! Counters shown on the system statistics card.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Counters {
    /// Completed transitions, including the seeded history count.
    pub operation_count: u64,
    pub last_operation_at: DateTime<Utc>,
    /// Static display value in percent. There is no charge model.
    pub battery_level: u8,
}

impl Counters {
    pub fn new(operation_count: u64, battery_level: u8, now: DateTime<Utc>) -> Self {
        Self {
            operation_count,
            last_operation_at: now,
            battery_level: battery_level.min(100),
        }
    }

    pub(crate) fn record_operation(&mut self, at: DateTime<Utc>) {
        self.operation_count = self.operation_count.saturating_add(1);
        self.last_operation_at = at;
    }
}
