//! Activity log of completed barrier transitions.
//!
//! The log is bounded and ordered newest first. Inserting beyond capacity
//! silently drops the oldest entries.

use std::collections::VecDeque;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::barrier::BarrierAction;

pub const DEFAULT_LOG_CAPACITY: usize = 5;

/// One completed transition. Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    id: String,
    action: BarrierAction,
    timestamp: DateTime<Utc>,
    actor: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    reason: Option<String>,
}

impl LogEntry {
    pub fn new(
        id: impl Into<String>,
        action: BarrierAction,
        timestamp: DateTime<Utc>,
        actor: impl Into<String>,
        reason: Option<String>,
    ) -> Self {
        Self {
            id: id.into(),
            action,
            timestamp,
            actor: actor.into(),
            reason,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn action(&self) -> BarrierAction {
        self.action
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn actor(&self) -> &str {
        &self.actor
    }

    pub fn reason(&self) -> Option<&str> {
        self.reason.as_deref()
    }
}

/// Bounded, newest-first list of [`LogEntry`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityLog {
    entries: VecDeque<LogEntry>,
    capacity: usize,
}

impl Default for ActivityLog {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_LOG_CAPACITY)
    }
}

impl ActivityLog {
    /// Create an empty log. Capacity is clamped to `1..=DEFAULT_LOG_CAPACITY`.
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.clamp(1, DEFAULT_LOG_CAPACITY);
        Self {
            entries: VecDeque::with_capacity(capacity + 1),
            capacity,
        }
    }

    /// Replace the contents with historical entries.
    ///
    /// Entries are taken in the given order (expected newest first) and are
    /// not re-sorted. Anything past capacity is dropped from the tail.
    pub fn seed(&mut self, entries: impl IntoIterator<Item = LogEntry>) {
        self.entries = entries.into_iter().take(self.capacity).collect();
    }

    /// Insert at the head, dropping the oldest entries beyond capacity.
    pub fn append(&mut self, entry: LogEntry) {
        self.entries.push_front(entry);
        self.entries.truncate(self.capacity);
    }

    pub fn entries(&self) -> impl Iterator<Item = &LogEntry> {
        self.entries.iter()
    }

    pub fn latest(&self) -> Option<&LogEntry> {
        self.entries.front()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn to_vec(&self) -> Vec<LogEntry> {
        self.entries.iter().cloned().collect()
    }
}

/// Synthetic history shown at startup, newest first.
pub fn seed_entries(now: DateTime<Utc>) -> Vec<LogEntry> {
    vec![
        LogEntry::new(
            "1",
            BarrierAction::Close,
            now - Duration::minutes(15),
            "System",
            Some("Automatic close".into()),
        ),
        LogEntry::new(
            "2",
            BarrierAction::Open,
            now - Duration::minutes(45),
            "Administrator",
            Some("Service vehicle passage".into()),
        ),
        LogEntry::new(
            "3",
            BarrierAction::Close,
            now - Duration::minutes(60),
            "Security",
            Some("End of working day".into()),
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn entry(n: usize) -> LogEntry {
        LogEntry::new(
            n.to_string(),
            BarrierAction::Open,
            Utc::now(),
            "Operator",
            None,
        )
    }

    #[test]
    fn append_inserts_at_head() {
        let mut log = ActivityLog::default();
        log.append(entry(1));
        log.append(entry(2));
        assert_eq!(log.latest().map(LogEntry::id), Some("2"));
        assert_eq!(log.len(), 2);
    }

    #[test]
    fn append_drops_oldest_beyond_capacity() {
        let mut log = ActivityLog::default();
        for n in 1..=7 {
            log.append(entry(n));
        }
        let ids: Vec<&str> = log.entries().map(LogEntry::id).collect();
        assert_eq!(ids, vec!["7", "6", "5", "4", "3"]);
    }

    #[test]
    fn seed_keeps_given_order_and_truncates() {
        let mut log = ActivityLog::with_capacity(2);
        log.seed(seed_entries(Utc::now()));
        let ids: Vec<&str> = log.entries().map(LogEntry::id).collect();
        assert_eq!(ids, vec!["1", "2"]);
    }

    #[test]
    fn seed_entries_are_newest_first() {
        let seeded = seed_entries(Utc::now());
        assert_eq!(seeded.len(), 3);
        assert!(seeded.windows(2).all(|w| w[0].timestamp() > w[1].timestamp()));
        assert_eq!(seeded[1].reason(), Some("Service vehicle passage"));
    }

    #[test]
    fn zero_capacity_is_raised_to_one() {
        let mut log = ActivityLog::with_capacity(0);
        log.append(entry(1));
        log.append(entry(2));
        assert_eq!(log.capacity(), 1);
        assert_eq!(log.len(), 1);
    }

    #[test]
    fn oversized_capacity_is_limited_to_five() {
        let mut log = ActivityLog::with_capacity(10);
        for n in 0..12 {
            log.append(entry(n));
        }
        assert_eq!(log.capacity(), DEFAULT_LOG_CAPACITY);
        assert_eq!(log.len(), 5);
        assert_eq!(log.latest().map(LogEntry::id), Some("11"));
    }

    proptest! {
        #[test]
        fn log_never_exceeds_capacity_and_keeps_newest(
            capacity in 1usize..=DEFAULT_LOG_CAPACITY,
            inserts in 0usize..40,
        ) {
            let mut log = ActivityLog::with_capacity(capacity);
            for n in 0..inserts {
                log.append(entry(n));
            }
            prop_assert!(log.len() <= capacity);
            prop_assert_eq!(log.len(), inserts.min(capacity));
            let expected: Vec<String> = (0..inserts)
                .rev()
                .take(capacity)
                .map(|n| n.to_string())
                .collect();
            let actual: Vec<String> = log.entries().map(|e| e.id().to_string()).collect();
            prop_assert_eq!(actual, expected);
        }
    }
}
