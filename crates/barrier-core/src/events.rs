use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::activity::LogEntry;
use crate::barrier::{BarrierAction, BarrierStatus, RejectReason, Snapshot};

/// Every state change in the controller produces an Event.
/// The CLI prints them; service subscribers receive them by broadcast.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    TransitionStarted {
        transition_id: u64,
        action: BarrierAction,
        from: BarrierStatus,
        duration_ms: u64,
        at: DateTime<Utc>,
    },
    /// A request was dropped as a no-op.
    TransitionRejected {
        action: BarrierAction,
        status: BarrierStatus,
        reason: RejectReason,
        at: DateTime<Utc>,
    },
    TransitionCompleted {
        transition_id: u64,
        action: BarrierAction,
        status: BarrierStatus,
        operation_count: u64,
        entry: LogEntry,
        at: DateTime<Utc>,
    },
    StateSnapshot(Snapshot),
}
