//! Barrier transition controller.
//!
//! The controller is a wall-clock-based state machine. It does not use
//! internal threads - the host either calls `tick()` periodically or fires
//! `complete()` from a scheduled timer (see [`crate::service`]).
//!
//! ## State Transitions
//!
//! ```text
//! Closed --open--> Moving --elapsed--> Open
//! Open  --close--> Moving --elapsed--> Closed
//! Moving --any--> Moving (ignored)
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! let mut controller = BarrierController::new();
//! controller.request_transition(BarrierAction::Open);
//! // In a loop:
//! controller.tick(); // Returns Some(Event) when the transition completes
//! ```

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::{BarrierAction, BarrierStatus, RejectReason, TransitionOutcome};
use crate::activity::{seed_entries, ActivityLog, LogEntry, DEFAULT_LOG_CAPACITY};
use crate::events::Event;
use crate::motion::{ArmMotion, MotionStrategy};
use crate::stats::Counters;

/// Tunables for a controller. Built from [`crate::Config`] or defaulted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControllerSettings {
    pub transition_ms: u64,
    pub strategy: MotionStrategy,
    pub closed_angle: f64,
    pub open_angle: f64,
    pub log_capacity: usize,
    pub operator: String,
    pub initial_operation_count: u64,
    pub battery_level: u8,
}

impl Default for ControllerSettings {
    fn default() -> Self {
        Self {
            transition_ms: 2000,
            strategy: MotionStrategy::Continuous,
            closed_angle: 0.0,
            open_angle: -90.0,
            log_capacity: DEFAULT_LOG_CAPACITY,
            operator: "Operator".into(),
            initial_operation_count: 47,
            battery_level: 87,
        }
    }
}

impl ControllerSettings {
    fn angle_for(&self, status: BarrierStatus) -> f64 {
        match status {
            BarrierStatus::Open => self.open_angle,
            _ => self.closed_angle,
        }
    }
}

/// The one transition that may be in flight.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transition {
    pub id: u64,
    pub action: BarrierAction,
    pub started_at: DateTime<Utc>,
    pub duration_ms: u64,
    pub motion: ArmMotion,
}

impl Transition {
    pub fn completes_at(&self) -> DateTime<Utc> {
        self.started_at + Duration::milliseconds(clamp_ms(self.duration_ms))
    }

    /// 0.0 .. 1.0 progress at `now`.
    pub fn progress_at(&self, now: DateTime<Utc>) -> f64 {
        if self.duration_ms == 0 {
            return 1.0;
        }
        let elapsed = (now - self.started_at).num_milliseconds().max(0) as f64;
        (elapsed / self.duration_ms as f64).min(1.0)
    }

    pub fn remaining_ms_at(&self, now: DateTime<Utc>) -> u64 {
        (self.completes_at() - now).num_milliseconds().max(0) as u64
    }
}

/// Point-in-time view of the whole controller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub status: BarrierStatus,
    pub pending: Option<BarrierAction>,
    pub rotation_deg: f64,
    pub progress: f64,
    pub remaining_ms: u64,
    pub operation_count: u64,
    pub last_operation_at: DateTime<Utc>,
    pub battery_level: u8,
    pub log: Vec<LogEntry>,
    pub at: DateTime<Utc>,
}

/// Core barrier controller.
///
/// Owns all session state. Nothing is persisted; a new controller starts
/// from the seed values.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BarrierController {
    settings: ControllerSettings,
    status: BarrierStatus,
    /// Angle of the arm while no transition is in flight.
    rest_angle: f64,
    pending: Option<Transition>,
    counters: Counters,
    log: ActivityLog,
    next_transition_id: u64,
    last_entry_id: i64,
}

impl Default for BarrierController {
    fn default() -> Self {
        Self::new()
    }
}

impl BarrierController {
    /// Create a controller with default settings, seeded at the current time.
    pub fn new() -> Self {
        Self::with_settings(ControllerSettings::default())
    }

    pub fn with_settings(settings: ControllerSettings) -> Self {
        Self::seeded_at(settings, Utc::now())
    }

    /// Create a controller in `Closed` with the seeded history relative to `now`.
    pub fn seeded_at(settings: ControllerSettings, now: DateTime<Utc>) -> Self {
        let mut log = ActivityLog::with_capacity(settings.log_capacity);
        log.seed(seed_entries(now));
        let counters = Counters::new(
            settings.initial_operation_count,
            settings.battery_level,
            now,
        );
        Self {
            rest_angle: settings.closed_angle,
            settings,
            status: BarrierStatus::Closed,
            pending: None,
            counters,
            log,
            next_transition_id: 1,
            last_entry_id: 0,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn status(&self) -> BarrierStatus {
        self.status
    }

    pub fn pending(&self) -> Option<&Transition> {
        self.pending.as_ref()
    }

    pub fn counters(&self) -> &Counters {
        &self.counters
    }

    pub fn log(&self) -> &ActivityLog {
        &self.log
    }

    pub fn settings(&self) -> &ControllerSettings {
        &self.settings
    }

    pub fn transition_duration(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.settings.transition_ms)
    }

    /// Visual arm angle in degrees. Not authoritative.
    pub fn rotation_at(&self, now: DateTime<Utc>) -> f64 {
        match &self.pending {
            Some(t) => t.motion.angle_at(t.progress_at(now)),
            None => self.rest_angle,
        }
    }

    pub fn progress_at(&self, now: DateTime<Utc>) -> f64 {
        self.pending.map(|t| t.progress_at(now)).unwrap_or(0.0)
    }

    pub fn remaining_ms_at(&self, now: DateTime<Utc>) -> u64 {
        self.pending.map(|t| t.remaining_ms_at(now)).unwrap_or(0)
    }

    pub fn snapshot(&self) -> Snapshot {
        self.snapshot_at(Utc::now())
    }

    pub fn snapshot_at(&self, now: DateTime<Utc>) -> Snapshot {
        Snapshot {
            status: self.status,
            pending: self.pending.map(|t| t.action),
            rotation_deg: self.rotation_at(now),
            progress: self.progress_at(now),
            remaining_ms: self.remaining_ms_at(now),
            operation_count: self.counters.operation_count,
            last_operation_at: self.counters.last_operation_at,
            battery_level: self.counters.battery_level,
            log: self.log.to_vec(),
            at: now,
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    pub fn request_transition(&mut self, action: BarrierAction) -> TransitionOutcome {
        self.request_transition_at(action, Utc::now())
    }

    /// Start a transition unless one is in flight or the barrier is
    /// already in the target status. Status becomes `Moving` immediately.
    pub fn request_transition_at(
        &mut self,
        action: BarrierAction,
        now: DateTime<Utc>,
    ) -> TransitionOutcome {
        let reason = if self.status == BarrierStatus::Moving {
            Some(RejectReason::InProgress)
        } else if self.status == action.target_status() {
            Some(RejectReason::AlreadyInState)
        } else {
            None
        };

        if let Some(reason) = reason {
            tracing::debug!(%action, status = %self.status, %reason, "transition rejected");
            return TransitionOutcome::Rejected {
                reason,
                event: Event::TransitionRejected {
                    action,
                    status: self.status,
                    reason,
                    at: now,
                },
            };
        }

        let from = self.status;
        let transition = Transition {
            id: self.next_transition_id,
            action,
            started_at: now,
            duration_ms: self.settings.transition_ms,
            motion: ArmMotion {
                strategy: self.settings.strategy,
                from_deg: self.rest_angle,
                to_deg: self.settings.angle_for(action.target_status()),
            },
        };
        self.next_transition_id += 1;
        self.status = BarrierStatus::Moving;
        self.pending = Some(transition);
        tracing::debug!(transition_id = transition.id, %action, "transition started");

        TransitionOutcome::Accepted(Event::TransitionStarted {
            transition_id: transition.id,
            action,
            from,
            duration_ms: transition.duration_ms,
            at: now,
        })
    }

    /// Call periodically. Returns `Some(Event::TransitionCompleted)` when
    /// the pending transition's delay has elapsed.
    pub fn tick(&mut self) -> Option<Event> {
        self.tick_at(Utc::now())
    }

    pub fn tick_at(&mut self, now: DateTime<Utc>) -> Option<Event> {
        let transition = self.pending?;
        if now < transition.completes_at() {
            return None;
        }
        self.finish(transition, now)
    }

    /// Fire the scheduled completion of `transition_id`.
    ///
    /// Ignored unless that transition is still the pending one.
    pub fn complete(&mut self, transition_id: u64, at: DateTime<Utc>) -> Option<Event> {
        match self.pending {
            Some(t) if t.id == transition_id => self.finish(t, at),
            _ => {
                tracing::debug!(transition_id, "stale completion ignored");
                None
            }
        }
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn finish(&mut self, transition: Transition, at: DateTime<Utc>) -> Option<Event> {
        self.pending = None;
        self.status = transition.action.target_status();
        self.rest_angle = transition.motion.to_deg;
        self.counters.record_operation(at);

        let entry = LogEntry::new(
            self.next_entry_id(at),
            transition.action,
            at,
            self.settings.operator.clone(),
            Some(transition.action.manual_reason().to_string()),
        );
        self.log.append(entry.clone());

        tracing::info!(
            transition_id = transition.id,
            status = %self.status,
            operation_count = self.counters.operation_count,
            "transition completed"
        );

        Some(Event::TransitionCompleted {
            transition_id: transition.id,
            action: transition.action,
            status: self.status,
            operation_count: self.counters.operation_count,
            entry,
            at,
        })
    }

    /// Epoch milliseconds of `at`, bumped past the last issued id.
    fn next_entry_id(&mut self, at: DateTime<Utc>) -> String {
        let id = at.timestamp_millis().max(self.last_entry_id + 1);
        self.last_entry_id = id;
        id.to_string()
    }
}

fn clamp_ms(ms: u64) -> i64 {
    i64::try_from(ms).unwrap_or(i64::MAX / 2)
}
