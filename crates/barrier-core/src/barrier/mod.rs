mod controller;

pub use controller::{BarrierController, ControllerSettings, Snapshot, Transition};

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::events::Event;

/// Current status of the barrier. Exactly one is active at any time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BarrierStatus {
    Closed,
    Open,
    /// A transition is in flight. Always resolves to `Open` or `Closed`.
    Moving,
}

impl BarrierStatus {
    /// `Open` and `Closed` are terminal; `Moving` is not.
    pub fn is_terminal(self) -> bool {
        !matches!(self, BarrierStatus::Moving)
    }
}

impl fmt::Display for BarrierStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            BarrierStatus::Closed => "closed",
            BarrierStatus::Open => "open",
            BarrierStatus::Moving => "moving",
        };
        f.write_str(s)
    }
}

/// Operator command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BarrierAction {
    Open,
    Close,
}

impl BarrierAction {
    /// Terminal status reached when this action completes.
    pub fn target_status(self) -> BarrierStatus {
        match self {
            BarrierAction::Open => BarrierStatus::Open,
            BarrierAction::Close => BarrierStatus::Closed,
        }
    }

    /// Reason recorded on log entries for operator-initiated transitions.
    pub fn manual_reason(self) -> &'static str {
        match self {
            BarrierAction::Open => "Manual open",
            BarrierAction::Close => "Manual close",
        }
    }
}

impl fmt::Display for BarrierAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BarrierAction::Open => f.write_str("open"),
            BarrierAction::Close => f.write_str("close"),
        }
    }
}

impl FromStr for BarrierAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "open" => Ok(BarrierAction::Open),
            "close" => Ok(BarrierAction::Close),
            other => Err(format!("unknown barrier action: {other}")),
        }
    }
}

/// Why a transition request was dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectReason {
    /// Another transition is in flight.
    InProgress,
    /// The barrier is already in the requested terminal status.
    AlreadyInState,
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RejectReason::InProgress => f.write_str("a transition is already in progress"),
            RejectReason::AlreadyInState => f.write_str("barrier is already in that state"),
        }
    }
}

/// Result of [`BarrierController::request_transition`].
///
/// A rejected request is a no-op, not an error.
#[derive(Debug, Clone)]
pub enum TransitionOutcome {
    /// Carries [`Event::TransitionStarted`].
    Accepted(Event),
    /// Carries [`Event::TransitionRejected`].
    Rejected { reason: RejectReason, event: Event },
}

impl TransitionOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, TransitionOutcome::Accepted(_))
    }

    pub fn event(&self) -> &Event {
        match self {
            TransitionOutcome::Accepted(event) => event,
            TransitionOutcome::Rejected { event, .. } => event,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn action_targets() {
        assert_eq!(BarrierAction::Open.target_status(), BarrierStatus::Open);
        assert_eq!(BarrierAction::Close.target_status(), BarrierStatus::Closed);
    }

    #[test]
    fn parse_action() {
        assert_eq!("OPEN".parse::<BarrierAction>(), Ok(BarrierAction::Open));
        assert_eq!(" close ".parse::<BarrierAction>(), Ok(BarrierAction::Close));
        assert!("lift".parse::<BarrierAction>().is_err());
    }

    #[test]
    fn status_serializes_lowercase() {
        let json = serde_json::to_string(&BarrierStatus::Moving).unwrap();
        assert_eq!(json, "\"moving\"");
        assert!(!BarrierStatus::Moving.is_terminal());
        assert!(BarrierStatus::Open.is_terminal());
    }
}
