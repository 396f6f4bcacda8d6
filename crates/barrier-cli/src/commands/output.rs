//! Event and snapshot printing shared by the session commands.

use barrier_core::display::{self, render_dashboard};
use barrier_core::{Config, Event, Snapshot, TransitionOutcome};

pub fn event_line(event: &Event) -> String {
    match event {
        Event::TransitionStarted {
            action,
            duration_ms,
            ..
        } => format!("> {action}: moving ({duration_ms} ms)"),
        Event::TransitionRejected { action, reason, .. } => {
            format!("! {action}: ignored, {reason}")
        }
        Event::TransitionCompleted {
            status,
            operation_count,
            entry,
            ..
        } => format!(
            "< {}: {} (operations {operation_count}) | {}",
            entry.action(),
            display::status_label(*status),
            display::log_line(entry)
        ),
        Event::StateSnapshot(snapshot) => format!(
            "= {} (operations {})",
            display::status_label(snapshot.status),
            snapshot.operation_count
        ),
    }
}

/// One JSON object per line in `--json` mode.
pub fn print_event(event: &Event, json: bool) -> Result<(), serde_json::Error> {
    if json {
        println!("{}", serde_json::to_string(event)?);
    } else {
        println!("{}", event_line(event));
    }
    Ok(())
}

pub fn print_snapshot(
    snapshot: &Snapshot,
    config: &Config,
    json: bool,
) -> Result<(), serde_json::Error> {
    if json {
        println!(
            "{}",
            serde_json::to_string(&Event::StateSnapshot(snapshot.clone()))?
        );
    } else {
        print!(
            "{}",
            render_dashboard(
                snapshot,
                config.transition.closed_angle,
                config.transition.open_angle
            )
        );
    }
    Ok(())
}

pub fn accepted_id(outcome: &TransitionOutcome) -> Option<u64> {
    match outcome {
        TransitionOutcome::Accepted(Event::TransitionStarted { transition_id, .. }) => {
            Some(*transition_id)
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use barrier_core::{BarrierAction, BarrierController, BarrierStatus, RejectReason};
    use chrono::Utc;

    #[test]
    fn rejection_line_names_reason() {
        let event = Event::TransitionRejected {
            action: BarrierAction::Close,
            status: BarrierStatus::Closed,
            reason: RejectReason::AlreadyInState,
            at: Utc::now(),
        };
        assert_eq!(
            event_line(&event),
            "! close: ignored, barrier is already in that state"
        );
    }

    #[test]
    fn accepted_id_only_for_started() {
        let mut controller = BarrierController::new();
        let outcome = controller.request_transition(BarrierAction::Open);
        assert_eq!(accepted_id(&outcome), Some(1));
        let outcome = controller.request_transition(BarrierAction::Open);
        assert_eq!(accepted_id(&outcome), None);
    }
}
