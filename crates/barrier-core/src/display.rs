//! Pure mapping from controller state to display strings.
//!
//! Nothing here holds state. Time and date strings use one fixed format:
//! `HH:MM` and `DD.MM.YY`.

use std::fmt::Write as _;

use chrono::{DateTime, Local, TimeZone, Utc};
use serde::Serialize;

use crate::activity::LogEntry;
use crate::barrier::{BarrierAction, BarrierStatus, Snapshot};

/// Badge colour family for a status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusTone {
    Success,
    Danger,
    /// Shown with a pulsing indicator.
    Active,
}

impl StatusTone {
    pub fn pulsing(self) -> bool {
        matches!(self, StatusTone::Active)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BatteryTone {
    Good,
    Low,
    Critical,
}

/// Fixed rows of the system card. There is no network, security or update
/// subsystem behind them.
pub const SYSTEM_STATUS: [(&str, &str); 3] = [
    ("Network", "Online"),
    ("Security", "Active"),
    ("Updates", "Up to date"),
];

pub fn status_label(status: BarrierStatus) -> &'static str {
    match status {
        BarrierStatus::Open => "Open",
        BarrierStatus::Closed => "Closed",
        BarrierStatus::Moving => "Moving",
    }
}

pub fn status_tone(status: BarrierStatus) -> StatusTone {
    match status {
        BarrierStatus::Open => StatusTone::Success,
        BarrierStatus::Closed => StatusTone::Danger,
        BarrierStatus::Moving => StatusTone::Active,
    }
}

/// Past-tense label used in the activity list.
pub fn action_label(action: BarrierAction) -> &'static str {
    match action {
        BarrierAction::Open => "Opened",
        BarrierAction::Close => "Closed",
    }
}

pub fn battery_tone(level: u8) -> BatteryTone {
    match level {
        50.. => BatteryTone::Good,
        20..=49 => BatteryTone::Low,
        _ => BatteryTone::Critical,
    }
}

pub fn format_time(at: DateTime<Utc>) -> String {
    format_time_in(at, &Local)
}

pub fn format_date(at: DateTime<Utc>) -> String {
    format_date_in(at, &Local)
}

pub fn format_time_in<Tz: TimeZone>(at: DateTime<Utc>, tz: &Tz) -> String
where
    Tz::Offset: std::fmt::Display,
{
    at.with_timezone(tz).format("%H:%M").to_string()
}

pub fn format_date_in<Tz: TimeZone>(at: DateTime<Utc>, tz: &Tz) -> String
where
    Tz::Offset: std::fmt::Display,
{
    at.with_timezone(tz).format("%d.%m.%y").to_string()
}

/// `HH:MM DD.MM.YY  Opened  Operator - Manual open`
pub fn log_line_in<Tz: TimeZone>(entry: &LogEntry, tz: &Tz) -> String
where
    Tz::Offset: std::fmt::Display,
{
    let mut line = format!(
        "{} {}  {:<6}  {}",
        format_time_in(entry.timestamp(), tz),
        format_date_in(entry.timestamp(), tz),
        action_label(entry.action()),
        entry.actor(),
    );
    if let Some(reason) = entry.reason() {
        let _ = write!(line, " - {reason}");
    }
    line
}

pub fn log_line(entry: &LogEntry) -> String {
    log_line_in(entry, &Local)
}

const GAUGE_WIDTH: usize = 20;

/// Horizontal bar showing how far the arm is raised.
///
/// `closed_deg` renders empty and `open_deg` renders full.
pub fn rotation_gauge(rotation_deg: f64, closed_deg: f64, open_deg: f64) -> String {
    let span = open_deg - closed_deg;
    let fraction = if span.abs() < f64::EPSILON {
        0.0
    } else {
        ((rotation_deg - closed_deg) / span).clamp(0.0, 1.0)
    };
    let filled = (fraction * GAUGE_WIDTH as f64).round() as usize;
    format!(
        "[{}{}] {:>4.0}°",
        "#".repeat(filled),
        "-".repeat(GAUGE_WIDTH - filled),
        rotation_deg
    )
}

/// Plain-text dashboard for a snapshot.
pub fn render_dashboard(snapshot: &Snapshot, closed_deg: f64, open_deg: f64) -> String {
    render_dashboard_in(snapshot, closed_deg, open_deg, &Local)
}

pub fn render_dashboard_in<Tz: TimeZone>(
    snapshot: &Snapshot,
    closed_deg: f64,
    open_deg: f64,
    tz: &Tz,
) -> String
where
    Tz::Offset: std::fmt::Display,
{
    let mut out = String::new();
    let tone = status_tone(snapshot.status);
    let marker = if tone.pulsing() { "~" } else { "*" };

    let _ = writeln!(out, "Barrier Control");
    let _ = writeln!(out, "===============");
    let _ = writeln!(
        out,
        "Status     {marker} {}",
        status_label(snapshot.status)
    );
    if let Some(action) = snapshot.pending {
        let _ = writeln!(
            out,
            "Moving     {} ({:.0}%, {} ms left)",
            action,
            snapshot.progress * 100.0,
            snapshot.remaining_ms
        );
    }
    let _ = writeln!(
        out,
        "Arm        {}",
        rotation_gauge(snapshot.rotation_deg, closed_deg, open_deg)
    );
    let _ = writeln!(out, "Operations {} this month", snapshot.operation_count);
    let _ = writeln!(
        out,
        "Last op    {} {}",
        format_time_in(snapshot.last_operation_at, tz),
        format_date_in(snapshot.last_operation_at, tz)
    );
    let _ = writeln!(
        out,
        "Battery    {}% ({})",
        snapshot.battery_level,
        match battery_tone(snapshot.battery_level) {
            BatteryTone::Good => "good",
            BatteryTone::Low => "low",
            BatteryTone::Critical => "critical",
        }
    );
    let _ = writeln!(out);
    let _ = writeln!(out, "System");
    let _ = writeln!(out, "------");
    for (name, state) in SYSTEM_STATUS {
        let _ = writeln!(out, "{name:<10} {state}");
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "Activity");
    let _ = writeln!(out, "--------");
    if snapshot.log.is_empty() {
        let _ = writeln!(out, "(no activity)");
    }
    for entry in &snapshot.log {
        let _ = writeln!(out, "{}", log_line_in(entry, tz));
    }
    out
}
