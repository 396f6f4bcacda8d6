//! # Barrier Control Core Library
//!
//! This library provides the core logic for a simulated vehicle barrier
//! control panel. The CLI binary is a thin layer over the same core library.
//!
//! ## Architecture
//!
//! - **Controller**: A wall-clock-based state machine. It owns the barrier
//!   status, the pending transition, the counters and the activity log.
//! - **Service**: A single tokio task that owns a controller and fires the
//!   scheduled transition completions.
//! - **Display**: Pure mapping functions from state to display strings.
//! - **Storage**: TOML-based configuration.
//!
//! ## Key Components
//!
//! - [`BarrierController`]: Core transition state machine
//! - [`ActivityLog`]: Bounded, newest-first log of completed transitions
//! - [`BarrierService`]: Event-loop actor driving the controller
//! - [`Config`]: Application configuration management

pub mod activity;
pub mod barrier;
pub mod display;
pub mod error;
pub mod events;
pub mod motion;
pub mod service;
pub mod stats;
pub mod storage;

pub use activity::{ActivityLog, LogEntry, DEFAULT_LOG_CAPACITY};
pub use barrier::{
    BarrierAction, BarrierController, BarrierStatus, ControllerSettings, RejectReason, Snapshot,
    Transition, TransitionOutcome,
};
pub use error::{ConfigError, CoreError};
pub use events::Event;
pub use motion::{ease_in_out, MotionStrategy};
pub use service::{BarrierHandle, BarrierService};
pub use stats::Counters;
pub use storage::Config;
