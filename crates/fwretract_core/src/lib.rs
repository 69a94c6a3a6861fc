//! fwretract_core: planner-agnostic firmware retraction for filament motion devices.
//!
//! Design goals:
//! - Pure, testable logic (no hardware or planner deps).
//! - Motion is reached only through the `MotionPlanner` trait.
//! - Cross-call state (per-extruder flags, owed Z-hop) lives in one owned value.

pub mod error;

/// Tunable lengths/feedrates + compiled-in defaults.
pub mod settings;

/// Motion collaborator interface, feedrate scope guard and a host-side simulator.
pub mod motion;

/// Retraction state machine + transition engine.
pub mod retract;

pub use error::{CoreError, Result};
pub use motion::{Axis, MotionPlanner, Position};
pub use retract::{ExtruderState, FwRetract, Outcome, Request};
pub use settings::RetractionSettings;
