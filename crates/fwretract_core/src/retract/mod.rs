//! fwretract_core::retract
//!
//! Firmware retraction: per-extruder retract/recover state and the engine that
//! turns a request into moves.
//!
//! Key ideas:
//! - Pure decision step (`plan`) separate from motion (`FwRetract::retract`)
//! - Redundant requests are absorbed, not errors
//! - Z-hop is owed by the carriage, not an extruder, and never stacks
//!
//! Known hazard: stopping a job between a retract and its recover leaves the
//! hop owed. Z is then believed lower than it physically is until a homing
//! move re-references it (see `FwRetract::forget_hop`).

mod engine;
mod hop;
mod plan;
mod request;
mod state;
mod table;

pub use engine::{FwRetract, MAX_AUTORETRACT, MIN_AUTORETRACT};
pub use hop::HopState;
pub use plan::{plan, Outcome, Plan, Stroke};
pub use request::{Request, ALL_REQUESTS};
pub use state::{ExtruderState, ALL_EXTRUDER_STATES};
pub use table::{transition_table, TransitionEdge};
