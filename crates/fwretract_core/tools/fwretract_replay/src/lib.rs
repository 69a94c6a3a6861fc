//! fwretract_replay
//!
//! Host-side harness: feeds a retraction command script through
//! `fwretract_core::FwRetract` against the simulated planner.

pub mod config;
pub mod replay;
