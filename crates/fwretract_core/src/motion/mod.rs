//! fwretract_core::motion
//!
//! The narrow slice of the motion planner the retraction engine depends on.
//! Nothing here executes motion; implementors own the move queue and steppers.
//!
//! Key ideas:
//! - Logical position can be rewritten without a move (`set_logical` + `sync_planner_position`)
//! - Moves always run from the current logical position to a captured destination
//! - The global feedrate is planner state; `FeedrateOverride` scopes any change to it

use std::ops::{Deref, DerefMut, Index, IndexMut};

mod sim;

pub use sim::{MoveRecord, SimPlanner};

/// Machine axes seen by the retraction engine.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Axis {
    X,
    Y,
    Z,
    E,
}

impl Axis {
    pub const fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
            Axis::E => 3,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Axis::X => "X",
            Axis::Y => "Y",
            Axis::Z => "Z",
            Axis::E => "E",
        }
    }
}

pub const ALL_AXES: [Axis; 4] = [Axis::X, Axis::Y, Axis::Z, Axis::E];

/// Position in logical (firmware) coordinates, mm.
#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct Position(pub [f32; 4]);

impl Position {
    pub const fn new(x: f32, y: f32, z: f32, e: f32) -> Self {
        Self([x, y, z, e])
    }

    /// Per-axis `self - from`.
    pub fn delta_from(&self, from: &Position) -> Position {
        let mut d = [0.0; 4];
        for (i, v) in d.iter_mut().enumerate() {
            *v = self.0[i] - from.0[i];
        }
        Position(d)
    }
}

impl Index<Axis> for Position {
    type Output = f32;

    fn index(&self, axis: Axis) -> &f32 {
        &self.0[axis.index()]
    }
}

impl IndexMut<Axis> for Position {
    fn index_mut(&mut self, axis: Axis) -> &mut f32 {
        &mut self.0[axis.index()]
    }
}

/// Motion collaborator consumed by the retraction engine.
///
/// Contract expected by `FwRetract`:
/// - `synchronize` blocks until every queued move has physically executed
/// - `set_logical` changes only the firmware's belief; no move, no planner update
/// - `sync_planner_position` makes the planner adopt the logical position without moving
/// - `submit_move` queues a move to `destination` at the current feedrate, after
///   which the logical position equals `destination`
/// - `extrusion_factor` is the active flow multiplier (1.0 = 100%), always positive
pub trait MotionPlanner {
    fn synchronize(&mut self);

    fn logical_position(&self) -> Position;
    fn set_logical(&mut self, axis: Axis, value: f32);
    fn sync_planner_position(&mut self);

    fn submit_move(&mut self, destination: Position);

    fn feedrate_mm_s(&self) -> f32;
    fn set_feedrate_mm_s(&mut self, feedrate_mm_s: f32);

    fn max_feedrate_mm_s(&self, axis: Axis) -> f32;
    fn extrusion_factor(&self, extruder: usize) -> f32;
    fn active_extruder(&self) -> usize;
}

/// Scope guard over a planner's global feedrate.
///
/// Derefs to the planner; whatever feedrate was active when the guard was
/// created is written back when it drops, on every exit path.
pub struct FeedrateOverride<'a, P: MotionPlanner + ?Sized> {
    planner: &'a mut P,
    saved_mm_s: f32,
}

impl<'a, P: MotionPlanner + ?Sized> FeedrateOverride<'a, P> {
    pub fn new(planner: &'a mut P) -> Self {
        let saved_mm_s = planner.feedrate_mm_s();
        Self {
            planner,
            saved_mm_s,
        }
    }

    pub fn saved_mm_s(&self) -> f32 {
        self.saved_mm_s
    }
}

impl<P: MotionPlanner + ?Sized> Deref for FeedrateOverride<'_, P> {
    type Target = P;

    fn deref(&self) -> &P {
        self.planner
    }
}

impl<P: MotionPlanner + ?Sized> DerefMut for FeedrateOverride<'_, P> {
    fn deref_mut(&mut self) -> &mut P {
        self.planner
    }
}

impl<P: MotionPlanner + ?Sized> Drop for FeedrateOverride<'_, P> {
    fn drop(&mut self) {
        self.planner.set_feedrate_mm_s(self.saved_mm_s);
    }
}
