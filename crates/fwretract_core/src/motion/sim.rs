use super::{Axis, MotionPlanner, Position};

/// One move as the steppers would execute it.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct MoveRecord {
    /// Physical displacement per axis.
    pub delta: Position,
    pub feedrate_mm_s: f32,
}

/// In-memory planner for host-side runs and tests.
///
/// Tracks three positions:
/// - logical: what the firmware believes (`current_position`)
/// - planner: where the planner thinks the last queued move ended
/// - physical: where the carriage/filament actually are
///
/// `sync_planner_position` rewrites the planner position without motion, so a
/// following move shifts physical by `destination - planner`, not
/// `destination - logical`. That is what makes a hop transparent.
#[derive(Debug, Clone)]
pub struct SimPlanner {
    logical: Position,
    planner: Position,
    physical: Position,
    feedrate_mm_s: f32,
    max_feedrate_mm_s: [f32; 4],
    extrusion_factors: Vec<f32>,
    active_extruder: usize,
    moves: Vec<MoveRecord>,
    synchronize_calls: usize,
}

pub const DEFAULT_FEEDRATE_MM_S: f32 = 25.0;
pub const DEFAULT_MAX_FEEDRATE_MM_S: [f32; 4] = [300.0, 300.0, 5.0, 25.0];

impl SimPlanner {
    pub fn new(extruders: usize) -> Self {
        Self {
            logical: Position::default(),
            planner: Position::default(),
            physical: Position::default(),
            feedrate_mm_s: DEFAULT_FEEDRATE_MM_S,
            max_feedrate_mm_s: DEFAULT_MAX_FEEDRATE_MM_S,
            extrusion_factors: vec![1.0; extruders.max(1)],
            active_extruder: 0,
            moves: Vec::new(),
            synchronize_calls: 0,
        }
    }

    /// Start with every position (logical, planner, physical) at `p`.
    pub fn with_position(mut self, p: Position) -> Self {
        self.logical = p;
        self.planner = p;
        self.physical = p;
        self
    }

    pub fn select_extruder(&mut self, index: usize) {
        self.active_extruder = index;
    }

    /// Flow multiplier for one extruder (1.0 = 100%). Unknown indices are ignored.
    pub fn set_extrusion_factor(&mut self, extruder: usize, factor: f32) {
        if let Some(slot) = self.extrusion_factors.get_mut(extruder) {
            *slot = factor;
        }
    }

    pub fn set_max_feedrate_mm_s(&mut self, axis: Axis, feedrate_mm_s: f32) {
        self.max_feedrate_mm_s[axis.index()] = feedrate_mm_s;
    }

    pub fn physical_position(&self) -> Position {
        self.physical
    }

    pub fn planner_position(&self) -> Position {
        self.planner
    }

    pub fn moves(&self) -> &[MoveRecord] {
        &self.moves
    }

    pub fn take_moves(&mut self) -> Vec<MoveRecord> {
        std::mem::take(&mut self.moves)
    }

    pub fn synchronize_calls(&self) -> usize {
        self.synchronize_calls
    }
}

impl MotionPlanner for SimPlanner {
    fn synchronize(&mut self) {
        // Moves are applied to `physical` as they are submitted.
        self.synchronize_calls += 1;
    }

    fn logical_position(&self) -> Position {
        self.logical
    }

    fn set_logical(&mut self, axis: Axis, value: f32) {
        self.logical[axis] = value;
    }

    fn sync_planner_position(&mut self) {
        self.planner = self.logical;
    }

    fn submit_move(&mut self, destination: Position) {
        let delta = destination.delta_from(&self.planner);
        for (p, d) in self.physical.0.iter_mut().zip(delta.0) {
            *p += d;
        }
        self.planner = destination;
        self.logical = destination;
        self.moves.push(MoveRecord {
            delta,
            feedrate_mm_s: self.feedrate_mm_s,
        });
    }

    fn feedrate_mm_s(&self) -> f32 {
        self.feedrate_mm_s
    }

    fn set_feedrate_mm_s(&mut self, feedrate_mm_s: f32) {
        self.feedrate_mm_s = feedrate_mm_s;
    }

    fn max_feedrate_mm_s(&self, axis: Axis) -> f32 {
        self.max_feedrate_mm_s[axis.index()]
    }

    fn extrusion_factor(&self, extruder: usize) -> f32 {
        self.extrusion_factors.get(extruder).copied().unwrap_or(1.0)
    }

    fn active_extruder(&self) -> usize {
        self.active_extruder
    }
}
