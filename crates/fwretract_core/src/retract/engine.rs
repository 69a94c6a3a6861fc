use tracing::{debug, trace, warn};

use crate::error::{CoreError, Result};
use crate::motion::{Axis, FeedrateOverride, MotionPlanner, Position};
use crate::settings::{RecoverUpdate, RetractUpdate, RetractionSettings};

use super::{plan, ExtruderState, HopState, Outcome, Request, Stroke};

/// Smallest E-only move magnitude turned into an auto-retract (mm).
pub const MIN_AUTORETRACT: f32 = 0.1;
/// Largest E-only move magnitude turned into an auto-retract (mm).
pub const MAX_AUTORETRACT: f32 = 10.0;

/// Retraction transition engine.
///
/// Owns the settings, one state slot per extruder and the owed Z-hop. Every
/// mutation goes through `&mut self`, so the engine has a single writer by
/// construction; callers that dispatch from several threads put the engine
/// and its planner behind one lock.
#[derive(Debug, Clone)]
pub struct FwRetract {
    settings: RetractionSettings,
    extruders: Vec<ExtruderState>,
    hop: HopState,
}

/// Public API (command layer facing).
impl FwRetract {
    /// Create an engine for `extruder_count` extruders (at least one slot).
    ///
    /// Starts with default settings and every extruder recovered.
    pub fn new(extruder_count: usize) -> Self {
        Self {
            settings: RetractionSettings::default(),
            extruders: vec![ExtruderState::Recovered; extruder_count.max(1)],
            hop: HopState::default(),
        }
    }

    /// Same as `new`, with explicit starting settings.
    pub fn with_settings(extruder_count: usize, settings: RetractionSettings) -> Self {
        Self {
            settings,
            ..Self::new(extruder_count)
        }
    }

    /// Restore default settings and mark every extruder recovered.
    ///
    /// An owed hop survives: nothing moved, so the carriage is still lifted.
    pub fn reset(&mut self) {
        self.settings = RetractionSettings::default();
        self.extruders.fill(ExtruderState::Recovered);
    }

    pub fn settings(&self) -> &RetractionSettings {
        &self.settings
    }

    pub fn apply_retract_update(&mut self, update: RetractUpdate) -> Result<()> {
        self.settings.apply_retract(update)
    }

    pub fn apply_recover_update(&mut self, update: RecoverUpdate) -> Result<()> {
        self.settings.apply_recover(update)
    }

    pub fn set_autoretract(&mut self, enabled: bool) {
        self.settings.autoretract_enabled = enabled;
    }

    pub fn extruder_count(&self) -> usize {
        self.extruders.len()
    }

    /// Swap retraction only exists on multi-extruder machines.
    pub fn swap_enabled(&self) -> bool {
        self.extruders.len() > 1
    }

    pub fn extruder_states(&self) -> &[ExtruderState] {
        &self.extruders
    }

    pub fn extruder_state(&self, extruder: usize) -> Option<ExtruderState> {
        self.extruders.get(extruder).copied()
    }

    pub fn is_retracted(&self, extruder: usize) -> bool {
        self.extruder_state(extruder)
            .is_some_and(ExtruderState::is_retracted)
    }

    pub fn is_swap_retracted(&self, extruder: usize) -> bool {
        self.extruder_state(extruder)
            .is_some_and(ExtruderState::is_swap_retracted)
    }

    /// Z lift currently owed to the next recover (0 when none).
    pub fn hop_amount(&self) -> f32 {
        self.hop.amount()
    }

    /// Drop an owed hop without moving, e.g. after homing re-referenced Z.
    ///
    /// Returns the discarded amount (0 when none was owed).
    pub fn forget_hop(&mut self) -> f32 {
        let dropped = self.hop.take().unwrap_or(0.0);
        if dropped != 0.0 {
            warn!(hop = dropped, "discarding owed Z-hop without moving");
        }
        dropped
    }

    /// Retract (`retracting == true`) or recover the active extruder.
    ///
    /// Redundant requests return `Outcome::Ignored` and touch nothing. The
    /// planner's feedrate is the same after the call as before it.
    pub fn retract<P: MotionPlanner + ?Sized>(
        &mut self,
        planner: &mut P,
        retracting: bool,
        swapping: bool,
    ) -> Result<Outcome> {
        let active = planner.active_extruder();
        let current = self.slot(active)?;
        let request = Request::from_flags(retracting, swapping);

        let Some(plan) = plan(current, request, self.swap_enabled()) else {
            trace!(
                extruder = active,
                request = request.label(),
                state = current.label(),
                "redundant retraction request ignored"
            );
            return Ok(Outcome::Ignored);
        };

        // Everything below edits the logical position directly, so nothing
        // may still be in flight from the queue.
        let destination = planner.logical_position();
        planner.synchronize();

        let renormalize = 1.0 / planner.extrusion_factor(active);
        let s = self.settings;

        {
            let mut motion = FeedrateOverride::new(planner);

            match plan.stroke {
                Stroke::Retract { swap } => {
                    e_stroke(
                        &mut *motion,
                        destination,
                        s.retract_feedrate_mm_s,
                        s.retract_length_for(swap) * renormalize,
                    );

                    if s.has_zhop() && self.hop.lift(s.retract_zlift) {
                        z_stroke(&mut *motion, destination, -s.retract_zlift);
                    }
                }
                Stroke::Escalate => {
                    let extra = (s.swap_retract_length - s.retract_length).max(0.0);
                    if extra > 0.0 {
                        e_stroke(
                            &mut *motion,
                            destination,
                            s.retract_feedrate_mm_s,
                            extra * renormalize,
                        );
                    }
                }
                Stroke::Recover { swap } => {
                    if let Some(lift) = self.hop.take() {
                        z_stroke(&mut *motion, destination, lift);
                    }

                    e_stroke(
                        &mut *motion,
                        destination,
                        s.recover_feedrate_for(swap),
                        -s.recover_length_for(swap) * renormalize,
                    );
                }
            }
        }

        self.extruders[active] = plan.goal;

        debug!(
            extruder = active,
            request = request.label(),
            from = plan.start.label(),
            to = plan.goal.label(),
            hop = self.hop.amount(),
            z = planner.logical_position()[Axis::Z],
            "retraction transition"
        );

        Ok(plan.outcome())
    }

    /// Turn an E-only move into a firmware retract/recover when autoretract is on.
    ///
    /// `e_delta` is the move's E change. When the move is absorbed its target E
    /// is folded into the logical position (no move) and `Some(outcome)` is
    /// returned; `None` means the caller should execute the move itself.
    pub fn auto_retract<P: MotionPlanner + ?Sized>(
        &mut self,
        planner: &mut P,
        e_delta: f32,
    ) -> Result<Option<Outcome>> {
        if !self.settings.autoretract_enabled {
            return Ok(None);
        }
        if !(MIN_AUTORETRACT..=MAX_AUTORETRACT).contains(&e_delta.abs()) {
            return Ok(None);
        }

        let active = planner.active_extruder();
        // Only a move that would change the state: retract while recovered,
        // recover while retracted.
        if self.slot(active)?.is_retracted() != (e_delta > 0.0) {
            return Ok(None);
        }

        let e = planner.logical_position()[Axis::E];
        planner.set_logical(Axis::E, e + e_delta);
        planner.sync_planner_position();

        self.retract(planner, e_delta < 0.0, false).map(Some)
    }
}

impl FwRetract {
    fn slot(&self, extruder: usize) -> Result<ExtruderState> {
        self.extruder_state(extruder)
            .ok_or_else(|| CoreError::extruder_out_of_range(extruder, self.extruders.len()))
    }
}

/// Shift logical E by `offset`, resync, and move back to `destination`.
///
/// The stroke the steppers see is `-offset` on E only.
fn e_stroke<P: MotionPlanner + ?Sized>(
    planner: &mut P,
    destination: Position,
    feedrate_mm_s: f32,
    offset: f32,
) {
    planner.set_feedrate_mm_s(feedrate_mm_s);
    let e = planner.logical_position()[Axis::E];
    planner.set_logical(Axis::E, e + offset);
    planner.sync_planner_position();
    planner.submit_move(destination);
}

/// Same as `e_stroke` for Z, always at the Z axis' max feedrate.
fn z_stroke<P: MotionPlanner + ?Sized>(planner: &mut P, destination: Position, offset: f32) {
    let max = planner.max_feedrate_mm_s(Axis::Z);
    planner.set_feedrate_mm_s(max);
    let z = planner.logical_position()[Axis::Z];
    planner.set_logical(Axis::Z, z + offset);
    planner.sync_planner_position();
    planner.submit_move(destination);
}
