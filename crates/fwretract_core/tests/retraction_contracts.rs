use fwretract_core::motion::{Axis, MotionPlanner, Position, SimPlanner};
use fwretract_core::retract::{FwRetract, Outcome};
use fwretract_core::settings::{RecoverUpdate, RetractUpdate, RetractionSettings};

const EPS: f32 = 1e-4;

fn close(a: f32, b: f32) -> bool {
    (a - b).abs() < EPS
}

fn scenario_settings() -> RetractionSettings {
    RetractionSettings {
        retract_length: 3.0,
        retract_feedrate_mm_s: 45.0,
        retract_zlift: 0.4,
        recover_length: 0.0,
        recover_feedrate_mm_s: 8.0,
        ..RetractionSettings::default()
    }
}

fn start_position() -> Position {
    Position::new(120.0, 80.0, 2.4, 57.25)
}

#[test]
fn scenario_retract_then_recover_with_hop() {
    let mut fw = FwRetract::with_settings(1, scenario_settings());
    let mut sim = SimPlanner::new(1).with_position(start_position());
    let max_z = sim.max_feedrate_mm_s(Axis::Z);

    assert_eq!(fw.retract(&mut sim, true, false).unwrap(), Outcome::Retracted);

    let moves = sim.take_moves();
    assert_eq!(moves.len(), 2);

    assert!(close(moves[0].delta[Axis::E], -3.0));
    assert!(close(moves[0].delta[Axis::Z], 0.0));
    assert_eq!(moves[0].feedrate_mm_s, 45.0);

    // Logical Z is dropped by the lift, so the move physically raises the nozzle.
    assert!(close(moves[1].delta[Axis::Z], 0.4));
    assert!(close(moves[1].delta[Axis::E], 0.0));
    assert_eq!(moves[1].feedrate_mm_s, max_z);

    assert!(close(fw.hop_amount(), 0.4));
    assert!(fw.is_retracted(0));

    assert_eq!(fw.retract(&mut sim, false, false).unwrap(), Outcome::Recovered);

    let moves = sim.take_moves();
    assert_eq!(moves.len(), 2);

    assert!(close(moves[0].delta[Axis::Z], -0.4));
    assert_eq!(moves[0].feedrate_mm_s, max_z);
    assert_eq!(fw.hop_amount(), 0.0);

    assert!(close(moves[1].delta[Axis::E], 3.0));
    assert_eq!(moves[1].feedrate_mm_s, 8.0);
    assert!(!fw.is_retracted(0));
}

#[test]
fn double_retract_emits_one_stroke() {
    let mut fw = FwRetract::with_settings(1, scenario_settings());
    let mut sim = SimPlanner::new(1);

    fw.retract(&mut sim, true, false).unwrap();
    let after_first = sim.moves().len();

    assert_eq!(fw.retract(&mut sim, true, false).unwrap(), Outcome::Ignored);
    assert_eq!(sim.moves().len(), after_first);
    assert!(close(fw.hop_amount(), 0.4));
}

#[test]
fn retract_recover_pair_restores_positions() {
    for swapping in [false, true] {
        for factor in [1.0_f32, 0.9, 1.25] {
            let mut fw = FwRetract::with_settings(2, scenario_settings());
            let mut sim = SimPlanner::new(2).with_position(start_position());
            sim.set_extrusion_factor(0, factor);
            let before = sim.physical_position();

            fw.retract(&mut sim, true, swapping).unwrap();
            fw.retract(&mut sim, false, false).unwrap();

            let after = sim.physical_position();
            assert!(
                close(after[Axis::E], before[Axis::E]),
                "E drift swapping={swapping} factor={factor}: {} vs {}",
                after[Axis::E],
                before[Axis::E]
            );
            assert!(close(after[Axis::Z], before[Axis::Z]));
            assert_eq!(sim.logical_position(), before);
            assert_eq!(fw.hop_amount(), 0.0);
        }
    }
}

#[test]
fn recover_pushes_surplus_length() {
    let mut fw = FwRetract::with_settings(1, scenario_settings());
    fw.apply_recover_update(RecoverUpdate {
        length: Some(0.25),
        ..RecoverUpdate::default()
    })
    .unwrap();
    let mut sim = SimPlanner::new(1);

    fw.retract(&mut sim, true, false).unwrap();
    fw.retract(&mut sim, false, false).unwrap();

    let recover = sim.moves().last().copied().unwrap();
    assert!(close(recover.delta[Axis::E], 3.25));
    assert!(close(sim.physical_position()[Axis::E], 0.25));
}

#[test]
fn hop_is_applied_at_most_once() {
    let mut fw = FwRetract::with_settings(2, scenario_settings());
    let mut sim = SimPlanner::new(2).with_position(start_position());

    // Primary retract, then escalation to swap: still one hop.
    fw.retract(&mut sim, true, false).unwrap();
    fw.retract(&mut sim, true, true).unwrap();
    assert!(close(fw.hop_amount(), 0.4));

    // Retracting the second extruder does not hop again either.
    sim.select_extruder(1);
    fw.retract(&mut sim, true, false).unwrap();
    assert!(close(fw.hop_amount(), 0.4));
    assert!(close(
        sim.physical_position()[Axis::Z],
        start_position()[Axis::Z] + 0.4
    ));

    let z_moves = sim
        .moves()
        .iter()
        .filter(|m| m.delta[Axis::Z].abs() > EPS)
        .count();
    assert_eq!(z_moves, 1);
}

#[test]
fn recover_after_swap_retract_uses_swap_profile() {
    let settings = RetractionSettings {
        swap_retract_length: 13.0,
        swap_recover_length: 0.5,
        swap_recover_feedrate_mm_s: 20.0,
        ..scenario_settings()
    };
    let mut fw = FwRetract::with_settings(2, settings);
    let mut sim = SimPlanner::new(2);

    assert_eq!(fw.retract(&mut sim, true, true).unwrap(), Outcome::SwapRetracted);
    assert!(close(sim.moves()[0].delta[Axis::E], -13.0));
    assert!(fw.is_swap_retracted(0));

    assert_eq!(
        fw.retract(&mut sim, false, false).unwrap(),
        Outcome::SwapRecovered
    );
    let recover = sim.moves().last().copied().unwrap();
    assert!(close(recover.delta[Axis::E], 13.5));
    assert_eq!(recover.feedrate_mm_s, 20.0);
    assert!(!fw.is_swap_retracted(0));
    assert!(!fw.is_retracted(0));
}

#[test]
fn escalation_withdraws_only_the_difference() {
    let mut fw = FwRetract::with_settings(2, scenario_settings());
    let mut sim = SimPlanner::new(2);

    fw.retract(&mut sim, true, false).unwrap();
    sim.take_moves();

    assert_eq!(fw.retract(&mut sim, true, true).unwrap(), Outcome::Escalated);
    let moves = sim.take_moves();
    assert_eq!(moves.len(), 1);
    assert!(close(moves[0].delta[Axis::E], -10.0));
    assert!(fw.is_swap_retracted(0));

    fw.retract(&mut sim, false, false).unwrap();
    assert!(close(sim.physical_position()[Axis::E], 0.0));
}

#[test]
fn swap_is_ignored_on_single_extruder() {
    let mut fw = FwRetract::with_settings(1, scenario_settings());
    let mut sim = SimPlanner::new(1);

    assert_eq!(fw.retract(&mut sim, true, true).unwrap(), Outcome::Retracted);
    assert!(close(sim.moves()[0].delta[Axis::E], -3.0));
    assert!(!fw.is_swap_retracted(0));
}

#[test]
fn feedrate_is_restored_on_every_path() {
    let mut fw = FwRetract::with_settings(2, scenario_settings());
    let mut sim = SimPlanner::new(2);
    sim.set_feedrate_mm_s(133.0);

    let calls = [
        (true, false),
        (true, false),
        (true, true),
        (false, false),
        (false, true),
        (true, true),
        (false, true),
    ];
    for (retracting, swapping) in calls {
        fw.retract(&mut sim, retracting, swapping).unwrap();
        assert_eq!(sim.feedrate_mm_s(), 133.0);
    }
}

#[test]
fn extruders_keep_independent_flags() {
    let mut fw = FwRetract::new(3);
    let mut sim = SimPlanner::new(3);

    sim.select_extruder(1);
    fw.retract(&mut sim, true, true).unwrap();

    assert!(!fw.is_retracted(0));
    assert!(fw.is_swap_retracted(1));
    assert!(!fw.is_retracted(2));

    fw.reset();
    assert!(fw.extruder_states().iter().all(|s| !s.is_retracted()));
}

#[test]
fn zlift_update_enables_hop() {
    let mut fw = FwRetract::new(1);
    fw.apply_retract_update(RetractUpdate {
        zlift: Some(0.2),
        ..RetractUpdate::default()
    })
    .unwrap();
    let mut sim = SimPlanner::new(1);

    fw.retract(&mut sim, true, false).unwrap();
    assert!(close(fw.hop_amount(), 0.2));
    assert_eq!(sim.moves().len(), 2);
}

#[test]
fn swap_recover_after_primary_retract_is_ignored() {
    let mut fw = FwRetract::with_settings(2, scenario_settings());
    let mut sim = SimPlanner::new(2);

    fw.retract(&mut sim, true, false).unwrap();
    let moves = sim.moves().len();

    assert_eq!(fw.retract(&mut sim, false, true).unwrap(), Outcome::Ignored);
    assert_eq!(sim.moves().len(), moves);
    assert!(fw.is_retracted(0));
    assert!(!fw.is_swap_retracted(0));
    assert!(close(fw.hop_amount(), 0.4));

    // The matching plain recover still works afterwards.
    assert_eq!(fw.retract(&mut sim, false, false).unwrap(), Outcome::Recovered);
    assert!(close(sim.physical_position()[Axis::E], 0.0));
}

#[test]
fn recover_lowers_by_owed_hop_after_zlift_change() {
    let mut fw = FwRetract::with_settings(1, scenario_settings());
    let mut sim = SimPlanner::new(1).with_position(start_position());

    fw.retract(&mut sim, true, false).unwrap();
    fw.apply_retract_update(RetractUpdate {
        zlift: Some(0.2),
        ..RetractUpdate::default()
    })
    .unwrap();
    fw.retract(&mut sim, false, false).unwrap();

    assert_eq!(fw.hop_amount(), 0.0);
    assert!(close(
        sim.physical_position()[Axis::Z],
        start_position()[Axis::Z]
    ));
    assert_eq!(sim.logical_position(), start_position());
}
