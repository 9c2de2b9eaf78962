use wayfind_core::steps::synthesize_steps;
use wayfind_core::{Coordinate, RouteOptions, StepIcon};

const STEP_DEG: f64 = 0.001; // ~111 m per hop near the equator

/// Three points: due east, then turned by `angle_deg` (positive = right).
fn path_with_turn(angle_deg: f64) -> Vec<Coordinate> {
    let p0 = Coordinate::new(0.0, 0.0);
    let p1 = Coordinate::new(0.0, STEP_DEG);
    let b = (90.0 + angle_deg).to_radians();
    let p2 = Coordinate::new(p1.lat + STEP_DEG * b.cos(), p1.lng + STEP_DEG * b.sin());
    vec![p0, p1, p2]
}

#[test]
fn straight_leg_is_start_and_arrive_only() {
    let path = vec![
        Coordinate::new(0.0, 0.0),
        Coordinate::new(0.0, 0.001),
        Coordinate::new(0.0, 0.002),
    ];
    let steps = synthesize_steps(&path, "Kiosk", "Library", &RouteOptions::default());
    assert_eq!(steps.len(), 2);
    assert_eq!(steps[0].instruction, "Start at Kiosk");
    assert_eq!(steps[0].icon, StepIcon::Start);
    assert_eq!(steps[1].instruction, "Arrive at Library");
    assert_eq!(steps[1].icon, StepIcon::Arrive);
    // Arrive carries the whole accumulated distance, two ~111 m hops
    assert!((steps[1].distance_m - 222.39).abs() < 0.5);
}

#[test]
fn just_below_threshold_emits_no_turn() {
    let steps = synthesize_steps(&path_with_turn(19.9), "A", "B", &RouteOptions::default());
    assert_eq!(steps.len(), 2, "unexpected turn step: {steps:?}");
}

#[test]
fn just_above_threshold_emits_a_turn() {
    let steps = synthesize_steps(&path_with_turn(20.1), "A", "B", &RouteOptions::default());
    assert_eq!(steps.len(), 3, "missing turn step: {steps:?}");
    assert_eq!(steps[1].icon, StepIcon::SlightRight);
    assert_eq!(steps[1].instruction, "Slight right");
    // The turn carries the distance walked since the start
    assert!((steps[1].distance_m - 111.19).abs() < 0.5);
    // Arrive carries the remainder
    assert!((steps[2].distance_m - 111.19).abs() < 0.5);
}

#[test]
fn threshold_is_configurable() {
    let strict = RouteOptions { turn_threshold_deg: 10.0, ..RouteOptions::default() };
    let steps = synthesize_steps(&path_with_turn(15.0), "A", "B", &strict);
    assert_eq!(steps.len(), 3);
}

#[test]
fn shallow_bends_under_a_lowered_threshold_read_as_straight() {
    let strict = RouteOptions { turn_threshold_deg: 10.0, ..RouteOptions::default() };
    let steps = synthesize_steps(&path_with_turn(15.0), "A", "B", &strict);
    assert_eq!(steps[1].icon, StepIcon::Straight);
    assert_eq!(steps[1].instruction, "Continue straight");

    // The same bend under the default threshold emits nothing
    let steps = synthesize_steps(&path_with_turn(15.0), "A", "B", &RouteOptions::default());
    assert_eq!(steps.len(), 2);
}

#[test]
fn bands_and_sides() {
    let cases = [
        (-30.0, StepIcon::SlightLeft, "Slight left"),
        (90.0, StepIcon::Right, "Turn right"),
        (-90.0, StepIcon::Left, "Turn left"),
        (150.0, StepIcon::SharpRight, "Sharp right"),
        (175.0, StepIcon::UTurn, "Make a U-turn"),
    ];
    for (angle, icon, text) in cases {
        let steps = synthesize_steps(&path_with_turn(angle), "A", "B", &RouteOptions::default());
        assert_eq!(steps.len(), 3, "angle {angle}");
        assert_eq!(steps[1].icon, icon, "angle {angle}");
        assert_eq!(steps[1].instruction, text, "angle {angle}");
    }
}

#[test]
fn single_point_leg_degenerates_cleanly() {
    let steps = synthesize_steps(
        &[Coordinate::new(0.0, 0.0)],
        "Here",
        "Here",
        &RouteOptions::default(),
    );
    assert_eq!(steps.len(), 2);
    assert_eq!(steps[1].distance_m, 0.0);
}
