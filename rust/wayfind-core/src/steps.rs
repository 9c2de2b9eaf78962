use itertools::Itertools;

use crate::geometry::{bearing, haversine_distance};
use crate::models::{Coordinate, RouteStep, StepIcon};
use crate::options::RouteOptions;

/// Turn-by-turn steps for one leg's coordinate sequence.
///
/// A joint whose bearing changes by at least `turn_threshold_deg` emits an
/// instruction carrying the distance accumulated since the previous one.
/// The first step is always "Start at <name>"; the last is always
/// "Arrive at <name>" and carries the residual distance.
pub fn synthesize_steps(
    path: &[Coordinate],
    start_name: &str,
    end_name: &str,
    options: &RouteOptions,
) -> Vec<RouteStep> {
    let mut steps = vec![RouteStep {
        instruction: format!("Start at {start_name}"),
        distance_m: 0.0,
        icon: StepIcon::Start,
    }];

    if path.len() < 2 {
        steps.push(RouteStep {
            instruction: format!("Arrive at {end_name}"),
            distance_m: 0.0,
            icon: StepIcon::Arrive,
        });
        return steps;
    }

    let lengths: Vec<f64> = path
        .iter()
        .tuple_windows()
        .map(|(&a, &b)| haversine_distance(a, b))
        .collect();
    let bearings: Vec<f64> = path
        .iter()
        .tuple_windows()
        .map(|(&a, &b)| bearing(a, b))
        .collect();

    let mut accumulated = lengths[0];
    for i in 1..lengths.len() {
        let delta = normalize_delta(bearings[i] - bearings[i - 1]);
        if delta.abs() >= options.turn_threshold_deg {
            steps.push(turn_step(delta, accumulated));
            accumulated = 0.0;
        }
        accumulated += lengths[i];
    }

    steps.push(RouteStep {
        instruction: format!("Arrive at {end_name}"),
        distance_m: accumulated,
        icon: StepIcon::Arrive,
    });
    steps
}

/// Normalize a bearing difference into (-180, 180]; positive is a right
/// turn.
fn normalize_delta(diff: f64) -> f64 {
    let d = diff.rem_euclid(360.0);
    if d > 180.0 {
        d - 360.0
    } else {
        d
    }
}

fn turn_step(delta: f64, distance_m: f64) -> RouteStep {
    let right = delta > 0.0;
    let magnitude = delta.abs();

    // Fixed bands; the caller's threshold only decides whether a joint
    // emits at all. Bends under 20 degrees are only reachable when the
    // threshold is lowered and read as straight-ahead.
    let (instruction, icon) = if magnitude < 20.0 {
        ("Continue straight", StepIcon::Straight)
    } else if magnitude < 45.0 {
        if right {
            ("Slight right", StepIcon::SlightRight)
        } else {
            ("Slight left", StepIcon::SlightLeft)
        }
    } else if magnitude < 135.0 {
        if right {
            ("Turn right", StepIcon::Right)
        } else {
            ("Turn left", StepIcon::Left)
        }
    } else if magnitude < 165.0 {
        if right {
            ("Sharp right", StepIcon::SharpRight)
        } else {
            ("Sharp left", StepIcon::SharpLeft)
        }
    } else {
        ("Make a U-turn", StepIcon::UTurn)
    };

    RouteStep {
        instruction: instruction.to_string(),
        distance_m,
        icon,
    }
}
