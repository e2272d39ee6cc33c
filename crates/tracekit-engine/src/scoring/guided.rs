//! Guided-trace scoring: the user follows a visible path inside a lane.

use std::collections::BTreeMap;
use std::f64::consts::PI;

use tracekit_core::{
    distance, point_to_polyline_distance, resample, turning_angle, NoTrace, Point, TraceSink,
};
use tracekit_settings::{GuidedThresholds, Thresholds};

use super::{clamp_score, note, EvaluationResult, TrajectoryScorer};
use crate::classifier::classify_traced;
use crate::kind::ShapeKind;

const STAGE: &str = "guided";

/// The guided-trace policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GuidedTraceScorer {
    /// Apply the lane-containment penalty
    pub lane_penalty: bool,
}

impl Default for GuidedTraceScorer {
    fn default() -> Self {
        Self { lane_penalty: true }
    }
}

impl GuidedTraceScorer {
    pub fn new(lane_penalty: bool) -> Self {
        Self { lane_penalty }
    }
}

impl TrajectoryScorer for GuidedTraceScorer {
    fn evaluate_traced(
        &self,
        user: &[Point],
        model: &[Point],
        expected: ShapeKind,
        thresholds: &Thresholds,
        trace: &mut dyn TraceSink,
    ) -> EvaluationResult {
        guided_trace_score_traced(user, model, expected, self.lane_penalty, thresholds, trace)
    }
}

/// Scores a trace along `model`.
///
/// Superposition, continuity and direction sub-scores (each `0..=100`) are
/// combined by weight. With `lane_penalty` set, the result is multiplied by
/// `1 - fraction_outside^exponent`, where `fraction_outside` is the share of
/// user points farther than half a lane from the model polyline. The expected
/// shape does not affect the score; whether the user stroke classifies as it
/// is reported in the details.
pub fn guided_trace_score(
    user: &[Point],
    model: &[Point],
    expected: ShapeKind,
    lane_penalty: bool,
    thresholds: &Thresholds,
) -> EvaluationResult {
    guided_trace_score_traced(user, model, expected, lane_penalty, thresholds, &mut NoTrace)
}

/// [`guided_trace_score`], writing every sub-score to `trace`.
pub fn guided_trace_score_traced(
    user: &[Point],
    model: &[Point],
    expected: ShapeKind,
    lane_penalty: bool,
    thresholds: &Thresholds,
    trace: &mut dyn TraceSink,
) -> EvaluationResult {
    let g = &thresholds.guided;
    if user.len() < g.min_user_points || model.is_empty() {
        tracing::debug!(
            user_points = user.len(),
            model_points = model.len(),
            "Guided-trace input too short to evaluate"
        );
        trace.record(STAGE, "score", 0.0);
        return EvaluationResult::insufficient(user.len(), model.len());
    }

    let mut details = BTreeMap::new();
    let superposition = superposition(user, model, g);
    let continuity = continuity(user);
    let direction = direction(user, model, g.direction_falloff);
    note(&mut details, trace, STAGE, "superposition", superposition);
    note(&mut details, trace, STAGE, "continuity", continuity);
    note(&mut details, trace, STAGE, "direction", direction);

    let weight_sum = g.superposition_weight + g.continuity_weight + g.direction_weight;
    let combined = if weight_sum > 0.0 {
        (g.superposition_weight * superposition
            + g.continuity_weight * continuity
            + g.direction_weight * direction)
            / weight_sum
    } else {
        0.0
    };
    note(&mut details, trace, STAGE, "combined", combined);

    let distances: Vec<f64> = user
        .iter()
        .map(|p| point_to_polyline_distance(*p, model))
        .collect();
    let precision = distances.iter().sum::<f64>() / distances.len() as f64;
    let outside = distances
        .iter()
        .filter(|d| **d > g.lane_half_width_px)
        .count() as f64
        / distances.len() as f64;
    note(&mut details, trace, STAGE, "fraction_outside", outside);

    let lane_factor = if lane_penalty {
        1.0 - outside.powf(g.lane_penalty_exponent)
    } else {
        1.0
    };
    note(&mut details, trace, STAGE, "lane_factor", lane_factor);

    let classification = classify_traced(user, thresholds, trace);
    if expected != ShapeKind::Other {
        let matched = classification.kind == expected;
        details.insert("shape_match".to_string(), if matched { 1.0 } else { 0.0 });
        trace.flag(STAGE, "shape_match", matched);
    }

    let score = clamp_score(combined * lane_factor);
    trace.record(STAGE, "precision", precision);
    trace.record(STAGE, "score", score);
    tracing::debug!(score, lane_penalty, outside, "Guided-trace evaluation");

    EvaluationResult {
        score,
        coverage: superposition,
        precision,
        proportion_factor: 1.0,
        complexity_factor: 1.0,
        details,
        classification: Some(classification),
    }
}

/// Percentage of sampled model points with a user point within the lane tolerance.
fn superposition(user: &[Point], model: &[Point], g: &GuidedThresholds) -> f64 {
    let checkpoints = resample(model, g.coverage_samples.max(1));
    if checkpoints.is_empty() {
        return 0.0;
    }
    let covered = checkpoints
        .iter()
        .filter(|p| point_to_polyline_distance(**p, user) <= g.lane_tolerance_px)
        .count();
    100.0 * covered as f64 / checkpoints.len() as f64
}

/// Mean local smoothness `1 - turn/PI` over interior points, as a percentage.
///
/// Points with a zero-length leg are skipped; a stroke with no measurable
/// interior point is perfectly continuous.
fn continuity(user: &[Point]) -> f64 {
    let mut total = 0.0;
    let mut count = 0usize;
    for w in user.windows(3) {
        if distance(w[0], w[1]) <= f64::EPSILON || distance(w[1], w[2]) <= f64::EPSILON {
            continue;
        }
        total += 1.0 - turning_angle(w[0], w[1], w[2]) / PI;
        count += 1;
    }
    if count == 0 {
        100.0
    } else {
        100.0 * total / count as f64
    }
}

/// Agreement of the first-to-last direction vectors, falling off quadratically.
fn direction(user: &[Point], model: &[Point], falloff: f64) -> f64 {
    let (Some(u0), Some(u1), Some(m0), Some(m1)) =
        (user.first(), user.last(), model.first(), model.last())
    else {
        return 0.0;
    };
    let (ux, uy) = (u1.x - u0.x, u1.y - u0.y);
    let (mx, my) = (m1.x - m0.x, m1.y - m0.y);
    if ux.hypot(uy) <= f64::EPSILON || mx.hypot(my) <= f64::EPSILON {
        return 100.0;
    }
    let delta = (ux * my - uy * mx).atan2(ux * mx + uy * my).abs();
    let agreement = (1.0 - delta / falloff).max(0.0);
    100.0 * agreement * agreement
}
