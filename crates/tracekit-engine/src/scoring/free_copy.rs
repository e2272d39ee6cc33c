//! Free-copy scoring: the user reproduces a shape anywhere near the model.

use std::collections::BTreeMap;

use tracekit_core::{
    bounding_box, path_length, point_to_polyline_distance, resample, subsample, NoTrace, Point,
    TraceSink,
};
use tracekit_settings::{FreeCopyThresholds, Thresholds};

use super::{clamp_score, note, EvaluationResult, StrictnessMode, TrajectoryScorer};
use crate::classifier::classify_traced;
use crate::kind::ShapeKind;

const STAGE: &str = "free_copy";

/// The free-copy policy with a fixed strictness.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FreeCopyScorer {
    pub mode: StrictnessMode,
}

impl FreeCopyScorer {
    pub fn new(mode: StrictnessMode) -> Self {
        Self { mode }
    }

    pub fn friendly() -> Self {
        Self::new(StrictnessMode::Friendly)
    }

    pub fn clinical() -> Self {
        Self::new(StrictnessMode::Clinical)
    }
}

impl TrajectoryScorer for FreeCopyScorer {
    fn evaluate_traced(
        &self,
        user: &[Point],
        model: &[Point],
        expected: ShapeKind,
        thresholds: &Thresholds,
        trace: &mut dyn TraceSink,
    ) -> EvaluationResult {
        free_copy_score_traced(user, model, expected, self.mode, thresholds, trace)
    }
}

/// Scores a freehand copy of `model`.
///
/// The final score is the product of a proximity score and four factors
/// (coverage, proportion, complexity, shape match), adjusted for `mode` and
/// clamped to `[0, 100]`. A user stroke below the minimum point count, or an
/// empty model, scores zero.
pub fn free_copy_score(
    user: &[Point],
    model: &[Point],
    expected: ShapeKind,
    mode: StrictnessMode,
    thresholds: &Thresholds,
) -> EvaluationResult {
    free_copy_score_traced(user, model, expected, mode, thresholds, &mut NoTrace)
}

/// [`free_copy_score`], writing every factor to `trace`.
pub fn free_copy_score_traced(
    user: &[Point],
    model: &[Point],
    expected: ShapeKind,
    mode: StrictnessMode,
    thresholds: &Thresholds,
    trace: &mut dyn TraceSink,
) -> EvaluationResult {
    let t = &thresholds.free_copy;
    if user.len() < t.min_user_points || model.is_empty() {
        tracing::debug!(
            user_points = user.len(),
            model_points = model.len(),
            "Free-copy input too short to evaluate"
        );
        trace.record(STAGE, "score", 0.0);
        return EvaluationResult::insufficient(user.len(), model.len());
    }

    let mut details = BTreeMap::new();
    let classification = classify_traced(user, thresholds, trace);
    let shape_factor = shape_factor(classification.kind, expected, t);
    note(&mut details, trace, STAGE, "shape_factor", shape_factor);
    note(&mut details, trace, STAGE, "detected_confidence", classification.confidence);

    let model_box = bounding_box(model);
    let tolerance = t.tolerance_for(model_box.max_dimension());
    note(&mut details, trace, STAGE, "tolerance", tolerance);

    let samples = subsample(user, t.max_samples.max(1));
    let precision = samples
        .iter()
        .map(|p| point_to_polyline_distance(*p, model))
        .sum::<f64>()
        / samples.len() as f64;
    let falloff = (tolerance * t.falloff_span).max(f64::EPSILON);
    let base = (100.0 * (1.0 - precision / falloff)).clamp(0.0, 100.0);
    note(&mut details, trace, STAGE, "base", base);

    let coverage = coverage(user, model, tolerance, t.coverage_samples);
    let coverage_factor = coverage_factor(coverage, t);
    note(&mut details, trace, STAGE, "coverage_factor", coverage_factor);

    let user_box = bounding_box(user);
    let size_ratio = ratio(user_box.max_dimension(), model_box.max_dimension());
    let proportion_factor = proportion_factor(size_ratio, t);
    note(&mut details, trace, STAGE, "size_ratio", size_ratio);

    let length_ratio = ratio(path_length(user), path_length(model));
    let complexity_factor = complexity_factor(length_ratio, t);
    note(&mut details, trace, STAGE, "length_ratio", length_ratio);

    let raw = base * coverage_factor * proportion_factor * complexity_factor * shape_factor;
    note(&mut details, trace, STAGE, "raw", raw);
    let score = clamp_score(apply_mode(raw, mode, t));
    trace.record(STAGE, "coverage", coverage * 100.0);
    trace.record(STAGE, "precision", precision);
    trace.record(STAGE, "proportion_factor", proportion_factor);
    trace.record(STAGE, "complexity_factor", complexity_factor);
    trace.record(STAGE, "score", score);

    tracing::debug!(
        score,
        %expected,
        detected = %classification.kind,
        %mode,
        "Free-copy evaluation"
    );

    EvaluationResult {
        score,
        coverage: coverage * 100.0,
        precision,
        proportion_factor,
        complexity_factor,
        details,
        classification: Some(classification),
    }
}

fn shape_factor(detected: ShapeKind, expected: ShapeKind, t: &FreeCopyThresholds) -> f64 {
    if expected == ShapeKind::Other {
        1.0
    } else if detected == expected {
        t.shape_match_bonus
    } else {
        t.shape_mismatch_penalty
    }
}

/// Fraction of arc-length sampled model points with a user point within `tolerance`.
fn coverage(user: &[Point], model: &[Point], tolerance: f64, samples: usize) -> f64 {
    let checkpoints = resample(model, samples);
    if checkpoints.is_empty() {
        return 0.0;
    }
    let covered = checkpoints
        .iter()
        .filter(|p| point_to_polyline_distance(**p, user) <= tolerance)
        .count();
    covered as f64 / checkpoints.len() as f64
}

fn coverage_factor(coverage: f64, t: &FreeCopyThresholds) -> f64 {
    if coverage > t.coverage_boost_above {
        t.coverage_boost
    } else if coverage < t.coverage_penalty_below {
        t.coverage_penalty
    } else {
        let span = (t.coverage_boost_above - t.coverage_penalty_below).max(f64::EPSILON);
        let position = (coverage - t.coverage_penalty_below) / span;
        t.coverage_band_low + (t.coverage_band_high - t.coverage_band_low) * position
    }
}

fn proportion_factor(size_ratio: f64, t: &FreeCopyThresholds) -> f64 {
    let factor = if size_ratio < t.proportion_min {
        size_ratio / t.proportion_min
    } else if size_ratio > t.proportion_max {
        t.proportion_max / size_ratio
    } else {
        1.0
    };
    factor.max(t.proportion_floor)
}

fn complexity_factor(length_ratio: f64, t: &FreeCopyThresholds) -> f64 {
    if length_ratio < t.complexity_min_ratio {
        (length_ratio / t.complexity_min_ratio).max(t.complexity_floor)
    } else {
        1.0
    }
}

fn apply_mode(raw: f64, mode: StrictnessMode, t: &FreeCopyThresholds) -> f64 {
    match mode {
        StrictnessMode::Friendly if raw > 0.0 => raw.max(t.friendly_floor),
        StrictnessMode::Friendly => raw,
        StrictnessMode::Clinical => raw * t.clinical_multiplier,
    }
}

/// `num / den`, with a degenerate denominator treated as a perfect match when
/// the numerator is degenerate too.
fn ratio(num: f64, den: f64) -> f64 {
    if den > f64::EPSILON {
        num / den
    } else if num > f64::EPSILON {
        f64::INFINITY
    } else {
        1.0
    }
}
