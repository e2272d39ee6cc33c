//! On-demand threshold calibration against labeled cases.
//!
//! Each case is scored with the free-copy policy and classified. Failing cases
//! contribute directional nudges to individual threshold knobs; the nudges are
//! summed per knob in case order, clamped to sane ranges and applied to a copy
//! of the input thresholds. The copy is then re-checked against a tighter band.
//! Nothing here runs implicitly and the caller decides whether to adopt the
//! new thresholds.

mod fixtures;

pub use fixtures::default_cases;

use std::collections::BTreeMap;
use std::f64::consts::FRAC_PI_3;
use std::fmt;

use serde::{Deserialize, Serialize};
use tracekit_core::Point;
use tracekit_settings::Thresholds;

use crate::kind::ShapeKind;
use crate::scoring::{free_copy_score, StrictnessMode};

/// One labeled example.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalibrationCase {
    pub description: String,
    pub user: Vec<Point>,
    pub model: Vec<Point>,
    /// Shape the exercise asks for; passed to the scorer
    pub expected_kind: ShapeKind,
    /// Shape the user stroke should classify as
    pub drawn_kind: ShapeKind,
    pub expected_score: f64,
}

impl CalibrationCase {
    /// A case whose user stroke is meant to be the expected shape.
    pub fn new(
        description: impl Into<String>,
        user: Vec<Point>,
        model: Vec<Point>,
        expected_kind: ShapeKind,
        expected_score: f64,
    ) -> Self {
        Self {
            description: description.into(),
            user,
            model,
            expected_kind,
            drawn_kind: expected_kind,
            expected_score,
        }
    }

    /// Marks the user stroke as deliberately drawn as another shape.
    pub fn drawn_as(mut self, kind: ShapeKind) -> Self {
        self.drawn_kind = kind;
        self
    }
}

/// Parameters of one calibration run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalibrationOptions {
    /// Strictness the cases are scored with
    pub mode: StrictnessMode,
    /// Allowed |score - expected| for a case to pass before adjustment
    pub pass_band: f64,
    /// Allowed |score - expected| when re-checking the adjusted thresholds
    pub verify_band: f64,
    pub variation_step: f64,
    pub aspect_step: f64,
    /// Step for angular tolerances, in radians
    pub angle_step: f64,
    pub symmetry_step: f64,
    pub elongation_step: f64,
    pub tolerance_step: f64,
}

impl Default for CalibrationOptions {
    fn default() -> Self {
        Self {
            mode: StrictnessMode::Friendly,
            pass_band: 20.0,
            verify_band: 15.0,
            variation_step: 0.05,
            aspect_step: 0.05,
            angle_step: 0.1,
            symmetry_step: 0.05,
            elongation_step: 0.5,
            tolerance_step: 0.01,
        }
    }
}

/// How one case fared in the initial run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaseOutcome {
    pub description: String,
    pub expected_kind: ShapeKind,
    pub drawn_kind: ShapeKind,
    pub detected_kind: ShapeKind,
    pub expected_score: f64,
    pub score: f64,
    pub passed: bool,
}

impl CaseOutcome {
    pub fn kind_matched(&self) -> bool {
        self.detected_kind == self.drawn_kind
    }
}

/// Result of a calibration run. `thresholds_after` is a proposal only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalibrationReport {
    pub thresholds_before: Thresholds,
    pub thresholds_after: Thresholds,
    pub cases_run: usize,
    pub cases_passed_before: usize,
    pub cases_passed_after: usize,
    /// Percentage (0-100) of cases passing the pass band with the input thresholds
    pub accuracy_before: f64,
    /// Percentage (0-100) of cases passing the verify band with the adjusted thresholds
    pub accuracy_after: f64,
    /// Human-readable `knob: old -> new` lines, in knob order
    pub applied_adjustments: Vec<String>,
    pub outcomes: Vec<CaseOutcome>,
}

impl CalibrationReport {
    /// True when calibration proposed at least one change.
    pub fn changed(&self) -> bool {
        !self.applied_adjustments.is_empty()
    }
}

/// A single adjustable threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Knob {
    CircleMaxVariation,
    CircleMinAspect,
    SquareMinAspect,
    RightAngleTolerance,
    TriangleAngleTolerance,
    StarMinSymmetry,
    LineMinElongation,
    BaseTolerancePercent,
}

impl Knob {
    fn key(&self) -> &'static str {
        match self {
            Knob::CircleMaxVariation => "classifier.circle_max_variation",
            Knob::CircleMinAspect => "classifier.circle_min_aspect",
            Knob::SquareMinAspect => "classifier.square_min_aspect",
            Knob::RightAngleTolerance => "classifier.right_angle_tolerance",
            Knob::TriangleAngleTolerance => "classifier.triangle_angle_tolerance",
            Knob::StarMinSymmetry => "classifier.star_min_symmetry",
            Knob::LineMinElongation => "classifier.line_min_elongation",
            Knob::BaseTolerancePercent => "free_copy.base_tolerance_percent",
        }
    }

    /// Range the knob is clamped to after a nudge.
    fn range(&self) -> (f64, f64) {
        match self {
            Knob::CircleMaxVariation => (0.05, 0.5),
            Knob::CircleMinAspect | Knob::SquareMinAspect => (0.3, 0.95),
            Knob::RightAngleTolerance => (0.1, FRAC_PI_3),
            Knob::TriangleAngleTolerance => (0.1, 1.0),
            Knob::StarMinSymmetry => (0.2, 0.95),
            Knob::LineMinElongation => (2.0, 20.0),
            Knob::BaseTolerancePercent => (0.02, 0.2),
        }
    }

    fn slot<'a>(&self, t: &'a mut Thresholds) -> &'a mut f64 {
        match self {
            Knob::CircleMaxVariation => &mut t.classifier.circle_max_variation,
            Knob::CircleMinAspect => &mut t.classifier.circle_min_aspect,
            Knob::SquareMinAspect => &mut t.classifier.square_min_aspect,
            Knob::RightAngleTolerance => &mut t.classifier.right_angle_tolerance,
            Knob::TriangleAngleTolerance => &mut t.classifier.triangle_angle_tolerance,
            Knob::StarMinSymmetry => &mut t.classifier.star_min_symmetry,
            Knob::LineMinElongation => &mut t.classifier.line_min_elongation,
            Knob::BaseTolerancePercent => &mut t.free_copy.base_tolerance_percent,
        }
    }
}

impl fmt::Display for Knob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Calibrates `thresholds` against `cases` with default options.
pub fn calibrate(cases: &[CalibrationCase], thresholds: &Thresholds) -> CalibrationReport {
    calibrate_with(cases, thresholds, &CalibrationOptions::default())
}

/// Calibrates `thresholds` against `cases`.
///
/// Deterministic: the same cases, thresholds and options always produce the
/// same report.
pub fn calibrate_with(
    cases: &[CalibrationCase],
    thresholds: &Thresholds,
    options: &CalibrationOptions,
) -> CalibrationReport {
    let outcomes: Vec<CaseOutcome> = cases
        .iter()
        .map(|case| evaluate_case(case, thresholds, options.mode, options.pass_band))
        .collect();
    let cases_passed_before = outcomes.iter().filter(|o| o.passed).count();

    let mut nudges: BTreeMap<Knob, f64> = BTreeMap::new();
    for outcome in outcomes.iter().filter(|o| !o.passed) {
        for (knob, delta) in nudges_for(outcome, options) {
            *nudges.entry(knob).or_insert(0.0) += delta;
        }
    }

    let mut adjusted = thresholds.clone();
    let mut applied_adjustments = Vec::new();
    for (knob, delta) in &nudges {
        let slot = knob.slot(&mut adjusted);
        let before = *slot;
        let (lo, hi) = knob.range();
        let after = (before + delta).clamp(lo.min(before), hi.max(before));
        if (after - before).abs() > 1e-12 {
            *slot = after;
            applied_adjustments.push(format!("{}: {:.3} -> {:.3}", knob, before, after));
        }
    }

    let cases_passed_after = cases
        .iter()
        .filter(|case| evaluate_case(case, &adjusted, options.mode, options.verify_band).passed)
        .count();

    let report = CalibrationReport {
        thresholds_before: thresholds.clone(),
        thresholds_after: adjusted,
        cases_run: cases.len(),
        cases_passed_before,
        cases_passed_after,
        accuracy_before: accuracy(cases_passed_before, cases.len()),
        accuracy_after: accuracy(cases_passed_after, cases.len()),
        applied_adjustments,
        outcomes,
    };

    tracing::info!(
        cases = report.cases_run,
        passed_before = report.cases_passed_before,
        passed_after = report.cases_passed_after,
        adjustments = report.applied_adjustments.len(),
        "Calibration finished"
    );
    report
}

fn evaluate_case(
    case: &CalibrationCase,
    thresholds: &Thresholds,
    mode: StrictnessMode,
    band: f64,
) -> CaseOutcome {
    let result = free_copy_score(&case.user, &case.model, case.expected_kind, mode, thresholds);
    let detected_kind = result
        .classification
        .as_ref()
        .map(|c| c.kind)
        .unwrap_or(ShapeKind::Other);
    let passed =
        (result.score - case.expected_score).abs() <= band && detected_kind == case.drawn_kind;
    tracing::debug!(
        case = %case.description,
        score = result.score,
        expected = case.expected_score,
        detected = %detected_kind,
        passed,
        "Calibration case"
    );
    CaseOutcome {
        description: case.description.clone(),
        expected_kind: case.expected_kind,
        drawn_kind: case.drawn_kind,
        detected_kind,
        expected_score: case.expected_score,
        score: result.score,
        passed,
    }
}

/// Directional nudges suggested by one failing case.
///
/// A shape drawn but not recognised widens that shape's rule: an unrecognised
/// circle raises `circle_max_variation` and lowers `circle_min_aspect`, so the
/// circle rule accepts more strokes. A circle or line rule that fired for the
/// wrong shape is narrowed instead. Scores more than `pass_band` away from the expected score
/// move the base tolerance: down when over-scored, up when under-scored.
fn nudges_for(outcome: &CaseOutcome, options: &CalibrationOptions) -> Vec<(Knob, f64)> {
    let mut nudges = Vec::new();

    if !outcome.kind_matched() {
        match outcome.drawn_kind {
            ShapeKind::Circle => {
                nudges.push((Knob::CircleMaxVariation, options.variation_step));
                nudges.push((Knob::CircleMinAspect, -options.aspect_step));
            }
            ShapeKind::Square => {
                nudges.push((Knob::SquareMinAspect, -options.aspect_step));
                nudges.push((Knob::RightAngleTolerance, options.angle_step));
            }
            ShapeKind::Triangle => {
                nudges.push((Knob::TriangleAngleTolerance, options.angle_step));
            }
            ShapeKind::Star => nudges.push((Knob::StarMinSymmetry, -options.symmetry_step)),
            ShapeKind::Line => nudges.push((Knob::LineMinElongation, -options.elongation_step)),
            ShapeKind::Other => {}
        }
        // Rules that fired when they should not have
        match outcome.detected_kind {
            ShapeKind::Circle => nudges.push((Knob::CircleMaxVariation, -options.variation_step)),
            ShapeKind::Line => nudges.push((Knob::LineMinElongation, options.elongation_step)),
            _ => {}
        }
    }

    let error = outcome.score - outcome.expected_score;
    if error.abs() > options.pass_band {
        if error > 0.0 {
            nudges.push((Knob::BaseTolerancePercent, -options.tolerance_step));
        } else {
            nudges.push((Knob::BaseTolerancePercent, options.tolerance_step));
        }
    }
    nudges
}

/// Share of passing cases, in percent.
fn accuracy(passed: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        100.0 * passed as f64 / total as f64
    }
}
