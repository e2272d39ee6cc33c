//! Explains why a free-copy attempt scored the way it did.
//!
//! Every check runs on every call so the report lists all contributing
//! problems, not just the first. Each finding carries a severity; the
//! corrected score discounts the actual score by one factor per finding.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use tracekit_core::{bounding_box, distance, Point};
use tracekit_settings::Thresholds;

use crate::classifier::classify;
use crate::kind::{ShapeClassification, ShapeKind};
use crate::scoring::{free_copy_score, StrictnessMode};

/// How much a finding is expected to hurt the score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    /// Multiplier applied to the score for one finding of this severity.
    pub fn factor(&self) -> f64 {
        match self {
            Severity::Low => 0.9,
            Severity::Medium => 0.8,
            Severity::High => 0.6,
            Severity::Critical => 0.3,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Low => write!(f, "low"),
            Severity::Medium => write!(f, "medium"),
            Severity::High => write!(f, "high"),
            Severity::Critical => write!(f, "critical"),
        }
    }
}

/// What a finding is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Problem {
    TooFewPoints,
    TooManyPoints,
    DegenerateBoundingBox,
    ShapeMismatch,
    LowConfidence,
    SizeMismatch,
    PositionMismatch,
    ToleranceTooTight,
    ToleranceTooLoose,
}

impl Problem {
    pub fn name(&self) -> &'static str {
        match self {
            Problem::TooFewPoints => "too_few_points",
            Problem::TooManyPoints => "too_many_points",
            Problem::DegenerateBoundingBox => "degenerate_bounding_box",
            Problem::ShapeMismatch => "shape_mismatch",
            Problem::LowConfidence => "low_confidence",
            Problem::SizeMismatch => "size_mismatch",
            Problem::PositionMismatch => "position_mismatch",
            Problem::ToleranceTooTight => "tolerance_too_tight",
            Problem::ToleranceTooLoose => "tolerance_too_loose",
        }
    }
}

impl fmt::Display for Problem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One detected problem with its evidence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagnosticFinding {
    pub problem: Problem,
    pub severity: Severity,
    pub description: String,
    pub remedy: String,
    pub supporting_data: BTreeMap<String, f64>,
}

impl DiagnosticFinding {
    fn new(
        problem: Problem,
        severity: Severity,
        description: impl Into<String>,
        remedy: impl Into<String>,
    ) -> Self {
        Self {
            problem,
            severity,
            description: description.into(),
            remedy: remedy.into(),
            supporting_data: BTreeMap::new(),
        }
    }

    fn with(mut self, key: &str, value: f64) -> Self {
        self.supporting_data.insert(key.to_string(), value);
        self
    }
}

/// All findings for one attempt plus the actual and discounted scores.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagnosticReport {
    pub findings: Vec<DiagnosticFinding>,
    pub score_actual: f64,
    pub score_corrected: f64,
    pub classification: ShapeClassification,
}

impl DiagnosticReport {
    pub fn has(&self, problem: Problem) -> bool {
        self.findings.iter().any(|f| f.problem == problem)
    }

    pub fn finding(&self, problem: Problem) -> Option<&DiagnosticFinding> {
        self.findings.iter().find(|f| f.problem == problem)
    }

    /// Highest severity among the findings, `None` when there are none.
    pub fn worst_severity(&self) -> Option<Severity> {
        self.findings.iter().map(|f| f.severity).max()
    }

    pub fn is_clean(&self) -> bool {
        self.findings.is_empty()
    }
}

/// Limits the checks compare against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiagnosticLimits {
    pub min_points: usize,
    /// Above this many points the stroke is likely noisy
    pub max_points: usize,
    /// Smallest acceptable bounding-box side, in pixels
    pub min_extent_px: f64,
    pub min_confidence: f64,
    pub min_size_ratio: f64,
    pub max_size_ratio: f64,
    /// Allowed center offset as a fraction of the model's larger side
    pub max_center_offset: f64,
    pub min_tolerance_px: f64,
    pub max_tolerance_px: f64,
    /// Judge an expected line by its length alone, so a flat line is not degenerate
    pub exempt_line_height: bool,
}

impl Default for DiagnosticLimits {
    fn default() -> Self {
        Self {
            min_points: 5,
            max_points: 200,
            min_extent_px: 10.0,
            min_confidence: 0.5,
            min_size_ratio: 0.5,
            max_size_ratio: 2.0,
            max_center_offset: 0.5,
            min_tolerance_px: 5.0,
            max_tolerance_px: 50.0,
            exempt_line_height: false,
        }
    }
}

/// Diagnoses a free-copy attempt scored in the friendly mode.
pub fn diagnose(
    user: &[Point],
    model: &[Point],
    expected: ShapeKind,
    thresholds: &Thresholds,
) -> DiagnosticReport {
    diagnose_with(
        user,
        model,
        expected,
        StrictnessMode::Friendly,
        thresholds,
        &DiagnosticLimits::default(),
    )
}

/// Diagnoses a free-copy attempt with an explicit mode and limits.
pub fn diagnose_with(
    user: &[Point],
    model: &[Point],
    expected: ShapeKind,
    mode: StrictnessMode,
    thresholds: &Thresholds,
    limits: &DiagnosticLimits,
) -> DiagnosticReport {
    let score_actual = free_copy_score(user, model, expected, mode, thresholds).score;
    let classification = classify(user, thresholds);

    let mut findings = Vec::new();
    check_point_count(user, limits, &mut findings);
    check_extent(user, expected, limits, &mut findings);
    check_shape(&classification, expected, limits, &mut findings);
    check_size_and_position(user, model, limits, &mut findings);
    check_tolerance(model, thresholds, limits, &mut findings);

    let discount: f64 = findings.iter().map(|f| f.severity.factor()).product();
    let score_corrected = (score_actual * discount).clamp(0.0, 100.0);

    tracing::debug!(
        findings = findings.len(),
        score_actual,
        score_corrected,
        "Diagnosis complete"
    );

    DiagnosticReport {
        findings,
        score_actual,
        score_corrected,
        classification,
    }
}

fn check_point_count(
    user: &[Point],
    limits: &DiagnosticLimits,
    findings: &mut Vec<DiagnosticFinding>,
) {
    let count = user.len() as f64;
    if user.len() < limits.min_points {
        findings.push(
            DiagnosticFinding::new(
                Problem::TooFewPoints,
                Severity::Critical,
                format!("The stroke has only {} points", user.len()),
                "Draw one continuous stroke without lifting the finger",
            )
            .with("points", count)
            .with("minimum", limits.min_points as f64),
        );
    }
    if user.len() > limits.max_points {
        findings.push(
            DiagnosticFinding::new(
                Problem::TooManyPoints,
                Severity::Medium,
                format!("The stroke has {} points and may be noisy", user.len()),
                "Draw at a steady pace; smoothing the capture may help",
            )
            .with("points", count)
            .with("maximum", limits.max_points as f64),
        );
    }
}

/// Lines are naturally flat, so only their long side is checked.
fn check_extent(
    user: &[Point],
    expected: ShapeKind,
    limits: &DiagnosticLimits,
    findings: &mut Vec<DiagnosticFinding>,
) {
    let bbox = bounding_box(user);
    let side = if expected == ShapeKind::Line && limits.exempt_line_height {
        bbox.max_dimension()
    } else {
        bbox.min_dimension()
    };
    if side < limits.min_extent_px {
        findings.push(
            DiagnosticFinding::new(
                Problem::DegenerateBoundingBox,
                Severity::High,
                format!("The drawing is only {:.1} x {:.1} px", bbox.width, bbox.height),
                "Draw the shape larger",
            )
            .with("width", bbox.width)
            .with("height", bbox.height)
            .with("minimum", limits.min_extent_px),
        );
    }
}

fn check_shape(
    classification: &ShapeClassification,
    expected: ShapeKind,
    limits: &DiagnosticLimits,
    findings: &mut Vec<DiagnosticFinding>,
) {
    if expected != ShapeKind::Other && classification.kind != expected {
        let mut finding = DiagnosticFinding::new(
            Problem::ShapeMismatch,
            Severity::Critical,
            format!(
                "Expected a {} but the drawing looks like a {}",
                expected, classification.kind
            ),
            format!("Trace the outline of the {} more closely", expected),
        )
        .with("confidence", classification.confidence);
        finding
            .supporting_data
            .extend(classification.measurements.iter().map(|(k, v)| (k.clone(), *v)));
        findings.push(finding);
    }
    if classification.confidence < limits.min_confidence {
        findings.push(
            DiagnosticFinding::new(
                Problem::LowConfidence,
                Severity::High,
                format!(
                    "The shape is hard to recognise (confidence {:.2})",
                    classification.confidence
                ),
                "Draw clearer corners or smoother curves",
            )
            .with("confidence", classification.confidence)
            .with("minimum", limits.min_confidence),
        );
    }
}

fn check_size_and_position(
    user: &[Point],
    model: &[Point],
    limits: &DiagnosticLimits,
    findings: &mut Vec<DiagnosticFinding>,
) {
    let user_box = bounding_box(user);
    let model_box = bounding_box(model);
    let model_extent = model_box.max_dimension();

    let ratio = if model_extent > f64::EPSILON {
        user_box.max_dimension() / model_extent
    } else {
        1.0
    };
    if ratio < limits.min_size_ratio || ratio > limits.max_size_ratio {
        let (description, remedy) = if ratio < limits.min_size_ratio {
            ("The drawing is much smaller than the model", "Draw the shape larger")
        } else {
            ("The drawing is much larger than the model", "Draw the shape smaller")
        };
        findings.push(
            DiagnosticFinding::new(Problem::SizeMismatch, Severity::High, description, remedy)
                .with("size_ratio", ratio)
                .with("user_extent", user_box.max_dimension())
                .with("model_extent", model_extent),
        );
    }

    let offset = distance(user_box.center(), model_box.center());
    if offset > limits.max_center_offset * model_extent {
        findings.push(
            DiagnosticFinding::new(
                Problem::PositionMismatch,
                Severity::Medium,
                format!("The drawing is {:.0} px away from the model", offset),
                "Draw over the model",
            )
            .with("center_offset", offset)
            .with("allowed", limits.max_center_offset * model_extent),
        );
    }
}

fn check_tolerance(
    model: &[Point],
    thresholds: &Thresholds,
    limits: &DiagnosticLimits,
    findings: &mut Vec<DiagnosticFinding>,
) {
    let tolerance = thresholds
        .free_copy
        .tolerance_for(bounding_box(model).max_dimension());
    if tolerance < limits.min_tolerance_px {
        findings.push(
            DiagnosticFinding::new(
                Problem::ToleranceTooTight,
                Severity::High,
                format!("The scoring tolerance is only {:.1} px", tolerance),
                "Raise free_copy.min_tolerance_px or base_tolerance_percent",
            )
            .with("tolerance", tolerance)
            .with("minimum", limits.min_tolerance_px),
        );
    }
    if tolerance > limits.max_tolerance_px {
        findings.push(
            DiagnosticFinding::new(
                Problem::ToleranceTooLoose,
                Severity::Medium,
                format!("The scoring tolerance is {:.1} px", tolerance),
                "Lower free_copy.base_tolerance_percent",
            )
            .with("tolerance", tolerance)
            .with("maximum", limits.max_tolerance_px),
        );
    }
}
