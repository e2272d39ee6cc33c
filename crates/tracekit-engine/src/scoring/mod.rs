//! Trajectory scoring policies.
//!
//! Two policies share the geometric primitives:
//! - **Free copy**: the user reproduces a shape anywhere on the canvas; judged
//!   by proximity, coverage, proportion, path complexity and a shape veto.
//! - **Guided trace**: the user follows a visible path inside a lane; judged by
//!   superposition, continuity, direction and lane containment.
//!
//! Both are pure functions of their inputs and the supplied [`Thresholds`].

mod free_copy;
mod guided;

pub use free_copy::{free_copy_score, free_copy_score_traced, FreeCopyScorer};
pub use guided::{guided_trace_score, guided_trace_score_traced, GuidedTraceScorer};

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracekit_core::{NoTrace, Point, TraceSink};
use tracekit_settings::Thresholds;

use crate::kind::{ShapeClassification, ShapeKind};

/// How forgiving the free-copy policy is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrictnessMode {
    /// Child-facing: evaluable attempts never score below the friendly floor
    Friendly,
    /// Clinician-facing: an extra flat multiplier and no floor
    Clinical,
}

impl Default for StrictnessMode {
    fn default() -> Self {
        Self::Friendly
    }
}

impl fmt::Display for StrictnessMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Friendly => write!(f, "friendly"),
            Self::Clinical => write!(f, "clinical"),
        }
    }
}

impl FromStr for StrictnessMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "friendly" | "amigable" => Ok(Self::Friendly),
            "clinical" | "medica" | "médica" => Ok(Self::Clinical),
            _ => Err(format!("Unknown strictness mode: {}", s)),
        }
    }
}

/// Outcome of scoring one user stroke against one model stroke.
///
/// `score` is always within `[0, 100]`. `coverage` is a percentage and
/// `precision` is the average residual distance in input units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationResult {
    pub score: f64,
    pub coverage: f64,
    pub precision: f64,
    pub proportion_factor: f64,
    pub complexity_factor: f64,
    pub details: BTreeMap<String, f64>,
    /// Classification of the user stroke, when the policy computed one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub classification: Option<ShapeClassification>,
}

impl EvaluationResult {
    /// The zero result for input that cannot be meaningfully evaluated.
    pub fn insufficient(user_points: usize, model_points: usize) -> Self {
        let mut details = BTreeMap::new();
        details.insert("insufficient_data".to_string(), 1.0);
        details.insert("user_points".to_string(), user_points as f64);
        details.insert("model_points".to_string(), model_points as f64);
        Self {
            score: 0.0,
            coverage: 0.0,
            precision: 0.0,
            proportion_factor: 0.0,
            complexity_factor: 0.0,
            details,
            classification: None,
        }
    }

    /// True when the result is the insufficient-data fallback.
    pub fn is_insufficient(&self) -> bool {
        self.details.contains_key("insufficient_data")
    }

    pub fn detail(&self, key: &str) -> Option<f64> {
        self.details.get(key).copied()
    }
}

/// A scoring policy over (user stroke, model stroke, expected shape).
pub trait TrajectoryScorer {
    /// Scores `user` against `model`, writing intermediate values to `trace`.
    fn evaluate_traced(
        &self,
        user: &[Point],
        model: &[Point],
        expected: ShapeKind,
        thresholds: &Thresholds,
        trace: &mut dyn TraceSink,
    ) -> EvaluationResult;

    /// Scores `user` against `model`.
    fn evaluate(
        &self,
        user: &[Point],
        model: &[Point],
        expected: ShapeKind,
        thresholds: &Thresholds,
    ) -> EvaluationResult {
        self.evaluate_traced(user, model, expected, thresholds, &mut NoTrace)
    }
}

/// Clamps a raw score into `[0, 100]`, mapping NaN to zero.
pub(crate) fn clamp_score(raw: f64) -> f64 {
    if raw.is_nan() {
        0.0
    } else {
        raw.clamp(0.0, 100.0)
    }
}

/// Records a value both in the result details and the trace.
pub(crate) fn note(
    details: &mut BTreeMap<String, f64>,
    trace: &mut dyn TraceSink,
    stage: &'static str,
    key: &'static str,
    value: f64,
) {
    trace.record(stage, key, value);
    details.insert(key.to_string(), value);
}
