//! # TraceKit Engine
//!
//! Compares a user's stroke against a model stroke and turns the comparison
//! into scores, classifications and explanations.
//!
//! ## Components
//!
//! - **Classifier**: decides which canonical shape (circle, square, triangle,
//!   star, line) a freehand stroke resembles, with a confidence
//! - **Similarity**: translation, scale, start-point and direction invariant
//!   shape distance mapped to `0..=100`
//! - **Scoring**: the free-copy and guided-trace policies
//! - **Calibration**: proposes adjusted thresholds from labeled cases
//! - **Diagnostics**: lists every problem behind a score
//! - **Shapes**: reference stroke generators and transforms
//!
//! ## Usage
//!
//! ```rust
//! use tracekit_core::Point;
//! use tracekit_engine::{free_copy_score, shapes, ShapeKind, StrictnessMode};
//! use tracekit_settings::Thresholds;
//!
//! let thresholds = Thresholds::default();
//! let model = shapes::circle(Point::new(200.0, 200.0), 100.0, 100);
//! let result = free_copy_score(
//!     &model,
//!     &model,
//!     ShapeKind::Circle,
//!     StrictnessMode::Friendly,
//!     &thresholds,
//! );
//! assert!(result.score > 90.0);
//! ```
//!
//! Every entry point is a pure function of its inputs and the [`Thresholds`]
//! passed in. Entry points with a `_traced` variant accept a
//! [`tracekit_core::TraceSink`] that receives intermediate measurements.
//!
//! [`Thresholds`]: tracekit_settings::Thresholds

pub mod calibration;
pub mod classifier;
pub mod diagnostics;
pub mod kind;
pub mod scoring;
pub mod shapes;
pub mod similarity;

pub use calibration::{
    calibrate, calibrate_with, default_cases, CalibrationCase, CalibrationOptions,
    CalibrationReport, CaseOutcome,
};
pub use classifier::{classify, classify_traced, detect_corners, Corner};
pub use diagnostics::{
    diagnose, diagnose_with, DiagnosticFinding, DiagnosticLimits, DiagnosticReport, Problem,
    Severity,
};
pub use kind::{ClassificationReason, ShapeClassification, ShapeKind, UnknownShapeKind};
pub use scoring::{
    free_copy_score, free_copy_score_traced, guided_trace_score, guided_trace_score_traced,
    EvaluationResult, FreeCopyScorer, GuidedTraceScorer, StrictnessMode, TrajectoryScorer,
};
pub use similarity::{best_alignment, similarity, similarity_traced, Alignment};
