//! # TraceKit
//!
//! Trajectory comparison and scoring engine for shape-tracing exercises.
//! A user draws a stroke; TraceKit compares it with a model stroke and reports
//! how well it matches.
//!
//! ## Architecture
//!
//! TraceKit is organized as a workspace with multiple crates:
//!
//! 1. **tracekit-core** - Points, strokes, geometric primitives, trace sinks
//! 2. **tracekit-settings** - Calibrated thresholds and their persistence
//! 3. **tracekit-engine** - Classifier, similarity, scorers, calibration, diagnostics
//! 4. **tracekit** - This facade, re-exporting the public API
//!
//! ## Features
//!
//! - **Shape classification**: circle, square, triangle, star and line with confidence
//! - **Similarity**: translation, scale, start-point and direction invariant
//! - **Free-copy scoring**: friendly and clinical strictness modes
//! - **Guided-trace scoring**: superposition, continuity, direction and lane containment
//! - **Calibration**: proposes new thresholds from labeled cases, never applies them
//! - **Diagnostics**: every problem behind a score, with severities and remedies
//!
//! The engine is synchronous and pure. Thresholds are plain values owned by
//! the caller and passed into every call.

pub use tracekit_core::{
    bounding_box, centroid, distance, normalize, path_length, point_to_polyline_distance,
    resample, BoundingBox, Error, NoTrace, Point, Result, Stroke, StrokeError, TraceEntry,
    TraceLog, TraceSink, TracingSink,
};

pub use tracekit_settings::{
    ClassifierThresholds, ConfigError, FreeCopyThresholds, GuidedThresholds, SettingsError,
    SettingsResult, SimilarityThresholds, Thresholds,
};

pub use tracekit_engine::{
    calibrate, calibrate_with, classify, classify_traced, default_cases, diagnose, diagnose_with,
    free_copy_score, free_copy_score_traced, guided_trace_score, guided_trace_score_traced, shapes,
    similarity, similarity_traced, CalibrationCase, CalibrationOptions, CalibrationReport,
    CaseOutcome, ClassificationReason, DiagnosticFinding, DiagnosticLimits, DiagnosticReport,
    EvaluationResult, FreeCopyScorer, GuidedTraceScorer, Problem, Severity, ShapeClassification,
    ShapeKind, StrictnessMode, TrajectoryScorer,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build date (set at compile time)
pub const BUILD_DATE: &str = env!("BUILD_DATE");

/// Initialize logging with the default configuration
///
/// Sets up structured logging with:
/// - Console output with pretty formatting
/// - RUST_LOG environment variable support, `info` when unset
///
/// Returns an error if a global subscriber is already installed.
pub fn init_logging() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stdout)
        .with_target(true)
        .with_level(true)
        .with_thread_ids(true)
        .with_line_number(true)
        .pretty();

    tracing_subscriber::registry()
        .with(env_filter())
        .with(fmt_layer)
        .try_init()?;
    tracing::debug!(version = VERSION, "Logging initialized");
    Ok(())
}

/// Initialize logging as JSON lines, for hosts that collect structured logs.
pub fn init_json_logging() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;

    tracing_subscriber::registry()
        .with(env_filter())
        .with(fmt::layer().json().with_current_span(false))
        .try_init()?;
    Ok(())
}

fn env_filter() -> tracing_subscriber::EnvFilter {
    tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"))
}
