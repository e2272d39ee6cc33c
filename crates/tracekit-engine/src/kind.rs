//! Shape kinds and classification results.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Canonical shapes the classifier can recognise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    Circle,
    Square,
    Triangle,
    Star,
    Line,
    Other,
}

impl ShapeKind {
    pub const ALL: [ShapeKind; 6] = [
        ShapeKind::Circle,
        ShapeKind::Square,
        ShapeKind::Triangle,
        ShapeKind::Star,
        ShapeKind::Line,
        ShapeKind::Other,
    ];

    /// Returns the name of the shape kind.
    pub fn name(&self) -> &'static str {
        match self {
            ShapeKind::Circle => "circle",
            ShapeKind::Square => "square",
            ShapeKind::Triangle => "triangle",
            ShapeKind::Star => "star",
            ShapeKind::Line => "line",
            ShapeKind::Other => "other",
        }
    }
}

impl Default for ShapeKind {
    fn default() -> Self {
        Self::Other
    }
}

impl fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when parsing an unknown shape name.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown shape kind: {0}")]
pub struct UnknownShapeKind(pub String);

impl FromStr for ShapeKind {
    type Err = UnknownShapeKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "circle" | "circulo" => Ok(Self::Circle),
            "square" | "cuadrado" => Ok(Self::Square),
            "triangle" | "triangulo" => Ok(Self::Triangle),
            "star" | "estrella" => Ok(Self::Star),
            "line" | "linea" => Ok(Self::Line),
            "other" => Ok(Self::Other),
            _ => Err(UnknownShapeKind(s.to_string())),
        }
    }
}

/// Why a classification fell back to `Other` without running the rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassificationReason {
    /// Fewer points than the classifier's minimum
    InsufficientPoints,
    /// Every point coincides, so there is no shape to measure
    DegenerateExtent,
}

/// Result of classifying one stroke.
///
/// `confidence` is always finite and within `[0, 1]`. `measurements` holds the
/// quantities the rules were evaluated on, keyed by name, for diagnostics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShapeClassification {
    pub kind: ShapeKind,
    pub confidence: f64,
    pub measurements: BTreeMap<String, f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<ClassificationReason>,
}

impl ShapeClassification {
    pub fn new(kind: ShapeKind, confidence: f64, measurements: BTreeMap<String, f64>) -> Self {
        let confidence = if confidence.is_finite() {
            confidence.clamp(0.0, 1.0)
        } else {
            0.0
        };
        Self {
            kind,
            confidence,
            measurements,
            reason: None,
        }
    }

    /// An `Other` result with zero confidence and a reason code.
    pub fn rejected(reason: ClassificationReason, measurements: BTreeMap<String, f64>) -> Self {
        Self {
            kind: ShapeKind::Other,
            confidence: 0.0,
            measurements,
            reason: Some(reason),
        }
    }

    pub fn measurement(&self, key: &str) -> Option<f64> {
        self.measurements.get(key).copied()
    }
}
