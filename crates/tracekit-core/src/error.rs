//! Error handling for TraceKit
//!
//! The scoring engine favours defined degenerate results over errors, so the
//! only failure the core crate raises is a stroke that breaks its contract
//! during checked construction of a [`crate::Stroke`].
//!
//! All error types use `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Stroke construction error type
///
/// Represents input that violates the stroke contract: strokes must hold at
/// least one point and every coordinate must be finite.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StrokeError {
    /// The stroke holds no points
    #[error("Stroke is empty")]
    Empty,

    /// A coordinate is NaN or infinite
    #[error("Non-finite coordinate at point {index}")]
    NonFinite {
        /// Index of the offending point.
        index: usize,
    },
}

/// Main error type for TraceKit
///
/// A unified error type that can represent any error raised by the core crate.
#[derive(Error, Debug)]
pub enum Error {
    /// Stroke error
    #[error(transparent)]
    Stroke(#[from] StrokeError),
}

impl Error {
    /// Check if this is a stroke error
    pub fn is_stroke_error(&self) -> bool {
        matches!(self, Error::Stroke(_))
    }
}

/// Result type using Error
pub type Result<T> = std::result::Result<T, Error>;
