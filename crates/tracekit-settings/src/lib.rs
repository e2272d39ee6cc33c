//! TraceKit Settings Crate
//!
//! Holds the calibrated [`Thresholds`] record that every classifier and scorer
//! call reads. The host application owns the current snapshot, loads or saves
//! it explicitly, and swaps it wholesale when calibration proposes new values.

pub mod error;
pub mod thresholds;

pub use error::{ConfigError, SettingsError, SettingsResult};
pub use thresholds::{
    ClassifierThresholds, FreeCopyThresholds, GuidedThresholds, SimilarityThresholds, Thresholds,
};
