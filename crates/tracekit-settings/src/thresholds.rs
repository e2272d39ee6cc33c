//! Calibrated thresholds for classification and scoring.
//!
//! Thresholds are organized into logical sections:
//! - Classifier gates (line, circle, square, triangle, star rules, corner detection)
//! - Similarity resampling
//! - Free-copy scoring (tolerance, coverage, proportion, complexity, shape veto)
//! - Guided-trace scoring (lane width, sub-score weights, lane penalty)
//!
//! A `Thresholds` value is immutable from the engine's point of view. The host
//! creates it (defaults or a file), passes it by reference into every call, and
//! replaces it wholesale after calibration. Files are JSON or TOML, chosen by
//! extension; every section is `#[serde(default)]` so partial files load.

use std::f64::consts::FRAC_PI_2;
use std::f64::consts::FRAC_PI_4;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, SettingsError, SettingsResult};

/// Shape classifier gates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierThresholds {
    /// Fewer raw points than this classify as `Other` with zero confidence
    pub min_points: usize,
    /// Arc-length resample count used for corner and curvature analysis
    pub resample_points: usize,
    /// End-to-start gap, as a fraction of the larger bbox side, that still counts as closed
    pub closure_ratio: f64,
    /// Longer bbox side over shorter side above which a stroke may be a line
    pub line_min_elongation: f64,
    /// Path length over longer bbox side required for a line
    pub line_min_length_ratio: f64,
    pub line_confidence: f64,
    /// Coefficient of variation of centroid distance below which a stroke may be a circle
    pub circle_max_variation: f64,
    /// Smooth-to-sharp heading change ratio required for a circle
    pub circle_min_smooth_ratio: f64,
    /// Shorter over longer bbox side required for a circle
    pub circle_min_aspect: f64,
    /// A corner sharper than this (windowed turn, rad) rules out a circle
    pub circle_max_corner_turn: f64,
    /// Per-step heading change (rad) counted as smooth
    pub smooth_turn_angle: f64,
    /// Per-step heading change (rad) counted as sharp
    pub sharp_turn_angle: f64,
    /// Three-point moving-average passes applied before corner and turn analysis
    pub smoothing_passes: usize,
    /// Sliding window, in resampled points, for corner turning angles
    pub corner_window: usize,
    /// Windowed turning angle (rad) a corner must exceed
    pub corner_angle_threshold: f64,
    pub square_min_corners: usize,
    pub square_max_corners: usize,
    pub square_min_aspect: f64,
    /// Allowed deviation (rad) from 90 degrees between adjacent sides
    pub right_angle_tolerance: f64,
    /// Allowed deviation (rad) from parallel between opposite sides
    pub parallel_tolerance: f64,
    /// Minimum area (px^2) of the three triangle corners
    pub triangle_min_area: f64,
    /// Distance, as a fraction of the resampled points, reached on each side of a triangle corner
    pub triangle_reach_fraction: f64,
    /// Allowed deviation (rad) of the interior angle sum from PI
    pub triangle_angle_tolerance: f64,
    pub star_min_corners: usize,
    /// Minimum angular-sector symmetry score for a star
    pub star_min_symmetry: f64,
    /// Confidence reported when no rule fires
    pub other_confidence: f64,
}

impl Default for ClassifierThresholds {
    fn default() -> Self {
        Self {
            min_points: 8,
            resample_points: 64,
            closure_ratio: 0.2,
            line_min_elongation: 4.0,
            line_min_length_ratio: 0.8,
            line_confidence: 0.9,
            circle_max_variation: 0.2,
            circle_min_smooth_ratio: 1.2,
            circle_min_aspect: 0.6,
            circle_max_corner_turn: 0.9,
            smooth_turn_angle: 0.2,
            sharp_turn_angle: 0.5,
            smoothing_passes: 1,
            corner_window: 5,
            corner_angle_threshold: 0.6,
            square_min_corners: 4,
            square_max_corners: 8,
            square_min_aspect: 0.55,
            right_angle_tolerance: FRAC_PI_4,
            parallel_tolerance: 0.3,
            triangle_min_area: 100.0,
            triangle_reach_fraction: 0.1,
            triangle_angle_tolerance: 0.4,
            star_min_corners: 5,
            star_min_symmetry: 0.6,
            other_confidence: 0.2,
        }
    }
}

/// Procrustes-style similarity settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimilarityThresholds {
    /// Points both strokes are resampled to; the alignment search is quadratic in this
    pub resample_points: usize,
}

impl Default for SimilarityThresholds {
    fn default() -> Self {
        Self {
            resample_points: 60,
        }
    }
}

/// Free-copy scoring knobs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FreeCopyThresholds {
    /// User strokes shorter than this score zero
    pub min_user_points: usize,
    /// User points sampled for the proximity average
    pub max_samples: usize,
    /// Tolerance as a fraction of the model's larger bbox side
    pub base_tolerance_percent: f64,
    /// Tolerance floor in pixels
    pub min_tolerance_px: f64,
    /// Average distance, in tolerances, at which the base score reaches zero
    pub falloff_span: f64,
    /// Model points (arc-length resampled) checked for coverage
    pub coverage_samples: usize,
    pub coverage_boost_above: f64,
    pub coverage_boost: f64,
    pub coverage_penalty_below: f64,
    pub coverage_penalty: f64,
    /// Coverage factor at the penalty edge, rising linearly to `coverage_band_high`
    pub coverage_band_low: f64,
    /// Coverage factor at the boost edge
    pub coverage_band_high: f64,
    /// User/model size ratio band outside which the proportion factor drops
    pub proportion_min: f64,
    pub proportion_max: f64,
    /// Lowest proportion factor, however far the size ratio strays
    pub proportion_floor: f64,
    /// User/model path length ratio below which the complexity factor drops
    pub complexity_min_ratio: f64,
    pub complexity_floor: f64,
    pub shape_match_bonus: f64,
    pub shape_mismatch_penalty: f64,
    /// Lowest score the friendly mode reports for an evaluable attempt
    pub friendly_floor: f64,
    /// Extra multiplier applied by the clinical mode
    pub clinical_multiplier: f64,
}

impl Default for FreeCopyThresholds {
    fn default() -> Self {
        Self {
            min_user_points: 5,
            max_samples: 50,
            base_tolerance_percent: 0.08,
            min_tolerance_px: 20.0,
            falloff_span: 2.0,
            coverage_samples: 50,
            coverage_boost_above: 0.70,
            coverage_boost: 1.1,
            coverage_penalty_below: 0.15,
            coverage_penalty: 0.5,
            coverage_band_low: 0.8,
            coverage_band_high: 1.0,
            proportion_min: 0.5,
            proportion_max: 2.5,
            proportion_floor: 0.1,
            complexity_min_ratio: 0.5,
            complexity_floor: 0.3,
            shape_match_bonus: 1.2,
            shape_mismatch_penalty: 0.2,
            friendly_floor: 10.0,
            clinical_multiplier: 0.88,
        }
    }
}

impl FreeCopyThresholds {
    /// Scoring tolerance derived from the model's larger bbox side.
    pub fn tolerance_for(&self, model_extent: f64) -> f64 {
        (model_extent * self.base_tolerance_percent).max(self.min_tolerance_px)
    }
}

/// Guided-trace (lane) scoring knobs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GuidedThresholds {
    /// User strokes shorter than this score zero
    pub min_user_points: usize,
    /// Distance within which a model point counts as superposed
    pub lane_tolerance_px: f64,
    /// Half the lane width; user points farther than this are outside
    pub lane_half_width_px: f64,
    pub lane_penalty_exponent: f64,
    pub superposition_weight: f64,
    pub continuity_weight: f64,
    pub direction_weight: f64,
    /// Angular difference (rad) at which the direction score reaches zero
    pub direction_falloff: f64,
    /// Model points (arc-length resampled) checked for superposition
    pub coverage_samples: usize,
}

impl Default for GuidedThresholds {
    fn default() -> Self {
        Self {
            min_user_points: 2,
            lane_tolerance_px: 60.0,
            lane_half_width_px: 25.0,
            lane_penalty_exponent: 0.75,
            superposition_weight: 0.60,
            continuity_weight: 0.25,
            direction_weight: 0.15,
            direction_falloff: FRAC_PI_2,
            coverage_samples: 50,
        }
    }
}

/// The complete calibrated configuration.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    pub classifier: ClassifierThresholds,
    pub similarity: SimilarityThresholds,
    pub free_copy: FreeCopyThresholds,
    pub guided: GuidedThresholds,
}

impl Thresholds {
    /// Create thresholds with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Default location of the thresholds file, if the platform has a config directory.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("tracekit").join("thresholds.toml"))
    }

    /// Load thresholds from file (JSON or TOML)
    pub fn load_from_file(path: &Path) -> SettingsResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| SettingsError::LoadError(format!("{}: {}", path.display(), e)))?;

        let thresholds: Self = match Format::of(path)? {
            Format::Json => serde_json::from_str(&content)?,
            Format::Toml => toml::from_str(&content)?,
        };

        thresholds.validate()?;
        tracing::debug!(path = %path.display(), "Loaded thresholds");
        Ok(thresholds)
    }

    /// Load thresholds from file, falling back to defaults when the file does not exist
    pub fn load_or_default(path: &Path) -> SettingsResult<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "No thresholds file, using defaults");
            return Ok(Self::default());
        }
        Self::load_from_file(path)
    }

    /// Save thresholds to file (JSON or TOML)
    pub fn save_to_file(&self, path: &Path) -> SettingsResult<()> {
        self.validate()?;

        let content = match Format::of(path)? {
            Format::Json => serde_json::to_string_pretty(self)?,
            Format::Toml => toml::to_string_pretty(self)?,
        };

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(path, content)
            .map_err(|e| SettingsError::SaveError(format!("{}: {}", path.display(), e)))?;

        tracing::debug!(path = %path.display(), "Saved thresholds");
        Ok(())
    }

    /// Validate thresholds
    pub fn validate(&self) -> SettingsResult<()> {
        let c = &self.classifier;
        at_least("classifier.min_points", c.min_points, 3)?;
        at_least("classifier.resample_points", c.resample_points, 16)?;
        at_least("classifier.corner_window", c.corner_window, 3)?;
        fraction("classifier.closure_ratio", c.closure_ratio)?;
        positive("classifier.line_min_elongation", c.line_min_elongation)?;
        positive("classifier.line_min_length_ratio", c.line_min_length_ratio)?;
        fraction("classifier.line_confidence", c.line_confidence)?;
        positive("classifier.circle_max_variation", c.circle_max_variation)?;
        positive("classifier.circle_min_smooth_ratio", c.circle_min_smooth_ratio)?;
        fraction("classifier.circle_min_aspect", c.circle_min_aspect)?;
        positive("classifier.circle_max_corner_turn", c.circle_max_corner_turn)?;
        positive("classifier.smooth_turn_angle", c.smooth_turn_angle)?;
        positive("classifier.sharp_turn_angle", c.sharp_turn_angle)?;
        if c.smooth_turn_angle >= c.sharp_turn_angle {
            return Err(SettingsError::invalid(
                "classifier.smooth_turn_angle",
                "must be below sharp_turn_angle",
            ));
        }
        positive("classifier.corner_angle_threshold", c.corner_angle_threshold)?;
        if c.square_min_corners > c.square_max_corners {
            return Err(SettingsError::invalid(
                "classifier.square_min_corners",
                "must not exceed square_max_corners",
            ));
        }
        fraction("classifier.square_min_aspect", c.square_min_aspect)?;
        positive("classifier.right_angle_tolerance", c.right_angle_tolerance)?;
        positive("classifier.parallel_tolerance", c.parallel_tolerance)?;
        non_negative("classifier.triangle_min_area", c.triangle_min_area)?;
        fraction("classifier.triangle_reach_fraction", c.triangle_reach_fraction)?;
        positive("classifier.triangle_angle_tolerance", c.triangle_angle_tolerance)?;
        at_least("classifier.star_min_corners", c.star_min_corners, 3)?;
        fraction("classifier.star_min_symmetry", c.star_min_symmetry)?;
        fraction("classifier.other_confidence", c.other_confidence)?;

        at_least("similarity.resample_points", self.similarity.resample_points, 2)?;

        let f = &self.free_copy;
        at_least("free_copy.min_user_points", f.min_user_points, 1)?;
        at_least("free_copy.max_samples", f.max_samples, 1)?;
        at_least("free_copy.coverage_samples", f.coverage_samples, 2)?;
        positive("free_copy.base_tolerance_percent", f.base_tolerance_percent)?;
        non_negative("free_copy.min_tolerance_px", f.min_tolerance_px)?;
        positive("free_copy.falloff_span", f.falloff_span)?;
        fraction("free_copy.coverage_boost_above", f.coverage_boost_above)?;
        fraction("free_copy.coverage_penalty_below", f.coverage_penalty_below)?;
        if f.coverage_penalty_below >= f.coverage_boost_above {
            return Err(SettingsError::invalid(
                "free_copy.coverage_penalty_below",
                "must be below coverage_boost_above",
            ));
        }
        positive("free_copy.coverage_boost", f.coverage_boost)?;
        non_negative("free_copy.coverage_penalty", f.coverage_penalty)?;
        non_negative("free_copy.coverage_band_low", f.coverage_band_low)?;
        if f.coverage_band_low > f.coverage_band_high {
            return Err(SettingsError::invalid(
                "free_copy.coverage_band_low",
                "must not exceed coverage_band_high",
            ));
        }
        positive("free_copy.proportion_min", f.proportion_min)?;
        if f.proportion_min >= f.proportion_max {
            return Err(SettingsError::invalid(
                "free_copy.proportion_min",
                "must be below proportion_max",
            ));
        }
        fraction("free_copy.proportion_floor", f.proportion_floor)?;
        positive("free_copy.complexity_min_ratio", f.complexity_min_ratio)?;
        fraction("free_copy.complexity_floor", f.complexity_floor)?;
        positive("free_copy.shape_match_bonus", f.shape_match_bonus)?;
        non_negative("free_copy.shape_mismatch_penalty", f.shape_mismatch_penalty)?;
        non_negative("free_copy.friendly_floor", f.friendly_floor)?;
        fraction("free_copy.clinical_multiplier", f.clinical_multiplier)?;

        let g = &self.guided;
        at_least("guided.min_user_points", g.min_user_points, 2)?;
        positive("guided.lane_tolerance_px", g.lane_tolerance_px)?;
        positive("guided.lane_half_width_px", g.lane_half_width_px)?;
        positive("guided.lane_penalty_exponent", g.lane_penalty_exponent)?;
        non_negative("guided.superposition_weight", g.superposition_weight)?;
        non_negative("guided.continuity_weight", g.continuity_weight)?;
        non_negative("guided.direction_weight", g.direction_weight)?;
        if g.superposition_weight + g.continuity_weight + g.direction_weight <= 0.0 {
            return Err(SettingsError::invalid(
                "guided.superposition_weight",
                "sub-score weights must not all be zero",
            ));
        }
        positive("guided.direction_falloff", g.direction_falloff)?;
        at_least("guided.coverage_samples", g.coverage_samples, 2)?;

        Ok(())
    }
}

enum Format {
    Json,
    Toml,
}

impl Format {
    fn of(path: &Path) -> SettingsResult<Self> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Ok(Format::Json),
            Some("toml") => Ok(Format::Toml),
            other => Err(ConfigError::UnsupportedFormat(other.unwrap_or("").to_string()).into()),
        }
    }
}

fn finite(key: &str, value: f64) -> SettingsResult<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(SettingsError::invalid(key, "must be finite"))
    }
}

fn positive(key: &str, value: f64) -> SettingsResult<()> {
    finite(key, value)?;
    if value > 0.0 {
        Ok(())
    } else {
        Err(SettingsError::invalid(key, "must be > 0"))
    }
}

fn non_negative(key: &str, value: f64) -> SettingsResult<()> {
    finite(key, value)?;
    if value >= 0.0 {
        Ok(())
    } else {
        Err(SettingsError::invalid(key, "must be >= 0"))
    }
}

fn fraction(key: &str, value: f64) -> SettingsResult<()> {
    finite(key, value)?;
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::ValueOutOfRange {
            key: key.to_string(),
            value: value.to_string(),
        }
        .into())
    }
}

fn at_least(key: &str, value: usize, min: usize) -> SettingsResult<()> {
    if value >= min {
        Ok(())
    } else {
        Err(SettingsError::invalid(key, format!("must be >= {}", min)))
    }
}
