//! Shape-invariant similarity between two strokes.
//!
//! Both strokes are resampled to the same count and normalized (centered, unit
//! RMS radius). The model is then aligned to the user stroke by exhaustive
//! search over both traversal directions and every cyclic start offset, keeping
//! the smallest sum of squared point distances. The result is insensitive to
//! translation, scale, start point and drawing direction, but not to rotation.
//! The search is O(N^2) in the resample count.

use serde::{Deserialize, Serialize};
use tracekit_core::{normalize, resample, NoTrace, Point, TraceSink};
use tracekit_settings::Thresholds;

const STAGE: &str = "similarity";

/// The best model alignment found for a user stroke.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Alignment {
    /// Mean squared distance between aligned, normalized points
    pub mse: f64,
    /// Whether the model was traversed backwards
    pub reversed: bool,
    /// Cyclic shift applied to the model's start point
    pub offset: usize,
}

impl Alignment {
    /// Maps the alignment error onto `[0, 100]`; an MSE of 1 or more scores 0.
    pub fn score(&self) -> f64 {
        (100.0 - self.mse * 100.0).clamp(0.0, 100.0)
    }
}

/// Similarity score in `[0, 100]` between a user stroke and a model stroke.
///
/// Returns `0.0` when either stroke is empty.
pub fn similarity(user: &[Point], model: &[Point], thresholds: &Thresholds) -> f64 {
    similarity_traced(user, model, thresholds, &mut NoTrace)
}

/// [`similarity`], writing the alignment to `trace`.
pub fn similarity_traced(
    user: &[Point],
    model: &[Point],
    thresholds: &Thresholds,
    trace: &mut dyn TraceSink,
) -> f64 {
    let Some(alignment) = best_alignment(user, model, thresholds.similarity.resample_points) else {
        trace.record(STAGE, "score", 0.0);
        return 0.0;
    };
    let score = alignment.score();
    trace.record(STAGE, "mse", alignment.mse);
    trace.flag(STAGE, "reversed", alignment.reversed);
    trace.record(STAGE, "offset", alignment.offset as f64);
    trace.record(STAGE, "score", score);
    score
}

/// Finds the direction and start offset minimising the squared point distance.
///
/// `None` when either stroke is empty or `n` is zero.
pub fn best_alignment(user: &[Point], model: &[Point], n: usize) -> Option<Alignment> {
    if user.is_empty() || model.is_empty() || n == 0 {
        return None;
    }
    let u = normalize(&resample(user, n));
    let forward = normalize(&resample(model, n));
    let backward: Vec<Point> = forward.iter().rev().copied().collect();

    let mut best = Alignment {
        mse: f64::INFINITY,
        reversed: false,
        offset: 0,
    };
    for (reversed, m) in [(false, &forward), (true, &backward)] {
        for offset in 0..n {
            let sum = squared_distance_at(&u, m, offset);
            if sum / (n as f64) < best.mse {
                best = Alignment {
                    mse: sum / n as f64,
                    reversed,
                    offset,
                };
            }
        }
    }
    Some(best)
}

fn squared_distance_at(user: &[Point], model: &[Point], offset: usize) -> f64 {
    let n = model.len();
    user.iter()
        .enumerate()
        .map(|(i, p)| {
            let q = model[(i + offset) % n];
            let (dx, dy) = (p.x - q.x, p.y - q.y);
            dx * dx + dy * dy
        })
        .sum()
}
