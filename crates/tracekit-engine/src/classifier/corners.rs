//! Local corner detection over a resampled stroke.
//!
//! A single pass: each point's turning angle is measured between the chords to
//! the points `window / 2` steps behind and ahead of it, and the point is a
//! corner when that angle clears the threshold and is a local maximum. This is
//! not a polygon simplification; heavy noise produces spurious corners.

use std::f64::consts::PI;

use tracekit_core::{turning_angle, Point};

/// A detected corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Corner {
    /// Index into the analysed point slice
    pub index: usize,
    pub point: Point,
    /// Windowed turning angle at the corner, in radians
    pub turn: f64,
}

/// Windowed turning angle at every point.
///
/// Open strokes report `0.0` where the window would run past either end.
pub(crate) fn windowed_turns(points: &[Point], offset: usize, closed: bool) -> Vec<f64> {
    let n = points.len();
    let offset = offset.max(1);
    if n < 2 * offset + 1 {
        return vec![0.0; n];
    }
    (0..n)
        .map(|i| {
            if closed {
                let prev = (i + n - offset) % n;
                let next = (i + offset) % n;
                turning_angle(points[prev], points[i], points[next])
            } else if i < offset || i + offset >= n {
                0.0
            } else {
                turning_angle(points[i - offset], points[i], points[i + offset])
            }
        })
        .collect()
}

/// Detects corners as thresholded local maxima of the windowed turning angle.
///
/// On a plateau of equal angles only the last point of the run is kept, so a
/// vertex falling between two samples yields one corner, not two.
pub fn detect_corners(
    points: &[Point],
    window: usize,
    threshold: f64,
    closed: bool,
) -> Vec<Corner> {
    let n = points.len();
    let turns = windowed_turns(points, window / 2, closed);
    if n < 3 {
        return Vec::new();
    }

    let neighbour = |i: usize, forward: bool| -> f64 {
        match (forward, closed) {
            (true, true) => turns[(i + 1) % n],
            (false, true) => turns[(i + n - 1) % n],
            (true, false) => turns.get(i + 1).copied().unwrap_or(0.0),
            (false, false) => i.checked_sub(1).map(|j| turns[j]).unwrap_or(0.0),
        }
    };

    turns
        .iter()
        .enumerate()
        .filter(|&(i, &turn)| {
            turn > threshold && turn >= neighbour(i, false) && turn > neighbour(i, true)
        })
        .map(|(index, &turn)| Corner {
            index,
            point: points[index],
            turn,
        })
        .collect()
}

/// Interior angle at `index`, reaching `reach` points to either side.
///
/// Open strokes clamp the reach to the stroke ends.
pub(crate) fn interior_angle(points: &[Point], index: usize, reach: usize, closed: bool) -> f64 {
    let n = points.len();
    if n < 3 {
        return PI;
    }
    let (prev, next) = if closed {
        ((index + n - reach % n) % n, (index + reach) % n)
    } else {
        (index.saturating_sub(reach), (index + reach).min(n - 1))
    };
    PI - turning_angle(points[prev], points[index], points[next])
}
