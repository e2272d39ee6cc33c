//! Shape classifier.
//!
//! Estimates which canonical shape a freehand stroke resembles. The stroke is
//! measured once into [`Features`], then an ordered list of independent rules
//! is tried; the first rule that fires decides the kind and confidence. All
//! gates come from [`ClassifierThresholds`], so calibration can move them.
//!
//! Corners and heading changes are measured on a lightly smoothed copy of the
//! resampled stroke, so hand tremor of a few pixels does not read as corners.
//! Radial variation and symmetry use the unsmoothed samples.

mod corners;

pub use corners::{detect_corners, Corner};

use std::collections::BTreeMap;
use std::f64::consts::PI;

use tracekit_core::{
    bounding_box, centroid, distance, is_closed, path_length, polygon_area, resample,
    resample_closed, smooth, turning_angle, BoundingBox, NoTrace, Point, TraceSink,
};
use tracekit_settings::{ClassifierThresholds, Thresholds};

use crate::kind::{ClassificationReason, ShapeClassification, ShapeKind};

const STAGE: &str = "classifier";
const SECTORS: usize = 8;

/// A classification rule: returns a confidence when the stroke matches.
type Rule = fn(&Features, &ClassifierThresholds) -> Option<f64>;

/// Rules in priority order. Each reads only the shared features.
const RULES: [(ShapeKind, Rule); 5] = [
    (ShapeKind::Line, line_rule),
    (ShapeKind::Circle, circle_rule),
    (ShapeKind::Square, square_rule),
    (ShapeKind::Triangle, triangle_rule),
    (ShapeKind::Star, star_rule),
];

/// Classifies a stroke against the canonical shapes.
///
/// Never fails: short or degenerate input yields `Other` with zero confidence
/// and a reason code; input no rule accepts yields `Other` with the configured
/// fallback confidence and all measurements attached.
pub fn classify(points: &[Point], thresholds: &Thresholds) -> ShapeClassification {
    classify_traced(points, thresholds, &mut NoTrace)
}

/// [`classify`], writing every measurement to `trace`.
pub fn classify_traced(
    points: &[Point],
    thresholds: &Thresholds,
    trace: &mut dyn TraceSink,
) -> ShapeClassification {
    let t = &thresholds.classifier;
    let mut measurements = Measurements::new(trace);
    measurements.put("points", points.len() as f64);

    if points.len() < t.min_points {
        let measurements = measurements.finish();
        return ShapeClassification::rejected(
            ClassificationReason::InsufficientPoints,
            measurements,
        );
    }

    let bbox = bounding_box(points);
    if bbox.max_dimension() <= f64::EPSILON {
        let measurements = measurements.finish();
        return ShapeClassification::rejected(ClassificationReason::DegenerateExtent, measurements);
    }

    let features = Features::measure(points, bbox, t);
    features.record(&mut measurements);

    for (kind, rule) in RULES {
        if let Some(confidence) = rule(&features, t) {
            measurements.trace.record(STAGE, "confidence", confidence);
            tracing::debug!(%kind, confidence, "Stroke classified");
            return ShapeClassification::new(kind, confidence, measurements.finish());
        }
    }

    measurements.trace.record(STAGE, "confidence", t.other_confidence);
    tracing::debug!("Stroke matched no canonical shape");
    ShapeClassification::new(ShapeKind::Other, t.other_confidence, measurements.finish())
}

/// Measurement map that mirrors every insertion to the trace sink.
struct Measurements<'a> {
    map: BTreeMap<String, f64>,
    trace: &'a mut dyn TraceSink,
}

impl<'a> Measurements<'a> {
    fn new(trace: &'a mut dyn TraceSink) -> Self {
        Self {
            map: BTreeMap::new(),
            trace,
        }
    }

    fn put(&mut self, key: &'static str, value: f64) {
        self.trace.record(STAGE, key, value);
        self.map.insert(key.to_string(), value);
    }

    fn finish(self) -> BTreeMap<String, f64> {
        self.map
    }
}

/// Everything the rules look at, measured once per stroke.
#[derive(Debug, Clone)]
pub(crate) struct Features {
    bbox: BoundingBox,
    path_length: f64,
    closed: bool,
    /// Coefficient of variation of the distance to the centroid
    radial_variation: f64,
    /// Smooth heading changes per sharp one
    smooth_ratio: f64,
    corners: Vec<Corner>,
    /// Largest windowed turn among the corners, `0.0` without corners
    sharpest_corner: f64,
    right_angles: usize,
    parallel_pairs: usize,
    /// Area and interior angle sum of the three most prominent corners
    triangle: Option<(f64, f64)>,
    symmetry: f64,
}

impl Features {
    fn measure(points: &[Point], bbox: BoundingBox, t: &ClassifierThresholds) -> Self {
        let closed = is_closed(points, t.closure_ratio);
        let samples = if closed {
            resample_closed(points, t.resample_points)
        } else {
            resample(points, t.resample_points)
        };
        let center = centroid(&samples);
        let smoothed = smooth(&samples, t.smoothing_passes, closed);

        let corners = detect_corners(&smoothed, t.corner_window, t.corner_angle_threshold, closed);
        let sharpest_corner = corners.iter().map(|c| c.turn).fold(0.0, f64::max);
        let (right_angles, parallel_pairs) = side_relations(points, &corners, closed, t);
        let reach = ((samples.len() as f64 * t.triangle_reach_fraction) as usize)
            .max(t.corner_window / 2)
            .max(1);

        Self {
            bbox,
            path_length: path_length(points),
            closed,
            radial_variation: radial_variation(&samples, center),
            smooth_ratio: smooth_ratio(&smoothed, closed, t),
            triangle: triangle_fit(&samples, &corners, center, reach, closed),
            right_angles,
            parallel_pairs,
            symmetry: sector_symmetry(&samples, center),
            sharpest_corner,
            corners,
        }
    }

    fn record(&self, m: &mut Measurements<'_>) {
        m.put("path_length", self.path_length);
        m.put("aspect_ratio", self.bbox.aspect_ratio());
        m.put("elongation", self.bbox.elongation().min(1e6));
        m.put("closed", if self.closed { 1.0 } else { 0.0 });
        m.put("radial_variation", self.radial_variation);
        m.put("smooth_ratio", self.smooth_ratio);
        m.put("corners", self.corners.len() as f64);
        m.put("sharpest_corner", self.sharpest_corner);
        m.put("right_angles", self.right_angles as f64);
        m.put("parallel_pairs", self.parallel_pairs as f64);
        m.put("symmetry", self.symmetry);
        if let Some((area, angle_sum)) = self.triangle {
            m.put("triangle_area", area);
            m.put("angle_sum", angle_sum);
        }
    }
}

fn line_rule(f: &Features, t: &ClassifierThresholds) -> Option<f64> {
    let longer = f.bbox.max_dimension();
    let matches = f.bbox.elongation() > t.line_min_elongation
        && f.path_length > t.line_min_length_ratio * longer;
    matches.then_some(t.line_confidence)
}

fn circle_rule(f: &Features, t: &ClassifierThresholds) -> Option<f64> {
    let aspect = f.bbox.aspect_ratio();
    let matches = f.radial_variation < t.circle_max_variation
        && f.smooth_ratio > t.circle_min_smooth_ratio
        && aspect > t.circle_min_aspect
        && f.sharpest_corner <= t.circle_max_corner_turn;
    matches.then(|| {
        let roundness = 1.0 - f.radial_variation / t.circle_max_variation;
        (0.6 * roundness + 0.4 * aspect).min(0.95)
    })
}

fn square_rule(f: &Features, t: &ClassifierThresholds) -> Option<f64> {
    let aspect = f.bbox.aspect_ratio();
    let corners = f.corners.len();
    let matches = (t.square_min_corners..=t.square_max_corners).contains(&corners)
        && (f.right_angles >= 1 || f.parallel_pairs >= 1)
        && aspect > t.square_min_aspect;
    matches.then(|| (0.4 + 0.1 * f.right_angles.min(4) as f64 + 0.2 * aspect).min(0.9))
}

fn triangle_rule(f: &Features, t: &ClassifierThresholds) -> Option<f64> {
    let (area, angle_sum) = f.triangle?;
    let deviation = (angle_sum - PI).abs();
    (area > t.triangle_min_area && deviation <= t.triangle_angle_tolerance)
        .then(|| 0.6 + 0.3 * (1.0 - deviation / t.triangle_angle_tolerance))
}

fn star_rule(f: &Features, t: &ClassifierThresholds) -> Option<f64> {
    (f.corners.len() >= t.star_min_corners && f.symmetry > t.star_min_symmetry)
        .then(|| (0.5 + 0.4 * f.symmetry).min(0.9))
}

fn radial_variation(samples: &[Point], center: Point) -> f64 {
    let radii: Vec<f64> = samples.iter().map(|p| distance(*p, center)).collect();
    let mean = radii.iter().sum::<f64>() / radii.len().max(1) as f64;
    if mean <= f64::EPSILON {
        return f64::INFINITY;
    }
    let variance = radii.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / radii.len() as f64;
    variance.sqrt() / mean
}

fn smooth_ratio(samples: &[Point], closed: bool, t: &ClassifierThresholds) -> f64 {
    let n = samples.len();
    if n < 3 {
        return 0.0;
    }
    let indices = if closed { 0..n } else { 1..n - 1 };
    let (mut smooth, mut sharp) = (0usize, 0usize);
    for i in indices {
        let turn = turning_angle(samples[(i + n - 1) % n], samples[i], samples[(i + 1) % n]);
        if turn < t.smooth_turn_angle {
            smooth += 1;
        } else if turn > t.sharp_turn_angle {
            sharp += 1;
        }
    }
    if sharp == 0 {
        smooth as f64
    } else {
        smooth as f64 / sharp as f64
    }
}

/// Counts right-angle and parallel relations between the sides joining corners.
fn side_relations(
    points: &[Point],
    corners: &[Corner],
    closed: bool,
    t: &ClassifierThresholds,
) -> (usize, usize) {
    let mut vertices: Vec<Point> = Vec::with_capacity(corners.len() + 2);
    if !closed {
        vertices.push(points[0]);
    }
    vertices.extend(corners.iter().map(|c| c.point));
    if !closed {
        vertices.push(points[points.len() - 1]);
    }
    if vertices.len() < 3 {
        return (0, 0);
    }

    let mut sides: Vec<(f64, f64)> = vertices
        .windows(2)
        .map(|w| (w[1].x - w[0].x, w[1].y - w[0].y))
        .collect();
    if closed {
        let (first, last) = (vertices[0], vertices[vertices.len() - 1]);
        sides.push((first.x - last.x, first.y - last.y));
    }
    sides.retain(|(dx, dy)| dx * dx + dy * dy > f64::EPSILON);

    let m = sides.len();
    let wrap = |i: usize, step: usize| -> Option<usize> {
        if closed {
            Some((i + step) % m)
        } else {
            (i + step < m).then_some(i + step)
        }
    };

    let mut right_angles = 0;
    let mut parallel_pairs = 0;
    for i in 0..m {
        if let Some(j) = wrap(i, 1).filter(|&j| j != i) {
            if (direction_change(sides[i], sides[j]) - PI / 2.0).abs() <= t.right_angle_tolerance {
                right_angles += 1;
            }
        }
        if let Some(j) = wrap(i, 2).filter(|&j| i < j) {
            let change = direction_change(sides[i], sides[j]);
            if change.min(PI - change) <= t.parallel_tolerance {
                parallel_pairs += 1;
            }
        }
    }
    (right_angles, parallel_pairs)
}

/// Unsigned angle between two direction vectors, in `[0, PI]`.
fn direction_change(u: (f64, f64), v: (f64, f64)) -> f64 {
    let cross = u.0 * v.1 - u.1 * v.0;
    let dot = u.0 * v.0 + u.1 * v.1;
    cross.atan2(dot).abs()
}

/// Area and interior angle sum of the three corners farthest from the centroid.
fn triangle_fit(
    samples: &[Point],
    corners: &[Corner],
    center: Point,
    reach: usize,
    closed: bool,
) -> Option<(f64, f64)> {
    if corners.len() < 3 {
        return None;
    }
    let mut prominent: Vec<&Corner> = corners.iter().collect();
    prominent.sort_by(|a, b| {
        distance(b.point, center)
            .total_cmp(&distance(a.point, center))
            .then(a.index.cmp(&b.index))
    });
    prominent.truncate(3);

    let vertices: Vec<Point> = prominent.iter().map(|c| c.point).collect();
    let area = polygon_area(&vertices);
    let angle_sum = prominent
        .iter()
        .map(|c| corners::interior_angle(samples, c.index, reach, closed))
        .sum();
    Some((area, angle_sum))
}

/// Evenness of point counts across angular sectors around the centroid, in `(0, 1]`.
fn sector_symmetry(samples: &[Point], center: Point) -> f64 {
    let mut counts = [0usize; SECTORS];
    let width = 2.0 * PI / SECTORS as f64;
    for p in samples {
        let angle = (p.y - center.y).atan2(p.x - center.x) + PI;
        let sector = ((angle / width) as usize).min(SECTORS - 1);
        counts[sector] += 1;
    }
    let mean = samples.len() as f64 / SECTORS as f64;
    if mean <= 0.0 {
        return 0.0;
    }
    let variance = counts
        .iter()
        .map(|&c| (c as f64 - mean).powi(2))
        .sum::<f64>()
        / SECTORS as f64;
    1.0 / (1.0 + variance.sqrt() / mean)
}
