//! Geometric primitives over ordered point slices.
//!
//! Every function here is pure. Degenerate input (empty slices, single
//! points, zero-length paths) has a defined result instead of an error, so
//! the classifier and scorers can call these without pre-validating.

use crate::data::{BoundingBox, Point};

const EPSILON: f64 = 1e-9;

/// Euclidean distance between two points.
pub fn distance(a: Point, b: Point) -> f64 {
    a.distance_to(&b)
}

/// Arithmetic mean of the points; `(0, 0)` for an empty slice.
pub fn centroid(points: &[Point]) -> Point {
    if points.is_empty() {
        return Point::default();
    }
    let n = points.len() as f64;
    let (sx, sy) = points
        .iter()
        .fold((0.0, 0.0), |(sx, sy), p| (sx + p.x, sy + p.y));
    Point::new(sx / n, sy / n)
}

/// Absolute polygon area by the shoelace formula; `0.0` below three points.
pub fn polygon_area(points: &[Point]) -> f64 {
    if points.len() < 3 {
        return 0.0;
    }
    let mut twice_area = 0.0;
    for i in 0..points.len() {
        let a = points[i];
        let b = points[(i + 1) % points.len()];
        twice_area += a.x * b.y - b.x * a.y;
    }
    (twice_area / 2.0).abs()
}

/// Sum of consecutive segment lengths; `0.0` below two points.
pub fn path_length(points: &[Point]) -> f64 {
    points.windows(2).map(|w| distance(w[0], w[1])).sum()
}

/// Single-pass min/max bounds. An empty slice yields the zero box.
pub fn bounding_box(points: &[Point]) -> BoundingBox {
    if points.is_empty() {
        return BoundingBox::default();
    }
    let mut min_x = f64::INFINITY;
    let mut max_x = f64::NEG_INFINITY;
    let mut min_y = f64::INFINITY;
    let mut max_y = f64::NEG_INFINITY;
    for p in points {
        min_x = min_x.min(p.x);
        max_x = max_x.max(p.x);
        min_y = min_y.min(p.y);
        max_y = max_y.max(p.y);
    }
    BoundingBox::from_extents(min_x, max_x, min_y, max_y)
}

/// Distance from `p` to the segment `a`-`b`, with the projection clamped to the segment.
pub fn point_to_segment_distance(p: Point, a: Point, b: Point) -> f64 {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let len_sq = dx * dx + dy * dy;
    if len_sq <= EPSILON {
        return distance(p, a);
    }
    let t = (((p.x - a.x) * dx + (p.y - a.y) * dy) / len_sq).clamp(0.0, 1.0);
    distance(p, Point::new(a.x + t * dx, a.y + t * dy))
}

/// Minimum distance from `p` to any segment of `path`.
///
/// A single-point path measures to that point. An empty path is infinitely
/// far away, which callers treat as "nothing within tolerance".
pub fn point_to_polyline_distance(p: Point, path: &[Point]) -> f64 {
    match path {
        [] => f64::INFINITY,
        [only] => distance(p, *only),
        _ => path
            .windows(2)
            .map(|w| point_to_segment_distance(p, w[0], w[1]))
            .fold(f64::INFINITY, f64::min),
    }
}

/// Resamples `path` to exactly `n` points spaced equally along its arc length.
///
/// The first and last points are preserved. A single-point or zero-length
/// path yields `n` copies of its first point; an empty path yields nothing.
pub fn resample(path: &[Point], n: usize) -> Vec<Point> {
    if path.is_empty() || n == 0 {
        return Vec::new();
    }
    if n == 1 {
        return vec![path[0]];
    }

    let total = path_length(path);
    if total <= EPSILON {
        return vec![path[0]; n];
    }

    let interval = total / (n - 1) as f64;
    let mut resampled = Vec::with_capacity(n);
    resampled.push(path[0]);

    let mut walked = 0.0;
    let mut segment = 1;
    for k in 1..n - 1 {
        let target = k as f64 * interval;
        while segment < path.len() {
            let seg_len = distance(path[segment - 1], path[segment]);
            if walked + seg_len >= target && seg_len > EPSILON {
                let t = (target - walked) / seg_len;
                let a = path[segment - 1];
                let b = path[segment];
                resampled.push(Point::new(a.x + t * (b.x - a.x), a.y + t * (b.y - a.y)));
                break;
            }
            walked += seg_len;
            segment += 1;
        }
        if segment >= path.len() {
            resampled.push(path[path.len() - 1]);
        }
    }

    resampled.push(path[path.len() - 1]);
    resampled
}

/// Resamples `path` as a closed loop to `n` points, the closing segment included.
///
/// The returned points start at `path[0]` and do not repeat it at the end.
pub fn resample_closed(path: &[Point], n: usize) -> Vec<Point> {
    if path.is_empty() || n == 0 {
        return Vec::new();
    }
    let mut loop_path = path.to_vec();
    if distance(path[0], path[path.len() - 1]) > EPSILON {
        loop_path.push(path[0]);
    }
    let mut resampled = resample(&loop_path, n + 1);
    resampled.truncate(n);
    resampled
}

/// Centers `path` on its centroid and scales it to unit RMS radius.
///
/// A path with no spread is returned centered but unscaled.
pub fn normalize(path: &[Point]) -> Vec<Point> {
    let c = centroid(path);
    let centered: Vec<Point> = path
        .iter()
        .map(|p| Point::new(p.x - c.x, p.y - c.y))
        .collect();
    if centered.is_empty() {
        return centered;
    }
    let mean_sq =
        centered.iter().map(|p| p.x * p.x + p.y * p.y).sum::<f64>() / centered.len() as f64;
    let rms = mean_sq.sqrt();
    if rms <= EPSILON {
        return centered;
    }
    centered
        .into_iter()
        .map(|p| Point::new(p.x / rms, p.y / rms))
        .collect()
}

/// Three-point moving average, applied `passes` times.
///
/// Closed paths wrap around; open paths keep both end points fixed. Paths
/// shorter than three points are returned unchanged.
pub fn smooth(path: &[Point], passes: usize, closed: bool) -> Vec<Point> {
    let n = path.len();
    let mut current = path.to_vec();
    if n < 3 {
        return current;
    }
    for _ in 0..passes {
        current = (0..n)
            .map(|i| {
                let (prev, next) = if closed {
                    ((i + n - 1) % n, (i + 1) % n)
                } else if i == 0 || i == n - 1 {
                    return current[i];
                } else {
                    (i - 1, i + 1)
                };
                let (a, b, c) = (current[prev], current[i], current[next]);
                Point::new((a.x + b.x + c.x) / 3.0, (a.y + b.y + c.y) / 3.0)
            })
            .collect();
    }
    current
}

/// Unsigned change of heading at `b` when travelling `a -> b -> c`, in `[0, PI]`.
///
/// Returns `0.0` when either leg has zero length.
pub fn turning_angle(a: Point, b: Point, c: Point) -> f64 {
    let (ux, uy) = (b.x - a.x, b.y - a.y);
    let (vx, vy) = (c.x - b.x, c.y - b.y);
    if ux * ux + uy * uy <= EPSILON || vx * vx + vy * vy <= EPSILON {
        return 0.0;
    }
    let cross = ux * vy - uy * vx;
    let dot = ux * vx + uy * vy;
    cross.atan2(dot).abs()
}

/// True when the path ends within `ratio` of its larger bounding-box side from its start.
pub fn is_closed(points: &[Point], ratio: f64) -> bool {
    if points.len() < 3 {
        return false;
    }
    let extent = bounding_box(points).max_dimension();
    if extent <= EPSILON {
        return false;
    }
    distance(points[0], points[points.len() - 1]) <= ratio * extent
}

/// Picks at most `max` points spread evenly over `points`, keeping both ends.
pub fn subsample(points: &[Point], max: usize) -> Vec<Point> {
    if max == 0 {
        return Vec::new();
    }
    if points.len() <= max {
        return points.to_vec();
    }
    if max == 1 {
        return vec![points[0]];
    }
    let last = (points.len() - 1) as f64;
    (0..max)
        .map(|i| {
            let index = (i as f64 * last / (max - 1) as f64).round() as usize;
            points[index.min(points.len() - 1)]
        })
        .collect()
}
