//! Reference stroke generators and stroke transforms.
//!
//! Builds canonical strokes (circle, regular polygons, star, line) as dense
//! point sequences the way a shape library would hand them to the scorers, plus
//! the transforms used to derive user-like variants from them. Closed shapes
//! repeat their first point at the end.

use std::f64::consts::PI;

use tracekit_core::{centroid, Point};

/// A circle traced counter-clockwise from angle zero, `points` points long.
pub fn circle(center: Point, radius: f64, points: usize) -> Vec<Point> {
    debug_assert!(points >= 2, "a circle needs at least two points, got {points}");
    let steps = points.max(2) - 1;
    (0..=steps)
        .map(|i| {
            let angle = 2.0 * PI * i as f64 / steps as f64;
            Point::new(center.x + radius * angle.cos(), center.y + radius * angle.sin())
        })
        .collect()
}

/// A closed regular polygon with `points_per_side` samples on every side.
///
/// The first vertex sits straight above the center (negative y) before
/// `rotation`, which is in degrees.
pub fn regular_polygon(
    center: Point,
    radius: f64,
    sides: usize,
    points_per_side: usize,
    rotation: f64,
) -> Vec<Point> {
    let sides = sides.max(3);
    let vertices: Vec<Point> = (0..sides)
        .map(|k| {
            let theta = rotation.to_radians() - PI / 2.0 + 2.0 * PI * k as f64 / sides as f64;
            Point::new(center.x + radius * theta.cos(), center.y + radius * theta.sin())
        })
        .collect();
    polyline_through(&vertices, points_per_side)
}

/// An axis-aligned square with sides of length `side`.
pub fn square(center: Point, side: f64, points_per_side: usize) -> Vec<Point> {
    regular_polygon(center, side / 2.0_f64.sqrt(), 4, points_per_side, 45.0)
}

/// An upright equilateral triangle inscribed in a circle of `radius`.
pub fn triangle(center: Point, radius: f64, points_per_side: usize) -> Vec<Point> {
    regular_polygon(center, radius, 3, points_per_side, 0.0)
}

/// A closed star with `tips` outer points alternating with inner vertices.
pub fn star(
    center: Point,
    outer: f64,
    inner: f64,
    tips: usize,
    points_per_edge: usize,
) -> Vec<Point> {
    let tips = tips.max(3);
    let vertices: Vec<Point> = (0..2 * tips)
        .map(|k| {
            let theta = -PI / 2.0 + PI * k as f64 / tips as f64;
            let r = if k % 2 == 0 { outer } else { inner };
            Point::new(center.x + r * theta.cos(), center.y + r * theta.sin())
        })
        .collect();
    polyline_through(&vertices, points_per_edge)
}

/// A straight stroke of `points` evenly spaced points from `from` to `to`.
pub fn line(from: Point, to: Point, points: usize) -> Vec<Point> {
    let steps = points.max(2) - 1;
    (0..=steps)
        .map(|i| {
            let t = i as f64 / steps as f64;
            Point::new(from.x + t * (to.x - from.x), from.y + t * (to.y - from.y))
        })
        .collect()
}

/// Shifts every point by `(dx, dy)`.
pub fn translate(points: &[Point], dx: f64, dy: f64) -> Vec<Point> {
    points.iter().map(|p| p.translated(dx, dy)).collect()
}

/// Scales the stroke by `factor` about its centroid.
pub fn scale_about_centroid(points: &[Point], factor: f64) -> Vec<Point> {
    let c = centroid(points);
    points
        .iter()
        .map(|p| Point::new(c.x + (p.x - c.x) * factor, c.y + (p.y - c.y) * factor))
        .collect()
}

/// Reverses drawing direction.
pub fn reversed(points: &[Point]) -> Vec<Point> {
    points.iter().rev().copied().collect()
}

/// Starts a closed stroke `shift` points later, keeping it closed.
///
/// A stroke whose last point repeats its first is rotated over the distinct
/// points and re-closed; any other stroke is rotated as is.
pub fn rotate_start(points: &[Point], shift: usize) -> Vec<Point> {
    let repeats = points.len() > 1 && points[0] == points[points.len() - 1];
    let ring = if repeats {
        &points[..points.len() - 1]
    } else {
        points
    };
    if ring.is_empty() {
        return points.to_vec();
    }
    let shift = shift % ring.len();
    let mut rotated: Vec<Point> = ring[shift..].iter().chain(&ring[..shift]).copied().collect();
    if repeats {
        rotated.push(rotated[0]);
    }
    rotated
}

/// Wobbles each point's distance from the centroid by `amplitude * sin(lobes * angle)`.
pub fn perturb_radii(points: &[Point], amplitude: f64, lobes: u32) -> Vec<Point> {
    let c = centroid(points);
    points
        .iter()
        .map(|p| {
            let (dx, dy) = (p.x - c.x, p.y - c.y);
            let angle = dy.atan2(dx);
            let factor = 1.0 + amplitude * (lobes as f64 * angle).sin();
            Point::new(c.x + dx * factor, c.y + dy * factor)
        })
        .collect()
}

/// Displaces every point by up to `amplitude` pixels on each axis.
///
/// The offsets come from a xorshift generator seeded with `seed`, so the same
/// seed always yields the same hand-drawn-looking stroke.
pub fn jitter(points: &[Point], amplitude: f64, seed: u64) -> Vec<Point> {
    let mut state = seed.wrapping_mul(0x9E37_79B9_7F4A_7C15).wrapping_add(1);
    if state == 0 {
        state = 1;
    }
    let mut unit = move || {
        state ^= state << 13;
        state ^= state >> 7;
        state ^= state << 17;
        // 53 random bits mapped to [-1, 1)
        (state >> 11) as f64 / (1u64 << 53) as f64 * 2.0 - 1.0
    };
    points
        .iter()
        .map(|p| {
            let dx = amplitude * unit();
            let dy = amplitude * unit();
            p.translated(dx, dy)
        })
        .collect()
}

/// Samples the closed outline through `vertices`, `per_edge` points per edge.
fn polyline_through(vertices: &[Point], per_edge: usize) -> Vec<Point> {
    let per_edge = per_edge.max(1);
    let mut points = Vec::with_capacity(vertices.len() * per_edge + 1);
    for (k, &a) in vertices.iter().enumerate() {
        let b = vertices[(k + 1) % vertices.len()];
        for i in 0..per_edge {
            let t = i as f64 / per_edge as f64;
            points.push(Point::new(a.x + t * (b.x - a.x), a.y + t * (b.y - a.y)));
        }
    }
    points.push(vertices[0]);
    points
}
