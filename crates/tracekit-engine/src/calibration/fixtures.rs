//! Built-in labeled cases.

use tracekit_core::Point;

use super::CalibrationCase;
use crate::kind::ShapeKind;
use crate::shapes;

/// A small deterministic set of labeled cases built from the reference shapes.
///
/// Exact copies should score near 100, a slightly enlarged and shifted circle
/// around 75, and shape swaps, undersized copies and too-short strokes near 0.
pub fn default_cases() -> Vec<CalibrationCase> {
    let center = Point::new(200.0, 200.0);
    let circle = shapes::circle(center, 100.0, 100);
    let square = shapes::square(center, 200.0, 10);
    let triangle = shapes::triangle(center, 110.0, 12);
    let star = shapes::star(center, 100.0, 40.0, 5, 8);
    let line = shapes::line(Point::new(50.0, 200.0), Point::new(350.0, 200.0), 40);

    let enlarged =
        shapes::translate(&shapes::scale_about_centroid(&circle, 1.1), 15.0, -10.0);
    let undersized = shapes::scale_about_centroid(&circle, 0.2);
    let tap = vec![
        Point::new(180.0, 200.0),
        Point::new(200.0, 180.0),
        Point::new(220.0, 200.0),
    ];

    vec![
        CalibrationCase::new(
            "circle copied exactly",
            circle.clone(),
            circle.clone(),
            ShapeKind::Circle,
            100.0,
        ),
        CalibrationCase::new(
            "square copied exactly",
            square.clone(),
            square.clone(),
            ShapeKind::Square,
            100.0,
        ),
        CalibrationCase::new(
            "triangle copied exactly",
            triangle.clone(),
            triangle.clone(),
            ShapeKind::Triangle,
            100.0,
        ),
        CalibrationCase::new("star copied exactly", star.clone(), star, ShapeKind::Star, 100.0),
        CalibrationCase::new("line copied exactly", line.clone(), line, ShapeKind::Line, 100.0),
        CalibrationCase::new(
            "circle enlarged and shifted",
            enlarged,
            circle.clone(),
            ShapeKind::Circle,
            75.0,
        ),
        CalibrationCase::new(
            "square drawn for a triangle",
            square.clone(),
            triangle,
            ShapeKind::Triangle,
            5.0,
        )
        .drawn_as(ShapeKind::Square),
        CalibrationCase::new(
            "circle drawn for a square",
            circle.clone(),
            square,
            ShapeKind::Square,
            15.0,
        )
        .drawn_as(ShapeKind::Circle),
        CalibrationCase::new(
            "circle drawn far too small",
            undersized,
            circle.clone(),
            ShapeKind::Circle,
            5.0,
        ),
        CalibrationCase::new("three-point tap", tap, circle, ShapeKind::Circle, 0.0)
            .drawn_as(ShapeKind::Other),
    ]
}
