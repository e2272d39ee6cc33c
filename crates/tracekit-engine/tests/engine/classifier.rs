use proptest::prelude::*;
use tracekit_core::{Point, TraceLog};
use tracekit_engine::{classify, classify_traced, shapes, ClassificationReason, ShapeKind};
use tracekit_settings::Thresholds;

fn center() -> Point {
    Point::new(200.0, 200.0)
}

#[test]
fn test_circle_classifies_as_circle() {
    let result = classify(&shapes::circle(center(), 100.0, 100), &Thresholds::default());
    assert_eq!(result.kind, ShapeKind::Circle);
    assert!(result.confidence > 0.8, "confidence {}", result.confidence);
    assert!(result.reason.is_none());
}

#[test]
fn test_square_classifies_as_square() {
    let result = classify(&shapes::square(center(), 200.0, 10), &Thresholds::default());
    assert_eq!(result.kind, ShapeKind::Square);
    assert!(result.confidence > 0.6, "confidence {}", result.confidence);
    assert_eq!(result.measurement("corners"), Some(4.0));
}

#[test]
fn test_triangle_classifies_as_triangle() {
    let result = classify(&shapes::triangle(center(), 110.0, 12), &Thresholds::default());
    assert_eq!(result.kind, ShapeKind::Triangle);
    assert!(result.confidence > 0.6, "confidence {}", result.confidence);
    assert_eq!(result.measurement("corners"), Some(3.0));
}

#[test]
fn test_star_classifies_as_star() {
    let result = classify(&shapes::star(center(), 100.0, 40.0, 5, 8), &Thresholds::default());
    assert_eq!(result.kind, ShapeKind::Star);
    assert!(result.confidence > 0.5);
}

#[test]
fn test_horizontal_line_classifies_as_line() {
    let stroke = shapes::line(Point::new(0.0, 0.0), Point::new(300.0, 0.0), 30);
    let result = classify(&stroke, &Thresholds::default());
    assert_eq!(result.kind, ShapeKind::Line);
    assert_eq!(result.confidence, 0.9);
}

#[test]
fn test_classification_ignores_size_position_start_and_direction() {
    let thresholds = Thresholds::default();
    for size in [30.0, 60.0, 100.0, 150.0, 300.0] {
        for origin in [Point::new(0.0, 0.0), Point::new(500.0, 250.0)] {
            let cases = [
                (shapes::circle(origin, size, 120), ShapeKind::Circle),
                (shapes::square(origin, size * 2.0, 12), ShapeKind::Square),
                (shapes::triangle(origin, size, 12), ShapeKind::Triangle),
                (shapes::star(origin, size, size * 0.4, 5, 6), ShapeKind::Star),
            ];
            for (stroke, kind) in cases {
                for variant in [
                    stroke.clone(),
                    shapes::reversed(&stroke),
                    shapes::rotate_start(&stroke, 7),
                ] {
                    let result = classify(&variant, &thresholds);
                    assert_eq!(result.kind, kind, "size {} at {:?}", size, origin);
                }
            }
        }
    }
}

#[test]
fn test_rotated_polygons() {
    let thresholds = Thresholds::default();
    let diamond = shapes::regular_polygon(center(), 100.0, 4, 10, 0.0);
    assert_eq!(classify(&diamond, &thresholds).kind, ShapeKind::Square);

    let inverted = shapes::regular_polygon(center(), 100.0, 3, 10, 180.0);
    assert_eq!(classify(&inverted, &thresholds).kind, ShapeKind::Triangle);
}

#[test]
fn test_hand_tremor_keeps_the_kind() {
    let thresholds = Thresholds::default();
    let cases = [
        (shapes::circle(center(), 100.0, 150), ShapeKind::Circle),
        (shapes::square(center(), 200.0, 38), ShapeKind::Square),
        (shapes::triangle(center(), 110.0, 50), ShapeKind::Triangle),
        (shapes::star(center(), 100.0, 40.0, 5, 15), ShapeKind::Star),
        (shapes::circle(center(), 60.0, 100), ShapeKind::Circle),
        (shapes::square(center(), 120.0, 20), ShapeKind::Square),
    ];
    for (stroke, kind) in cases {
        for amplitude in [1.0, 2.0, 3.0] {
            for seed in 1..=5 {
                let shaky = shapes::jitter(&stroke, amplitude, seed);
                let result = classify(&shaky, &thresholds);
                assert_eq!(
                    result.kind, kind,
                    "{} with {} px tremor, seed {}: {:?}",
                    kind, amplitude, seed, result.measurements
                );
                assert!(result.confidence > 0.6, "confidence {}", result.confidence);
            }
        }
    }
}

#[test]
fn test_sharp_corners_rule_out_a_circle() {
    let thresholds = Thresholds::default();
    let circle = classify(&shapes::circle(center(), 100.0, 100), &thresholds);
    assert_eq!(circle.measurement("sharpest_corner"), Some(0.0));

    let square = shapes::square(center(), 200.0, 10);
    let result = classify(&square, &thresholds);
    let sharpest = result.measurement("sharpest_corner").unwrap();
    assert!(sharpest > thresholds.classifier.circle_max_corner_turn, "{}", sharpest);

    // Without the sharpness gate the square's low radial variation reads as round
    let mut lenient = Thresholds::default();
    lenient.classifier.circle_max_corner_turn = std::f64::consts::PI;
    assert_eq!(classify(&square, &lenient).kind, ShapeKind::Circle);
}

#[test]
fn test_too_few_points() {
    let stroke: Vec<Point> = (0..7).map(|i| Point::new(i as f64, 0.0)).collect();
    let result = classify(&stroke, &Thresholds::default());
    assert_eq!(result.kind, ShapeKind::Other);
    assert_eq!(result.confidence, 0.0);
    assert_eq!(result.reason, Some(ClassificationReason::InsufficientPoints));
}

#[test]
fn test_coincident_points() {
    let stroke = vec![Point::new(1.0, 1.0); 10];
    let result = classify(&stroke, &Thresholds::default());
    assert_eq!(result.kind, ShapeKind::Other);
    assert_eq!(result.confidence, 0.0);
    assert_eq!(result.reason, Some(ClassificationReason::DegenerateExtent));
}

#[test]
fn test_unmatched_stroke_falls_back_to_other() {
    // A diagonal line: too square a bounding box for the line rule, no corners
    let stroke = shapes::line(Point::new(0.0, 0.0), Point::new(300.0, 200.0), 30);
    let result = classify(&stroke, &Thresholds::default());
    assert_eq!(result.kind, ShapeKind::Other);
    assert_eq!(result.confidence, Thresholds::default().classifier.other_confidence);
    assert!(result.measurement("radial_variation").is_some());
}

#[test]
fn test_thresholds_move_the_decision() {
    let stroke = shapes::line(Point::new(0.0, 0.0), Point::new(300.0, 200.0), 30);
    let mut thresholds = Thresholds::default();
    thresholds.classifier.line_min_elongation = 1.2;
    assert_eq!(classify(&stroke, &thresholds).kind, ShapeKind::Line);
}

#[test]
fn test_traced_classification_records_measurements() {
    let mut log = TraceLog::new();
    let stroke = shapes::square(center(), 200.0, 10);
    let traced = classify_traced(&stroke, &Thresholds::default(), &mut log);
    assert_eq!(traced, classify(&stroke, &Thresholds::default()));
    assert_eq!(log.get("classifier", "corners"), Some(4.0));
    assert_eq!(log.get("classifier", "confidence"), Some(traced.confidence));
    assert!(log.stage("classifier").count() >= 10);
}

#[test]
fn test_classification_is_deterministic() {
    let thresholds = Thresholds::default();
    let stroke = shapes::perturb_radii(&shapes::circle(center(), 80.0, 90), 0.12, 3);
    assert_eq!(classify(&stroke, &thresholds), classify(&stroke, &thresholds));
}

#[test]
fn test_shape_kind_names() {
    for kind in ShapeKind::ALL {
        assert_eq!(kind.to_string().parse::<ShapeKind>(), Ok(kind));
    }
    assert_eq!("Estrella".parse::<ShapeKind>(), Ok(ShapeKind::Star));
    assert!("hexagon".parse::<ShapeKind>().is_err());
    assert_eq!(serde_json::to_string(&ShapeKind::Triangle).unwrap(), "\"triangle\"");
}

proptest! {
    #[test]
    fn prop_confidence_is_bounded(
        coords in prop::collection::vec((-500.0f64..500.0, -500.0f64..500.0), 0..80)
    ) {
        let stroke: Vec<Point> = coords.into_iter().map(Point::from).collect();
        let result = classify(&stroke, &Thresholds::default());
        prop_assert!(result.confidence.is_finite());
        prop_assert!((0.0..=1.0).contains(&result.confidence));
    }
}
