use proptest::prelude::*;
use tracekit_core::{Point, TraceLog};
use tracekit_engine::{best_alignment, shapes, similarity, similarity_traced};
use tracekit_settings::Thresholds;

fn center() -> Point {
    Point::new(200.0, 200.0)
}

fn reference_shapes() -> Vec<Vec<Point>> {
    vec![
        shapes::circle(center(), 100.0, 100),
        shapes::square(center(), 200.0, 10),
        shapes::triangle(center(), 110.0, 12),
        shapes::star(center(), 100.0, 40.0, 5, 8),
    ]
}

#[test]
fn test_self_similarity_is_perfect() {
    let thresholds = Thresholds::default();
    for stroke in reference_shapes() {
        assert!((similarity(&stroke, &stroke, &thresholds) - 100.0).abs() < 1e-6);
    }
}

#[test]
fn test_empty_strokes_score_zero() {
    let thresholds = Thresholds::default();
    let circle = shapes::circle(center(), 100.0, 100);
    assert_eq!(similarity(&[], &circle, &thresholds), 0.0);
    assert_eq!(similarity(&circle, &[], &thresholds), 0.0);
    assert!(best_alignment(&circle, &circle, 0).is_none());
}

#[test]
fn test_start_point_changes_little_on_closed_shapes() {
    let thresholds = Thresholds::default();
    for stroke in reference_shapes() {
        for shift in [1, 3, 7, 13, 25] {
            let rotated = shapes::rotate_start(&stroke, shift);
            let score = similarity(&rotated, &stroke, &thresholds);
            assert!(score > 99.0, "shift {} scored {}", shift, score);
        }
    }
}

#[test]
fn test_reversed_stroke_aligns_backwards() {
    let triangle = shapes::triangle(center(), 110.0, 12);
    let alignment = best_alignment(&shapes::reversed(&triangle), &triangle, 60).unwrap();
    assert!(alignment.reversed);
    assert!(alignment.mse < 1e-9);
}

#[test]
fn test_noise_degrades_monotonically() {
    let thresholds = Thresholds::default();
    let model = shapes::circle(center(), 100.0, 100);
    let scores: Vec<f64> = [0.0, 0.05, 0.1, 0.15, 0.2, 0.3]
        .iter()
        .map(|&amplitude| {
            let wobbly = shapes::perturb_radii(&model, amplitude, 5);
            similarity(&wobbly, &model, &thresholds)
        })
        .collect();
    for pair in scores.windows(2) {
        assert!(pair[1] <= pair[0], "scores not monotonic: {:?}", scores);
    }
    assert!(scores[0] > 99.9);
}

#[test]
fn test_rotation_is_not_removed() {
    let thresholds = Thresholds::default();
    let upright = shapes::triangle(center(), 110.0, 12);
    let inverted = shapes::regular_polygon(center(), 110.0, 3, 12, 180.0);
    assert!(similarity(&inverted, &upright, &thresholds) < 99.0);
}

#[test]
fn test_traced_similarity() {
    let mut log = TraceLog::new();
    let square = shapes::square(center(), 200.0, 10);
    let score = similarity_traced(&square, &square, &Thresholds::default(), &mut log);
    assert_eq!(log.get("similarity", "score"), Some(score));
    assert_eq!(log.get("similarity", "reversed"), Some(0.0));
    assert!(log.get("similarity", "mse").unwrap() < 1e-9);
}

fn stroke_strategy() -> impl Strategy<Value = Vec<Point>> {
    prop::collection::vec((-300.0f64..300.0, -300.0f64..300.0), 3..40)
        .prop_map(|coords| coords.into_iter().map(Point::from).collect())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_score_is_bounded(user in stroke_strategy(), model in stroke_strategy()) {
        let score = similarity(&user, &model, &Thresholds::default());
        prop_assert!((0.0..=100.0).contains(&score));
    }

    #[test]
    fn prop_translation_invariance(
        user in stroke_strategy(),
        dx in -1000.0f64..1000.0,
        dy in -1000.0f64..1000.0,
    ) {
        let thresholds = Thresholds::default();
        let model = shapes::circle(Point::new(0.0, 0.0), 100.0, 80);
        let before = similarity(&user, &model, &thresholds);
        let after = similarity(&shapes::translate(&user, dx, dy), &model, &thresholds);
        prop_assert!((before - after).abs() < 1e-6, "{} vs {}", before, after);
    }

    #[test]
    fn prop_scale_invariance(user in stroke_strategy(), k in 0.1f64..10.0) {
        let thresholds = Thresholds::default();
        let model = shapes::square(Point::new(0.0, 0.0), 100.0, 10);
        let before = similarity(&user, &model, &thresholds);
        let after = similarity(&shapes::scale_about_centroid(&user, k), &model, &thresholds);
        prop_assert!((before - after).abs() < 1e-6, "{} vs {}", before, after);
    }

    #[test]
    fn prop_direction_invariance(user in stroke_strategy()) {
        let thresholds = Thresholds::default();
        let model = shapes::star(Point::new(0.0, 0.0), 100.0, 40.0, 5, 6);
        let before = similarity(&user, &model, &thresholds);
        let after = similarity(&shapes::reversed(&user), &model, &thresholds);
        prop_assert!((before - after).abs() < 1e-6, "{} vs {}", before, after);
    }
}
