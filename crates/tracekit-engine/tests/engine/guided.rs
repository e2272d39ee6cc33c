use tracekit_core::{Point, TraceLog};
use tracekit_engine::{
    guided_trace_score, guided_trace_score_traced, shapes, EvaluationResult, GuidedTraceScorer,
    ShapeKind, TrajectoryScorer,
};
use tracekit_settings::Thresholds;

fn model() -> Vec<Point> {
    shapes::line(Point::new(0.0, 0.0), Point::new(400.0, 0.0), 50)
}

fn trace(user: &[Point]) -> EvaluationResult {
    guided_trace_score(user, &model(), ShapeKind::Line, true, &Thresholds::default())
}

#[test]
fn test_perfect_trace() {
    let result = trace(&model());
    assert!((result.score - 100.0).abs() < 1e-9);
    assert_eq!(result.detail("fraction_outside"), Some(0.0));
    assert_eq!(result.detail("shape_match"), Some(1.0));
}

#[test]
fn test_trace_outside_lane_collapses() {
    let outside = shapes::line(Point::new(0.0, 40.0), Point::new(400.0, 40.0), 50);
    let result = trace(&outside);

    // Sub-scores stay high; the lane penalty alone zeroes the score
    assert_eq!(result.detail("superposition"), Some(100.0));
    assert!(result.detail("continuity").unwrap() > 99.0);
    assert!(result.detail("direction").unwrap() > 99.0);
    assert_eq!(result.detail("fraction_outside"), Some(1.0));
    assert!(result.score < 1e-9);
}

#[test]
fn test_lane_penalty_can_be_disabled() {
    let outside = shapes::line(Point::new(0.0, 40.0), Point::new(400.0, 40.0), 50);
    let scorer = GuidedTraceScorer::new(false);
    let result = scorer.evaluate(&outside, &model(), ShapeKind::Line, &Thresholds::default());
    assert!(result.score > 99.0);
    assert_eq!(result.detail("lane_factor"), Some(1.0));
}

#[test]
fn test_partial_excursion() {
    let mut user = shapes::line(Point::new(0.0, 0.0), Point::new(200.0, 0.0), 25);
    user.extend(shapes::line(Point::new(200.0, 40.0), Point::new(400.0, 40.0), 25));
    let result = trace(&user);

    let expected_factor = 1.0 - 0.5f64.powf(0.75);
    assert_eq!(result.detail("fraction_outside"), Some(0.5));
    assert!((result.detail("lane_factor").unwrap() - expected_factor).abs() < 1e-9);
    assert!(result.score > 30.0 && result.score < 50.0, "{}", result.score);
}

#[test]
fn test_wrong_direction_loses_direction_share() {
    let backwards = shapes::reversed(&model());
    let result = trace(&backwards);
    assert_eq!(result.detail("direction"), Some(0.0));
    assert!((result.score - 85.0).abs() < 1e-6);
}

#[test]
fn test_jitter_lowers_continuity() {
    let wobbly: Vec<Point> = (0..=50)
        .map(|i| Point::new(i as f64 * 8.0, 10.0 * (i as f64).sin()))
        .collect();
    let result = trace(&wobbly);
    let continuity = result.detail("continuity").unwrap();
    assert!(continuity < 90.0 && continuity > 70.0, "{}", continuity);
    assert!(result.score < 100.0);
}

#[test]
fn test_short_trace_covers_less() {
    let short = shapes::line(Point::new(0.0, 0.0), Point::new(100.0, 0.0), 20);
    let result = trace(&short);
    assert!((result.coverage - 40.0).abs() < 1e-9);
    assert!((result.score - 64.0).abs() < 1e-6);
}

#[test]
fn test_insufficient_input() {
    let single = vec![Point::new(0.0, 0.0)];
    assert_eq!(trace(&single).score, 0.0);
    let no_model = guided_trace_score(&model(), &[], ShapeKind::Line, true, &Thresholds::default());
    assert_eq!(no_model.score, 0.0);
}

#[test]
fn test_minimum_points_is_configurable() {
    let stub = shapes::line(Point::new(0.0, 0.0), Point::new(400.0, 0.0), 4);
    assert!(trace(&stub).score > 90.0);

    let mut thresholds = Thresholds::default();
    thresholds.guided.min_user_points = 5;
    let result = guided_trace_score(&stub, &model(), ShapeKind::Line, true, &thresholds);
    assert_eq!(result.score, 0.0);
    assert!(result.is_insufficient());
}

#[test]
fn test_traced_guided() {
    let mut log = TraceLog::new();
    let result = guided_trace_score_traced(
        &model(),
        &model(),
        ShapeKind::Line,
        true,
        &Thresholds::default(),
        &mut log,
    );
    assert_eq!(log.get("guided", "score"), Some(result.score));
    assert_eq!(log.get("guided", "lane_factor"), Some(1.0));
    assert_eq!(GuidedTraceScorer::default(), GuidedTraceScorer::new(true));
}
