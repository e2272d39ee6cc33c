use tracekit_core::Point;
use tracekit_engine::{
    calibrate, calibrate_with, default_cases, shapes, CalibrationCase, CalibrationOptions,
    ShapeKind,
};
use tracekit_settings::Thresholds;

fn center() -> Point {
    Point::new(200.0, 200.0)
}

fn line_for_circle() -> CalibrationCase {
    CalibrationCase::new(
        "line drawn for a circle",
        shapes::line(Point::new(50.0, 200.0), Point::new(350.0, 200.0), 40),
        shapes::circle(center(), 100.0, 100),
        ShapeKind::Circle,
        90.0,
    )
}

#[test]
fn test_default_cases_pass_with_default_thresholds() {
    let thresholds = Thresholds::default();
    let report = calibrate(&default_cases(), &thresholds);

    assert_eq!(report.cases_run, default_cases().len());
    assert_eq!(report.cases_passed_before, report.cases_run);
    assert_eq!(report.accuracy_before, 100.0);
    assert_eq!(report.accuracy_after, 100.0);
    assert!(!report.changed());
    assert_eq!(report.thresholds_after, thresholds);
    assert!(report.outcomes.iter().all(|o| o.kind_matched()));
}

#[test]
fn test_calibration_is_idempotent() {
    let thresholds = Thresholds::default();
    let mut cases = default_cases();
    cases.push(line_for_circle());
    assert_eq!(calibrate(&cases, &thresholds), calibrate(&cases, &thresholds));
}

#[test]
fn test_misclassified_circle_loosens_circle_rules() {
    let thresholds = Thresholds::default();
    let report = calibrate(&[line_for_circle()], &thresholds);

    assert_eq!(report.cases_passed_before, 0);
    let outcome = &report.outcomes[0];
    assert_eq!(outcome.detected_kind, ShapeKind::Line);
    assert!(!outcome.passed);

    let after = &report.thresholds_after;
    assert!((after.classifier.circle_max_variation - 0.25).abs() < 1e-12);
    assert!((after.classifier.circle_min_aspect - 0.55).abs() < 1e-12);
    assert!((after.classifier.line_min_elongation - 4.5).abs() < 1e-12);
    assert!((after.free_copy.base_tolerance_percent - 0.09).abs() < 1e-12);
    assert_eq!(report.applied_adjustments.len(), 4);
    assert_eq!(
        report.applied_adjustments[0],
        "classifier.circle_max_variation: 0.200 -> 0.250"
    );

    // The input is never touched
    assert_eq!(report.thresholds_before, thresholds);
    assert_eq!(thresholds, Thresholds::default());
}

#[test]
fn test_nudges_accumulate_across_cases() {
    let cases = vec![line_for_circle(), line_for_circle()];
    let report = calibrate(&cases, &Thresholds::default());
    assert!((report.thresholds_after.classifier.circle_max_variation - 0.3).abs() < 1e-12);
    assert!((report.thresholds_after.free_copy.base_tolerance_percent - 0.10).abs() < 1e-12);
}

#[test]
fn test_overscored_case_tightens_tolerance_only() {
    let square = shapes::square(center(), 200.0, 10);
    let case = CalibrationCase::new(
        "square marked as poor",
        square.clone(),
        square,
        ShapeKind::Square,
        10.0,
    );
    let report = calibrate(&[case], &Thresholds::default());

    assert_eq!(report.outcomes[0].detected_kind, ShapeKind::Square);
    assert_eq!(report.applied_adjustments.len(), 1);
    assert!((report.thresholds_after.free_copy.base_tolerance_percent - 0.07).abs() < 1e-12);
}

#[test]
fn test_nudges_are_clamped() {
    let mut thresholds = Thresholds::default();
    thresholds.free_copy.base_tolerance_percent = 0.2;
    let report = calibrate(&[line_for_circle()], &thresholds);

    assert_eq!(report.thresholds_after.free_copy.base_tolerance_percent, 0.2);
    assert!(!report
        .applied_adjustments
        .iter()
        .any(|line| line.starts_with("free_copy.base_tolerance_percent")));
}

#[test]
fn test_adjusted_thresholds_stay_valid() {
    let cases = vec![line_for_circle(); 20];
    let report = calibrate(&cases, &Thresholds::default());
    assert!(report.thresholds_after.validate().is_ok());
    assert!((report.thresholds_after.classifier.circle_max_variation - 0.5).abs() < 1e-12);
}

#[test]
fn test_accuracy_is_a_percentage() {
    let circle = shapes::circle(center(), 100.0, 100);
    let exact = CalibrationCase::new(
        "circle copied exactly",
        circle.clone(),
        circle,
        ShapeKind::Circle,
        100.0,
    );
    let report = calibrate(&[exact, line_for_circle()], &Thresholds::default());
    assert_eq!(report.cases_passed_before, 1);
    assert_eq!(report.accuracy_before, 50.0);
    assert_eq!(report.accuracy_after, 50.0);
}

#[test]
fn test_empty_case_list() {
    let report = calibrate(&[], &Thresholds::default());
    assert_eq!(report.cases_run, 0);
    assert_eq!(report.accuracy_before, 0.0);
    assert!(!report.changed());
}

#[test]
fn test_wider_band_passes_more() {
    let model = shapes::circle(center(), 100.0, 100);
    let drifted = shapes::translate(&model, 40.0, 0.0);
    let case = CalibrationCase::new("drifted circle", drifted, model, ShapeKind::Circle, 70.0);

    let strict = calibrate(std::slice::from_ref(&case), &Thresholds::default());
    assert_eq!(strict.cases_passed_before, 0);

    let options = CalibrationOptions {
        pass_band: 40.0,
        ..CalibrationOptions::default()
    };
    let lenient = calibrate_with(&[case], &Thresholds::default(), &options);
    assert_eq!(lenient.cases_passed_before, 1);
    assert!(!lenient.changed());
}

#[test]
fn test_report_serializes() {
    let report = calibrate(&default_cases(), &Thresholds::default());
    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["cases_run"], 10);
    assert!(json["outcomes"].is_array());
}
