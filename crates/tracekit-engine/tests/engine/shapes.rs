use tracekit_core::{bounding_box, centroid, distance, Point};
use tracekit_engine::shapes;

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

#[test]
fn test_circle_is_closed_and_round() {
    let c = Point::new(10.0, -5.0);
    let points = shapes::circle(c, 50.0, 73);
    assert_eq!(points.len(), 73);
    assert!(approx(distance(points[0], points[72]), 0.0));
    assert!(points.iter().all(|p| approx(distance(*p, c), 50.0)));
}

#[test]
fn test_square_dimensions() {
    let points = shapes::square(Point::new(0.0, 0.0), 100.0, 10);
    assert_eq!(points.len(), 41);
    let bbox = bounding_box(&points);
    assert!(approx(bbox.width, 100.0));
    assert!(approx(bbox.height, 100.0));
    assert_eq!(points[0], points[40]);
}

#[test]
fn test_triangle_points_up() {
    let points = shapes::triangle(Point::new(0.0, 0.0), 100.0, 5);
    assert_eq!(points.len(), 16);
    assert!(approx(points[0].x, 0.0));
    assert!(approx(points[0].y, -100.0));
}

#[test]
fn test_star_alternates_radii() {
    let c = Point::new(0.0, 0.0);
    let points = shapes::star(c, 100.0, 40.0, 5, 4);
    assert_eq!(points.len(), 41);
    assert!(approx(distance(points[0], c), 100.0));
    assert!(approx(distance(points[4], c), 40.0));
    assert!(approx(distance(points[8], c), 100.0));
}

#[test]
fn test_line() {
    let points = shapes::line(Point::new(0.0, 0.0), Point::new(10.0, 20.0), 11);
    assert_eq!(points.len(), 11);
    assert_eq!(points[10], Point::new(10.0, 20.0));
    assert!(approx(points[5].x, 5.0));
}

#[test]
fn test_transforms() {
    let square = shapes::square(Point::new(50.0, 50.0), 20.0, 4);

    let moved = shapes::translate(&square, 5.0, -5.0);
    assert_eq!(moved[0], square[0].translated(5.0, -5.0));

    let scaled = shapes::scale_about_centroid(&square, 2.0);
    assert!(approx(bounding_box(&scaled).width, 40.0));
    let (a, b) = (centroid(&square), centroid(&scaled));
    assert!(approx(a.x, b.x) && approx(a.y, b.y));

    let back = shapes::reversed(&square);
    assert_eq!(back[0], square[square.len() - 1]);
}

#[test]
fn test_rotate_start_keeps_stroke_closed() {
    let square = shapes::square(Point::new(0.0, 0.0), 100.0, 5);
    let rotated = shapes::rotate_start(&square, 3);
    assert_eq!(rotated.len(), square.len());
    assert_eq!(rotated[0], square[3]);
    assert_eq!(rotated[0], rotated[rotated.len() - 1]);

    assert_eq!(shapes::rotate_start(&square, square.len() - 1), square);
}

#[test]
fn test_perturb_radii() {
    let c = Point::new(0.0, 0.0);
    let circle = shapes::circle(c, 100.0, 101);
    let unchanged = shapes::perturb_radii(&circle, 0.0, 5);
    assert!(unchanged.iter().zip(&circle).all(|(a, b)| distance(*a, *b) < 1e-9));

    let wobbly = shapes::perturb_radii(&circle, 0.2, 5);
    let radii: Vec<f64> = wobbly.iter().map(|p| distance(*p, centroid(&circle))).collect();
    let max = radii.iter().cloned().fold(f64::MIN, f64::max);
    let min = radii.iter().cloned().fold(f64::MAX, f64::min);
    assert!(max > 115.0 && max <= 120.0 + 1e-9);
    assert!(min < 85.0 && min >= 80.0 - 1e-9);
}

#[test]
fn test_jitter_is_bounded_and_repeatable() {
    let circle = shapes::circle(Point::new(0.0, 0.0), 100.0, 150);
    let shaky = shapes::jitter(&circle, 2.0, 7);
    assert_eq!(shaky.len(), circle.len());
    assert_eq!(shaky, shapes::jitter(&circle, 2.0, 7));
    assert_ne!(shaky, shapes::jitter(&circle, 2.0, 8));

    for (moved, original) in shaky.iter().zip(&circle) {
        assert!((moved.x - original.x).abs() <= 2.0);
        assert!((moved.y - original.y).abs() <= 2.0);
    }
    assert!(shaky.iter().zip(&circle).any(|(a, b)| distance(*a, *b) > 1.0));

    let still = shapes::jitter(&circle, 0.0, 7);
    assert_eq!(still, circle);
}
