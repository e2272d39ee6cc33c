use std::ops::Deref;

use serde::{Deserialize, Serialize};

use super::{BoundingBox, Point};
use crate::error::StrokeError;
use crate::geometry;

/// An ordered, non-empty sequence of points from one continuous motion.
///
/// Point order encodes drawing time and direction. Engine entry points accept
/// plain `&[Point]` slices, and a `Stroke` dereferences to one, so callers that
/// want the non-empty guarantee checked up front construct a `Stroke` first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Point>", into = "Vec<Point>")]
pub struct Stroke {
    points: Vec<Point>,
}

impl Stroke {
    /// Creates a stroke, rejecting empty input and non-finite coordinates.
    pub fn new(points: Vec<Point>) -> Result<Self, StrokeError> {
        if points.is_empty() {
            return Err(StrokeError::Empty);
        }
        if let Some(index) = points.iter().position(|p| !p.is_finite()) {
            return Err(StrokeError::NonFinite { index });
        }
        Ok(Self { points })
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn into_points(self) -> Vec<Point> {
        self.points
    }

    pub fn first(&self) -> Point {
        self.points[0]
    }

    pub fn last(&self) -> Point {
        self.points[self.points.len() - 1]
    }

    pub fn bounding_box(&self) -> BoundingBox {
        geometry::bounding_box(&self.points)
    }

    pub fn path_length(&self) -> f64 {
        geometry::path_length(&self.points)
    }

    /// True when the end point returns to within `ratio` of the stroke's
    /// larger bounding-box side from the start point.
    pub fn is_closed(&self, ratio: f64) -> bool {
        geometry::is_closed(&self.points, ratio)
    }
}

impl Deref for Stroke {
    type Target = [Point];

    fn deref(&self) -> &Self::Target {
        &self.points
    }
}

impl AsRef<[Point]> for Stroke {
    fn as_ref(&self) -> &[Point] {
        &self.points
    }
}

impl TryFrom<Vec<Point>> for Stroke {
    type Error = StrokeError;

    fn try_from(points: Vec<Point>) -> Result<Self, Self::Error> {
        Self::new(points)
    }
}

impl From<Stroke> for Vec<Point> {
    fn from(stroke: Stroke) -> Self {
        stroke.points
    }
}
