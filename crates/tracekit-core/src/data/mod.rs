//! Data model for strokes and their derived geometry.
//!
//! A [`Point`] is a plain coordinate pair in the host's application space.
//! A [`Stroke`] is an ordered, non-empty run of points captured from one
//! continuous pen or touch motion. A [`BoundingBox`] is derived on demand from
//! a point slice and never cached alongside its source.

mod stroke;

pub use stroke::Stroke;

use serde::{Deserialize, Serialize};

/// A 2D point in application coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: &Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Returns this point shifted by `(dx, dy)`.
    pub fn translated(&self, dx: f64, dy: f64) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self::new(x, y)
    }
}

/// Axis-aligned bounds of a point set.
///
/// `width` and `height` are never negative; the box of an empty set is all zeros.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
    pub width: f64,
    pub height: f64,
    pub center_x: f64,
    pub center_y: f64,
}

impl BoundingBox {
    /// Builds a box from its extents, deriving size and center.
    pub fn from_extents(min_x: f64, max_x: f64, min_y: f64, max_y: f64) -> Self {
        let width = (max_x - min_x).max(0.0);
        let height = (max_y - min_y).max(0.0);
        Self {
            min_x,
            max_x,
            min_y,
            max_y,
            width,
            height,
            center_x: (min_x + max_x) / 2.0,
            center_y: (min_y + max_y) / 2.0,
        }
    }

    pub fn center(&self) -> Point {
        Point::new(self.center_x, self.center_y)
    }

    /// The longer of the two sides.
    pub fn max_dimension(&self) -> f64 {
        self.width.max(self.height)
    }

    /// The shorter of the two sides.
    pub fn min_dimension(&self) -> f64 {
        self.width.min(self.height)
    }

    /// Shorter side over longer side, in `[0, 1]`.
    ///
    /// A degenerate box (both sides zero) reports `0.0`.
    pub fn aspect_ratio(&self) -> f64 {
        let longer = self.max_dimension();
        if longer <= f64::EPSILON {
            0.0
        } else {
            self.min_dimension() / longer
        }
    }

    /// Longer side over shorter side.
    ///
    /// Infinite when the box is flat along one axis, `1.0` for a single point.
    pub fn elongation(&self) -> f64 {
        let longer = self.max_dimension();
        let shorter = self.min_dimension();
        if longer <= f64::EPSILON {
            1.0
        } else if shorter <= f64::EPSILON {
            f64::INFINITY
        } else {
            longer / shorter
        }
    }

    /// Length of the box diagonal.
    pub fn diagonal(&self) -> f64 {
        (self.width * self.width + self.height * self.height).sqrt()
    }
}
