//! # TraceKit Core
//!
//! Core types and primitives shared by every TraceKit crate.
//! Provides the point and stroke data model, the pure geometric primitives
//! the classifier and scorers are built from, and the structured trace
//! sinks used to observe intermediate measurements.

pub mod data;
pub mod error;
pub mod geometry;
pub mod trace;

pub use data::{BoundingBox, Point, Stroke};

pub use error::{Error, Result, StrokeError};

pub use geometry::{
    bounding_box, centroid, distance, is_closed, normalize, path_length,
    point_to_polyline_distance, point_to_segment_distance, polygon_area, resample,
    resample_closed, smooth, subsample, turning_angle,
};

pub use trace::{NoTrace, TraceEntry, TraceLog, TraceSink, TracingSink};
