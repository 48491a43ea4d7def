//! Core geometry types shared by the annotation model and the transforms.
//!
//! Two point types exist on purpose: [`Point`] carries raw coordinates
//! (render-space pixels, or a normalized candidate that has not been
//! validated yet), while [`NormPoint`] is guaranteed to lie inside the unit
//! square. Annotation entities only ever store [`NormPoint`]s.

use serde::{Deserialize, Serialize};

use crate::error::GeometryError;

/// A raw 2D point. No range invariant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// A point in normalized space: both coordinates in `[0, 1]`.
///
/// Fields are private so the range invariant holds for every live value;
/// construction goes through [`NormPoint::try_new`] or the panicking
/// [`NormPoint::new`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NormPoint {
    x: f32,
    y: f32,
}

impl NormPoint {
    /// Validate and construct a normalized point.
    ///
    /// Returns [`GeometryError::OutOfRange`] if either coordinate falls
    /// outside `[0, 1]`. This is the path interactive mutation goes through,
    /// where an out-of-range candidate (a drag leaving the image) is routine
    /// and silently dropped by the caller.
    pub fn try_new(x: f32, y: f32) -> Result<Self, GeometryError> {
        if !(0.0..=1.0).contains(&x) || !(0.0..=1.0).contains(&y) {
            return Err(GeometryError::OutOfRange { x, y });
        }
        Ok(Self { x, y })
    }

    /// Construct a normalized point, failing fast on a contract violation.
    ///
    /// # Panics
    /// Panics if either coordinate is outside `[0, 1]`. Direct construction
    /// with out-of-range values indicates a bug in the calling layer.
    pub fn new(x: f32, y: f32) -> Self {
        match Self::try_new(x, y) {
            Ok(point) => point,
            Err(err) => panic!("{err}"),
        }
    }

    pub fn x(&self) -> f32 {
        self.x
    }

    pub fn y(&self) -> f32 {
        self.y
    }
}

impl TryFrom<Point> for NormPoint {
    type Error = GeometryError;

    fn try_from(point: Point) -> Result<Self, Self::Error> {
        Self::try_new(point.x, point.y)
    }
}

/// Width and height of an image or render target.
///
/// Used both for the original image resolution and for the currently
/// rendered size; the transforms in [`crate::transform`] expect positive
/// dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Whether both dimensions are strictly positive.
    pub fn has_area(&self) -> bool {
        self.width > 0.0 && self.height > 0.0
    }
}

/// An axis-aligned rectangle in render-space pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    /// Top-left corner X coordinate
    pub x: f32,
    /// Top-left corner Y coordinate
    pub y: f32,
    /// Width of the rect
    pub width: f32,
    /// Height of the rect
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Build a rect from two corner points, in any order.
    pub fn from_corners(p1: Point, p2: Point) -> Self {
        Self {
            x: p1.x.min(p2.x),
            y: p1.y.min(p2.y),
            width: (p1.x - p2.x).abs(),
            height: (p1.y - p2.y).abs(),
        }
    }
}
