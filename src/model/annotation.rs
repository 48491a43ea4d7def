//! Annotation data model.
//!
//! The polymorphic annotation hierarchy is a tagged union: [`Annotation`]
//! dispatches on its variant, and [`AnnotationKind`] is the flat tag the
//! settings selector and the render mapping work with. Every entity stores
//! its geometry in normalized space and hands out read-only views only;
//! mutation goes through the typed `push`/`close` operations.

use serde::{Deserialize, Serialize};

use crate::color::Color;
use crate::error::GeometryError;
use crate::geometry::NormPoint;
use crate::model::polygon::PolygonAnnotation;

// ============================================================================
// Kind Tags
// ============================================================================

/// The flat annotation-type tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AnnotationKind {
    #[default]
    Line,
    Polyline,
    Rectangle,
    Oval,
    Polygon,
    Text,
}

impl AnnotationKind {
    /// Get the display name for this kind.
    pub fn name(&self) -> &'static str {
        match self {
            AnnotationKind::Line => "Line",
            AnnotationKind::Polyline => "Polyline",
            AnnotationKind::Rectangle => "Rectangle",
            AnnotationKind::Oval => "Oval",
            AnnotationKind::Polygon => "Polygon",
            AnnotationKind::Text => "Text",
        }
    }

    /// All kinds, in selector order.
    pub fn all() -> &'static [AnnotationKind] {
        &[
            AnnotationKind::Line,
            AnnotationKind::Polyline,
            AnnotationKind::Rectangle,
            AnnotationKind::Oval,
            AnnotationKind::Polygon,
            AnnotationKind::Text,
        ]
    }

    /// Whether this kind is built vertex-by-vertex across multiple gestures
    /// and completed by an explicit confirm action.
    pub fn is_multi_gesture(&self) -> bool {
        matches!(self, AnnotationKind::Polyline | AnnotationKind::Polygon)
    }
}

/// Shape sub-tag for annotations drawn in a single drag gesture.
///
/// Polygon and text are separate entity types; this tag covers the shapes
/// that share [`ShapeAnnotation`]'s storage and lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShapeKind {
    Line,
    Polyline,
    Rectangle,
    Oval,
}

impl From<ShapeKind> for AnnotationKind {
    fn from(kind: ShapeKind) -> Self {
        match kind {
            ShapeKind::Line => AnnotationKind::Line,
            ShapeKind::Polyline => AnnotationKind::Polyline,
            ShapeKind::Rectangle => AnnotationKind::Rectangle,
            ShapeKind::Oval => AnnotationKind::Oval,
        }
    }
}

// ============================================================================
// Shape Annotation
// ============================================================================

/// A freehand shape: line, polyline, rectangle or oval.
///
/// Points are appended only, in input order. For rectangle/oval only the
/// first and last point are semantically meaningful (they define the
/// bounding rect); for line/polyline every point is rendered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShapeAnnotation {
    kind: ShapeKind,
    color: Color,
    stroke_width: f32,
    points: Vec<NormPoint>,
}

impl ShapeAnnotation {
    /// Validate and construct an empty shape.
    pub fn try_new(kind: ShapeKind, color: Color, stroke_width: f32) -> Result<Self, GeometryError> {
        if stroke_width <= 0.0 {
            return Err(GeometryError::NonPositiveStroke {
                value: stroke_width,
            });
        }
        Ok(Self {
            kind,
            color,
            stroke_width,
            points: Vec::new(),
        })
    }

    /// Construct an empty shape, failing fast on a contract violation.
    ///
    /// # Panics
    /// Panics if `stroke_width` is not strictly positive.
    pub fn new(kind: ShapeKind, color: Color, stroke_width: f32) -> Self {
        match Self::try_new(kind, color, stroke_width) {
            Ok(shape) => shape,
            Err(err) => panic!("{err}"),
        }
    }

    /// Append a point. Input order is preserved.
    pub fn push(&mut self, point: NormPoint) {
        self.points.push(point);
    }

    /// Read-only, order-preserving view of the points.
    pub fn points(&self) -> &[NormPoint] {
        &self.points
    }

    pub fn kind(&self) -> ShapeKind {
        self.kind
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn stroke_width(&self) -> f32 {
        self.stroke_width
    }
}

// ============================================================================
// Text Annotation
// ============================================================================

/// A text label at a single normalized position.
///
/// The font size is stored as a fraction of the original image height so the
/// label scales with the rendered size.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextAnnotation {
    position: NormPoint,
    text: String,
    font_size: f32,
    color: Color,
}

impl TextAnnotation {
    /// Validate and construct a text annotation.
    pub fn try_new(
        position: NormPoint,
        text: impl Into<String>,
        font_size: f32,
        color: Color,
    ) -> Result<Self, GeometryError> {
        if font_size <= 0.0 {
            return Err(GeometryError::NonPositiveFontSize { value: font_size });
        }
        Ok(Self {
            position,
            text: text.into(),
            font_size,
            color,
        })
    }

    /// Construct a text annotation, failing fast on a contract violation.
    ///
    /// # Panics
    /// Panics if `font_size` is not strictly positive.
    pub fn new(position: NormPoint, text: impl Into<String>, font_size: f32, color: Color) -> Self {
        match Self::try_new(position, text, font_size, color) {
            Ok(annotation) => annotation,
            Err(err) => panic!("{err}"),
        }
    }

    pub fn position(&self) -> NormPoint {
        self.position
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Normalized font size (fraction of the original image height).
    pub fn font_size(&self) -> f32 {
        self.font_size
    }

    pub fn color(&self) -> Color {
        self.color
    }
}

// ============================================================================
// Detected Annotation
// ============================================================================

/// A rectangle annotation seeded from an object-detection pipeline.
///
/// Unlike interactively drawn shapes it arrives fully formed, with a label
/// and a confidence score. The corner accessors are axis-aligned min/max
/// extremes over the supplied points, not geometric corners of a rotated
/// rectangle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectedAnnotation {
    label: String,
    confidence: f32,
    color: Color,
    stroke_width: f32,
    points: Vec<NormPoint>,
}

impl DetectedAnnotation {
    /// Validate and construct a detected annotation.
    pub fn try_new(
        label: impl Into<String>,
        confidence: f32,
        points: Vec<NormPoint>,
        color: Color,
        stroke_width: f32,
    ) -> Result<Self, GeometryError> {
        if !(0.0..=1.0).contains(&confidence) {
            return Err(GeometryError::ConfidenceOutOfRange { value: confidence });
        }
        if stroke_width <= 0.0 {
            return Err(GeometryError::NonPositiveStroke {
                value: stroke_width,
            });
        }
        Ok(Self {
            label: label.into(),
            confidence,
            color,
            stroke_width,
            points,
        })
    }

    /// Construct a detected annotation, failing fast on a contract violation.
    ///
    /// # Panics
    /// Panics if `confidence` is outside `0.0..=1.0` or `stroke_width` is not
    /// strictly positive.
    pub fn new(
        label: impl Into<String>,
        confidence: f32,
        points: Vec<NormPoint>,
        color: Color,
        stroke_width: f32,
    ) -> Self {
        match Self::try_new(label, confidence, points, color, stroke_width) {
            Ok(annotation) => annotation,
            Err(err) => panic!("{err}"),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn confidence(&self) -> f32 {
        self.confidence
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn stroke_width(&self) -> f32 {
        self.stroke_width
    }

    pub fn points(&self) -> &[NormPoint] {
        &self.points
    }

    /// Min/max coordinate extremes over the points, or `None` when empty.
    fn extremes(&self) -> Option<(f32, f32, f32, f32)> {
        let first = self.points.first()?;
        let (mut min_x, mut min_y) = (first.x(), first.y());
        let (mut max_x, mut max_y) = (first.x(), first.y());
        for p in &self.points[1..] {
            min_x = min_x.min(p.x());
            min_y = min_y.min(p.y());
            max_x = max_x.max(p.x());
            max_y = max_y.max(p.y());
        }
        Some((min_x, min_y, max_x, max_y))
    }

    pub fn top_left(&self) -> Option<NormPoint> {
        self.extremes()
            .map(|(min_x, min_y, _, _)| NormPoint::new(min_x, min_y))
    }

    pub fn top_right(&self) -> Option<NormPoint> {
        self.extremes()
            .map(|(_, min_y, max_x, _)| NormPoint::new(max_x, min_y))
    }

    pub fn bottom_left(&self) -> Option<NormPoint> {
        self.extremes()
            .map(|(min_x, _, _, max_y)| NormPoint::new(min_x, max_y))
    }

    pub fn bottom_right(&self) -> Option<NormPoint> {
        self.extremes()
            .map(|(_, _, max_x, max_y)| NormPoint::new(max_x, max_y))
    }
}

// ============================================================================
// Annotation
// ============================================================================

/// A single annotation in the overlay.
///
/// Every annotation is owned exclusively by the controller's annotation list
/// or its redo stack at any time, never both.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Annotation {
    Shape(ShapeAnnotation),
    Polygon(PolygonAnnotation),
    Text(TextAnnotation),
    Detected(DetectedAnnotation),
}

impl Annotation {
    /// The flat type tag of this annotation.
    pub fn kind(&self) -> AnnotationKind {
        match self {
            Annotation::Shape(shape) => shape.kind().into(),
            Annotation::Polygon(_) => AnnotationKind::Polygon,
            Annotation::Text(_) => AnnotationKind::Text,
            Annotation::Detected(_) => AnnotationKind::Rectangle,
        }
    }

    pub fn color(&self) -> Color {
        match self {
            Annotation::Shape(shape) => shape.color(),
            Annotation::Polygon(polygon) => polygon.color(),
            Annotation::Text(text) => text.color(),
            Annotation::Detected(detected) => detected.color(),
        }
    }

    /// Number of stored geometry points (1 for text).
    pub fn point_count(&self) -> usize {
        match self {
            Annotation::Shape(shape) => shape.points().len(),
            Annotation::Polygon(polygon) => polygon.points().len(),
            Annotation::Text(_) => 1,
            Annotation::Detected(detected) => detected.points().len(),
        }
    }
}
