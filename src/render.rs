//! Render-boundary contract.
//!
//! The GUI layer owns pixels; this module owns the mapping from normalized
//! annotation geometry to draw primitives, because that mapping encodes
//! domain semantics (which points matter for which kind, how font sizes
//! scale). A renderer implements [`DrawSurface`] and the core walks the
//! annotation list through it.

use crate::color::Color;
use crate::geometry::{NormPoint, Point, Rect, Size};
use crate::model::{Annotation, DetectedAnnotation, ShapeAnnotation, ShapeKind, TextAnnotation};
use crate::transform;

/// Draw primitives the rendering layer must provide.
///
/// All coordinates and sizes arriving here are already in render-space
/// pixels; the surface does no coordinate math of its own.
pub trait DrawSurface {
    /// Connect consecutive points with straight stroked segments.
    fn stroke_path(&mut self, points: &[Point], color: Color, width: f32);

    /// Stroke an axis-aligned rectangle outline.
    fn stroke_rect(&mut self, rect: Rect, color: Color, width: f32);

    /// Stroke the ellipse inscribed in the given rect.
    fn stroke_oval(&mut self, rect: Rect, color: Color, width: f32);

    /// Paint a string centered on both axes at the given position.
    fn draw_text(&mut self, center: Point, text: &str, font_px: f32, color: Color);
}

/// Draw one annotation onto the surface at the given render size.
pub fn draw_annotation(annotation: &Annotation, surface: &mut dyn DrawSurface, render: Size) {
    match annotation {
        Annotation::Shape(shape) => draw_shape(shape, surface, render),
        // An open polygon mid-draw renders as a path; validity is a derived
        // property, not a render precondition.
        Annotation::Polygon(polygon) => draw_segments(
            polygon.points(),
            surface,
            render,
            polygon.color(),
            polygon.stroke_width(),
        ),
        Annotation::Text(text) => draw_label(text, surface, render),
        Annotation::Detected(detected) => draw_detected(detected, surface, render),
    }
}

/// Draw every annotation in list order (earliest at the bottom).
pub fn draw_annotations(annotations: &[Annotation], surface: &mut dyn DrawSurface, render: Size) {
    for annotation in annotations {
        draw_annotation(annotation, surface, render);
    }
}

fn draw_shape(shape: &ShapeAnnotation, surface: &mut dyn DrawSurface, render: Size) {
    match shape.kind() {
        ShapeKind::Line | ShapeKind::Polyline => draw_segments(
            shape.points(),
            surface,
            render,
            shape.color(),
            shape.stroke_width(),
        ),
        ShapeKind::Rectangle => {
            if let Some(rect) = corner_rect(shape.points(), render) {
                surface.stroke_rect(rect, shape.color(), shape.stroke_width());
            }
        }
        ShapeKind::Oval => {
            if let Some(rect) = corner_rect(shape.points(), render) {
                surface.stroke_oval(rect, shape.color(), shape.stroke_width());
            }
        }
    }
}

fn draw_segments(
    points: &[NormPoint],
    surface: &mut dyn DrawSurface,
    render: Size,
    color: Color,
    width: f32,
) {
    if points.len() < 2 {
        return;
    }
    let path: Vec<Point> = points
        .iter()
        .map(|p| transform::to_render(*p, render))
        .collect();
    surface.stroke_path(&path, color, width);
}

/// Bounding rect from the first and last point; the points in between are
/// not meaningful for rectangle/oval kinds.
fn corner_rect(points: &[NormPoint], render: Size) -> Option<Rect> {
    if points.len() < 2 {
        return None;
    }
    let first = transform::to_render(*points.first()?, render);
    let last = transform::to_render(*points.last()?, render);
    Some(Rect::from_corners(first, last))
}

fn draw_label(text: &TextAnnotation, surface: &mut dyn DrawSurface, render: Size) {
    let center = transform::to_render(text.position(), render);
    let font_px = transform::render_font_size(text.font_size(), render);
    surface.draw_text(center, text.text(), font_px, text.color());
}

fn draw_detected(detected: &DetectedAnnotation, surface: &mut dyn DrawSurface, render: Size) {
    let (Some(top_left), Some(bottom_right)) = (detected.top_left(), detected.bottom_right())
    else {
        return;
    };
    let rect = Rect::from_corners(
        transform::to_render(top_left, render),
        transform::to_render(bottom_right, render),
    );
    surface.stroke_rect(rect, detected.color(), detected.stroke_width());
}
