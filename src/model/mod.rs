//! Data model for the annotation overlay.

mod annotation;
mod polygon;

pub use annotation::{
    Annotation, AnnotationKind, DetectedAnnotation, ShapeAnnotation, ShapeKind, TextAnnotation,
};
pub use polygon::{MIN_RING_VERTICES, PolygonAnnotation, is_simple_closed_ring};
