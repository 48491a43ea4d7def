//! Error types for the annotation core.

use thiserror::Error;

/// Construction-time contract violations.
///
/// These indicate a bug in the calling layer (for example feeding an
/// untransformed pixel position where a normalized point is expected), not a
/// runtime condition. The panicking `new` constructors on the model types
/// fail fast with these messages; the `try_new` variants return them for
/// paths that validate external input.
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum GeometryError {
    /// A normalized coordinate fell outside the unit square
    #[error("normalized coordinate out of range: ({x}, {y})")]
    OutOfRange {
        /// The offending x coordinate
        x: f32,
        /// The offending y coordinate
        y: f32,
    },

    /// Stroke width must be strictly positive
    #[error("stroke width must be positive, got {value}")]
    NonPositiveStroke {
        /// The rejected width
        value: f32,
    },

    /// Font size must be strictly positive
    #[error("font size must be positive, got {value}")]
    NonPositiveFontSize {
        /// The rejected size
        value: f32,
    },

    /// Detection confidence must lie in `0.0..=1.0`
    #[error("confidence score must be within 0.0..=1.0, got {value}")]
    ConfidenceOutOfRange {
        /// The rejected score
        value: f32,
    },
}

/// Errors from asynchronous image-size resolution.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ImageLoadError {
    /// The underlying image resource could not be resolved
    #[error("image source unavailable: {reason}")]
    Unavailable {
        /// Description of the failure
        reason: String,
    },

    /// The resolved image has a zero or negative dimension
    #[error("image has no area: {width}x{height}")]
    EmptyImage {
        /// Resolved width
        width: f32,
        /// Resolved height
        height: f32,
    },
}

impl ImageLoadError {
    /// Create an unavailable error with a reason.
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self::Unavailable {
            reason: reason.into(),
        }
    }
}
