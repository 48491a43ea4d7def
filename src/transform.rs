//! Coordinate-space conversions between normalized space and render space.
//!
//! Annotations persist their geometry in a resolution-independent unit
//! square; the currently displayed image has concrete pixel dimensions that
//! change across resizes and rotations. These conversions are pure and
//! stateless. All of them require positive dimensions on the size argument:
//! the caller must guarantee a loaded, positive-area target before
//! converting (division by zero otherwise).

use crate::geometry::{NormPoint, Point, Size};

/// Convert a render-space position to normalized coordinates.
///
/// Returns a raw [`Point`] rather than a [`NormPoint`]: a pointer position
/// outside the image produces a candidate outside the unit square, and
/// deciding what to do with it (usually: drop it) is the caller's business.
pub fn to_normalized(point: Point, render: Size) -> Point {
    debug_assert!(render.has_area(), "render target must have positive area");
    Point::new(point.x / render.width, point.y / render.height)
}

/// Convert a normalized point to render-space pixels.
pub fn to_render(point: NormPoint, render: Size) -> Point {
    debug_assert!(render.has_area(), "render target must have positive area");
    Point::new(point.x() * render.width, point.y() * render.height)
}

/// Normalize a pixel font size against the original image height.
pub fn normalized_font_size(font_px: f32, original: Size) -> f32 {
    debug_assert!(original.has_area(), "image must have positive area");
    font_px / original.height
}

/// Scale a normalized font size to pixels for the current render height.
pub fn render_font_size(fraction: f32, render: Size) -> f32 {
    debug_assert!(render.has_area(), "render target must have positive area");
    fraction * render.height
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 0.0001;

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() < EPSILON
    }

    #[test]
    fn test_to_normalized_known_values() {
        let render = Size::new(800.0, 600.0);
        let norm = to_normalized(Point::new(400.0, 150.0), render);
        assert!(approx_eq(norm.x, 0.5));
        assert!(approx_eq(norm.y, 0.25));
    }

    #[test]
    fn test_to_render_known_values() {
        let render = Size::new(800.0, 600.0);
        let pixel = to_render(NormPoint::new(0.5, 0.25), render);
        assert!(approx_eq(pixel.x, 400.0));
        assert!(approx_eq(pixel.y, 150.0));
    }

    #[test]
    fn test_round_trip_law() {
        // toNormalized(toRender(p, s), s) == p for in-bounds p, up to epsilon.
        let sizes = [
            Size::new(800.0, 600.0),
            Size::new(1.0, 1.0),
            Size::new(1920.0, 1080.0),
            Size::new(333.0, 777.0),
        ];
        let points = [
            NormPoint::new(0.0, 0.0),
            NormPoint::new(1.0, 1.0),
            NormPoint::new(0.5, 0.5),
            NormPoint::new(0.123, 0.987),
        ];
        for size in sizes {
            for point in points {
                let back = to_normalized(to_render(point, size), size);
                assert!(approx_eq(back.x, point.x()), "x mismatch for {size:?}");
                assert!(approx_eq(back.y, point.y()), "y mismatch for {size:?}");
            }
        }
    }

    #[test]
    fn test_font_size_round_trip() {
        let original = Size::new(1024.0, 768.0);
        let fraction = normalized_font_size(24.0, original);
        assert!(approx_eq(fraction, 24.0 / 768.0));
        assert!(approx_eq(render_font_size(fraction, original), 24.0));

        // Rendering at half resolution halves the pixel size.
        let half = Size::new(512.0, 384.0);
        assert!(approx_eq(render_font_size(fraction, half), 12.0));
    }
}
