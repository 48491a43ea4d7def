//! Polygon annotation and simple-closed-ring validation.

use serde::{Deserialize, Serialize};

use crate::color::Color;
use crate::error::GeometryError;
use crate::geometry::NormPoint;

/// Minimum number of stored vertices for a valid ring, counting the
/// duplicated closing vertex (a triangle stores 4 points).
pub const MIN_RING_VERTICES: usize = 4;

/// A polygon built vertex-by-vertex and closed explicitly.
///
/// While being drawn the ring is open; [`PolygonAnnotation::close`] appends
/// a copy of the first vertex, which is the only way the polygon transitions
/// toward validity. Validity itself is derived on demand, never cached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolygonAnnotation {
    color: Color,
    stroke_width: f32,
    points: Vec<NormPoint>,
}

impl PolygonAnnotation {
    /// Validate and construct an empty polygon.
    pub fn try_new(color: Color, stroke_width: f32) -> Result<Self, GeometryError> {
        if stroke_width <= 0.0 {
            return Err(GeometryError::NonPositiveStroke {
                value: stroke_width,
            });
        }
        Ok(Self {
            color,
            stroke_width,
            points: Vec::new(),
        })
    }

    /// Construct an empty polygon, failing fast on a contract violation.
    ///
    /// # Panics
    /// Panics if `stroke_width` is not strictly positive.
    pub fn new(color: Color, stroke_width: f32) -> Self {
        match Self::try_new(color, stroke_width) {
            Ok(polygon) => polygon,
            Err(err) => panic!("{err}"),
        }
    }

    /// Append a vertex. Input order is preserved.
    pub fn push(&mut self, point: NormPoint) {
        self.points.push(point);
    }

    /// Close the ring by appending a copy of the first vertex.
    ///
    /// No-op on an empty polygon. Not guarded against repeated calls: a
    /// second `close()` appends the first vertex again, which is a caller
    /// error.
    pub fn close(&mut self) {
        if let Some(first) = self.points.first().copied() {
            self.points.push(first);
        }
    }

    /// Read-only, order-preserving view of the vertices.
    pub fn points(&self) -> &[NormPoint] {
        &self.points
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn stroke_width(&self) -> f32 {
        self.stroke_width
    }

    /// Whether the current vertex list forms a valid simple closed polygon.
    pub fn is_valid(&self) -> bool {
        is_simple_closed_ring(&self.points)
    }
}

/// Check that a vertex sequence forms a valid simple closed polygon:
/// at least [`MIN_RING_VERTICES`] points, an exactly-closed ring (first and
/// last stored point bitwise equal, as produced by `close()`), and no two
/// non-adjacent edges strictly crossing.
///
/// The crossing test is a cross-product orientation test for proper
/// intersections only. Collinear overlap and edges touching at a shared
/// vertex (beyond ring adjacency) are not flagged; vertex counts stay in the
/// tens for interactive use, so the O(n²) scan is fine.
pub fn is_simple_closed_ring(points: &[NormPoint]) -> bool {
    if points.len() < MIN_RING_VERTICES {
        return false;
    }
    if points.first() != points.last() {
        return false;
    }

    // Edge i runs from point i to point i+1. Edges closer than 2 apart
    // share an endpoint and are never tested against each other.
    let edges = points.len() - 1;
    for i in 0..edges {
        for j in (i + 2)..edges {
            if segments_cross(points[i], points[i + 1], points[j], points[j + 1]) {
                return false;
            }
        }
    }
    true
}

/// Cross product of OA and OB.
fn cross(o: NormPoint, a: NormPoint, b: NormPoint) -> f32 {
    (a.x() - o.x()) * (b.y() - o.y()) - (a.y() - o.y()) * (b.x() - o.x())
}

/// Strict segment crossing: AB and CD properly intersect, endpoints and
/// collinear touching excluded.
fn segments_cross(a: NormPoint, b: NormPoint, c: NormPoint, d: NormPoint) -> bool {
    cross(a, b, c) * cross(a, b, d) < 0.0 && cross(c, d, a) * cross(c, d, b) < 0.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ring(coords: &[(f32, f32)]) -> Vec<NormPoint> {
        coords.iter().map(|&(x, y)| NormPoint::new(x, y)).collect()
    }

    #[test]
    fn test_three_point_open_list_invalid() {
        let points = ring(&[(0.1, 0.1), (0.5, 0.1), (0.5, 0.5)]);
        assert!(!is_simple_closed_ring(&points));
    }

    #[test]
    fn test_closed_convex_quad_valid() {
        let points = ring(&[(0.1, 0.1), (0.5, 0.1), (0.5, 0.5), (0.1, 0.5), (0.1, 0.1)]);
        assert!(is_simple_closed_ring(&points));
    }

    #[test]
    fn test_closed_triangle_valid() {
        // Smallest valid ring: 3 distinct vertices plus the closing copy.
        let points = ring(&[(0.2, 0.2), (0.8, 0.2), (0.5, 0.8), (0.2, 0.2)]);
        assert!(is_simple_closed_ring(&points));
    }

    #[test]
    fn test_unclosed_quad_invalid() {
        let points = ring(&[(0.1, 0.1), (0.5, 0.1), (0.5, 0.5), (0.1, 0.5)]);
        assert!(!is_simple_closed_ring(&points));
    }

    #[test]
    fn test_bowtie_invalid() {
        // Self-intersecting "bowtie": the two diagonal edges cross.
        let points = ring(&[(0.1, 0.1), (0.9, 0.9), (0.9, 0.1), (0.1, 0.9), (0.1, 0.1)]);
        assert!(!is_simple_closed_ring(&points));
    }

    #[test]
    fn test_ring_shared_vertex_not_flagged() {
        // Known boundary case: two non-adjacent edges touching at a shared
        // vertex are not a strict crossing, so the ring counts as valid.
        // Recorded here as current behavior, not as an endorsement.
        let points = ring(&[
            (0.5, 0.5),
            (0.9, 0.1),
            (0.9, 0.9),
            (0.5, 0.5),
            (0.1, 0.9),
            (0.1, 0.1),
            (0.5, 0.5),
        ]);
        assert!(is_simple_closed_ring(&points));
    }

    #[test]
    fn test_polygon_close_appends_first_vertex() {
        let mut polygon = PolygonAnnotation::new(Color::default(), 2.0);
        polygon.push(NormPoint::new(0.1, 0.1));
        polygon.push(NormPoint::new(0.5, 0.1));
        polygon.push(NormPoint::new(0.5, 0.5));
        polygon.push(NormPoint::new(0.1, 0.5));
        assert!(!polygon.is_valid());

        polygon.close();
        assert_eq!(polygon.points().len(), 5);
        assert_eq!(polygon.points()[4], NormPoint::new(0.1, 0.1));
        assert!(polygon.is_valid());
    }

    #[test]
    fn test_polygon_close_on_empty_is_noop() {
        let mut polygon = PolygonAnnotation::new(Color::default(), 2.0);
        polygon.close();
        assert!(polygon.points().is_empty());
        assert!(!polygon.is_valid());
    }
}
