//! Polygon with holes: the basic region type.

use crate::predicates::{point_on_segment, segments_intersect, SegmentIntersection};
use crate::primitives::{Aabb2, Point2, Segment2};
use num_traits::Float;

use super::boolean::{self, BooleanOp};

/// Welding tolerance used by boundary tests and boolean stitching.
///
/// Scales with the precision of the scalar type: about `1.5e-8` for `f64`
/// and `3.5e-4` for `f32`.
#[inline]
pub(crate) fn weld_eps<F: Float>() -> F {
    F::epsilon().sqrt()
}

/// Iterates over the directed edges of a ring (implicitly closed).
pub(crate) fn ring_edges<F: Float>(ring: &[Point2<F>]) -> impl Iterator<Item = Segment2<F>> + '_ {
    let n = ring.len();
    (0..n).map(move |i| Segment2::new(ring[i], ring[(i + 1) % n]))
}

/// Computes the signed area of a ring using the shoelace formula.
///
/// Positive for counter-clockwise winding, negative for clockwise.
pub(crate) fn ring_signed_area<F: Float>(ring: &[Point2<F>]) -> F {
    if ring.len() < 3 {
        return F::zero();
    }

    let mut area = F::zero();
    let n = ring.len();

    for i in 0..n {
        let j = (i + 1) % n;
        area = area + ring[i].x * ring[j].y;
        area = area - ring[j].x * ring[i].y;
    }

    area / F::from(2.0).unwrap()
}

/// Tests if a point is inside a ring using the ray casting algorithm.
///
/// Points on the boundary may report either value; callers that care test
/// the boundary separately first.
pub(crate) fn ring_contains<F: Float>(ring: &[Point2<F>], point: Point2<F>) -> bool {
    if ring.len() < 3 {
        return false;
    }

    let mut inside = false;
    let n = ring.len();

    let mut j = n - 1;
    for i in 0..n {
        let vi = ring[i];
        let vj = ring[j];

        if ((vi.y > point.y) != (vj.y > point.y))
            && (point.x < (vj.x - vi.x) * (point.y - vi.y) / (vj.y - vi.y) + vi.x)
        {
            inside = !inside;
        }
        j = i;
    }

    inside
}

/// Removes duplicate consecutive vertices (including a wrapped-around
/// duplicate of the first vertex at the end).
fn dedup_ring<F: Float>(mut ring: Vec<Point2<F>>) -> Vec<Point2<F>> {
    let eps = weld_eps::<F>();
    let eps_sq = eps * eps;
    ring.dedup_by(|a, b| a.distance_squared(*b) <= eps_sq);
    while ring.len() > 1 {
        let first = ring[0];
        let last = *ring.last().unwrap();
        if first.distance_squared(last) <= eps_sq {
            ring.pop();
        } else {
            break;
        }
    }
    ring
}

/// A polygonal region: one simple, counter-clockwise outer boundary plus
/// zero or more clockwise hole boundaries.
///
/// Orientation is normalized and duplicate consecutive vertices are dropped
/// on construction. The bounding box is computed at construction time and
/// stays valid because the boundary is immutable afterwards; every operation
/// that changes the boundary produces a new `Polygon`.
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon<F> {
    outer: Vec<Point2<F>>,
    holes: Vec<Vec<Point2<F>>>,
    bounds: Option<Aabb2<F>>,
}

impl<F: Float> Polygon<F> {
    /// Creates a polygon from an outer boundary.
    ///
    /// The boundary is deduplicated and reoriented counter-clockwise.
    pub fn new(outer: Vec<Point2<F>>) -> Self {
        Self::with_holes(outer, Vec::new())
    }

    /// Creates a polygon from an outer boundary and holes.
    ///
    /// The outer boundary is normalized counter-clockwise, holes clockwise.
    pub fn with_holes(outer: Vec<Point2<F>>, holes: Vec<Vec<Point2<F>>>) -> Self {
        let mut outer = dedup_ring(outer);
        if ring_signed_area(&outer) < F::zero() {
            outer.reverse();
        }

        let holes: Vec<Vec<Point2<F>>> = holes
            .into_iter()
            .map(|h| {
                let mut h = dedup_ring(h);
                if ring_signed_area(&h) > F::zero() {
                    h.reverse();
                }
                h
            })
            .filter(|h| h.len() >= 3)
            .collect();

        let bounds = Aabb2::from_points(outer.iter().copied());

        Self {
            outer,
            holes,
            bounds,
        }
    }

    /// Creates an empty polygon (no vertices, no area).
    pub fn empty() -> Self {
        Self {
            outer: Vec::new(),
            holes: Vec::new(),
            bounds: None,
        }
    }

    /// Returns the outer boundary vertices in counter-clockwise order.
    #[inline]
    pub fn outer(&self) -> &[Point2<F>] {
        &self.outer
    }

    /// Returns the hole boundaries, each in clockwise order.
    #[inline]
    pub fn holes(&self) -> &[Vec<Point2<F>>] {
        &self.holes
    }

    /// Returns `true` if the polygon has no usable boundary.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.outer.len() < 3
    }

    /// Returns the cached bounding box of the outer boundary.
    #[inline]
    pub fn bounds(&self) -> Option<Aabb2<F>> {
        self.bounds
    }

    /// Returns the enclosed area: outer area minus hole areas.
    pub fn area(&self) -> F {
        let outer = ring_signed_area(&self.outer).abs();
        let holes: F = self
            .holes
            .iter()
            .map(|h| ring_signed_area(h).abs())
            .fold(F::zero(), |a, b| a + b);
        outer - holes
    }

    /// Iterates over the directed edges of every boundary ring
    /// (outer first, then holes).
    pub fn edges(&self) -> impl Iterator<Item = Segment2<F>> + '_ {
        ring_edges(&self.outer).chain(self.holes.iter().flat_map(|h| ring_edges(h)))
    }

    /// Iterates over the vertices of every boundary ring.
    pub fn boundary_points(&self) -> impl Iterator<Item = Point2<F>> + '_ {
        self.outer
            .iter()
            .copied()
            .chain(self.holes.iter().flat_map(|h| h.iter().copied()))
    }

    /// Tests whether the region contains a point.
    ///
    /// With `strict = true` the boundary is excluded (open interior); with
    /// `strict = false` the boundary counts as inside (closure). Rejects in
    /// O(1) via the cached bounding box before any exact testing.
    pub fn contains(&self, point: Point2<F>, strict: bool) -> bool {
        let bb = match self.bounds {
            Some(bb) => bb,
            None => return false,
        };
        if !bb.contains_point(point) {
            return false;
        }

        let eps = weld_eps::<F>();
        for edge in self.edges() {
            if point_on_segment(point, edge, eps) {
                return !strict;
            }
        }

        if !ring_contains(&self.outer, point) {
            return false;
        }
        for hole in &self.holes {
            if ring_contains(hole, point) {
                return false;
            }
        }
        true
    }

    /// Tests whether a segment intersects the region.
    ///
    /// With `strict = false`, touching the boundary counts. With
    /// `strict = true` the segment must actually cross the interior;
    /// grazing along or touching the boundary does not count.
    pub fn intersects_segment(&self, segment: Segment2<F>, strict: bool) -> bool {
        let bb = match self.bounds {
            Some(bb) => bb,
            None => return false,
        };
        let seg_bb = Aabb2::from_point(segment.start).expand_to_include(segment.end);
        if !bb.intersects(seg_bb) {
            return false;
        }

        if !strict {
            let eps = weld_eps::<F>();
            for edge in self.edges() {
                if segments_intersect(segment, edge, eps) != SegmentIntersection::None {
                    return true;
                }
            }
            // No boundary hit: the segment is entirely inside or entirely
            // outside the region.
            return self.contains(segment.start, false);
        }

        // Strict: split at every boundary hit and probe sub-segment
        // midpoints against the open interior.
        let mut params = self.hit_params(segment);
        params.push(F::zero());
        params.push(F::one());
        params.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

        for pair in params.windows(2) {
            let mid = segment.point_at((pair[0] + pair[1]) / F::from(2.0).unwrap());
            if self.contains(mid, true) {
                return true;
            }
        }
        false
    }

    /// Returns the points where a segment crosses the region boundary.
    ///
    /// Collinear overlaps contribute their two overlap endpoints. Points are
    /// deduplicated within the welding tolerance.
    pub fn segment_intersections(&self, segment: Segment2<F>) -> Vec<Point2<F>> {
        let mut params = self.hit_params(segment);
        params.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

        let eps = weld_eps::<F>();
        let mut out: Vec<Point2<F>> = Vec::new();
        for t in params {
            let p = segment.point_at(t);
            if out.last().map(|q| q.distance(p) > eps).unwrap_or(true) {
                out.push(p);
            }
        }
        out
    }

    /// Segment parameters (t in [0, 1]) at which the segment meets the
    /// boundary.
    fn hit_params(&self, segment: Segment2<F>) -> Vec<F> {
        let eps = weld_eps::<F>();
        let mut params = Vec::new();
        for edge in self.edges() {
            match segments_intersect(segment, edge, eps) {
                SegmentIntersection::Point { t1, .. } => params.push(t1),
                SegmentIntersection::Overlapping { t_start, t_end } => {
                    params.push(t_start);
                    params.push(t_end);
                }
                SegmentIntersection::None => {}
            }
        }
        params
    }

    /// Tests whether the outer boundary is simple (non-self-intersecting).
    ///
    /// Polygons with holes report `false`; obstacle input is expected to be
    /// a plain simple ring.
    pub fn is_simple(&self) -> bool {
        if !self.holes.is_empty() {
            return false;
        }
        let n = self.outer.len();
        if n < 3 {
            return false;
        }

        let eps = weld_eps::<F>();
        for i in 0..n {
            let si = Segment2::new(self.outer[i], self.outer[(i + 1) % n]);
            for j in (i + 1)..n {
                let sj = Segment2::new(self.outer[j], self.outer[(j + 1) % n]);
                let adjacent = j == i + 1 || (i == 0 && j == n - 1);

                match segments_intersect(si, sj, eps) {
                    SegmentIntersection::None => {}
                    SegmentIntersection::Overlapping { .. } => return false,
                    SegmentIntersection::Point { point, .. } => {
                        if !adjacent {
                            return false;
                        }
                        // Adjacent edges may only meet at their shared vertex.
                        let shared = if j == i + 1 { self.outer[j] } else { self.outer[0] };
                        if point.distance(shared) > eps {
                            return false;
                        }
                    }
                }
            }
        }
        true
    }

    /// Unions `other` into `self` in place.
    ///
    /// Returns `true` if the two regions overlapped and were merged into a
    /// single region. Returns `false`, leaving `self` unchanged, when the
    /// regions are interior-disjoint.
    pub fn unite(&mut self, other: &Polygon<F>) -> bool {
        if other.is_empty() {
            return true;
        }
        if self.is_empty() {
            *self = other.clone();
            return true;
        }

        let mut result = boolean::boolean_op(self, other, BooleanOp::Union);
        if result.len() == 1 {
            *self = result.pop().unwrap();
            true
        } else {
            false
        }
    }

    /// Returns the union of two overlapping regions as a single polygon.
    ///
    /// When the regions are disjoint, returns `self` unchanged (callers use
    /// [`Polygon::unite`] when disjointness matters).
    pub fn united(&self, other: &Polygon<F>) -> Polygon<F> {
        let mut copy = self.clone();
        copy.unite(other);
        copy
    }

    /// Returns `self` minus `other` as zero or more disjoint polygons.
    pub fn subtracted(&self, other: &Polygon<F>) -> Vec<Polygon<F>> {
        boolean::boolean_op(self, other, BooleanOp::Difference)
    }

    /// Returns the intersection of the two regions as zero or more disjoint
    /// polygons.
    pub fn intersected(&self, other: &Polygon<F>) -> Vec<Polygon<F>> {
        boolean::boolean_op(self, other, BooleanOp::Intersection)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn square(x: f64, y: f64, size: f64) -> Polygon<f64> {
        Polygon::new(vec![
            Point2::new(x, y),
            Point2::new(x + size, y),
            Point2::new(x + size, y + size),
            Point2::new(x, y + size),
        ])
    }

    #[test]
    fn test_orientation_normalized() {
        // Clockwise input is reversed to CCW
        let p = Polygon::new(vec![
            Point2::new(0.0, 0.0),
            Point2::new(0.0, 1.0),
            Point2::new(1.0, 1.0),
            Point2::new(1.0, 0.0),
        ]);
        assert!(ring_signed_area(p.outer()) > 0.0);
    }

    #[test]
    fn test_duplicate_vertices_dropped() {
        let p = Polygon::new(vec![
            Point2::new(0.0, 0.0),
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(1.0, 1.0),
            Point2::new(1.0, 1.0),
            Point2::new(0.0, 1.0),
            Point2::new(0.0, 0.0),
        ]);
        assert_eq!(p.outer().len(), 4);
    }

    #[test]
    fn test_contains_strict_and_boundary() {
        let p = square(0.0, 0.0, 10.0);
        assert!(p.contains(Point2::new(5.0, 5.0), true));
        assert!(p.contains(Point2::new(5.0, 5.0), false));
        // On an edge
        assert!(!p.contains(Point2::new(5.0, 0.0), true));
        assert!(p.contains(Point2::new(5.0, 0.0), false));
        // Outside
        assert!(!p.contains(Point2::new(15.0, 5.0), true));
        assert!(!p.contains(Point2::new(15.0, 5.0), false));
    }

    #[test]
    fn test_contains_with_hole() {
        let p = Polygon::with_holes(
            vec![
                Point2::new(0.0, 0.0),
                Point2::new(10.0, 0.0),
                Point2::new(10.0, 10.0),
                Point2::new(0.0, 10.0),
            ],
            vec![vec![
                Point2::new(4.0, 4.0),
                Point2::new(6.0, 4.0),
                Point2::new(6.0, 6.0),
                Point2::new(4.0, 6.0),
            ]],
        );
        // In the solid part
        assert!(p.contains(Point2::new(2.0, 2.0), true));
        // In the hole
        assert!(!p.contains(Point2::new(5.0, 5.0), true));
        assert!(!p.contains(Point2::new(5.0, 5.0), false));
        // On the hole boundary
        assert!(!p.contains(Point2::new(5.0, 4.0), true));
        assert!(p.contains(Point2::new(5.0, 4.0), false));
    }

    #[test]
    fn test_bbox_reject() {
        let p = square(0.0, 0.0, 1.0);
        assert!(!p.contains(Point2::new(100.0, 100.0), false));
    }

    #[test]
    fn test_area_with_hole() {
        let p = Polygon::with_holes(
            vec![
                Point2::new(0.0, 0.0),
                Point2::new(10.0, 0.0),
                Point2::new(10.0, 10.0),
                Point2::new(0.0, 10.0),
            ],
            vec![vec![
                Point2::new(4.0, 4.0),
                Point2::new(6.0, 4.0),
                Point2::new(6.0, 6.0),
                Point2::new(4.0, 6.0),
            ]],
        );
        assert_relative_eq!(p.area(), 96.0);
    }

    #[test]
    fn test_intersects_segment_crossing() {
        let p = square(0.0, 0.0, 10.0);
        let seg = Segment2::from_coords(-5.0, 5.0, 15.0, 5.0);
        assert!(p.intersects_segment(seg, false));
        assert!(p.intersects_segment(seg, true));
    }

    #[test]
    fn test_intersects_segment_grazing_not_strict() {
        let p = square(0.0, 0.0, 10.0);
        // Runs exactly along the bottom edge
        let seg = Segment2::from_coords(-5.0, 0.0, 15.0, 0.0);
        assert!(p.intersects_segment(seg, false));
        assert!(!p.intersects_segment(seg, true));
    }

    #[test]
    fn test_intersects_segment_outside() {
        let p = square(0.0, 0.0, 10.0);
        let seg = Segment2::from_coords(-5.0, 20.0, 15.0, 20.0);
        assert!(!p.intersects_segment(seg, false));
        assert!(!p.intersects_segment(seg, true));
    }

    #[test]
    fn test_intersects_segment_fully_inside() {
        let p = square(0.0, 0.0, 10.0);
        let seg = Segment2::from_coords(2.0, 2.0, 8.0, 8.0);
        assert!(p.intersects_segment(seg, false));
        assert!(p.intersects_segment(seg, true));
    }

    #[test]
    fn test_segment_intersections_points() {
        let p = square(0.0, 0.0, 10.0);
        let seg = Segment2::from_coords(-5.0, 5.0, 15.0, 5.0);
        let pts = p.segment_intersections(seg);
        assert_eq!(pts.len(), 2);
        assert_relative_eq!(pts[0].x, 0.0, epsilon = 1e-9);
        assert_relative_eq!(pts[1].x, 10.0, epsilon = 1e-9);
    }

    #[test]
    fn test_is_simple() {
        let p = square(0.0, 0.0, 10.0);
        assert!(p.is_simple());

        // Bowtie
        let bow = Polygon::new(vec![
            Point2::new(0.0, 0.0),
            Point2::new(10.0, 10.0),
            Point2::new(10.0, 0.0),
            Point2::new(0.0, 10.0),
        ]);
        assert!(!bow.is_simple());
    }

    #[test]
    fn test_empty_polygon() {
        let p: Polygon<f64> = Polygon::empty();
        assert!(p.is_empty());
        assert!(p.bounds().is_none());
        assert!(!p.contains(Point2::new(0.0, 0.0), false));
    }
}
