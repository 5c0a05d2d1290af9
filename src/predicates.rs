//! Geometric predicates with explicit tolerance.
//!
//! Sign decisions go through the adaptive-precision kernels of the `robust`
//! crate, so coincident, collinear, and near-degenerate input can never
//! produce an inconsistent orientation. The tolerance parameter only widens
//! the band that is *reported* as collinear; it never flips a sign.

use crate::primitives::{Point2, Segment2};
use num_traits::Float;
use robust::Coord;

/// Result of an orientation test.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    /// Points are counter-clockwise (positive area).
    CounterClockwise,
    /// Points are clockwise (negative area).
    Clockwise,
    /// Points are collinear (within tolerance).
    Collinear,
}

#[inline]
fn coord<F: Float>(p: Point2<F>) -> Coord<f64> {
    let (x, y) = p.to_f64();
    Coord { x, y }
}

/// Computes the orientation of three points.
///
/// Returns the orientation of the triangle formed by points `a`, `b`, `c`:
/// - `CounterClockwise` if `c` is to the left of the line from `a` to `b`
/// - `Clockwise` if `c` is to the right of the line from `a` to `b`
/// - `Collinear` if `c` is on the line (within `eps` tolerance)
///
/// `eps` is compared against the exact value of twice the signed triangle
/// area; pass `F::zero()` for an exact test.
#[inline]
pub fn orient2d<F: Float>(a: Point2<F>, b: Point2<F>, c: Point2<F>, eps: F) -> Orientation {
    let det = robust::orient2d(coord(a), coord(b), coord(c));
    let eps = eps.to_f64().unwrap_or(0.0);

    if det > eps {
        Orientation::CounterClockwise
    } else if det < -eps {
        Orientation::Clockwise
    } else {
        Orientation::Collinear
    }
}

/// Twice the signed area of the triangle `a`, `b`, `c`, evaluated exactly.
///
/// Positive for counter-clockwise triangles.
#[inline]
pub fn signed_area2<F: Float>(a: Point2<F>, b: Point2<F>, c: Point2<F>) -> F {
    F::from(robust::orient2d(coord(a), coord(b), coord(c))).unwrap()
}

/// Tests if a point lies strictly inside the circumcircle of the
/// counter-clockwise triangle `a`, `b`, `c`.
#[inline]
pub fn in_circumcircle<F: Float>(p: Point2<F>, a: Point2<F>, b: Point2<F>, c: Point2<F>) -> bool {
    robust::incircle(coord(a), coord(b), coord(c), coord(p)) > 0.0
}

/// Checks if a point lies on a line segment within tolerance.
///
/// Returns `true` if the point `p` is within distance `eps` of the segment.
#[inline]
pub fn point_on_segment<F: Float>(p: Point2<F>, segment: Segment2<F>, eps: F) -> bool {
    segment.distance_squared_to_point(p) <= eps * eps
}

/// Result of a segment intersection test.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SegmentIntersection<F> {
    /// Segments do not intersect.
    None,
    /// Segments intersect at a single point.
    Point {
        /// The intersection point.
        point: Point2<F>,
        /// Parameter along first segment (0 = start, 1 = end).
        t1: F,
        /// Parameter along second segment (0 = start, 1 = end).
        t2: F,
    },
    /// Segments overlap along a line (collinear and overlapping).
    Overlapping {
        /// Start of the overlapping region, as a parameter on the first
        /// segment.
        t_start: F,
        /// End of the overlapping region, as a parameter on the first
        /// segment.
        t_end: F,
    },
}

/// Tests if two line segments intersect, with tolerance.
///
/// Returns information about the intersection:
/// - `None` if segments don't intersect
/// - `Point` if they intersect at a single point (within tolerance)
/// - `Overlapping` if they are collinear and overlap along a range
pub fn segments_intersect<F: Float>(
    s1: Segment2<F>,
    s2: Segment2<F>,
    eps: F,
) -> SegmentIntersection<F> {
    let d1 = s1.direction();
    let d2 = s2.direction();
    let cross = d1.cross(d2);

    let d = s2.start - s1.start;
    let eps_sq = eps * eps;

    if cross.abs() <= eps {
        // Parallel segments - check if collinear
        let dist_sq = s1.distance_squared_to_point(s2.start).min(
            s1.distance_squared_to_point(s2.end)
                .min(s2.distance_squared_to_point(s1.start)),
        );
        if dist_sq > eps_sq {
            return SegmentIntersection::None;
        }

        let len_sq = d1.magnitude_squared();
        if len_sq <= eps_sq {
            // s1 is degenerate (a point)
            if point_on_segment(s1.start, s2, eps) {
                let (_, t2) = s2.closest_point(s1.start);
                return SegmentIntersection::Point {
                    point: s1.start,
                    t1: F::zero(),
                    t2,
                };
            }
            return SegmentIntersection::None;
        }

        // Project s2 endpoints onto s1's line
        let t2_start = (s2.start - s1.start).dot(d1) / len_sq;
        let t2_end = (s2.end - s1.start).dot(d1) / len_sq;

        let (t2_min, t2_max) = if t2_start <= t2_end {
            (t2_start, t2_end)
        } else {
            (t2_end, t2_start)
        };

        // Find overlap with [0, 1]
        let overlap_start = t2_min.max(F::zero());
        let overlap_end = t2_max.min(F::one());

        if overlap_start > overlap_end + eps {
            return SegmentIntersection::None;
        }

        if (overlap_end - overlap_start).abs() <= eps {
            // Single point overlap
            let point = s1.point_at(overlap_start);
            let (_, t2) = s2.closest_point(point);
            return SegmentIntersection::Point {
                point,
                t1: overlap_start,
                t2,
            };
        }

        return SegmentIntersection::Overlapping {
            t_start: overlap_start,
            t_end: overlap_end,
        };
    }

    // Non-parallel segments. Solve s1.start + t1*d1 = s2.start + t2*d2
    // by Cramer's rule.
    let t1 = d.cross(d2) / cross;
    let t2 = d.cross(d1) / cross;

    let neg_eps = -eps;
    let one_plus_eps = F::one() + eps;

    if t1 >= neg_eps && t1 <= one_plus_eps && t2 >= neg_eps && t2 <= one_plus_eps {
        let t1_clamped = t1.max(F::zero()).min(F::one());
        let point = s1.point_at(t1_clamped);

        SegmentIntersection::Point {
            point,
            t1: t1_clamped,
            t2: t2.max(F::zero()).min(F::one()),
        }
    } else {
        SegmentIntersection::None
    }
}
