//! Minkowski sum of polygons.
//!
//! Used to inflate obstacles by the agent's footprint (reflected through the
//! origin) so that path search can treat the agent as a point.

use crate::predicates::{signed_area2, Orientation};
use crate::primitives::Point2;
use num_traits::Float;

use super::hull::is_convex;
use super::polygon::Polygon;

/// Computes the Minkowski sum of two polygons.
///
/// Both operands must be hole-free, simple, counter-clockwise polygons;
/// violating that is a caller contract error (checked in debug builds only,
/// best-effort in release). Convex operands use the linear-time edge-merge
/// construction; non-convex operands are ear-clipped into triangles whose
/// pairwise sums are unioned.
pub fn minkowski_sum<F: Float>(a: &Polygon<F>, b: &Polygon<F>) -> Polygon<F> {
    debug_assert!(
        a.holes().is_empty() && b.holes().is_empty(),
        "minkowski_sum operands must be hole-free"
    );
    debug_assert!(
        a.is_simple() && b.is_simple(),
        "minkowski_sum operands must be simple polygons"
    );

    if a.is_empty() {
        return b.clone();
    }
    if b.is_empty() {
        return a.clone();
    }

    if is_convex(a.outer()) && is_convex(b.outer()) {
        return Polygon::new(convex_sum(a.outer(), b.outer()));
    }

    let tris_a = triangulate(a.outer());
    let tris_b = triangulate(b.outer());

    let mut merged: Vec<Polygon<F>> = Vec::new();
    for ta in &tris_a {
        for tb in &tris_b {
            let piece = Polygon::new(convex_sum(ta, tb));
            if piece.is_empty() {
                continue;
            }
            // Merge the piece into the accumulated components; pieces from
            // adjacent triangles overlap, so this converges to one region.
            let mut united = piece;
            let mut rest = Vec::with_capacity(merged.len());
            for existing in merged.drain(..) {
                if !united.unite(&existing) {
                    rest.push(existing);
                }
            }
            rest.push(united);
            merged = rest;
        }
    }

    debug_assert!(merged.len() <= 1, "minkowski_sum produced a disconnected result");

    // In release, fall back to the largest component.
    merged
        .into_iter()
        .max_by(|p, q| {
            p.area()
                .partial_cmp(&q.area())
                .unwrap_or(std::cmp::Ordering::Equal)
        })
        .unwrap_or_else(Polygon::empty)
}

/// Reflects a vertex list through the origin.
///
/// The resulting winding is reversed; [`Polygon::new`] restores
/// counter-clockwise orientation.
pub fn reflected<F: Float>(points: &[Point2<F>]) -> Vec<Point2<F>> {
    points.iter().map(|p| p.reflected()).collect()
}

/// Minkowski sum of two convex CCW rings by merging their edge fans in
/// angular order.
fn convex_sum<F: Float>(a: &[Point2<F>], b: &[Point2<F>]) -> Vec<Point2<F>> {
    if a.len() == 1 {
        return b
            .iter()
            .map(|p| Point2::new(p.x + a[0].x, p.y + a[0].y))
            .collect();
    }
    if b.len() == 1 {
        return a
            .iter()
            .map(|p| Point2::new(p.x + b[0].x, p.y + b[0].y))
            .collect();
    }

    let n = a.len();
    let m = b.len();
    let sa = bottom_index(a);
    let sb = bottom_index(b);

    let mut result = Vec::with_capacity(n + m);
    let mut i = 0;
    let mut j = 0;

    while i < n || j < m {
        let pa = a[(sa + i) % n];
        let pb = b[(sb + j) % m];
        result.push(Point2::new(pa.x + pb.x, pa.y + pb.y));

        if i >= n {
            j += 1;
            continue;
        }
        if j >= m {
            i += 1;
            continue;
        }

        let ea = a[(sa + i + 1) % n] - pa;
        let eb = b[(sb + j + 1) % m] - pb;
        let cross = ea.cross(eb);

        if cross > F::zero() {
            i += 1;
        } else if cross < F::zero() {
            j += 1;
        } else {
            i += 1;
            j += 1;
        }
    }

    result
}

/// Index of the bottom-most (then left-most) vertex.
fn bottom_index<F: Float>(ring: &[Point2<F>]) -> usize {
    let mut idx = 0;
    for i in 1..ring.len() {
        if ring[i].y < ring[idx].y || (ring[i].y == ring[idx].y && ring[i].x < ring[idx].x) {
            idx = i;
        }
    }
    idx
}

/// Ear-clipping triangulation of a simple CCW ring.
pub(crate) fn triangulate<F: Float>(ring: &[Point2<F>]) -> Vec<Vec<Point2<F>>> {
    if ring.len() < 3 {
        return Vec::new();
    }
    if ring.len() == 3 {
        return vec![ring.to_vec()];
    }

    let mut result = Vec::new();
    let mut remaining: Vec<Point2<F>> = ring.to_vec();

    while remaining.len() > 3 {
        let n = remaining.len();
        let mut clipped = false;

        for i in 0..n {
            let prev = if i == 0 { n - 1 } else { i - 1 };
            let next = (i + 1) % n;

            if is_ear(&remaining, prev, i, next) {
                result.push(vec![remaining[prev], remaining[i], remaining[next]]);
                remaining.remove(i);
                clipped = true;
                break;
            }
        }

        if !clipped {
            // Numerically stuck (near-degenerate ring); clip unconditionally
            // so the loop always terminates.
            result.push(vec![remaining[0], remaining[1], remaining[2]]);
            remaining.remove(1);
        }
    }

    result.push(remaining);
    result
}

fn is_ear<F: Float>(ring: &[Point2<F>], prev: usize, i: usize, next: usize) -> bool {
    let a = ring[prev];
    let b = ring[i];
    let c = ring[next];

    if signed_area2(a, b, c) <= F::zero() {
        return false;
    }

    for (j, &p) in ring.iter().enumerate() {
        if j == prev || j == i || j == next {
            continue;
        }
        if point_in_triangle(p, a, b, c) {
            return false;
        }
    }

    true
}

fn point_in_triangle<F: Float>(p: Point2<F>, a: Point2<F>, b: Point2<F>, c: Point2<F>) -> bool {
    let o1 = crate::predicates::orient2d(a, b, p, F::zero());
    let o2 = crate::predicates::orient2d(b, c, p, F::zero());
    let o3 = crate::predicates::orient2d(c, a, p, F::zero());
    o1 != Orientation::Clockwise && o2 != Orientation::Clockwise && o3 != Orientation::Clockwise
}
