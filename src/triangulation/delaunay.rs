//! Delaunay triangulation using the Bowyer-Watson algorithm.
//!
//! Incremental insertion: start from a super-triangle containing every
//! point, insert points one at a time re-triangulating the cavity of
//! circumcircle-violating triangles, then discard triangles touching the
//! super-triangle. The in-circumcircle test uses the adaptive exact kernel,
//! so duplicate and collinear sites cannot corrupt the topology.

use crate::predicates::{in_circumcircle, orient2d, Orientation};
use crate::primitives::Point2;
use num_traits::Float;
use std::collections::HashMap;

/// A triangle represented by indices into a point array.
///
/// Vertices are stored in counter-clockwise order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Triangle {
    pub a: usize,
    pub b: usize,
    pub c: usize,
}

impl Triangle {
    /// Creates a new triangle from vertex indices.
    #[inline]
    pub fn new(a: usize, b: usize, c: usize) -> Self {
        Self { a, b, c }
    }

    /// Returns the three edges of this triangle as pairs of indices.
    #[inline]
    pub fn edges(&self) -> [(usize, usize); 3] {
        [(self.a, self.b), (self.b, self.c), (self.c, self.a)]
    }

    /// Checks if the triangle uses a specific vertex index.
    #[inline]
    pub fn contains_vertex(&self, v: usize) -> bool {
        self.a == v || self.b == v || self.c == v
    }
}

/// An undirected edge key, normalized so the smaller index comes first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct EdgeKey(pub usize, pub usize);

impl EdgeKey {
    pub(crate) fn new(a: usize, b: usize) -> Self {
        if a < b {
            EdgeKey(a, b)
        } else {
            EdgeKey(b, a)
        }
    }
}

/// Computes the Delaunay triangulation of a set of points.
///
/// Returns triangles as index triples in counter-clockwise orientation.
/// Fewer than 3 points, or an entirely collinear input, yields an empty
/// triangulation.
pub fn delaunay_triangulation<F: Float>(points: &[Point2<F>]) -> Vec<Triangle> {
    if points.len() < 3 {
        return Vec::new();
    }

    let mut min = points[0];
    let mut max = points[0];
    for p in points.iter().skip(1) {
        min.x = min.x.min(p.x);
        min.y = min.y.min(p.y);
        max.x = max.x.max(p.x);
        max.y = max.y.max(p.y);
    }

    // Super-triangle comfortably containing every point.
    let two = F::from(2.0).unwrap();
    let margin = F::from(10.0).unwrap();
    let dx = max.x - min.x;
    let dy = max.y - min.y;
    let delta = dx.max(dy).max(F::one());
    let mid_x = (min.x + max.x) / two;
    let mid_y = (min.y + max.y) / two;

    let n = points.len();
    let mut all_points: Vec<Point2<F>> = points.to_vec();
    all_points.push(Point2::new(mid_x - margin * delta, mid_y - delta));
    all_points.push(Point2::new(mid_x + margin * delta, mid_y - delta));
    all_points.push(Point2::new(mid_x, mid_y + margin * delta));

    let mut triangles: Vec<Triangle> = vec![Triangle::new(n, n + 1, n + 2)];

    for (i, &p) in points.iter().enumerate() {
        // Triangles whose circumcircle contains the new point form the
        // cavity to re-triangulate.
        let mut bad: Vec<usize> = Vec::new();
        for (ti, tri) in triangles.iter().enumerate() {
            if in_circumcircle(p, all_points[tri.a], all_points[tri.b], all_points[tri.c]) {
                bad.push(ti);
            }
        }

        // The cavity boundary is every edge used by exactly one bad triangle.
        let mut edge_count: HashMap<EdgeKey, usize> = HashMap::new();
        for &ti in &bad {
            for (ea, eb) in triangles[ti].edges() {
                *edge_count.entry(EdgeKey::new(ea, eb)).or_insert(0) += 1;
            }
        }

        let boundary: Vec<EdgeKey> = edge_count
            .into_iter()
            .filter(|(_, count)| *count == 1)
            .map(|(edge, _)| edge)
            .collect();

        bad.sort_unstable();
        for &ti in bad.iter().rev() {
            triangles.swap_remove(ti);
        }

        for EdgeKey(ea, eb) in boundary {
            let a = all_points[ea];
            let b = all_points[eb];
            match orient2d(a, b, p, F::zero()) {
                Orientation::CounterClockwise => triangles.push(Triangle::new(ea, eb, i)),
                Orientation::Clockwise => triangles.push(Triangle::new(eb, ea, i)),
                Orientation::Collinear => {} // degenerate sliver, skip
            }
        }
    }

    triangles.retain(|tri| {
        !tri.contains_vertex(n) && !tri.contains_vertex(n + 1) && !tri.contains_vertex(n + 2)
    });

    triangles
}
