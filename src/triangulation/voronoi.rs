//! Finite Voronoi edges as the dual of the Delaunay triangulation.
//!
//! Each Delaunay triangle's circumcenter is a Voronoi vertex; every
//! Delaunay edge shared by two triangles contributes the Voronoi edge
//! between their circumcenters. Hull edges would contribute unbounded rays;
//! callers that need a bounded diagram surround their sites with a frame so
//! only finite edges matter, and rays are not produced here.

use super::delaunay::{delaunay_triangulation, EdgeKey};
use crate::primitives::{Point2, Segment2};
use num_traits::Float;
use std::collections::HashMap;

/// Computes the circumcenter of a triangle.
///
/// The circumcenter is equidistant from all three vertices. Collinear
/// input returns `None`.
pub fn circumcenter<F: Float>(a: Point2<F>, b: Point2<F>, c: Point2<F>) -> Option<Point2<F>> {
    let two = F::from(2.0).unwrap();

    let d = two * (a.x * (b.y - c.y) + b.x * (c.y - a.y) + c.x * (a.y - b.y));
    if d.abs() < F::epsilon() {
        return None;
    }

    let aa = a.x * a.x + a.y * a.y;
    let bb = b.x * b.x + b.y * b.y;
    let cc = c.x * c.x + c.y * c.y;

    let ux = (aa * (b.y - c.y) + bb * (c.y - a.y) + cc * (a.y - b.y)) / d;
    let uy = (aa * (c.x - b.x) + bb * (a.x - c.x) + cc * (b.x - a.x)) / d;

    Some(Point2::new(ux, uy))
}

/// Computes the finite edges of the Voronoi diagram of the given sites.
///
/// Returns one segment per interior Delaunay edge, connecting the
/// circumcenters of its two adjacent triangles. Degenerate edges (adjacent
/// circumcenters closer than `eps`) are dropped.
pub fn voronoi_edges<F: Float>(sites: &[Point2<F>], eps: F) -> Vec<Segment2<F>> {
    let triangles = delaunay_triangulation(sites);
    if triangles.is_empty() {
        return Vec::new();
    }

    let centers: Vec<Option<Point2<F>>> = triangles
        .iter()
        .map(|t| circumcenter(sites[t.a], sites[t.b], sites[t.c]))
        .collect();

    let mut edge_triangles: HashMap<EdgeKey, Vec<usize>> = HashMap::new();
    for (ti, tri) in triangles.iter().enumerate() {
        for (ea, eb) in tri.edges() {
            edge_triangles
                .entry(EdgeKey::new(ea, eb))
                .or_default()
                .push(ti);
        }
    }

    let mut edges = Vec::new();
    for (_, tris) in edge_triangles {
        if tris.len() != 2 {
            continue; // hull edge: unbounded ray, not produced
        }
        if let (Some(c1), Some(c2)) = (centers[tris[0]], centers[tris[1]]) {
            if c1.distance(c2) > eps {
                edges.push(Segment2::new(c1, c2));
            }
        }
    }

    edges
}
