//! Shadow polygons: the region occluded behind an obstacle as seen from a
//! viewpoint.

use crate::primitives::Point2;
use crate::region::{convex_hull, is_convex, Polygon};
use num_traits::Float;

/// Projects a point away from the viewpoint to a distance far outside the
/// scene.
fn project<F: Float>(p: Point2<F>, viewpoint: Point2<F>, distance: F) -> Point2<F> {
    match (p - viewpoint).normalize() {
        Some(dir) => p + dir * distance,
        None => p, // vertex coincides with the viewpoint
    }
}

/// Constructs the shadow cast by an obstacle from a viewpoint.
///
/// For a convex obstacle the shadow is the convex hull of the original
/// vertices and their projections. For a non-convex obstacle each edge
/// sweeps a quadrilateral toward its projection, and the union of all
/// sweeps with the obstacle itself forms the shadow.
///
/// `projection_distance` must exceed any distance that matters in the
/// scene; everything beyond it is treated as infinitely far.
pub(crate) fn shadow_polygon<F: Float>(
    obstacle: &Polygon<F>,
    viewpoint: Point2<F>,
    projection_distance: F,
) -> Polygon<F> {
    let ring = obstacle.outer();
    if ring.len() < 3 {
        return Polygon::empty();
    }

    let projected: Vec<Point2<F>> = ring
        .iter()
        .map(|&p| project(p, viewpoint, projection_distance))
        .collect();

    if is_convex(ring) {
        let mut all: Vec<Point2<F>> = ring.to_vec();
        all.extend_from_slice(&projected);
        return Polygon::new(convex_hull(&all));
    }

    // Non-convex: union the obstacle with the quadrilateral swept by each
    // edge toward its projection.
    let n = ring.len();
    let mut shadow = obstacle.clone();

    for i in 0..n {
        let j = (i + 1) % n;
        let corners = [ring[i], projected[i], projected[j], ring[j]];

        let mut quad = Polygon::new(corners.to_vec());
        if !quad.is_simple() {
            // Projections crossed over; the hull covers the same sweep.
            quad = Polygon::new(convex_hull(&corners));
        }
        if quad.is_empty() {
            continue;
        }

        shadow.unite(&quad);
    }

    shadow
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(x: f64, y: f64, size: f64) -> Polygon<f64> {
        Polygon::new(vec![
            Point2::new(x, y),
            Point2::new(x + size, y),
            Point2::new(x + size, y + size),
            Point2::new(x, y + size),
        ])
    }

    #[test]
    fn test_convex_shadow_contains_obstacle_and_far_side() {
        let obstacle = square(10.0, -5.0, 10.0);
        let shadow = shadow_polygon(&obstacle, Point2::new(0.0, 0.0), 5000.0);

        // The obstacle itself is occluded
        assert!(shadow.contains(Point2::new(15.0, 0.0), false));
        // Points directly behind it are occluded
        assert!(shadow.contains(Point2::new(100.0, 0.0), false));
        assert!(shadow.contains(Point2::new(500.0, 0.0), false));
        // The viewpoint and points beside the obstacle are not
        assert!(!shadow.contains(Point2::new(0.0, 0.0), false));
        assert!(!shadow.contains(Point2::new(15.0, 100.0), false));
    }

    #[test]
    fn test_shadow_widens_behind_obstacle() {
        let obstacle = square(10.0, -5.0, 10.0);
        let shadow = shadow_polygon(&obstacle, Point2::new(0.0, 0.0), 5000.0);

        // Just past the obstacle the umbra is barely wider than the square
        assert!(shadow.contains(Point2::new(25.0, 0.0), false));
        // Far behind, the cone has spread well beyond the square's extent
        assert!(shadow.contains(Point2::new(400.0, 100.0), false));
    }

    #[test]
    fn test_concave_shadow_covers_pocket() {
        // A U-shape opening away from the viewer: the pocket between the
        // arms sits behind the solid web and is occluded.
        let u = Polygon::new(vec![
            Point2::new(10.0, -10.0),
            Point2::new(30.0, -10.0),
            Point2::new(30.0, -6.0),
            Point2::new(14.0, -6.0),
            Point2::new(14.0, 6.0),
            Point2::new(30.0, 6.0),
            Point2::new(30.0, 10.0),
            Point2::new(10.0, 10.0),
        ]);
        assert!(!is_convex(u.outer()));

        let shadow = shadow_polygon(&u, Point2::new(0.0, 0.0), 5000.0);
        // The pocket interior is behind the U's arms
        assert!(shadow.contains(Point2::new(20.0, 0.0), false));
        // Far behind the U
        assert!(shadow.contains(Point2::new(300.0, 0.0), false));
        // The viewpoint side stays clear
        assert!(!shadow.contains(Point2::new(2.0, 0.0), false));
    }

    #[test]
    fn test_shadow_empty_obstacle() {
        let empty: Polygon<f64> = Polygon::empty();
        assert!(shadow_polygon(&empty, Point2::new(0.0, 0.0), 5000.0).is_empty());
    }
}
