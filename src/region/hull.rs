//! Convex hull and convexity tests.

use crate::predicates::{orient2d, signed_area2, Orientation};
use crate::primitives::Point2;
use num_traits::Float;

/// Computes the convex hull of a set of points using Andrew's monotone
/// chain algorithm.
///
/// Returns the hull vertices in counter-clockwise order; the first and last
/// points are not repeated (the hull is implicitly closed). Collinear points
/// along hull edges are excluded.
///
/// Time: O(n log n). Returns fewer than 3 points when the input is empty,
/// a single point, or entirely collinear.
pub fn convex_hull<F: Float>(points: &[Point2<F>]) -> Vec<Point2<F>> {
    if points.len() < 3 {
        return points.to_vec();
    }

    let mut sorted: Vec<Point2<F>> = points.to_vec();
    sorted.sort_by(|a, b| {
        a.x.partial_cmp(&b.x)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.y.partial_cmp(&b.y).unwrap_or(std::cmp::Ordering::Equal))
    });
    sorted.dedup_by(|a, b| a.x == b.x && a.y == b.y);

    if sorted.len() < 3 {
        return sorted;
    }

    let mut lower: Vec<Point2<F>> = Vec::new();
    for &p in &sorted {
        while lower.len() >= 2
            && signed_area2(lower[lower.len() - 2], lower[lower.len() - 1], p) <= F::zero()
        {
            lower.pop();
        }
        lower.push(p);
    }

    let mut upper: Vec<Point2<F>> = Vec::new();
    for &p in sorted.iter().rev() {
        while upper.len() >= 2
            && signed_area2(upper[upper.len() - 2], upper[upper.len() - 1], p) <= F::zero()
        {
            upper.pop();
        }
        upper.push(p);
    }

    // The endpoints of each chain are repeated in the other chain.
    lower.pop();
    upper.pop();
    lower.extend(upper);
    lower
}

/// Tests whether a ring of vertices forms a convex polygon.
///
/// Collinear triples are tolerated; the test fails only when two turns have
/// opposite signs.
pub fn is_convex<F: Float>(ring: &[Point2<F>]) -> bool {
    if ring.len() < 3 {
        return true;
    }

    let n = ring.len();
    let mut seen: Option<Orientation> = None;

    for i in 0..n {
        let a = ring[i];
        let b = ring[(i + 1) % n];
        let c = ring[(i + 2) % n];

        match orient2d(a, b, c, F::epsilon()) {
            Orientation::Collinear => {}
            turn => match seen {
                None => seen = Some(turn),
                Some(s) if s != turn => return false,
                _ => {}
            },
        }
    }

    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hull_excludes_interior() {
        let points: Vec<Point2<f64>> = vec![
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(0.5, 0.5),
            Point2::new(1.0, 1.0),
            Point2::new(0.0, 1.0),
        ];
        let hull = convex_hull(&points);
        assert_eq!(hull.len(), 4);
        assert!(!hull.contains(&Point2::new(0.5, 0.5)));
    }

    #[test]
    fn test_hull_is_ccw() {
        let points: Vec<Point2<f64>> = vec![
            Point2::new(0.0, 0.0),
            Point2::new(2.0, 0.0),
            Point2::new(2.0, 2.0),
            Point2::new(0.0, 2.0),
            Point2::new(1.0, 1.0),
        ];
        let hull = convex_hull(&points);
        assert!(super::super::polygon::ring_signed_area(&hull) > 0.0);
    }

    #[test]
    fn test_hull_collinear_input() {
        let points: Vec<Point2<f64>> = vec![
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(2.0, 0.0),
        ];
        let hull = convex_hull(&points);
        assert_eq!(hull.len(), 2);
    }

    #[test]
    fn test_is_convex() {
        let square: Vec<Point2<f64>> = vec![
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(1.0, 1.0),
            Point2::new(0.0, 1.0),
        ];
        assert!(is_convex(&square));

        let dart: Vec<Point2<f64>> = vec![
            Point2::new(0.0, 0.0),
            Point2::new(2.0, 0.0),
            Point2::new(1.0, 0.5),
            Point2::new(1.0, 2.0),
        ];
        assert!(!is_convex(&dart));
    }

    #[test]
    fn test_is_convex_with_collinear_vertex() {
        let ring: Vec<Point2<f64>> = vec![
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(2.0, 0.0),
            Point2::new(2.0, 2.0),
            Point2::new(0.0, 2.0),
        ];
        assert!(is_convex(&ring));
    }
}
