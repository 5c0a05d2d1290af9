//! Boolean set operations on polygonal regions.
//!
//! The implementation classifies boundary fragments rather than walking an
//! intersection graph: every ring edge of one operand is split at its
//! crossings with the other operand, each fragment is classified by its
//! midpoint (inside, outside, or on the other boundary), the fragments the
//! operation keeps are selected, and the survivors are stitched back into
//! closed rings. Counter-clockwise result rings become outer boundaries,
//! clockwise rings become holes of the outer that contains them.
//!
//! The midpoint classification sidesteps the degenerate-crossing bookkeeping
//! of traversal-based clippers: identical operands, shared collinear edges,
//! and containment all fall out of the same three fragment classes.

use crate::predicates::{point_on_segment, segments_intersect, SegmentIntersection};
use crate::primitives::{Point2, Segment2};
use num_traits::Float;

use super::polygon::{ring_signed_area, weld_eps, Polygon};

/// The boolean operation to perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum BooleanOp {
    Union,
    Intersection,
    Difference,
}

/// A directed piece of a boundary ring.
#[derive(Debug, Clone, Copy)]
struct Fragment<F> {
    start: Point2<F>,
    end: Point2<F>,
}

impl<F: Float> Fragment<F> {
    fn reversed(self) -> Self {
        Self {
            start: self.end,
            end: self.start,
        }
    }
}

/// Where a fragment midpoint sits relative to the other operand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FragmentClass {
    Inside,
    Outside,
    /// On the other boundary, running in the same direction as it.
    SharedSame,
    /// On the other boundary, running against it.
    SharedOpposite,
}

/// Performs a boolean operation between two regions.
///
/// Returns zero or more disjoint polygons (with holes).
pub(crate) fn boolean_op<F: Float>(
    a: &Polygon<F>,
    b: &Polygon<F>,
    op: BooleanOp,
) -> Vec<Polygon<F>> {
    if a.is_empty() {
        return match op {
            BooleanOp::Union if !b.is_empty() => vec![b.clone()],
            _ => Vec::new(),
        };
    }
    if b.is_empty() {
        return match op {
            BooleanOp::Intersection => Vec::new(),
            _ => vec![a.clone()],
        };
    }

    // Bounding-box reject: disjoint boxes mean disjoint regions.
    if let (Some(bb_a), Some(bb_b)) = (a.bounds(), b.bounds()) {
        if !bb_a.intersects(bb_b) {
            return match op {
                BooleanOp::Union => vec![a.clone(), b.clone()],
                BooleanOp::Intersection => Vec::new(),
                BooleanOp::Difference => vec![a.clone()],
            };
        }
    }

    let frags_a = classified_fragments(a, b);
    let frags_b = classified_fragments(b, a);

    let mut keep: Vec<Fragment<F>> = Vec::new();

    match op {
        BooleanOp::Union => {
            keep.extend(select(&frags_a, FragmentClass::Outside, false));
            keep.extend(select(&frags_b, FragmentClass::Outside, false));
            keep.extend(select(&frags_a, FragmentClass::SharedSame, false));
        }
        BooleanOp::Intersection => {
            keep.extend(select(&frags_a, FragmentClass::Inside, false));
            keep.extend(select(&frags_b, FragmentClass::Inside, false));
            keep.extend(select(&frags_a, FragmentClass::SharedSame, false));
        }
        BooleanOp::Difference => {
            keep.extend(select(&frags_a, FragmentClass::Outside, false));
            keep.extend(select(&frags_b, FragmentClass::Inside, true));
            keep.extend(select(&frags_a, FragmentClass::SharedOpposite, false));
        }
    }

    let rings = stitch(keep);
    assemble(rings)
}

fn select<F: Float>(
    frags: &[(Fragment<F>, FragmentClass)],
    class: FragmentClass,
    reversed: bool,
) -> Vec<Fragment<F>> {
    frags
        .iter()
        .filter(|(_, c)| *c == class)
        .map(|(f, _)| if reversed { f.reversed() } else { *f })
        .collect()
}

/// Splits every ring edge of `region` at its crossings with `other` and
/// classifies the resulting fragments.
fn classified_fragments<F: Float>(
    region: &Polygon<F>,
    other: &Polygon<F>,
) -> Vec<(Fragment<F>, FragmentClass)> {
    let eps = weld_eps::<F>();
    let other_edges: Vec<Segment2<F>> = other.edges().collect();
    let half = F::from(0.5).unwrap();

    let mut out = Vec::new();

    for edge in region.edges() {
        let len = edge.length();
        if len <= eps {
            continue;
        }

        let mut params: Vec<F> = vec![F::zero(), F::one()];
        for &oe in &other_edges {
            match segments_intersect(edge, oe, eps) {
                SegmentIntersection::Point { t1, .. } => params.push(t1),
                SegmentIntersection::Overlapping { t_start, t_end } => {
                    params.push(t_start);
                    params.push(t_end);
                }
                SegmentIntersection::None => {}
            }
        }

        params.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
        params.dedup_by(|a, b| (*a - *b).abs() * len <= eps);

        for pair in params.windows(2) {
            let frag = Fragment {
                start: edge.point_at(pair[0]),
                end: edge.point_at(pair[1]),
            };
            if frag.start.distance(frag.end) <= eps {
                continue;
            }

            let mid = edge.point_at((pair[0] + pair[1]) * half);
            let class = classify_midpoint(mid, frag, &other_edges, other, eps);
            out.push((frag, class));
        }
    }

    out
}

fn classify_midpoint<F: Float>(
    mid: Point2<F>,
    frag: Fragment<F>,
    other_edges: &[Segment2<F>],
    other: &Polygon<F>,
    eps: F,
) -> FragmentClass {
    for &oe in other_edges {
        if point_on_segment(mid, oe, eps) {
            let same = (frag.end - frag.start).dot(oe.direction()) >= F::zero();
            return if same {
                FragmentClass::SharedSame
            } else {
                FragmentClass::SharedOpposite
            };
        }
    }

    if other.contains(mid, false) {
        FragmentClass::Inside
    } else {
        FragmentClass::Outside
    }
}

/// Chains fragments end-to-start into closed rings.
///
/// Fragments whose chain cannot be closed (numerical slivers) are dropped.
fn stitch<F: Float>(mut frags: Vec<Fragment<F>>) -> Vec<Vec<Point2<F>>> {
    // Endpoints computed from the two operand passes can disagree by a few
    // ulps, so matching is nearest-neighbour within a loosened tolerance.
    let eps = weld_eps::<F>() * F::from(100.0).unwrap();

    let mut rings = Vec::new();

    while let Some(first) = frags.pop() {
        let mut ring = vec![first.start, first.end];

        loop {
            let tail = *ring.last().unwrap();

            if ring.len() > 2 && tail.distance(ring[0]) <= eps {
                ring.pop();
                if ring.len() >= 3 {
                    rings.push(ring);
                }
                break;
            }

            let next = frags
                .iter()
                .enumerate()
                .map(|(i, f)| (i, f.start.distance(tail)))
                .filter(|(_, d)| *d <= eps)
                .min_by(|(_, d1), (_, d2)| {
                    d1.partial_cmp(d2).unwrap_or(std::cmp::Ordering::Equal)
                });

            match next {
                Some((i, _)) => {
                    let f = frags.swap_remove(i);
                    ring.push(f.end);
                }
                None => break, // open chain, drop it
            }
        }
    }

    rings
}

/// Sorts stitched rings into polygons: CCW rings are outer boundaries, CW
/// rings are holes assigned to the smallest containing outer.
fn assemble<F: Float>(rings: Vec<Vec<Point2<F>>>) -> Vec<Polygon<F>> {
    let area_eps = weld_eps::<F>();

    let mut outers: Vec<(Vec<Point2<F>>, F)> = Vec::new();
    let mut holes: Vec<Vec<Point2<F>>> = Vec::new();

    for ring in rings {
        let area = ring_signed_area(&ring);
        if area.abs() <= area_eps {
            continue;
        }
        if area > F::zero() {
            outers.push((ring, area));
        } else {
            holes.push(ring);
        }
    }

    let mut assigned: Vec<Vec<Vec<Point2<F>>>> = vec![Vec::new(); outers.len()];

    for hole in holes {
        let probe = hole[0];
        let mut best: Option<(usize, F)> = None;

        for (i, (outer, area)) in outers.iter().enumerate() {
            if super::polygon::ring_contains(outer, probe) {
                match best {
                    Some((_, best_area)) if best_area <= *area => {}
                    _ => best = Some((i, *area)),
                }
            }
        }

        if let Some((i, _)) = best {
            assigned[i].push(hole);
        }
    }

    outers
        .into_iter()
        .zip(assigned)
        .map(|((outer, _), holes)| Polygon::with_holes(outer, holes))
        .collect()
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

    fn total_area(polys: &[Polygon<f64>]) -> f64 {
        polys.iter().map(|p| p.area()).sum()
    }

    #[test]
    fn test_union_overlapping_squares() {
        let a = square(0.0, 0.0, 2.0);
        let b = square(1.0, 0.0, 2.0);
        let result = boolean_op(&a, &b, BooleanOp::Union);
        assert_eq!(result.len(), 1);
        assert_relative_eq!(result[0].area(), 6.0, epsilon = 1e-9);
    }

    #[test]
    fn test_union_disjoint_squares() {
        let a = square(0.0, 0.0, 1.0);
        let b = square(5.0, 5.0, 1.0);
        let result = boolean_op(&a, &b, BooleanOp::Union);
        assert_eq!(result.len(), 2);
        assert_relative_eq!(total_area(&result), 2.0, epsilon = 1e-9);
    }

    #[test]
    fn test_union_identical() {
        let a = square(0.0, 0.0, 3.0);
        let result = boolean_op(&a, &a.clone(), BooleanOp::Union);
        assert_eq!(result.len(), 1);
        assert_relative_eq!(result[0].area(), 9.0, epsilon = 1e-9);
    }

    #[test]
    fn test_union_contained() {
        let a = square(0.0, 0.0, 10.0);
        let b = square(2.0, 2.0, 1.0);
        let result = boolean_op(&a, &b, BooleanOp::Union);
        assert_eq!(result.len(), 1);
        assert_relative_eq!(result[0].area(), 100.0, epsilon = 1e-9);
    }

    #[test]
    fn test_union_edge_adjacent_merges() {
        let a = square(0.0, 0.0, 1.0);
        let b = square(1.0, 0.0, 1.0);
        let result = boolean_op(&a, &b, BooleanOp::Union);
        assert_eq!(result.len(), 1);
        assert_relative_eq!(result[0].area(), 2.0, epsilon = 1e-9);
    }

    #[test]
    fn test_difference_self_is_empty() {
        let a = square(0.0, 0.0, 4.0);
        let result = boolean_op(&a, &a.clone(), BooleanOp::Difference);
        assert!(result.is_empty());
    }

    #[test]
    fn test_difference_overlap() {
        let a = square(0.0, 0.0, 2.0);
        let b = square(1.0, 0.0, 2.0);
        let result = boolean_op(&a, &b, BooleanOp::Difference);
        assert_eq!(result.len(), 1);
        assert_relative_eq!(result[0].area(), 2.0, epsilon = 1e-9);
    }

    #[test]
    fn test_difference_creates_hole() {
        let a = square(0.0, 0.0, 10.0);
        let b = square(4.0, 4.0, 2.0);
        let result = boolean_op(&a, &b, BooleanOp::Difference);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].holes().len(), 1);
        assert_relative_eq!(result[0].area(), 96.0, epsilon = 1e-9);
    }

    #[test]
    fn test_difference_splits_into_two() {
        // A bar subtracted across the middle of a square cuts it in two.
        let a = square(0.0, 0.0, 10.0);
        let b = Polygon::new(vec![
            Point2::new(-1.0, 4.0),
            Point2::new(11.0, 4.0),
            Point2::new(11.0, 6.0),
            Point2::new(-1.0, 6.0),
        ]);
        let result = boolean_op(&a, &b, BooleanOp::Difference);
        assert_eq!(result.len(), 2);
        assert_relative_eq!(total_area(&result), 80.0, epsilon = 1e-9);
    }

    #[test]
    fn test_difference_contained_in_other() {
        let a = square(2.0, 2.0, 1.0);
        let b = square(0.0, 0.0, 10.0);
        let result = boolean_op(&a, &b, BooleanOp::Difference);
        assert!(result.is_empty());
    }

    #[test]
    fn test_intersection_overlap() {
        let a = square(0.0, 0.0, 2.0);
        let b = square(1.0, 1.0, 2.0);
        let result = boolean_op(&a, &b, BooleanOp::Intersection);
        assert_eq!(result.len(), 1);
        assert_relative_eq!(result[0].area(), 1.0, epsilon = 1e-9);
    }

    #[test]
    fn test_intersection_disjoint_bbox() {
        let a = square(0.0, 0.0, 1.0);
        let b = square(10.0, 10.0, 1.0);
        assert!(boolean_op(&a, &b, BooleanOp::Intersection).is_empty());
    }

    #[test]
    fn test_intersection_contained() {
        let a = square(0.0, 0.0, 10.0);
        let b = square(3.0, 3.0, 2.0);
        let result = boolean_op(&a, &b, BooleanOp::Intersection);
        assert_eq!(result.len(), 1);
        assert_relative_eq!(result[0].area(), 4.0, epsilon = 1e-9);
    }

    #[test]
    fn test_union_through_hole() {
        // A polygon with a hole, unioned with a patch covering the hole,
        // fills it in.
        let ring = Polygon::with_holes(
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
        let patch = square(3.0, 3.0, 4.0);
        let result = boolean_op(&ring, &patch, BooleanOp::Union);
        assert_eq!(result.len(), 1);
        assert!(result[0].holes().is_empty());
        assert_relative_eq!(result[0].area(), 100.0, epsilon = 1e-9);
    }

    #[test]
    fn test_difference_from_holed_region() {
        // Subtracting from inside a hole changes nothing.
        let ring = Polygon::with_holes(
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
        let inner = square(4.5, 4.5, 1.0);
        let result = boolean_op(&ring, &inner, BooleanOp::Difference);
        assert_relative_eq!(total_area(&result), 96.0, epsilon = 1e-9);
    }

    #[test]
    fn test_union_area_never_shrinks() {
        let a = square(0.0, 0.0, 3.0);
        let b = Polygon::new(vec![
            Point2::new(2.0, 1.0),
            Point2::new(5.0, 0.0),
            Point2::new(5.0, 4.0),
            Point2::new(2.0, 2.5),
        ]);
        let result = boolean_op(&a, &b, BooleanOp::Union);
        let total = total_area(&result);
        assert!(total >= a.area() - 1e-9);
        assert!(total >= b.area() - 1e-9);
        assert!(total <= a.area() + b.area() + 1e-9);
    }
}
