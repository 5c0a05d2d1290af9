//! Visibility-graph search.

use super::roadmap::RoadmapCore;
use super::{PathFinder, PathResult};
use crate::graph::Graph;
use crate::primitives::{Point2, Segment2, Vec2};
use crate::region::{Polygon, PolygonSet};
use num_traits::Float;

/// Tuning parameters for [`VisibilityGraph`].
#[derive(Debug, Clone)]
pub struct VisibilityGraphConfig<F> {
    /// How far off an obstacle corner the candidate vertices are placed,
    /// along the bisector of the interior angle.
    pub offset_distance: F,
    /// Corners whose triangle with their neighbors has twice-area within
    /// this tolerance are treated as collinear and skipped.
    pub collinear_tolerance: F,
}

impl<F: Float> Default for VisibilityGraphConfig<F> {
    fn default() -> Self {
        Self {
            offset_distance: F::from(5.0).unwrap(),
            collinear_tolerance: F::from(0.1).unwrap(),
        }
    }
}

/// Roadmap search over reflex-corner offsets.
///
/// For every obstacle vertex, two candidate points are generated slightly
/// off the corner along the interior-angle bisector and the one outside the
/// polygon is kept. Candidates are connected by every segment that does not
/// cross an obstacle, and queries run Dijkstra over the cached graph. The
/// roadmap is rebuilt only when the obstacle count changes.
pub struct VisibilityGraph<F> {
    config: VisibilityGraphConfig<F>,
    core: RoadmapCore<F>,
}

impl<F: Float + Send + Sync> VisibilityGraph<F> {
    /// Creates a search with default tuning.
    pub fn new() -> Self {
        Self::with_config(VisibilityGraphConfig::default())
    }

    /// Creates a search with explicit tuning parameters.
    pub fn with_config(config: VisibilityGraphConfig<F>) -> Self {
        Self {
            config,
            core: RoadmapCore::new(false),
        }
    }

    fn build(&mut self, obstacles: &PolygonSet<F>) {
        let mut points: Vec<Point2<F>> = Vec::new();

        for polygon in obstacles {
            self.ring_candidates(polygon.outer(), polygon, &mut points);
            for hole in polygon.holes() {
                self.ring_candidates(hole, polygon, &mut points);
            }
        }

        let mut graph = Graph::with_vertices(points.clone());
        for i in 0..points.len() {
            for j in (i + 1)..points.len() {
                let line = Segment2::new(points[i], points[j]);
                if !obstacles.intersects_segment(line, true) {
                    graph.add_edge(i, j);
                }
            }
        }

        log::debug!(
            "visibility roadmap rebuilt: {} candidates over {} obstacles",
            points.len(),
            obstacles.len()
        );
        self.core.install(points, graph, obstacles.len());
    }

    fn ring_candidates(
        &self,
        ring: &[Point2<F>],
        polygon: &Polygon<F>,
        out: &mut Vec<Point2<F>>,
    ) {
        for index in 0..ring.len() {
            if let Some(p) = corner_offset(
                index,
                ring,
                polygon,
                self.config.offset_distance,
                self.config.collinear_tolerance,
            ) {
                out.push(p);
            }
        }
    }
}

impl<F: Float + Send + Sync> Default for VisibilityGraph<F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: Float + Send + Sync> PathFinder<F> for VisibilityGraph<F> {
    fn find_path(
        &mut self,
        start: Point2<F>,
        goal: Point2<F>,
        obstacles: &PolygonSet<F>,
        mask: Option<&Polygon<F>>,
    ) -> PathResult<F> {
        // The trivial answers never need the roadmap.
        if let Some(result) = super::trivial_result(start, goal, obstacles) {
            return result;
        }
        if self.core.is_stale(obstacles) {
            self.build(obstacles);
        }
        self.core.search(start, goal, obstacles, mask)
    }

    fn search_graph(&self) -> &Graph<F> {
        self.core.graph()
    }
}

/// Offsets the corner at `index` along the bisector of its interior angle
/// and returns whichever shifted point lies outside the polygon.
///
/// Returns `None` for corners collinear with their neighbors (within
/// tolerance) and for corners where neither shift escapes the polygon; such
/// candidates are simply omitted.
fn corner_offset<F: Float>(
    index: usize,
    ring: &[Point2<F>],
    polygon: &Polygon<F>,
    offset: F,
    collinear_tolerance: F,
) -> Option<Point2<F>> {
    let n = ring.len();
    if n < 3 {
        return None;
    }

    let a = ring[if index == 0 { n - 1 } else { index - 1 }];
    let b = ring[index];
    let c = ring[(index + 1) % n];

    let area2 = a.x * (b.y - c.y) + b.x * (c.y - a.y) + c.x * (a.y - b.y);
    if area2.abs() <= collinear_tolerance {
        return None;
    }

    let diag = (a - b) + (c - b);
    let angle = (-diag.y).atan2(-diag.x);
    let dir = Vec2::new(angle.cos(), angle.sin());

    let p1 = b - dir * offset;
    let p2 = b + dir * offset;

    if !polygon.contains(p1, false) {
        Some(p1)
    } else if !polygon.contains(p2, false) {
        Some(p2)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::planning::path_length;

    fn square(x: f64, y: f64, w: f64, h: f64) -> Polygon<f64> {
        Polygon::new(vec![
            Point2::new(x, y),
            Point2::new(x + w, y),
            Point2::new(x + w, y + h),
            Point2::new(x, y + h),
        ])
    }

    #[test]
    fn test_corner_offset_lands_outside() {
        let p = square(0.0, 0.0, 10.0, 10.0);
        for index in 0..4 {
            let candidate = corner_offset(index, p.outer(), &p, 5.0, 0.1).unwrap();
            assert!(!p.contains(candidate, false));
            // Near its corner
            assert!(candidate.distance(p.outer()[index]) < 5.1);
        }
    }

    #[test]
    fn test_corner_offset_skips_collinear() {
        let ring = vec![
            Point2::new(0.0, 0.0),
            Point2::new(5.0, 0.0),
            Point2::new(10.0, 0.0),
            Point2::new(10.0, 10.0),
            Point2::new(0.0, 10.0),
        ];
        let p = Polygon::new(ring.clone());
        assert!(corner_offset(1, &ring, &p, 5.0, 0.1).is_none());
    }

    #[test]
    fn test_empty_scene_direct_path() {
        let obstacles = PolygonSet::new();
        let mut vg = VisibilityGraph::new();
        let result = vg.find_path(
            Point2::new(0.0, 0.0),
            Point2::new(100.0, 0.0),
            &obstacles,
            None,
        );
        assert_eq!(
            result,
            PathResult::Found(vec![Point2::new(0.0, 0.0), Point2::new(100.0, 0.0)])
        );
    }

    #[test]
    fn test_detours_around_square() {
        let mut obstacles = PolygonSet::new();
        obstacles.insert(square(40.0, -10.0, 20.0, 20.0));

        let mut vg = VisibilityGraph::new();
        let result = vg.find_path(
            Point2::new(0.0, 0.0),
            Point2::new(100.0, 0.0),
            &obstacles,
            None,
        );

        let path = result.path().expect("path around the square");
        let length = path_length(path);
        assert!(length > 100.0, "detour must be longer than the straight line");
        assert!(length < 120.0, "detour should round a single corner");
        for w in path.windows(2) {
            assert!(!obstacles.intersects_segment(Segment2::new(w[0], w[1]), true));
        }
    }

    #[test]
    fn test_start_inside_obstacle_unsearchable() {
        let mut obstacles = PolygonSet::new();
        obstacles.insert(square(-10.0, -10.0, 20.0, 20.0));
        let mut vg = VisibilityGraph::new();
        let result = vg.find_path(
            Point2::new(0.0, 0.0),
            Point2::new(100.0, 0.0),
            &obstacles,
            None,
        );
        assert_eq!(result, PathResult::Unsearchable);
    }

    #[test]
    fn test_roadmap_cached_until_obstacle_count_changes() {
        let mut obstacles = PolygonSet::new();
        obstacles.insert(square(40.0, -10.0, 20.0, 20.0));

        let mut vg = VisibilityGraph::new();
        vg.find_path(
            Point2::new(0.0, 0.0),
            Point2::new(100.0, 0.0),
            &obstacles,
            None,
        );
        assert!(!vg.core.is_stale(&obstacles));

        obstacles.insert(square(40.0, 60.0, 20.0, 20.0));
        assert!(vg.core.is_stale(&obstacles));
    }

    #[test]
    fn test_masked_search_restricted() {
        let mut obstacles = PolygonSet::new();
        obstacles.insert(square(40.0, -10.0, 20.0, 20.0));

        // Mask covering a corridor well below the obstacle, far from every
        // corner candidate.
        let mask = Polygon::new(vec![
            Point2::new(-20.0, -40.0),
            Point2::new(120.0, -40.0),
            Point2::new(120.0, -25.0),
            Point2::new(-20.0, -25.0),
        ]);

        let mut vg = VisibilityGraph::new();
        let masked = vg.find_path(
            Point2::new(0.0, -30.0),
            Point2::new(100.0, -30.0),
            &obstacles,
            Some(&mask),
        );
        // Straight shot within the mask still works.
        assert!(masked.is_found());

        // A goal whose route would need candidates above the mask fails.
        let blocked = vg.find_path(
            Point2::new(0.0, 0.0),
            Point2::new(100.0, 0.0),
            &obstacles,
            Some(&mask),
        );
        assert_eq!(blocked, PathResult::NotFound);
    }

    #[test]
    fn test_no_path_through_sealed_box() {
        // Goal enclosed by a square ring of obstacles (as one holed region
        // the goal sits inside the hole, unreachable from outside).
        let mut obstacles = PolygonSet::new();
        obstacles.insert(Polygon::with_holes(
            vec![
                Point2::new(80.0, -20.0),
                Point2::new(120.0, -20.0),
                Point2::new(120.0, 20.0),
                Point2::new(80.0, 20.0),
            ],
            vec![vec![
                Point2::new(90.0, -10.0),
                Point2::new(110.0, -10.0),
                Point2::new(110.0, 10.0),
                Point2::new(90.0, 10.0),
            ]],
        ));

        let mut vg = VisibilityGraph::new();
        let result = vg.find_path(
            Point2::new(0.0, 0.0),
            Point2::new(100.0, 0.0),
            &obstacles,
            None,
        );
        assert_eq!(result, PathResult::NotFound);
    }
}
