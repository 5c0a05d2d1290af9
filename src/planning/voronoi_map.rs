//! Generalized-Voronoi roadmap search.

use super::roadmap::RoadmapCore;
use super::{PathFinder, PathResult};
use crate::graph::Graph;
use crate::primitives::{Aabb2, Point2, Segment2};
use crate::region::{Polygon, PolygonSet};
use crate::triangulation::voronoi_edges;
use num_traits::Float;

/// Tuning parameters for [`VoronoiMap`].
#[derive(Debug, Clone)]
pub struct VoronoiMapConfig<F> {
    /// Spacing between site samples along obstacle and frame edges. The
    /// generalized (segment-site) diagram is approximated by the point-site
    /// diagram of these samples.
    pub sample_spacing: F,
    /// Coincident roadmap vertices and edges are merged within this
    /// tolerance.
    pub merge_tolerance: F,
    /// How far outside the scene bounds the bounding frame sits.
    pub frame_padding: F,
}

impl<F: Float> Default for VoronoiMapConfig<F> {
    fn default() -> Self {
        Self {
            sample_spacing: F::from(25.0).unwrap(),
            merge_tolerance: F::from(1e-2).unwrap(),
            frame_padding: F::from(100.0).unwrap(),
        }
    }
}

/// Roadmap search over the generalized Voronoi diagram of obstacle edges.
///
/// Every obstacle edge acts as a site, bounded by a padded frame around the
/// scene; the roadmap keeps the Voronoi edges whose endpoints are not
/// inside any obstacle, maximizing clearance. Start and goal connect to the
/// single nearest roadmap vertex. The roadmap is rebuilt only when the
/// obstacle count changes.
pub struct VoronoiMap<F> {
    config: VoronoiMapConfig<F>,
    scene_bounds: Aabb2<F>,
    core: RoadmapCore<F>,
}

impl<F: Float + Send + Sync> VoronoiMap<F> {
    /// Creates a search over the given scene bounds with default tuning.
    pub fn new(scene_bounds: Aabb2<F>) -> Self {
        Self::with_config(scene_bounds, VoronoiMapConfig::default())
    }

    /// Creates a search with explicit tuning parameters.
    pub fn with_config(scene_bounds: Aabb2<F>, config: VoronoiMapConfig<F>) -> Self {
        Self {
            config,
            scene_bounds,
            core: RoadmapCore::new(true),
        }
    }

    fn build(&mut self, obstacles: &PolygonSet<F>) {
        let tol = self.config.merge_tolerance;
        let frame = self.scene_bounds.padded(self.config.frame_padding);

        // Sample sites along every obstacle edge and the bounding frame.
        let mut sites: Vec<Point2<F>> = Vec::new();
        for edge in obstacles.edges() {
            sample_segment(edge, self.config.sample_spacing, &mut sites);
        }
        let corners = frame.corners();
        for i in 0..4 {
            let edge = Segment2::new(corners[i], corners[(i + 1) % 4]);
            sample_segment(edge, self.config.sample_spacing, &mut sites);
        }

        sites.sort_by(|a, b| {
            a.x.partial_cmp(&b.x)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.y.partial_cmp(&b.y).unwrap_or(std::cmp::Ordering::Equal))
        });
        sites.dedup_by(|a, b| (a.x - b.x).abs() <= tol && (a.y - b.y).abs() <= tol);

        // Dual edges, pruned to collision-free clearance edges inside the
        // frame.
        let mut edges = voronoi_edges(&sites, tol);
        edges.retain(|e| {
            frame.contains_point(e.start)
                && frame.contains_point(e.end)
                && !obstacles.contains(e.start, false)
                && !obstacles.contains(e.end, false)
        });

        // Deduplicate coincident edges.
        for e in &mut edges {
            let flip = match e.start.x.partial_cmp(&e.end.x) {
                Some(std::cmp::Ordering::Greater) => true,
                Some(std::cmp::Ordering::Equal) => e.start.y > e.end.y,
                _ => false,
            };
            if flip {
                *e = Segment2::new(e.end, e.start);
            }
        }
        edges.sort_by(|a, b| {
            a.start
                .x
                .partial_cmp(&b.start.x)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| {
                    a.start
                        .y
                        .partial_cmp(&b.start.y)
                        .unwrap_or(std::cmp::Ordering::Equal)
                })
        });
        edges.dedup_by(|a, b| {
            a.start.distance(b.start) <= tol && a.end.distance(b.end) <= tol
        });

        // Weld endpoints into a vertex list and build the roadmap graph.
        let mut points: Vec<Point2<F>> = Vec::new();
        let mut index_pairs: Vec<(usize, usize, Segment2<F>)> = Vec::new();
        for e in &edges {
            let i = weld_index(&mut points, e.start, tol);
            let j = weld_index(&mut points, e.end, tol);
            if i != j {
                index_pairs.push((i, j, *e));
            }
        }

        let mut graph = Graph::with_vertices(points.clone());
        for (i, j, segment) in index_pairs {
            if !obstacles.intersects_segment(segment, true) {
                graph.add_edge(i, j);
            }
        }

        log::debug!(
            "voronoi roadmap rebuilt: {} sites, {} vertices",
            sites.len(),
            points.len()
        );
        self.core.install(points, graph, obstacles.len());
    }
}

impl<F: Float + Send + Sync> PathFinder<F> for VoronoiMap<F> {
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

/// Appends evenly spaced samples along a segment, endpoints included.
fn sample_segment<F: Float>(segment: Segment2<F>, spacing: F, out: &mut Vec<Point2<F>>) {
    let length = segment.length();
    if length <= F::epsilon() {
        out.push(segment.start);
        return;
    }

    let steps = (length / spacing).ceil().to_usize().unwrap_or(1).max(1);
    for i in 0..=steps {
        let t = F::from(i).unwrap() / F::from(steps).unwrap();
        out.push(segment.point_at(t));
    }
}

/// Returns the index of `point` in `points`, welding within `tol`.
fn weld_index<F: Float>(points: &mut Vec<Point2<F>>, point: Point2<F>, tol: F) -> usize {
    for (i, p) in points.iter().enumerate() {
        if p.distance(point) <= tol {
            return i;
        }
    }
    points.push(point);
    points.len() - 1
}
