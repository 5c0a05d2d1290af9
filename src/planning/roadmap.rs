//! Shared machinery for cached-roadmap strategies.
//!
//! The visibility-graph and Voronoi strategies differ only in how they
//! produce candidate vertices and edges; query handling is identical. Each
//! strategy owns a [`RoadmapCore`] holding the cached roadmap and performs
//! the per-query work here: mask application, start/goal attachment, and
//! the Dijkstra run.

use super::{trivial_result, PathResult};
use crate::graph::{dijkstra, Graph};
use crate::primitives::{Point2, Segment2};
use crate::region::{Polygon, PolygonSet};
use num_traits::Float;

/// Cached roadmap plus query state shared by roadmap strategies.
#[derive(Debug, Clone)]
pub(crate) struct RoadmapCore<F> {
    /// Connect start/goal to the single nearest visible candidate instead
    /// of every mutually visible one.
    closest_only: bool,
    points: Vec<Point2<F>>,
    graph: Graph<F>,
    /// The extended graph of the most recent query, kept for diagnostics.
    ext_graph: Graph<F>,
    /// Obstacle count the cache was built against; `None` until first
    /// build.
    obstacle_count: Option<usize>,
}

impl<F: Float + Send + Sync> RoadmapCore<F> {
    pub fn new(closest_only: bool) -> Self {
        Self {
            closest_only,
            points: Vec::new(),
            graph: Graph::new(),
            ext_graph: Graph::new(),
            obstacle_count: None,
        }
    }

    /// The cache is rebuilt whenever the obstacle count changes.
    pub fn is_stale(&self, obstacles: &PolygonSet<F>) -> bool {
        self.obstacle_count != Some(obstacles.len())
    }

    /// Installs a freshly built roadmap.
    pub fn install(&mut self, points: Vec<Point2<F>>, graph: Graph<F>, obstacle_count: usize) {
        self.points = points;
        self.graph = graph;
        self.obstacle_count = Some(obstacle_count);
    }

    /// Runs a query against the cached roadmap.
    ///
    /// When `mask` is given, candidates outside the mask are pruned before
    /// start and goal are attached, restricting the search to the masked
    /// region.
    pub fn search(
        &mut self,
        start: Point2<F>,
        goal: Point2<F>,
        obstacles: &PolygonSet<F>,
        mask: Option<&Polygon<F>>,
    ) -> PathResult<F> {
        if let Some(result) = trivial_result(start, goal, obstacles) {
            return result;
        }

        let mut graph = self.graph.clone();
        let active: Vec<bool> = match mask {
            Some(region) => {
                graph.mask(region);
                self.points
                    .iter()
                    .map(|p| region.contains(*p, false))
                    .collect()
            }
            None => vec![true; self.points.len()],
        };

        let start_index = graph.add_vertex(start);
        let goal_index = graph.add_vertex(goal);

        for (index, point) in [(start_index, start), (goal_index, goal)] {
            self.attach(&mut graph, index, point, &active, obstacles);
        }

        let result = match dijkstra(&graph, start_index, goal_index) {
            Some(path) => PathResult::Found(path),
            None => PathResult::NotFound,
        };

        self.ext_graph = graph;
        result
    }

    /// Connects an endpoint vertex to the candidate set.
    fn attach(
        &self,
        graph: &mut Graph<F>,
        index: usize,
        point: Point2<F>,
        active: &[bool],
        obstacles: &PolygonSet<F>,
    ) {
        if self.closest_only {
            let mut best: Option<(usize, F)> = None;
            for (i, &candidate) in self.points.iter().enumerate() {
                if !active[i] {
                    continue;
                }
                if obstacles.intersects_segment(Segment2::new(point, candidate), true) {
                    continue;
                }
                let d = point.distance_squared(candidate);
                if best.map(|(_, bd)| d < bd).unwrap_or(true) {
                    best = Some((i, d));
                }
            }
            if let Some((i, _)) = best {
                graph.add_edge(index, i);
            }
        } else {
            for (i, &candidate) in self.points.iter().enumerate() {
                if active[i]
                    && !obstacles.intersects_segment(Segment2::new(point, candidate), true)
                {
                    graph.add_edge(index, i);
                }
            }
        }
    }

    /// The extended graph of the most recent query (the cached roadmap if
    /// no query ran yet).
    pub fn graph(&self) -> &Graph<F> {
        if self.ext_graph.is_empty() {
            &self.graph
        } else {
            &self.ext_graph
        }
    }

    /// The cached candidate vertices.
    #[cfg(test)]
    pub fn candidate_points(&self) -> &[Point2<F>] {
        &self.points
    }
}
