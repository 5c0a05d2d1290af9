//! Path-finding strategies over configuration-space obstacles.
//!
//! All strategies share one contract ([`PathFinder`]): given start and goal
//! points and the configuration-space obstacle set, produce a [`PathResult`].
//! A start point inside an obstacle is an unsearchable state, reported
//! distinctly from "searched but found nothing". Roadmap strategies accept
//! an optional mask polygon restricting the search to previously observed
//! space.

mod explore;
mod random_tree;
mod roadmap;
mod visibility_graph;
mod voronoi_map;

pub use explore::{ExploreConfig, ExploreStatus, Exploration};
pub use random_tree::{RandomTree, RandomTreeConfig};
pub use visibility_graph::{VisibilityGraph, VisibilityGraphConfig};
pub use voronoi_map::{VoronoiMap, VoronoiMapConfig};

use crate::graph::Graph;
use crate::primitives::{Point2, Segment2};
use crate::region::{Polygon, PolygonSet};
use num_traits::Float;

/// An ordered sequence of waypoints from start to goal.
pub type Path<F> = Vec<Point2<F>>;

/// Total Euclidean length of a path.
pub fn path_length<F: Float>(path: &[Point2<F>]) -> F {
    path.windows(2)
        .map(|w| w[0].distance(w[1]))
        .fold(F::zero(), |a, b| a + b)
}

/// Outcome of a path search.
#[derive(Debug, Clone, PartialEq)]
pub enum PathResult<F> {
    /// A collision-free path from start to goal.
    Found(Path<F>),
    /// No path exists, or none was found within the iteration cap.
    NotFound,
    /// The start point lies inside an obstacle; the query cannot be
    /// searched at all.
    Unsearchable,
}

impl<F> PathResult<F> {
    /// Returns the path if one was found.
    pub fn path(&self) -> Option<&Path<F>> {
        match self {
            PathResult::Found(p) => Some(p),
            _ => None,
        }
    }

    /// Consumes the result, returning the path if one was found.
    pub fn into_path(self) -> Option<Path<F>> {
        match self {
            PathResult::Found(p) => Some(p),
            _ => None,
        }
    }

    /// Returns `true` if a path was found.
    pub fn is_found(&self) -> bool {
        matches!(self, PathResult::Found(_))
    }
}

/// Common contract for path-finding strategies.
pub trait PathFinder<F: Float> {
    /// Searches for a collision-free path from `start` to `goal` among
    /// `obstacles`.
    ///
    /// `mask`, when given, restricts roadmap candidates to the masked
    /// region; strategies that do not support masking treat a mask as a
    /// caller contract error (checked in debug builds, ignored in release).
    fn find_path(
        &mut self,
        start: Point2<F>,
        goal: Point2<F>,
        obstacles: &PolygonSet<F>,
        mask: Option<&Polygon<F>>,
    ) -> PathResult<F>;

    /// The internal search graph from the most recent query, for
    /// visualization and diagnostics.
    fn search_graph(&self) -> &Graph<F>;
}

/// Shared query prologue: unsearchable-start detection and the trivial
/// straight-line answer.
pub(crate) fn trivial_result<F: Float + Send + Sync>(
    start: Point2<F>,
    goal: Point2<F>,
    obstacles: &PolygonSet<F>,
) -> Option<PathResult<F>> {
    if obstacles.contains(start, false) {
        return Some(PathResult::Unsearchable);
    }
    if !obstacles.intersects_segment(Segment2::new(start, goal), true) {
        return Some(PathResult::Found(vec![start, goal]));
    }
    None
}
