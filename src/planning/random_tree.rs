//! Rapidly-exploring random tree search.

use super::{trivial_result, PathFinder, PathResult};
use crate::graph::Graph;
use crate::primitives::{Aabb2, Point2, Segment2};
use crate::region::{Polygon, PolygonSet};
use num_traits::Float;
use rand::distributions::uniform::SampleUniform;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Tuning parameters for [`RandomTree`].
#[derive(Debug, Clone)]
pub struct RandomTreeConfig<F> {
    /// Hard iteration cap; exhausting it terminates the search with
    /// [`PathResult::NotFound`].
    pub max_iterations: usize,
    /// Maximum length of a single tree edge; longer steps toward a sample
    /// are cropped to this length.
    pub max_step: F,
    /// Probability of sampling the goal directly instead of a uniform
    /// scene point.
    pub goal_bias: f64,
}

impl<F: Float> Default for RandomTreeConfig<F> {
    fn default() -> Self {
        Self {
            max_iterations: 10_000,
            max_step: F::from(50.0).unwrap(),
            goal_bias: 0.05,
        }
    }
}

/// RRT-style search: grows a tree of collision-free steps rooted at the
/// start point until it reaches the goal.
///
/// The scene bounds to sample from are injected at construction. This
/// strategy always searches the full scene; it does not support masking.
pub struct RandomTree<F> {
    config: RandomTreeConfig<F>,
    bounds: Aabb2<F>,
    rng: StdRng,
    tree: Graph<F>,
}

impl<F: Float + SampleUniform> RandomTree<F> {
    /// Creates a search over the given scene bounds with default tuning.
    pub fn new(bounds: Aabb2<F>) -> Self {
        Self::with_config(bounds, RandomTreeConfig::default())
    }

    /// Creates a search with explicit tuning parameters.
    pub fn with_config(bounds: Aabb2<F>, config: RandomTreeConfig<F>) -> Self {
        Self {
            config,
            bounds,
            rng: StdRng::from_entropy(),
            tree: Graph::new(),
        }
    }

    /// Replaces the sampler seed, making subsequent searches deterministic.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    /// Samples the next expansion target: the goal with probability
    /// `goal_bias`, otherwise a uniform point in the scene bounds.
    fn sample_target(&mut self, goal: Point2<F>) -> Point2<F> {
        if self.rng.gen_bool(self.config.goal_bias) {
            return goal;
        }
        let x = self.rng.gen_range(self.bounds.min.x..=self.bounds.max.x);
        let y = self.rng.gen_range(self.bounds.min.y..=self.bounds.max.y);
        Point2::new(x, y)
    }

    /// Crops the step from `from` toward `to` to the maximum edge length.
    fn crop_step(&self, from: Point2<F>, to: Point2<F>) -> Point2<F> {
        if from.distance(to) < self.config.max_step {
            return to;
        }
        match (to - from).normalize() {
            Some(dir) => from + dir * self.config.max_step,
            None => from,
        }
    }
}

impl<F: Float + SampleUniform + Send + Sync> PathFinder<F> for RandomTree<F> {
    fn find_path(
        &mut self,
        start: Point2<F>,
        goal: Point2<F>,
        obstacles: &PolygonSet<F>,
        mask: Option<&Polygon<F>>,
    ) -> PathResult<F> {
        debug_assert!(mask.is_none(), "RandomTree does not support masked search");

        if let Some(result) = trivial_result(start, goal, obstacles) {
            return result;
        }

        self.tree = Graph::with_vertices(vec![start]);
        let mut reached = false;

        for iteration in 0..self.config.max_iterations {
            let target = self.sample_target(goal);
            let (near_point, near_index) = self
                .tree
                .nearest(target)
                .expect("tree always holds the root");
            let next = self.crop_step(near_point, target);

            if next == near_point {
                continue;
            }
            if obstacles.intersects_segment(Segment2::new(near_point, next), false) {
                continue;
            }

            let index = self.tree.add_vertex(next);
            self.tree.add_edge(index, near_index);

            if next == goal {
                log::trace!("random tree reached goal after {} iterations", iteration);
                reached = true;
                break;
            }
        }

        if !reached {
            log::debug!(
                "random tree exhausted {} iterations without reaching goal",
                self.config.max_iterations
            );
            return PathResult::NotFound;
        }

        match self.tree.bfs_path(0, self.tree.len() - 1) {
            Some(path) => PathResult::Found(path),
            None => PathResult::NotFound,
        }
    }

    fn search_graph(&self) -> &Graph<F> {
        &self.tree
    }
}
