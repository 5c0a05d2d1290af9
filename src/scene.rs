//! Configuration space: obstacles inflated by the agent's footprint.

use crate::error::SceneError;
use crate::primitives::{Aabb2, Point2};
use crate::region::{minkowski_sum, reflected, Polygon, PolygonSet};
use num_traits::Float;

/// Owns the raw scene geometry and maintains the configuration-space
/// obstacle set.
///
/// Every obstacle is inflated by the Minkowski sum with the agent's shape
/// reflected through its reference point, so downstream planners treat the
/// agent as a point. Changing the agent shape re-inflates everything.
#[derive(Debug, Clone)]
pub struct ConfigurationSpace<F> {
    agent: Vec<Point2<F>>,
    agent_position: Point2<F>,
    obstacles: Vec<Polygon<F>>,
    inflated: PolygonSet<F>,
}

impl<F: Float + Send + Sync> ConfigurationSpace<F> {
    /// Creates a configuration space for an agent footprint given relative
    /// to its reference point.
    pub fn new(agent: Vec<Point2<F>>, agent_position: Point2<F>) -> Result<Self, SceneError> {
        let shape = validated(agent)?;
        Ok(Self {
            agent: shape.outer().to_vec(),
            agent_position,
            obstacles: Vec::new(),
            inflated: PolygonSet::new(),
        })
    }

    /// Replaces the agent footprint and re-inflates every obstacle.
    pub fn set_agent(&mut self, agent: Vec<Point2<F>>) -> Result<(), SceneError> {
        let shape = validated(agent)?;
        self.agent = shape.outer().to_vec();
        self.rebuild();
        Ok(())
    }

    /// Moves the agent's reference point.
    pub fn set_agent_position(&mut self, position: Point2<F>) {
        self.agent_position = position;
    }

    /// Validates and adds an obstacle, inflating it into the
    /// configuration-space set.
    ///
    /// The obstacle must be simple, have at least 3 distinct vertices, and
    /// must not overlap the agent's current footprint.
    pub fn add_obstacle(&mut self, points: Vec<Point2<F>>) -> Result<(), SceneError> {
        let obstacle = validated(points)?;

        let inflated = self.inflate(&obstacle);
        if inflated.contains(self.agent_position, true) {
            return Err(SceneError::OverlapsAgent);
        }

        self.obstacles.push(obstacle);
        self.inflated.insert(inflated);
        Ok(())
    }

    /// Tests whether placing the agent's reference point at `position`
    /// would collide with any obstacle.
    pub fn placement_valid(&self, position: Point2<F>) -> bool {
        !self.inflated.contains(position, false)
    }

    /// The raw obstacle polygons as supplied by the editor.
    pub fn obstacles(&self) -> &[Polygon<F>] {
        &self.obstacles
    }

    /// The configuration-space obstacle set.
    pub fn inflated(&self) -> &PolygonSet<F> {
        &self.inflated
    }

    /// The agent footprint, relative to its reference point.
    pub fn agent(&self) -> &[Point2<F>] {
        &self.agent
    }

    /// The agent's reference point in scene coordinates.
    pub fn agent_position(&self) -> Point2<F> {
        self.agent_position
    }

    /// Bounds of the raw obstacles.
    pub fn bounds(&self) -> Option<Aabb2<F>> {
        let mut iter = self.obstacles.iter().filter_map(|o| o.bounds());
        let first = iter.next()?;
        Some(iter.fold(first, Aabb2::union))
    }

    /// Removes every obstacle.
    pub fn clear_obstacles(&mut self) {
        self.obstacles.clear();
        self.inflated.clear();
    }

    fn rebuild(&mut self) {
        self.inflated.clear();
        let obstacles = std::mem::take(&mut self.obstacles);
        for obstacle in &obstacles {
            let inflated = self.inflate(obstacle);
            self.inflated.insert(inflated);
        }
        self.obstacles = obstacles;
    }

    fn inflate(&self, obstacle: &Polygon<F>) -> Polygon<F> {
        let mirrored = Polygon::new(reflected(&self.agent));
        minkowski_sum(obstacle, &mirrored)
    }
}

/// Validates caller-supplied polygon points.
fn validated<F: Float>(points: Vec<Point2<F>>) -> Result<Polygon<F>, SceneError> {
    let polygon = Polygon::new(points);
    if polygon.outer().len() < 3 {
        return Err(SceneError::DegeneratePolygon);
    }
    if !polygon.is_simple() {
        return Err(SceneError::NotSimple);
    }
    Ok(polygon)
}
