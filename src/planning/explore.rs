//! Exploration-driven path search over unmapped space.
//!
//! When the destination lies outside the observed region, the search
//! advances the agent toward ranked frontier points, discovering space leg
//! by leg. The search is an explicit resumable task: it persists its
//! continuation state (accumulated path, visited frontier points, obstacle
//! snapshot) and is re-entered through [`Exploration::on_leg_completed`]
//! whenever the caller finishes moving the agent along the previous leg.
//! Nothing blocks; a caller that wants to abort simply stops resuming.

use super::{path_length, Path, PathFinder, PathResult};
use crate::primitives::{Aabb2, Point2};
use crate::region::PolygonSet;
use crate::vision::VisionTracker;
use num_traits::Float;

/// Tuning parameters for [`Exploration`].
#[derive(Debug, Clone)]
pub struct ExploreConfig<F> {
    /// Frontier points within this distance (per axis) of a previously
    /// attempted point are considered already visited.
    pub visited_tolerance: F,
    /// Weight of the agent-distance term when ranking frontier points;
    /// the destination-distance term has weight 1.
    pub agent_distance_weight: F,
    /// Legs shorter than this are treated as failures (the agent would not
    /// actually move).
    pub min_leg_length: F,
}

impl<F: Float> Default for ExploreConfig<F> {
    fn default() -> Self {
        Self {
            visited_tolerance: F::from(10.0).unwrap(),
            agent_distance_weight: F::from(0.25).unwrap(),
            min_leg_length: F::from(1e-4).unwrap(),
        }
    }
}

/// Result of starting or resuming an exploration search.
#[derive(Debug, Clone, PartialEq)]
pub enum ExploreStatus<F> {
    /// Move the agent along this leg, then call
    /// [`Exploration::on_leg_completed`].
    Advance(Path<F>),
    /// The destination was reached; the full path is attached.
    Finished(Path<F>),
    /// Frontier exhausted or destination unreachable.
    NoPath,
    /// The destination lies inside an obstacle.
    InvalidDestination,
    /// The destination lies outside the scene bounds.
    OutOfBounds,
}

/// A resumable multi-leg search toward a destination in partially unknown
/// space.
pub struct Exploration<F> {
    config: ExploreConfig<F>,
    destination: Point2<F>,
    obstacles: PolygonSet<F>,
    path: Path<F>,
    visited: Vec<Point2<F>>,
    found: bool,
    active: bool,
}

impl<F: Float + Send + Sync> Exploration<F> {
    /// Creates an inactive search with default tuning.
    pub fn new() -> Self {
        Self::with_config(ExploreConfig::default())
    }

    /// Creates an inactive search with explicit tuning parameters.
    pub fn with_config(config: ExploreConfig<F>) -> Self {
        Self {
            config,
            destination: Point2::origin(),
            obstacles: PolygonSet::new(),
            path: Vec::new(),
            visited: Vec::new(),
            found: false,
            active: false,
        }
    }

    /// Starts a search toward `destination` and runs the first leg.
    ///
    /// Snapshots the obstacle set; obstacle mutations during an active
    /// search require a fresh `begin`.
    #[allow(clippy::too_many_arguments)]
    pub fn begin(
        &mut self,
        position: Point2<F>,
        destination: Point2<F>,
        obstacles: &PolygonSet<F>,
        scene_bounds: Aabb2<F>,
        vision: &mut VisionTracker<F>,
        finder: &mut dyn PathFinder<F>,
    ) -> ExploreStatus<F> {
        if !scene_bounds.contains_point(destination) {
            return ExploreStatus::OutOfBounds;
        }

        self.destination = destination;
        self.obstacles = obstacles.clone();
        self.path.clear();
        self.visited.clear();
        self.found = false;
        self.active = true;

        if self.obstacles.contains(destination, false) {
            self.active = false;
            return ExploreStatus::InvalidDestination;
        }

        self.on_leg_completed(position, vision, finder)
    }

    /// Resumes the search after the agent finished moving the previous
    /// leg.
    pub fn on_leg_completed(
        &mut self,
        position: Point2<F>,
        vision: &mut VisionTracker<F>,
        finder: &mut dyn PathFinder<F>,
    ) -> ExploreStatus<F> {
        if !self.active {
            return ExploreStatus::NoPath;
        }

        vision.calculate_border();

        if self.found {
            self.active = false;
            return ExploreStatus::Finished(self.path.clone());
        }

        let mask = vision.history().clone();

        // Destination already observed: try to go straight there.
        if mask.contains(self.destination, false) {
            if let PathResult::Found(leg) =
                finder.find_path(position, self.destination, &self.obstacles, Some(&mask))
            {
                if !leg.is_empty() {
                    log::debug!("exploration: destination visible, final leg found");
                    self.path.extend(leg.iter().copied());
                    self.visited.push(self.destination);
                    self.found = true;
                    return ExploreStatus::Advance(leg);
                }
            }
        }

        // Otherwise advance toward the most promising frontier point.
        let w = self.config.agent_distance_weight;
        let destination = self.destination;
        let mut candidates: Vec<Point2<F>> = vision.frontier().to_vec();
        candidates.sort_by(|a, b| {
            let sa = a.distance_squared(position) * w + a.distance_squared(destination);
            let sb = b.distance_squared(position) * w + b.distance_squared(destination);
            sa.partial_cmp(&sb).unwrap_or(std::cmp::Ordering::Equal)
        });

        for point in candidates {
            if self.was_visited(point) {
                continue;
            }

            match finder.find_path(position, point, &self.obstacles, Some(&mask)) {
                PathResult::Found(leg) if path_length(&leg) > self.config.min_leg_length => {
                    log::debug!(
                        "exploration: advancing toward frontier point ({:?} candidates visited)",
                        self.visited.len()
                    );
                    self.path.extend(leg.iter().copied());
                    // The whole traversed path counts as visited so later
                    // legs do not retarget points we already walked past.
                    let traversed = self.path.clone();
                    self.visited.extend(traversed);
                    return ExploreStatus::Advance(leg);
                }
                _ => self.visited.push(point),
            }
        }

        log::debug!("exploration: frontier exhausted without reaching destination");
        self.active = false;
        ExploreStatus::NoPath
    }

    /// Returns `true` while the search is waiting to be resumed.
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// The full path accumulated so far.
    pub fn accumulated_path(&self) -> &Path<F> {
        &self.path
    }

    /// The destination of the current search.
    pub fn destination(&self) -> Point2<F> {
        self.destination
    }

    fn was_visited(&self, point: Point2<F>) -> bool {
        let tol = self.config.visited_tolerance;
        self.visited
            .iter()
            .any(|v| (v.x - point.x).abs() < tol && (v.y - point.y).abs() < tol)
    }
}

impl<F: Float + Send + Sync> Default for Exploration<F> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::planning::VisibilityGraph;
    use crate::region::Polygon;
    use crate::vision::VisionConfig;

    fn scene_bounds() -> Aabb2<f64> {
        Aabb2::new(Point2::new(-500.0, -500.0), Point2::new(500.0, 500.0))
    }

    fn square(x: f64, y: f64, w: f64, h: f64) -> Polygon<f64> {
        Polygon::new(vec![
            Point2::new(x, y),
            Point2::new(x + w, y),
            Point2::new(x + w, y + h),
            Point2::new(x, y + h),
        ])
    }

    fn setup(
        obstacles: Vec<Polygon<f64>>,
        position: Point2<f64>,
    ) -> (PolygonSet<f64>, VisionTracker<f64>, VisibilityGraph<f64>) {
        let mut inflated = PolygonSet::new();
        for o in &obstacles {
            inflated.insert(o.clone());
        }
        let vision = VisionTracker::new(
            &obstacles,
            inflated.clone(),
            scene_bounds(),
            position,
            VisionConfig::default(),
        );
        (inflated, vision, VisibilityGraph::new())
    }

    /// Drives the exploration to completion, simulating instantaneous agent
    /// moves with a vision update at every leg waypoint.
    fn drive(
        explore: &mut Exploration<f64>,
        start: Point2<f64>,
        destination: Point2<f64>,
        obstacles: &PolygonSet<f64>,
        vision: &mut VisionTracker<f64>,
        finder: &mut VisibilityGraph<f64>,
    ) -> (ExploreStatus<f64>, Point2<f64>) {
        let mut position = start;
        let mut status = explore.begin(
            position,
            destination,
            obstacles,
            scene_bounds(),
            vision,
            finder,
        );

        for _ in 0..50 {
            let leg = match &status {
                ExploreStatus::Advance(leg) => leg.clone(),
                _ => break,
            };
            for &p in &leg {
                position = p;
                vision.update_view(p);
            }
            status = explore.on_leg_completed(position, vision, finder);
        }

        (status, position)
    }

    #[test]
    fn test_destination_out_of_bounds() {
        let (obstacles, mut vision, mut finder) = setup(vec![], Point2::new(0.0, 0.0));
        let mut explore = Exploration::new();
        let status = explore.begin(
            Point2::new(0.0, 0.0),
            Point2::new(10_000.0, 0.0),
            &obstacles,
            scene_bounds(),
            &mut vision,
            &mut finder,
        );
        assert_eq!(status, ExploreStatus::OutOfBounds);
        assert!(!explore.is_active());
    }

    #[test]
    fn test_destination_inside_obstacle() {
        let (obstacles, mut vision, mut finder) =
            setup(vec![square(80.0, -20.0, 40.0, 40.0)], Point2::new(0.0, 0.0));
        let mut explore = Exploration::new();
        let status = explore.begin(
            Point2::new(0.0, 0.0),
            Point2::new(100.0, 0.0),
            &obstacles,
            scene_bounds(),
            &mut vision,
            &mut finder,
        );
        assert_eq!(status, ExploreStatus::InvalidDestination);
    }

    #[test]
    fn test_visible_destination_single_leg() {
        // Destination well inside the initial view disc.
        let (obstacles, mut vision, mut finder) = setup(vec![], Point2::new(0.0, 0.0));
        let mut explore = Exploration::new();

        let (status, position) = drive(
            &mut explore,
            Point2::new(0.0, 0.0),
            Point2::new(100.0, 0.0),
            &obstacles,
            &mut vision,
            &mut finder,
        );

        assert!(matches!(status, ExploreStatus::Finished(_)));
        assert_eq!(position, Point2::new(100.0, 0.0));
    }

    #[test]
    fn test_distant_destination_multi_leg() {
        // Destination beyond the initial view radius: the search must
        // advance through frontier points before it can finish.
        let (obstacles, mut vision, mut finder) = setup(vec![], Point2::new(-400.0, -400.0));
        let mut explore = Exploration::new();

        let (status, position) = drive(
            &mut explore,
            Point2::new(-400.0, -400.0),
            Point2::new(400.0, 400.0),
            &obstacles,
            &mut vision,
            &mut finder,
        );

        match status {
            ExploreStatus::Finished(path) => {
                assert_eq!(position, Point2::new(400.0, 400.0));
                assert!(path.len() >= 2);
                assert_eq!(*path.last().unwrap(), Point2::new(400.0, 400.0));
            }
            other => panic!("expected Finished, got {:?}", other),
        }
    }

    #[test]
    fn test_resumable_state_persists_between_legs() {
        let (obstacles, mut vision, mut finder) = setup(vec![], Point2::new(-400.0, -400.0));
        let mut explore = Exploration::new();

        let status = explore.begin(
            Point2::new(-400.0, -400.0),
            Point2::new(400.0, 400.0),
            &obstacles,
            scene_bounds(),
            &mut vision,
            &mut finder,
        );

        // First leg heads toward a frontier point, not the destination.
        match status {
            ExploreStatus::Advance(leg) => {
                assert!(explore.is_active());
                assert!(!explore.accumulated_path().is_empty());
                assert!(*leg.last().unwrap() != Point2::new(400.0, 400.0));
            }
            other => panic!("expected Advance, got {:?}", other),
        }
    }
}
