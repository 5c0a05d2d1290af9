//! Incremental visibility tracking ("fog of war").
//!
//! [`VisionTracker`] maintains what an agent has observed over time: the
//! instantaneous view polygon (a disc minus obstacle shadows), the
//! monotonically growing visibility history, and the classified border of
//! the history separating known obstacle contact from the frontier to
//! unexplored free space.

mod shadow;

use crate::primitives::{Aabb2, Point2, Segment2, Vec2};
use crate::region::{Polygon, PolygonSet};
use num_traits::Float;
use rayon::prelude::*;

use shadow::shadow_polygon;

/// Tuning parameters for [`VisionTracker`].
#[derive(Debug, Clone)]
pub struct VisionConfig<F> {
    /// Radius of the instantaneous view disc.
    pub view_radius: F,
    /// Number of segments approximating the view disc.
    pub disc_segments: usize,
    /// How far obstacle vertices are projected when building shadows; must
    /// exceed every distance that matters in the scene.
    pub projection_distance: F,
    /// The scene polygon used for the dark region is the scene bounds
    /// scaled by this factor.
    pub scene_scale: F,
    /// Offset of the three probe segments used to classify border
    /// vertices against obstacle contact.
    pub probe_offset: F,
}

impl<F: Float> Default for VisionConfig<F> {
    fn default() -> Self {
        Self {
            view_radius: F::from(375.0).unwrap(),
            disc_segments: 30,
            projection_distance: F::from(5000.0).unwrap(),
            scene_scale: F::from(1.75).unwrap(),
            probe_offset: F::one(),
        }
    }
}

/// Border classification result for one history vertex.
enum BorderClass<F> {
    Known(Point2<F>),
    Frontier(Point2<F>),
}

/// Tracks the visibility state of one agent.
///
/// All collaborators are injected: the raw obstacle polygons (shadow
/// casters), the configuration-space obstacle set (for border
/// classification), and the scene bounds. The tracker is reset whenever the
/// agent shape or the obstacle set changes discontinuously and updated
/// incrementally on every agent move.
pub struct VisionTracker<F> {
    config: VisionConfig<F>,
    enabled: bool,
    scene_bounds: Aabb2<F>,
    obstacles: Vec<Polygon<F>>,
    raw_set: PolygonSet<F>,
    inflated: PolygonSet<F>,
    scene: Polygon<F>,
    position: Point2<F>,
    current: Polygon<F>,
    history: Polygon<F>,
    known: Vec<Point2<F>>,
    frontier: Vec<Point2<F>>,
}

impl<F: Float + Send + Sync> VisionTracker<F> {
    /// Creates an enabled tracker and computes the initial view from
    /// `position`.
    pub fn new(
        obstacles: &[Polygon<F>],
        inflated: PolygonSet<F>,
        scene_bounds: Aabb2<F>,
        position: Point2<F>,
        config: VisionConfig<F>,
    ) -> Self {
        let mut raw_set = PolygonSet::new();
        for obstacle in obstacles {
            raw_set.insert(obstacle.clone());
        }

        let mut tracker = Self {
            config,
            enabled: true,
            scene_bounds,
            obstacles: obstacles.to_vec(),
            raw_set,
            inflated,
            scene: Polygon::empty(),
            position,
            current: Polygon::empty(),
            history: Polygon::empty(),
            known: Vec::new(),
            frontier: Vec::new(),
        };
        tracker.reset(None);
        tracker
    }

    /// Enables or disables tracking. Re-enabling triggers a reset.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        if enabled {
            self.reset(None);
        }
    }

    /// Returns whether tracking is enabled.
    pub fn enabled(&self) -> bool {
        self.enabled
    }

    /// Replaces the scene snapshot (obstacles changed discontinuously) and
    /// resets.
    pub fn set_scene(&mut self, obstacles: &[Polygon<F>], inflated: PolygonSet<F>) {
        self.obstacles = obstacles.to_vec();
        self.raw_set = PolygonSet::new();
        for obstacle in obstacles {
            self.raw_set.insert(obstacle.clone());
        }
        self.inflated = inflated;
        self.reset(None);
    }

    /// Clears all accumulated state and recomputes the view from the
    /// current (or given) position.
    ///
    /// The first update after a clear leaves boundary artifacts in the
    /// history seed, so the update is applied twice; the second application
    /// is idempotent on a correct result.
    pub fn reset(&mut self, position: Option<Point2<F>>) {
        if let Some(p) = position {
            self.position = p;
        }
        self.current = Polygon::empty();
        self.history = Polygon::empty();
        self.known.clear();
        self.frontier.clear();
        self.scene = Polygon::new(
            self.scene_bounds
                .scaled(self.config.scene_scale)
                .corners()
                .to_vec(),
        );

        let position = self.position;
        self.update_view(position);
        self.update_view(position);
        self.calculate_border();
    }

    /// Recomputes the instantaneous view polygon from `position` and folds
    /// it into the visibility history.
    ///
    /// The view is a disc of the configured radius minus the shadow of
    /// every obstacle whose bounding box intersects the disc.
    pub fn update_view(&mut self, position: Point2<F>) {
        if !self.enabled {
            return;
        }
        self.position = position;

        let mut view = disc_polygon(position, self.config.view_radius, self.config.disc_segments);
        let disc_bounds = match view.bounds() {
            Some(b) => b,
            None => return,
        };

        for obstacle in &self.obstacles {
            let bounds = match obstacle.bounds() {
                Some(b) => b,
                None => continue,
            };
            if !bounds.intersects(disc_bounds) {
                continue;
            }

            let shadow = shadow_polygon(obstacle, position, self.config.projection_distance);
            let pieces = view.subtracted(&shadow);

            // The view stays the piece the agent stands in; shadows of
            // separate obstacles can otherwise split off unreachable
            // slivers.
            view = pieces
                .iter()
                .find(|p| p.contains(position, false))
                .or_else(|| {
                    pieces.iter().max_by(|a, b| {
                        a.area()
                            .partial_cmp(&b.area())
                            .unwrap_or(std::cmp::Ordering::Equal)
                    })
                })
                .cloned()
                .unwrap_or_else(Polygon::empty);
        }

        self.current = view.clone();

        if self.history.is_empty() {
            self.history = view;
        } else {
            self.history.unite(&view);
        }
    }

    /// Classifies every vertex of the visibility-history boundary as either
    /// "known" (adjacent to an actual obstacle) or part of the frontier to
    /// unexplored space.
    ///
    /// Vertices are classified independently in parallel; per-worker
    /// results are merged afterwards.
    pub fn calculate_border(&mut self) {
        if !self.enabled {
            return;
        }

        self.known.clear();
        self.frontier.clear();
        if self.history.is_empty() {
            return;
        }

        let vertices: Vec<Point2<F>> = self.history.boundary_points().collect();
        let off = self.config.probe_offset;
        let scene_bounds = self.scene_bounds;
        let raw = &self.raw_set;
        let inflated = &self.inflated;

        let classified: Vec<BorderClass<F>> = vertices
            .par_iter()
            .filter_map(|&v| {
                if !scene_bounds.contains_point(v) {
                    return None;
                }

                // Three tiny probe segments around the vertex detect
                // obstacle contact.
                let probes = [
                    v + Vec2::new(off, off),
                    v + Vec2::new(-off, off),
                    v + Vec2::new(F::zero(), -off),
                ];
                let touches_obstacle = (0..3).any(|i| {
                    let seg = Segment2::new(probes[i], probes[(i + 1) % 3]);
                    raw.intersects_segment(seg, false)
                });

                if touches_obstacle {
                    Some(BorderClass::Known(v))
                } else if inflated.contains(v, true) {
                    // Inside the configuration-space obstacles: the agent
                    // can never stand here, so it is neither known contact
                    // nor frontier.
                    None
                } else {
                    Some(BorderClass::Frontier(v))
                }
            })
            .collect();

        for class in classified {
            match class {
                BorderClass::Known(p) => self.known.push(p),
                BorderClass::Frontier(p) => self.frontier.push(p),
            }
        }
    }

    /// The unobserved part of the scene: scene region minus the visibility
    /// history. Purely derived, used for rendering.
    pub fn dark_region(&self) -> Vec<Polygon<F>> {
        if self.history.is_empty() {
            return vec![self.scene.clone()];
        }
        self.scene.subtracted(&self.history)
    }

    /// The instantaneous view polygon from the last update.
    pub fn current_view(&self) -> &Polygon<F> {
        &self.current
    }

    /// The union of every view polygon since the last reset.
    pub fn history(&self) -> &Polygon<F> {
        &self.history
    }

    /// Border vertices adjacent to an actual obstacle.
    pub fn known_points(&self) -> &[Point2<F>] {
        &self.known
    }

    /// Border vertices adjacent to unexplored space.
    pub fn frontier(&self) -> &[Point2<F>] {
        &self.frontier
    }

    /// The agent position of the last update.
    pub fn position(&self) -> Point2<F> {
        self.position
    }
}

/// A regular polygon approximating a disc.
fn disc_polygon<F: Float>(center: Point2<F>, radius: F, segments: usize) -> Polygon<F> {
    let tau = F::from(std::f64::consts::TAU).unwrap();
    let n = F::from(segments).unwrap();

    let ring: Vec<Point2<F>> = (0..segments)
        .map(|i| {
            let theta = tau * F::from(i).unwrap() / n;
            Point2::new(
                center.x + radius * theta.cos(),
                center.y + radius * theta.sin(),
            )
        })
        .collect();

    Polygon::new(ring)
}
