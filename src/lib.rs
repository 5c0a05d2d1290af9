//! motum - Motion planning for rigid agents in polygonal 2D scenes.
//!
//! The crate computes collision-free navigation information for an
//! arbitrarily-shaped agent moving among polygonal obstacles:
//!
//! - [`region`]: polygon and region algebra (boolean operations,
//!   point location, segment intersection, Minkowski sums)
//! - [`graph`]: search graphs with BFS, Dijkstra, and region masking
//! - [`planning`]: random-tree, visibility-graph, and Voronoi-roadmap
//!   path finders sharing one contract, plus the resumable exploration
//!   search
//! - [`vision`]: incremental visibility tracking and frontier extraction
//! - [`scene`]: configuration-space construction from obstacles and the
//!   agent footprint

pub mod error;
pub mod graph;
pub mod planning;
pub mod predicates;
pub mod primitives;
pub mod region;
pub mod scene;
pub mod triangulation;
pub mod vision;

pub use error::SceneError;
pub use planning::{Path, PathFinder, PathResult};
pub use primitives::{Aabb2, Point2, Segment2, Vec2};
pub use region::{Polygon, PolygonSet};
pub use scene::ConfigurationSpace;
pub use vision::{VisionConfig, VisionTracker};
