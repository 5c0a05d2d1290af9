//! Exact-enough polygon and region algebra.
//!
//! [`Polygon`] is a single region (outer boundary plus holes) supporting
//! point location, segment intersection, and boolean set operations;
//! [`PolygonSet`] composes disjoint polygons into one logical region with
//! parallel queries. [`minkowski_sum`] inflates obstacles by an agent
//! footprint so planners can treat the agent as a point.

mod boolean;
mod hull;
mod minkowski;
mod polygon;
mod set;

pub use hull::{convex_hull, is_convex};
pub use minkowski::{minkowski_sum, reflected};
pub use polygon::Polygon;
pub use set::PolygonSet;
