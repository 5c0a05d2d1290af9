//! Error types for scene construction.

use thiserror::Error;

/// Errors reported when building the configuration space from caller
/// geometry.
///
/// Geometric degeneracy *inside* algorithms is never an error; offending
/// elements are skipped locally. These variants only reject invalid input
/// at the scene boundary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SceneError {
    /// The polygon has fewer than 3 distinct vertices.
    #[error("degenerate polygon: fewer than 3 distinct vertices")]
    DegeneratePolygon,

    /// The polygon boundary crosses itself.
    #[error("polygon boundary is self-intersecting")]
    NotSimple,

    /// The obstacle overlaps the agent's current footprint.
    #[error("obstacle overlaps the agent")]
    OverlapsAgent,
}
