//! Delaunay triangulation and its Voronoi dual.

mod delaunay;
mod voronoi;

pub use delaunay::{delaunay_triangulation, Triangle};
pub use voronoi::{circumcenter, voronoi_edges};
