//! Collections of disjoint polygonal regions.

use crate::primitives::{Aabb2, Point2, Segment2};
use num_traits::Float;
use rayon::prelude::*;

use super::polygon::Polygon;

/// A collection of pairwise-disjoint polygons representing one logical
/// region (typically the configuration-space obstacles).
///
/// Inserting a polygon merges it with every member it overlaps, so the set
/// always holds exactly one representative per connected component.
///
/// Point and segment queries run data-parallel across members with a shared
/// early exit; members are never mutated concurrently.
#[derive(Debug, Clone, Default)]
pub struct PolygonSet<F> {
    polygons: Vec<Polygon<F>>,
}

impl<F: Float + Send + Sync> PolygonSet<F> {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self {
            polygons: Vec::new(),
        }
    }

    /// Inserts a polygon, merging it with every member it overlaps.
    ///
    /// Members are pairwise disjoint before and after the call; a new
    /// polygon that bridges several members collapses them into one.
    pub fn insert(&mut self, polygon: Polygon<F>) {
        if polygon.is_empty() {
            return;
        }

        let mut united = polygon;
        let mut rest = Vec::with_capacity(self.polygons.len() + 1);

        for existing in self.polygons.drain(..) {
            if !united.unite(&existing) {
                rest.push(existing);
            }
        }

        rest.push(united);
        self.polygons = rest;
    }

    /// Tests whether any member contains the point.
    ///
    /// Members are tested in parallel; the first hit wins.
    pub fn contains(&self, point: Point2<F>, strict: bool) -> bool {
        self.polygons
            .par_iter()
            .any(|p| p.contains(point, strict))
    }

    /// Returns the member containing the point, if any.
    ///
    /// Callers that need to know *which* obstacle matched use this instead
    /// of [`PolygonSet::contains`].
    pub fn find_containing(&self, point: Point2<F>, strict: bool) -> Option<&Polygon<F>> {
        self.polygons
            .par_iter()
            .find_any(|p| p.contains(point, strict))
    }

    /// Tests whether the segment intersects any member.
    pub fn intersects_segment(&self, segment: Segment2<F>, strict: bool) -> bool {
        self.polygons
            .par_iter()
            .any(|p| p.intersects_segment(segment, strict))
    }

    /// Returns every point where the segment crosses a member boundary.
    pub fn segment_intersections(&self, segment: Segment2<F>) -> Vec<Point2<F>> {
        let mut out = Vec::new();
        for p in &self.polygons {
            out.extend(p.segment_intersections(segment));
        }
        out
    }

    /// Returns the union of all member bounding boxes.
    pub fn bounds(&self) -> Option<Aabb2<F>> {
        let mut iter = self.polygons.iter().filter_map(|p| p.bounds());
        let first = iter.next()?;
        Some(iter.fold(first, Aabb2::union))
    }

    /// Iterates over every boundary edge of every member (outer rings and
    /// holes).
    pub fn edges(&self) -> impl Iterator<Item = Segment2<F>> + '_ {
        self.polygons.iter().flat_map(|p| p.edges())
    }

    /// Iterates over every boundary vertex of every member.
    pub fn points(&self) -> impl Iterator<Item = Point2<F>> + '_ {
        self.polygons.iter().flat_map(|p| p.boundary_points())
    }

    /// Number of disjoint members.
    pub fn len(&self) -> usize {
        self.polygons.len()
    }

    /// Returns `true` if the set has no members.
    pub fn is_empty(&self) -> bool {
        self.polygons.is_empty()
    }

    /// Removes all members.
    pub fn clear(&mut self) {
        self.polygons.clear();
    }

    /// Iterates over the members.
    pub fn iter(&self) -> std::slice::Iter<'_, Polygon<F>> {
        self.polygons.iter()
    }

    /// Total covered area.
    pub fn area(&self) -> F {
        self.polygons
            .iter()
            .map(|p| p.area())
            .fold(F::zero(), |a, b| a + b)
    }
}

impl<F> std::ops::Index<usize> for PolygonSet<F> {
    type Output = Polygon<F>;

    fn index(&self, index: usize) -> &Polygon<F> {
        &self.polygons[index]
    }
}

impl<'a, F> IntoIterator for &'a PolygonSet<F> {
    type Item = &'a Polygon<F>;
    type IntoIter = std::slice::Iter<'a, Polygon<F>>;

    fn into_iter(self) -> Self::IntoIter {
        self.polygons.iter()
    }
}
