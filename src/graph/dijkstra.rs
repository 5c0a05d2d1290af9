//! Weighted shortest paths.

use super::Graph;
use crate::primitives::Point2;
use num_traits::Float;
use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// Heap entry ordered so the smallest cost pops first.
struct State<F> {
    cost: F,
    vertex: usize,
}

impl<F: Float> PartialEq for State<F> {
    fn eq(&self, other: &Self) -> bool {
        self.cost == other.cost
    }
}

impl<F: Float> Eq for State<F> {}

impl<F: Float> PartialOrd for State<F> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<F: Float> Ord for State<F> {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed for a min-heap; NaN costs never enter the queue.
        other
            .cost
            .partial_cmp(&self.cost)
            .unwrap_or(Ordering::Equal)
    }
}

/// Computes the shortest path from `source` to `target` by Dijkstra's
/// algorithm.
///
/// Edge weight is always the Euclidean distance between the endpoint
/// coordinates, which is non-negative, so the classic algorithm applies.
/// Returns `None` when `target` is unreachable.
pub fn dijkstra<F: Float>(graph: &Graph<F>, source: usize, target: usize) -> Option<Vec<Point2<F>>> {
    let n = graph.len();
    if source >= n || target >= n {
        return None;
    }

    let vertices = graph.vertices();
    let mut dist: Vec<Option<F>> = vec![None; n];
    let mut prev: Vec<usize> = vec![usize::MAX; n];
    let mut heap = BinaryHeap::new();

    dist[source] = Some(F::zero());
    heap.push(State {
        cost: F::zero(),
        vertex: source,
    });

    while let Some(State { cost, vertex }) = heap.pop() {
        if vertex == target {
            break;
        }
        // Stale entry: a shorter route to this vertex was already settled.
        if let Some(d) = dist[vertex] {
            if cost > d {
                continue;
            }
        }

        for &next in &graph.adjacency()[vertex] {
            let weight = vertices[vertex].distance(vertices[next]);
            let candidate = cost + weight;

            let better = match dist[next] {
                None => true,
                Some(d) => candidate < d,
            };
            if better {
                dist[next] = Some(candidate);
                prev[next] = vertex;
                heap.push(State {
                    cost: candidate,
                    vertex: next,
                });
            }
        }
    }

    dist[target]?;

    let mut path = Vec::new();
    let mut v = target;
    loop {
        path.push(vertices[v]);
        if v == source {
            break;
        }
        v = prev[v];
    }
    path.reverse();
    Some(path)
}
