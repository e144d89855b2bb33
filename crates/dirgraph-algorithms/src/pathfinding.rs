//! Pathfinding algorithms
//!
//! Single-source, single-target Dijkstra over non-negative edge weights.

use super::common::{GraphView, NodeId};
use std::cmp::Ordering;
use std::collections::BinaryHeap;
use thiserror::Error;

/// Result of a pathfinding algorithm
#[derive(Debug, Clone, PartialEq)]
pub struct PathResult {
    pub source: NodeId,
    pub target: NodeId,
    pub path: Vec<NodeId>,
    pub cost: f64,
}

/// Reasons a shortest-path query produces no path
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PathError {
    #[error("node {0} is not part of the graph view")]
    UnknownNode(NodeId),

    #[error("node {to} is not reachable from node {from}")]
    Unreachable { from: NodeId, to: NodeId },

    #[error("predecessor chain from node {to} does not lead back to node {from}")]
    BrokenChain { from: NodeId, to: NodeId },
}

/// State for Dijkstra priority queue
#[derive(Copy, Clone, PartialEq)]
struct State {
    cost: f64,
    node_idx: usize,
}

impl Eq for State {}

impl Ord for State {
    fn cmp(&self, other: &Self) -> Ordering {
        // Compare costs reversed for min-heap, lowest index wins ties
        other
            .cost
            .partial_cmp(&self.cost)
            .unwrap_or(Ordering::Equal)
            .then_with(|| other.node_idx.cmp(&self.node_idx))
    }
}

impl PartialOrd for State {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Dijkstra's Algorithm (Weighted Shortest Path)
///
/// Uses edge weights from GraphView if available, otherwise assumes 1.0.
/// Negative (and NaN) weights are skipped. The search stops as soon as the
/// target is settled. Among equal-cost candidates the node with the lowest
/// dense index is settled first, so results are reproducible.
pub fn dijkstra(view: &GraphView, source: NodeId, target: NodeId) -> Result<PathResult, PathError> {
    let source_idx = view.index_of(source).ok_or(PathError::UnknownNode(source))?;
    let target_idx = view.index_of(target).ok_or(PathError::UnknownNode(target))?;

    let mut dist = vec![f64::INFINITY; view.node_count];
    let mut parent: Vec<Option<usize>> = vec![None; view.node_count];
    let mut settled = vec![false; view.node_count];
    let mut heap = BinaryHeap::new();

    dist[source_idx] = 0.0;
    heap.push(State { cost: 0.0, node_idx: source_idx });

    while let Some(State { cost, node_idx }) = heap.pop() {
        if settled[node_idx] {
            continue;
        }
        settled[node_idx] = true;

        if node_idx == target_idx {
            let indices = reconstruct_path(&parent, source_idx, target_idx)
                .ok_or(PathError::BrokenChain {
                    from: source,
                    to: target,
                })?;
            return Ok(PathResult {
                source,
                target,
                path: indices.into_iter().map(|idx| view.index_to_node[idx]).collect(),
                cost,
            });
        }

        let weights = view.weights(node_idx);
        for (i, &next_idx) in view.successors(node_idx).iter().enumerate() {
            let weight = weights.map_or(1.0, |w| w[i]);
            if weight < 0.0 || weight.is_nan() || settled[next_idx] {
                continue;
            }

            let next_cost = cost + weight;
            if next_cost < dist[next_idx] {
                dist[next_idx] = next_cost;
                parent[next_idx] = Some(node_idx);
                heap.push(State { cost: next_cost, node_idx: next_idx });
            }
        }
    }

    Err(PathError::Unreachable {
        from: source,
        to: target,
    })
}

/// Walk the predecessor chain from `target` back to `source`.
///
/// Returns `None` when a link is missing or the chain is longer than the
/// number of nodes (which can only happen if it loops).
fn reconstruct_path(parent: &[Option<usize>], source: usize, target: usize) -> Option<Vec<usize>> {
    let mut path = vec![target];
    let mut curr = target;
    while curr != source {
        if path.len() > parent.len() {
            return None;
        }
        curr = (*parent.get(curr)?)?;
        path.push(curr);
    }
    path.reverse();
    Some(path)
}
