//! Graph algorithms module
//!
//! Algorithms are implemented in the `dirgraph-algorithms` crate over a
//! CSR [`GraphView`]. This module provides the integration/adapter layer.

pub mod pathfinding;

use crate::graph::{weight_of, DirectedGraph};
use dirgraph_algorithms::{GraphView, NodeId as AlgoNodeId};
use rustc_hash::FxHashMap;

// Re-export algorithms
pub use dirgraph_algorithms::{dijkstra, PathError, PathResult};
pub use pathfinding::{min_path, MinPath};

/// Build a GraphView snapshot of the graph for algorithm execution.
///
/// Dense indices follow ascending node id, so index-based tie-breaking in
/// the algorithms amounts to lowest-id-first.
pub fn build_view(graph: &DirectedGraph) -> GraphView {
    let mut index_to_node: Vec<AlgoNodeId> = graph
        .node_ids()
        .into_iter()
        .map(|id| id.as_u64())
        .collect();
    index_to_node.sort_unstable();

    let node_to_index: FxHashMap<AlgoNodeId, usize> = index_to_node
        .iter()
        .enumerate()
        .map(|(idx, &id)| (id, idx))
        .collect();

    let outgoing = index_to_node
        .iter()
        .map(|&id| {
            graph
                .node(id.into())
                .map(|node| {
                    node.out_edges()
                        .filter_map(|(target, labels)| {
                            let weight = weight_of(labels)?;
                            Some((*node_to_index.get(&target.as_u64())?, weight))
                        })
                        .collect()
                })
                .unwrap_or_default()
        })
        .collect();

    GraphView::from_adjacency_list(index_to_node, outgoing)
}
