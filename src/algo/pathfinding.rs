//! Shortest path queries over a [`DirectedGraph`]

use super::build_view;
use crate::graph::{weight_of, DirectedGraph, EdgeKey, GraphError, GraphResult, NodeId};
use dirgraph_algorithms::{dijkstra, PathError};
use tracing::debug;

/// Minimum-weight path between two nodes
#[derive(Debug, Clone, PartialEq)]
pub struct MinPath {
    /// Node ids from start to end, both included
    pub path: Vec<NodeId>,
    /// Weight of each step, `path.len() - 1` entries
    pub weights: Vec<f64>,
}

impl MinPath {
    /// Total path weight
    pub fn cost(&self) -> f64 {
        self.weights.iter().sum()
    }
}

/// Dijkstra shortest path from `start` to `end`.
///
/// Fails with `InvalidInput` if either node is missing and `Unreachable` if
/// no path exists. Step weights are read back from the edge labels.
pub fn min_path(graph: &DirectedGraph, start: NodeId, end: NodeId) -> GraphResult<MinPath> {
    for id in [start, end] {
        if !graph.contains_node(id) {
            return Err(GraphError::InvalidInput(format!(
                "shortest path endpoint {} is not in graph {}",
                id,
                graph.name()
            )));
        }
    }
    if start == end {
        return Ok(MinPath {
            path: vec![start],
            weights: Vec::new(),
        });
    }

    let view = build_view(graph);
    let result = dijkstra(&view, start.as_u64(), end.as_u64()).map_err(|err| match err {
        PathError::UnknownNode(id) => {
            GraphError::InvalidInput(format!("node {} is not in the graph view", id))
        }
        PathError::Unreachable { .. } => GraphError::Unreachable { start, end },
        PathError::BrokenChain { .. } => GraphError::MalformedPath(err.to_string()),
    })?;

    let path: Vec<NodeId> = result.path.into_iter().map(NodeId::new).collect();
    let steps: Vec<EdgeKey> = path.windows(2).map(|pair| (pair[0], pair[1])).collect();
    let weights = graph
        .get_edges_labels(&steps)
        .into_iter()
        .map(|((source, target), labels)| {
            labels.as_ref().and_then(weight_of).ok_or_else(|| {
                let step = format!("step {} -> {} is not a weighted edge", source, target);
                GraphError::MalformedPath(step)
            })
        })
        .collect::<GraphResult<Vec<f64>>>()?;

    debug!("Shortest path {} -> {}: {} steps, cost {}", start, end, weights.len(), result.cost);
    Ok(MinPath { path, weights })
}

impl DirectedGraph {
    /// Dijkstra shortest path from `start` to `end`, see [`min_path`]
    pub fn min_path(&self, start: NodeId, end: NodeId) -> GraphResult<MinPath> {
        min_path(self, start, end)
    }
}
