//! Dirgraph
//!
//! An in-memory labeled directed graph engine.
//!
//! # Features
//!
//! - Nodes and edges with arbitrary key/value labels
//! - Every edge carries a numeric `weight` label (filled with the graph's
//!   default weight when omitted)
//! - Bulk and auto-allocated node insertion, cascading node removal
//! - Dense and sparse adjacency matrix conversion
//! - Four-artifact persistence with collision-free merge import
//! - Dijkstra shortest path between two nodes
//!
//! ## Example Usage
//!
//! ```rust
//! use dirgraph::graph::{edge, labels, weighted, DirectedGraph, NodeId};
//!
//! let mut graph = DirectedGraph::new("roads", 1.0);
//! graph.add_nodes(&[NodeId::new(0)], &labels([("city", "Rome")]));
//!
//! graph.add_edges(&[edge(0, 1), edge(1, 2)], &weighted(1.0)).unwrap();
//! graph.add_edges(&[edge(0, 2)], &weighted(5.0)).unwrap();
//! assert_eq!(graph.size(), (3, 3));
//!
//! let shortest = graph.min_path(NodeId::new(0), NodeId::new(2)).unwrap();
//! assert_eq!(shortest.path, vec![NodeId::new(0), NodeId::new(1), NodeId::new(2)]);
//! assert_eq!(shortest.weights, vec![1.0, 1.0]);
//! ```

#![allow(missing_docs)]
#![warn(clippy::all)]

pub mod algo;
pub mod config;
pub mod graph;
pub mod persistence;

// Re-export main types for convenience
pub use algo::{min_path, MinPath};
pub use config::{GraphConfig, SaveOptions};
pub use graph::{
    Adjacency, AdjacencyForm, DirectedGraph, EdgeKey, GraphError, GraphResult, LabelMap,
    LabelValue, Node, NodeId,
};
pub use persistence::{load_graph, PersistenceError, PersistenceResult};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get version string
pub fn version() -> &'static str {
    VERSION
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        let ver = version();
        assert!(!ver.is_empty());
        assert_eq!(ver, "0.1.0");
    }
}
