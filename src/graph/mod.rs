//! Core directed graph implementation
//!
//! This module implements the labeled directed graph model:
//! - Nodes with arbitrary key/value labels
//! - Directed edges with labels, always carrying a numeric weight
//! - An id-indexed node table owning all adjacency
//! - Dense and sparse adjacency matrix conversion

pub mod adjacency;
pub mod label;
pub mod node;
pub mod store;
pub mod types;

// Re-export main types
pub use adjacency::{Adjacency, AdjacencyForm, SparseAdjacency};
pub use label::{labels, weight_of, weighted, with_weight, LabelMap, LabelValue, WEIGHT_KEY};
pub use node::Node;
pub use store::{DirectedGraph, EdgeLabels, GraphError, GraphResult};
pub use types::{edge, EdgeKey, NodeId};
