//! Core type definitions for the graph

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for a node
///
/// Ids are caller-assigned or allocated by the graph as the smallest unused
/// non-negative integers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
pub struct NodeId(pub u64);

impl NodeId {
    pub fn new(id: u64) -> Self {
        NodeId(id)
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({})", self.0)
    }
}

impl From<u64> for NodeId {
    fn from(id: u64) -> Self {
        NodeId(id)
    }
}

/// A directed edge, identified by its `(source, target)` endpoints.
///
/// A graph holds at most one edge per ordered pair.
pub type EdgeKey = (NodeId, NodeId);

/// Build an [`EdgeKey`] from raw ids
pub fn edge(source: u64, target: u64) -> EdgeKey {
    (NodeId(source), NodeId(target))
}
