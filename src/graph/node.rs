//! Node implementation for the directed graph
//!
//! A node owns its labels and its outgoing edges (with their labels). The
//! incoming side only records source ids; edge labels never live there.

use super::label::LabelMap;
use super::types::NodeId;
use indexmap::IndexSet;

/// A node in the directed graph
///
/// Adjacency is stored by id, never by reference: the owning graph keeps
/// every `(u, v)` in `u.out_edges` mirrored by `u` in `v.in_edges`.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    id: NodeId,

    labels: LabelMap,

    /// Outgoing edges in insertion order, at most one per neighbour
    out_edges: Vec<(NodeId, LabelMap)>,

    /// Sources of incoming edges
    in_edges: IndexSet<NodeId>,
}

impl Node {
    /// Create a new node with the given labels
    pub fn new(id: NodeId, labels: LabelMap) -> Self {
        Node {
            id,
            labels,
            out_edges: Vec::new(),
            in_edges: IndexSet::new(),
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Get all labels
    pub fn labels(&self) -> &LabelMap {
        &self.labels
    }

    /// Out-neighbours in insertion order, and the set of in-neighbours
    pub fn neighbours(&self) -> (Vec<NodeId>, IndexSet<NodeId>) {
        let out = self.out_edges.iter().map(|(id, _)| *id).collect();
        (out, self.in_edges.clone())
    }

    /// (out-degree, in-degree)
    pub fn degrees(&self) -> (usize, usize) {
        (self.out_edges.len(), self.in_edges.len())
    }

    /// Outgoing edges with their labels
    pub fn out_edges(&self) -> impl Iterator<Item = (NodeId, &LabelMap)> + '_ {
        self.out_edges.iter().map(|(id, labels)| (*id, labels))
    }

    /// Sources of incoming edges
    pub fn in_edges(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.in_edges.iter().copied()
    }

    /// Labels of the edge from this node to `target`
    pub fn edge_labels(&self, target: NodeId) -> Option<&LabelMap> {
        self.out_edges
            .iter()
            .find(|(id, _)| *id == target)
            .map(|(_, labels)| labels)
    }

    pub fn has_in_edge(&self, source: NodeId) -> bool {
        self.in_edges.contains(&source)
    }

    /// Merge labels, last write wins per key
    pub(crate) fn merge_labels(&mut self, labels: &LabelMap) {
        self.labels
            .extend(labels.iter().map(|(k, v)| (k.clone(), v.clone())));
    }

    pub(crate) fn clear_labels(&mut self) {
        self.labels.clear();
    }

    /// Insert an outgoing edge, or merge `labels` into the existing one.
    /// Returns true if the edge is new.
    pub(crate) fn add_out_edge(&mut self, target: NodeId, labels: &LabelMap) -> bool {
        match self.out_edges.iter_mut().find(|(id, _)| *id == target) {
            Some((_, existing)) => {
                existing.extend(labels.iter().map(|(k, v)| (k.clone(), v.clone())));
                false
            }
            None => {
                self.out_edges.push((target, labels.clone()));
                true
            }
        }
    }

    pub(crate) fn add_in_edge(&mut self, source: NodeId) -> bool {
        self.in_edges.insert(source)
    }

    /// Remove the outgoing edge to `target`, keeping the order of the rest
    pub(crate) fn remove_out_edge(&mut self, target: NodeId) -> Option<LabelMap> {
        let pos = self.out_edges.iter().position(|(id, _)| *id == target)?;
        Some(self.out_edges.remove(pos).1)
    }

    pub(crate) fn remove_in_edge(&mut self, source: NodeId) -> bool {
        self.in_edges.shift_remove(&source)
    }
}
