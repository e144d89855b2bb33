//! In-memory directed graph storage
//!
//! The graph owns every node in a single id-indexed table. Edges are stored
//! on their source node as `(target, labels)` pairs and mirrored on the
//! target by the source id, so no node ever references another directly.

use super::label::{weight_of, with_weight, LabelMap, LabelValue};
use super::node::Node;
use super::types::{EdgeKey, NodeId};
use crate::config::GraphConfig;
use indexmap::{IndexMap, IndexSet};
use std::collections::HashSet;
use thiserror::Error;
use tracing::debug;

/// Errors that can occur during graph operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GraphError {
    #[error("Node {0} not found")]
    NodeNotFound(NodeId),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Node {end} is not reachable from node {start}")]
    Unreachable { start: NodeId, end: NodeId },

    #[error("Edge weight must be numeric, got {0}")]
    InvalidWeight(LabelValue),

    #[error("Adjacency dimension {dimension} exceeds the configured limit of {limit}")]
    AdjacencyTooLarge { dimension: u64, limit: usize },

    #[error("Adjacency matrix must be square, got {rows}x{cols}")]
    NonSquareMatrix { rows: usize, cols: usize },

    #[error("Malformed path: {0}")]
    MalformedPath(String),
}

pub type GraphResult<T> = Result<T, GraphError>;

/// Labels of one requested edge; `None` when the edge does not exist
pub type EdgeLabels = (EdgeKey, Option<LabelMap>);

/// In-memory labeled directed graph
#[derive(Debug, PartialEq)]
pub struct DirectedGraph {
    config: GraphConfig,

    /// Node table in insertion order
    nodes: IndexMap<NodeId, Node>,
}

impl Default for DirectedGraph {
    fn default() -> Self {
        Self::with_config(GraphConfig::default())
    }
}

impl Clone for DirectedGraph {
    fn clone(&self) -> Self {
        self.copy()
    }
}

impl DirectedGraph {
    /// Create a new empty graph
    pub fn new(name: impl Into<String>, default_weight: f64) -> Self {
        Self::with_config(GraphConfig::new(name, default_weight))
    }

    pub fn with_config(config: GraphConfig) -> Self {
        DirectedGraph {
            config,
            nodes: IndexMap::new(),
        }
    }

    /// Create a graph and fill it in bulk. Every node gets `node_labels`
    /// and every edge gets `edge_labels`.
    pub fn from_parts(
        config: GraphConfig,
        ids: &[NodeId],
        edges: &[EdgeKey],
        node_labels: &LabelMap,
        edge_labels: &LabelMap,
    ) -> GraphResult<Self> {
        let mut graph = Self::with_config(config);
        graph.add_nodes(ids, node_labels);
        graph.add_edges(edges, edge_labels)?;
        Ok(graph)
    }

    pub fn config(&self) -> &GraphConfig {
        &self.config
    }

    pub fn name(&self) -> &str {
        &self.config.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.config.name = name.into();
    }

    pub fn default_weight(&self) -> f64 {
        self.config.default_weight
    }

    /// Add nodes with the given ids. Missing nodes are created with a copy of
    /// `labels`; existing nodes have `labels` merged into theirs.
    pub fn add_nodes(&mut self, ids: &[NodeId], labels: &LabelMap) {
        for &id in ids {
            match self.nodes.get_mut(&id) {
                Some(node) => node.merge_labels(labels),
                None => {
                    self.nodes.insert(id, Node::new(id, labels.clone()));
                }
            }
        }
    }

    /// Add `count` nodes with freshly allocated ids, all labeled with `labels`.
    ///
    /// Ids are the smallest non-negative integers not already in the graph.
    /// Returns the allocated ids in allocation order.
    pub fn auto_add_nodes(&mut self, count: usize, labels: &LabelMap) -> Vec<NodeId> {
        let ids = self.free_ids(count, &HashSet::new());
        self.add_nodes(&ids, labels);
        debug!("Auto-added {} nodes to graph {}", ids.len(), self.config.name);
        ids
    }

    /// Smallest `count` ids absent from the graph and from `reserved`
    fn free_ids(&self, count: usize, reserved: &HashSet<NodeId>) -> Vec<NodeId> {
        let mut ids = Vec::with_capacity(count);
        let mut candidate = 0u64;
        while ids.len() < count {
            let id = NodeId::new(candidate);
            if !self.nodes.contains_key(&id) && !reserved.contains(&id) {
                ids.push(id);
            }
            candidate += 1;
        }
        ids
    }

    /// Add edges, all carrying a copy of `labels`.
    ///
    /// A missing `weight` label is filled with the default weight. Missing
    /// endpoints are created. An existing edge has the labels merged in.
    pub fn add_edges(&mut self, edges: &[EdgeKey], labels: &LabelMap) -> GraphResult<()> {
        let labels =
            with_weight(labels, self.config.default_weight).map_err(GraphError::InvalidWeight)?;
        for &(source, target) in edges {
            self.insert_edge(source, target, &labels);
        }
        Ok(())
    }

    /// Wire one edge whose labels already carry a numeric weight
    pub(crate) fn insert_edge(&mut self, source: NodeId, target: NodeId, labels: &LabelMap) {
        let empty = LabelMap::new();
        self.add_nodes(&[source, target], &empty);

        if let Some(node) = self.nodes.get_mut(&source) {
            node.add_out_edge(target, labels);
        }
        if let Some(node) = self.nodes.get_mut(&target) {
            node.add_in_edge(source);
        }
    }

    /// Remove edges. Absent edges are ignored. Returns how many were removed.
    pub fn rmv_edges(&mut self, edges: &[EdgeKey]) -> usize {
        let mut removed = 0;
        for &(source, target) in edges {
            let existed = self
                .nodes
                .get_mut(&source)
                .and_then(|node| node.remove_out_edge(target))
                .is_some();
            if let Some(node) = self.nodes.get_mut(&target) {
                node.remove_in_edge(source);
            }
            if existed {
                removed += 1;
            }
        }
        removed
    }

    /// Remove nodes and every edge incident to them.
    ///
    /// Fails without removing anything if any id is unknown.
    pub fn rmv_nodes(&mut self, ids: &[NodeId]) -> GraphResult<()> {
        if let Some(&missing) = ids.iter().find(|id| !self.nodes.contains_key(*id)) {
            return Err(GraphError::NodeNotFound(missing));
        }

        for &id in ids {
            let incident: Vec<EdgeKey> = match self.nodes.get(&id) {
                Some(node) => node
                    .out_edges()
                    .map(|(target, _)| (id, target))
                    .chain(node.in_edges().map(|source| (source, id)))
                    .collect(),
                // Repeated id, already removed
                None => continue,
            };
            self.rmv_edges(&incident);
            self.nodes.shift_remove(&id);
            debug!("Removed node {} and {} incident edges", id, incident.len());
        }
        Ok(())
    }

    /// Merge labels into one existing node
    pub fn add_node_labels(&mut self, id: NodeId, labels: &LabelMap) -> GraphResult<()> {
        self.nodes
            .get_mut(&id)
            .ok_or(GraphError::NodeNotFound(id))?
            .merge_labels(labels);
        Ok(())
    }

    /// Drop every label of a node
    pub fn clear_node_labels(&mut self, id: NodeId) -> GraphResult<()> {
        self.nodes
            .get_mut(&id)
            .ok_or(GraphError::NodeNotFound(id))?
            .clear_labels();
        Ok(())
    }

    /// Get a node by ID
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    pub fn contains_node(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    /// Node ids in insertion order
    pub fn node_ids(&self) -> Vec<NodeId> {
        self.nodes.keys().copied().collect()
    }

    /// Nodes in insertion order
    pub fn nodes(&self) -> impl Iterator<Item = &Node> + '_ {
        self.nodes.values()
    }

    pub fn node_labels(&self, id: NodeId) -> GraphResult<&LabelMap> {
        self.require(id).map(Node::labels)
    }

    /// (out-neighbours in insertion order, in-neighbours)
    pub fn neighbours(&self, id: NodeId) -> GraphResult<(Vec<NodeId>, IndexSet<NodeId>)> {
        self.require(id).map(Node::neighbours)
    }

    /// (out-degree, in-degree)
    pub fn degrees(&self, id: NodeId) -> GraphResult<(usize, usize)> {
        self.require(id).map(Node::degrees)
    }

    fn require(&self, id: NodeId) -> GraphResult<&Node> {
        self.nodes.get(&id).ok_or(GraphError::NodeNotFound(id))
    }

    /// Every edge, by scanning the out-edges of each node in order
    pub fn get_edges(&self) -> Vec<EdgeKey> {
        self.nodes
            .values()
            .flat_map(|node| node.out_edges().map(move |(target, _)| (node.id(), target)))
            .collect()
    }

    /// Labels of the edge `(source, target)`
    pub fn edge_labels(&self, (source, target): EdgeKey) -> Option<&LabelMap> {
        self.nodes.get(&source)?.edge_labels(target)
    }

    /// Resolved weight of an edge
    pub fn edge_weight(&self, edge: EdgeKey) -> Option<f64> {
        weight_of(self.edge_labels(edge)?)
    }

    pub fn has_edge(&self, edge: EdgeKey) -> bool {
        self.edge_labels(edge).is_some()
    }

    /// Labels for each requested edge, in request order
    pub fn get_edges_labels(&self, edges: &[EdgeKey]) -> Vec<EdgeLabels> {
        edges
            .iter()
            .map(|&edge| (edge, self.edge_labels(edge).cloned()))
            .collect()
    }

    /// (node count, edge count)
    pub fn size(&self) -> (usize, usize) {
        (self.node_count(), self.edge_count())
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.nodes.values().map(|node| node.degrees().0).sum()
    }

    /// Deep, fully independent copy of the graph
    pub fn copy(&self) -> Self {
        let nodes = self
            .nodes
            .iter()
            .map(|(&id, node)| (id, node.clone()))
            .collect();
        DirectedGraph {
            config: self.config.clone(),
            nodes,
        }
    }

    /// Merge every node and edge of `other` into this graph.
    ///
    /// Ids of `other` that already exist here are remapped to the smallest
    /// ids free in both graphs. Returns the old-to-new id table for all
    /// merged nodes.
    pub fn add_graph(&mut self, other: &DirectedGraph) -> IndexMap<NodeId, NodeId> {
        let mut reserved: HashSet<NodeId> = other.nodes.keys().copied().collect();
        let mut remap = IndexMap::with_capacity(other.nodes.len());

        for &id in other.nodes.keys() {
            let new_id = if self.nodes.contains_key(&id) {
                let fresh = self.free_ids(1, &reserved)[0];
                reserved.insert(fresh);
                fresh
            } else {
                id
            };
            remap.insert(id, new_id);
        }

        for (id, node) in &other.nodes {
            self.add_nodes(&[remap[id]], node.labels());
        }
        for node in other.nodes.values() {
            for (target, labels) in node.out_edges() {
                self.insert_edge(remap[&node.id()], remap[&target], labels);
            }
        }

        debug!(
            "Merged graph {} ({} nodes) into {}",
            other.config.name,
            remap.len(),
            self.config.name
        );
        remap
    }
}
