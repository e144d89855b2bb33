//! On-disk graph records
//!
//! A saved graph is a directory holding four bincode-encoded artifacts:
//! the ordered id list, the edge weight map, the attribute record and the
//! edge-label record (labels without the weight).

use super::{PersistenceError, PersistenceResult};
use crate::graph::{weight_of, DirectedGraph, EdgeKey, LabelMap, NodeId, WEIGHT_KEY};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fs::File;
use std::io::{BufReader, BufWriter, ErrorKind, Write};
use std::path::Path;
use tracing::debug;

pub const ID_LIST_FILE: &str = "id_list.bin";
pub const ADJACENCY_FILE: &str = "adjacency.bin";
pub const ATTRIBUTES_FILE: &str = "attributes.bin";
pub const EDGE_LABELS_FILE: &str = "edge_labels.bin";

/// Graph-level attributes and node labels
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphAttributes {
    pub name: String,
    pub default_weight: f64,
    pub node_labels: BTreeMap<NodeId, LabelMap>,
}

/// In-memory form of the four artifacts
#[derive(Debug, Clone, PartialEq)]
pub struct GraphSnapshot {
    pub ids: Vec<NodeId>,
    pub weights: BTreeMap<EdgeKey, f64>,
    pub attributes: GraphAttributes,
    pub edge_labels: BTreeMap<EdgeKey, LabelMap>,
}

impl GraphSnapshot {
    /// Capture the current state of a graph
    pub fn capture(graph: &DirectedGraph) -> Self {
        let mut weights = BTreeMap::new();
        let mut edge_labels = BTreeMap::new();
        for edge in graph.get_edges() {
            let mut labels = graph.edge_labels(edge).cloned().unwrap_or_default();
            let weight = weight_of(&labels).unwrap_or_else(|| graph.default_weight());
            labels.remove(WEIGHT_KEY);
            weights.insert(edge, weight);
            edge_labels.insert(edge, labels);
        }

        let node_labels = graph
            .nodes()
            .map(|node| (node.id(), node.labels().clone()))
            .collect();

        GraphSnapshot {
            ids: graph.node_ids(),
            weights,
            attributes: GraphAttributes {
                name: graph.name().to_string(),
                default_weight: graph.default_weight(),
                node_labels,
            },
            edge_labels,
        }
    }

    /// Write all four artifacts into an existing directory
    pub fn write(&self, dir: &Path) -> PersistenceResult<()> {
        write_record(&dir.join(ID_LIST_FILE), &self.ids)?;
        write_record(&dir.join(ADJACENCY_FILE), &self.weights)?;
        write_record(&dir.join(ATTRIBUTES_FILE), &self.attributes)?;
        write_record(&dir.join(EDGE_LABELS_FILE), &self.edge_labels)?;
        debug!("Wrote {} nodes and {} edges to {:?}", self.ids.len(), self.weights.len(), dir);
        Ok(())
    }

    /// Read and validate all four artifacts
    pub fn read(dir: &Path) -> PersistenceResult<Self> {
        let snapshot = GraphSnapshot {
            ids: read_record(dir, ID_LIST_FILE)?,
            weights: read_record(dir, ADJACENCY_FILE)?,
            attributes: read_record(dir, ATTRIBUTES_FILE)?,
            edge_labels: read_record(dir, EDGE_LABELS_FILE)?,
        };
        snapshot.validate()?;
        Ok(snapshot)
    }

    /// Check that the artifacts describe the same nodes and edges
    pub fn validate(&self) -> PersistenceResult<()> {
        let ids: BTreeSet<NodeId> = self.ids.iter().copied().collect();
        if ids.len() != self.ids.len() {
            return Err(schema("id list contains duplicate ids"));
        }

        let labeled: BTreeSet<NodeId> = self.attributes.node_labels.keys().copied().collect();
        if ids != labeled {
            return Err(schema("id list and node labels describe different nodes"));
        }

        if !self.weights.keys().eq(self.edge_labels.keys()) {
            return Err(schema("edge weights and edge labels describe different edges"));
        }

        if let Some((source, target)) = self
            .weights
            .keys()
            .find(|(source, target)| !ids.contains(source) || !ids.contains(target))
        {
            return Err(schema(format!(
                "edge ({}, {}) references a node missing from the id list",
                source, target
            )));
        }
        Ok(())
    }
}

fn schema(message: impl Into<String>) -> PersistenceError {
    PersistenceError::Schema(message.into())
}

pub(crate) fn write_record<T: Serialize>(path: &Path, value: &T) -> PersistenceResult<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    bincode::serialize_into(&mut writer, value)?;
    writer.flush()?;
    Ok(())
}

/// Read one artifact; any failure is reported as a schema error
pub(crate) fn read_record<T: DeserializeOwned>(dir: &Path, file: &str) -> PersistenceResult<T> {
    let path = dir.join(file);
    let handle = File::open(&path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => schema(format!("missing artifact {} in {:?}", file, dir)),
        _ => schema(format!("unreadable artifact {:?}: {}", path, e)),
    })?;
    bincode::deserialize_from(BufReader::new(handle))
        .map_err(|e| schema(format!("corrupt artifact {:?}: {}", path, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{edge, labels, weighted, LabelValue};
    use tempfile::TempDir;

    fn sample() -> DirectedGraph {
        let mut graph = DirectedGraph::new("sample", 1.0);
        graph.add_nodes(&[NodeId::new(4)], &labels([("name", "four")]));
        let road = labels([("weight", LabelValue::Float(2.0)), ("road", "A1".into())]);
        graph.add_edges(&[edge(4, 1)], &road).unwrap();
        graph.add_edges(&[edge(1, 4)], &weighted(0.0)).unwrap();
        graph
    }

    #[test]
    fn test_capture() {
        let snapshot = GraphSnapshot::capture(&sample());

        assert_eq!(snapshot.ids, vec![NodeId::new(4), NodeId::new(1)]);
        assert_eq!(snapshot.weights.get(&edge(4, 1)), Some(&2.0));
        // Zero weights are kept, unlike the sparse adjacency form
        assert_eq!(snapshot.weights.get(&edge(1, 4)), Some(&0.0));
        let road = snapshot.edge_labels.get(&edge(4, 1)).unwrap();
        assert!(!road.contains_key(WEIGHT_KEY));
        assert_eq!(road.get("road").unwrap().as_text(), Some("A1"));
        assert_eq!(snapshot.attributes.name, "sample");
        assert!(snapshot.validate().is_ok());
    }

    #[test]
    fn test_write_read() {
        let temp_dir = TempDir::new().unwrap();
        let snapshot = GraphSnapshot::capture(&sample());
        snapshot.write(temp_dir.path()).unwrap();

        for file in [ID_LIST_FILE, ADJACENCY_FILE, ATTRIBUTES_FILE, EDGE_LABELS_FILE] {
            assert!(temp_dir.path().join(file).exists());
        }
        assert_eq!(GraphSnapshot::read(temp_dir.path()).unwrap(), snapshot);
    }

    #[test]
    fn test_read_missing_artifact() {
        let temp_dir = TempDir::new().unwrap();
        GraphSnapshot::capture(&sample()).write(temp_dir.path()).unwrap();
        std::fs::remove_file(temp_dir.path().join(EDGE_LABELS_FILE)).unwrap();

        let result = GraphSnapshot::read(temp_dir.path());
        assert!(
            matches!(result, Err(PersistenceError::Schema(msg)) if msg.contains(EDGE_LABELS_FILE))
        );
    }

    #[test]
    fn test_read_corrupt_artifact() {
        let temp_dir = TempDir::new().unwrap();
        GraphSnapshot::capture(&sample()).write(temp_dir.path()).unwrap();
        std::fs::write(temp_dir.path().join(ATTRIBUTES_FILE), b"\x01").unwrap();

        assert!(matches!(
            GraphSnapshot::read(temp_dir.path()),
            Err(PersistenceError::Schema(_))
        ));
    }

    #[test]
    fn test_validate_rejects_inconsistent_artifacts() {
        let good = GraphSnapshot::capture(&sample());

        let mut extra_edge = good.clone();
        extra_edge.weights.insert(edge(4, 4), 1.0);
        assert!(matches!(extra_edge.validate(), Err(PersistenceError::Schema(_))));

        let mut unknown_node = good.clone();
        unknown_node.weights.insert(edge(4, 9), 1.0);
        unknown_node.edge_labels.insert(edge(4, 9), LabelMap::new());
        assert!(matches!(unknown_node.validate(), Err(PersistenceError::Schema(_))));

        let mut missing_labels = good.clone();
        missing_labels.attributes.node_labels.remove(&NodeId::new(1));
        assert!(matches!(missing_labels.validate(), Err(PersistenceError::Schema(_))));

        let mut duplicate = good;
        duplicate.ids.push(NodeId::new(4));
        assert!(matches!(duplicate.validate(), Err(PersistenceError::Schema(_))));
    }
}
