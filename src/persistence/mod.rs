//! Persistence layer for dirgraph
//!
//! Saves a graph as a directory of four artifacts and imports it back.
//! Imports never reuse the stored ids: every stored node gets a freshly
//! allocated id, so a saved graph can be merged into a live one without
//! collisions. All paths are explicit; the process working directory is
//! never changed.

pub mod storage;

pub use storage::{
    GraphAttributes, GraphSnapshot, ADJACENCY_FILE, ATTRIBUTES_FILE, EDGE_LABELS_FILE,
    ID_LIST_FILE,
};

use crate::config::{GraphConfig, SaveOptions};
use crate::graph::{DirectedGraph, GraphError, LabelMap, LabelValue, NodeId, WEIGHT_KEY};
use indexmap::IndexMap;
use std::fs;
use std::io::ErrorKind;
use std::ffi::OsStr;
use std::path::{Component, Path, PathBuf};
use tracing::{info, warn};

/// Persistence errors
#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] bincode::Error),

    /// One or more artifacts missing, unreadable or mutually inconsistent
    #[error("Persistence schema error: {0}")]
    Schema(String),

    #[error("Graph error: {0}")]
    Graph(#[from] GraphError),
}

pub type PersistenceResult<T> = Result<T, PersistenceError>;

impl DirectedGraph {
    /// Save the graph into a new directory and return its path.
    ///
    /// The directory is `options.directory` (default: current directory)
    /// joined with `options.name` (default: the graph name). If that
    /// directory exists, `(1)`, `(2)`, ... is appended to the directory name.
    /// The name must be a single plain path component.
    pub fn save(&self, options: &SaveOptions) -> PersistenceResult<PathBuf> {
        let parent = options.directory.clone().unwrap_or_else(|| PathBuf::from("."));
        let base = options.name.clone().unwrap_or_else(|| self.name().to_string());
        check_dir_name(&base)?;

        let dir = create_unique_dir(&parent, &base)?;
        write_fresh_dir(&dir, &GraphSnapshot::capture(self))?;

        let (nodes, edges) = self.size();
        info!("Saved graph {} ({} nodes, {} edges) to {:?}", self.name(), nodes, edges, dir);
        Ok(dir)
    }

    /// Merge a saved graph into this one.
    ///
    /// Stored nodes receive fresh ids from [`DirectedGraph::auto_add_nodes`],
    /// matched by position in the stored id list. Returns the stored-to-new
    /// id table. The graph is left untouched if any artifact is missing,
    /// unreadable or inconsistent.
    pub fn add_from_files(
        &mut self,
        path: impl AsRef<Path>,
    ) -> PersistenceResult<IndexMap<NodeId, NodeId>> {
        let path = path.as_ref();
        let snapshot = GraphSnapshot::read(path)?;

        let new_ids = self.auto_add_nodes(snapshot.ids.len(), &LabelMap::new());
        let remap: IndexMap<NodeId, NodeId> = snapshot.ids.iter().copied().zip(new_ids).collect();

        for (stored, &new) in &remap {
            if let Some(labels) = snapshot.attributes.node_labels.get(stored) {
                self.add_nodes(&[new], labels);
            }
        }

        for (&(source, target), &weight) in &snapshot.weights {
            let mut labels = snapshot
                .edge_labels
                .get(&(source, target))
                .cloned()
                .unwrap_or_default();
            labels.insert(WEIGHT_KEY.to_string(), LabelValue::Float(weight));
            self.insert_edge(remap[&source], remap[&target], &labels);
        }

        info!(
            "Imported {} nodes and {} edges from {:?} into graph {}",
            remap.len(),
            snapshot.weights.len(),
            path,
            self.name()
        );
        Ok(remap)
    }
}

/// Load a saved graph into a new graph carrying the stored name and default weight
pub fn load_graph(path: impl AsRef<Path>) -> PersistenceResult<DirectedGraph> {
    let path = path.as_ref();
    let attributes: GraphAttributes = storage::read_record(path, ATTRIBUTES_FILE)?;
    let mut graph =
        DirectedGraph::with_config(GraphConfig::new(attributes.name, attributes.default_weight));
    graph.add_from_files(path)?;
    Ok(graph)
}

fn check_dir_name(name: &str) -> PersistenceResult<()> {
    let mut components = Path::new(name).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(part)), None) if part == OsStr::new(name) => Ok(()),
        _ => Err(PersistenceError::Graph(GraphError::InvalidInput(format!(
            "save directory name {:?} must be a single plain path component",
            name
        )))),
    }
}

/// Write the artifacts into a directory created for them, removing it again
/// if any write fails
fn write_fresh_dir(dir: &Path, snapshot: &GraphSnapshot) -> PersistenceResult<()> {
    let result = snapshot.write(dir);
    if result.is_err() {
        if let Err(e) = fs::remove_dir_all(dir) {
            warn!("Could not remove partially written directory {:?}: {}", dir, e);
        }
    }
    result
}

/// Create `parent/base`, or the first free `parent/base(n)`
fn create_unique_dir(parent: &Path, base: &str) -> PersistenceResult<PathBuf> {
    fs::create_dir_all(parent)?;
    let mut suffix = 0u32;
    loop {
        let name = if suffix == 0 {
            base.to_string()
        } else {
            format!("{}({})", base, suffix)
        };
        let dir = parent.join(name);
        match fs::create_dir(&dir) {
            Ok(()) => return Ok(dir),
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                if suffix == 0 {
                    warn!("Directory {:?} already exists, adding a suffix", dir);
                }
                suffix += 1;
            }
            Err(e) => return Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{edge, labels, weighted};
    use tempfile::TempDir;

    fn sample() -> DirectedGraph {
        let mut graph = DirectedGraph::new("roads", 1.0);
        graph.add_nodes(&[NodeId::new(0)], &labels([("city", "Rome")]));
        graph.add_edges(&[edge(2, 1), edge(1, 3)], &weighted(2.0)).unwrap();
        graph
            .add_edges(&[edge(0, 1)], &labels([("length", "10"), ("colour", "blue")]))
            .unwrap();
        graph
    }

    #[test]
    fn test_save_creates_directory() {
        let temp_dir = TempDir::new().unwrap();
        let dir = sample().save(&SaveOptions::in_directory(temp_dir.path())).unwrap();

        assert_eq!(dir, temp_dir.path().join("roads"));
        for file in [ID_LIST_FILE, ADJACENCY_FILE, ATTRIBUTES_FILE, EDGE_LABELS_FILE] {
            assert!(dir.join(file).is_file());
        }
    }

    #[test]
    fn test_save_collision_suffix() {
        let temp_dir = TempDir::new().unwrap();
        let graph = sample();
        let options = SaveOptions::in_directory(temp_dir.path());

        let first = graph.save(&options).unwrap();
        let second = graph.save(&options).unwrap();
        let third = graph.save(&options.clone().with_name("backup")).unwrap();
        let fourth = graph.save(&options.clone().with_name("backup")).unwrap();

        assert_eq!(first, temp_dir.path().join("roads"));
        assert_eq!(second, temp_dir.path().join("roads(1)"));
        assert_eq!(third, temp_dir.path().join("backup"));
        assert_eq!(fourth, temp_dir.path().join("backup(1)"));
        // The stored name is the graph name, whatever the directory is called
        assert_eq!(load_graph(&fourth).unwrap().name(), "roads");
    }

    #[test]
    fn test_load_graph_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let graph = sample();
        let dir = graph.save(&SaveOptions::in_directory(temp_dir.path())).unwrap();

        let loaded = load_graph(&dir).unwrap();
        assert_eq!(loaded.name(), "roads");
        assert_eq!(loaded.default_weight(), 1.0);
        assert_eq!(loaded.size(), graph.size());
        // Fresh graph: stored ids map positionally onto 0..n
        assert_eq!(loaded.node_ids(), (0..4).map(NodeId::new).collect::<Vec<_>>());

        // Stored order is [0, 2, 1, 3], so stored 2 -> 1, 1 -> 2
        assert_eq!(loaded.edge_weight(edge(1, 2)), Some(2.0));
        assert_eq!(loaded.edge_weight(edge(2, 3)), Some(2.0));
        let coloured = loaded.edge_labels(edge(0, 2)).unwrap();
        assert_eq!(coloured.get("colour").unwrap().as_text(), Some("blue"));
        assert_eq!(coloured.get(WEIGHT_KEY), Some(&LabelValue::Float(1.0)));
        assert_eq!(
            loaded.node_labels(NodeId::new(0)).unwrap().get("city").unwrap().as_text(),
            Some("Rome")
        );
    }

    #[test]
    fn test_add_from_files_merges_with_fresh_ids() {
        let temp_dir = TempDir::new().unwrap();
        let dir = sample().save(&SaveOptions::in_directory(temp_dir.path())).unwrap();

        let mut live = DirectedGraph::new("live", 1.0);
        live.add_edges(&[edge(0, 1), edge(1, 5)], &weighted(9.0)).unwrap();

        let remap = live.add_from_files(&dir).unwrap();
        let expected: Vec<(NodeId, NodeId)> = [(0, 2), (2, 3), (1, 4), (3, 6)]
            .iter()
            .map(|&(a, b)| (NodeId::new(a), NodeId::new(b)))
            .collect();
        assert_eq!(remap.into_iter().collect::<Vec<_>>(), expected);

        assert_eq!(live.size(), (7, 5));
        assert_eq!(live.edge_weight(edge(0, 1)), Some(9.0));
        assert_eq!(live.edge_weight(edge(3, 4)), Some(2.0));
        assert_eq!(live.edge_weight(edge(4, 6)), Some(2.0));
        assert!(live.has_edge(edge(2, 4)));
    }

    #[test]
    fn test_failed_import_leaves_graph_unchanged() {
        let temp_dir = TempDir::new().unwrap();
        let dir = sample().save(&SaveOptions::in_directory(temp_dir.path())).unwrap();
        fs::remove_file(dir.join(ADJACENCY_FILE)).unwrap();

        let mut live = sample();
        let before = live.copy();
        assert!(matches!(live.add_from_files(&dir), Err(PersistenceError::Schema(_))));
        assert_eq!(live, before);
    }

    #[test]
    fn test_load_graph_missing_directory() {
        let temp_dir = TempDir::new().unwrap();
        let result = load_graph(temp_dir.path().join("nothing"));
        assert!(matches!(result, Err(PersistenceError::Schema(_))));
    }

    #[test]
    fn test_save_empty_name() {
        let temp_dir = TempDir::new().unwrap();
        let result = sample().save(&SaveOptions::in_directory(temp_dir.path()).with_name(""));
        assert!(matches!(result, Err(PersistenceError::Graph(GraphError::InvalidInput(_)))));
    }

    #[test]
    fn test_save_name_stays_inside_directory() {
        let temp_dir = TempDir::new().unwrap();
        let elsewhere = TempDir::new().unwrap();
        let outside = elsewhere.path().join("escaped");
        let options = SaveOptions::in_directory(temp_dir.path().join("graphs"));

        let names = [outside.to_string_lossy().into_owned(), "../escaped".to_string()];
        for name in names.iter().map(String::as_str).chain(["a/b", ".", "..", "a/"]) {
            let result = sample().save(&options.clone().with_name(name));
            assert!(
                matches!(result, Err(PersistenceError::Graph(GraphError::InvalidInput(_)))),
                "name {:?} was accepted",
                name
            );
        }
        assert!(!outside.exists());
        assert!(!temp_dir.path().join("escaped").exists());
        assert!(!temp_dir.path().join("graphs").exists());
    }

    #[test]
    fn test_failed_write_removes_directory() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path().join("roads");
        fs::create_dir(&dir).unwrap();
        // A directory where an artifact file should go makes the write fail
        fs::create_dir(dir.join(ADJACENCY_FILE)).unwrap();

        let result = write_fresh_dir(&dir, &GraphSnapshot::capture(&sample()));
        assert!(matches!(result, Err(PersistenceError::Io(_))));
        assert!(!dir.exists());
    }
}
