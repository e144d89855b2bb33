//! Adjacency matrix conversion
//!
//! Cell `(i, j)` holds the weight of edge `i -> j`, or 0 when there is no
//! such edge. Node ids are used directly as row and column indices.

use super::label::{weight_of, weighted};
use super::store::{DirectedGraph, GraphError, GraphResult};
use super::types::NodeId;
use ndarray::Array2;
use std::collections::BTreeMap;
use tracing::debug;

/// Requested matrix representation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdjacencyForm {
    Dense,
    Sparse,
}

/// Dictionary-of-keys matrix holding only non-zero cells
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SparseAdjacency {
    rows: usize,
    cols: usize,
    entries: BTreeMap<(usize, usize), f64>,
}

impl SparseAdjacency {
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            entries: BTreeMap::new(),
        }
    }

    /// Set a cell. Zero removes the entry. Cells outside the shape are ignored.
    pub fn insert(&mut self, row: usize, col: usize, value: f64) {
        if row >= self.rows || col >= self.cols {
            return;
        }
        if value == 0.0 {
            self.entries.remove(&(row, col));
        } else {
            self.entries.insert((row, col), value);
        }
    }

    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.entries.get(&(row, col)).copied().unwrap_or(0.0)
    }

    /// Stored cells in row-major order
    pub fn entries(&self) -> impl Iterator<Item = ((usize, usize), f64)> + '_ {
        self.entries.iter().map(|(&pos, &value)| (pos, value))
    }

    pub fn nnz(&self) -> usize {
        self.entries.len()
    }
}

/// A weight matrix in dense or sparse form
#[derive(Debug, Clone, PartialEq)]
pub enum Adjacency {
    Dense(Array2<f64>),
    Sparse(SparseAdjacency),
}

impl From<Array2<f64>> for Adjacency {
    fn from(matrix: Array2<f64>) -> Self {
        Adjacency::Dense(matrix)
    }
}

impl From<SparseAdjacency> for Adjacency {
    fn from(matrix: SparseAdjacency) -> Self {
        Adjacency::Sparse(matrix)
    }
}

impl Adjacency {
    /// (rows, cols)
    pub fn shape(&self) -> (usize, usize) {
        match self {
            Adjacency::Dense(m) => m.dim(),
            Adjacency::Sparse(m) => (m.rows, m.cols),
        }
    }

    /// Value of a cell, 0 outside the matrix
    pub fn get(&self, row: usize, col: usize) -> f64 {
        match self {
            Adjacency::Dense(m) => m.get((row, col)).copied().unwrap_or(0.0),
            Adjacency::Sparse(m) => m.get(row, col),
        }
    }

    /// Non-zero cells in row-major order
    pub fn nonzero(&self) -> Vec<((usize, usize), f64)> {
        match self {
            Adjacency::Dense(m) => m
                .indexed_iter()
                .filter(|(_, value)| **value != 0.0)
                .map(|(pos, &value)| (pos, value))
                .collect(),
            Adjacency::Sparse(m) => m.entries().collect(),
        }
    }

    pub fn to_dense(&self) -> Array2<f64> {
        match self {
            Adjacency::Dense(m) => m.clone(),
            Adjacency::Sparse(m) => {
                let mut dense = Array2::zeros((m.rows, m.cols));
                for ((row, col), value) in m.entries() {
                    dense[[row, col]] = value;
                }
                dense
            }
        }
    }
}

impl DirectedGraph {
    /// Matrix dimension needed to index every node id
    fn adjacency_dimension(&self) -> GraphResult<usize> {
        let Some(max_id) = self.node_ids().into_iter().max() else {
            return Ok(0);
        };
        let limit = self.config().max_adjacency_dimension;
        let dimension = max_id.as_u64().saturating_add(1);
        if dimension > limit as u64 {
            return Err(GraphError::AdjacencyTooLarge { dimension, limit });
        }
        Ok(dimension as usize)
    }

    /// Compute the weighted adjacency matrix in the requested form.
    ///
    /// The matrix is `(max_id + 1)` square; rows and columns of ids absent
    /// from the graph are zero.
    pub fn compute_adjacency(&self, form: AdjacencyForm) -> GraphResult<Adjacency> {
        let dimension = self.adjacency_dimension()?;
        let cells = self.nodes().flat_map(|node| {
            node.out_edges().map(move |(target, labels)| {
                let weight = weight_of(labels).unwrap_or(0.0);
                // -0.0 is an empty cell in both forms
                let weight = if weight == 0.0 { 0.0 } else { weight };
                (node.id().as_u64() as usize, target.as_u64() as usize, weight)
            })
        });

        let adjacency = match form {
            AdjacencyForm::Dense => {
                let mut matrix = Array2::zeros((dimension, dimension));
                for (row, col, weight) in cells {
                    matrix[[row, col]] = weight;
                }
                Adjacency::Dense(matrix)
            }
            AdjacencyForm::Sparse => {
                let mut matrix = SparseAdjacency::new(dimension, dimension);
                for (row, col, weight) in cells {
                    matrix.insert(row, col, weight);
                }
                Adjacency::Sparse(matrix)
            }
        };
        Ok(adjacency)
    }

    /// Add one fresh node per matrix row and an edge for every non-zero cell.
    ///
    /// Returns the ids allocated for the rows, in row order.
    pub fn add_from_adjacency(&mut self, matrix: &Adjacency) -> GraphResult<Vec<NodeId>> {
        let (rows, cols) = matrix.shape();
        if rows != cols {
            return Err(GraphError::NonSquareMatrix { rows, cols });
        }

        let row_ids = self.auto_add_nodes(rows, &Default::default());
        let cells = matrix.nonzero();
        for &((row, col), weight) in &cells {
            self.insert_edge(row_ids[row], row_ids[col], &weighted(weight));
        }

        debug!("Imported {}x{} adjacency matrix with {} edges", rows, cols, cells.len());
        Ok(row_ids)
    }
}
