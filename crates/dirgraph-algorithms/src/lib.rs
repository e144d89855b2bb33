//! Graph algorithms for dirgraph
//!
//! Algorithms run over a read-only [`GraphView`] snapshot, so this crate has
//! no dependency on the graph store itself.

pub mod common;
pub mod pathfinding;

pub use common::{GraphView, NodeId};
pub use pathfinding::{dijkstra, PathError, PathResult};
