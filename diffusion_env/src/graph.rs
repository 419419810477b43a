//! Graph abstraction consumed by the diffusion engine.

use crate::types::{EdgeKey, NodeId};
use std::sync::Arc;

/// Read-only view of the network a diffusion process runs on.
///
/// The graph is immutable for the duration of a run. Implementations may
/// return nodes and neighbors in any order; the engine sorts them before use
/// so results never depend on the adapter's iteration order.
///
/// # Implementations
///
/// - **In-memory**: `AdjacencyGraph` - BTreeMap adjacency, sorted neighbors
/// - **Shared**: blanket impl for `Arc<T>`, so several engines can run over one graph
pub trait GraphAdapter {
    /// Returns every node of the graph.
    fn nodes(&self) -> Vec<NodeId>;

    /// Returns every edge of the graph.
    ///
    /// Undirected graphs report each edge once.
    fn edges(&self) -> Vec<EdgeKey>;

    /// Returns the neighbors of `node`.
    ///
    /// For directed graphs these are the successors.
    fn neighbors(&self, node: NodeId) -> Vec<NodeId>;

    /// Returns the predecessors of `node`.
    ///
    /// Only meaningful for directed graphs; undirected graphs return the
    /// adjacent nodes.
    fn predecessors(&self, node: NodeId) -> Vec<NodeId>;

    /// Returns true if edges are ordered pairs.
    fn is_directed(&self) -> bool;

    /// Returns the number of nodes.
    fn number_of_nodes(&self) -> usize {
        self.nodes().len()
    }

    /// Returns the number of edges.
    fn number_of_edges(&self) -> usize {
        self.edges().len()
    }

    /// Returns the number of neighbors of `node`.
    fn degree(&self, node: NodeId) -> usize {
        self.neighbors(node).len()
    }

    /// Returns true if `node` belongs to the graph.
    fn contains_node(&self, node: NodeId) -> bool {
        self.nodes().contains(&node)
    }
}

impl<T: GraphAdapter + ?Sized> GraphAdapter for Arc<T> {
    fn nodes(&self) -> Vec<NodeId> {
        (**self).nodes()
    }

    fn edges(&self) -> Vec<EdgeKey> {
        (**self).edges()
    }

    fn neighbors(&self, node: NodeId) -> Vec<NodeId> {
        (**self).neighbors(node)
    }

    fn predecessors(&self, node: NodeId) -> Vec<NodeId> {
        (**self).predecessors(node)
    }

    fn is_directed(&self) -> bool {
        (**self).is_directed()
    }

    fn number_of_nodes(&self) -> usize {
        (**self).number_of_nodes()
    }

    fn number_of_edges(&self) -> usize {
        (**self).number_of_edges()
    }

    fn degree(&self, node: NodeId) -> usize {
        (**self).degree(node)
    }

    fn contains_node(&self, node: NodeId) -> bool {
        (**self).contains_node(node)
    }
}
