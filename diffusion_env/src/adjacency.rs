//! In-memory implementation of GraphAdapter.

use crate::error::EnvError;
use crate::graph::GraphAdapter;
use crate::types::{EdgeKey, NodeId};
use std::collections::{BTreeMap, BTreeSet};

/// Adjacency-set graph backed by ordered maps.
///
/// Neighbor lists come back in ascending id order, so iteration over this
/// graph is deterministic without any extra sorting.
#[derive(Debug, Clone, Default)]
pub struct AdjacencyGraph {
    /// Whether edges are ordered pairs
    directed: bool,

    /// Outgoing adjacency (both directions for undirected graphs)
    successors: BTreeMap<NodeId, BTreeSet<NodeId>>,

    /// Incoming adjacency (directed graphs only)
    predecessors: BTreeMap<NodeId, BTreeSet<NodeId>>,
}

impl AdjacencyGraph {
    /// Creates an empty undirected graph.
    pub fn undirected() -> Self {
        Self::default()
    }

    /// Creates an empty directed graph.
    pub fn directed() -> Self {
        Self {
            directed: true,
            ..Default::default()
        }
    }

    /// Builds a graph from an explicit node list and edge list.
    ///
    /// Every edge endpoint must appear in `nodes`.
    pub fn from_edges(
        directed: bool,
        nodes: impl IntoIterator<Item = NodeId>,
        edges: impl IntoIterator<Item = EdgeKey>,
    ) -> Result<Self, EnvError> {
        let mut graph = if directed { Self::directed() } else { Self::undirected() };
        for node in nodes {
            graph.add_node(node);
        }
        for edge in edges {
            if !graph.successors.contains_key(&edge.from) {
                return Err(EnvError::unknown_node(edge.from));
            }
            if !graph.successors.contains_key(&edge.to) {
                return Err(EnvError::unknown_node(edge.to));
            }
            graph.add_edge(edge.from, edge.to);
        }
        Ok(graph)
    }

    /// Adds an isolated node (no-op if present).
    pub fn add_node(&mut self, node: impl Into<NodeId>) {
        let node = node.into();
        self.successors.entry(node).or_default();
        if self.directed {
            self.predecessors.entry(node).or_default();
        }
    }

    /// Adds an edge, creating missing endpoints.
    pub fn add_edge(&mut self, from: impl Into<NodeId>, to: impl Into<NodeId>) {
        let (from, to) = (from.into(), to.into());
        self.add_node(from);
        self.add_node(to);

        self.successors.entry(from).or_default().insert(to);
        if self.directed {
            self.predecessors.entry(to).or_default().insert(from);
        } else {
            self.successors.entry(to).or_default().insert(from);
        }
    }

    /// Returns true if the edge exists (either orientation when undirected).
    pub fn has_edge(&self, from: NodeId, to: NodeId) -> bool {
        self.successors
            .get(&from)
            .map(|set| set.contains(&to))
            .unwrap_or(false)
    }
}

impl GraphAdapter for AdjacencyGraph {
    fn nodes(&self) -> Vec<NodeId> {
        self.successors.keys().copied().collect()
    }

    fn edges(&self) -> Vec<EdgeKey> {
        let mut edges = Vec::new();
        for (&from, targets) in &self.successors {
            for &to in targets {
                // Undirected edges are stored twice; report the ordered copy once
                if self.directed || from <= to {
                    edges.push(EdgeKey { from, to });
                }
            }
        }
        edges
    }

    fn neighbors(&self, node: NodeId) -> Vec<NodeId> {
        self.successors
            .get(&node)
            .map(|set| set.iter().copied().collect())
            .unwrap_or_default()
    }

    fn predecessors(&self, node: NodeId) -> Vec<NodeId> {
        let source = if self.directed { &self.predecessors } else { &self.successors };
        source
            .get(&node)
            .map(|set| set.iter().copied().collect())
            .unwrap_or_default()
    }

    fn is_directed(&self) -> bool {
        self.directed
    }

    fn number_of_nodes(&self) -> usize {
        self.successors.len()
    }

    fn degree(&self, node: NodeId) -> usize {
        self.successors.get(&node).map(|set| set.len()).unwrap_or(0)
    }

    fn contains_node(&self, node: NodeId) -> bool {
        self.successors.contains_key(&node)
    }
}
