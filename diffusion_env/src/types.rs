//! Common types for the diffusion environment abstraction.

use serde::{Deserialize, Serialize};

/// Opaque identifier for a graph node.
///
/// Ordering is significant: the engine visits nodes in ascending id order so
/// that the shared random stream is consumed canonically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub u64);

impl From<u64> for NodeId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Key of an edge, `from -> to`.
///
/// For undirected graphs the orientation is whatever the caller stored;
/// lookups try both (see [`EdgeKey::reversed`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EdgeKey {
    pub from: NodeId,
    pub to: NodeId,
}

impl EdgeKey {
    /// Creates a new edge key.
    pub fn new(from: impl Into<NodeId>, to: impl Into<NodeId>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }

    /// Returns the key with its endpoints swapped.
    pub fn reversed(&self) -> Self {
        Self {
            from: self.to,
            to: self.from,
        }
    }
}

impl From<(u64, u64)> for EdgeKey {
    fn from((from, to): (u64, u64)) -> Self {
        Self::new(from, to)
    }
}

impl std::fmt::Display for EdgeKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.from, self.to)
    }
}
