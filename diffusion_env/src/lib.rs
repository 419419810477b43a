//! Diffusion Environment Abstraction Layer
//!
//! This crate provides the collaborators the diffusion engine consumes but
//! does not own:
//! - **Graph**: node set, edge set, neighbor/predecessor queries (`GraphAdapter`)
//! - **Configuration**: per-scope parameter assignments and the initial
//!   status assignment (`Configuration`)
//!
//! The engine only talks to a graph through `GraphAdapter`, so any topology
//! store can be plugged in. `AdjacencyGraph` is the in-memory implementation
//! used by the simulation harness and the tests.
//!
//! # Example
//!
//! ```ignore
//! use diffusion_env::{AdjacencyGraph, Configuration, GraphAdapter, NodeId};
//!
//! let mut graph = AdjacencyGraph::undirected();
//! graph.add_edge(NodeId(0), NodeId(1));
//! graph.add_edge(NodeId(1), NodeId(2));
//! let mut config = Configuration::new();
//! config.add_model_initial_configuration("Infected", [NodeId(0)]);
//!
//! for node in graph.nodes() {
//!     config.add_node_configuration("threshold", node, 0.5)?;
//! }
//! ```

mod adjacency;
mod configuration;
mod error;
mod graph;
mod types;

pub use adjacency::AdjacencyGraph;
pub use configuration::Configuration;
pub use error::EnvError;
pub use graph::GraphAdapter;
pub use types::{EdgeKey, NodeId};
