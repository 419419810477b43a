//! Parameter assignments handed to the engine at configure time.

use crate::error::EnvError;
use crate::types::{EdgeKey, NodeId};
use std::collections::{BTreeMap, BTreeSet};

/// Per-scope parameter assignments plus the initial status assignment.
///
/// Values are keyed by parameter name: model parameters map to one value,
/// node and edge parameters map to one value per node / edge. The engine
/// consults this object once during configuration and writes defaults for
/// absent optional parameters back onto it.
#[derive(Debug, Clone, Default)]
pub struct Configuration {
    /// Model-wide parameters (e.g. `fraction_infected`)
    model: BTreeMap<String, f64>,

    /// Node parameters: name -> node -> value
    nodes: BTreeMap<String, BTreeMap<NodeId, f64>>,

    /// Edge parameters: name -> edge -> value
    edges: BTreeMap<String, BTreeMap<EdgeKey, f64>>,

    /// Initial status assignment: status name -> nodes
    initial_status: BTreeMap<String, BTreeSet<NodeId>>,
}

impl Configuration {
    /// Creates an empty configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a model-wide parameter.
    pub fn add_model_parameter(&mut self, name: &str, value: f64) -> Result<(), EnvError> {
        check_finite(name, value)?;
        self.model.insert(name.to_string(), value);
        Ok(())
    }

    /// Sets a node parameter for one node.
    pub fn add_node_configuration(
        &mut self,
        name: &str,
        node: NodeId,
        value: f64,
    ) -> Result<(), EnvError> {
        check_finite(name, value)?;
        self.nodes
            .entry(name.to_string())
            .or_default()
            .insert(node, value);
        Ok(())
    }

    /// Sets a node parameter for many nodes at once.
    pub fn add_node_set_configuration(
        &mut self,
        name: &str,
        nodes: impl IntoIterator<Item = NodeId>,
        value: f64,
    ) -> Result<(), EnvError> {
        for node in nodes {
            self.add_node_configuration(name, node, value)?;
        }
        Ok(())
    }

    /// Sets an edge parameter for one edge.
    pub fn add_edge_configuration(
        &mut self,
        name: &str,
        edge: EdgeKey,
        value: f64,
    ) -> Result<(), EnvError> {
        check_finite(name, value)?;
        self.edges
            .entry(name.to_string())
            .or_default()
            .insert(edge, value);
        Ok(())
    }

    /// Sets an edge parameter for many edges at once.
    pub fn add_edge_set_configuration(
        &mut self,
        name: &str,
        edges: impl IntoIterator<Item = EdgeKey>,
        value: f64,
    ) -> Result<(), EnvError> {
        for edge in edges {
            self.add_edge_configuration(name, edge, value)?;
        }
        Ok(())
    }

    /// Assigns `nodes` the named initial status (e.g. `"Infected"`).
    pub fn add_model_initial_configuration(
        &mut self,
        status: &str,
        nodes: impl IntoIterator<Item = NodeId>,
    ) {
        self.initial_status
            .entry(status.to_string())
            .or_default()
            .extend(nodes);
    }

    /// Returns the model-wide parameters.
    pub fn get_model_parameters(&self) -> &BTreeMap<String, f64> {
        &self.model
    }

    /// Returns the node parameters.
    pub fn get_nodes_configuration(&self) -> &BTreeMap<String, BTreeMap<NodeId, f64>> {
        &self.nodes
    }

    /// Returns the edge parameters.
    pub fn get_edges_configuration(&self) -> &BTreeMap<String, BTreeMap<EdgeKey, f64>> {
        &self.edges
    }

    /// Returns the initial status assignment.
    pub fn get_model_configuration(&self) -> &BTreeMap<String, BTreeSet<NodeId>> {
        &self.initial_status
    }
}

fn check_finite(name: &str, value: f64) -> Result<(), EnvError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(EnvError::NonFiniteValue {
            name: name.to_string(),
            value,
        })
    }
}
