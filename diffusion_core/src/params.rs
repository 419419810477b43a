//! Typed parameter declarations and the resolved value tables.
//!
//! Every activation rule declares the parameters it reads as a static list
//! of [`ParameterSpec`]s. The engine validates a `Configuration` against
//! those declarations (presence, coverage, range), fills defaults, and hands
//! the rule a [`ResolvedParams`] it can query without further checks.

use diffusion_env::{EdgeKey, NodeId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Where a parameter lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scope {
    Model,
    Node,
    Edge,
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Scope::Model => "model",
            Scope::Node => "node",
            Scope::Edge => "edge",
        };
        f.write_str(name)
    }
}

/// Declaration of a single model, node or edge parameter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParameterSpec {
    /// Parameter name as it appears in the configuration
    pub name: &'static str,

    /// Human-readable description
    pub description: &'static str,

    /// Scope the parameter is attached to
    pub scope: Scope,

    /// Inclusive valid range, if any
    pub range: Option<(f64, f64)>,

    /// Optional parameters receive `default` when absent
    pub optional: bool,

    /// Default value for optional parameters
    pub default: f64,
}

impl ParameterSpec {
    /// Returns true if `value` lies inside the declared range.
    pub fn accepts(&self, value: f64) -> bool {
        match self.range {
            Some((min, max)) => value >= min && value <= max,
            None => true,
        }
    }
}

/// Model parameter naming the fraction of nodes to infect at start.
pub const FRACTION_INFECTED: &str = "fraction_infected";

/// Accepted alias of [`FRACTION_INFECTED`].
pub const PERCENTAGE_INFECTED: &str = "percentage_infected";

/// Fraction used when neither an initial infected set nor a fraction is given.
pub const DEFAULT_FRACTION_INFECTED: f64 = 0.05;

/// Validated, default-filled parameter values.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolvedParams {
    model: BTreeMap<String, f64>,
    nodes: BTreeMap<String, BTreeMap<NodeId, f64>>,
    edges: BTreeMap<String, BTreeMap<EdgeKey, f64>>,
}

impl ResolvedParams {
    pub(crate) fn new(
        model: BTreeMap<String, f64>,
        nodes: BTreeMap<String, BTreeMap<NodeId, f64>>,
        edges: BTreeMap<String, BTreeMap<EdgeKey, f64>>,
    ) -> Self {
        Self { model, nodes, edges }
    }

    /// Returns a model parameter.
    pub fn model(&self, name: &str) -> Option<f64> {
        self.model.get(name).copied()
    }

    /// Returns a node parameter for `node`.
    pub fn node(&self, spec: &ParameterSpec, node: NodeId) -> Option<f64> {
        self.nodes.get(spec.name)?.get(&node).copied()
    }

    /// Returns an edge parameter for `key`.
    ///
    /// When `directed` is false the reverse orientation is tried as well.
    pub fn edge(&self, spec: &ParameterSpec, key: EdgeKey, directed: bool) -> Option<f64> {
        let table = self.edges.get(spec.name)?;
        match table.get(&key) {
            Some(value) => Some(*value),
            None if !directed => table.get(&key.reversed()).copied(),
            None => None,
        }
    }

    /// Returns all model parameters.
    pub fn model_parameters(&self) -> &BTreeMap<String, f64> {
        &self.model
    }

    /// Returns the full table of a node parameter.
    pub fn node_table(&self, name: &str) -> Option<&BTreeMap<NodeId, f64>> {
        self.nodes.get(name)
    }

    pub(crate) fn set_model(&mut self, name: &str, value: f64) {
        self.model.insert(name.to_string(), value);
    }
}
