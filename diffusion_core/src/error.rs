//! Error taxonomy for the diffusion engine.

use crate::params::Scope;
use crate::status::StatusCode;
use diffusion_env::{EdgeKey, EnvError, NodeId};
use std::collections::BTreeSet;
use thiserror::Error;

/// Problems detected while configuring the engine.
///
/// Always raised before any iteration runs; a failed `configure` leaves the
/// engine unconfigured.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigurationError {
    #[error("Missing mandatory {scope} parameter(s): {names:?}")]
    MissingParameters { scope: Scope, names: BTreeSet<String> },

    #[error("Not all {scope}s have a configuration specified for '{name}': expected {expected}, found {found}")]
    IncompleteCoverage {
        scope: Scope,
        name: String,
        expected: usize,
        found: usize,
    },

    #[error("Parameter '{name}' value {value} outside range [{min}, {max}]")]
    OutOfRange {
        name: String,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("Unknown status '{0}' in initial configuration")]
    UnknownStatus(String),

    #[error("Initial configuration references unknown node {0}")]
    UnknownNode(NodeId),

    #[error("'Infected' status not defined by model {0}")]
    MissingInfectedStatus(&'static str),
}

/// Undefined arithmetic during rule evaluation.
#[derive(Debug, Error, PartialEq)]
pub enum ArithmeticError {
    #[error("Division by zero: node {0} has degree 0")]
    ZeroDegree(NodeId),
}

/// Errors raised while feeding the trend aggregator.
#[derive(Debug, Error, PartialEq)]
pub enum TrendError {
    #[error("Record {index} has no entry for status {status}")]
    MissingStatus { index: usize, status: StatusCode },

    #[error("Malformed trend record: {0}")]
    Malformed(String),
}

/// Umbrella error for engine operations.
#[derive(Debug, Error, PartialEq)]
pub enum DiffusionError {
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    #[error("Arithmetic error: {0}")]
    Arithmetic(#[from] ArithmeticError),

    #[error("Trend error: {0}")]
    Trend(#[from] TrendError),

    #[error("Environment error: {0}")]
    Env(#[from] EnvError),

    #[error("Engine has not been configured")]
    NotConfigured,

    #[error("No value for edge parameter '{name}' on edge {edge}")]
    MissingEdgeValue { name: &'static str, edge: EdgeKey },

    #[error("No value for node parameter '{name}' on node {node}")]
    MissingNodeValue { name: &'static str, node: NodeId },

    #[error("Node {node} cannot move to {attempted}: activation is Susceptible to Infected only")]
    MonotonicityViolation { node: NodeId, attempted: StatusCode },

    #[error("Node {0} attempted activation twice in one run")]
    RepeatedAttempt(NodeId),

    #[error("Unknown node {0}")]
    UnknownNode(NodeId),
}

impl DiffusionError {
    /// Returns the configuration error, if this is one.
    pub fn as_configuration(&self) -> Option<&ConfigurationError> {
        match self {
            DiffusionError::Configuration(err) => Some(err),
            _ => None,
        }
    }
}
