//! Error types for the diffusion environment abstraction.

use thiserror::Error;

/// Errors that can occur in the environment abstraction layer.
#[derive(Debug, Error, PartialEq)]
pub enum EnvError {
    /// An edge references a node that was never declared
    #[error("Unknown node: {0}")]
    UnknownNode(String),

    /// A configuration value is NaN or infinite
    #[error("Non-finite value for '{name}': {value}")]
    NonFiniteValue { name: String, value: f64 },
}

impl EnvError {
    /// Creates an unknown-node error.
    pub fn unknown_node(node: impl std::fmt::Display) -> Self {
        Self::UnknownNode(node.to_string())
    }
}
