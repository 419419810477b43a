//! Linear threshold accumulation.

use crate::error::DiffusionError;
use crate::params::{ParameterSpec, Scope};
use crate::rule::{ActivationRule, Convergence, Evaluation, StepView};
use crate::status::StatusCode;
use diffusion_env::{EdgeKey, NodeId};
use rand::RngCore;

/// Per-node activation threshold.
pub const NODE_THRESHOLD: ParameterSpec = ParameterSpec {
    name: "threshold",
    description: "Node threshold",
    scope: Scope::Node,
    range: Some((0.0, 1.0)),
    optional: true,
    default: 0.1,
};

/// Per-edge influence weight.
pub const EDGE_WEIGHT: ParameterSpec = ParameterSpec {
    name: "weight",
    description: "Edge weight",
    scope: Scope::Edge,
    range: Some((0.0, 1.0)),
    optional: true,
    default: 0.1,
};

const PARAMETERS: [ParameterSpec; 2] = [NODE_THRESHOLD, EDGE_WEIGHT];

/// Deterministic threshold rule.
///
/// A susceptible node activates once the summed weight of the edges from
/// its infected neighbors reaches its threshold. For directed graphs only
/// predecessors count, through the edge `(predecessor, node)`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThresholdRule;

impl ThresholdRule {
    pub fn new() -> Self {
        Self
    }
}

impl ActivationRule for ThresholdRule {
    fn name(&self) -> &'static str {
        "Threshold"
    }

    fn parameters(&self) -> &'static [ParameterSpec] {
        &PARAMETERS
    }

    fn convergence(&self) -> Convergence {
        Convergence::NoStatusChange
    }

    fn is_relevant(&self, node: NodeId, view: &StepView<'_>) -> bool {
        view.status(node) == StatusCode::Susceptible
    }

    fn evaluate(
        &self,
        node: NodeId,
        view: &StepView<'_>,
        _rng: &mut dyn RngCore,
    ) -> Result<Evaluation, DiffusionError> {
        let directed = view.is_directed();
        let mut total_weight = 0.0;
        let mut infected_neighbors = 0usize;

        for neighbor in view.influencers(node) {
            if !view.is_infected(neighbor) {
                continue;
            }
            let key = if directed {
                EdgeKey { from: neighbor, to: node }
            } else {
                EdgeKey { from: node, to: neighbor }
            };
            let weight = view
                .params()
                .edge(&EDGE_WEIGHT, key, directed)
                .ok_or(DiffusionError::MissingEdgeValue {
                    name: EDGE_WEIGHT.name,
                    edge: key,
                })?;
            total_weight += weight;
            infected_neighbors += 1;
        }

        // No infected influence, no activation (even for a zero threshold)
        if infected_neighbors == 0 {
            return Ok(Evaluation::unchanged());
        }

        let threshold = view
            .params()
            .node(&NODE_THRESHOLD, node)
            .ok_or(DiffusionError::MissingNodeValue {
                name: NODE_THRESHOLD.name,
                node,
            })?;

        if total_weight >= threshold {
            Ok(Evaluation::activate(node))
        } else {
            Ok(Evaluation::unchanged())
        }
    }
}
