//! Single-attempt cascade rules (independent and degree-weighted).

use crate::error::{ArithmeticError, DiffusionError};
use crate::params::{ParameterSpec, Scope};
use crate::rule::{ActivationRule, Convergence, Evaluation, StepView};
use crate::status::StatusCode;
use diffusion_env::{EdgeKey, GraphAdapter, NodeId};
use rand::{Rng, RngCore};

/// Initial attempt flag per node (non-zero = already attempted).
pub const NODE_ATTEMPT: ParameterSpec = ParameterSpec {
    name: "attempt",
    description: "Node attempts",
    scope: Scope::Node,
    range: Some((0.0, 1.0)),
    optional: true,
    default: 0.0,
};

/// Per-edge activation probability.
pub const EDGE_THRESHOLD: ParameterSpec = ParameterSpec {
    name: "threshold",
    description: "Edge threshold",
    scope: Scope::Edge,
    range: Some((0.0, 1.0)),
    optional: true,
    default: 0.1,
};

const INDEPENDENT_PARAMETERS: [ParameterSpec; 2] = [NODE_ATTEMPT, EDGE_THRESHOLD];
const WEIGHTED_PARAMETERS: [ParameterSpec; 1] = [NODE_ATTEMPT];

/// Runs the one attempt of `node` against each susceptible neighbor.
///
/// One uniform draw per candidate, in ascending neighbor order; the
/// candidate activates iff `draw <= probability(candidate)`.
fn cascade_attempt<F>(
    node: NodeId,
    view: &StepView<'_>,
    rng: &mut dyn RngCore,
    mut probability: F,
) -> Result<Evaluation, DiffusionError>
where
    F: FnMut(NodeId) -> Result<f64, DiffusionError>,
{
    let mut activated = Vec::new();

    for candidate in view.neighbors(node) {
        if view.status(candidate) != StatusCode::Susceptible {
            continue;
        }
        let threshold = probability(candidate)?;
        let flip: f64 = rng.gen();
        if flip <= threshold {
            activated.push(candidate);
        }
    }

    Ok(Evaluation::attempt(activated))
}

fn is_pending_attempt(node: NodeId, view: &StepView<'_>) -> bool {
    view.is_infected(node) && !view.has_attempted(node)
}

/// Independent cascade: each newly infected node gets exactly one chance to
/// infect each susceptible neighbor, with the probability configured on the
/// connecting edge.
#[derive(Debug, Clone, Copy, Default)]
pub struct IndependentCascadeRule;

impl IndependentCascadeRule {
    pub fn new() -> Self {
        Self
    }
}

impl ActivationRule for IndependentCascadeRule {
    fn name(&self) -> &'static str {
        "Independent Cascades"
    }

    fn parameters(&self) -> &'static [ParameterSpec] {
        &INDEPENDENT_PARAMETERS
    }

    fn convergence(&self) -> Convergence {
        Convergence::NoAttempts
    }

    fn is_relevant(&self, node: NodeId, view: &StepView<'_>) -> bool {
        is_pending_attempt(node, view)
    }

    fn evaluate(
        &self,
        node: NodeId,
        view: &StepView<'_>,
        rng: &mut dyn RngCore,
    ) -> Result<Evaluation, DiffusionError> {
        let directed = view.is_directed();
        cascade_attempt(node, view, rng, |candidate| {
            let key = EdgeKey { from: node, to: candidate };
            view.params()
                .edge(&EDGE_THRESHOLD, key, directed)
                .ok_or(DiffusionError::MissingEdgeValue {
                    name: EDGE_THRESHOLD.name,
                    edge: key,
                })
        })
    }
}

/// Weighted cascade: independent cascade where the probability of reaching
/// `v` is `1 / degree(v)` instead of a configured edge value.
#[derive(Debug, Clone, Copy, Default)]
pub struct WeightedCascadeRule;

impl WeightedCascadeRule {
    pub fn new() -> Self {
        Self
    }

    /// Activation probability for a candidate node.
    ///
    /// A node without neighbors has no defined probability.
    pub fn activation_probability(
        graph: &dyn GraphAdapter,
        node: NodeId,
    ) -> Result<f64, ArithmeticError> {
        match graph.degree(node) {
            0 => Err(ArithmeticError::ZeroDegree(node)),
            degree => Ok(1.0 / degree as f64),
        }
    }
}

impl ActivationRule for WeightedCascadeRule {
    fn name(&self) -> &'static str {
        "Weighted Cascades"
    }

    fn parameters(&self) -> &'static [ParameterSpec] {
        &WEIGHTED_PARAMETERS
    }

    fn convergence(&self) -> Convergence {
        Convergence::NoAttempts
    }

    fn is_relevant(&self, node: NodeId, view: &StepView<'_>) -> bool {
        is_pending_attempt(node, view)
    }

    fn evaluate(
        &self,
        node: NodeId,
        view: &StepView<'_>,
        rng: &mut dyn RngCore,
    ) -> Result<Evaluation, DiffusionError> {
        let graph = view.graph();
        cascade_attempt(node, view, rng, |candidate| {
            Ok(Self::activation_probability(graph, candidate)?)
        })
    }
}
