//! The activation-rule strategy interface.
//!
//! A rule decides, for one relevant node at a time, which transitions the
//! current step produces. It only ever sees the frozen [`StepView`] of the
//! pre-step state; the engine collects the returned transitions into a
//! separate write buffer and commits them together once every relevant
//! node has been evaluated.

use crate::error::DiffusionError;
use crate::params::{ParameterSpec, ResolvedParams};
use crate::status::{StatusCode, StatusMap};
use diffusion_env::{GraphAdapter, NodeId};
use rand::RngCore;
use std::collections::BTreeMap;

/// Status set shared by every rule in this crate.
pub const BINARY_STATUSES: [StatusCode; 2] = [StatusCode::Susceptible, StatusCode::Infected];

/// When a run is considered stable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Convergence {
    /// Stop once a full pass leaves every status count unchanged
    NoStatusChange,

    /// Stop once a pass makes zero activation attempts
    NoAttempts,
}

/// A single requested status change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub node: NodeId,
    pub status: StatusCode,
}

impl Transition {
    /// Requests that `node` become Infected.
    pub fn infect(node: NodeId) -> Self {
        Self {
            node,
            status: StatusCode::Infected,
        }
    }
}

/// Outcome of evaluating one relevant node.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Evaluation {
    /// Transitions to buffer for this step
    pub transitions: Vec<Transition>,

    /// Whether the node spent its single activation attempt
    pub attempted: bool,
}

impl Evaluation {
    /// No transition, no attempt.
    pub fn unchanged() -> Self {
        Self::default()
    }

    /// The evaluated node itself becomes Infected.
    pub fn activate(node: NodeId) -> Self {
        Self {
            transitions: vec![Transition::infect(node)],
            attempted: false,
        }
    }

    /// A completed cascade attempt that infected `targets`.
    pub fn attempt(targets: Vec<NodeId>) -> Self {
        Self {
            transitions: targets.into_iter().map(Transition::infect).collect(),
            attempted: true,
        }
    }
}

/// Read-only snapshot handed to rules during one step.
pub struct StepView<'a> {
    graph: &'a dyn GraphAdapter,
    status: &'a StatusMap,
    attempts: &'a BTreeMap<NodeId, bool>,
    params: &'a ResolvedParams,
}

impl<'a> StepView<'a> {
    /// Creates a view over a frozen snapshot.
    pub fn new(
        graph: &'a dyn GraphAdapter,
        status: &'a StatusMap,
        attempts: &'a BTreeMap<NodeId, bool>,
        params: &'a ResolvedParams,
    ) -> Self {
        Self {
            graph,
            status,
            attempts,
            params,
        }
    }

    /// Returns the snapshot status of `node` (Susceptible if unknown).
    pub fn status(&self, node: NodeId) -> StatusCode {
        self.status
            .get(&node)
            .copied()
            .unwrap_or(StatusCode::Susceptible)
    }

    /// Returns true if `node` was Infected at the start of the step.
    pub fn is_infected(&self, node: NodeId) -> bool {
        self.status(node) == StatusCode::Infected
    }

    /// Returns true if `node` has already made its cascade attempt.
    pub fn has_attempted(&self, node: NodeId) -> bool {
        self.attempts.get(&node).copied().unwrap_or(false)
    }

    /// Neighbors of `node` in ascending id order.
    pub fn neighbors(&self, node: NodeId) -> Vec<NodeId> {
        canonical(self.graph.neighbors(node))
    }

    /// Nodes whose status can influence `node`: predecessors for directed
    /// graphs, adjacent nodes otherwise. Ascending id order.
    pub fn influencers(&self, node: NodeId) -> Vec<NodeId> {
        if self.graph.is_directed() {
            canonical(self.graph.predecessors(node))
        } else {
            self.neighbors(node)
        }
    }

    /// Returns the degree of `node`.
    pub fn degree(&self, node: NodeId) -> usize {
        self.graph.degree(node)
    }

    /// Returns true if the underlying graph is directed.
    pub fn is_directed(&self) -> bool {
        self.graph.is_directed()
    }

    /// Returns the graph under simulation.
    pub fn graph(&self) -> &'a dyn GraphAdapter {
        self.graph
    }

    /// Returns the resolved parameter tables.
    pub fn params(&self) -> &ResolvedParams {
        self.params
    }
}

fn canonical(mut nodes: Vec<NodeId>) -> Vec<NodeId> {
    nodes.sort_unstable();
    nodes.dedup();
    nodes
}

/// One diffusion policy's decision procedure.
///
/// # Implementations
///
/// - `ThresholdRule` - deterministic weight accumulation
/// - `IndependentCascadeRule` - one randomized attempt per infected node
/// - `WeightedCascadeRule` - as above with `1/degree` edge probabilities
///
/// # Determinism
///
/// Rules draw randomness only from the `rng` they are handed and must
/// consume it in ascending node order, so identical inputs and seeds give
/// identical runs.
pub trait ActivationRule: Send + Sync {
    /// Returns the rule's display name.
    fn name(&self) -> &'static str;

    /// Returns the statuses the rule works with.
    fn statuses(&self) -> &'static [StatusCode] {
        &BINARY_STATUSES
    }

    /// Returns the parameters the rule reads.
    fn parameters(&self) -> &'static [ParameterSpec];

    /// Returns the rule's stop condition.
    fn convergence(&self) -> Convergence;

    /// Returns true if `node` must be evaluated this step.
    fn is_relevant(&self, node: NodeId, view: &StepView<'_>) -> bool;

    /// Evaluates one relevant node against the frozen snapshot.
    fn evaluate(
        &self,
        node: NodeId,
        view: &StepView<'_>,
        rng: &mut dyn RngCore,
    ) -> Result<Evaluation, DiffusionError>;
}
