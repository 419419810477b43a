//! The simulation engine - status bookkeeping and the synchronous step loop.
//!
//! # Step protocol
//!
//! ```text
//!   status (snapshot) ──► rule.evaluate(node, view, rng) ──► write buffer
//!         │                      (ascending node id)              │
//!         └──────────── status_delta(snapshot, buffer) ◄──────────┘
//!                                   │
//!                           commit, iteration += 1,
//!                           update stop flag
//! ```
//!
//! Rules never observe a transition made earlier in the same step, so the
//! outcome of a step does not depend on evaluation order. Randomness comes
//! from one seeded ChaCha8 stream consumed in canonical order, which makes
//! runs bit-for-bit reproducible from `(graph, configuration, seed)`.

use crate::error::{ConfigurationError, DiffusionError};
use crate::params::{
    ParameterSpec, ResolvedParams, Scope, DEFAULT_FRACTION_INFECTED, FRACTION_INFECTED,
    PERCENTAGE_INFECTED,
};
use crate::rule::{ActivationRule, Convergence, StepView, Transition};
use crate::rules::NODE_ATTEMPT;
use crate::status::{count_status, status_delta, InvariantViolation, StatusCode, StatusMap};
use diffusion_env::{Configuration, EdgeKey, GraphAdapter, NodeId};
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, info, warn};

/// Upper bound of the random deactivation draw, as a fraction of the
/// activated set.
const DEACTIVATION_FRACTION: f64 = 0.05;

/// Outcome of a single step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IterationResult {
    /// Index of the step (0 for the first call to `iterate`)
    pub iteration: u64,

    /// Number of Infected nodes after the step
    pub active_set_size: usize,

    /// Nodes that changed status in this step, with their new status
    pub status_delta: BTreeMap<NodeId, StatusCode>,

    /// Node count per status after the step
    pub node_count: BTreeMap<StatusCode, usize>,

    /// Count difference per status relative to the pre-step snapshot
    pub count_delta: BTreeMap<StatusCode, i64>,

    /// Cascade attempts made during the step
    pub attempts: usize,
}

impl IterationResult {
    /// Nodes activated in this step, ascending.
    pub fn activated(&self) -> Vec<NodeId> {
        self.status_delta
            .iter()
            .filter(|(_, status)| **status == StatusCode::Infected)
            .map(|(node, _)| *node)
            .collect()
    }
}

/// Outcome of running until the stop flag fires.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunResult {
    /// Infected count when the run stopped
    pub final_active_set_size: usize,

    /// Every activated node, in first-activation order
    pub activated_nodes_in_order: Vec<NodeId>,

    /// Newly activated nodes per step
    pub activated_nodes_per_step: Vec<Vec<NodeId>>,

    /// Every step result, in order
    pub iterations: Vec<IterationResult>,
}

/// Result of [`SimulationEngine::random_deactivation`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Deactivation {
    /// Size of the activated list after removal
    pub remaining: usize,

    /// Nodes set back to Susceptible
    pub deactivated: Vec<NodeId>,
}

/// Generic diffusion engine parameterized by an [`ActivationRule`].
///
/// # Lifecycle
///
/// 1. `new(graph, rule, seed)` - all nodes Susceptible, unconfigured
/// 2. `configure(&mut configuration)` - validate, fill defaults, seed infection
/// 3. `iterate()` / `run_until_stable()`
/// 4. `reset(..)` to start another run on the same graph and parameters
pub struct SimulationEngine<G: GraphAdapter> {
    /// Graph under simulation (immutable for the run)
    graph: G,

    /// Active diffusion policy
    rule: Box<dyn ActivationRule>,

    /// Master seed
    seed: u64,

    /// Stream shared by randomized rules and seed-set sampling
    rng: ChaCha8Rng,

    /// Separate stream for external deactivation experiments
    deactivation_rng: ChaCha8Rng,

    /// Graph nodes in canonical order
    nodes: Vec<NodeId>,

    /// Resolved parameters (None until configured)
    params: Option<ResolvedParams>,

    /// Live status of every node
    status: StatusMap,

    /// Status restored by `reset(None)` when no fraction is configured
    initial_status: StatusMap,

    /// Attempt flags (cascade rules)
    attempts: BTreeMap<NodeId, bool>,

    /// Attempt flags as configured
    initial_attempts: BTreeMap<NodeId, bool>,

    /// Fraction-infected seeding policy, if any
    fraction_infected: Option<f64>,

    /// Completed steps in the current run
    iteration: u64,

    /// Set once the rule's convergence policy fires
    stop: bool,
}

impl<G: GraphAdapter> SimulationEngine<G> {
    /// Creates an unconfigured engine with the given master seed.
    pub fn new(graph: G, rule: Box<dyn ActivationRule>, seed: u64) -> Self {
        let mut nodes = graph.nodes();
        nodes.sort_unstable();
        nodes.dedup();

        let status: StatusMap = nodes.iter().map(|n| (*n, StatusCode::Susceptible)).collect();
        let attempts: BTreeMap<NodeId, bool> = nodes.iter().map(|n| (*n, false)).collect();

        Self {
            graph,
            rule,
            seed,
            rng: ChaCha8Rng::seed_from_u64(seed),
            deactivation_rng: ChaCha8Rng::seed_from_u64(seed.wrapping_mul(0x9e3779b97f4a7c15)),
            nodes,
            params: None,
            initial_status: status.clone(),
            status,
            initial_attempts: attempts.clone(),
            attempts,
            fraction_infected: None,
            iteration: 0,
            stop: false,
        }
    }

    /// Validates `configuration` against the rule's declared parameters and
    /// sets the initial status.
    ///
    /// Absent optional parameters are filled with their defaults, written
    /// back onto `configuration`. On error the engine is left untouched.
    pub fn configure(&mut self, configuration: &mut Configuration) -> Result<(), DiffusionError> {
        let statuses = self.rule.statuses();
        if !statuses.contains(&StatusCode::Infected) {
            return Err(ConfigurationError::MissingInfectedStatus(self.rule.name()).into());
        }

        let declared = self.rule.parameters();
        self.check_mandatory(declared, configuration)?;
        self.fill_defaults(declared, configuration)?;

        let nodes_cfg = configuration.get_nodes_configuration().clone();
        let edges_cfg = configuration.get_edges_configuration().clone();
        let mut model_cfg = configuration.get_model_parameters().clone();

        self.check_coverage(&nodes_cfg, &edges_cfg)?;
        check_ranges(declared, &model_cfg, &nodes_cfg, &edges_cfg)?;

        // Explicit initial status
        let mut status: StatusMap = self
            .nodes
            .iter()
            .map(|n| (*n, StatusCode::Susceptible))
            .collect();
        let assignment = configuration.get_model_configuration();
        for (name, members) in assignment {
            let code = StatusCode::from_name(name)
                .filter(|s| statuses.contains(s))
                .ok_or_else(|| ConfigurationError::UnknownStatus(name.clone()))?;
            for node in members {
                let slot = status
                    .get_mut(node)
                    .ok_or(ConfigurationError::UnknownNode(*node))?;
                *slot = code;
            }
        }
        let explicit_infected = assignment.contains_key(StatusCode::Infected.name());

        // Fraction-infected policy
        if let Some(pct) = model_cfg.get(PERCENTAGE_INFECTED).copied() {
            model_cfg.entry(FRACTION_INFECTED.to_string()).or_insert(pct);
        }
        let mut fraction = model_cfg.get(FRACTION_INFECTED).copied();
        if let Some(f) = fraction {
            if !(0.0..=1.0).contains(&f) {
                return Err(ConfigurationError::OutOfRange {
                    name: FRACTION_INFECTED.to_string(),
                    value: f,
                    min: 0.0,
                    max: 1.0,
                }
                .into());
            }
        }
        if !explicit_infected && fraction.is_none() {
            warn!(
                "Initial infection missing: a random sample of {}% of graph nodes will be set as infected",
                DEFAULT_FRACTION_INFECTED * 100.0
            );
            fraction = Some(DEFAULT_FRACTION_INFECTED);
        }

        let mut params = ResolvedParams::new(model_cfg, nodes_cfg, edges_cfg);
        if let Some(f) = fraction {
            params.set_model(FRACTION_INFECTED, f);
        }

        let tracks_attempts = declared.iter().any(|p| p.name == NODE_ATTEMPT.name);
        let attempts: BTreeMap<NodeId, bool> = if tracks_attempts {
            self.nodes
                .iter()
                .map(|n| (*n, params.node(&NODE_ATTEMPT, *n).unwrap_or(0.0) != 0.0))
                .collect()
        } else {
            self.nodes.iter().map(|n| (*n, false)).collect()
        };

        // Nothing below can fail; commit.
        if !explicit_infected {
            if let Some(f) = fraction {
                self.sample_infected(&mut status, f);
            }
        }

        info!(
            model = self.rule.name(),
            nodes = self.nodes.len(),
            infected = count_status(&status, StatusCode::Infected),
            "Engine configured"
        );

        self.fraction_infected = if explicit_infected { None } else { fraction };
        self.params = Some(params);
        self.initial_status = status.clone();
        self.status = status;
        self.initial_attempts = attempts.clone();
        self.attempts = attempts;
        self.iteration = 0;
        self.stop = false;
        Ok(())
    }

    fn check_mandatory(
        &self,
        declared: &[ParameterSpec],
        configuration: &Configuration,
    ) -> Result<(), ConfigurationError> {
        for scope in [Scope::Model, Scope::Node, Scope::Edge] {
            let present: BTreeSet<&str> = match scope {
                Scope::Model => configuration
                    .get_model_parameters()
                    .keys()
                    .map(String::as_str)
                    .collect(),
                Scope::Node => configuration
                    .get_nodes_configuration()
                    .keys()
                    .map(String::as_str)
                    .collect(),
                Scope::Edge => configuration
                    .get_edges_configuration()
                    .keys()
                    .map(String::as_str)
                    .collect(),
            };
            let missing: BTreeSet<String> = declared
                .iter()
                .filter(|p| p.scope == scope && !p.optional && !present.contains(p.name))
                .map(|p| p.name.to_string())
                .collect();
            if !missing.is_empty() {
                return Err(ConfigurationError::MissingParameters { scope, names: missing });
            }
        }
        Ok(())
    }

    fn fill_defaults(
        &self,
        declared: &[ParameterSpec],
        configuration: &mut Configuration,
    ) -> Result<(), DiffusionError> {
        for spec in declared.iter().filter(|p| p.optional) {
            match spec.scope {
                Scope::Model => {
                    if !configuration.get_model_parameters().contains_key(spec.name) {
                        configuration.add_model_parameter(spec.name, spec.default)?;
                    }
                }
                Scope::Node => {
                    if !configuration.get_nodes_configuration().contains_key(spec.name) {
                        for node in &self.nodes {
                            configuration.add_node_configuration(spec.name, *node, spec.default)?;
                        }
                    }
                }
                Scope::Edge => {
                    if !configuration.get_edges_configuration().contains_key(spec.name) {
                        for edge in self.graph.edges() {
                            configuration.add_edge_configuration(spec.name, edge, spec.default)?;
                        }
                    }
                }
            }
        }
        Ok(())
    }

    fn check_coverage(
        &self,
        nodes_cfg: &BTreeMap<String, BTreeMap<NodeId, f64>>,
        edges_cfg: &BTreeMap<String, BTreeMap<EdgeKey, f64>>,
    ) -> Result<(), ConfigurationError> {
        for (name, table) in nodes_cfg {
            let found = self.nodes.iter().filter(|n| table.contains_key(n)).count();
            if found < self.nodes.len() {
                return Err(ConfigurationError::IncompleteCoverage {
                    scope: Scope::Node,
                    name: name.clone(),
                    expected: self.nodes.len(),
                    found,
                });
            }
        }

        let edges = self.graph.edges();
        let directed = self.graph.is_directed();
        for (name, table) in edges_cfg {
            let found = edges
                .iter()
                .filter(|e| {
                    table.contains_key(e) || (!directed && table.contains_key(&e.reversed()))
                })
                .count();
            if found < edges.len() {
                return Err(ConfigurationError::IncompleteCoverage {
                    scope: Scope::Edge,
                    name: name.clone(),
                    expected: edges.len(),
                    found,
                });
            }
        }
        Ok(())
    }

    /// Infects `max(1, round(fraction * |V|))` Susceptible nodes drawn
    /// without replacement from the engine stream.
    fn sample_infected(&mut self, status: &mut StatusMap, fraction: f64) {
        let total = self.nodes.len();
        let raw = (fraction * total as f64).round();
        let wanted = if raw < 1.0 {
            warn!(
                fraction,
                nodes = total,
                "The fraction_infected value is too low given the number of nodes of the selected graph: a single node will be set as infected"
            );
            1
        } else {
            raw as usize
        };

        let pool: Vec<NodeId> = status
            .iter()
            .filter(|(_, s)| **s == StatusCode::Susceptible)
            .map(|(n, _)| *n)
            .collect();
        let count = wanted.min(pool.len());

        let sampled: Vec<NodeId> = pool.choose_multiple(&mut self.rng, count).copied().collect();
        for node in &sampled {
            status.insert(*node, StatusCode::Infected);
        }
        debug!(count, ?sampled, "Sampled initial infected set");
    }

    /// Coerces every status outside the rule's status set to Susceptible.
    ///
    /// Returns one diagnostic per coerced node.
    pub fn clean_initial_status(&mut self) -> Vec<InvariantViolation> {
        let valid = self.rule.statuses();
        let mut violations = Vec::new();

        for (node, status) in self.status.iter_mut() {
            if !valid.contains(status) {
                let violation = InvariantViolation {
                    node: *node,
                    observed: *status,
                    iteration: self.iteration,
                };
                warn!(target: "diffusion::invariant", %violation, "Normalizing undeclared status");
                *status = StatusCode::Susceptible;
                violations.push(violation);
            }
        }
        violations
    }

    /// Executes one synchronous step.
    pub fn iterate(&mut self) -> Result<IterationResult, DiffusionError> {
        if self.params.is_none() {
            return Err(DiffusionError::NotConfigured);
        }
        self.clean_initial_status();

        let Some(params) = self.params.as_ref() else {
            return Err(DiffusionError::NotConfigured);
        };

        let mut buffer = self.status.clone();
        let mut attempted = Vec::new();
        {
            let view = StepView::new(&self.graph, &self.status, &self.attempts, params);
            for &node in &self.nodes {
                if !self.rule.is_relevant(node, &view) {
                    continue;
                }
                let evaluation = self.rule.evaluate(node, &view, &mut self.rng)?;
                for transition in evaluation.transitions {
                    buffer_transition(&self.status, &mut buffer, transition)?;
                }
                if evaluation.attempted {
                    attempted.push(node);
                }
            }
        }

        for node in &attempted {
            let flag = self.attempts.entry(*node).or_insert(false);
            if *flag {
                return Err(DiffusionError::RepeatedAttempt(*node));
            }
            *flag = true;
        }

        let delta = status_delta(&self.status, &buffer, self.rule.statuses());
        self.status = buffer;
        let index = self.iteration;
        self.iteration += 1;

        self.stop = match self.rule.convergence() {
            Convergence::NoStatusChange => delta.is_still(),
            Convergence::NoAttempts => attempted.is_empty(),
        };

        let active_set_size = delta
            .node_count
            .get(&StatusCode::Infected)
            .copied()
            .unwrap_or(0);

        debug!(
            iteration = index,
            activated = delta.changed.len(),
            attempts = attempted.len(),
            active_set_size,
            stop = self.stop,
            "Iteration complete"
        );

        Ok(IterationResult {
            iteration: index,
            active_set_size,
            status_delta: delta.changed,
            node_count: delta.node_count,
            count_delta: delta.count_delta,
            attempts: attempted.len(),
        })
    }

    /// Iterates until the stop flag is set.
    ///
    /// Errors abort the run; no partial result is returned.
    pub fn run_until_stable(&mut self) -> Result<RunResult, DiffusionError> {
        let mut run = RunResult {
            final_active_set_size: self.active_set_size(),
            ..Default::default()
        };

        while !self.stop {
            let step = self.iterate()?;
            let activated = step.activated();
            run.activated_nodes_in_order.extend(activated.iter().copied());
            run.activated_nodes_per_step.push(activated);
            run.final_active_set_size = step.active_set_size;
            run.iterations.push(step);
        }

        info!(
            model = self.rule.name(),
            steps = run.iterations.len(),
            activated = run.activated_nodes_in_order.len(),
            final_active_set_size = run.final_active_set_size,
            "Run stabilized"
        );
        Ok(run)
    }

    /// Starts a new run.
    ///
    /// With `infected_nodes`, exactly those nodes start Infected and become
    /// the new initial status. Without, the fraction policy re-samples a
    /// seed set, or the stored initial status is restored if no fraction was
    /// configured. Clears the iteration counter, stop flag and attempt flags.
    pub fn reset(&mut self, infected_nodes: Option<&[NodeId]>) -> Result<(), DiffusionError> {
        if self.params.is_none() {
            return Err(DiffusionError::NotConfigured);
        }

        match infected_nodes {
            Some(seeds) => {
                let mut status: StatusMap = self
                    .nodes
                    .iter()
                    .map(|n| (*n, StatusCode::Susceptible))
                    .collect();
                for node in seeds {
                    let slot = status
                        .get_mut(node)
                        .ok_or(ConfigurationError::UnknownNode(*node))?;
                    *slot = StatusCode::Infected;
                }
                self.initial_status = status.clone();
                self.status = status;
            }
            None => match self.fraction_infected {
                Some(fraction) => {
                    let mut status: StatusMap = self
                        .nodes
                        .iter()
                        .map(|n| (*n, StatusCode::Susceptible))
                        .collect();
                    self.sample_infected(&mut status, fraction);
                    self.initial_status = status.clone();
                    self.status = status;
                }
                None => {
                    self.status = self.initial_status.clone();
                }
            },
        }

        self.attempts = self.initial_attempts.clone();
        self.iteration = 0;
        self.stop = false;
        debug!(infected = self.active_set_size(), "Engine reset");
        Ok(())
    }

    /// Sets `nodes` back to Susceptible and clears the stop flag.
    ///
    /// Counterfactual entry point for marginal-gain experiments: neither the
    /// attempt flags nor any random stream are touched.
    pub fn unwind(&mut self, nodes: &[NodeId]) -> Result<(), DiffusionError> {
        if let Some(unknown) = nodes.iter().find(|n| !self.status.contains_key(n)) {
            return Err(DiffusionError::UnknownNode(*unknown));
        }
        for node in nodes {
            self.status.insert(*node, StatusCode::Susceptible);
        }
        self.stop = false;
        Ok(())
    }

    /// Clears the stop flag so that iteration can resume.
    pub fn clear_stop(&mut self) {
        self.stop = false;
    }

    /// Deactivates a random handful of `activated` nodes.
    ///
    /// Draws `k` uniformly from `0..=ceil(5% of |activated|)` and samples `k`
    /// nodes without replacement, using a stream separate from the one the
    /// rules consume. Deactivated nodes are removed from `activated`.
    pub fn random_deactivation(&mut self, activated: &mut Vec<NodeId>) -> Deactivation {
        if activated.is_empty() {
            return Deactivation::default();
        }

        let upper = (activated.len() as f64 * DEACTIVATION_FRACTION).ceil() as usize;
        let k = self.deactivation_rng.gen_range(0..=upper);
        let deactivated: Vec<NodeId> = activated
            .choose_multiple(&mut self.deactivation_rng, k)
            .copied()
            .collect();

        for node in &deactivated {
            if let Some(status) = self.status.get_mut(node) {
                *status = StatusCode::Susceptible;
            }
            if let Some(pos) = activated.iter().position(|n| n == node) {
                activated.remove(pos);
            }
        }

        info!(count = k, ?deactivated, "Random deactivation");
        Deactivation {
            remaining: activated.len(),
            deactivated,
        }
    }

    /// Forces a node's status, bypassing the rule.
    ///
    /// Statuses outside the rule's set are normalized at the next step.
    pub fn override_status(
        &mut self,
        node: NodeId,
        status: StatusCode,
    ) -> Result<(), DiffusionError> {
        let slot = self
            .status
            .get_mut(&node)
            .ok_or(DiffusionError::UnknownNode(node))?;
        *slot = status;
        Ok(())
    }

    /// Returns the rule's display name.
    pub fn name(&self) -> &'static str {
        self.rule.name()
    }

    /// Returns the rule's statuses as name -> code.
    pub fn status_map(&self) -> BTreeMap<&'static str, i64> {
        self.rule
            .statuses()
            .iter()
            .map(|s| (s.name(), s.code()))
            .collect()
    }

    /// Returns the rule's parameter declarations.
    pub fn parameters(&self) -> &'static [ParameterSpec] {
        self.rule.parameters()
    }

    /// Returns the resolved model parameters (empty until configured).
    pub fn info(&self) -> BTreeMap<String, f64> {
        self.params
            .as_ref()
            .map(|p| p.model_parameters().clone())
            .unwrap_or_default()
    }

    /// Returns the live status map.
    pub fn status(&self) -> &StatusMap {
        &self.status
    }

    /// Returns the initial status of the current run.
    pub fn initial_status(&self) -> &StatusMap {
        &self.initial_status
    }

    /// Returns true if `node` has made its cascade attempt.
    pub fn attempted(&self, node: NodeId) -> bool {
        self.attempts.get(&node).copied().unwrap_or(false)
    }

    /// Returns the number of Infected nodes.
    pub fn active_set_size(&self) -> usize {
        count_status(&self.status, StatusCode::Infected)
    }

    /// Returns the number of completed steps in this run.
    pub fn iteration(&self) -> u64 {
        self.iteration
    }

    /// Returns true once the rule's stop condition fired.
    pub fn is_stopped(&self) -> bool {
        self.stop
    }

    /// Returns the master seed.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Returns the graph under simulation.
    pub fn graph(&self) -> &G {
        &self.graph
    }
}

/// Writes a transition into the step buffer.
///
/// Only Susceptible -> Infected moves are accepted; anything else would
/// break monotone activation.
fn buffer_transition(
    snapshot: &StatusMap,
    buffer: &mut StatusMap,
    transition: Transition,
) -> Result<(), DiffusionError> {
    let before = snapshot
        .get(&transition.node)
        .copied()
        .ok_or(DiffusionError::UnknownNode(transition.node))?;
    if transition.status != StatusCode::Infected {
        return Err(DiffusionError::MonotonicityViolation {
            node: transition.node,
            attempted: transition.status,
        });
    }
    if before != StatusCode::Infected {
        buffer.insert(transition.node, StatusCode::Infected);
    }
    Ok(())
}

fn check_ranges(
    declared: &[ParameterSpec],
    model: &BTreeMap<String, f64>,
    nodes: &BTreeMap<String, BTreeMap<NodeId, f64>>,
    edges: &BTreeMap<String, BTreeMap<EdgeKey, f64>>,
) -> Result<(), ConfigurationError> {
    for spec in declared {
        let Some((min, max)) = spec.range else {
            continue;
        };
        let values: Vec<f64> = match spec.scope {
            Scope::Model => model.get(spec.name).copied().into_iter().collect(),
            Scope::Node => nodes
                .get(spec.name)
                .map(|t| t.values().copied().collect())
                .unwrap_or_default(),
            Scope::Edge => edges
                .get(spec.name)
                .map(|t| t.values().copied().collect())
                .unwrap_or_default(),
        };
        if let Some(bad) = values.into_iter().find(|v| !spec.accepts(*v)) {
            return Err(ConfigurationError::OutOfRange {
                name: spec.name.to_string(),
                value: bad,
                min,
                max,
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ArithmeticError;
    use crate::rule::Evaluation;
    use crate::rules::{IndependentCascadeRule, RuleKind, ThresholdRule, WeightedCascadeRule};
    use diffusion_env::AdjacencyGraph;
    use rand::RngCore;

    fn ring(n: u64) -> AdjacencyGraph {
        let mut graph = AdjacencyGraph::undirected();
        for i in 0..n {
            graph.add_edge(i, (i + 1) % n);
        }
        graph
    }

    fn path(n: u64) -> AdjacencyGraph {
        let mut graph = AdjacencyGraph::undirected();
        for i in 0..n.saturating_sub(1) {
            graph.add_edge(i, i + 1);
        }
        graph
    }

    fn ids(raw: &[u64]) -> Vec<NodeId> {
        raw.iter().map(|n| NodeId(*n)).collect()
    }

    fn threshold_config(
        graph: &AdjacencyGraph,
        threshold: f64,
        weight: f64,
        seeds: &[u64],
    ) -> Configuration {
        let mut config = Configuration::new();
        config
            .add_node_set_configuration("threshold", graph.nodes(), threshold)
            .unwrap();
        config
            .add_edge_set_configuration("weight", graph.edges(), weight)
            .unwrap();
        config.add_model_initial_configuration("Infected", ids(seeds));
        config
    }

    fn cascade_config(graph: &AdjacencyGraph, probability: f64, seeds: &[u64]) -> Configuration {
        let mut config = Configuration::new();
        config
            .add_edge_set_configuration("threshold", graph.edges(), probability)
            .unwrap();
        if !seeds.is_empty() {
            config.add_model_initial_configuration("Infected", ids(seeds));
        }
        config
    }

    /// Rule with mandatory parameters in every scope.
    struct StrictRule;

    const STRICT_PARAMS: [ParameterSpec; 3] = [
        ParameterSpec {
            name: "beta",
            description: "Model rate",
            scope: Scope::Model,
            range: Some((0.0, 1.0)),
            optional: false,
            default: 0.0,
        },
        ParameterSpec {
            name: "susceptibility",
            description: "Node susceptibility",
            scope: Scope::Node,
            range: Some((0.0, 1.0)),
            optional: false,
            default: 0.0,
        },
        ParameterSpec {
            name: "trust",
            description: "Edge trust",
            scope: Scope::Edge,
            range: None,
            optional: false,
            default: 0.0,
        },
    ];

    impl ActivationRule for StrictRule {
        fn name(&self) -> &'static str {
            "Strict"
        }

        fn parameters(&self) -> &'static [ParameterSpec] {
            &STRICT_PARAMS
        }

        fn convergence(&self) -> Convergence {
            Convergence::NoStatusChange
        }

        fn is_relevant(&self, _node: NodeId, _view: &StepView<'_>) -> bool {
            false
        }

        fn evaluate(
            &self,
            _node: NodeId,
            _view: &StepView<'_>,
            _rng: &mut dyn RngCore,
        ) -> Result<Evaluation, DiffusionError> {
            Ok(Evaluation::unchanged())
        }
    }

    /// Rule that tries to move Infected nodes back to Susceptible.
    struct RecoveringRule;

    impl ActivationRule for RecoveringRule {
        fn name(&self) -> &'static str {
            "Recovering"
        }

        fn parameters(&self) -> &'static [ParameterSpec] {
            &[]
        }

        fn convergence(&self) -> Convergence {
            Convergence::NoStatusChange
        }

        fn is_relevant(&self, node: NodeId, view: &StepView<'_>) -> bool {
            view.is_infected(node)
        }

        fn evaluate(
            &self,
            node: NodeId,
            _view: &StepView<'_>,
            _rng: &mut dyn RngCore,
        ) -> Result<Evaluation, DiffusionError> {
            Ok(Evaluation {
                transitions: vec![Transition {
                    node,
                    status: StatusCode::Susceptible,
                }],
                attempted: false,
            })
        }
    }

    #[test]
    fn test_threshold_ring_scenario() {
        let graph = ring(4);
        let mut config = threshold_config(&graph, 0.5, 0.6, &[0]);
        let mut engine = SimulationEngine::new(graph, Box::new(ThresholdRule::new()), 42);
        engine.configure(&mut config).unwrap();

        let first = engine.iterate().unwrap();
        assert_eq!(first.iteration, 0);
        assert_eq!(first.activated(), ids(&[1, 3]));
        assert_eq!(first.active_set_size, 3);
        assert!(!engine.is_stopped());

        let second = engine.iterate().unwrap();
        assert_eq!(second.activated(), ids(&[2]));
        assert_eq!(second.active_set_size, 4);
        assert!(!engine.is_stopped());

        let third = engine.iterate().unwrap();
        assert!(third.status_delta.is_empty());
        assert!(third.count_delta.values().all(|d| *d == 0));
        assert!(engine.is_stopped());
    }

    #[test]
    fn test_threshold_ring_run_until_stable() {
        let graph = ring(5);
        let mut config = threshold_config(&graph, 0.5, 0.6, &[0]);
        let mut engine = SimulationEngine::new(graph, Box::new(ThresholdRule::new()), 7);
        engine.configure(&mut config).unwrap();

        let run = engine.run_until_stable().unwrap();
        assert_eq!(run.final_active_set_size, 5);
        assert_eq!(run.activated_nodes_in_order, ids(&[1, 4, 2, 3]));
        assert_eq!(run.activated_nodes_per_step, vec![ids(&[1, 4]), ids(&[2, 3]), vec![]]);
        assert_eq!(run.iterations.len(), 3);
    }

    #[test]
    fn test_threshold_below_weight_never_spreads() {
        let graph = ring(6);
        let mut config = threshold_config(&graph, 0.9, 0.3, &[0]);
        let mut engine = SimulationEngine::new(graph, Box::new(ThresholdRule::new()), 1);
        engine.configure(&mut config).unwrap();

        let run = engine.run_until_stable().unwrap();
        assert_eq!(run.final_active_set_size, 1);
        assert!(run.activated_nodes_in_order.is_empty());
    }

    #[test]
    fn test_cascade_path_scenario() {
        let graph = path(3);
        let mut config = cascade_config(&graph, 1.0, &[0]);
        let mut engine =
            SimulationEngine::new(graph, Box::new(IndependentCascadeRule::new()), 99);
        engine.configure(&mut config).unwrap();

        let first = engine.iterate().unwrap();
        assert_eq!(first.activated(), ids(&[1]));
        assert_eq!(first.attempts, 1);
        assert!(engine.attempted(NodeId(0)));

        let second = engine.iterate().unwrap();
        assert_eq!(second.activated(), ids(&[2]));

        // Node 2 still spends its attempt on the third pass; the fourth is empty.
        let run = engine.run_until_stable().unwrap();
        assert_eq!(engine.active_set_size(), 3);
        let attempts: Vec<usize> = run.iterations.iter().map(|r| r.attempts).collect();
        assert_eq!(attempts, vec![1, 0]);
        assert!(engine.is_stopped());
        assert!(engine.attempted(NodeId(2)));

        engine.reset(None).unwrap();
        let full = engine.run_until_stable().unwrap();
        assert_eq!(full.iterations.len(), 4);
        let attempts: Vec<usize> = full.iterations.iter().map(|r| r.attempts).collect();
        assert_eq!(attempts, vec![1, 1, 1, 0]);
        assert_eq!(
            full.activated_nodes_per_step,
            vec![ids(&[1]), ids(&[2]), vec![], vec![]]
        );
        assert_eq!(full.final_active_set_size, 3);
    }

    #[test]
    fn test_cascade_zero_probability_stops_after_first_pass_attempts() {
        let graph = path(4);
        let mut config = cascade_config(&graph, 0.0, &[1]);
        let mut engine = SimulationEngine::new(graph, Box::new(IndependentCascadeRule::new()), 5);
        engine.configure(&mut config).unwrap();

        let run = engine.run_until_stable().unwrap();
        assert_eq!(run.final_active_set_size, 1);
        assert_eq!(run.iterations.len(), 2);
        assert_eq!(run.iterations[0].attempts, 1);
        assert_eq!(run.iterations[1].attempts, 0);
    }

    #[test]
    fn test_each_node_attempts_at_most_once() {
        let graph = ring(30);
        let mut config = cascade_config(&graph, 0.5, &[0, 15]);
        let mut engine =
            SimulationEngine::new(graph, Box::new(IndependentCascadeRule::new()), 2024);
        engine.configure(&mut config).unwrap();

        let run = engine.run_until_stable().unwrap();
        let total_attempts: usize = run.iterations.iter().map(|i| i.attempts).sum();
        assert_eq!(total_attempts, run.final_active_set_size);
    }

    #[test]
    fn test_monotone_activation_across_run() {
        let graph = ring(40);
        let mut config = cascade_config(&graph, 0.4, &[3]);
        let mut engine = SimulationEngine::new(graph, Box::new(IndependentCascadeRule::new()), 11);
        engine.configure(&mut config).unwrap();

        let mut previous = engine.status().clone();
        while !engine.is_stopped() {
            engine.iterate().unwrap();
            for (node, status) in &previous {
                if *status == StatusCode::Infected {
                    assert_eq!(engine.status()[node], StatusCode::Infected);
                }
            }
            previous = engine.status().clone();
        }
    }

    #[test]
    fn test_transition_out_of_infected_is_rejected() {
        let graph = path(3);
        let mut config = Configuration::new();
        config.add_model_initial_configuration("Infected", ids(&[1]));
        let mut engine = SimulationEngine::new(graph, Box::new(RecoveringRule), 0);
        engine.configure(&mut config).unwrap();

        let err = engine.iterate().unwrap_err();
        assert_eq!(
            err,
            DiffusionError::MonotonicityViolation {
                node: NodeId(1),
                attempted: StatusCode::Susceptible,
            }
        );
        assert_eq!(engine.status()[&NodeId(1)], StatusCode::Infected);
        assert_eq!(engine.iteration(), 0);
    }

    #[test]
    fn test_same_seed_same_run() {
        let run = |kind: RuleKind, seed: u64| {
            let graph = ring(50);
            let mut config = cascade_config(&graph, 0.3, &[]);
            config.add_model_parameter("fraction_infected", 0.1).unwrap();
            let mut engine = SimulationEngine::new(graph, kind.build(), seed);
            engine.configure(&mut config).unwrap();
            let initial = engine.initial_status().clone();
            (initial, engine.run_until_stable().unwrap())
        };

        for kind in [RuleKind::IndependentCascade, RuleKind::WeightedCascade] {
            let (initial_a, run_a) = run(kind, 314);
            let (initial_b, run_b) = run(kind, 314);
            assert_eq!(initial_a, initial_b, "{}", kind);
            assert_eq!(
                run_a.activated_nodes_per_step, run_b.activated_nodes_per_step,
                "{}",
                kind
            );
            assert_eq!(run_a, run_b, "{}", kind);
            assert!(run_a.final_active_set_size >= 5, "{}", kind);
        }
    }

    #[test]
    fn test_iterate_before_configure_fails() {
        let mut engine = SimulationEngine::new(ring(3), Box::new(ThresholdRule::new()), 0);
        assert_eq!(engine.iterate().unwrap_err(), DiffusionError::NotConfigured);
        assert_eq!(engine.reset(None).unwrap_err(), DiffusionError::NotConfigured);
    }

    #[test]
    fn test_missing_mandatory_parameters_are_listed() {
        let graph = path(3);
        let mut config = Configuration::new();
        config.add_model_initial_configuration("Infected", ids(&[0]));
        let mut engine = SimulationEngine::new(graph.clone(), Box::new(StrictRule), 0);

        let err = engine.configure(&mut config).unwrap_err();
        assert_eq!(
            err.as_configuration(),
            Some(&ConfigurationError::MissingParameters {
                scope: Scope::Model,
                names: ["beta".to_string()].into_iter().collect(),
            })
        );

        config.add_model_parameter("beta", 0.5).unwrap();
        let err = engine.configure(&mut config).unwrap_err();
        assert_eq!(
            err.as_configuration(),
            Some(&ConfigurationError::MissingParameters {
                scope: Scope::Node,
                names: ["susceptibility".to_string()].into_iter().collect(),
            })
        );

        config
            .add_node_set_configuration("susceptibility", graph.nodes(), 0.5)
            .unwrap();
        let err = engine.configure(&mut config).unwrap_err();
        assert_eq!(
            err.as_configuration(),
            Some(&ConfigurationError::MissingParameters {
                scope: Scope::Edge,
                names: ["trust".to_string()].into_iter().collect(),
            })
        );

        config.add_edge_set_configuration("trust", graph.edges(), 2.0).unwrap();
        engine.configure(&mut config).unwrap();
    }

    #[test]
    fn test_failed_configure_leaves_engine_untouched() {
        let graph = path(3);
        let mut engine = SimulationEngine::new(graph, Box::new(StrictRule), 0);
        let mut config = Configuration::new();
        config.add_model_initial_configuration("Infected", ids(&[0]));

        assert!(engine.configure(&mut config).is_err());
        assert_eq!(engine.active_set_size(), 0);
        assert!(engine.info().is_empty());
    }

    #[test]
    fn test_defaults_are_written_back() {
        let graph = ring(4);
        let mut config = Configuration::new();
        config.add_model_initial_configuration("Infected", ids(&[0]));
        let mut engine = SimulationEngine::new(graph, Box::new(ThresholdRule::new()), 0);
        engine.configure(&mut config).unwrap();

        assert_eq!(config.get_nodes_configuration()["threshold"].len(), 4);
        assert_eq!(config.get_edges_configuration()["weight"].len(), 4);
        assert!(config.get_nodes_configuration()["threshold"]
            .values()
            .all(|v| (*v - 0.1).abs() < f64::EPSILON));
    }

    #[test]
    fn test_partial_node_coverage_is_rejected() {
        let graph = ring(4);
        let mut config = Configuration::new();
        config
            .add_node_set_configuration("threshold", ids(&[0, 1, 2]), 0.5)
            .unwrap();
        config.add_model_initial_configuration("Infected", ids(&[0]));
        let mut engine = SimulationEngine::new(graph, Box::new(ThresholdRule::new()), 0);

        let err = engine.configure(&mut config).unwrap_err();
        assert_eq!(
            err.as_configuration(),
            Some(&ConfigurationError::IncompleteCoverage {
                scope: Scope::Node,
                name: "threshold".to_string(),
                expected: 4,
                found: 3,
            })
        );
    }

    #[test]
    fn test_partial_edge_coverage_is_rejected() {
        let graph = ring(4);
        let mut config = Configuration::new();
        config
            .add_edge_set_configuration("weight", [EdgeKey::new(0u64, 1u64)], 0.5)
            .unwrap();
        config.add_model_initial_configuration("Infected", ids(&[0]));
        let mut engine = SimulationEngine::new(graph, Box::new(ThresholdRule::new()), 0);

        let err = engine.configure(&mut config).unwrap_err();
        assert!(matches!(
            err.as_configuration(),
            Some(ConfigurationError::IncompleteCoverage { scope: Scope::Edge, found: 1, .. })
        ));
    }

    #[test]
    fn test_reversed_undirected_edge_keys_count_as_coverage() {
        let graph = path(3);
        let mut config = Configuration::new();
        config
            .add_edge_set_configuration(
                "weight",
                [EdgeKey::new(1u64, 0u64), EdgeKey::new(2u64, 1u64)],
                1.0,
            )
            .unwrap();
        config.add_node_set_configuration("threshold", graph.nodes(), 0.5).unwrap();
        config.add_model_initial_configuration("Infected", ids(&[0]));
        let mut engine = SimulationEngine::new(graph, Box::new(ThresholdRule::new()), 0);
        engine.configure(&mut config).unwrap();

        let run = engine.run_until_stable().unwrap();
        assert_eq!(run.final_active_set_size, 3);
    }

    #[test]
    fn test_out_of_range_value_is_rejected() {
        let graph = ring(3);
        let mut config = threshold_config(&graph, 1.5, 0.5, &[0]);
        let mut engine = SimulationEngine::new(graph, Box::new(ThresholdRule::new()), 0);

        let err = engine.configure(&mut config).unwrap_err();
        assert!(matches!(
            err.as_configuration(),
            Some(ConfigurationError::OutOfRange { value, .. })
                if (*value - 1.5).abs() < f64::EPSILON
        ));
    }

    #[test]
    fn test_unknown_status_and_node_are_rejected() {
        let graph = ring(3);
        let mut engine = SimulationEngine::new(graph, Box::new(ThresholdRule::new()), 0);

        let mut config = Configuration::new();
        config.add_model_initial_configuration("Recovered", ids(&[1]));
        let err = engine.configure(&mut config).unwrap_err();
        assert_eq!(
            err.as_configuration(),
            Some(&ConfigurationError::UnknownStatus("Recovered".to_string()))
        );

        let mut config = Configuration::new();
        config.add_model_initial_configuration("Infected", ids(&[17]));
        let err = engine.configure(&mut config).unwrap_err();
        assert_eq!(
            err.as_configuration(),
            Some(&ConfigurationError::UnknownNode(NodeId(17)))
        );
    }

    #[test]
    fn test_missing_infection_defaults_to_five_percent() {
        let graph = ring(40);
        let mut config = Configuration::new();
        let mut engine = SimulationEngine::new(graph, Box::new(ThresholdRule::new()), 3);
        engine.configure(&mut config).unwrap();

        assert_eq!(engine.active_set_size(), 2);
        assert_eq!(engine.info().get(FRACTION_INFECTED).copied(), Some(DEFAULT_FRACTION_INFECTED));
    }

    #[test]
    fn test_tiny_fraction_clamps_to_one_node() {
        let graph = ring(10);
        let mut config = Configuration::new();
        config.add_model_parameter(FRACTION_INFECTED, 0.01).unwrap();
        let mut engine = SimulationEngine::new(graph, Box::new(ThresholdRule::new()), 3);
        engine.configure(&mut config).unwrap();

        assert_eq!(engine.active_set_size(), 1);
    }

    #[test]
    fn test_percentage_alias() {
        let graph = ring(20);
        let mut config = Configuration::new();
        config.add_model_parameter(PERCENTAGE_INFECTED, 0.25).unwrap();
        let mut engine = SimulationEngine::new(graph, Box::new(ThresholdRule::new()), 3);
        engine.configure(&mut config).unwrap();

        assert_eq!(engine.active_set_size(), 5);
        assert_eq!(engine.info().get(FRACTION_INFECTED).copied(), Some(0.25));
    }

    #[test]
    fn test_reset_with_explicit_seeds() {
        let graph = ring(5);
        let mut config = threshold_config(&graph, 0.5, 0.6, &[0]);
        let mut engine = SimulationEngine::new(graph, Box::new(ThresholdRule::new()), 0);
        engine.configure(&mut config).unwrap();
        engine.run_until_stable().unwrap();
        assert_eq!(engine.active_set_size(), 5);

        engine.reset(Some(ids(&[2]).as_slice())).unwrap();
        assert_eq!(engine.iteration(), 0);
        assert!(!engine.is_stopped());
        assert_eq!(engine.active_set_size(), 1);
        assert_eq!(engine.status()[&NodeId(2)], StatusCode::Infected);
        assert_eq!(engine.initial_status(), engine.status());

        let run = engine.run_until_stable().unwrap();
        assert_eq!(run.activated_nodes_per_step[0], ids(&[1, 3]));
    }

    #[test]
    fn test_reset_without_fraction_restores_initial_status() {
        let graph = ring(5);
        let mut config = threshold_config(&graph, 0.5, 0.6, &[0]);
        let mut engine = SimulationEngine::new(graph, Box::new(ThresholdRule::new()), 0);
        engine.configure(&mut config).unwrap();
        let first = engine.run_until_stable().unwrap();

        engine.reset(None).unwrap();
        assert_eq!(engine.active_set_size(), 1);
        let second = engine.run_until_stable().unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_reset_restores_attempt_flags() {
        let graph = path(3);
        let mut config = cascade_config(&graph, 1.0, &[0]);
        let mut engine = SimulationEngine::new(graph, Box::new(IndependentCascadeRule::new()), 0);
        engine.configure(&mut config).unwrap();
        engine.run_until_stable().unwrap();
        assert!(engine.attempted(NodeId(0)));

        engine.reset(None).unwrap();
        assert!(!engine.attempted(NodeId(0)));
        assert!(!engine.attempted(NodeId(2)));
    }

    #[test]
    fn test_reset_unknown_seed_is_rejected() {
        let graph = ring(3);
        let mut config = threshold_config(&graph, 0.5, 0.6, &[0]);
        let mut engine = SimulationEngine::new(graph, Box::new(ThresholdRule::new()), 0);
        engine.configure(&mut config).unwrap();
        assert!(engine.reset(Some(ids(&[9]).as_slice())).is_err());
    }

    #[test]
    fn test_configured_attempt_flags_skip_nodes() {
        let graph = path(3);
        let mut config = cascade_config(&graph, 1.0, &[0]);
        config.add_node_configuration("attempt", NodeId(0), 1.0).unwrap();
        config.add_node_configuration("attempt", NodeId(1), 0.0).unwrap();
        config.add_node_configuration("attempt", NodeId(2), 0.0).unwrap();
        let mut engine = SimulationEngine::new(graph, Box::new(IndependentCascadeRule::new()), 0);
        engine.configure(&mut config).unwrap();

        let run = engine.run_until_stable().unwrap();
        assert_eq!(run.final_active_set_size, 1);
        assert_eq!(run.iterations.len(), 1);
    }

    #[test]
    fn test_unwind_resumes_from_reduced_set() {
        let graph = ring(5);
        let mut config = threshold_config(&graph, 0.5, 0.6, &[0]);
        let mut engine = SimulationEngine::new(graph, Box::new(ThresholdRule::new()), 0);
        engine.configure(&mut config).unwrap();
        engine.run_until_stable().unwrap();
        assert!(engine.is_stopped());

        engine.unwind(&ids(&[2, 3])).unwrap();
        assert!(!engine.is_stopped());
        assert_eq!(engine.active_set_size(), 3);

        let run = engine.run_until_stable().unwrap();
        assert_eq!(run.activated_nodes_per_step[0], ids(&[2, 3]));
        assert_eq!(run.final_active_set_size, 5);
    }

    #[test]
    fn test_unwind_keeps_attempt_flags() {
        let graph = path(3);
        let mut config = cascade_config(&graph, 1.0, &[0]);
        let mut engine = SimulationEngine::new(graph, Box::new(IndependentCascadeRule::new()), 0);
        engine.configure(&mut config).unwrap();
        engine.run_until_stable().unwrap();

        engine.unwind(&ids(&[2])).unwrap();
        assert!(engine.attempted(NodeId(1)));
        let run = engine.run_until_stable().unwrap();
        assert_eq!(run.final_active_set_size, 2);
        assert!(run.activated_nodes_in_order.is_empty());
    }

    #[test]
    fn test_unwind_unknown_node() {
        let graph = ring(3);
        let mut config = threshold_config(&graph, 0.5, 0.6, &[0]);
        let mut engine = SimulationEngine::new(graph, Box::new(ThresholdRule::new()), 0);
        engine.configure(&mut config).unwrap();
        assert_eq!(
            engine.unwind(&ids(&[1, 8])).unwrap_err(),
            DiffusionError::UnknownNode(NodeId(8))
        );
        assert_eq!(engine.active_set_size(), 1);
    }

    #[test]
    fn test_override_is_normalized_at_next_step() {
        let graph = ring(4);
        let mut config = threshold_config(&graph, 0.9, 0.1, &[0]);
        let mut engine = SimulationEngine::new(graph, Box::new(ThresholdRule::new()), 0);
        engine.configure(&mut config).unwrap();

        engine.override_status(NodeId(2), StatusCode::Recovered).unwrap();
        let result = engine.iterate().unwrap();
        assert_eq!(engine.status()[&NodeId(2)], StatusCode::Susceptible);
        assert!(!result.node_count.contains_key(&StatusCode::Recovered));

        engine.override_status(NodeId(3), StatusCode::Blocked).unwrap();
        let violations = engine.clean_initial_status();
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].node, NodeId(3));
        assert_eq!(violations[0].observed, StatusCode::Blocked);
    }

    #[test]
    fn test_random_deactivation_bounds() {
        let graph = ring(100);
        let mut config = threshold_config(&graph, 0.5, 0.6, &[0]);
        let mut engine = SimulationEngine::new(graph, Box::new(ThresholdRule::new()), 8);
        engine.configure(&mut config).unwrap();
        let run = engine.run_until_stable().unwrap();

        let mut activated = run.activated_nodes_in_order.clone();
        let before = activated.len();
        let outcome = engine.random_deactivation(&mut activated);

        assert!(outcome.deactivated.len() <= (before as f64 * 0.05).ceil() as usize);
        assert_eq!(outcome.remaining, before - outcome.deactivated.len());
        for node in &outcome.deactivated {
            assert!(!activated.contains(node));
            assert_eq!(engine.status()[node], StatusCode::Susceptible);
        }

        let mut empty = Vec::new();
        assert_eq!(engine.random_deactivation(&mut empty), Deactivation::default());
    }

    #[test]
    fn test_random_deactivation_does_not_perturb_rule_stream() {
        let build = || {
            let graph = ring(60);
            let mut config = cascade_config(&graph, 0.5, &[0]);
            let mut engine =
                SimulationEngine::new(graph, Box::new(IndependentCascadeRule::new()), 77);
            engine.configure(&mut config).unwrap();
            engine
        };

        let mut plain = build();
        let mut disturbed = build();

        // Deactivating Susceptible nodes leaves the status map as it was.
        let mut bystanders = ids(&(30..60).collect::<Vec<_>>());
        for _ in 0..5 {
            disturbed.random_deactivation(&mut bystanders);
        }
        disturbed.clear_stop();

        assert_eq!(
            plain.run_until_stable().unwrap(),
            disturbed.run_until_stable().unwrap()
        );
    }

    #[test]
    fn test_weighted_cascade_on_isolated_infected_node() {
        let mut graph = ring(3);
        graph.add_node(9u64);
        let mut config = Configuration::new();
        config.add_model_initial_configuration("Infected", ids(&[9]));
        let mut engine = SimulationEngine::new(graph, Box::new(WeightedCascadeRule::new()), 0);
        engine.configure(&mut config).unwrap();

        let run = engine.run_until_stable().unwrap();
        assert_eq!(run.final_active_set_size, 1);
        assert_eq!(
            WeightedCascadeRule::activation_probability(engine.graph(), NodeId(9)),
            Err(ArithmeticError::ZeroDegree(NodeId(9)))
        );
    }

    #[test]
    fn test_introspection() {
        let graph = ring(3);
        let engine = SimulationEngine::new(graph, Box::new(IndependentCascadeRule::new()), 12);
        assert_eq!(engine.name(), "Independent Cascades");
        assert_eq!(engine.seed(), 12);
        assert_eq!(engine.status_map().get("Infected"), Some(&1));
        assert_eq!(engine.status_map().get("Susceptible"), Some(&0));
        assert_eq!(engine.parameters().len(), 2);
    }
}
