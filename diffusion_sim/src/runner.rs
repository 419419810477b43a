//! Scenario runner - builds graphs, configures engines and checks runs.

use crate::context::SimContext;
use crate::error::SimError;
use crate::oracle::{
    infected_nodes, monotonicity_violations, trace_until_stable, unsupported_activations, Trace,
};
use crate::scenarios::ScenarioId;
use crate::topology::{erdos_renyi, path, ring, uniform_edge_values, uniform_node_values};

use diffusion_core::rule::BINARY_STATUSES;
use diffusion_core::{
    build_trends, ArithmeticError, IndependentCascadeRule, RuleKind, SimulationEngine, StatusCode,
    ThresholdRule, Trends, WeightedCascadeRule,
};
use diffusion_env::{Configuration, GraphAdapter, NodeId};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Candidates probed by the marginal gain scenario.
const MARGINAL_GAIN_CANDIDATES: usize = 5;

/// Results from running a scenario.
#[derive(Debug, Clone, Serialize)]
pub struct ScenarioResult {
    /// Scenario that was run
    pub scenario: ScenarioId,

    /// Seed used
    pub seed: u64,

    /// Whether scenario passed all assertions
    pub passed: bool,

    /// Steps executed by the main run
    pub iterations: usize,

    /// Infected count at the end of the main run
    pub final_active_set_size: usize,

    /// Failure message if any
    pub failure_reason: Option<String>,

    /// Metrics collected during run
    pub metrics: ScenarioMetrics,

    /// Per-status series of the main run
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trends: Option<Trends>,
}

/// Metrics collected during scenario execution.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ScenarioMetrics {
    /// Nodes in the scenario graph
    pub nodes: usize,

    /// Edges in the scenario graph
    pub edges: usize,

    /// Cascade attempts over the main run
    pub total_attempts: usize,

    /// Most activations in a single step
    pub max_step_activation: usize,

    /// Nodes removed by random deactivation
    pub deactivated: usize,

    /// Candidates probed for marginal gain
    pub candidates_tested: usize,

    /// Largest marginal gain observed
    pub best_marginal_gain: usize,
}

/// Main run of a scenario plus the failed checks.
struct Outcome {
    trace: Trace,
    metrics: ScenarioMetrics,
    failures: Vec<String>,
}

impl Outcome {
    fn new(trace: Trace) -> Self {
        let metrics = ScenarioMetrics {
            total_attempts: trace.total_attempts(),
            max_step_activation: trace.max_step_activation(),
            ..Default::default()
        };
        Self {
            trace,
            metrics,
            failures: Vec::new(),
        }
    }

    fn check(&mut self, ok: bool, reason: impl FnOnce() -> String) {
        if !ok {
            self.failures.push(reason());
        }
    }

    fn check_monotone(&mut self) {
        let violations = monotonicity_violations(&self.trace);
        self.check(violations.is_empty(), || {
            format!("Infected nodes reverted: {:?}", violations)
        });
    }

    fn check_supported<G: GraphAdapter + ?Sized>(&mut self, graph: &G) {
        let unsupported = unsupported_activations(graph, &self.trace);
        self.check(unsupported.is_empty(), || {
            format!("Activated without an infected influencer: {:?}", unsupported)
        });
    }

    /// Every infected node spends exactly one attempt before a cascade stops.
    fn check_attempt_once(&mut self) {
        let attempts = self.metrics.total_attempts;
        let active = self.trace.run.final_active_set_size;
        self.check(attempts == active, || {
            format!("{} attempts for {} infected nodes", attempts, active)
        });
    }
}

/// Runs diffusion scenarios.
pub struct ScenarioRunner {
    /// Configuration seed
    seed: u64,

    /// Graph size
    num_nodes: usize,

    /// Edge probability of random topologies
    edge_probability: f64,

    /// Seed-set fraction for scenarios without explicit seeds
    fraction_infected: f64,

    /// Rule replayed by the determinism scenario
    rule: RuleKind,
}

impl ScenarioRunner {
    /// Creates a new scenario runner.
    pub fn new(seed: u64, num_nodes: usize) -> Self {
        Self {
            seed,
            num_nodes,
            edge_probability: 0.1,
            fraction_infected: 0.1,
            rule: RuleKind::IndependentCascade,
        }
    }

    /// Sets the rule replayed by the determinism scenario.
    pub fn with_rule(mut self, rule: RuleKind) -> Self {
        self.rule = rule;
        self
    }

    /// Sets the edge probability of random topologies.
    pub fn with_edge_probability(mut self, p: f64) -> Self {
        self.edge_probability = p;
        self
    }

    /// Sets the initial infected fraction.
    pub fn with_fraction_infected(mut self, fraction: f64) -> Self {
        self.fraction_infected = fraction;
        self
    }

    /// Runs a scenario and returns the result.
    pub fn run(&self, scenario: ScenarioId) -> ScenarioResult {
        info!("Starting scenario: {} (seed={})", scenario.name(), self.seed);

        let outcome = match scenario {
            ScenarioId::ThresholdRing => self.run_threshold_ring(),
            ScenarioId::CascadePath => self.run_cascade_path(),
            ScenarioId::WeightedCascade => self.run_weighted_cascade(),
            ScenarioId::Determinism => self.run_determinism(),
            ScenarioId::MarginalGain => self.run_marginal_gain(),
            ScenarioId::DirectedThreshold => self.run_directed_threshold(),
        };

        match outcome {
            Ok(outcome) => {
                let trends = build_trends(&BINARY_STATUSES, &outcome.trace.run.iterations);
                let (trends, mut failures) = match trends {
                    Ok(trends) => (Some(trends), outcome.failures),
                    Err(e) => {
                        let mut failures = outcome.failures;
                        failures.push(e.to_string());
                        (None, failures)
                    }
                };
                let passed = failures.is_empty();
                if !passed {
                    warn!("{} failed {} check(s)", scenario.name(), failures.len());
                }
                ScenarioResult {
                    scenario,
                    seed: self.seed,
                    passed,
                    iterations: outcome.trace.run.iterations.len(),
                    final_active_set_size: outcome.trace.run.final_active_set_size,
                    failure_reason: if passed { None } else { Some(failures.remove(0)) },
                    metrics: outcome.metrics,
                    trends,
                }
            }
            Err(e) => {
                warn!("{} aborted: {}", scenario.name(), e);
                ScenarioResult {
                    scenario,
                    seed: self.seed,
                    passed: false,
                    iterations: 0,
                    final_active_set_size: 0,
                    failure_reason: Some(e.to_string()),
                    metrics: ScenarioMetrics::default(),
                    trends: None,
                }
            }
        }
    }

    fn context(&self) -> SimContext {
        SimContext::new(self.seed)
    }

    /// Threshold spread on a ring from node 0.
    ///
    /// Every step infects the (at most two) nodes at the next ring distance,
    /// so the run takes `n / 2` spreading steps plus the empty closing step.
    fn run_threshold_ring(&self) -> Result<Outcome, SimError> {
        let n = self.num_nodes.max(3) as u64;
        let graph = ring(n);

        let mut config = Configuration::new();
        config.add_node_set_configuration("threshold", graph.nodes(), 0.5)?;
        config.add_edge_set_configuration("weight", graph.edges(), 0.6)?;
        config.add_model_initial_configuration("Infected", [NodeId(0)]);

        let mut engine = SimulationEngine::new(
            graph.clone(),
            Box::new(ThresholdRule::new()),
            self.context().engine_seed(),
        );
        engine.configure(&mut config)?;

        let mut outcome = Outcome::new(trace_until_stable(&mut engine)?);
        outcome.metrics.nodes = graph.number_of_nodes();
        outcome.metrics.edges = graph.number_of_edges();

        let expected_steps = (n / 2) as usize + 1;
        let run = &outcome.trace.run;
        let (final_size, steps, widest) = (
            run.final_active_set_size,
            run.iterations.len(),
            outcome.metrics.max_step_activation,
        );
        outcome.check(final_size == n as usize, || {
            format!("Ring spread reached {} of {} nodes", final_size, n)
        });
        outcome.check(steps == expected_steps, || {
            format!("Ring took {} steps, expected {}", steps, expected_steps)
        });
        outcome.check(widest <= 2, || {
            format!("{} activations in one step on a ring", widest)
        });
        outcome.check_supported(&graph);
        outcome.check_monotone();
        Ok(outcome)
    }

    /// Certain cascade along a path from node 0.
    fn run_cascade_path(&self) -> Result<Outcome, SimError> {
        let n = self.num_nodes.max(2) as u64;
        let graph = path(n);

        let mut config = Configuration::new();
        config.add_edge_set_configuration("threshold", graph.edges(), 1.0)?;
        config.add_model_initial_configuration("Infected", [NodeId(0)]);

        let mut engine = SimulationEngine::new(
            graph.clone(),
            Box::new(IndependentCascadeRule::new()),
            self.context().engine_seed(),
        );
        engine.configure(&mut config)?;

        let mut outcome = Outcome::new(trace_until_stable(&mut engine)?);
        outcome.metrics.nodes = graph.number_of_nodes();
        outcome.metrics.edges = graph.number_of_edges();

        let per_step = outcome.trace.run.activated_nodes_per_step.clone();
        let in_order = per_step
            .iter()
            .take(n as usize - 1)
            .enumerate()
            .all(|(k, step)| step.as_slice() == [NodeId(k as u64 + 1)]);
        let quiet_tail = per_step.iter().skip(n as usize - 1).all(Vec::is_empty);
        outcome.check(in_order && quiet_tail, || {
            format!("Path activations out of order: {:?}", per_step)
        });

        let final_size = outcome.trace.run.final_active_set_size;
        outcome.check(final_size == n as usize, || {
            format!("Path spread reached {} of {} nodes", final_size, n)
        });
        let last_attempts = outcome.trace.run.iterations.last().map(|i| i.attempts);
        outcome.check(last_attempts == Some(0), || {
            format!("Run stopped after a step with {:?} attempts", last_attempts)
        });
        // The tail node spends its attempt one pass after activating.
        let passes = outcome.trace.run.iterations.len();
        outcome.check(passes == n as usize + 1, || {
            format!("Path run took {} passes, expected {}", passes, n + 1)
        });
        outcome.check_attempt_once();
        outcome.check_monotone();
        Ok(outcome)
    }

    /// Weighted cascade on G(n, p), followed by a random deactivation round.
    fn run_weighted_cascade(&self) -> Result<Outcome, SimError> {
        let ctx = self.context();
        let graph = erdos_renyi(
            self.num_nodes as u64,
            self.edge_probability,
            false,
            &mut ctx.topology_rng(),
        )?;

        let mut config = Configuration::new();
        config.add_model_parameter("fraction_infected", self.fraction_infected)?;

        let mut engine = SimulationEngine::new(
            graph.clone(),
            Box::new(WeightedCascadeRule::new()),
            ctx.engine_seed(),
        );
        engine.configure(&mut config)?;

        let mut outcome = Outcome::new(trace_until_stable(&mut engine)?);
        outcome.metrics.nodes = graph.number_of_nodes();
        outcome.metrics.edges = graph.number_of_edges();
        outcome.check_attempt_once();
        outcome.check_monotone();

        for node in graph.nodes() {
            let probability = WeightedCascadeRule::activation_probability(&graph, node);
            let expected = match graph.degree(node) {
                0 => Err(ArithmeticError::ZeroDegree(node)),
                degree => Ok(1.0 / degree as f64),
            };
            outcome.check(probability == expected, || {
                format!("Node {} probability {:?}, expected {:?}", node, probability, expected)
            });
        }

        let mut activated = outcome.trace.run.activated_nodes_in_order.clone();
        let before = activated.len();
        let bound = (before as f64 * 0.05).ceil() as usize;
        let deactivation = engine.random_deactivation(&mut activated);
        outcome.metrics.deactivated = deactivation.deactivated.len();

        let removed = deactivation.deactivated.len();
        outcome.check(removed <= bound, || {
            format!("Deactivated {} nodes, bound {}", removed, bound)
        });
        let reverted = deactivation
            .deactivated
            .iter()
            .all(|n| engine.status().get(n) != Some(&StatusCode::Infected));
        outcome.check(reverted && deactivation.remaining == before - removed, || {
            "Deactivated nodes still marked Infected".to_string()
        });
        Ok(outcome)
    }

    /// Two engines sharing one graph, configuration and seed.
    fn run_determinism(&self) -> Result<Outcome, SimError> {
        let ctx = self.context();
        let graph = Arc::new(erdos_renyi(
            self.num_nodes as u64,
            self.edge_probability,
            false,
            &mut ctx.topology_rng(),
        )?);

        let mut config = Configuration::new();
        config.add_model_parameter("fraction_infected", self.fraction_infected)?;
        uniform_edge_values(&graph, "threshold", 0.0, 1.0, &mut ctx.rng_for(1), &mut config)?;

        debug!("Replaying {} twice", self.rule);
        let mut first =
            SimulationEngine::new(Arc::clone(&graph), self.rule.build(), ctx.engine_seed());
        first.configure(&mut config.clone())?;
        let mut second =
            SimulationEngine::new(Arc::clone(&graph), self.rule.build(), ctx.engine_seed());
        second.configure(&mut config.clone())?;

        let same_start = first.initial_status() == second.initial_status();
        let replay = trace_until_stable(&mut second)?;

        let mut outcome = Outcome::new(trace_until_stable(&mut first)?);
        outcome.metrics.nodes = graph.number_of_nodes();
        outcome.metrics.edges = graph.number_of_edges();

        outcome.check(same_start, || "Initial seed sets differ".to_string());
        let diverged_at = outcome
            .trace
            .run
            .activated_nodes_per_step
            .iter()
            .zip(&replay.run.activated_nodes_per_step)
            .position(|(a, b)| a != b);
        outcome.check(
            diverged_at.is_none() && outcome.trace.run == replay.run,
            || format!("Replay diverged at step {:?}", diverged_at),
        );
        if self.rule.is_randomized() {
            outcome.check_attempt_once();
        }
        outcome.check_monotone();
        Ok(outcome)
    }

    /// Threshold spread gain of single extra seeds.
    ///
    /// Each candidate is infected on top of the stable baseline, the spread
    /// is resumed, and the newly activated nodes are unwound again. The gain
    /// must match a fresh run from the enlarged seed set.
    fn run_marginal_gain(&self) -> Result<Outcome, SimError> {
        let ctx = self.context();
        let graph = erdos_renyi(
            self.num_nodes as u64,
            self.edge_probability,
            false,
            &mut ctx.topology_rng(),
        )?;

        let mut config = Configuration::new();
        config.add_model_parameter("fraction_infected", self.fraction_infected)?;
        uniform_node_values(&graph, "threshold", 0.2, 0.6, &mut ctx.rng_for(1), &mut config)?;
        uniform_edge_values(&graph, "weight", 0.1, 0.5, &mut ctx.rng_for(2), &mut config)?;

        let mut engine = SimulationEngine::new(
            graph.clone(),
            Box::new(ThresholdRule::new()),
            ctx.engine_seed(),
        );
        engine.configure(&mut config.clone())?;
        let seeds = infected_nodes(engine.initial_status());

        let mut outcome = Outcome::new(trace_until_stable(&mut engine)?);
        outcome.metrics.nodes = graph.number_of_nodes();
        outcome.metrics.edges = graph.number_of_edges();
        outcome.check_supported(&graph);
        outcome.check_monotone();

        let baseline = engine.status().clone();
        let spread = outcome.trace.run.final_active_set_size;
        let candidates: Vec<NodeId> = baseline
            .iter()
            .filter(|(_, s)| **s == StatusCode::Susceptible)
            .map(|(n, _)| *n)
            .take(MARGINAL_GAIN_CANDIDATES)
            .collect();

        let mut fresh = SimulationEngine::new(
            graph.clone(),
            Box::new(ThresholdRule::new()),
            ctx.engine_seed(),
        );
        fresh.configure(&mut config.clone())?;

        for candidate in candidates {
            engine.override_status(candidate, StatusCode::Infected)?;
            engine.clear_stop();
            let resumed = engine.run_until_stable()?;
            let gain = resumed.activated_nodes_in_order.len() + 1;

            let mut touched = resumed.activated_nodes_in_order.clone();
            touched.push(candidate);
            engine.unwind(&touched)?;

            let mut enlarged = seeds.clone();
            enlarged.push(candidate);
            fresh.reset(Some(enlarged.as_slice()))?;
            let reference = fresh.run_until_stable()?;
            let reference_gain = reference.final_active_set_size.saturating_sub(spread);

            debug!(%candidate, gain, reference_gain, "Marginal gain");
            outcome.metrics.candidates_tested += 1;
            outcome.metrics.best_marginal_gain = outcome.metrics.best_marginal_gain.max(gain);

            outcome.check(gain == reference_gain, || {
                format!(
                    "Candidate {} gained {} incrementally but {} from scratch",
                    candidate, gain, reference_gain
                )
            });
            let restored = engine.status() == &baseline;
            outcome.check(restored, || {
                format!("Unwinding candidate {} did not restore the baseline", candidate)
            });
        }
        Ok(outcome)
    }

    /// Threshold spread on a directed G(n, p).
    fn run_directed_threshold(&self) -> Result<Outcome, SimError> {
        let ctx = self.context();
        let graph = erdos_renyi(
            self.num_nodes as u64,
            self.edge_probability,
            true,
            &mut ctx.topology_rng(),
        )?;

        let mut config = Configuration::new();
        config.add_model_parameter("fraction_infected", self.fraction_infected)?;
        uniform_node_values(&graph, "threshold", 0.0, 0.5, &mut ctx.rng_for(1), &mut config)?;
        uniform_edge_values(&graph, "weight", 0.2, 0.6, &mut ctx.rng_for(2), &mut config)?;

        let mut engine = SimulationEngine::new(
            graph.clone(),
            Box::new(ThresholdRule::new()),
            ctx.engine_seed(),
        );
        engine.configure(&mut config)?;

        let mut outcome = Outcome::new(trace_until_stable(&mut engine)?);
        outcome.metrics.nodes = graph.number_of_nodes();
        outcome.metrics.edges = graph.number_of_edges();
        outcome.check_supported(&graph);
        outcome.check_monotone();

        let stopped_still = outcome
            .trace
            .run
            .iterations
            .last()
            .is_some_and(|i| i.status_delta.is_empty());
        outcome.check(stopped_still, || {
            "Threshold run stopped on a step that changed statuses".to_string()
        });
        Ok(outcome)
    }
}
