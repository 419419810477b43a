//! Oracle - step-by-step recording of a run and the properties every run
//! must satisfy.

use diffusion_core::{DiffusionError, RunResult, SimulationEngine, StatusCode, StatusMap};
use diffusion_env::{GraphAdapter, NodeId};

/// A run plus the status map before every step and after the last one.
#[derive(Debug, Clone, Default)]
pub struct Trace {
    pub run: RunResult,

    /// `snapshots[i]` is the status before step `i`; the last entry is the
    /// final status
    pub snapshots: Vec<StatusMap>,
}

impl Trace {
    /// Total cascade attempts over the run.
    pub fn total_attempts(&self) -> usize {
        self.run.iterations.iter().map(|i| i.attempts).sum()
    }

    /// Largest number of activations in a single step.
    pub fn max_step_activation(&self) -> usize {
        self.run
            .activated_nodes_per_step
            .iter()
            .map(Vec::len)
            .max()
            .unwrap_or(0)
    }
}

/// Steps `engine` until it stops, recording every intermediate status.
pub fn trace_until_stable<G: GraphAdapter>(
    engine: &mut SimulationEngine<G>,
) -> Result<Trace, DiffusionError> {
    let mut trace = Trace {
        run: RunResult {
            final_active_set_size: engine.active_set_size(),
            ..Default::default()
        },
        snapshots: vec![engine.status().clone()],
    };

    while !engine.is_stopped() {
        let step = engine.iterate()?;
        let activated = step.activated();
        trace.run.activated_nodes_in_order.extend(activated.iter().copied());
        trace.run.activated_nodes_per_step.push(activated);
        trace.run.final_active_set_size = step.active_set_size;
        trace.run.iterations.push(step);
        trace.snapshots.push(engine.status().clone());
    }
    Ok(trace)
}

/// Nodes that were Infected in one snapshot and not in the next.
pub fn monotonicity_violations(trace: &Trace) -> Vec<NodeId> {
    let mut violations = Vec::new();
    for pair in trace.snapshots.windows(2) {
        for (node, status) in &pair[0] {
            if *status == StatusCode::Infected && pair[1].get(node) != Some(&StatusCode::Infected) {
                violations.push(*node);
            }
        }
    }
    violations
}

/// Nodes activated in a step without any Infected influencer at the start
/// of that step (predecessors for directed graphs, neighbors otherwise).
pub fn unsupported_activations<G: GraphAdapter + ?Sized>(graph: &G, trace: &Trace) -> Vec<NodeId> {
    let mut unsupported = Vec::new();
    for (step, activated) in trace.run.activated_nodes_per_step.iter().enumerate() {
        let Some(before) = trace.snapshots.get(step) else {
            continue;
        };
        for node in activated {
            let influencers = if graph.is_directed() {
                graph.predecessors(*node)
            } else {
                graph.neighbors(*node)
            };
            let supported = influencers
                .iter()
                .any(|n| before.get(n) == Some(&StatusCode::Infected));
            if !supported {
                unsupported.push(*node);
            }
        }
    }
    unsupported
}

/// Infected nodes of a status map, ascending.
pub fn infected_nodes(status: &StatusMap) -> Vec<NodeId> {
    status
        .iter()
        .filter(|(_, s)| **s == StatusCode::Infected)
        .map(|(n, _)| *n)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::topology::{path, star};
    use diffusion_core::ThresholdRule;
    use diffusion_env::Configuration;

    #[test]
    fn test_trace_matches_run_until_stable() {
        let build = || {
            let graph = star(6);
            let mut config = Configuration::new();
            config.add_node_set_configuration("threshold", graph.nodes(), 0.4).unwrap();
            config.add_edge_set_configuration("weight", graph.edges(), 0.5).unwrap();
            config.add_model_initial_configuration("Infected", [NodeId(1)]);
            let mut engine = SimulationEngine::new(graph, Box::new(ThresholdRule::new()), 4);
            engine.configure(&mut config).unwrap();
            engine
        };

        let trace = trace_until_stable(&mut build()).unwrap();
        let run = build().run_until_stable().unwrap();

        assert_eq!(trace.run, run);
        assert_eq!(trace.snapshots.len(), run.iterations.len() + 1);
        assert_eq!(trace.max_step_activation(), 4);
        assert!(monotonicity_violations(&trace).is_empty());
    }

    #[test]
    fn test_detects_violations() {
        let graph = path(3);
        let infected = StatusMap::from([
            (NodeId(0), StatusCode::Infected),
            (NodeId(1), StatusCode::Susceptible),
            (NodeId(2), StatusCode::Infected),
        ]);
        let recovered = StatusMap::from([
            (NodeId(0), StatusCode::Susceptible),
            (NodeId(1), StatusCode::Susceptible),
            (NodeId(2), StatusCode::Infected),
        ]);
        let trace = Trace {
            run: RunResult {
                activated_nodes_per_step: vec![vec![NodeId(2)]],
                ..Default::default()
            },
            snapshots: vec![infected.clone(), recovered],
        };

        assert_eq!(monotonicity_violations(&trace), vec![NodeId(0)]);
        // 2's only neighbor (1) was Susceptible before the step
        assert_eq!(unsupported_activations(&graph, &trace), vec![NodeId(2)]);
        assert_eq!(infected_nodes(&infected), vec![NodeId(0), NodeId(2)]);
    }
}
