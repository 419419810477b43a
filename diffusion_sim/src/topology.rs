//! Graph builders and random parameter assignment for scenarios.

use diffusion_env::{AdjacencyGraph, Configuration, EnvError, GraphAdapter};
use rand::Rng;
use rand_distr::{Bernoulli, Distribution, Uniform};
use thiserror::Error;

/// Errors raised while building a scenario topology.
#[derive(Debug, Error, PartialEq)]
pub enum TopologyError {
    #[error("Edge probability {0} is outside [0, 1]")]
    InvalidProbability(f64),

    #[error("Invalid value range [{low}, {high}]")]
    InvalidRange { low: f64, high: f64 },

    #[error("Environment error: {0}")]
    Env(#[from] EnvError),
}

/// Cycle `0-1-...-(n-1)-0`.
pub fn ring(n: u64) -> AdjacencyGraph {
    let mut graph = AdjacencyGraph::undirected();
    for i in 0..n {
        graph.add_node(i);
    }
    if n > 1 {
        for i in 0..n {
            graph.add_edge(i, (i + 1) % n);
        }
    }
    graph
}

/// Path `0-1-...-(n-1)`.
pub fn path(n: u64) -> AdjacencyGraph {
    let mut graph = AdjacencyGraph::undirected();
    for i in 0..n {
        graph.add_node(i);
    }
    for i in 1..n {
        graph.add_edge(i - 1, i);
    }
    graph
}

/// Hub 0 connected to leaves `1..n`.
pub fn star(n: u64) -> AdjacencyGraph {
    let mut graph = AdjacencyGraph::undirected();
    for i in 0..n {
        graph.add_node(i);
    }
    for leaf in 1..n {
        graph.add_edge(0u64, leaf);
    }
    graph
}

/// G(n, p) random graph.
///
/// Candidate pairs are visited in ascending `(from, to)` order so the same
/// stream always yields the same graph. Undirected graphs consider each
/// unordered pair once; directed graphs consider both orientations.
pub fn erdos_renyi<R: Rng + ?Sized>(
    n: u64,
    p: f64,
    directed: bool,
    rng: &mut R,
) -> Result<AdjacencyGraph, TopologyError> {
    let coin = Bernoulli::new(p).map_err(|_| TopologyError::InvalidProbability(p))?;

    let mut graph = if directed {
        AdjacencyGraph::directed()
    } else {
        AdjacencyGraph::undirected()
    };
    for i in 0..n {
        graph.add_node(i);
    }

    for from in 0..n {
        let start = if directed { 0 } else { from + 1 };
        for to in start..n {
            if from == to {
                continue;
            }
            if coin.sample(rng) {
                graph.add_edge(from, to);
            }
        }
    }
    Ok(graph)
}

/// Assigns every edge of `graph` an independent value drawn from
/// `[low, high]` under parameter `name`.
pub fn uniform_edge_values<G, R>(
    graph: &G,
    name: &str,
    low: f64,
    high: f64,
    rng: &mut R,
    config: &mut Configuration,
) -> Result<(), TopologyError>
where
    G: GraphAdapter + ?Sized,
    R: Rng + ?Sized,
{
    if !(low.is_finite() && high.is_finite() && low <= high) {
        return Err(TopologyError::InvalidRange { low, high });
    }
    let values = Uniform::new_inclusive(low, high);
    for edge in graph.edges() {
        config.add_edge_configuration(name, edge, values.sample(rng))?;
    }
    Ok(())
}

/// Assigns every node of `graph` an independent value drawn from
/// `[low, high]` under parameter `name`.
pub fn uniform_node_values<G, R>(
    graph: &G,
    name: &str,
    low: f64,
    high: f64,
    rng: &mut R,
    config: &mut Configuration,
) -> Result<(), TopologyError>
where
    G: GraphAdapter + ?Sized,
    R: Rng + ?Sized,
{
    if !(low.is_finite() && high.is_finite() && low <= high) {
        return Err(TopologyError::InvalidRange { low, high });
    }
    let values = Uniform::new_inclusive(low, high);
    for node in graph.nodes() {
        config.add_node_configuration(name, node, values.sample(rng))?;
    }
    Ok(())
}
