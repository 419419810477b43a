//! Scenario definitions for the diffusion harness.

use serde::Serialize;

/// Identifies a scenario run by [`crate::ScenarioRunner`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScenarioId {
    /// Deterministic threshold spread around a ring
    ThresholdRing,

    /// Certain independent cascade along a path
    CascadePath,

    /// Weighted cascade on a random graph, then random deactivation
    WeightedCascade,

    /// Two identical cascade runs must agree step by step
    Determinism,

    /// Per-candidate spread gain with unwinding between candidates
    MarginalGain,

    /// Threshold spread on a random directed graph
    DirectedThreshold,
}

impl ScenarioId {
    /// Returns all scenarios.
    pub fn all() -> Vec<ScenarioId> {
        vec![
            ScenarioId::ThresholdRing,
            ScenarioId::CascadePath,
            ScenarioId::WeightedCascade,
            ScenarioId::Determinism,
            ScenarioId::MarginalGain,
            ScenarioId::DirectedThreshold,
        ]
    }

    /// Returns the scenario name.
    pub fn name(&self) -> &'static str {
        match self {
            ScenarioId::ThresholdRing => "threshold_ring",
            ScenarioId::CascadePath => "cascade_path",
            ScenarioId::WeightedCascade => "weighted_cascade",
            ScenarioId::Determinism => "determinism",
            ScenarioId::MarginalGain => "marginal_gain",
            ScenarioId::DirectedThreshold => "directed_threshold",
        }
    }

    /// Returns a description of the scenario.
    pub fn description(&self) -> &'static str {
        match self {
            ScenarioId::ThresholdRing => "Ring, weights 0.6, thresholds 0.5, seed {0}: two-front spread to every node",
            ScenarioId::CascadePath => "Path, edge probability 1.0, seed {0}: one new node per step, one attempt per node",
            ScenarioId::WeightedCascade => "G(n, p) with 1/degree probabilities, attempt-once law, random deactivation",
            ScenarioId::Determinism => "Same graph, configuration and seed give identical activation sequences",
            ScenarioId::MarginalGain => "Threshold spread gains per candidate, unwinding back to the baseline",
            ScenarioId::DirectedThreshold => "Directed G(n, p): activations only through infected predecessors",
        }
    }
}

impl std::fmt::Display for ScenarioId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl std::str::FromStr for ScenarioId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "threshold_ring" | "thresholdring" | "ring" => Ok(ScenarioId::ThresholdRing),
            "cascade_path" | "cascadepath" | "path" => Ok(ScenarioId::CascadePath),
            "weighted_cascade" | "weightedcascade" | "wc" => Ok(ScenarioId::WeightedCascade),
            "determinism" => Ok(ScenarioId::Determinism),
            "marginal_gain" | "marginalgain" | "mg" => Ok(ScenarioId::MarginalGain),
            "directed_threshold" | "directedthreshold" => Ok(ScenarioId::DirectedThreshold),
            _ => Err(format!("Unknown scenario: {}", s)),
        }
    }
}
