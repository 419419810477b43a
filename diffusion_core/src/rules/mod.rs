//! Activation rule variants.

mod cascade;
mod threshold;

pub use cascade::{IndependentCascadeRule, WeightedCascadeRule, EDGE_THRESHOLD, NODE_ATTEMPT};
pub use threshold::{ThresholdRule, EDGE_WEIGHT, NODE_THRESHOLD};

use crate::rule::ActivationRule;

/// Rule identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuleKind {
    /// Deterministic weight accumulation
    Threshold,

    /// One randomized attempt per edge, configured probability
    IndependentCascade,

    /// One randomized attempt per edge, probability `1/degree`
    WeightedCascade,
}

impl RuleKind {
    /// Returns every rule kind.
    pub fn all() -> Vec<RuleKind> {
        vec![
            RuleKind::Threshold,
            RuleKind::IndependentCascade,
            RuleKind::WeightedCascade,
        ]
    }

    /// Returns the rule's short name.
    pub fn name(&self) -> &'static str {
        match self {
            RuleKind::Threshold => "threshold",
            RuleKind::IndependentCascade => "independent_cascade",
            RuleKind::WeightedCascade => "weighted_cascade",
        }
    }

    /// Builds the rule as a strategy object.
    pub fn build(&self) -> Box<dyn ActivationRule> {
        match self {
            RuleKind::Threshold => Box::new(ThresholdRule::new()),
            RuleKind::IndependentCascade => Box::new(IndependentCascadeRule::new()),
            RuleKind::WeightedCascade => Box::new(WeightedCascadeRule::new()),
        }
    }

    /// Returns true if runs of this rule consume the random stream.
    pub fn is_randomized(&self) -> bool {
        !matches!(self, RuleKind::Threshold)
    }
}

impl std::fmt::Display for RuleKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl std::str::FromStr for RuleKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "threshold" | "lt" => Ok(RuleKind::Threshold),
            "independent_cascade" | "independentcascade" | "ic" => Ok(RuleKind::IndependentCascade),
            "weighted_cascade" | "weightedcascade" | "wc" => Ok(RuleKind::WeightedCascade),
            _ => Err(format!("Unknown rule: {}", s)),
        }
    }
}
