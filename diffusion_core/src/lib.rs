//! Diffusion Core - Discrete-Time Spreading Processes on Graphs
//!
//! This library runs synchronous diffusion simulations over any graph
//! exposed through `diffusion_env::GraphAdapter`:
//! 1. **Engine**: snapshot-then-commit steps, monotone activation, seeded randomness
//! 2. **Rules**: pluggable `ActivationRule` strategies (threshold, independent
//!    cascade, weighted cascade)
//! 3. **Trends**: per-status time series built from iteration results

pub mod engine;
pub mod error;
pub mod params;
pub mod rule;
pub mod rules;
pub mod status;
pub mod trend;

// Re-export key types for convenience
pub use engine::{Deactivation, IterationResult, RunResult, SimulationEngine};
pub use error::{ArithmeticError, ConfigurationError, DiffusionError, TrendError};
pub use params::{ParameterSpec, ResolvedParams, Scope};
pub use rule::{ActivationRule, Convergence, Evaluation, StepView, Transition};
pub use rules::{IndependentCascadeRule, RuleKind, ThresholdRule, WeightedCascadeRule};
pub use status::{check_status_similarity, status_delta, InvariantViolation, StatusCode, StatusMap};
pub use trend::{build_trends, TrendAggregator, TrendRecord, Trends};
