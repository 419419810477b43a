//! Diffusion Deterministic Scenario Harness
//!
//! Runs the diffusion engine over generated topologies and checks every run
//! against the properties it must satisfy (monotone activation, attempt-once,
//! determinism, marginal-gain consistency).
//!
//! # Seeds
//!
//! All entropy is derived from a single 64-bit seed through [`SimContext`]:
//!
//! ```text
//!   master seed ─┬─► engine stream     (seed-set sampling, cascade draws)
//!                ├─► topology stream   (G(n, p) edges)
//!                └─► rng_for(k)        (random parameter tables)
//! ```
//!
//! # Usage
//!
//! ```ignore
//! use diffusion_sim::{ScenarioRunner, scenarios::ScenarioId};
//!
//! let runner = ScenarioRunner::new(42, 100).with_edge_probability(0.05);
//! let result = runner.run(ScenarioId::MarginalGain);
//! assert!(result.passed);
//! ```

mod context;
mod error;
pub mod oracle;
mod runner;
pub mod scenarios;
pub mod topology;

pub use context::SimContext;
pub use error::SimError;
pub use runner::{ScenarioMetrics, ScenarioResult, ScenarioRunner};
pub use topology::TopologyError;
