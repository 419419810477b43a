//! Harness error type.

use crate::topology::TopologyError;
use diffusion_core::{DiffusionError, TrendError};
use diffusion_env::EnvError;
use thiserror::Error;

/// Anything that can abort a scenario before its checks run.
#[derive(Debug, Error)]
pub enum SimError {
    #[error("Diffusion error: {0}")]
    Diffusion(#[from] DiffusionError),

    #[error("Topology error: {0}")]
    Topology(#[from] TopologyError),

    #[error("Environment error: {0}")]
    Env(#[from] EnvError),

    #[error("Trend error: {0}")]
    Trend(#[from] TrendError),
}
