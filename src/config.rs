//! Pipeline configuration.
//!
//! Every knob lives in an explicit config struct passed by reference into
//! the pipeline; nothing is read from ambient global state. Validation runs
//! before any computation begins.

use crate::graph::builder::BuilderConfig;
use crate::graph::weights::WeightConfig;
use crate::metrics::criticality::CriticalityConfig;
use crate::metrics::health::HealthConfig;
use crate::metrics::waste::WasteConfig;
use thiserror::Error;

/// Errors surfaced by configuration validation
#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("{name} weight must be non-negative, got {value}")]
    NegativeWeight { name: &'static str, value: f64 },

    #[error("{group} weights must sum to {expected}, got {actual}")]
    WeightSumMismatch {
        group: &'static str,
        expected: f64,
        actual: f64,
    },

    #[error("recency decay must be positive, got {0} days")]
    InvalidDecay(f64),

    #[error("minimum edge volume must be at least 1, got {0}")]
    InvalidThreshold(u64),
}

/// Aggregate configuration for one pipeline run.
#[derive(Debug, Clone, Default)]
pub struct AnalyticsConfig {
    pub builder: BuilderConfig,
    pub weights: WeightConfig,
    pub criticality: CriticalityConfig,
    pub waste: WasteConfig,
    pub health: HealthConfig,
}

impl AnalyticsConfig {
    /// Validate every component configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.builder.min_messages < 1 {
            return Err(ConfigError::InvalidThreshold(self.builder.min_messages));
        }
        self.weights.validate()?;
        self.criticality.validate()?;
        self.health.validate()?;
        Ok(())
    }
}
