//! Run configuration exposed to the bootstrap layer.

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_INITIAL_WORKER_COUNT: usize = 2;
pub const DEFAULT_GOAL_WORKER_COUNT: usize = 30;
pub const DEFAULT_TIME_SCALE: f64 = 1.0;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Knobs for a single simulation run.
///
/// Missing JSON fields fall back to their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FactoryConfig {
    /// Workers spawned before the first outcome is awaited.
    pub initial_worker_count: usize,
    /// The run stops once the pool reaches this size.
    pub goal_worker_count: usize,
    /// Multiplier applied to every task duration. `0.0` removes wall-clock delay.
    pub time_scale: f64,
    /// Seed for the default random source. `None` uses thread-local entropy.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl Default for FactoryConfig {
    fn default() -> Self {
        Self {
            initial_worker_count: DEFAULT_INITIAL_WORKER_COUNT,
            goal_worker_count: DEFAULT_GOAL_WORKER_COUNT,
            time_scale: DEFAULT_TIME_SCALE,
            seed: None,
        }
    }
}

impl FactoryConfig {
    pub fn with_initial_worker_count(mut self, n: usize) -> Self {
        self.initial_worker_count = n;
        self
    }

    pub fn with_goal_worker_count(mut self, n: usize) -> Self {
        self.goal_worker_count = n;
        self
    }

    pub fn with_time_scale(mut self, scale: f64) -> Self {
        self.time_scale = scale;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        // worker が 0 だと outcome が一つも来ず、dispatcher は永遠に待つ
        if self.initial_worker_count == 0 {
            return Err(ConfigError::Invalid(
                "initial_worker_count must be greater than 0".into(),
            ));
        }
        if self.goal_worker_count < self.initial_worker_count {
            return Err(ConfigError::Invalid(format!(
                "goal_worker_count ({}) must be at least initial_worker_count ({})",
                self.goal_worker_count, self.initial_worker_count
            )));
        }
        if !self.time_scale.is_finite() || self.time_scale < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "time_scale must be a finite, non-negative number (got {})",
                self.time_scale
            )));
        }
        Ok(())
    }

    /// Parse from JSON and validate.
    pub fn from_json_str(input: &str) -> Result<Self, ConfigError> {
        let cfg: FactoryConfig = serde_json::from_str(input)?;
        cfg.validate()?;
        Ok(cfg)
    }
}
