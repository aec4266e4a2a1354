//! Configuration options for a training run.
//!
//! This module provides the configuration struct that controls the training
//! loop (iteration count, evaluation cadence, seeding) and the statistics
//! collected while it runs.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration for a CFR training run.
///
/// # Example
/// ```
/// use cfr_poker::cfr::TrainingConfig;
///
/// let config = TrainingConfig::default().with_iterations(1_000).with_seed(42);
/// assert_eq!(config.eval_step, 2_000);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainingConfig {
    /// Total number of training iterations (one sampled deal each).
    pub iterations: u64,

    /// Compute and record exploitability every `eval_step` iterations.
    ///
    /// The measurement is read-only: it never feeds back into training.
    pub eval_step: u64,

    /// Random seed for the chance sampling at the root.
    ///
    /// If `None`, the trainer seeds from entropy and runs are not reproducible.
    pub seed: Option<u64>,

    /// Iterations run before the real training starts.
    ///
    /// Regrets learned during warm start are kept, strategy sums and utility
    /// totals are discarded. Zero disables the phase.
    pub warm_start_iterations: u64,

    /// Probability below which an average-strategy entry is zeroed when the
    /// evaluator builds the simplified CFR policy.
    pub strategy_threshold: f64,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            iterations: 100_000,
            eval_step: 2_000,
            seed: None,
            warm_start_iterations: 0,
            strategy_threshold: 0.01,
        }
    }
}

impl TrainingConfig {
    /// Create a new TrainingConfig with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method: set the number of training iterations.
    pub fn with_iterations(mut self, iterations: u64) -> Self {
        self.iterations = iterations;
        self
    }

    /// Builder method: set the exploitability cadence.
    pub fn with_eval_step(mut self, eval_step: u64) -> Self {
        self.eval_step = eval_step;
        self
    }

    /// Builder method: set random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Builder method: set the number of discarded warm-start iterations.
    pub fn with_warm_start(mut self, iterations: u64) -> Self {
        self.warm_start_iterations = iterations;
        self
    }

    /// Builder method: set the average-strategy threshold used for evaluation.
    pub fn with_strategy_threshold(mut self, threshold: f64) -> Self {
        self.strategy_threshold = threshold;
        self
    }

    /// Load a configuration from a JSON file.
    ///
    /// Missing fields take their default values.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content =
            fs::read_to_string(path.as_ref()).map_err(|e| ConfigError::Io(e.to_string()))?;
        Self::from_json_str(&content)
    }

    /// Parse a configuration from a JSON string.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration and return any errors.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.eval_step == 0 {
            return Err(ConfigError::InvalidValue {
                field: "eval_step".to_string(),
                message: "must be at least 1".to_string(),
            });
        }

        if !(0.0..1.0).contains(&self.strategy_threshold) {
            return Err(ConfigError::InvalidValue {
                field: "strategy_threshold".to_string(),
                message: format!("{} is out of range [0, 1)", self.strategy_threshold),
            });
        }

        Ok(())
    }
}

/// Errors that can occur when loading or validating a configuration.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read config: {0}")]
    Io(String),
    /// The configuration file is not valid JSON for [`TrainingConfig`].
    #[error("failed to parse config: {0}")]
    Parse(String),
    /// A field holds a value outside its allowed range.
    #[error("invalid value for {field}: {message}")]
    InvalidValue {
        /// Name of the offending field.
        field: String,
        /// What is wrong with it.
        message: String,
    },
}

/// Statistics tracked during training.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TrainingStats {
    /// Training iterations completed, warm start excluded.
    pub iterations: u64,

    /// Number of information sets in the training table.
    pub info_sets: usize,

    /// Total time spent training (in seconds).
    pub elapsed_seconds: f64,

    /// Iterations per second.
    pub iterations_per_second: f64,

    /// Average root payoff per player over the training iterations.
    pub average_utilities: Vec<f64>,

    /// Most recent exploitability measurement.
    pub exploitability: Option<f64>,

    /// History of exploitability measurements.
    pub exploitability_history: Vec<ExploitabilityPoint>,
}

/// A single exploitability measurement at a specific iteration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExploitabilityPoint {
    /// Iteration number when this measurement was taken.
    pub iteration: u64,
    /// Exploitability value (chips per deal, summed over players).
    pub exploitability: f64,
}

impl TrainingStats {
    /// Create new empty stats.
    pub fn new() -> Self {
        Self::default()
    }

    /// Update iterations per second based on elapsed time.
    pub fn update_rate(&mut self) {
        if self.elapsed_seconds > 0.0 {
            self.iterations_per_second = self.iterations as f64 / self.elapsed_seconds;
        }
    }

    /// Record an exploitability measurement.
    pub fn record_exploitability(&mut self, iteration: u64, exploitability: f64) {
        self.exploitability = Some(exploitability);
        self.exploitability_history.push(ExploitabilityPoint {
            iteration,
            exploitability,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = TrainingConfig::default();
        assert_eq!(config.iterations, 100_000);
        assert_eq!(config.eval_step, 2_000);
        assert!(config.seed.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_eval_step_rejected() {
        let config = TrainingConfig::default().with_eval_step(0);
        match config.validate() {
            Err(ConfigError::InvalidValue { field, .. }) => assert_eq!(field, "eval_step"),
            other => panic!("expected eval_step error, got {:?}", other),
        }
    }

    #[test]
    fn test_threshold_out_of_range_rejected() {
        assert!(TrainingConfig::default()
            .with_strategy_threshold(1.0)
            .validate()
            .is_err());
        assert!(TrainingConfig::default()
            .with_strategy_threshold(-0.1)
            .validate()
            .is_err());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = TrainingConfig::from_json_str(r#"{"iterations": 500, "seed": 7}"#).unwrap();
        assert_eq!(config.iterations, 500);
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.eval_step, 2_000);
        assert_eq!(config.strategy_threshold, 0.01);
    }

    #[test]
    fn test_invalid_json_reports_parse_error() {
        let err = TrainingConfig::from_json_str("{ not json").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_missing_file_reports_io_error() {
        let err = TrainingConfig::from_json_file("/nonexistent/config.json").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn test_record_exploitability() {
        let mut stats = TrainingStats::new();
        stats.record_exploitability(2_000, 0.25);
        stats.record_exploitability(4_000, 0.125);
        assert_eq!(stats.exploitability, Some(0.125));
        assert_eq!(stats.exploitability_history.len(), 2);
        assert_eq!(stats.exploitability_history[0].iteration, 2_000);
    }
}
