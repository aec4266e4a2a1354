//! End-of-run report: exploitability series and average-strategy dump.
//!
//! The report is plain data. The `train` binary logs it and writes it to disk
//! as pretty-printed JSON; it is never read back into a trainer.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::cfr::config::ExploitabilityPoint;
use crate::cfr::game::GameState;
use crate::cfr::trainer::CfrTrainer;

/// Average strategy of a single information set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyEntry {
    /// Info state key
    pub info_key: String,
    /// Average strategy, index-aligned with the node's legal actions
    pub strategy: Vec<f64>,
}

/// Run metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportMetadata {
    /// Number of seats
    pub players: usize,
    /// Training iterations, warm start excluded
    pub iterations: u64,
    /// Number of info sets discovered
    pub num_info_sets: usize,
    /// Seed of the root deal sampling, if fixed
    pub seed: Option<u64>,
    /// Wall-clock training time
    pub elapsed_seconds: f64,
}

/// Complete training output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingReport {
    /// Run metadata
    pub metadata: ReportMetadata,
    /// Average root payoff per player
    pub average_utilities: Vec<f64>,
    /// Exploitability of the final average strategy
    pub final_exploitability: Option<f64>,
    /// Exploitability measured every `eval_step` iterations
    pub exploitability_history: Vec<ExploitabilityPoint>,
    /// Strategies sorted by key length, then key
    pub strategies: Vec<StrategyEntry>,
}

impl TrainingReport {
    /// Create a report from a trainer.
    pub fn from_trainer<G: GameState>(trainer: &CfrTrainer<G>) -> Self {
        let stats = trainer.stats();
        let strategies = trainer
            .table()
            .sorted_summary()
            .into_iter()
            .map(|(info_key, strategy)| StrategyEntry { info_key, strategy })
            .collect();

        Self {
            metadata: ReportMetadata {
                players: trainer.game().player_count(),
                iterations: stats.iterations,
                num_info_sets: trainer.num_info_sets(),
                seed: trainer.config().seed,
                elapsed_seconds: stats.elapsed_seconds,
            },
            average_utilities: trainer.average_utilities(),
            final_exploitability: stats.exploitability,
            exploitability_history: stats.exploitability_history.clone(),
            strategies,
        }
    }

    /// Save to JSON file.
    pub fn save_json<P: AsRef<Path>>(&self, path: P) -> std::io::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        let mut file = File::create(path)?;
        file.write_all(json.as_bytes())
    }

    /// Get strategy for a specific info state.
    pub fn get_strategy(&self, key: &str) -> Option<&StrategyEntry> {
        self.strategies.iter().find(|entry| entry.info_key == key)
    }
}
