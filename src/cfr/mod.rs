//! Counterfactual Regret Minimization.
//!
//! This module provides a generic vanilla CFR trainer and an exact
//! best-response exploitability evaluator for finite extensive-form games.
//!
//! # Overview
//!
//! CFR is an iterative algorithm that converges to Nash equilibrium by:
//! 1. Computing counterfactual regret for each action at each decision point
//! 2. Updating strategies to minimize regret over time
//! 3. Averaging strategies across iterations to converge to equilibrium
//!
//! Each training iteration samples one deal at the root and then walks the
//! complete tree below it.
//!
//! # Usage
//!
//! 1. Implement the [`GameState`] trait for your game
//! 2. Create a [`CfrTrainer`] with a root state and a [`TrainingConfig`]
//! 3. Call [`CfrTrainer::train`] to run iterations
//! 4. Read strategies from the [`InfoSetTable`] or the [`TrainingReport`]
//!
//! # Example
//!
//! ```
//! use cfr_poker::cfr::{CfrTrainer, TrainingConfig};
//! use cfr_poker::games::leduc::LeducState;
//!
//! let config = TrainingConfig::default()
//!     .with_iterations(500)
//!     .with_eval_step(250)
//!     .with_seed(42);
//! let mut trainer = CfrTrainer::new(LeducState::new(), config);
//! let stats = trainer.train().unwrap();
//! println!("{} info sets, exploitability {:?}", stats.info_sets, stats.exploitability);
//!
//! let strategy = trainer.average_strategy("K/-", 2).unwrap();
//! assert!((strategy.iter().sum::<f64>() - 1.0).abs() < 1e-9);
//! ```
//!
//! # Theory
//!
//! **Regret**: The difference between the value of an action and the value of the current strategy.
//! ```text
//! Regret(a) = Value(a) - Value(current_strategy)
//! ```
//!
//! **Regret Matching**: Set strategy proportional to positive regrets.
//! ```text
//! Strategy(a) = max(0, Regret(a)) / sum(max(0, Regret(a')))
//! ```
//!
//! **Convergence**: Average regret decreases as O(1/sqrt(T)), and the average strategy
//! converges to Nash equilibrium in two-player zero-sum games.
//!
//! # References
//!
//! - Zinkevich, M., et al. "Regret Minimization in Games with Incomplete Information" (2007)
//! - Neller, T., Lanctot, M. "An Introduction to Counterfactual Regret Minimization" (2013)

pub mod config;
pub mod error;
pub mod exploitability;
pub mod game;
pub mod info_set;
pub mod report;
pub mod storage;
pub mod trainer;

// Re-export main types for convenient access
pub use config::{ConfigError, ExploitabilityPoint, TrainingConfig, TrainingStats};
pub use error::CfrError;
pub use exploitability::ExploitabilityEvaluator;
pub use game::{Action, GameState, Player};
pub use info_set::InformationSet;
pub use report::{StrategyEntry, TrainingReport};
pub use storage::{InfoSetTable, Policy};
pub use trainer::{CfrTrainer, TrainingProgress};
