//! # CFR Poker
//!
//! Vanilla Counterfactual Regret Minimization (CFR) for small poker games,
//! with exact best-response exploitability.
//!
//! ## Features
//!
//! - **Generic CFR Trainer**: Works with any game implementing the `GameState` trait
//! - **Exact Exploitability**: Best response over every deal, no sampling
//! - **Four Rule Sets**: Kuhn and Leduc poker, for two players or up to four
//! - **Reports**: Exploitability series and strategy dump as JSON
//!
//! ## Quick Start
//!
//! ```
//! use cfr_poker::{CfrTrainer, TrainingConfig};
//! use cfr_poker::games::kuhn::KuhnState;
//!
//! let config = TrainingConfig::default().with_iterations(2_000).with_seed(42);
//! let mut trainer = CfrTrainer::new(KuhnState::new(), config);
//! trainer.train().unwrap();
//!
//! for (key, strategy) in trainer.table().sorted_summary() {
//!     println!("{:>8} {:?}", key, strategy);
//! }
//! ```
//!
//! ## Modules
//!
//! - [`cfr`]: Core CFR algorithm, information sets and exploitability
//! - [`games`]: Kuhn and Leduc poker implementations
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐   deal, apply   ┌──────────────┐   average    ┌────────────────┐
//! │  GameState   │ ──────────────▶ │  CfrTrainer  │ ───────────▶ │ Exploitability │
//! │ Kuhn / Leduc │                 │ InfoSetTable │   strategy   │   Evaluator    │
//! └──────────────┘                 └──────────────┘              └────────────────┘
//! ```

#![warn(missing_docs)]

/// CFR (Counterfactual Regret Minimization) trainer module.
///
/// This is the core module containing the generic CFR algorithm.
pub mod cfr;

/// Game implementations module.
///
/// Contains Kuhn and Leduc poker, for two or more players.
pub mod games;

// Re-export commonly used types at crate root for convenience
pub use cfr::{Action, CfrError, CfrTrainer, GameState, TrainingConfig, TrainingStats};
