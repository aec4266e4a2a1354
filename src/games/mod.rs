//! Game implementations for the CFR trainer.
//!
//! Each rule set implements [`GameState`](crate::cfr::GameState) and can be
//! handed to [`CfrTrainer`](crate::cfr::CfrTrainer) directly. All of them are
//! small enough for exact exploitability evaluation, which makes them useful
//! for validating the trainer:
//!
//! - [`kuhn`]: Kuhn poker, 2 players ([`kuhn::KuhnState`]) or 2-4 players
//!   ([`kuhn::MultiKuhnState`])
//! - [`leduc`]: Leduc hold'em, 2 players ([`leduc::LeducState`]) or 2-4 players
//!   ([`leduc::MultiLeducState`])
//!
//! ## Adding New Games
//!
//! 1. Create a new module under `src/games/`
//! 2. Define an action enum implementing [`Action`](crate::cfr::Action)
//! 3. Implement [`GameState`](crate::cfr::GameState) for the state type
//! 4. Add tests that walk every deal and check payoffs and key consistency

use itertools::Itertools;

pub mod card;
pub mod kuhn;
pub mod leduc;

pub use card::Card;

/// Action history with tokens separated by `/`, as used in representation keys.
pub(crate) fn history_key(history: &str) -> String {
    history.chars().join("/")
}
