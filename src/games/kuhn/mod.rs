//! Kuhn Poker implementation for CFR validation.
//!
//! Kuhn Poker is a simplified poker game used to validate CFR implementations
//! because it has a known, mathematically proven Nash equilibrium.
//!
//! ## Game Rules
//!
//! - 3 cards: Jack, Queen, King
//! - 2 players, each antes 1 chip
//! - Each player receives 1 card
//! - Player 1 acts first: Check or Bet (1 chip)
//! - Player 2 responds based on P1's action
//! - Higher card wins at showdown
//!
//! `B` means bet, or call when facing a bet. `C` means check, or fold when
//! facing a bet.
//!
//! ## Game Tree
//!
//! ```text
//! P1 (first to act)
//! ├── C
//! │   └── P2
//! │       ├── C → Showdown (pot = 2)
//! │       └── B
//! │           └── P1
//! │               ├── C → P2 wins (pot = 3)
//! │               └── B → Showdown (pot = 4)
//! └── B
//!     └── P2
//!         ├── C → P1 wins (pot = 3)
//!         └── B → Showdown (pot = 4)
//! ```
//!
//! ## Known Nash Equilibrium
//!
//! - **Player 1 with Jack**: Bet with probability α ∈ [0, 1/3]
//! - **Player 1 with Queen**: Always check, call a bet with probability α + 1/3
//! - **Player 1 with King**: Bet with probability 3α
//! - **Player 2 facing Bet with Jack**: Always Fold
//! - **Player 2 facing Bet with Queen**: Call with probability 1/3
//! - **Player 2 facing Bet with King**: Always Call
//!
//! **Expected Value**: Player 1 EV = -1/18 ≈ -0.0556

mod multi;

pub use multi::MultiKuhnState;

use std::fmt;

use crate::cfr::error::CfrError;
use crate::cfr::game::{check_deal, Action, GameState, Player};
use crate::games::card::Card;
use crate::games::history_key;

/// Actions in Kuhn Poker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KuhnAction {
    /// Bet (or call if facing bet)
    Bet,
    /// Check (or fold if facing bet)
    Check,
}

impl KuhnAction {
    /// Both actions, in the order every node offers them.
    pub const ALL: [KuhnAction; 2] = [KuhnAction::Bet, KuhnAction::Check];
}

impl Action for KuhnAction {
    fn token(&self) -> char {
        match self {
            KuhnAction::Bet => 'B',
            KuhnAction::Check => 'C',
        }
    }
}

impl fmt::Display for KuhnAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KuhnAction::Bet => write!(f, "Bet"),
            KuhnAction::Check => write!(f, "Check"),
        }
    }
}

/// Complete game state in 2-player Kuhn Poker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KuhnState {
    /// cards[0] is Player 1's card, cards[1] is Player 2's card
    cards: [Card; 2],
    /// Action history as tokens (e.g. "CB" = check then bet)
    history: String,
    players: Vec<Player>,
}

impl Default for KuhnState {
    fn default() -> Self {
        let deck = Card::top_ranks(3);
        Self {
            cards: [deck[0], deck[1]],
            history: String::new(),
            players: Player::seats(2),
        }
    }
}

impl KuhnState {
    /// Create a root state with the deck dealt in order (J to P1, Q to P2).
    pub fn new() -> Self {
        Self::default()
    }

    /// Private card of `player`.
    pub fn card(&self, player: usize) -> Card {
        self.cards[player]
    }

    /// Action history as tokens.
    pub fn history(&self) -> &str {
        &self.history
    }
}

impl fmt::Display for KuhnState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "P1:{} P2:{} History:{}",
            self.cards[0], self.cards[1], self.history
        )
    }
}

impl GameState for KuhnState {
    type Action = KuhnAction;
    type Card = Card;

    fn deck(&self) -> Vec<Card> {
        Card::top_ranks(3)
    }

    fn deal(&mut self, cards: &[Card]) -> Result<(), CfrError> {
        check_deal(cards, self.deal_size())?;
        self.cards = [cards[0], cards[1]];
        self.history.clear();
        Ok(())
    }

    fn representation(&self) -> String {
        format!(
            "{}-{}",
            self.cards[self.current_player_index()],
            history_key(&self.history)
        )
    }

    fn actions(&self) -> Vec<KuhnAction> {
        if self.is_terminal() {
            return vec![];
        }
        KuhnAction::ALL.to_vec()
    }

    fn apply(&self, action: &KuhnAction) -> Result<Self, CfrError> {
        if self.is_terminal() {
            return Err(self.invalid_action(action));
        }
        let mut next = self.clone();
        next.history.push(action.token());
        Ok(next)
    }

    fn player_count(&self) -> usize {
        2
    }

    fn players(&self) -> &[Player] {
        &self.players
    }

    fn current_player_index(&self) -> usize {
        self.history.len() % 2
    }

    fn is_terminal(&self) -> bool {
        // "CC" - both check, showdown
        // "CBC" - check, bet, fold
        // "CBB" - check, bet, call
        // "BC" - bet, fold
        // "BB" - bet, call
        matches!(self.history.as_str(), "BC" | "BB" | "CC" | "CBB" | "CBC")
    }

    fn payoffs(&self) -> Vec<f64> {
        debug_assert!(self.is_terminal(), "payoffs called on non-terminal state");

        match self.history.as_str() {
            "BC" => vec![1.0, -1.0],
            "CBC" => vec![-1.0, 1.0],
            history => {
                let stake = if history.contains('B') { 2.0 } else { 1.0 };
                if self.cards[0] > self.cards[1] {
                    vec![stake, -stake]
                } else {
                    vec![-stake, stake]
                }
            }
        }
    }
}
