//! Leduc Hold'em.
//!
//! A two-card-per-rank deck, one private card per player and one community
//! card that is revealed after the first round of betting. Pairing the
//! community card beats any unpaired hand.
//!
//! ## Game Rules (2 players)
//!
//! - 6 cards: J J Q Q K K
//! - Each player antes 1 chip
//! - Raises are 2 chips, at most two per hand
//! - The community card is revealed once two actions have been taken
//!
//! Legal actions by history:
//!
//! ```text
//! ""    → R C
//! "R"   → R C F
//! "C"   → R C
//! "RR"  → C F
//! "CR"  → R C F
//! "CRR" → C F
//! ```

mod multi;

pub use multi::MultiLeducState;

use std::cmp::Ordering;
use std::fmt;

use crate::cfr::error::CfrError;
use crate::cfr::game::{check_deal, Action, GameState, Player};
use crate::games::card::Card;
use crate::games::history_key;

/// Actions in Leduc Hold'em.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LeducAction {
    /// Raise (bet, or re-raise when facing a raise)
    Raise,
    /// Check (or call if facing a raise)
    Check,
    /// Fold
    Fold,
}

impl Action for LeducAction {
    fn token(&self) -> char {
        match self {
            LeducAction::Raise => 'R',
            LeducAction::Check => 'C',
            LeducAction::Fold => 'F',
        }
    }
}

impl fmt::Display for LeducAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LeducAction::Raise => write!(f, "Raise"),
            LeducAction::Check => write!(f, "Check"),
            LeducAction::Fold => write!(f, "Fold"),
        }
    }
}

/// Betting round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Round {
    /// Before the community card is revealed.
    PreFlop,
    /// After the community card is revealed.
    PostFlop,
}

/// Showdown strength of a private card combined with the community card.
///
/// Ordered so that a greater value wins: any pair beats any non-pair, a
/// higher pair beats a lower one, and unpaired hands compare their high card
/// first and then their low card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct HandStrength {
    paired: bool,
    high: Card,
    low: Card,
}

impl HandStrength {
    /// Evaluate `private` against the community card.
    pub fn new(private: Card, community: Card) -> Self {
        Self {
            paired: private == community,
            high: private.max(community),
            low: private.min(community),
        }
    }

    /// Whether the private card pairs the board.
    pub fn is_pair(&self) -> bool {
        self.paired
    }
}

/// Deck holding two cards of each of the top `ranks` ranks.
pub(crate) fn paired_deck(ranks: usize) -> Vec<Card> {
    Card::top_ranks(ranks)
        .into_iter()
        .flat_map(|card| [card, card])
        .collect()
}

/// Complete game state in 2-player Leduc Hold'em.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeducState {
    /// Private cards of P1 and P2, then the community card.
    cards: [Card; 3],
    history: String,
    round: Round,
    players: Vec<Player>,
}

impl Default for LeducState {
    fn default() -> Self {
        let deck = paired_deck(3);
        Self {
            cards: [deck[0], deck[1], deck[2]],
            history: String::new(),
            round: Round::PreFlop,
            players: Player::seats(2),
        }
    }
}

impl LeducState {
    /// Create a root state with the deck dealt in order (J, J, then Q on board).
    pub fn new() -> Self {
        Self::default()
    }

    /// Private card of `player`.
    pub fn card(&self, player: usize) -> Card {
        self.cards[player]
    }

    /// Community card, whether or not it has been revealed yet.
    pub fn community_card(&self) -> Card {
        self.cards[2]
    }

    /// Current betting round.
    pub fn round(&self) -> Round {
        self.round
    }

    /// Action history as tokens.
    pub fn history(&self) -> &str {
        &self.history
    }

    /// Showdown result from P1's point of view: 1, -1, or 0 on a tie.
    fn showdown(&self) -> f64 {
        let community = self.community_card();
        let first = HandStrength::new(self.cards[0], community);
        let second = HandStrength::new(self.cards[1], community);
        match first.cmp(&second) {
            Ordering::Greater => 1.0,
            Ordering::Less => -1.0,
            Ordering::Equal => 0.0,
        }
    }
}

impl fmt::Display for LeducState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "P1:{} P2:{} Board:{} History:{}",
            self.cards[0], self.cards[1], self.cards[2], self.history
        )
    }
}

impl GameState for LeducState {
    type Action = LeducAction;
    type Card = Card;

    fn deck(&self) -> Vec<Card> {
        paired_deck(3)
    }

    fn deal(&mut self, cards: &[Card]) -> Result<(), CfrError> {
        check_deal(cards, self.deal_size())?;
        self.cards = [cards[0], cards[1], cards[2]];
        self.history.clear();
        self.round = Round::PreFlop;
        Ok(())
    }

    fn representation(&self) -> String {
        let community = match self.round {
            Round::PreFlop => String::new(),
            Round::PostFlop => self.community_card().to_string(),
        };
        format!(
            "{}/{}-{}",
            self.cards[self.current_player_index()],
            community,
            history_key(&self.history)
        )
    }

    fn actions(&self) -> Vec<LeducAction> {
        use LeducAction::*;
        match self.history.as_str() {
            "" | "C" => vec![Raise, Check],
            "R" | "CR" => vec![Raise, Check, Fold],
            "RR" | "CRR" => vec![Check, Fold],
            _ => vec![],
        }
    }

    fn apply(&self, action: &LeducAction) -> Result<Self, CfrError> {
        if !self.actions().contains(action) {
            return Err(self.invalid_action(action));
        }
        let mut next = self.clone();
        next.history.push(action.token());
        if next.history.len() >= 2 {
            next.round = Round::PostFlop;
        }
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
        matches!(
            self.history.as_str(),
            "RF" | "RC" | "CC" | "RRF" | "RRC" | "CRF" | "CRC" | "CRRF" | "CRRC"
        )
    }

    fn payoffs(&self) -> Vec<f64> {
        debug_assert!(self.is_terminal(), "payoffs called on non-terminal state");

        let first = match self.history.as_str() {
            "RF" => 1.0,
            "RRF" => -3.0,
            "CRF" => -1.0,
            "CRRF" => 3.0,
            "CC" => self.showdown(),
            "RC" | "CRC" => self.showdown() * 3.0,
            "RRC" => self.showdown() * 5.0,
            "CRRC" => self.showdown() * 7.0,
            _ => 0.0,
        };
        vec![first, -first]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::card::{RANK_J, RANK_K, RANK_Q, RANK_T};
    use crate::games::testing::{assert_zero_sum, walk_all_deals};

    fn action(token: char) -> LeducAction {
        match token {
            'R' => LeducAction::Raise,
            'C' => LeducAction::Check,
            _ => LeducAction::Fold,
        }
    }

    fn state(cards: [u8; 3], history: &str) -> LeducState {
        let mut state = LeducState::new();
        let deal: Vec<Card> = cards.iter().map(|&r| Card::new(r)).collect();
        state.deal(&deal).unwrap();
        for token in history.chars() {
            state = state.apply(&action(token)).unwrap();
        }
        state
    }

    #[test]
    fn test_hand_strength_ordering() {
        let (j, q, k) = (Card::new(RANK_J), Card::new(RANK_Q), Card::new(RANK_K));
        assert!(HandStrength::new(j, j) > HandStrength::new(k, q));
        assert!(HandStrength::new(k, k) > HandStrength::new(q, q));
        assert!(HandStrength::new(k, q) > HandStrength::new(k, j));
        assert!(HandStrength::new(k, j) > HandStrength::new(q, j));
        assert_eq!(HandStrength::new(q, k), HandStrength::new(k, q));
        assert!(HandStrength::new(q, q).is_pair());
        let t = Card::new(RANK_T);
        assert!(HandStrength::new(j, t) < HandStrength::new(q, t));
    }

    #[test]
    fn test_legal_actions_by_history() {
        let cards = [RANK_J, RANK_Q, RANK_K];
        let tokens = |history: &str| -> String {
            state(cards, history).actions().iter().map(|a| a.token()).collect()
        };
        assert_eq!(tokens(""), "RC");
        assert_eq!(tokens("R"), "RCF");
        assert_eq!(tokens("C"), "RC");
        assert_eq!(tokens("RR"), "CF");
        assert_eq!(tokens("CR"), "RCF");
        assert_eq!(tokens("CRR"), "CF");
        assert_eq!(tokens("CRRC"), "");
    }

    #[test]
    fn test_community_card_revealed_after_two_actions() {
        let state = state([RANK_K, RANK_J, RANK_Q], "C");
        assert_eq!(state.round(), Round::PreFlop);
        assert_eq!(state.representation(), "J/-C");

        let state = state.apply(&LeducAction::Raise).unwrap();
        assert_eq!(state.round(), Round::PostFlop);
        assert_eq!(state.representation(), "K/Q-C/R");
    }

    #[test]
    fn test_fold_payoffs() {
        let cards = [RANK_J, RANK_K, RANK_Q];
        assert_eq!(state(cards, "RF").payoffs(), vec![1.0, -1.0]);
        assert_eq!(state(cards, "RRF").payoffs(), vec![-3.0, 3.0]);
        assert_eq!(state(cards, "CRF").payoffs(), vec![-1.0, 1.0]);
        assert_eq!(state(cards, "CRRF").payoffs(), vec![3.0, -3.0]);
    }

    #[test]
    fn test_showdown_payoffs() {
        // P1 pairs the board.
        let cards = [RANK_Q, RANK_K, RANK_Q];
        assert_eq!(state(cards, "CC").payoffs(), vec![1.0, -1.0]);
        assert_eq!(state(cards, "RC").payoffs(), vec![3.0, -3.0]);
        assert_eq!(state(cards, "RRC").payoffs(), vec![5.0, -5.0]);
        assert_eq!(state(cards, "CRC").payoffs(), vec![3.0, -3.0]);
        assert_eq!(state(cards, "CRRC").payoffs(), vec![7.0, -7.0]);

        // Same private rank splits.
        assert_eq!(state([RANK_J, RANK_J, RANK_K], "RRC").payoffs(), vec![0.0, 0.0]);
    }

    #[test]
    fn test_illegal_action_is_rejected() {
        let root = LeducState::new();
        assert_eq!(
            root.apply(&LeducAction::Fold),
            Err(CfrError::InvalidAction {
                action: 'F',
                key: "J/-".to_string(),
            })
        );
    }

    #[test]
    fn test_every_deal_walk() {
        let summary = walk_all_deals(&LeducState::new());
        assert_eq!(summary.keys.len(), 36);
        assert!(summary.keys.contains("K/Q-C/R"));
        assert_zero_sum(&summary.terminal_payoffs);
    }
}
