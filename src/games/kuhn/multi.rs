//! N-player Kuhn poker.
//!
//! Every player antes 1 and receives one card from the top `N + 1` ranks.
//! Seats act in turn, once each, until either everybody has checked or the
//! first bet has been answered by the other `N - 1` seats. A bettor nobody
//! calls collects the antes; otherwise the best card among the players who bet
//! or called takes the pot.

use std::fmt;

use crate::cfr::config::ConfigError;
use crate::cfr::error::CfrError;
use crate::cfr::game::{check_deal, Action, GameState, Player};
use crate::games::card::Card;
use crate::games::history_key;
use crate::games::kuhn::KuhnAction;

/// Smallest supported table.
pub const MIN_PLAYERS: usize = 2;
/// Largest supported table; the rank ladder has room for 4 players plus one.
pub const MAX_PLAYERS: usize = 4;

/// Game state of Kuhn poker with 2 to 4 players.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultiKuhnState {
    num_players: usize,
    /// cards[i] is player i's card; the extra card is never looked at.
    cards: Vec<Card>,
    history: String,
    players: Vec<Player>,
}

impl Default for MultiKuhnState {
    fn default() -> Self {
        Self::with_players(3)
    }
}

impl MultiKuhnState {
    /// Create a root state for `num_players` seats, dealt in deck order.
    ///
    /// # Errors
    /// [`CfrError::Config`] if `num_players` is outside 2..=4.
    pub fn new(num_players: usize) -> Result<Self, CfrError> {
        if !(MIN_PLAYERS..=MAX_PLAYERS).contains(&num_players) {
            return Err(ConfigError::InvalidValue {
                field: "players".to_string(),
                message: format!(
                    "Kuhn supports {} to {} players, got {}",
                    MIN_PLAYERS, MAX_PLAYERS, num_players
                ),
            }
            .into());
        }
        Ok(Self::with_players(num_players))
    }

    fn with_players(num_players: usize) -> Self {
        Self {
            num_players,
            cards: Card::top_ranks(num_players + 1),
            history: String::new(),
            players: Player::seats(num_players),
        }
    }

    /// Private card of `player`.
    pub fn card(&self, player: usize) -> Card {
        self.cards[player]
    }

    /// Action history as tokens.
    pub fn history(&self) -> &str {
        &self.history
    }

    fn showdown_winner(&self, contenders: impl Iterator<Item = usize>) -> Option<usize> {
        contenders.max_by_key(|&seat| self.cards[seat])
    }
}

impl fmt::Display for MultiKuhnState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (seat, card) in self.cards.iter().take(self.num_players).enumerate() {
            write!(f, "P{}:{} ", seat + 1, card)?;
        }
        write!(f, "History:{}", self.history)
    }
}

impl GameState for MultiKuhnState {
    type Action = KuhnAction;
    type Card = Card;

    fn deck(&self) -> Vec<Card> {
        Card::top_ranks(self.num_players + 1)
    }

    fn deal(&mut self, cards: &[Card]) -> Result<(), CfrError> {
        check_deal(cards, self.deal_size())?;
        self.cards = cards[..self.deal_size()].to_vec();
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
        self.num_players
    }

    fn players(&self) -> &[Player] {
        &self.players
    }

    fn current_player_index(&self) -> usize {
        self.history.len() % self.num_players
    }

    fn is_terminal(&self) -> bool {
        match self.history.find('B') {
            Some(first_bet) => self.history.len() - first_bet == self.num_players,
            None => self.history.len() == self.num_players,
        }
    }

    fn payoffs(&self) -> Vec<f64> {
        debug_assert!(self.is_terminal(), "payoffs called on non-terminal state");

        let n = self.num_players;
        let opponents = (n - 1) as f64;
        let mut payoffs = vec![-1.0; n];

        if !self.history.contains('B') {
            if let Some(winner) = self.showdown_winner(0..n) {
                payoffs[winner] = opponents;
            }
            return payoffs;
        }

        let unanswered = "C".repeat(n - 1);
        if self.history.len() >= n && self.history.ends_with(&unanswered) {
            payoffs[self.history.len() % n] = opponents;
            return payoffs;
        }

        let history = self.history.as_bytes();
        let callers: Vec<usize> = (0..n)
            .filter(|&seat| history.iter().skip(seat).step_by(n).any(|&t| t == b'B'))
            .collect();
        for &seat in &callers {
            payoffs[seat] = -2.0;
        }
        if let Some(winner) = self.showdown_winner(callers.iter().copied()) {
            payoffs[winner] = (callers.len() - 1) as f64 + opponents;
        }
        payoffs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::card::{RANK_J, RANK_K, RANK_Q, RANK_T};
    use crate::games::testing::{assert_zero_sum, walk_all_deals};

    fn state(cards: [u8; 3], history: &str) -> MultiKuhnState {
        let mut state = MultiKuhnState::default();
        let mut deal: Vec<Card> = cards.iter().map(|&r| Card::new(r)).collect();
        deal.push(Card::new(RANK_T));
        state.deal(&deal).unwrap();
        for token in history.chars() {
            let action = match token {
                'B' => KuhnAction::Bet,
                _ => KuhnAction::Check,
            };
            state = state.apply(&action).unwrap();
        }
        state
    }

    #[test]
    fn test_player_count_is_validated() {
        assert!(MultiKuhnState::new(1).is_err());
        assert!(MultiKuhnState::new(5).is_err());
        let state = MultiKuhnState::new(4).unwrap();
        assert_eq!(state.player_count(), 4);
        assert_eq!(state.deck().len(), 5);
    }

    #[test]
    fn test_seats_rotate() {
        let state = state([RANK_J, RANK_Q, RANK_K], "C");
        assert_eq!(state.current_player_index(), 1);
        assert_eq!(state.representation(), "Q-C");
        let state = state.apply(&KuhnAction::Check).unwrap();
        assert_eq!(state.representation(), "K-C/C");
    }

    #[test]
    fn test_terminal_histories() {
        assert!(state([RANK_J, RANK_Q, RANK_K], "CCC").is_terminal());
        assert!(!state([RANK_J, RANK_Q, RANK_K], "CB").is_terminal());
        assert!(!state([RANK_J, RANK_Q, RANK_K], "CBC").is_terminal());
        assert!(state([RANK_J, RANK_Q, RANK_K], "CBCC").is_terminal());
        assert!(state([RANK_J, RANK_Q, RANK_K], "BBB").is_terminal());
    }

    #[test]
    fn test_everyone_checks() {
        let payoffs = state([RANK_Q, RANK_K, RANK_J], "CCC").payoffs();
        assert_eq!(payoffs, vec![-1.0, 2.0, -1.0]);
    }

    #[test]
    fn test_bet_nobody_calls() {
        let payoffs = state([RANK_J, RANK_Q, RANK_K], "CBCC").payoffs();
        assert_eq!(payoffs, vec![-1.0, 2.0, -1.0]);
    }

    #[test]
    fn test_callers_share_showdown() {
        // Seat 0 bets, seat 1 folds, seat 2 calls with a worse card.
        let payoffs = state([RANK_Q, RANK_K, RANK_J], "BCB").payoffs();
        assert_eq!(payoffs, vec![3.0, -1.0, -2.0]);

        // Everyone calls: the king takes two bets plus the other ante.
        let payoffs = state([RANK_J, RANK_Q, RANK_K], "BBB").payoffs();
        assert_eq!(payoffs, vec![-2.0, -2.0, 4.0]);
    }

    #[test]
    fn test_two_players_match_kuhn() {
        let mut multi = MultiKuhnState::new(2).unwrap();
        let cards = [Card::new(RANK_K), Card::new(RANK_J), Card::new(RANK_Q)];
        multi.deal(&cards).unwrap();
        for history in ["BC", "BB", "CC", "CBB", "CBC"] {
            let mut state = multi.clone();
            for token in history.chars() {
                let action = if token == 'B' { KuhnAction::Bet } else { KuhnAction::Check };
                state = state.apply(&action).unwrap();
            }
            let mut two = crate::games::kuhn::KuhnState::new();
            two.deal(&cards).unwrap();
            for token in history.chars() {
                let action = if token == 'B' { KuhnAction::Bet } else { KuhnAction::Check };
                two = two.apply(&action).unwrap();
            }
            assert_eq!(state.payoffs(), two.payoffs(), "history {}", history);
        }
    }

    #[test]
    fn test_every_deal_walk() {
        let summary = walk_all_deals(&MultiKuhnState::default());
        assert_eq!(summary.keys.len(), 48);
        assert_zero_sum(&summary.terminal_payoffs);
    }
}
