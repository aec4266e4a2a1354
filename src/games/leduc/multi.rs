//! N-player Leduc Hold'em.
//!
//! Every player antes 1 chip. A call matches the largest commitment at the
//! table, a raise tops it by 2 chips before the flop and 4 after it, and at
//! most two raises are allowed per round. Folded seats keep their place in the
//! action history: whenever play would pass to them an implicit `F` token is
//! appended instead.
//!
//! The hand ends when the history holds `2N` tokens, when `N` actions have
//! followed the last raise, or when a single player is left. Everybody who
//! does not win loses their commitment, and the winners split those chips.

use std::fmt;

use crate::cfr::config::ConfigError;
use crate::cfr::error::CfrError;
use crate::cfr::game::{check_deal, Action, GameState, Player};
use crate::games::card::Card;
use crate::games::history_key;
use crate::games::leduc::{paired_deck, HandStrength, LeducAction, Round};

/// Smallest supported table.
pub const MIN_PLAYERS: usize = 2;
/// Largest supported table; the rank ladder has room for 4 players plus one.
pub const MAX_PLAYERS: usize = 4;
/// Raises allowed in each betting round.
pub const MAX_RAISES_PER_ROUND: u32 = 2;

const PRE_FLOP_RAISE: u32 = 2;
const POST_FLOP_RAISE: u32 = 4;

/// Game state of Leduc Hold'em with 2 to 4 players.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultiLeducState {
    num_players: usize,
    /// Private cards by seat, then the community card.
    cards: Vec<Card>,
    history: String,
    round: Round,
    current: usize,
    /// Chips committed by each seat, antes included.
    chips: Vec<u32>,
    /// Raises made in the current round.
    have_raised: u32,
    /// Actions taken since the last raise, the raise itself included.
    have_acted: usize,
    players: Vec<Player>,
}

impl Default for MultiLeducState {
    fn default() -> Self {
        Self::with_players(3)
    }
}

impl MultiLeducState {
    /// Create a root state for `num_players` seats, dealt in deck order.
    ///
    /// # Errors
    /// [`CfrError::Config`] if `num_players` is outside 2..=4.
    pub fn new(num_players: usize) -> Result<Self, CfrError> {
        if !(MIN_PLAYERS..=MAX_PLAYERS).contains(&num_players) {
            return Err(ConfigError::InvalidValue {
                field: "players".to_string(),
                message: format!(
                    "Leduc supports {} to {} players, got {}",
                    MIN_PLAYERS, MAX_PLAYERS, num_players
                ),
            }
            .into());
        }
        Ok(Self::with_players(num_players))
    }

    fn with_players(num_players: usize) -> Self {
        let mut cards = paired_deck(num_players + 1);
        cards.truncate(num_players + 1);
        Self {
            num_players,
            cards,
            history: String::new(),
            round: Round::PreFlop,
            current: 0,
            chips: vec![1; num_players],
            have_raised: 0,
            have_acted: 0,
            players: Player::seats(num_players),
        }
    }

    /// Private card of `player`.
    pub fn card(&self, player: usize) -> Card {
        self.cards[player]
    }

    /// Community card, whether or not it has been revealed yet.
    pub fn community_card(&self) -> Card {
        self.cards[self.num_players]
    }

    /// Chips committed by every seat.
    pub fn chips(&self) -> &[u32] {
        &self.chips
    }

    /// Current betting round.
    pub fn round(&self) -> Round {
        self.round
    }

    /// Action history as tokens, implicit folds included.
    pub fn history(&self) -> &str {
        &self.history
    }

    fn max_chips(&self) -> u32 {
        self.chips.iter().copied().max().unwrap_or(0)
    }

    fn active_players(&self) -> impl Iterator<Item = &Player> {
        self.players.iter().filter(|p| !p.folded)
    }

    /// Whether any other unfolded seat still gets to act this orbit.
    fn has_next_player(&self) -> bool {
        (1..self.num_players).any(|offset| {
            !self.players[(self.current + offset) % self.num_players].folded
        })
    }

    fn strength(&self, seat: usize) -> HandStrength {
        HandStrength::new(self.cards[seat], self.community_card())
    }
}

impl fmt::Display for MultiLeducState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for seat in 0..self.num_players {
            write!(f, "P{}:{}({}) ", seat + 1, self.cards[seat], self.chips[seat])?;
        }
        write!(
            f,
            "Board:{} History:{}",
            self.community_card(),
            self.history
        )
    }
}

impl GameState for MultiLeducState {
    type Action = LeducAction;
    type Card = Card;

    fn deck(&self) -> Vec<Card> {
        paired_deck(self.num_players + 1)
    }

    fn deal(&mut self, cards: &[Card]) -> Result<(), CfrError> {
        check_deal(cards, self.deal_size())?;
        self.cards = cards[..self.deal_size()].to_vec();
        self.history.clear();
        self.round = Round::PreFlop;
        self.current = 0;
        self.chips = vec![1; self.num_players];
        self.have_raised = 0;
        self.have_acted = 0;
        self.players = Player::seats(self.num_players);
        Ok(())
    }

    fn representation(&self) -> String {
        let community = match self.round {
            Round::PreFlop => String::new(),
            Round::PostFlop => self.community_card().to_string(),
        };
        format!(
            "{}/{}-{}",
            self.cards[self.current],
            community,
            history_key(&self.history)
        )
    }

    fn actions(&self) -> Vec<LeducAction> {
        if self.is_terminal() {
            return vec![];
        }

        let mut actions = Vec::with_capacity(3);
        if self.have_raised < MAX_RAISES_PER_ROUND && self.has_next_player() {
            actions.push(LeducAction::Raise);
        }
        actions.push(LeducAction::Check);
        // Nothing to fold to when the seat already matches the largest stake.
        if self.chips[self.current] < self.max_chips() {
            actions.push(LeducAction::Fold);
        }
        actions
    }

    fn apply(&self, action: &LeducAction) -> Result<Self, CfrError> {
        if !self.actions().contains(action) {
            return Err(self.invalid_action(action));
        }

        let mut next = self.clone();
        next.history.push(action.token());
        let seat = next.current;

        match action {
            LeducAction::Check => {
                next.chips[seat] = next.max_chips();
                next.have_acted += 1;
            }
            LeducAction::Raise => {
                let raise = match next.round {
                    Round::PreFlop => PRE_FLOP_RAISE,
                    Round::PostFlop => POST_FLOP_RAISE,
                };
                next.have_acted = 1;
                next.have_raised += 1;
                next.chips[seat] = next.max_chips() + raise;
            }
            LeducAction::Fold => {
                next.players[seat].folded = true;
                next.have_acted += 1;
            }
        }

        next.current = (next.current + 1) % next.num_players;
        while next.players[next.current].folded && next.history.len() < 2 * next.num_players {
            next.history.push(LeducAction::Fold.token());
            next.have_acted += 1;
            next.current = (next.current + 1) % next.num_players;
        }

        if next.history.len() == next.num_players {
            next.round = Round::PostFlop;
            next.have_raised = 0;
        }

        Ok(next)
    }

    fn player_count(&self) -> usize {
        self.num_players
    }

    fn players(&self) -> &[Player] {
        &self.players
    }

    fn current_player_index(&self) -> usize {
        self.current
    }

    fn is_terminal(&self) -> bool {
        self.history.len() >= 2 * self.num_players
            || self.have_acted >= self.num_players
            || self.active_players().count() == 1
    }

    fn payoffs(&self) -> Vec<f64> {
        debug_assert!(self.is_terminal(), "payoffs called on non-terminal state");

        let best = self
            .active_players()
            .map(|p| self.strength(p.index))
            .max();
        let winners: Vec<bool> = self
            .players
            .iter()
            .map(|p| !p.folded && Some(self.strength(p.index)) == best)
            .collect();

        let num_winners = winners.iter().filter(|&&w| w).count();
        let losers_chips: u32 = winners
            .iter()
            .zip(&self.chips)
            .filter(|&(&won, _)| !won)
            .map(|(_, &chips)| chips)
            .sum();
        let share = losers_chips as f64 / num_winners.max(1) as f64;

        winners
            .iter()
            .zip(&self.chips)
            .map(|(&won, &chips)| if won { share } else { -(chips as f64) })
            .collect()
    }
}
