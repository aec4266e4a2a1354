//! Game-state contract for the CFR trainer and the exploitability evaluator.
//!
//! Any game whose states implement [`GameState`] can be trained and evaluated.
//! A state is an immutable value: [`GameState::apply`] returns a new state and
//! never touches the receiver, so sibling branches of the recursion can not
//! observe each other.

use std::fmt::Debug;
use std::hash::Hash;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::cfr::error::CfrError;

/// Trait for actions that can be taken in a game.
///
/// Every action has a one-character token. Histories and representation keys
/// are spelled with these tokens, so two actions of one game must never share
/// a token.
pub trait Action: Copy + Eq + Hash + Debug + Send + Sync {
    /// Token used in histories and representation keys.
    fn token(&self) -> char;
}

/// A seat at the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Player {
    /// Seat index (0-indexed, also the index into payoff vectors).
    pub index: usize,
    /// Whether the player has folded out of the hand.
    pub folded: bool,
}

impl Player {
    /// Create an active player at the given seat.
    pub fn new(index: usize) -> Self {
        Self {
            index,
            folded: false,
        }
    }

    /// Create `count` active players seated 0..count.
    pub fn seats(count: usize) -> Vec<Self> {
        (0..count).map(Self::new).collect()
    }
}

/// A node of the game tree, including the hidden deal.
///
/// # Representation keys
///
/// [`GameState::representation`] is the only identity the trainer uses to
/// merge nodes into one information set. It must encode exactly what the
/// acting player observes (private card, public history, revealed board) and
/// be identical for every node the player can not tell apart. The action list
/// behind one key must be the same, in the same order, on every visit.
///
/// # Example
/// ```ignore
/// impl GameState for MyState {
///     type Action = MyAction;
///     type Card = MyCard;
///
///     // ... implement required methods
/// }
/// ```
pub trait GameState: Clone + Debug + Send + Sync {
    /// The type representing an action a player can take.
    type Action: Action;

    /// The type of a single card of the deck.
    type Card: Copy + Debug + Send + Sync;

    /// The full deck of the game, duplicates included.
    fn deck(&self) -> Vec<Self::Card>;

    /// Reset to the root decision node with a fixed deal.
    ///
    /// `cards[i]` is player `i`'s private card; the card after the last seat is
    /// the community card for variants that have one.
    ///
    /// # Errors
    /// [`CfrError::InvalidDeal`] if fewer than [`GameState::deal_size`] cards
    /// are given.
    fn deal(&mut self, cards: &[Self::Card]) -> Result<(), CfrError>;

    /// Number of cards consumed by one deal.
    fn deal_size(&self) -> usize {
        self.player_count() + 1
    }

    /// Reset to the root decision node with a random deal.
    ///
    /// This is the only chance event the trainer samples; everything below
    /// the root is walked exhaustively.
    fn start<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<(), CfrError> {
        let mut deck = self.deck();
        let amount = self.deal_size().min(deck.len());
        let (dealt, _) = deck.partial_shuffle(rng, amount);
        self.deal(dealt)
    }

    /// Representation key of the acting player's information set.
    fn representation(&self) -> String;

    /// Legal actions at this node, in a stable order. Empty when terminal.
    fn actions(&self) -> Vec<Self::Action>;

    /// Return the successor state after `action`.
    ///
    /// # Errors
    /// [`CfrError::InvalidAction`] if `action` is not in [`GameState::actions`].
    fn apply(&self, action: &Self::Action) -> Result<Self, CfrError>;

    /// Get the total number of players in the game.
    fn player_count(&self) -> usize;

    /// All seats, in index order.
    fn players(&self) -> &[Player];

    /// The seat that acts at this node.
    fn current_player(&self) -> &Player {
        &self.players()[self.current_player_index()]
    }

    /// Index of the seat that acts at this node.
    fn current_player_index(&self) -> usize;

    /// Whether the hand is over.
    fn is_terminal(&self) -> bool;

    /// Payoff of every player, in seat order.
    ///
    /// Only meaningful at terminal nodes.
    fn payoffs(&self) -> Vec<f64>;

    /// Build the [`CfrError::InvalidAction`] for `action` at this node.
    fn invalid_action(&self, action: &Self::Action) -> CfrError {
        CfrError::InvalidAction {
            action: action.token(),
            key: self.representation(),
        }
    }
}

/// Reject a deal shorter than `expected` cards.
pub(crate) fn check_deal<C>(cards: &[C], expected: usize) -> Result<(), CfrError> {
    if cards.len() < expected {
        return Err(CfrError::InvalidDeal {
            expected,
            found: cards.len(),
        });
    }
    Ok(())
}
