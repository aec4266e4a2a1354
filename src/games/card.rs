//! Card ranks shared by the Kuhn and Leduc rule sets.
//!
//! These games ignore suits, so a card is just a rank on the short ladder
//! `9 < T < J < Q < K`. Each variant deals from the top `players + 1` ranks.

use std::fmt;

/// Rank of a card (0-4: 9-K).
pub const RANK_9: u8 = 0;
pub const RANK_T: u8 = 1;
pub const RANK_J: u8 = 2;
pub const RANK_Q: u8 = 3;
pub const RANK_K: u8 = 4;

/// Number of ranks on the ladder.
pub const NUM_RANKS: usize = 5;

/// Rank characters for display.
const RANK_CHARS: [char; NUM_RANKS] = ['9', 'T', 'J', 'Q', 'K'];

/// A single card, identified by rank only.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Card {
    rank: u8,
}

impl Card {
    /// Create a card from its rank (0-4).
    #[inline]
    pub fn new(rank: u8) -> Self {
        debug_assert!((rank as usize) < NUM_RANKS, "rank must be 0-4");
        Self { rank }
    }

    /// Parse a card from its rank character ('9', 'T', 'J', 'Q', 'K').
    pub fn from_char(c: char) -> Option<Self> {
        let rank = RANK_CHARS
            .iter()
            .position(|&r| r == c.to_ascii_uppercase())?;
        Some(Self::new(rank as u8))
    }

    /// Get the card's rank (0-4: 9-K).
    #[inline]
    pub fn rank(&self) -> u8 {
        self.rank
    }

    /// Get rank character for display.
    pub fn rank_char(&self) -> char {
        RANK_CHARS[self.rank as usize]
    }

    /// The highest `count` ranks of the ladder, lowest first.
    ///
    /// `count` is clamped to the ladder size.
    pub fn top_ranks(count: usize) -> Vec<Card> {
        let count = count.min(NUM_RANKS);
        (NUM_RANKS - count..NUM_RANKS)
            .map(|rank| Card::new(rank as u8))
            .collect()
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.rank_char())
    }
}

impl fmt::Debug for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self)
    }
}
