use core::fmt;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[repr(u8)]
pub enum Rank {
    Nine = 9,
    Ten = 10,
    Jack = 11,
    Queen = 12,
    King = 13,
    Ace = 14,
}

impl Rank {
    pub const ORDERED: [Rank; 6] = [
        Rank::Nine,
        Rank::Ten,
        Rank::Jack,
        Rank::Queen,
        Rank::King,
        Rank::Ace,
    ];

    pub const fn from_value(value: u8) -> Option<Self> {
        match value {
            9 => Some(Rank::Nine),
            10 => Some(Rank::Ten),
            11 => Some(Rank::Jack),
            12 => Some(Rank::Queen),
            13 => Some(Rank::King),
            14 => Some(Rank::Ace),
            _ => None,
        }
    }

    /// Card points counted towards the 240 in play.
    pub const fn point_value(self) -> u32 {
        match self {
            Rank::Nine => 0,
            Rank::Jack => 2,
            Rank::Queen => 3,
            Rank::King => 4,
            Rank::Ten => 10,
            Rank::Ace => 11,
        }
    }

    /// Strength within a plain suit. This is an explicit ladder
    /// (Nine < Jack < Queen < King < Ten < Ace), not point arithmetic:
    /// the Ten outranks the King despite both being face cards.
    pub const fn ladder_index(self) -> u8 {
        match self {
            Rank::Nine => 0,
            Rank::Jack => 1,
            Rank::Queen => 2,
            Rank::King => 3,
            Rank::Ten => 4,
            Rank::Ace => 5,
        }
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Rank::Nine => "9",
            Rank::Ten => "10",
            Rank::Jack => "J",
            Rank::Queen => "Q",
            Rank::King => "K",
            Rank::Ace => "A",
        };
        f.write_str(text)
    }
}

/// Which ranks make up the deck: the 48-card game keeps the Nines,
/// the 40-card game drops them. Both variants total 240 card points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RankSet {
    WithNines,
    WithoutNines,
}

impl RankSet {
    pub const fn ranks(self) -> &'static [Rank] {
        match self {
            RankSet::WithNines => &Rank::ORDERED,
            RankSet::WithoutNines => &[Rank::Ten, Rank::Jack, Rank::Queen, Rank::King, Rank::Ace],
        }
    }

    pub const fn deck_size(self) -> usize {
        self.ranks().len() * 4 * 2
    }

    pub const fn hand_size(self) -> usize {
        self.deck_size() / 4
    }

    pub const fn tricks_per_game(self) -> usize {
        self.hand_size()
    }
}

impl Default for RankSet {
    fn default() -> Self {
        RankSet::WithNines
    }
}
