use crate::model::card::Card;
use crate::model::hand::Hand;
use crate::model::rank::{Rank, RankSet};
use crate::model::seat::Seat;
use crate::model::suit::Suit;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use std::collections::HashMap;
use std::fmt;

#[derive(Debug, Clone)]
pub struct Deck {
    rank_set: RankSet,
    cards: Vec<Card>,
}

/// A deal that fails the double-deck invariant. Carries the offending
/// (suit, rank) key so the corruption can be pinpointed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeckIntegrityError {
    CountMismatch { expected: usize, observed: usize },
    CopyCount { suit: Suit, rank: Rank, observed: usize },
}

impl fmt::Display for DeckIntegrityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeckIntegrityError::CountMismatch { expected, observed } => {
                write!(f, "expected {expected} cards in play but found {observed}")
            }
            DeckIntegrityError::CopyCount {
                suit,
                rank,
                observed,
            } => {
                write!(
                    f,
                    "expected exactly 2 copies of {rank}{suit} but found {observed}"
                )
            }
        }
    }
}

impl std::error::Error for DeckIntegrityError {}

impl Deck {
    /// Both copies of every (suit, rank) combination in the rank set.
    pub fn double(rank_set: RankSet) -> Self {
        let mut cards = Vec::with_capacity(rank_set.deck_size());
        for copy in 0..2 {
            for suit in Suit::ALL.iter().copied() {
                for rank in rank_set.ranks().iter().copied() {
                    cards.push(Card::new(rank, suit, copy));
                }
            }
        }
        Self { rank_set, cards }
    }

    pub fn shuffled<R: rand::Rng + ?Sized>(rank_set: RankSet, rng: &mut R) -> Self {
        let mut deck = Self::double(rank_set);
        deck.shuffle_in_place(rng);
        deck
    }

    pub fn shuffled_with_seed(rank_set: RankSet, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        Self::shuffled(rank_set, &mut rng)
    }

    pub fn shuffle_in_place<R: rand::Rng + ?Sized>(&mut self, rng: &mut R) {
        self.cards.shuffle(rng);
    }

    pub fn rank_set(&self) -> RankSet {
        self.rank_set
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    /// Consume the deck into four equal hands, dealt round-robin.
    pub fn deal(self) -> [Hand; 4] {
        let mut hands: [Hand; 4] = std::array::from_fn(|_| Hand::new());
        for (index, card) in self.cards.into_iter().enumerate() {
            let seat = Seat::from_index(index % 4).expect("seat index in range");
            hands[seat.index()].add(card);
        }
        hands
    }

    /// Check the double-deck invariant over an arbitrary card collection:
    /// every (suit, rank) key appears exactly twice and the total matches
    /// the rank set.
    pub fn validate<'a, I>(rank_set: RankSet, cards: I) -> Result<(), DeckIntegrityError>
    where
        I: IntoIterator<Item = &'a Card>,
    {
        let mut counts: HashMap<(Suit, Rank), usize> = HashMap::new();
        let mut total = 0usize;
        for card in cards {
            *counts.entry((card.suit, card.rank)).or_insert(0) += 1;
            total += 1;
        }

        for suit in Suit::ALL.iter().copied() {
            for rank in rank_set.ranks().iter().copied() {
                let observed = counts.get(&(suit, rank)).copied().unwrap_or(0);
                if observed != 2 {
                    return Err(DeckIntegrityError::CopyCount {
                        suit,
                        rank,
                        observed,
                    });
                }
            }
        }

        if total != rank_set.deck_size() {
            return Err(DeckIntegrityError::CountMismatch {
                expected: rank_set.deck_size(),
                observed: total,
            });
        }

        Ok(())
    }

    pub fn validate_deal(rank_set: RankSet, hands: &[Hand; 4]) -> Result<(), DeckIntegrityError> {
        Self::validate(rank_set, hands.iter().flat_map(|hand| hand.iter()))
    }
}
