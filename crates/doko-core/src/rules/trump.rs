use crate::model::card::Card;
use crate::model::rank::Rank;
use crate::model::suit::Suit;
use core::cmp::Ordering;
use serde::{Deserialize, Serialize};

/// The frozen trump classification for one game. Built once at setup
/// from the configured trump suit; every method is a pure function of
/// the card's printed face, so no card ever exists half-classified.
///
/// Strength ladder (lower value = stronger):
/// the Ten of Hearts alone at 0, Queens at 1-4 and Jacks at 5-8 by suit
/// priority, trump-suit plain cards at 9-12 by face.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrumpOrder {
    trump_suit: Suit,
}

impl TrumpOrder {
    pub const fn new(trump_suit: Suit) -> Self {
        Self { trump_suit }
    }

    pub const fn trump_suit(self) -> Suit {
        self.trump_suit
    }

    /// The trump-suit Ace, the "Fox" of the capture achievement.
    pub fn is_fox(self, card: Card) -> bool {
        card.rank == Rank::Ace && card.suit == self.trump_suit
    }

    pub fn is_trump(self, card: Card) -> bool {
        self.strength(card).is_some()
    }

    /// Trump strength, `None` for plain (Fehl) cards. Classification is
    /// checked in priority order: the Ten of Hearts first, then Queens,
    /// then Jacks, then the trump suit's remaining cards.
    pub fn strength(self, card: Card) -> Option<u8> {
        if card.rank == Rank::Ten && card.suit == Suit::Hearts {
            return Some(0);
        }
        if card.rank == Rank::Queen {
            return Some(1 + card.suit.trump_priority());
        }
        if card.rank == Rank::Jack {
            return Some(5 + card.suit.trump_priority());
        }
        if card.suit == self.trump_suit {
            let offset = match card.rank {
                Rank::Ace => 0,
                Rank::Ten => 1,
                Rank::King => 2,
                Rank::Nine => 3,
                // Queens, Jacks and the Hearts Ten were classified above.
                Rank::Queen | Rank::Jack => unreachable!("face already classified as trump"),
            };
            return Some(9 + offset);
        }
        None
    }

    /// Total order over the trumps of one game: `Less` means `a` is the
    /// stronger card.
    pub fn compare_trumps(self, a: Card, b: Card) -> Option<Ordering> {
        match (self.strength(a), self.strength(b)) {
            (Some(sa), Some(sb)) => Some(sa.cmp(&sb)),
            _ => None,
        }
    }

    /// Whether `challenger` strictly beats the `incumbent` currently
    /// holding the trick. The incumbent is always either the lead card
    /// or a card that already beat it, so a plain challenger of another
    /// suit can never win.
    pub fn beats(self, challenger: Card, incumbent: Card) -> bool {
        match (self.strength(challenger), self.strength(incumbent)) {
            (Some(c), Some(i)) => c < i,
            (Some(_), None) => true,
            (None, Some(_)) => false,
            (None, None) => {
                challenger.suit == incumbent.suit
                    && challenger.rank.ladder_index() > incumbent.rank.ladder_index()
            }
        }
    }
}

impl Default for TrumpOrder {
    fn default() -> Self {
        Self::new(Suit::Diamonds)
    }
}

#[cfg(test)]
mod tests {
    use super::TrumpOrder;
    use crate::model::card::Card;
    use crate::model::rank::{Rank, RankSet};
    use crate::model::suit::Suit;
    use core::cmp::Ordering;

    fn order() -> TrumpOrder {
        TrumpOrder::new(Suit::Diamonds)
    }

    #[test]
    fn hearts_ten_is_the_single_strongest_trump() {
        let order = order();
        let dulle = Card::new(Rank::Ten, Suit::Hearts, 0);
        assert_eq!(order.strength(dulle), Some(0));
        for suit in Suit::ALL {
            let queen = Card::new(Rank::Queen, suit, 0);
            assert_eq!(order.compare_trumps(dulle, queen), Some(Ordering::Less));
        }
    }

    #[test]
    fn queens_beat_jacks_beat_trump_suit_plains() {
        let order = order();
        let weakest_queen = Card::new(Rank::Queen, Suit::Diamonds, 0);
        let strongest_jack = Card::new(Rank::Jack, Suit::Clubs, 0);
        let trump_ace = Card::new(Rank::Ace, Suit::Diamonds, 0);
        assert_eq!(
            order.compare_trumps(weakest_queen, strongest_jack),
            Some(Ordering::Less)
        );
        assert_eq!(
            order.compare_trumps(strongest_jack, trump_ace),
            Some(Ordering::Less)
        );
    }

    #[test]
    fn queens_and_jacks_order_by_suit_priority() {
        let order = order();
        let club_queen = Card::new(Rank::Queen, Suit::Clubs, 0);
        let spade_queen = Card::new(Rank::Queen, Suit::Spades, 0);
        let heart_jack = Card::new(Rank::Jack, Suit::Hearts, 0);
        let diamond_jack = Card::new(Rank::Jack, Suit::Diamonds, 0);
        assert_eq!(
            order.compare_trumps(club_queen, spade_queen),
            Some(Ordering::Less)
        );
        assert_eq!(
            order.compare_trumps(heart_jack, diamond_jack),
            Some(Ordering::Less)
        );
    }

    #[test]
    fn trump_suit_plains_order_ace_ten_king_nine() {
        let order = order();
        let strengths: Vec<u8> = [Rank::Ace, Rank::Ten, Rank::King, Rank::Nine]
            .iter()
            .map(|&rank| order.strength(Card::new(rank, Suit::Diamonds, 0)).unwrap())
            .collect();
        assert_eq!(strengths, vec![9, 10, 11, 12]);
    }

    #[test]
    fn plain_cards_have_no_trump_strength() {
        let order = order();
        assert_eq!(order.strength(Card::new(Rank::Ace, Suit::Spades, 0)), None);
        assert_eq!(order.strength(Card::new(Rank::Nine, Suit::Hearts, 0)), None);
        assert_eq!(order.strength(Card::new(Rank::King, Suit::Clubs, 0)), None);
    }

    #[test]
    fn hearts_trump_suit_keeps_the_ten_at_the_top() {
        let order = TrumpOrder::new(Suit::Hearts);
        assert_eq!(order.strength(Card::new(Rank::Ten, Suit::Hearts, 0)), Some(0));
        assert_eq!(
            order.strength(Card::new(Rank::Ace, Suit::Hearts, 0)),
            Some(9)
        );
        assert!(order.is_fox(Card::new(Rank::Ace, Suit::Hearts, 0)));
    }

    #[test]
    fn trump_order_is_antisymmetric_and_transitive() {
        let order = order();
        let trumps: Vec<Card> = {
            let mut cards = Vec::new();
            for suit in Suit::ALL {
                for rank in RankSet::WithNines.ranks().iter().copied() {
                    let card = Card::new(rank, suit, 0);
                    if order.is_trump(card) {
                        cards.push(card);
                    }
                }
            }
            cards
        };

        for &a in &trumps {
            for &b in &trumps {
                if order.strength(a) != order.strength(b) {
                    assert_ne!(order.beats(a, b), order.beats(b, a), "{a} vs {b}");
                }
                for &c in &trumps {
                    if order.beats(a, b) && order.beats(b, c) {
                        assert!(order.beats(a, c), "{a} > {b} > {c}");
                    }
                }
            }
        }
    }

    #[test]
    fn beats_rejects_off_suit_plain_cards() {
        let order = order();
        let incumbent = Card::new(Rank::Nine, Suit::Hearts, 0);
        let off_suit_ace = Card::new(Rank::Ace, Suit::Spades, 0);
        assert!(!order.beats(off_suit_ace, incumbent));
        assert!(order.beats(Card::new(Rank::King, Suit::Hearts, 0), incumbent));
    }
}
