use crate::model::card::Card;
use crate::model::seat::Seat;
use crate::rules::trump::TrumpOrder;
use std::fmt;

/// Ordered accumulation of up to four plays. The first card fixes the
/// obligation for every later seat; at four plays the trick is complete
/// and treated as immutable.
#[derive(Debug, Clone)]
pub struct Trick {
    leader: Seat,
    plays: Vec<Play>,
}

#[derive(Debug, Clone, Copy)]
pub struct Play {
    pub seat: Seat,
    pub card: Card,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrickError {
    TrickComplete,
    OutOfTurn { expected: Seat, actual: Seat },
    AlreadyPlayed(Seat),
}

impl fmt::Display for TrickError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrickError::TrickComplete => write!(f, "trick already complete"),
            TrickError::OutOfTurn { expected, actual } => {
                write!(f, "expected {expected} to play next but got {actual}")
            }
            TrickError::AlreadyPlayed(seat) => {
                write!(f, "{seat} has already played this trick")
            }
        }
    }
}

impl std::error::Error for TrickError {}

impl Trick {
    pub fn new(leader: Seat) -> Self {
        Self {
            leader,
            plays: Vec::with_capacity(4),
        }
    }

    pub fn leader(&self) -> Seat {
        self.leader
    }

    pub fn plays(&self) -> &[Play] {
        &self.plays
    }

    pub fn is_empty(&self) -> bool {
        self.plays.is_empty()
    }

    pub fn is_complete(&self) -> bool {
        self.plays.len() == 4
    }

    pub fn lead(&self) -> Option<Card> {
        self.plays.first().map(|play| play.card)
    }

    pub fn expected_seat(&self) -> Seat {
        self.plays
            .last()
            .map(|play| play.seat.next())
            .unwrap_or(self.leader)
    }

    pub fn play(&mut self, seat: Seat, card: Card) -> Result<(), TrickError> {
        if self.is_complete() {
            return Err(TrickError::TrickComplete);
        }

        if self.plays.iter().any(|play| play.seat == seat) {
            return Err(TrickError::AlreadyPlayed(seat));
        }

        let expected = self.expected_seat();
        if expected != seat {
            return Err(TrickError::OutOfTurn {
                expected,
                actual: seat,
            });
        }

        self.plays.push(Play { seat, card });
        Ok(())
    }

    /// Card points carried by this trick.
    pub fn points(&self) -> u32 {
        self.plays.iter().map(|play| play.card.point_value()).sum()
    }

    /// The play currently holding the trick. With identical faces in one
    /// trick (double deck) the earlier play keeps it: the scan only
    /// replaces the incumbent on a strict beat.
    pub fn current_winning_play(&self, order: &TrumpOrder) -> Option<Play> {
        let mut best: Option<Play> = None;
        for play in &self.plays {
            match best {
                None => best = Some(*play),
                Some(incumbent) => {
                    if order.beats(play.card, incumbent.card) {
                        best = Some(*play);
                    }
                }
            }
        }
        best
    }

    pub fn current_winner(&self, order: &TrumpOrder) -> Option<Seat> {
        self.current_winning_play(order).map(|play| play.seat)
    }

    /// Winner of a complete trick; `None` while incomplete.
    pub fn winner(&self, order: &TrumpOrder) -> Option<Seat> {
        if !self.is_complete() {
            return None;
        }
        self.current_winner(order)
    }

}

#[cfg(test)]
mod tests {
    use super::{Trick, TrickError};
    use crate::model::card::Card;
    use crate::model::rank::Rank;
    use crate::model::seat::Seat;
    use crate::model::suit::Suit;

    fn order() -> crate::rules::trump::TrumpOrder {
        crate::rules::trump::TrumpOrder::new(Suit::Diamonds)
    }

    #[test]
    fn plays_follow_turn_order() {
        let mut trick = Trick::new(Seat::North);
        assert!(
            trick
                .play(Seat::North, Card::new(Rank::Nine, Suit::Clubs, 0))
                .is_ok()
        );
        assert!(matches!(
            trick.play(Seat::South, Card::new(Rank::Ten, Suit::Clubs, 0)),
            Err(TrickError::OutOfTurn { .. })
        ));
    }

    #[test]
    fn winner_uses_plain_ladder_not_point_value() {
        // Lead Hearts: Ace beats Ten beats King, the ladder is explicit.
        let mut trick = Trick::new(Seat::North);
        trick
            .play(Seat::North, Card::new(Rank::Nine, Suit::Hearts, 0))
            .unwrap();
        trick
            .play(Seat::East, Card::new(Rank::Ace, Suit::Hearts, 0))
            .unwrap();
        trick
            .play(Seat::South, Card::new(Rank::King, Suit::Hearts, 0))
            .unwrap();
        trick
            .play(Seat::West, Card::new(Rank::Ace, Suit::Spades, 0))
            .unwrap();
        assert_eq!(trick.winner(&order()), Some(Seat::East));
    }

    #[test]
    fn low_trump_beats_any_plain_card() {
        let mut trick = Trick::new(Seat::North);
        trick
            .play(Seat::North, Card::new(Rank::Ace, Suit::Hearts, 0))
            .unwrap();
        trick
            .play(Seat::East, Card::new(Rank::King, Suit::Hearts, 0))
            .unwrap();
        trick
            .play(Seat::South, Card::new(Rank::Nine, Suit::Diamonds, 0))
            .unwrap();
        trick
            .play(Seat::West, Card::new(Rank::Ace, Suit::Spades, 0))
            .unwrap();
        assert_eq!(trick.winner(&order()), Some(Seat::South));
    }

    #[test]
    fn first_of_identical_trumps_wins() {
        let mut trick = Trick::new(Seat::North);
        trick
            .play(Seat::North, Card::new(Rank::Queen, Suit::Clubs, 0))
            .unwrap();
        trick
            .play(Seat::East, Card::new(Rank::Queen, Suit::Clubs, 1))
            .unwrap();
        trick
            .play(Seat::South, Card::new(Rank::Jack, Suit::Hearts, 0))
            .unwrap();
        trick
            .play(Seat::West, Card::new(Rank::Nine, Suit::Diamonds, 0))
            .unwrap();
        assert_eq!(trick.winner(&order()), Some(Seat::North));
    }

    #[test]
    fn incomplete_trick_has_no_winner_but_a_current_one() {
        let mut trick = Trick::new(Seat::West);
        trick
            .play(Seat::West, Card::new(Rank::Ten, Suit::Spades, 0))
            .unwrap();
        assert_eq!(trick.winner(&order()), None);
        assert_eq!(trick.current_winner(&order()), Some(Seat::West));
    }

    #[test]
    fn points_sum_played_card_values() {
        let mut trick = Trick::new(Seat::North);
        trick
            .play(Seat::North, Card::new(Rank::Ace, Suit::Spades, 0))
            .unwrap();
        trick
            .play(Seat::East, Card::new(Rank::Ten, Suit::Spades, 0))
            .unwrap();
        assert_eq!(trick.points(), 21);
    }
}
