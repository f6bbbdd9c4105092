use crate::model::card::Card;
use crate::model::hand::Hand;
use crate::model::trick::Trick;
use crate::rules::trump::TrumpOrder;

/// The single must-follow (Bedienzwang) computation. Validation, the
/// bots and the hint triggers all call this one function; nothing else
/// in the repository re-derives legality.
///
/// Leading: the whole hand. Trump led: trumps if any are held. Plain
/// suit led: cards of that exact suit that are themselves not trump --
/// a trump card of the same raw suit does not serve the obligation.
/// A player who cannot serve may play anything.
pub fn legal_moves(hand: &Hand, trick: &Trick, order: &TrumpOrder) -> Vec<Card> {
    debug_assert!(!hand.is_empty(), "legal_moves called with an empty hand");

    let Some(lead) = trick.lead() else {
        return hand.iter().copied().collect();
    };

    let serving: Vec<Card> = if order.is_trump(lead) {
        hand.iter()
            .copied()
            .filter(|&card| order.is_trump(card))
            .collect()
    } else {
        hand.iter()
            .copied()
            .filter(|&card| card.suit == lead.suit && !order.is_trump(card))
            .collect()
    };

    if serving.is_empty() {
        hand.iter().copied().collect()
    } else {
        serving
    }
}

/// True iff the obligation actually constrains the player: the legal
/// set is a strict subset of the hand.
pub fn must_follow(hand: &Hand, trick: &Trick, order: &TrumpOrder) -> bool {
    legal_moves(hand, trick, order).len() < hand.len()
}
