use crate::engine::HintContext;
use crate::hint::{Hint, HintKind};
use doko_core::model::card::Card;
use doko_core::model::trick::{Play, Trick};
use doko_core::rules::trump::TrumpOrder;

/// A trigger is a pure predicate over the evaluation context. Triggers
/// read only public information: the learner's own hand, the open
/// cards, and team membership as far as `public_team` reveals it.
pub type Trigger = fn(&HintContext) -> Option<Hint>;

/// Priority order of the whole catalogue. The rule-violation trigger
/// comes first; positional/tactical advice follows; post-trick
/// feedback closes the list.
pub const TRIGGERS: &[Trigger] = &[
    follow_suit_violation,
    trump_beats_plain,
    save_high_trump,
    protect_fox,
    discard_value,
    assist_teammate,
    karlchen_chance,
    fox_captured,
    expensive_trick_lost,
];

/// Strength 0-4 covers the Hearts Ten and the four Queens.
const HIGH_TRUMP_STRENGTH: u8 = 4;

fn legal_candidate(ctx: &HintContext) -> Option<(Card, Vec<Card>)> {
    let card = ctx.candidate_card()?;
    let legal = ctx.state.legal_moves_for(ctx.seat);
    legal.contains(&card).then_some((card, legal))
}

fn current_winner(ctx: &HintContext) -> Option<Play> {
    ctx.state
        .current_trick()
        .current_winning_play(ctx.state.trump_order())
}

fn winner_is_known_teammate(ctx: &HintContext, winner: &Play) -> bool {
    ctx.state.is_known_teammate(ctx.seat, winner.seat)
}

fn follow_suit_violation(ctx: &HintContext) -> Option<Hint> {
    let card = ctx.candidate_card()?;
    // A card the player does not even hold is an input error, not a
    // rules lesson.
    if !ctx.state.hand(ctx.seat).contains(card) {
        return None;
    }
    let legal = ctx.state.legal_moves_for(ctx.seat);
    if legal.contains(&card) {
        return None;
    }
    let order = ctx.state.trump_order();
    let lead = ctx.state.current_trick().lead()?;
    let message = if order.is_trump(lead) {
        format!(
            "{card} cannot be played here: {lead} opened with trump, and you still hold trump. \
             The obligation (Bedienzwang) binds until your trumps are gone."
        )
    } else {
        format!(
            "{card} cannot be played here: the trick was opened with a plain {suit} card and \
             you still hold {suit}. Watch out: trump cards with a {suit} face do not serve \
             the suit.",
            suit = lead.suit
        )
    };
    Some(Hint::new(
        HintKind::FollowSuitViolation,
        "You have to follow",
        message,
    ))
}

fn trump_beats_plain(ctx: &HintContext) -> Option<Hint> {
    let (card, legal) = legal_candidate(ctx)?;
    let order = ctx.state.trump_order();
    if order.is_trump(card) {
        return None;
    }
    let winner = current_winner(ctx)?;
    if order.beats(card, winner.card) || winner_is_known_teammate(ctx, &winner) {
        return None;
    }
    let winning_trump = legal
        .iter()
        .copied()
        .find(|&c| order.is_trump(c) && order.beats(c, winner.card))?;
    Some(Hint::new(
        HintKind::TrumpBeatsPlain,
        "Trump takes the trick",
        format!(
            "{card} will not win: {leader} holds the trick with {incumbent}. You are free of \
             the led suit, so a trump like {winning_trump} would beat any plain card.",
            leader = winner.seat,
            incumbent = winner.card
        ),
    ))
}

fn save_high_trump(ctx: &HintContext) -> Option<Hint> {
    let (card, legal) = legal_candidate(ctx)?;
    let order = ctx.state.trump_order();
    let strength = order.strength(card)?;
    if strength > HIGH_TRUMP_STRENGTH {
        return None;
    }
    let winner = current_winner(ctx)?;
    if !order.beats(card, winner.card) {
        return None;
    }
    let cheaper = legal
        .iter()
        .copied()
        .find(|&c| c != card && order.beats(c, winner.card) && order.beats(card, c))?;
    Some(Hint::new(
        HintKind::SaveHighTrump,
        "Save your top trumps",
        format!(
            "{card} wins this trick, but so would {cheaper}. The highest trumps decide the \
             late tricks; spend the cheapest card that still does the job."
        ),
    ))
}

fn protect_fox(ctx: &HintContext) -> Option<Hint> {
    let (card, legal) = legal_candidate(ctx)?;
    let order = ctx.state.trump_order();
    if !order.is_fox(card) || legal.len() < 2 {
        return None;
    }
    let winner = current_winner(ctx)?;
    if winner_is_known_teammate(ctx, &winner) || order.beats(card, winner.card) {
        return None;
    }
    Some(Hint::new(
        HintKind::ProtectFox,
        "Watch the Fox",
        format!(
            "{card} is the Fox: eleven points, and a bonus point for the other side if they \
             capture it. {leader} currently holds the trick -- is this really the moment?",
            leader = winner.seat
        ),
    ))
}

fn discard_value(ctx: &HintContext) -> Option<Hint> {
    let (card, legal) = legal_candidate(ctx)?;
    let order = ctx.state.trump_order();
    let trick = ctx.state.current_trick();
    let lead = trick.lead()?;

    let serves = if order.is_trump(lead) {
        order.is_trump(card)
    } else {
        card.suit == lead.suit && !order.is_trump(card)
    };
    if serves || card.point_value() < 10 {
        return None;
    }
    let winner = current_winner(ctx)?;
    if winner_is_known_teammate(ctx, &winner) || order.beats(card, winner.card) {
        return None;
    }
    let cheaper = legal
        .iter()
        .copied()
        .find(|&c| c.point_value() < card.point_value())?;
    Some(Hint::new(
        HintKind::DiscardValue,
        "Mind what you throw away",
        format!(
            "Discarding {card} hands {points} points to whoever takes this trick. A cheaper \
             card such as {cheaper} keeps your values for a better moment.",
            points = card.point_value()
        ),
    ))
}

fn assist_teammate(ctx: &HintContext) -> Option<Hint> {
    let (card, _) = legal_candidate(ctx)?;
    let winner = current_winner(ctx)?;
    if !winner_is_known_teammate(ctx, &winner) || card.point_value() < 10 {
        return None;
    }
    Some(Hint::new(
        HintKind::AssistTeammate,
        "Feed your partner",
        format!(
            "{leader} is your announced partner and holds this trick. Giving it {points} \
             points with {card} is exactly the move -- this is called schmieren.",
            leader = winner.seat,
            points = card.point_value()
        ),
    ))
}

fn karlchen_chance(ctx: &HintContext) -> Option<Hint> {
    let (card, _) = legal_candidate(ctx)?;
    if !card.is_jack_of_clubs() {
        return None;
    }
    let state = ctx.state;
    if state.tricks_completed() + 1 != state.total_tricks() {
        return None;
    }
    let order = state.trump_order();
    let wins_so_far = match current_winner(ctx) {
        Some(winner) => order.beats(card, winner.card),
        None => true,
    };
    wins_so_far.then(|| {
        Hint::new(
            HintKind::KarlchenChance,
            "Karlchen is in reach",
            format!(
                "Winning the last trick with {card} earns the Karlchen bonus -- an extra \
                 game point on top of the trick itself."
            ),
        )
    })
}

fn fox_captured(ctx: &HintContext) -> Option<Hint> {
    let trick = ctx.completed_trick()?;
    let order = ctx.state.trump_order();
    let winner = completed_winner(trick, order);
    let played_fox = trick
        .plays()
        .iter()
        .find(|play| play.seat == ctx.seat && order.is_fox(play.card))?;
    if winner == ctx.seat || ctx.state.is_known_teammate(ctx.seat, winner) {
        return None;
    }
    Some(Hint::new(
        HintKind::FoxCaptured,
        "The Fox is gone",
        format!(
            "Your {card} went to {winner}. If that seat plays against you, the capture is \
             worth a bonus point for the other side. Foxes want an escort of trumps.",
            card = played_fox.card
        ),
    ))
}

fn expensive_trick_lost(ctx: &HintContext) -> Option<Hint> {
    let trick = ctx.completed_trick()?;
    if trick.points() < 40 {
        return None;
    }
    let winner = completed_winner(trick, ctx.state.trump_order());
    if winner == ctx.seat || ctx.state.is_known_teammate(ctx.seat, winner) {
        return None;
    }
    Some(Hint::new(
        HintKind::ExpensiveTrickLost,
        "A Doppelkopf slipped away",
        format!(
            "That trick carried {points} points -- forty or more make it a Doppelkopf, worth \
             an extra game point to {winner}'s side.",
            points = trick.points()
        ),
    ))
}

fn completed_winner(trick: &Trick, order: &TrumpOrder) -> doko_core::model::seat::Seat {
    trick
        .winner(order)
        .expect("post-trick hints run on complete tricks")
}
