use super::{BotDifficulty, Policy, PolicyContext};
use doko_core::model::card::Card;
use doko_core::rules::legal::legal_moves;
use doko_core::rules::trump::TrumpOrder;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use tracing::{Level, event};

/// The tiered opponent. Easy picks uniformly among the legal moves;
/// Medium leads strong and follows cheap; Hard is the documented alias
/// of Medium (see `BotDifficulty`).
pub struct HeuristicPolicy {
    difficulty: BotDifficulty,
    rng: SmallRng,
}

impl HeuristicPolicy {
    pub fn new(difficulty: BotDifficulty) -> Self {
        Self::with_seed(difficulty, rand::random())
    }

    pub fn with_seed(difficulty: BotDifficulty, seed: u64) -> Self {
        Self {
            difficulty,
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    pub fn easy() -> Self {
        Self::new(BotDifficulty::Easy)
    }

    pub fn medium() -> Self {
        Self::new(BotDifficulty::Medium)
    }

    pub fn hard() -> Self {
        Self::new(BotDifficulty::Hard)
    }

    pub fn difficulty(&self) -> BotDifficulty {
        self.difficulty
    }
}

impl Policy for HeuristicPolicy {
    fn choose_play(&mut self, ctx: &PolicyContext) -> Option<Card> {
        if ctx.hand.is_empty() {
            event!(
                target: "doko_bot::play",
                Level::ERROR,
                seat = %ctx.seat,
                "asked for a play with an empty hand"
            );
            return None;
        }

        let order = ctx.state.trump_order();
        let legal = legal_moves(ctx.hand, ctx.state.current_trick(), order);
        if legal.is_empty() {
            event!(
                target: "doko_bot::play",
                Level::ERROR,
                seat = %ctx.seat,
                "no legal move produced"
            );
            return None;
        }

        let (chosen, reason) = match self.difficulty {
            BotDifficulty::Easy => {
                let card = legal
                    .choose(&mut self.rng)
                    .copied()
                    .expect("non-empty legal set");
                (card, "uniform_random")
            }
            BotDifficulty::Medium | BotDifficulty::Hard => heuristic_play(&legal, ctx),
        };

        log_play_decision(ctx, self.difficulty, &legal, chosen, reason);
        Some(chosen)
    }
}

fn heuristic_play(legal: &[Card], ctx: &PolicyContext) -> (Card, &'static str) {
    let order = ctx.state.trump_order();
    let trick = ctx.state.current_trick();

    if trick.is_empty() {
        let trumps: Vec<Card> = legal
            .iter()
            .copied()
            .filter(|&card| order.is_trump(card))
            .collect();
        if trumps.is_empty() {
            (strongest(legal, order), "lead_strongest_plain")
        } else {
            (strongest(&trumps, order), "lead_strongest_trump")
        }
    } else {
        let winning_play = trick
            .current_winning_play(order)
            .expect("non-empty trick has a winning play");

        if ctx.state.is_known_teammate(ctx.seat, winning_play.seat) {
            return (weakest(legal, order), "conserve_teammate_winning");
        }

        let winners: Vec<Card> = legal
            .iter()
            .copied()
            .filter(|&card| order.beats(card, winning_play.card))
            .collect();
        if winners.is_empty() {
            (weakest(legal, order), "dump_weakest")
        } else {
            (weakest(&winners, order), "cheapest_winning_card")
        }
    }
}

/// Single comparable power for any card: every trump sits above every
/// plain card, trumps by inverted strength, plains by ladder.
fn power(card: Card, order: &TrumpOrder) -> u8 {
    match order.strength(card) {
        Some(strength) => 100 - strength,
        None => card.rank.ladder_index(),
    }
}

fn strongest(cards: &[Card], order: &TrumpOrder) -> Card {
    cards
        .iter()
        .copied()
        .max_by_key(|&card| power(card, order))
        .expect("non-empty card set")
}

fn weakest(cards: &[Card], order: &TrumpOrder) -> Card {
    cards
        .iter()
        .copied()
        .min_by_key(|&card| power(card, order))
        .expect("non-empty card set")
}

fn log_play_decision(
    ctx: &PolicyContext,
    difficulty: BotDifficulty,
    legal: &[Card],
    chosen: Card,
    reason: &'static str,
) {
    if !tracing::enabled!(Level::INFO) {
        return;
    }

    let legal_preview = if legal.len() <= 6 {
        legal
            .iter()
            .map(|card| card.to_string())
            .collect::<Vec<_>>()
            .join(",")
    } else {
        format!("{} moves", legal.len())
    };

    event!(
        target: "doko_bot::play",
        Level::INFO,
        seat = %ctx.seat,
        difficulty = difficulty.label(),
        legal_count = legal.len(),
        legal_moves = %legal_preview,
        chosen = %chosen,
        trick_cards = ctx.state.current_trick().plays().len(),
        reason,
    );
}
