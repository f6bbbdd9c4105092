use crate::hint::Hint;
use crate::limiter::HintLimiter;
use crate::triggers::TRIGGERS;
use doko_core::game::state::GameState;
use doko_core::model::card::Card;
use doko_core::model::seat::Seat;
use doko_core::model::trick::Trick;
use std::panic::{AssertUnwindSafe, catch_unwind};
use tracing::{Level, event};

/// What the engine is being asked about: a card the learner is about
/// to play, or a trick that just completed.
#[derive(Debug, Clone, Copy)]
pub enum MoveStage<'a> {
    Candidate(Card),
    PostTrick(&'a Trick),
}

/// Read-only view for one evaluation. Triggers see the learner's seat,
/// the live state and the stage; they never mutate anything.
pub struct HintContext<'a> {
    pub seat: Seat,
    pub state: &'a GameState,
    pub stage: MoveStage<'a>,
}

impl<'a> HintContext<'a> {
    pub fn candidate(seat: Seat, state: &'a GameState, card: Card) -> Self {
        Self {
            seat,
            state,
            stage: MoveStage::Candidate(card),
        }
    }

    pub fn post_trick(seat: Seat, state: &'a GameState, trick: &'a Trick) -> Self {
        Self {
            seat,
            state,
            stage: MoveStage::PostTrick(trick),
        }
    }

    pub fn candidate_card(&self) -> Option<Card> {
        match self.stage {
            MoveStage::Candidate(card) => Some(card),
            MoveStage::PostTrick(_) => None,
        }
    }

    pub fn completed_trick(&self) -> Option<&'a Trick> {
        match self.stage {
            MoveStage::Candidate(_) => None,
            MoveStage::PostTrick(trick) => Some(trick),
        }
    }
}

/// Walks the fixed trigger list in priority order and returns the first
/// hint that fires and passes suppression. A misbehaving trigger is
/// logged and skipped; evaluation never takes the game down.
#[derive(Debug, Default)]
pub struct HintEngine {
    limiter: HintLimiter,
}

impl HintEngine {
    pub fn new() -> Self {
        Self {
            limiter: HintLimiter::new(),
        }
    }

    pub fn limiter(&self) -> &HintLimiter {
        &self.limiter
    }

    pub fn evaluate(&mut self, ctx: &HintContext) -> Option<Hint> {
        for (index, trigger) in TRIGGERS.iter().enumerate() {
            let fired = match catch_unwind(AssertUnwindSafe(|| trigger(ctx))) {
                Ok(result) => result,
                Err(_) => {
                    event!(
                        target: "doko_hints::engine",
                        Level::ERROR,
                        trigger_index = index,
                        "hint trigger panicked and was skipped"
                    );
                    continue;
                }
            };

            let Some(hint) = fired else { continue };

            if self.limiter.allows(hint.kind) {
                self.limiter.record(hint.kind);
                event!(
                    target: "doko_hints::engine",
                    Level::INFO,
                    kind = %hint.kind,
                    total_shown = self.limiter.total_shown(),
                    "hint emitted"
                );
                return Some(hint);
            }

            event!(
                target: "doko_hints::engine",
                Level::DEBUG,
                kind = %hint.kind,
                "hint suppressed"
            );
        }
        None
    }

    /// Advance the suppression counters; call once per completed trick.
    pub fn note_trick_completed(&mut self) {
        self.limiter.advance_trick();
    }

    /// Fresh counters for a new game session.
    pub fn reset(&mut self) {
        self.limiter = HintLimiter::new();
    }

    #[cfg(test)]
    pub(crate) fn limiter_mut_for_tests(&mut self) -> &mut HintLimiter {
        &mut self.limiter
    }
}

#[cfg(test)]
mod tests {
    use super::{HintContext, HintEngine};
    use crate::hint::HintKind;
    use doko_core::game::score::TeamScores;
    use doko_core::game::state::{GameConfig, GameState, Phase};
    use doko_core::model::card::Card;
    use doko_core::model::hand::Hand;
    use doko_core::model::player::Player;
    use doko_core::model::rank::Rank;
    use doko_core::model::seat::Seat;
    use doko_core::model::suit::Suit;
    use doko_core::model::team::Team;
    use doko_core::model::trick::Trick;

    const TEAMS: [Team; 4] = [Team::Re, Team::Kontra, Team::Re, Team::Kontra];

    fn build_state(hands: [Vec<Card>; 4], trick: Trick) -> GameState {
        let mut hand_iter = hands.into_iter();
        let players: [Player; 4] = std::array::from_fn(|index| {
            Player::new(
                format!("P{index}"),
                Hand::with_cards(hand_iter.next().expect("four hands")),
                TEAMS[index],
            )
        });
        GameState::from_parts(
            GameConfig::default(),
            0,
            players,
            trick,
            Vec::new(),
            TeamScores::new(),
            Vec::new(),
            Phase::Playing,
        )
    }

    /// West led Hearts; South holds Hearts but offers a Club.
    fn violation_scenario() -> (GameState, Card) {
        let mut trick = Trick::new(Seat::West);
        trick
            .play(Seat::West, Card::new(Rank::King, Suit::Hearts, 0))
            .unwrap();
        let south = vec![
            Card::new(Rank::Ace, Suit::Hearts, 0),
            Card::new(Rank::Ace, Suit::Clubs, 0),
        ];
        let state = build_state([Vec::new(), Vec::new(), south, Vec::new()], trick);
        (state, Card::new(Rank::Ace, Suit::Clubs, 0))
    }

    #[test]
    fn illegal_candidate_always_yields_the_rule_hint() {
        let (state, illegal) = violation_scenario();
        let mut engine = HintEngine::new();

        // Exhaust the session budget with recorded non-rule hints.
        for kind in [
            HintKind::TrumpBeatsPlain,
            HintKind::SaveHighTrump,
            HintKind::ProtectFox,
            HintKind::DiscardValue,
            HintKind::AssistTeammate,
            HintKind::KarlchenChance,
            HintKind::FoxCaptured,
            HintKind::ExpensiveTrickLost,
        ] {
            engine.limiter_mut_for_tests().record(kind);
        }

        let ctx = HintContext::candidate(Seat::South, &state, illegal);
        let hint = engine.evaluate(&ctx).expect("rule hint is exempt");
        assert_eq!(hint.kind, HintKind::FollowSuitViolation);
    }

    #[test]
    fn evaluation_without_any_trigger_returns_none() {
        // Leading any card is legal and carries no teaching moment here.
        let north = vec![Card::new(Rank::Nine, Suit::Spades, 0)];
        let state = build_state(
            [north, Vec::new(), Vec::new(), Vec::new()],
            Trick::new(Seat::North),
        );
        let mut engine = HintEngine::new();
        let ctx = HintContext::candidate(
            Seat::North,
            &state,
            Card::new(Rank::Nine, Suit::Spades, 0),
        );
        assert_eq!(engine.evaluate(&ctx), None);
    }

    #[test]
    fn rule_hint_fires_even_with_the_trick_slot_used_up() {
        let (state, illegal) = violation_scenario();
        let mut engine = HintEngine::new();

        engine.limiter_mut_for_tests().record(HintKind::DiscardValue);
        assert_eq!(engine.limiter().shown_this_trick(), 1);

        // The rule hint ignores the per-trick slot...
        let ctx = HintContext::candidate(Seat::South, &state, illegal);
        assert!(engine.evaluate(&ctx).is_some());

        // ...and completing the trick reopens the slot for the rest.
        engine.note_trick_completed();
        assert_eq!(engine.limiter().shown_this_trick(), 0);
    }
}
