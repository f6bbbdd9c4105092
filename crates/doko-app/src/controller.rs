use doko_bot::{BotDifficulty, HeuristicPolicy, Policy, PolicyContext};
use doko_core::game::score::GameResult;
use doko_core::game::serialization::GameSnapshot;
use doko_core::game::state::{
    AnnounceError, GameConfig, GameState, Phase, PlayError, PlayOutcome,
};
use doko_core::model::card::Card;
use doko_core::model::seat::Seat;
use doko_core::model::team::Team;
use doko_hints::{Hint, HintContext, HintEngine};
use thiserror::Error;
use tracing::warn;

/// Orchestrates one game session: the rules engine, three computer
/// opponents and the hint engine for the learner's seat. All mutation
/// funnels through `play_human` and `play_bot`.
pub struct GameController {
    state: GameState,
    hints: HintEngine,
    human_seat: Seat,
    bots: [Option<HeuristicPolicy>; 4],
    difficulty: BotDifficulty,
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("it is {expected}'s turn")]
    NotYourTurn { expected: Seat },
    #[error("a computer opponent is still thinking")]
    BotPending,
    #[error("{reason}")]
    Rejected {
        reason: PlayError,
        hint: Option<Hint>,
    },
    #[error("the computer opponent produced no move")]
    NoBotMove { seat: Seat },
    #[error(transparent)]
    Announce(#[from] AnnounceError),
    #[error("the game is over")]
    GameOver,
}

/// Outcome of a human play, with whatever the hint engine had to say
/// before the move and after a completed trick.
#[derive(Debug)]
pub struct PlayReport {
    pub card: Card,
    pub outcome: PlayOutcome,
    pub pre_hint: Option<Hint>,
    pub post_hint: Option<Hint>,
}

#[derive(Debug)]
pub struct BotMove {
    pub seat: Seat,
    pub card: Card,
    pub outcome: PlayOutcome,
    pub post_hint: Option<Hint>,
}

impl GameController {
    pub fn new(
        names: [String; 4],
        config: GameConfig,
        human_seat: Seat,
        difficulty: BotDifficulty,
        seed: Option<u64>,
    ) -> Self {
        let state = match seed {
            Some(seed) => GameState::with_seed(names, config, Seat::North, seed),
            None => GameState::new(names, config),
        };
        Self::with_state(state, human_seat, difficulty)
    }

    pub fn with_state(state: GameState, human_seat: Seat, difficulty: BotDifficulty) -> Self {
        let bots: [Option<HeuristicPolicy>; 4] = std::array::from_fn(|index| {
            (index != human_seat.index()).then(|| HeuristicPolicy::new(difficulty))
        });
        Self {
            state,
            hints: HintEngine::new(),
            human_seat,
            bots,
            difficulty,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn human_seat(&self) -> Seat {
        self.human_seat
    }

    pub fn difficulty(&self) -> BotDifficulty {
        self.difficulty
    }

    pub fn current_seat(&self) -> Seat {
        self.state.current_seat()
    }

    /// A bot acts next and the game is still running.
    pub fn awaiting_bot(&self) -> bool {
        matches!(self.state.phase(), Phase::Playing)
            && self.bots[self.current_seat().index()].is_some()
    }

    pub fn awaiting_human(&self) -> bool {
        matches!(self.state.phase(), Phase::Playing) && self.current_seat() == self.human_seat
    }

    pub fn legal_moves(&self) -> Vec<Card> {
        self.state.legal_moves()
    }

    pub fn result(&self) -> Option<&GameResult> {
        self.state.result()
    }

    pub fn status_text(&self) -> String {
        format!(
            "Trick {}/{} • Leader: {} • Next: {}",
            self.state.tricks_completed() + 1,
            self.state.total_tricks(),
            self.state.current_trick().leader(),
            self.current_seat(),
        )
    }

    /// Submit the learner's card. The hint engine sees the candidate
    /// first; a rejected card carries the rule hint along with the
    /// tagged reason, and the state stays untouched.
    pub fn play_human(&mut self, card: Card) -> Result<PlayReport, SessionError> {
        if !matches!(self.state.phase(), Phase::Playing) {
            return Err(SessionError::GameOver);
        }
        let expected = self.current_seat();
        if expected != self.human_seat {
            return Err(SessionError::NotYourTurn { expected });
        }

        let pre_hint = self
            .hints
            .evaluate(&HintContext::candidate(self.human_seat, &self.state, card));

        match self.state.play_card(card) {
            Err(reason) => Err(SessionError::Rejected {
                reason,
                hint: pre_hint,
            }),
            Ok(outcome) => {
                let post_hint = self.after_outcome(outcome);
                Ok(PlayReport {
                    card,
                    outcome,
                    pre_hint,
                    post_hint,
                })
            }
        }
    }

    /// Let the bot whose turn it is act once. The selection always
    /// comes from the legal-move engine; a policy failure degrades to
    /// the first legal card rather than halting the turn loop.
    pub fn play_bot(&mut self) -> Result<BotMove, SessionError> {
        if !matches!(self.state.phase(), Phase::Playing) {
            return Err(SessionError::GameOver);
        }
        let seat = self.current_seat();
        if seat == self.human_seat {
            return Err(SessionError::NotYourTurn { expected: seat });
        }

        let chosen = {
            let policy = self.bots[seat.index()]
                .as_mut()
                .expect("every non-human seat has a policy");
            let ctx = PolicyContext {
                seat,
                hand: self.state.hand(seat),
                state: &self.state,
            };
            policy.choose_play(&ctx)
        };
        let card = match chosen {
            Some(card) => card,
            None => {
                warn!(seat = %seat, "policy produced no card; falling back to first legal move");
                self.state
                    .legal_moves_for(seat)
                    .first()
                    .copied()
                    .ok_or(SessionError::NoBotMove { seat })?
            }
        };

        let outcome = self
            .state
            .play_card(card)
            .map_err(|reason| SessionError::Rejected { reason, hint: None })?;
        let post_hint = self.after_outcome(outcome);
        Ok(BotMove {
            seat,
            card,
            outcome,
            post_hint,
        })
    }

    /// Post-trick bookkeeping: run the feedback triggers against the
    /// archived trick, advance the suppression counters, and finish
    /// the scoring once the last trick is in.
    fn after_outcome(&mut self, outcome: PlayOutcome) -> Option<Hint> {
        let PlayOutcome::TrickCompleted { .. } = outcome else {
            return None;
        };

        let post_hint = {
            let trick = self
                .state
                .trick_history()
                .last()
                .expect("a completed trick was just archived");
            self.hints
                .evaluate(&HintContext::post_trick(self.human_seat, &self.state, trick))
        };
        self.hints.note_trick_completed();

        if matches!(self.state.phase(), Phase::Scoring) {
            self.state
                .finalize()
                .expect("scoring phase finalizes cleanly");
        }
        post_hint
    }

    /// Ask the hint engine about a candidate card without playing it.
    /// Shown hints count against the suppression budget, so a later
    /// `play_human` with the same card will not repeat them.
    pub fn hint_for_candidate(&mut self, card: Card) -> Option<Hint> {
        self.hints
            .evaluate(&HintContext::candidate(self.human_seat, &self.state, card))
    }

    pub fn announce(&mut self, seat: Seat, team: Team) -> Result<(), SessionError> {
        self.state.announce(seat, team)?;
        Ok(())
    }

    pub fn export_json(&self) -> serde_json::Result<String> {
        GameSnapshot::to_json(&self.state)
    }

    /// Resume a saved game. The hint counters restart with the session;
    /// the suppression state is per run, not part of the snapshot.
    pub fn import_json(
        json: &str,
        human_seat: Seat,
        difficulty: BotDifficulty,
    ) -> anyhow::Result<Self> {
        let snapshot = GameSnapshot::from_json(json)?;
        let state = snapshot.restore()?;
        Ok(Self::with_state(state, human_seat, difficulty))
    }
}
