use crate::controller::{BotMove, GameController, PlayReport, SessionError};
use doko_bot::BotDifficulty;
use doko_core::model::card::Card;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::info;

/// Simulated thinking time per difficulty tier. The wait is an await
/// point, never a blocking sleep, so a reset can overtake it.
#[derive(Debug, Clone, Copy)]
pub struct ThinkingDelays {
    pub easy: Duration,
    pub medium: Duration,
    pub hard: Duration,
}

impl ThinkingDelays {
    pub const fn standard() -> Self {
        Self {
            easy: Duration::from_millis(400),
            medium: Duration::from_millis(900),
            hard: Duration::from_millis(1300),
        }
    }

    /// Instant decisions, for headless runs and tests.
    pub const fn none() -> Self {
        Self {
            easy: Duration::ZERO,
            medium: Duration::ZERO,
            hard: Duration::ZERO,
        }
    }

    pub const fn for_tier(&self, difficulty: BotDifficulty) -> Duration {
        match difficulty {
            BotDifficulty::Easy => self.easy,
            BotDifficulty::Medium => self.medium,
            BotDifficulty::Hard => self.hard,
        }
    }
}

/// Async shell around one `GameController`. The mutex serializes every
/// state mutation; the generation counter invalidates bot decisions
/// that outlive a reset, so a stale pick can never land in a new game.
pub struct Session {
    inner: Arc<Mutex<GameController>>,
    generation: Arc<AtomicU64>,
    bot_thinking: Arc<AtomicBool>,
    delays: ThinkingDelays,
}

impl Session {
    pub fn new(controller: GameController, delays: ThinkingDelays) -> Self {
        Self {
            inner: Arc::new(Mutex::new(controller)),
            generation: Arc::new(AtomicU64::new(0)),
            bot_thinking: Arc::new(AtomicBool::new(false)),
            delays,
        }
    }

    pub async fn with_controller<T>(&self, f: impl FnOnce(&GameController) -> T) -> T {
        let ctrl = self.inner.lock().await;
        f(&ctrl)
    }

    /// The learner's move. Refused outright while a bot decision is
    /// pending; the two never interleave.
    pub async fn submit_human(&self, card: Card) -> Result<PlayReport, SessionError> {
        if self.bot_thinking.load(Ordering::SeqCst) {
            return Err(SessionError::BotPending);
        }
        let mut ctrl = self.inner.lock().await;
        ctrl.play_human(card)
    }

    pub async fn announce(
        &self,
        seat: doko_core::model::seat::Seat,
        team: doko_core::model::team::Team,
    ) -> Result<(), SessionError> {
        let mut ctrl = self.inner.lock().await;
        ctrl.announce(seat, team)
    }

    /// Run every queued bot turn, one simulated think at a time, until
    /// the human is up or the game leaves the play phase. A reset
    /// during a think drops that decision on the floor.
    pub async fn advance_bots(&self) -> Result<Vec<BotMove>, SessionError> {
        let mut moves = Vec::new();
        loop {
            let (difficulty, generation) = {
                let ctrl = self.inner.lock().await;
                if !ctrl.awaiting_bot() {
                    break;
                }
                (ctrl.difficulty(), self.generation.load(Ordering::SeqCst))
            };

            self.bot_thinking.store(true, Ordering::SeqCst);
            tokio::time::sleep(self.delays.for_tier(difficulty)).await;
            self.bot_thinking.store(false, Ordering::SeqCst);

            let mut ctrl = self.inner.lock().await;
            if self.generation.load(Ordering::SeqCst) != generation {
                info!("bot decision outlived a session reset; dropped");
                break;
            }
            if !ctrl.awaiting_bot() {
                break;
            }
            moves.push(ctrl.play_bot()?);
        }
        Ok(moves)
    }

    /// Replace the running game. Any pending bot decision becomes
    /// stale and will not be applied.
    pub async fn reset(&self, controller: GameController) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        let mut ctrl = self.inner.lock().await;
        *ctrl = controller;
    }
}
