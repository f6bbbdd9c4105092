mod heuristic;

pub use heuristic::HeuristicPolicy;

use doko_core::game::state::GameState;
use doko_core::model::card::Card;
use doko_core::model::hand::Hand;
use doko_core::model::seat::Seat;
use std::sync::OnceLock;

/// Context handed to a policy for one decision. Policies only read;
/// the orchestrator owns every mutation.
pub struct PolicyContext<'a> {
    pub seat: Seat,
    pub hand: &'a Hand,
    pub state: &'a GameState,
}

/// Unified interface for computer opponents. A policy that cannot
/// produce a card reports `None`; the caller logs and falls back.
pub trait Policy: Send {
    fn choose_play(&mut self, ctx: &PolicyContext) -> Option<Card>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BotDifficulty {
    Easy,
    Medium,
    // TODO: design a genuinely stronger tier; until then Hard plays the
    // Medium heuristic unchanged.
    Hard,
}

impl Default for BotDifficulty {
    fn default() -> Self {
        Self::Medium
    }
}

impl BotDifficulty {
    pub fn from_env() -> Self {
        static CACHED: OnceLock<BotDifficulty> = OnceLock::new();
        *CACHED.get_or_init(|| match std::env::var("DOKO_BOT_DIFFICULTY") {
            Ok(raw) => match raw.trim().to_ascii_lowercase().as_str() {
                "easy" => BotDifficulty::Easy,
                "medium" => BotDifficulty::Medium,
                "normal" => BotDifficulty::Medium,
                "hard" => BotDifficulty::Hard,
                _ => BotDifficulty::default(),
            },
            Err(_) => BotDifficulty::default(),
        })
    }

    pub const fn label(self) -> &'static str {
        match self {
            BotDifficulty::Easy => "easy",
            BotDifficulty::Medium => "medium",
            BotDifficulty::Hard => "hard",
        }
    }
}
