use crate::game::score::{Achievement, TeamScores};
use crate::game::state::{GameConfig, GameState, Phase};
use crate::model::card::Card;
use crate::model::deck::{Deck, DeckIntegrityError};
use crate::model::hand::Hand;
use crate::model::player::Player;
use crate::model::seat::Seat;
use crate::model::team::Team;
use crate::model::trick::Trick;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Plain serializable image of one game: enums, ids and nested card
/// data only. Cards are structural values, so the card a trick refers
/// to is the same logical card that left a hand -- no lookup table is
/// needed to survive the serialization boundary.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GameSnapshot {
    pub config: GameConfig,
    pub seed: u64,
    pub phase: Phase,
    pub players: Vec<PlayerData>,
    pub current_trick: TrickData,
    pub trick_history: Vec<TrickData>,
    pub scores: TeamScores,
    pub achievements: Vec<Achievement>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlayerData {
    pub name: String,
    pub team: Team,
    pub announced: bool,
    pub tricks_won: u8,
    pub hand: Vec<Card>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TrickData {
    pub leader: Seat,
    pub plays: Vec<(Seat, Card)>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SnapshotError {
    WrongPlayerCount(usize),
    Integrity(DeckIntegrityError),
    CorruptTrick(String),
}

impl fmt::Display for SnapshotError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SnapshotError::WrongPlayerCount(count) => {
                write!(f, "snapshot holds {count} players instead of 4")
            }
            SnapshotError::Integrity(err) => write!(f, "snapshot fails deck integrity: {err}"),
            SnapshotError::CorruptTrick(reason) => write!(f, "corrupt trick data: {reason}"),
        }
    }
}

impl std::error::Error for SnapshotError {}

impl From<DeckIntegrityError> for SnapshotError {
    fn from(err: DeckIntegrityError) -> Self {
        SnapshotError::Integrity(err)
    }
}

impl TrickData {
    fn capture(trick: &Trick) -> Self {
        TrickData {
            leader: trick.leader(),
            plays: trick
                .plays()
                .iter()
                .map(|play| (play.seat, play.card))
                .collect(),
        }
    }

    fn restore(self) -> Result<Trick, SnapshotError> {
        let mut trick = Trick::new(self.leader);
        for (seat, card) in self.plays {
            trick
                .play(seat, card)
                .map_err(|err| SnapshotError::CorruptTrick(err.to_string()))?;
        }
        Ok(trick)
    }
}

impl GameSnapshot {
    pub fn capture(state: &GameState) -> Self {
        GameSnapshot {
            config: state.config(),
            seed: state.seed(),
            phase: state.phase(),
            players: state
                .players()
                .iter()
                .map(|player| PlayerData {
                    name: player.name().to_string(),
                    team: player.team(),
                    announced: player.has_announced(),
                    tricks_won: player.tricks_won(),
                    hand: player.hand().cards().to_vec(),
                })
                .collect(),
            current_trick: TrickData::capture(state.current_trick()),
            trick_history: state.trick_history().iter().map(TrickData::capture).collect(),
            scores: *state.scores(),
            achievements: state.achievements().to_vec(),
        }
    }

    /// Rebuild a live state. Every card in play -- hands, the open trick
    /// and the archive -- must together form the exact double deck.
    pub fn restore(self) -> Result<GameState, SnapshotError> {
        if self.players.len() != 4 {
            return Err(SnapshotError::WrongPlayerCount(self.players.len()));
        }

        let current_trick = self.current_trick.restore()?;
        let trick_history = self
            .trick_history
            .into_iter()
            .map(TrickData::restore)
            .collect::<Result<Vec<_>, _>>()?;

        let mut players_iter = self.players.into_iter();
        let players: [Player; 4] = std::array::from_fn(|_| {
            let data = players_iter.next().expect("player count checked");
            let mut player = Player::new(data.name, Hand::with_cards(data.hand), data.team);
            player.restore_counters(data.tricks_won, data.announced);
            player
        });

        let in_play = players
            .iter()
            .flat_map(|player| player.hand().iter().copied())
            .chain(current_trick.plays().iter().map(|play| play.card))
            .chain(
                trick_history
                    .iter()
                    .flat_map(|trick| trick.plays().iter().map(|play| play.card)),
            )
            .collect::<Vec<_>>();
        Deck::validate(self.config.rank_set, &in_play)?;

        Ok(GameState::from_parts(
            self.config,
            self.seed,
            players,
            current_trick,
            trick_history,
            self.scores,
            self.achievements,
            self.phase,
        ))
    }

    pub fn to_json(state: &GameState) -> serde_json::Result<String> {
        let snapshot = Self::capture(state);
        serde_json::to_string_pretty(&snapshot)
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}
