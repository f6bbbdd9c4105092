use crate::model::seat::Seat;
use crate::model::team::Team;
use crate::model::trick::Trick;
use crate::rules::trump::TrumpOrder;
use core::fmt;
use serde::{Deserialize, Serialize};

/// Running card-point totals per team, fed one archived trick at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TeamScores {
    re: u32,
    kontra: u32,
}

impl TeamScores {
    pub const fn new() -> Self {
        Self { re: 0, kontra: 0 }
    }

    pub fn add_trick(&mut self, team: Team, points: u32) {
        match team {
            Team::Re => self.re += points,
            Team::Kontra => self.kontra += points,
        }
    }

    pub const fn points(&self, team: Team) -> u32 {
        match team {
            Team::Re => self.re,
            Team::Kontra => self.kontra,
        }
    }
}

/// Extra point earned during play, recorded the moment its trick
/// completes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AchievementKind {
    /// A trump-suit Ace captured by the opposing team of its player.
    FoxCaught,
    /// The last trick won with a Jack of Clubs.
    Karlchen,
    /// A single trick worth 40 or more card points.
    Doppelkopf,
}

impl fmt::Display for AchievementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            AchievementKind::FoxCaught => "Fuchs gefangen",
            AchievementKind::Karlchen => "Karlchen",
            AchievementKind::Doppelkopf => "Doppelkopf",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Achievement {
    pub kind: AchievementKind,
    pub team: Team,
    pub winner: Seat,
    pub trick_index: usize,
}

/// Margin bonus against the losing team, each worth one game point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScoreBonus {
    Under90,
    Under60,
    Under30,
    Schwarz,
}

impl fmt::Display for ScoreBonus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ScoreBonus::Under90 => "keine 90",
            ScoreBonus::Under60 => "keine 60",
            ScoreBonus::Under30 => "keine 30",
            ScoreBonus::Schwarz => "schwarz",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameResult {
    pub winner: Team,
    pub re_points: u32,
    pub kontra_points: u32,
    pub bonuses: Vec<ScoreBonus>,
    pub achievements: Vec<Achievement>,
    pub game_value: u32,
}

/// Detect the per-trick achievements for one just-completed trick.
/// Called exactly once per trick, during play, never retroactively.
pub fn detect_achievements(
    trick: &Trick,
    trick_index: usize,
    total_tricks: usize,
    teams: &[Team; 4],
    order: &TrumpOrder,
) -> Vec<Achievement> {
    debug_assert!(trick.is_complete(), "achievements need a complete trick");
    let winner = match trick.winner(order) {
        Some(seat) => seat,
        None => return Vec::new(),
    };
    let winner_team = teams[winner.index()];
    let mut found = Vec::new();

    for play in trick.plays() {
        if order.is_fox(play.card) && teams[play.seat.index()] != winner_team {
            found.push(Achievement {
                kind: AchievementKind::FoxCaught,
                team: winner_team,
                winner,
                trick_index,
            });
        }
    }

    if trick_index + 1 == total_tricks {
        let winning_card = trick
            .current_winning_play(order)
            .expect("complete trick has plays")
            .card;
        if winning_card.is_jack_of_clubs() {
            found.push(Achievement {
                kind: AchievementKind::Karlchen,
                team: winner_team,
                winner,
                trick_index,
            });
        }
    }

    if trick.points() >= 40 {
        found.push(Achievement {
            kind: AchievementKind::Doppelkopf,
            team: winner_team,
            winner,
            trick_index,
        });
    }

    found
}

impl GameResult {
    /// Re-derive the final score from the archived tricks. Deterministic
    /// and reproducible; the caller cross-checks the running totals
    /// against this.
    pub fn tally(
        tricks: &[Trick],
        teams: &[Team; 4],
        achievements: &[Achievement],
        order: &TrumpOrder,
    ) -> Self {
        let mut scores = TeamScores::new();
        let mut trick_wins = [0u32; 2];
        for trick in tricks {
            let winner = trick.winner(order).expect("archived trick has a winner");
            let team = teams[winner.index()];
            scores.add_trick(team, trick.points());
            trick_wins[(team == Team::Kontra) as usize] += 1;
        }

        let re_points = scores.points(Team::Re);
        let kontra_points = scores.points(Team::Kontra);
        // Re must reach 121; Kontra takes the 120:120 split.
        let winner = if re_points >= 121 {
            Team::Re
        } else {
            Team::Kontra
        };
        let loser = winner.opponent();
        let loser_points = scores.points(loser);
        let loser_tricks = trick_wins[(loser == Team::Kontra) as usize];

        let mut bonuses = Vec::new();
        if loser_points < 90 {
            bonuses.push(ScoreBonus::Under90);
        }
        if loser_points < 60 {
            bonuses.push(ScoreBonus::Under60);
        }
        if loser_points < 30 {
            bonuses.push(ScoreBonus::Under30);
        }
        if loser_tricks == 0 {
            bonuses.push(ScoreBonus::Schwarz);
        }

        let game_value = 1 + bonuses.len() as u32 + achievements.len() as u32;

        GameResult {
            winner,
            re_points,
            kontra_points,
            bonuses,
            achievements: achievements.to_vec(),
            game_value,
        }
    }
}
