use core::fmt;
use serde::{Deserialize, Serialize};

/// The two hidden parties. Membership is decided by possession of a
/// Queen of Clubs and stays fixed for the whole game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Team {
    Re,
    Kontra,
}

impl Team {
    pub const fn opponent(self) -> Team {
        match self {
            Team::Re => Team::Kontra,
            Team::Kontra => Team::Re,
        }
    }
}

impl fmt::Display for Team {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Team::Re => "Re",
            Team::Kontra => "Kontra",
        };
        f.write_str(label)
    }
}
