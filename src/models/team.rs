//! Season and Team data structures.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a season.
pub type SeasonId = Uuid;

/// Unique identifier for a team (used in games, brackets and lookups).
pub type TeamId = Uuid;

/// A season of a league. Owns its teams, scheduled games and playoff brackets.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Season {
    pub id: SeasonId,
    pub name: String,
}

impl Season {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
        }
    }
}

/// A team registered to exactly one season.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Team {
    pub id: TeamId,
    pub name: String,
    pub season_id: SeasonId,
    /// Updated by game-result application; read as a snapshot by seeding.
    pub wins: u32,
    pub losses: u32,
}

impl Team {
    /// Create a new team with the given name. Record starts at 0-0.
    pub fn new(season_id: SeasonId, name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            season_id,
            wins: 0,
            losses: 0,
        }
    }

    /// Same team with the given win/loss record.
    pub fn with_record(mut self, wins: u32, losses: u32) -> Self {
        self.wins = wins;
        self.losses = losses;
        self
    }

    /// Widened so a record near `u32::MAX` cannot overflow.
    pub fn games_played(&self) -> u64 {
        u64::from(self.wins) + u64::from(self.losses)
    }

    /// `wins / (wins + losses)`, or 0 when no game has been played.
    pub fn win_percentage(&self) -> f64 {
        match self.games_played() {
            0 => 0.0,
            played => f64::from(self.wins) / played as f64,
        }
    }
}
