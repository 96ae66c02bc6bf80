//! Regular-season games and the game status shared with playoff games.

use crate::models::team::{SeasonId, TeamId};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a scheduled game.
pub type GameId = Uuid;

/// Lifecycle of a game. `Completed` is terminal.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameStatus {
    #[default]
    Scheduled,
    InProgress,
    Completed,
}

/// A regular-season game. Created in bulk by the scheduler; scores are entered elsewhere.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct ScheduledGame {
    pub id: GameId,
    pub season_id: SeasonId,
    pub home_team_id: TeamId,
    pub away_team_id: TeamId,
    pub game_date: NaiveDate,
    pub status: GameStatus,
}

impl ScheduledGame {
    pub fn new(
        season_id: SeasonId,
        home_team_id: TeamId,
        away_team_id: TeamId,
        game_date: NaiveDate,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            season_id,
            home_team_id,
            away_team_id,
            game_date,
            status: GameStatus::Scheduled,
        }
    }
}
