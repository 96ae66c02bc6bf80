//! Errors that can occur during scheduling, seeding and bracket operations.

use crate::models::bracket::{BracketId, BracketStatus, BracketType, Slot};
use crate::models::team::{SeasonId, TeamId};
use thiserror::Error;

/// Every variant is a validation failure detected before anything is written.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum LeagueError {
    /// Pairing or seeding needs at least two teams.
    #[error("Need at least 2 teams (got {found})")]
    InsufficientTeams { found: usize },

    /// Seeds are not a permutation of 1..N.
    #[error("Seeds must be exactly 1..={expected} with no duplicates")]
    DuplicateSeed { expected: usize },

    /// The same team was listed twice.
    #[error("Team {0} is listed more than once")]
    DuplicateTeam(TeamId),

    #[error("Season not found")]
    SeasonNotFound(SeasonId),

    #[error("Team not found")]
    TeamNotFound(TeamId),

    /// The team belongs to another season than the bracket or schedule.
    #[error("Team {team_id} does not belong to season {season_id}")]
    TeamNotInSeason { team_id: TeamId, season_id: SeasonId },

    #[error("Bracket not found")]
    BracketNotFound(BracketId),

    #[error("No playoff game at round {round}, position {position}")]
    GameNotFound { round: u32, position: u32 },

    /// A slot already holds a different team (or a game already has another winner).
    #[error("Round {round} position {position} {slot:?} slot already holds another team")]
    BracketCorruption { round: u32, position: u32, slot: Slot },

    /// Feeder games of this game have not both been completed.
    #[error("Round {round} position {position} is waiting on its feeder games")]
    PrematureAdvancement { round: u32, position: u32 },

    /// The winner is not playing in this game.
    #[error("Team {0} is not playing in this game")]
    InvalidWinner(TeamId),

    /// Bracket or game is not in a state that allows this action.
    #[error("Invalid state for this action (bracket is {0:?})")]
    InvalidState(BracketStatus),

    #[error("Bracket type {0} cannot be generated")]
    UnsupportedBracketType(BracketType),
}

impl LeagueError {
    /// Stable taxonomy tag for API consumers.
    pub fn code(&self) -> &'static str {
        match self {
            LeagueError::InsufficientTeams { .. } => "InsufficientTeams",
            LeagueError::DuplicateSeed { .. } => "DuplicateSeed",
            LeagueError::DuplicateTeam(_) => "DuplicateTeam",
            LeagueError::SeasonNotFound(_) => "SeasonNotFound",
            LeagueError::TeamNotFound(_) => "TeamNotFound",
            LeagueError::TeamNotInSeason { .. } => "TeamNotInSeason",
            LeagueError::BracketNotFound(_) => "BracketNotFound",
            LeagueError::GameNotFound { .. } => "GameNotFound",
            LeagueError::BracketCorruption { .. } => "BracketCorruption",
            LeagueError::PrematureAdvancement { .. } => "PrematureAdvancement",
            LeagueError::InvalidWinner(_) => "InvalidWinner",
            LeagueError::InvalidState(_) => "InvalidState",
            LeagueError::UnsupportedBracketType(_) => "UnsupportedBracketType",
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            LeagueError::SeasonNotFound(_)
                | LeagueError::TeamNotFound(_)
                | LeagueError::BracketNotFound(_)
                | LeagueError::GameNotFound { .. }
        )
    }
}
