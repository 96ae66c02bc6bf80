//! Data structures for the league: seasons, teams, games, playoff brackets and errors.

mod bracket;
mod error;
mod game;
mod team;

pub use bracket::{
    Bracket, BracketId, BracketStatus, BracketType, NewBracket, PlayoffGame, PlayoffGameId,
    PlayoffTeam, PlayoffTeamId, SeedAssignment, SeedEntry, Slot,
};
pub use error::LeagueError;
pub use game::{GameId, GameStatus, ScheduledGame};
pub use team::{Season, SeasonId, Team, TeamId};
