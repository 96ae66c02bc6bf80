//! League playoffs web app: library with models, scheduling and bracket logic, and storage.

pub mod config;
pub mod logic;
pub mod models;
pub mod store;

pub use config::{ConfigError, ServerConfig};
pub use logic::{
    advance_winner, bracket_size, build_bracket_games, champion, clear_seeds, compute_seeds,
    first_round_pairings, generate_bracket, generate_schedule, reseed_teams, round_count,
    round_robin_games, seed_teams, seeding_order, start_game, validate_seed_permutation,
    Advancement, GAME_SPACING_DAYS,
};
pub use models::{
    Bracket, BracketId, BracketStatus, BracketType, GameId, GameStatus, LeagueError, NewBracket,
    PlayoffGame, PlayoffGameId, PlayoffTeam, PlayoffTeamId, ScheduledGame, Season, SeasonId,
    SeedAssignment, SeedEntry, Slot, Team, TeamId,
};
pub use store::{LeagueStore, MemoryStore};
