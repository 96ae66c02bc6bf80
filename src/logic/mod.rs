//! League business logic: seeding, regular-season scheduling, bracket building and progression.

mod bracket;
mod progression;
mod schedule;
mod seeding;

pub use bracket::{
    bracket_size, build_bracket_games, first_round_pairings, generate_bracket, round_count,
    seeding_order,
};
pub use progression::{advance_winner, champion, start_game, Advancement};
pub use schedule::{generate_schedule, round_robin_games, GAME_SPACING_DAYS};
pub use seeding::{
    clear_seeds, compute_seeds, reseed_teams, seed_teams, validate_seed_permutation,
};
