//! Regular season: double round-robin schedule generation.

use crate::models::{LeagueError, ScheduledGame, SeasonId, Team};
use crate::store::LeagueStore;
use chrono::{Days, NaiveDate};

/// Days between two consecutive generated games.
pub const GAME_SPACING_DAYS: u64 = 7;

/// Build a home-and-away round robin: every pair of teams meets twice, once at each home.
///
/// For each index pair `i < j` the game `i` (home) vs `j` is emitted, then `j` vs `i`. The
/// k-th emitted game (0-based) is dated `base_date + 7k days`. Dates are not grouped into
/// balanced weekly rounds: each game is one week after the previous one, whoever plays.
pub fn round_robin_games(
    season_id: SeasonId,
    teams: &[Team],
    base_date: NaiveDate,
) -> Result<Vec<ScheduledGame>, LeagueError> {
    if teams.len() < 2 {
        return Err(LeagueError::InsufficientTeams { found: teams.len() });
    }

    let mut games = Vec::with_capacity(teams.len() * (teams.len() - 1));
    for (i, home) in teams.iter().enumerate() {
        for away in &teams[i + 1..] {
            for (h, a) in [(home, away), (away, home)] {
                let date = game_date(base_date, games.len());
                games.push(ScheduledGame::new(season_id, h.id, a.id, date));
            }
        }
    }
    Ok(games)
}

fn game_date(base_date: NaiveDate, index: usize) -> NaiveDate {
    // Clamped at the end of chrono's calendar.
    base_date
        .checked_add_days(Days::new(GAME_SPACING_DAYS * index as u64))
        .unwrap_or(NaiveDate::MAX)
}

/// Generate and insert the full regular-season schedule of a season. Returns games created.
///
/// Running it twice schedules every game twice: clear the old games first when
/// regenerating.
pub fn generate_schedule<S: LeagueStore>(
    store: &mut S,
    season_id: SeasonId,
    base_date: NaiveDate,
) -> Result<usize, LeagueError> {
    let teams = store.list_teams(season_id)?;
    let games = round_robin_games(season_id, &teams, base_date)?;
    for g in &games {
        log::debug!(
            "Season {}: {} vs {} on {}",
            season_id,
            g.home_team_id,
            g.away_team_id,
            g.game_date
        );
    }
    let created = store.transaction(|s| s.insert_games(season_id, games))?;
    log::info!(
        "Generated {} game(s) for {} team(s) in season {}",
        created,
        teams.len(),
        season_id
    );
    Ok(created)
}
