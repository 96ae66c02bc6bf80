//! Seeding: rank teams by win percentage and persist the seed list of a bracket.

use crate::models::{
    BracketId, BracketStatus, LeagueError, PlayoffTeam, SeedAssignment, SeedEntry, Team, TeamId,
};
use crate::store::LeagueStore;
use std::collections::HashSet;

/// Rank teams by win percentage, best first. Seed 1 = best record.
///
/// The sort is stable on a single key: teams with the same win percentage keep their
/// input order. No further tie-break is applied, so equal records are seeded by the order
/// the caller listed them in.
pub fn compute_seeds(teams: &[Team]) -> Vec<SeedEntry> {
    let mut ranked: Vec<(Team, f64)> = teams
        .iter()
        .map(|t| (t.clone(), t.win_percentage()))
        .collect();
    ranked.sort_by(|(_, a), (_, b)| b.total_cmp(a));
    ranked
        .into_iter()
        .zip(1u32..)
        .map(|((team, win_percentage), seed)| SeedEntry {
            team,
            win_percentage,
            seed,
        })
        .collect()
}

/// Check that `(team, seed)` pairs name at least two distinct teams and that the seeds are
/// exactly `1..=N`.
pub fn validate_seed_permutation(assignments: &[(TeamId, u32)]) -> Result<(), LeagueError> {
    if assignments.len() < 2 {
        return Err(LeagueError::InsufficientTeams {
            found: assignments.len(),
        });
    }
    let mut teams = HashSet::with_capacity(assignments.len());
    for &(team_id, _) in assignments {
        if !teams.insert(team_id) {
            return Err(LeagueError::DuplicateTeam(team_id));
        }
    }
    let mut seeds: Vec<u32> = assignments.iter().map(|&(_, seed)| seed).collect();
    seeds.sort_unstable();
    let expected = assignments.len();
    if seeds.iter().copied().ne(1..=expected as u32) {
        return Err(LeagueError::DuplicateSeed { expected });
    }
    Ok(())
}

/// Seed the given teams into a bracket by record, replacing any previous seeding.
///
/// Records are read once, as a snapshot, before anything is written. The old seed rows and
/// any game tree built from them are discarded in the same transaction that writes the new
/// rows. Returns the number of teams seeded.
pub fn seed_teams<S: LeagueStore>(
    store: &mut S,
    bracket_id: BracketId,
    team_ids: &[TeamId],
) -> Result<usize, LeagueError> {
    if team_ids.len() < 2 {
        return Err(LeagueError::InsufficientTeams {
            found: team_ids.len(),
        });
    }
    let bracket = store.get_bracket(bracket_id)?;
    if bracket.status != BracketStatus::Setup {
        return Err(LeagueError::InvalidState(bracket.status));
    }

    let mut seen = HashSet::with_capacity(team_ids.len());
    for &id in team_ids {
        if !seen.insert(id) {
            return Err(LeagueError::DuplicateTeam(id));
        }
    }

    let records = store.list_teams_with_record(bracket.season_id)?;
    let mut selected = Vec::with_capacity(team_ids.len());
    for &id in team_ids {
        match records.iter().find(|t| t.id == id) {
            Some(team) => selected.push(team.clone()),
            None => {
                // Distinguish an unknown team from one registered to another season.
                let team = store.get_team(id)?;
                return Err(LeagueError::TeamNotInSeason {
                    team_id: team.id,
                    season_id: bracket.season_id,
                });
            }
        }
    }

    let seeds = compute_seeds(&selected);
    for entry in &seeds {
        log::debug!(
            "Bracket {}: seed {} = {} ({:.3})",
            bracket_id,
            entry.seed,
            entry.team.name,
            entry.win_percentage
        );
    }
    let rows: Vec<PlayoffTeam> = seeds
        .iter()
        .map(|e| PlayoffTeam::new(bracket_id, e.team.id, e.seed))
        .collect();

    let count = store.transaction(|s| write_seed_rows(s, bracket_id, rows))?;
    log::info!("Seeded {} team(s) into bracket {}", count, bracket_id);
    Ok(count)
}

/// Manually reorder the seeds of teams already in a bracket.
///
/// Only the listed teams are patched, but the merged result must still be a permutation of
/// `1..=N` over every seeded team, otherwise nothing is written.
pub fn reseed_teams<S: LeagueStore>(
    store: &mut S,
    bracket_id: BracketId,
    assignments: &[SeedAssignment],
) -> Result<usize, LeagueError> {
    let bracket = store.get_bracket(bracket_id)?;
    if bracket.status != BracketStatus::Setup {
        return Err(LeagueError::InvalidState(bracket.status));
    }

    let mut rows = store.list_playoff_teams(bracket_id)?;
    let mut patched = HashSet::with_capacity(assignments.len());
    for a in assignments {
        if !patched.insert(a.team_id) {
            return Err(LeagueError::DuplicateTeam(a.team_id));
        }
        let row = rows
            .iter_mut()
            .find(|r| r.team_id == a.team_id)
            .ok_or(LeagueError::TeamNotFound(a.team_id))?;
        row.seed = a.seed;
    }

    let pairs: Vec<(TeamId, u32)> = rows.iter().map(|r| (r.team_id, r.seed)).collect();
    if let Err(e) = validate_seed_permutation(&pairs) {
        log::warn!("Rejected reseed of bracket {}: {}", bracket_id, e);
        return Err(e);
    }
    rows.sort_by_key(|r| r.seed);

    let count = store.transaction(|s| write_seed_rows(s, bracket_id, rows))?;
    log::info!("Reseeded {} team(s) in bracket {}", patched.len(), bracket_id);
    Ok(count)
}

/// Remove every seeded team (and the game tree built from them) from a bracket in setup.
pub fn clear_seeds<S: LeagueStore>(
    store: &mut S,
    bracket_id: BracketId,
) -> Result<usize, LeagueError> {
    let bracket = store.get_bracket(bracket_id)?;
    if bracket.status != BracketStatus::Setup {
        return Err(LeagueError::InvalidState(bracket.status));
    }
    let removed = store.list_playoff_teams(bracket_id)?.len();
    store.transaction(|s| write_seed_rows(s, bracket_id, Vec::new()))?;
    log::info!("Removed {} team(s) from bracket {}", removed, bracket_id);
    Ok(removed)
}

fn write_seed_rows<S: LeagueStore>(
    store: &mut S,
    bracket_id: BracketId,
    rows: Vec<PlayoffTeam>,
) -> Result<usize, LeagueError> {
    let discarded = store.clear_playoff_games(bracket_id)?;
    if discarded > 0 {
        log::info!(
            "Discarded {} playoff game(s) of bracket {} built from the old seeding",
            discarded,
            bracket_id
        );
    }
    store.replace_playoff_teams(bracket_id, rows)
}
