//! Playoffs: build the single-elimination game tree from a bracket's seeds.
//!
//! Round 1 has `B / 2` games where `B` is the smallest power of two holding every team;
//! each later round halves the game count down to the final. Round `r` position `p` feeds
//! round `r + 1` position `p / 2`, as home when `p` is even and away when odd.

use crate::logic::seeding::validate_seed_permutation;
use crate::models::{
    BracketId, BracketStatus, BracketType, GameStatus, LeagueError, PlayoffGame, PlayoffTeam,
    Slot, TeamId,
};
use crate::store::LeagueStore;

/// Smallest power of two that is at least `team_count`.
pub fn bracket_size(team_count: usize) -> usize {
    team_count.next_power_of_two()
}

/// Number of rounds for a bracket of `bracket_size` (a power of two): `log2(bracket_size)`.
pub fn round_count(bracket_size: usize) -> u32 {
    bracket_size.trailing_zeros()
}

/// Seeds in round-1 draw order, e.g. `1, 8, 4, 5, 2, 7, 3, 6` for 8.
///
/// Built by repeatedly replacing each seed `s` with `s, m + 1 - s` where `m` is the doubled
/// size, so the top two seeds sit in opposite halves and can only meet in the final.
pub fn seeding_order(bracket_size: usize) -> Vec<u32> {
    let mut order = vec![1u32];
    while order.len() < bracket_size {
        let size = order.len() as u32 * 2;
        order = order.iter().flat_map(|&s| [s, size + 1 - s]).collect();
    }
    order
}

/// Round-1 pairings `(better seed, worse seed)` in position order. Each pair is
/// `(i, B + 1 - i)`.
pub fn first_round_pairings(bracket_size: usize) -> Vec<(u32, u32)> {
    seeding_order(bracket_size)
        .chunks_exact(2)
        .map(|pair| (pair[0], pair[1]))
        .collect()
}

/// Build every game of the bracket, round 1 through the final.
///
/// The better seed plays at home. When the worse seed of a round-1 pair does not exist the
/// game is a bye: it is created already completed with the better seed as winner, and that
/// team is placed in its round-2 slot.
pub fn build_bracket_games(
    bracket_id: BracketId,
    teams: &[PlayoffTeam],
) -> Result<Vec<PlayoffGame>, LeagueError> {
    let pairs: Vec<(TeamId, u32)> = teams.iter().map(|t| (t.team_id, t.seed)).collect();
    validate_seed_permutation(&pairs)?;

    let mut by_seed = teams.to_vec();
    by_seed.sort_by_key(|t| t.seed);
    let team_for = |seed: u32| by_seed.get(seed as usize - 1).map(|t| t.team_id);

    let size = bracket_size(teams.len());
    let rounds = round_count(size);
    let mut games = Vec::with_capacity(size - 1);
    for round in 1..=rounds {
        for position in 0..(size >> round) as u32 {
            games.push(PlayoffGame::new(bracket_id, round, position));
        }
    }

    let mut byes: Vec<((u32, u32, Slot), TeamId)> = Vec::new();
    for (game, (high, low)) in games.iter_mut().zip(first_round_pairings(size)) {
        game.home_team_id = team_for(high);
        game.away_team_id = team_for(low);
        if game.away_team_id.is_none() {
            game.winner_id = game.home_team_id;
            game.status = GameStatus::Completed;
            game.is_bye = true;
            if let Some(team) = game.home_team_id {
                byes.push((game.next_slot(), team));
            }
        }
    }

    for ((round, position, slot), team) in byes {
        if let Some(next) = games
            .iter_mut()
            .find(|g| g.round == round && g.position == position)
        {
            next.set_slot(slot, team);
        }
    }

    Ok(games)
}

/// Generate (or regenerate) the game tree of a bracket in setup from its current seeds.
/// Returns the number of games created, byes included.
pub fn generate_bracket<S: LeagueStore>(
    store: &mut S,
    bracket_id: BracketId,
) -> Result<usize, LeagueError> {
    let bracket = store.get_bracket(bracket_id)?;
    if bracket.bracket_type != BracketType::SingleElimination {
        return Err(LeagueError::UnsupportedBracketType(bracket.bracket_type));
    }
    if bracket.status != BracketStatus::Setup {
        return Err(LeagueError::InvalidState(bracket.status));
    }

    let teams = store.list_playoff_teams(bracket_id)?;
    let games = build_bracket_games(bracket_id, &teams)?;
    let byes = games.iter().filter(|g| g.is_bye).count();

    let created = store.transaction(|s| {
        s.clear_playoff_games(bracket_id)?;
        s.insert_playoff_games(bracket_id, games)
    })?;
    log::info!(
        "Generated bracket {} ({}): {} team(s), {} game(s), {} bye(s)",
        bracket_id,
        bracket.name,
        teams.len(),
        created,
        byes
    );
    Ok(created)
}
