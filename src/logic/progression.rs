//! Playoff progression: start games, record winners and move them up the bracket.

use crate::models::{BracketId, BracketStatus, GameStatus, LeagueError, PlayoffGame, Slot, TeamId};
use crate::store::LeagueStore;
use serde::Serialize;

/// Outcome of [`advance_winner`].
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case", tag = "result")]
pub enum Advancement {
    /// Winner placed into the given next-round slot.
    Advanced {
        team_id: TeamId,
        round: u32,
        position: u32,
        slot: Slot,
    },
    /// The final was decided; the bracket is completed.
    Champion { team_id: TeamId },
    /// The game already had this winner; nothing was written.
    Unchanged { team_id: TeamId },
}

/// Winner of the final, once decided.
pub fn champion(games: &[PlayoffGame]) -> Option<TeamId> {
    let last_round = games.iter().map(|g| g.round).max()?;
    let finals: Vec<&PlayoffGame> = games.iter().filter(|g| g.round == last_round).collect();
    match finals.as_slice() {
        [final_game] if final_game.is_completed() => final_game.winner_id,
        _ => None,
    }
}

fn find_game(
    games: &[PlayoffGame],
    round: u32,
    position: u32,
) -> Result<&PlayoffGame, LeagueError> {
    games
        .iter()
        .find(|g| g.round == round && g.position == position)
        .ok_or(LeagueError::GameNotFound { round, position })
}

/// Both feeder games of a round > 1 game must be completed before it can be played.
fn ensure_feeders_completed(
    games: &[PlayoffGame],
    game: &PlayoffGame,
) -> Result<(), LeagueError> {
    let premature = LeagueError::PrematureAdvancement {
        round: game.round,
        position: game.position,
    };
    if game.round > 1 {
        let (first, second) = game.feeder_positions();
        for position in [first, second] {
            // A missing feeder means the stored tree is broken, not that the caller asked
            // for the wrong game.
            let feeder = find_game(games, game.round - 1, position).map_err(|_| {
                LeagueError::BracketCorruption {
                    round: game.round,
                    position: game.position,
                    slot: Slot::for_feeder(position),
                }
            })?;
            if !feeder.is_completed() {
                return Err(premature);
            }
        }
    }
    if game.home_team_id.is_none() || game.away_team_id.is_none() {
        return Err(premature);
    }
    Ok(())
}

/// Mark a game as being played (`scheduled` → `in_progress`).
///
/// The first game to start moves the bracket from setup to in progress. Starting a game
/// that is already in progress does nothing.
pub fn start_game<S: LeagueStore>(
    store: &mut S,
    bracket_id: BracketId,
    round: u32,
    position: u32,
) -> Result<(), LeagueError> {
    let bracket = store.get_bracket(bracket_id)?;
    let games = store.list_playoff_games(bracket_id)?;
    let game = find_game(&games, round, position)?;
    match game.status {
        GameStatus::InProgress => return Ok(()),
        GameStatus::Completed => return Err(LeagueError::InvalidState(bracket.status)),
        GameStatus::Scheduled => {}
    }
    ensure_feeders_completed(&games, game)?;

    let mut started = game.clone();
    started.status = GameStatus::InProgress;
    store.transaction(|s| {
        s.update_playoff_game(&started)?;
        if bracket.status == BracketStatus::Setup {
            s.set_bracket_status(bracket_id, BracketStatus::InProgress)?;
        }
        Ok(())
    })?;
    log::info!(
        "Bracket {}: round {} position {} started",
        bracket_id,
        round,
        position
    );
    Ok(())
}

/// Record the winner of a playoff game and advance it into the next round.
///
/// The winner goes to round `round + 1`, position `position / 2`: home slot if `position`
/// is even, away if odd. Repeating the call with the same winner is a no-op. A different
/// winner for a decided game, or a next-round slot already holding another team, is
/// rejected as [`LeagueError::BracketCorruption`] and nothing is written.
pub fn advance_winner<S: LeagueStore>(
    store: &mut S,
    bracket_id: BracketId,
    round: u32,
    position: u32,
    winner: TeamId,
) -> Result<Advancement, LeagueError> {
    let bracket = store.get_bracket(bracket_id)?;
    let games = store.list_playoff_games(bracket_id)?;
    let game = find_game(&games, round, position)?;

    let final_round = games.iter().map(|g| g.round).max().unwrap_or(round);
    let is_final = round == final_round;
    let (next_round, next_position, slot) = game.next_slot();

    // Decided games (byes included) are judged on their stored winner alone.
    if game.is_completed() {
        if game.winner_id == Some(winner) {
            return Ok(Advancement::Unchanged { team_id: winner });
        }
        if !game.has_team(winner) {
            return Err(LeagueError::InvalidWinner(winner));
        }
        log::warn!(
            "Bracket {}: round {} position {} already won by another team",
            bracket_id,
            round,
            position
        );
        let (round, position, slot) = if is_final {
            (round, position, Slot::for_feeder(position))
        } else {
            (next_round, next_position, slot)
        };
        return Err(LeagueError::BracketCorruption {
            round,
            position,
            slot,
        });
    }

    ensure_feeders_completed(&games, game)?;
    if !game.has_team(winner) {
        return Err(LeagueError::InvalidWinner(winner));
    }

    if !is_final {
        let next = find_game(&games, next_round, next_position)?;
        if let Some(existing) = next.slot(slot) {
            if existing != winner {
                log::warn!(
                    "Bracket {}: round {} position {} {:?} slot already holds {}",
                    bracket_id,
                    next_round,
                    next_position,
                    slot,
                    existing
                );
                return Err(LeagueError::BracketCorruption {
                    round: next_round,
                    position: next_position,
                    slot,
                });
            }
        }
    }

    let mut decided = game.clone();
    decided.winner_id = Some(winner);
    decided.status = GameStatus::Completed;
    store.transaction(|s| {
        s.update_playoff_game(&decided)?;
        if is_final {
            s.set_bracket_status(bracket_id, BracketStatus::Completed)
        } else {
            s.update_playoff_game_slot(bracket_id, next_round, next_position, slot, winner)?;
            if bracket.status == BracketStatus::Setup {
                s.set_bracket_status(bracket_id, BracketStatus::InProgress)?;
            }
            Ok(())
        }
    })?;

    if is_final {
        log::info!("Bracket {} completed, champion {}", bracket_id, winner);
        Ok(Advancement::Champion { team_id: winner })
    } else {
        log::info!(
            "Bracket {}: {} advances from round {} position {} to round {} position {} ({:?})",
            bracket_id,
            winner,
            round,
            position,
            next_round,
            next_position,
            slot
        );
        Ok(Advancement::Advanced {
            team_id: winner,
            round: next_round,
            position: next_position,
            slot,
        })
    }
}
