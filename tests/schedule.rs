//! Integration tests for the regular-season round robin.

use chrono::NaiveDate;
use league_playoffs::{
    generate_schedule, round_robin_games, GameStatus, LeagueError, MemoryStore, SeasonId, Team,
    TeamId,
};
use proptest::prelude::*;
use std::collections::HashSet;
use uuid::Uuid;

fn base_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 1, 6).unwrap()
}

fn roster(season_id: SeasonId, n: usize) -> Vec<Team> {
    (0..n).map(|i| Team::new(season_id, format!("T{i}"))).collect()
}

#[test]
fn three_teams_play_home_and_away() {
    let season_id = Uuid::new_v4();
    let teams = roster(season_id, 3);
    let games = round_robin_games(season_id, &teams, base_date()).unwrap();

    let pairs: Vec<(TeamId, TeamId)> = games
        .iter()
        .map(|g| (g.home_team_id, g.away_team_id))
        .collect();
    let (a, b, c) = (teams[0].id, teams[1].id, teams[2].id);
    assert_eq!(pairs, vec![(a, b), (b, a), (a, c), (c, a), (b, c), (c, b)]);
    assert!(games
        .iter()
        .all(|g| g.season_id == season_id && g.status == GameStatus::Scheduled));
}

#[test]
fn each_game_is_one_week_after_the_previous() {
    let season_id = Uuid::new_v4();
    let games = round_robin_games(season_id, &roster(season_id, 4), base_date()).unwrap();
    assert_eq!(games.len(), 12);
    assert_eq!(games[0].game_date, base_date());
    assert_eq!(games[1].game_date, NaiveDate::from_ymd_opt(2025, 1, 13).unwrap());
    for (k, g) in games.iter().enumerate() {
        let days = (g.game_date - base_date()).num_days();
        assert_eq!(days, 7 * k as i64);
    }
}

#[test]
fn fewer_than_two_teams_is_rejected() {
    let season_id = Uuid::new_v4();
    assert_eq!(
        round_robin_games(season_id, &[], base_date()),
        Err(LeagueError::InsufficientTeams { found: 0 })
    );
    assert_eq!(
        round_robin_games(season_id, &roster(season_id, 1), base_date()),
        Err(LeagueError::InsufficientTeams { found: 1 })
    );
}

#[test]
fn generate_schedule_inserts_all_games() {
    let mut store = MemoryStore::new();
    let season = store.create_season("Spring");
    for name in ["Aces", "Blocks", "Digs", "Kills", "Sets"] {
        store.add_team(season.id, name).unwrap();
    }
    let created = generate_schedule(&mut store, season.id, base_date()).unwrap();
    assert_eq!(created, 20);
    assert_eq!(store.list_games(season.id).unwrap().len(), 20);
}

#[test]
fn generate_schedule_with_one_team_creates_nothing() {
    let mut store = MemoryStore::new();
    let season = store.create_season("Spring");
    store.add_team(season.id, "Lonely").unwrap();
    assert_eq!(
        generate_schedule(&mut store, season.id, base_date()),
        Err(LeagueError::InsufficientTeams { found: 1 })
    );
    assert!(store.list_games(season.id).unwrap().is_empty());
}

#[test]
fn generate_schedule_unknown_season() {
    let mut store = MemoryStore::new();
    let missing = Uuid::new_v4();
    assert_eq!(
        generate_schedule(&mut store, missing, base_date()),
        Err(LeagueError::SeasonNotFound(missing))
    );
}

#[test]
fn rerunning_appends_until_cleared() {
    let mut store = MemoryStore::new();
    let season = store.create_season("Spring");
    store.add_team(season.id, "A").unwrap();
    store.add_team(season.id, "B").unwrap();
    generate_schedule(&mut store, season.id, base_date()).unwrap();
    generate_schedule(&mut store, season.id, base_date()).unwrap();
    assert_eq!(store.list_games(season.id).unwrap().len(), 4);

    assert_eq!(store.clear_games(season.id).unwrap(), 4);
    generate_schedule(&mut store, season.id, base_date()).unwrap();
    assert_eq!(store.list_games(season.id).unwrap().len(), 2);
}

proptest! {
    #[test]
    fn every_ordered_pair_meets_exactly_once(n in 2usize..12) {
        let season_id = Uuid::new_v4();
        let teams = roster(season_id, n);
        let games = round_robin_games(season_id, &teams, base_date()).unwrap();

        prop_assert_eq!(games.len(), n * (n - 1));
        let mut seen = HashSet::new();
        for g in &games {
            prop_assert_ne!(g.home_team_id, g.away_team_id);
            prop_assert!(seen.insert((g.home_team_id, g.away_team_id)));
        }
        for home in &teams {
            for away in &teams {
                if home.id != away.id {
                    prop_assert!(seen.contains(&(home.id, away.id)));
                }
            }
        }
    }
}
