//! Integration tests for bracket building: draw order, round structure and byes.

use league_playoffs::{
    bracket_size, build_bracket_games, first_round_pairings, generate_bracket, round_count,
    seed_teams, seeding_order, BracketType, GameStatus, LeagueError, LeagueStore, MemoryStore,
    NewBracket, PlayoffGame, PlayoffTeam, TeamId,
};
use uuid::Uuid;

/// Seed rows 1..=n for fresh team ids; index i holds seed i + 1.
fn seeded(bracket_id: Uuid, n: u32) -> Vec<PlayoffTeam> {
    (1..=n)
        .map(|seed| PlayoffTeam::new(bracket_id, Uuid::new_v4(), seed))
        .collect()
}

fn game(games: &[PlayoffGame], round: u32, position: u32) -> &PlayoffGame {
    games
        .iter()
        .find(|g| g.round == round && g.position == position)
        .unwrap()
}

#[test]
fn size_and_round_count() {
    assert_eq!(bracket_size(2), 2);
    assert_eq!(bracket_size(5), 8);
    assert_eq!(bracket_size(8), 8);
    assert_eq!(bracket_size(9), 16);
    assert_eq!(round_count(2), 1);
    assert_eq!(round_count(8), 3);
    assert_eq!(round_count(16), 4);
}

#[test]
fn draw_order_keeps_top_seeds_apart() {
    assert_eq!(seeding_order(2), vec![1, 2]);
    assert_eq!(seeding_order(4), vec![1, 4, 2, 3]);
    assert_eq!(seeding_order(8), vec![1, 8, 4, 5, 2, 7, 3, 6]);
}

#[test]
fn eight_team_pairings() {
    let pairs = first_round_pairings(8);
    let mut sorted = pairs.clone();
    sorted.sort();
    assert_eq!(sorted, vec![(1, 8), (2, 7), (3, 6), (4, 5)]);
    for (high, low) in pairs {
        assert_eq!(high + low, 9);
    }
}

#[test]
fn full_bracket_of_eight() {
    let bracket_id = Uuid::new_v4();
    let teams = seeded(bracket_id, 8);
    let games = build_bracket_games(bracket_id, &teams).unwrap();

    assert_eq!(games.len(), 7);
    for (round, count) in [(1, 4), (2, 2), (3, 1)] {
        assert_eq!(games.iter().filter(|g| g.round == round).count(), count);
    }
    let seed_of = |id: Option<TeamId>| teams.iter().find(|t| Some(t.team_id) == id).unwrap().seed;
    let round_one: Vec<(u32, u32)> = (0..4)
        .map(|p| {
            let g = game(&games, 1, p);
            (seed_of(g.home_team_id), seed_of(g.away_team_id))
        })
        .collect();
    assert_eq!(round_one, vec![(1, 8), (4, 5), (2, 7), (3, 6)]);
    assert!(games.iter().all(|g| !g.is_bye && g.status == GameStatus::Scheduled));
    assert!(games
        .iter()
        .filter(|g| g.round > 1)
        .all(|g| g.home_team_id.is_none() && g.away_team_id.is_none()));
}

#[test]
fn two_teams_play_only_a_final() {
    let bracket_id = Uuid::new_v4();
    let teams = seeded(bracket_id, 2);
    let games = build_bracket_games(bracket_id, &teams).unwrap();
    assert_eq!(games.len(), 1);
    assert_eq!(games[0].round, 1);
    assert_eq!(games[0].home_team_id, Some(teams[0].team_id));
    assert_eq!(games[0].away_team_id, Some(teams[1].team_id));
}

#[test]
fn byes_advance_top_seeds() {
    let bracket_id = Uuid::new_v4();
    let teams = seeded(bracket_id, 5);
    let games = build_bracket_games(bracket_id, &teams).unwrap();
    let team = |seed: usize| Some(teams[seed - 1].team_id);

    // Draw 1-8, 4-5, 2-7, 3-6: seeds 6, 7 and 8 do not exist.
    let byes: Vec<u32> = games.iter().filter(|g| g.is_bye).map(|g| g.position).collect();
    assert_eq!(byes, vec![0, 2, 3]);
    let bye = game(&games, 1, 0);
    assert_eq!(bye.winner_id, team(1));
    assert_eq!(bye.away_team_id, None);
    assert_eq!(bye.status, GameStatus::Completed);

    let real = game(&games, 1, 1);
    assert_eq!((real.home_team_id, real.away_team_id), (team(4), team(5)));
    assert_eq!(real.status, GameStatus::Scheduled);

    let semi_top = game(&games, 2, 0);
    assert_eq!((semi_top.home_team_id, semi_top.away_team_id), (team(1), None));
    let semi_bottom = game(&games, 2, 1);
    assert_eq!(
        (semi_bottom.home_team_id, semi_bottom.away_team_id),
        (team(2), team(3))
    );
}

#[test]
fn three_teams_give_one_bye() {
    let bracket_id = Uuid::new_v4();
    let teams = seeded(bracket_id, 3);
    let games = build_bracket_games(bracket_id, &teams).unwrap();
    assert_eq!(games.len(), 3);
    assert_eq!(games.iter().filter(|g| g.is_bye).count(), 1);
    let final_game = game(&games, 2, 0);
    assert_eq!(final_game.home_team_id, Some(teams[0].team_id));
    assert_eq!(final_game.away_team_id, None);
}

#[test]
fn builder_validates_seeds() {
    let bracket_id = Uuid::new_v4();
    assert_eq!(
        build_bracket_games(bracket_id, &seeded(bracket_id, 1)),
        Err(LeagueError::InsufficientTeams { found: 1 })
    );
    let mut teams = seeded(bracket_id, 4);
    teams[3].seed = 2;
    assert_eq!(
        build_bracket_games(bracket_id, &teams),
        Err(LeagueError::DuplicateSeed { expected: 4 })
    );
}

fn store_with_bracket(n: usize, bracket_type: BracketType) -> (MemoryStore, Uuid) {
    let mut store = MemoryStore::new();
    let season = store.create_season("Spring");
    let ids: Vec<TeamId> = (0..n)
        .map(|i| {
            let team = store.add_team(season.id, format!("T{i}")).unwrap();
            store.set_team_record(team.id, (n - i) as u32, i as u32).unwrap();
            team.id
        })
        .collect();
    let bracket = store
        .create_bracket(
            season.id,
            NewBracket {
                name: "Playoffs".to_string(),
                bracket_type,
                ..Default::default()
            },
        )
        .unwrap();
    seed_teams(&mut store, bracket.id, &ids).unwrap();
    (store, bracket.id)
}

#[test]
fn generate_bracket_persists_tree() {
    let (mut store, bracket_id) = store_with_bracket(6, BracketType::SingleElimination);
    assert_eq!(generate_bracket(&mut store, bracket_id).unwrap(), 7);

    let games = store.list_playoff_games(bracket_id).unwrap();
    let order: Vec<(u32, u32)> = games.iter().map(|g| (g.round, g.position)).collect();
    assert_eq!(
        order,
        vec![(1, 0), (1, 1), (1, 2), (1, 3), (2, 0), (2, 1), (3, 0)]
    );
    assert_eq!(games.iter().filter(|g| g.is_bye).count(), 2);

    // Regenerating in setup replaces the tree.
    assert_eq!(generate_bracket(&mut store, bracket_id).unwrap(), 7);
    assert_eq!(store.list_playoff_games(bracket_id).unwrap().len(), 7);
}

#[test]
fn generate_bracket_rejects_other_formats() {
    let (mut store, bracket_id) = store_with_bracket(4, BracketType::DoubleElimination);
    assert_eq!(
        generate_bracket(&mut store, bracket_id),
        Err(LeagueError::UnsupportedBracketType(
            BracketType::DoubleElimination
        ))
    );
    assert!(store.list_playoff_games(bracket_id).unwrap().is_empty());
}

#[test]
fn generate_bracket_without_seeds() {
    let mut store = MemoryStore::new();
    let season = store.create_season("Spring");
    let bracket = store
        .create_bracket(
            season.id,
            NewBracket {
                name: "Empty".to_string(),
                ..Default::default()
            },
        )
        .unwrap();
    assert_eq!(
        generate_bracket(&mut store, bracket.id),
        Err(LeagueError::InsufficientTeams { found: 0 })
    );
}
