//! Data-access boundary used by the scheduling and bracket logic, plus an in-memory store.
//!
//! The logic only talks to [`LeagueStore`]. Every write path it performs runs inside
//! [`LeagueStore::transaction`], so a rejected operation leaves no rows behind.

use crate::models::{
    Bracket, BracketId, BracketStatus, LeagueError, NewBracket, PlayoffGame, PlayoffTeam,
    ScheduledGame, Season, SeasonId, Slot, Team, TeamId,
};

/// Persistence operations the core consumes.
pub trait LeagueStore {
    /// Teams of a season in registration order.
    fn list_teams(&self, season_id: SeasonId) -> Result<Vec<Team>, LeagueError>;

    /// Teams with their current win/loss record. The result is a snapshot: records may be
    /// changed by result entry right after this call.
    fn list_teams_with_record(&self, season_id: SeasonId) -> Result<Vec<Team>, LeagueError> {
        self.list_teams(season_id)
    }

    fn get_team(&self, team_id: TeamId) -> Result<Team, LeagueError>;

    /// Bulk insert; returns the committed count.
    fn insert_games(
        &mut self,
        season_id: SeasonId,
        games: Vec<ScheduledGame>,
    ) -> Result<usize, LeagueError>;

    fn get_bracket(&self, bracket_id: BracketId) -> Result<Bracket, LeagueError>;

    fn set_bracket_status(
        &mut self,
        bracket_id: BracketId,
        status: BracketStatus,
    ) -> Result<(), LeagueError>;

    /// Seeded teams of a bracket, ordered by seed.
    fn list_playoff_teams(&self, bracket_id: BracketId) -> Result<Vec<PlayoffTeam>, LeagueError>;

    /// Delete every seeded team of the bracket, then insert `teams`. Returns inserted rows.
    fn replace_playoff_teams(
        &mut self,
        bracket_id: BracketId,
        teams: Vec<PlayoffTeam>,
    ) -> Result<usize, LeagueError>;

    /// Games of a bracket ordered by (round, position).
    fn list_playoff_games(&self, bracket_id: BracketId) -> Result<Vec<PlayoffGame>, LeagueError>;

    fn insert_playoff_games(
        &mut self,
        bracket_id: BracketId,
        games: Vec<PlayoffGame>,
    ) -> Result<usize, LeagueError>;

    /// Returns the number of removed games.
    fn clear_playoff_games(&mut self, bracket_id: BracketId) -> Result<usize, LeagueError>;

    /// Overwrite the stored game with the same id.
    fn update_playoff_game(&mut self, game: &PlayoffGame) -> Result<(), LeagueError>;

    fn update_playoff_game_slot(
        &mut self,
        bracket_id: BracketId,
        round: u32,
        position: u32,
        slot: Slot,
        team_id: TeamId,
    ) -> Result<(), LeagueError>;

    /// Run `f` as one all-or-nothing unit: if it fails, none of its writes are visible.
    fn transaction<T, F>(&mut self, f: F) -> Result<T, LeagueError>
    where
        Self: Sized,
        F: FnOnce(&mut Self) -> Result<T, LeagueError>;
}

/// In-memory store. Rows are kept in insertion order, like a table without an ORDER BY.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    seasons: Vec<Season>,
    teams: Vec<Team>,
    games: Vec<ScheduledGame>,
    brackets: Vec<Bracket>,
    playoff_teams: Vec<PlayoffTeam>,
    playoff_games: Vec<PlayoffGame>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create_season(&mut self, name: impl Into<String>) -> Season {
        let season = Season::new(name);
        self.seasons.push(season.clone());
        season
    }

    pub fn get_season(&self, season_id: SeasonId) -> Result<&Season, LeagueError> {
        self.seasons
            .iter()
            .find(|s| s.id == season_id)
            .ok_or(LeagueError::SeasonNotFound(season_id))
    }

    /// Delete a season with its teams, games and brackets.
    pub fn delete_season(&mut self, season_id: SeasonId) -> Result<(), LeagueError> {
        self.get_season(season_id)?;
        let bracket_ids: Vec<BracketId> = self
            .brackets
            .iter()
            .filter(|b| b.season_id == season_id)
            .map(|b| b.id)
            .collect();
        for id in bracket_ids {
            self.delete_bracket(id)?;
        }
        self.games.retain(|g| g.season_id != season_id);
        self.teams.retain(|t| t.season_id != season_id);
        self.seasons.retain(|s| s.id != season_id);
        Ok(())
    }

    /// Register a team to a season with a 0-0 record.
    pub fn add_team(
        &mut self,
        season_id: SeasonId,
        name: impl Into<String>,
    ) -> Result<Team, LeagueError> {
        self.get_season(season_id)?;
        let team = Team::new(season_id, name.into().trim());
        self.teams.push(team.clone());
        Ok(team)
    }

    pub fn set_team_record(
        &mut self,
        team_id: TeamId,
        wins: u32,
        losses: u32,
    ) -> Result<Team, LeagueError> {
        let team = self
            .teams
            .iter_mut()
            .find(|t| t.id == team_id)
            .ok_or(LeagueError::TeamNotFound(team_id))?;
        team.wins = wins;
        team.losses = losses;
        Ok(team.clone())
    }

    /// Regular-season games of a season ordered by date (stable for equal dates).
    pub fn list_games(&self, season_id: SeasonId) -> Result<Vec<ScheduledGame>, LeagueError> {
        self.get_season(season_id)?;
        let mut games: Vec<ScheduledGame> = self
            .games
            .iter()
            .filter(|g| g.season_id == season_id)
            .cloned()
            .collect();
        games.sort_by_key(|g| g.game_date);
        Ok(games)
    }

    /// Remove every scheduled game of a season. Returns the number removed.
    pub fn clear_games(&mut self, season_id: SeasonId) -> Result<usize, LeagueError> {
        self.get_season(season_id)?;
        let before = self.games.len();
        self.games.retain(|g| g.season_id != season_id);
        Ok(before - self.games.len())
    }

    pub fn create_bracket(
        &mut self,
        season_id: SeasonId,
        new: NewBracket,
    ) -> Result<Bracket, LeagueError> {
        self.get_season(season_id)?;
        let bracket = Bracket::new(season_id, new);
        self.brackets.push(bracket.clone());
        Ok(bracket)
    }

    pub fn list_brackets(&self, season_id: SeasonId) -> Result<Vec<Bracket>, LeagueError> {
        self.get_season(season_id)?;
        Ok(self
            .brackets
            .iter()
            .filter(|b| b.season_id == season_id)
            .cloned()
            .collect())
    }

    /// Delete a bracket with its seeded teams and games.
    pub fn delete_bracket(&mut self, bracket_id: BracketId) -> Result<(), LeagueError> {
        self.get_bracket(bracket_id)?;
        self.playoff_teams.retain(|t| t.bracket_id != bracket_id);
        self.playoff_games.retain(|g| g.bracket_id != bracket_id);
        self.brackets.retain(|b| b.id != bracket_id);
        Ok(())
    }

    fn bracket_mut(&mut self, bracket_id: BracketId) -> Result<&mut Bracket, LeagueError> {
        self.brackets
            .iter_mut()
            .find(|b| b.id == bracket_id)
            .ok_or(LeagueError::BracketNotFound(bracket_id))
    }
}

impl LeagueStore for MemoryStore {
    fn list_teams(&self, season_id: SeasonId) -> Result<Vec<Team>, LeagueError> {
        self.get_season(season_id)?;
        Ok(self
            .teams
            .iter()
            .filter(|t| t.season_id == season_id)
            .cloned()
            .collect())
    }

    fn get_team(&self, team_id: TeamId) -> Result<Team, LeagueError> {
        self.teams
            .iter()
            .find(|t| t.id == team_id)
            .cloned()
            .ok_or(LeagueError::TeamNotFound(team_id))
    }

    fn insert_games(
        &mut self,
        season_id: SeasonId,
        games: Vec<ScheduledGame>,
    ) -> Result<usize, LeagueError> {
        self.get_season(season_id)?;
        let count = games.len();
        self.games.extend(games);
        Ok(count)
    }

    fn get_bracket(&self, bracket_id: BracketId) -> Result<Bracket, LeagueError> {
        self.brackets
            .iter()
            .find(|b| b.id == bracket_id)
            .cloned()
            .ok_or(LeagueError::BracketNotFound(bracket_id))
    }

    fn set_bracket_status(
        &mut self,
        bracket_id: BracketId,
        status: BracketStatus,
    ) -> Result<(), LeagueError> {
        self.bracket_mut(bracket_id)?.status = status;
        Ok(())
    }

    fn list_playoff_teams(&self, bracket_id: BracketId) -> Result<Vec<PlayoffTeam>, LeagueError> {
        self.get_bracket(bracket_id)?;
        let mut teams: Vec<PlayoffTeam> = self
            .playoff_teams
            .iter()
            .filter(|t| t.bracket_id == bracket_id)
            .cloned()
            .collect();
        teams.sort_by_key(|t| t.seed);
        Ok(teams)
    }

    fn replace_playoff_teams(
        &mut self,
        bracket_id: BracketId,
        teams: Vec<PlayoffTeam>,
    ) -> Result<usize, LeagueError> {
        self.get_bracket(bracket_id)?;
        self.playoff_teams.retain(|t| t.bracket_id != bracket_id);
        let count = teams.len();
        self.playoff_teams.extend(teams);
        Ok(count)
    }

    fn list_playoff_games(&self, bracket_id: BracketId) -> Result<Vec<PlayoffGame>, LeagueError> {
        self.get_bracket(bracket_id)?;
        let mut games: Vec<PlayoffGame> = self
            .playoff_games
            .iter()
            .filter(|g| g.bracket_id == bracket_id)
            .cloned()
            .collect();
        games.sort_by_key(|g| (g.round, g.position));
        Ok(games)
    }

    fn insert_playoff_games(
        &mut self,
        bracket_id: BracketId,
        games: Vec<PlayoffGame>,
    ) -> Result<usize, LeagueError> {
        self.get_bracket(bracket_id)?;
        let count = games.len();
        self.playoff_games.extend(games);
        Ok(count)
    }

    fn clear_playoff_games(&mut self, bracket_id: BracketId) -> Result<usize, LeagueError> {
        self.get_bracket(bracket_id)?;
        let before = self.playoff_games.len();
        self.playoff_games.retain(|g| g.bracket_id != bracket_id);
        Ok(before - self.playoff_games.len())
    }

    fn update_playoff_game(&mut self, game: &PlayoffGame) -> Result<(), LeagueError> {
        let stored = self
            .playoff_games
            .iter_mut()
            .find(|g| g.id == game.id)
            .ok_or(LeagueError::GameNotFound {
                round: game.round,
                position: game.position,
            })?;
        *stored = game.clone();
        Ok(())
    }

    fn update_playoff_game_slot(
        &mut self,
        bracket_id: BracketId,
        round: u32,
        position: u32,
        slot: Slot,
        team_id: TeamId,
    ) -> Result<(), LeagueError> {
        let game = self
            .playoff_games
            .iter_mut()
            .find(|g| g.bracket_id == bracket_id && g.round == round && g.position == position)
            .ok_or(LeagueError::GameNotFound { round, position })?;
        match game.slot(slot) {
            Some(existing) if existing != team_id => {
                Err(LeagueError::BracketCorruption { round, position, slot })
            }
            _ => {
                game.set_slot(slot, team_id);
                Ok(())
            }
        }
    }

    fn transaction<T, F>(&mut self, f: F) -> Result<T, LeagueError>
    where
        F: FnOnce(&mut Self) -> Result<T, LeagueError>,
    {
        let snapshot = self.clone();
        let result = f(self);
        if result.is_err() {
            *self = snapshot;
        }
        result
    }
}
