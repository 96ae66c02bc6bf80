//! Playoff brackets: bracket, seeded teams and the single-elimination game tree.

use crate::models::game::GameStatus;
use crate::models::team::{SeasonId, Team, TeamId};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a bracket.
pub type BracketId = Uuid;

/// Unique identifier for a seeded team row.
pub type PlayoffTeamId = Uuid;

/// Unique identifier for a playoff game.
pub type PlayoffGameId = Uuid;

/// Playoff format. Only single elimination can be generated.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BracketType {
    #[default]
    SingleElimination,
    DoubleElimination,
    RoundRobin,
}

impl std::fmt::Display for BracketType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BracketType::SingleElimination => write!(f, "single_elimination"),
            BracketType::DoubleElimination => write!(f, "double_elimination"),
            BracketType::RoundRobin => write!(f, "round_robin"),
        }
    }
}

/// Current phase of the bracket.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BracketStatus {
    /// Seeding and tree generation allowed; no game has been played.
    #[default]
    Setup,
    /// At least one game left `scheduled`.
    InProgress,
    /// The final has a winner.
    Completed,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Bracket {
    pub id: BracketId,
    pub season_id: SeasonId,
    pub name: String,
    pub description: Option<String>,
    pub bracket_type: BracketType,
    pub status: BracketStatus,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

/// Fields needed to create a bracket (status always starts at `Setup`).
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct NewBracket {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub bracket_type: BracketType,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
}

impl Bracket {
    pub fn new(season_id: SeasonId, new: NewBracket) -> Self {
        Self {
            id: Uuid::new_v4(),
            season_id,
            name: new.name,
            description: new.description,
            bracket_type: new.bracket_type,
            status: BracketStatus::Setup,
            start_date: new.start_date,
            end_date: new.end_date,
        }
    }
}

/// A team's seed within one bracket.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct PlayoffTeam {
    pub id: PlayoffTeamId,
    pub bracket_id: BracketId,
    pub team_id: TeamId,
    /// 1 = best seed. Unique within the bracket.
    pub seed: u32,
    pub is_active: bool,
}

impl PlayoffTeam {
    pub fn new(bracket_id: BracketId, team_id: TeamId, seed: u32) -> Self {
        Self {
            id: Uuid::new_v4(),
            bracket_id,
            team_id,
            seed,
            is_active: true,
        }
    }
}

/// Ephemeral output of the seeding engine; never persisted as such.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SeedEntry {
    pub team: Team,
    pub win_percentage: f64,
    pub seed: u32,
}

/// Manual seed for one team, used when reordering an existing bracket.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct SeedAssignment {
    pub team_id: TeamId,
    pub seed: u32,
}

/// Which side of a playoff game a team occupies.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Slot {
    Home,
    Away,
}

impl Slot {
    /// Slot a game at `position` feeds in the next round: even → home, odd → away.
    pub fn for_feeder(position: u32) -> Self {
        if position % 2 == 0 {
            Slot::Home
        } else {
            Slot::Away
        }
    }
}

/// One node of the bracket tree. `None` teams are "to be determined".
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct PlayoffGame {
    pub id: PlayoffGameId,
    pub bracket_id: BracketId,
    /// 1 = first round.
    pub round: u32,
    /// 0-indexed slot within the round.
    pub position: u32,
    pub home_team_id: Option<TeamId>,
    pub away_team_id: Option<TeamId>,
    pub winner_id: Option<TeamId>,
    pub status: GameStatus,
    /// Placeholder win for a team without a round-1 opponent.
    pub is_bye: bool,
    pub home_score: u32,
    pub away_score: u32,
}

impl PlayoffGame {
    /// Empty game in the tree: both teams to be determined.
    pub fn new(bracket_id: BracketId, round: u32, position: u32) -> Self {
        Self {
            id: Uuid::new_v4(),
            bracket_id,
            round,
            position,
            home_team_id: None,
            away_team_id: None,
            winner_id: None,
            status: GameStatus::Scheduled,
            is_bye: false,
            home_score: 0,
            away_score: 0,
        }
    }

    pub fn slot(&self, slot: Slot) -> Option<TeamId> {
        match slot {
            Slot::Home => self.home_team_id,
            Slot::Away => self.away_team_id,
        }
    }

    pub fn set_slot(&mut self, slot: Slot, team_id: TeamId) {
        match slot {
            Slot::Home => self.home_team_id = Some(team_id),
            Slot::Away => self.away_team_id = Some(team_id),
        }
    }

    /// Round, position and slot this game's winner moves into.
    pub fn next_slot(&self) -> (u32, u32, Slot) {
        (self.round + 1, self.position / 2, Slot::for_feeder(self.position))
    }

    /// Positions of the two previous-round games feeding this one.
    pub fn feeder_positions(&self) -> (u32, u32) {
        (self.position * 2, self.position * 2 + 1)
    }

    pub fn is_completed(&self) -> bool {
        self.status == GameStatus::Completed
    }

    pub fn has_team(&self, team_id: TeamId) -> bool {
        self.home_team_id == Some(team_id) || self.away_team_id == Some(team_id)
    }
}
