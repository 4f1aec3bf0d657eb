//! Tournament, format descriptor, stages, and squads.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a tournament.
pub type TournamentId = Uuid;

/// Unique identifier for a squad.
pub type SquadId = Uuid;

/// Errors that can occur during tournament operations.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum TournamentError {
    /// Format declares stages but the stage list is empty.
    EmptyStages,
    /// A stage requires zero games.
    StageWithoutGames { stage: usize },
    /// A stage's carryover percentage is above 100.
    InvalidCarryoverPercentage { stage: usize, percentage: u32 },
    /// Advancement requested on a tournament without a staged format.
    NotStaged,
    /// A bowler with this name is already registered (names are unique, case-insensitive).
    DuplicatePlayerName,
    /// Squad not found on this tournament.
    SquadNotFound(SquadId),
    /// Squad is at capacity.
    SquadFull { squad: String, capacity: u32 },
    /// Stage index the format does not define.
    InvalidStage { stage: usize },
    /// Game index at or beyond the stage's game count.
    GameOutOfRange { game: usize, games: u32 },
    /// A registration's current stage can only move forward.
    StageRegression { from: usize, to: usize },
    /// The qualifying stage never receives carryover.
    QualifyingStageCarryover,
}

impl std::fmt::Display for TournamentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TournamentError::EmptyStages => write!(f, "Staged format must define at least one stage"),
            TournamentError::StageWithoutGames { stage } => {
                write!(f, "Stage {} must require at least one game", stage)
            }
            TournamentError::InvalidCarryoverPercentage { stage, percentage } => {
                write!(f, "Stage {} carryover percentage {} is above 100", stage, percentage)
            }
            TournamentError::NotStaged => {
                write!(f, "Tournament has a single-stage format; advancement is not applicable")
            }
            TournamentError::DuplicatePlayerName => write!(f, "A bowler with this name is already registered"),
            TournamentError::SquadNotFound(_) => write!(f, "Squad not found"),
            TournamentError::SquadFull { squad, capacity } => {
                write!(f, "Squad {} is full ({} bowlers)", squad, capacity)
            }
            TournamentError::InvalidStage { stage } => write!(f, "No stage {} in this format", stage),
            TournamentError::GameOutOfRange { game, games } => {
                write!(f, "Game {} is out of range for a {}-game stage", game, games)
            }
            TournamentError::StageRegression { from, to } => {
                write!(f, "Current stage only advances (attempted {} -> {})", from, to)
            }
            TournamentError::QualifyingStageCarryover => {
                write!(f, "The qualifying stage cannot receive carryover")
            }
        }
    }
}

/// One phase of a staged tournament.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Stage {
    pub name: String,
    /// Games required to complete the stage.
    pub games: u32,
    /// Top finishers promoted to the next stage; absent or zero means no automatic advancement.
    #[serde(default)]
    pub advancing_bowlers: Option<u32>,
    /// Whether entering this stage carries forward pinfall from the prior stage.
    #[serde(default)]
    pub carryover_pinfall: bool,
    /// Fraction (0-100) of the prior stage's total carried in; defaults to 100.
    #[serde(default)]
    pub carryover_percentage: Option<u32>,
}

impl Stage {
    /// Number of bowlers this stage promotes (0 when no automatic advancement).
    pub fn advancing_count(&self) -> u32 {
        self.advancing_bowlers.unwrap_or(0)
    }
}

/// Format descriptor: staged (multi-phase) or single-stage.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct TournamentFormat {
    pub has_stages: bool,
    /// Stage definitions; index 0 is the qualifying stage. Empty when not staged.
    #[serde(default)]
    pub stages: Vec<Stage>,
    /// Games per bowler for single-stage formats; resolver falls back to 3.
    #[serde(default)]
    pub games_per_bowler: Option<u32>,
}

/// A scheduled group of bowlers sharing a time slot within the qualifying stage.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Squad {
    pub id: SquadId,
    pub name: String,
    pub capacity: u32,
    pub schedule: DateTime<Utc>,
}

/// A tournament: format descriptor plus squad definitions.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Tournament {
    pub id: TournamentId,
    pub name: String,
    pub format: TournamentFormat,
    pub squads: Vec<Squad>,
}

impl Tournament {
    /// Create a tournament, validating the format descriptor.
    pub fn new(name: impl Into<String>, format: TournamentFormat) -> Result<Self, TournamentError> {
        if format.has_stages {
            if format.stages.is_empty() {
                return Err(TournamentError::EmptyStages);
            }
            for (i, stage) in format.stages.iter().enumerate() {
                if stage.games == 0 {
                    return Err(TournamentError::StageWithoutGames { stage: i });
                }
                if let Some(pct) = stage.carryover_percentage {
                    if pct > 100 {
                        return Err(TournamentError::InvalidCarryoverPercentage {
                            stage: i,
                            percentage: pct,
                        });
                    }
                }
            }
        }
        Ok(Self {
            id: Uuid::new_v4(),
            name: name.into(),
            format,
            squads: Vec::new(),
        })
    }

    /// Stage definition by index. Out of bounds is a programming error
    /// (formats are validated at construction) and panics.
    pub fn stage(&self, index: usize) -> &Stage {
        &self.format.stages[index]
    }

    /// Add a squad definition; returns its id.
    pub fn add_squad(
        &mut self,
        name: impl Into<String>,
        capacity: u32,
        schedule: DateTime<Utc>,
    ) -> SquadId {
        let squad = Squad {
            id: Uuid::new_v4(),
            name: name.into(),
            capacity,
            schedule,
        };
        let id = squad.id;
        self.squads.push(squad);
        id
    }

    /// Look up a squad by id.
    pub fn squad(&self, id: SquadId) -> Option<&Squad> {
        self.squads.iter().find(|s| s.id == id)
    }
}
