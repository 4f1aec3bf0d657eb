//! Registration and per-stage score entries.

use crate::models::tournament::{SquadId, TournamentError};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a registration (one bowler in one tournament).
pub type RegistrationId = Uuid;

/// Maximum single-game score in ten-pin bowling.
pub const MAX_GAME_SCORE: u16 = 300;

/// Normalize a raw score input. Absent, negative, or above 300 all mean
/// "not played". A zero is a legitimate zero-pin game, distinct from not played.
pub fn normalize_game_score(raw: Option<i64>) -> Option<u16> {
    match raw {
        Some(v) if (0..=MAX_GAME_SCORE as i64).contains(&v) => Some(v as u16),
        _ => None,
    }
}

/// Recorded scores for one bowler in one stage.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct StageScoreEntry {
    pub stage_index: usize,
    /// One slot per game; `None` marks a game not yet played.
    pub scores: Vec<Option<u16>>,
    /// Pinfall inherited from the previous stage (0 for the qualifying stage).
    #[serde(default)]
    pub carryover: u32,
}

impl StageScoreEntry {
    pub fn new(stage_index: usize) -> Self {
        Self {
            stage_index,
            scores: Vec::new(),
            carryover: 0,
        }
    }

    /// Recorded (played) game scores, in game order.
    pub fn recorded(&self) -> impl Iterator<Item = u16> + '_ {
        self.scores.iter().flatten().copied()
    }

    /// Count of games played so far in this stage.
    pub fn games_recorded(&self) -> usize {
        self.scores.iter().flatten().count()
    }
}

/// A bowler registered in a tournament.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Registration {
    pub id: RegistrationId,
    pub player_name: String,
    /// Index into the format's stages; raised only by advancement.
    pub current_stage: usize,
    /// Squads the bowler is scheduled into (groups qualifying-stage display only).
    pub assigned_squads: Vec<SquadId>,
    /// At most one entry per stage index; entries are never deleted.
    pub stage_scores: Vec<StageScoreEntry>,
}

impl Registration {
    /// Register a bowler. Starts in the qualifying stage with no scores.
    pub fn new(player_name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            player_name: player_name.into(),
            current_stage: 0,
            assigned_squads: Vec::new(),
            stage_scores: Vec::new(),
        }
    }

    /// Score entry for a stage, if any games or carryover were recorded.
    pub fn stage_entry(&self, stage_index: usize) -> Option<&StageScoreEntry> {
        self.stage_scores.iter().find(|e| e.stage_index == stage_index)
    }

    /// Score entry for a stage, created on first use.
    pub fn stage_entry_mut(&mut self, stage_index: usize) -> &mut StageScoreEntry {
        if let Some(pos) = self.stage_scores.iter().position(|e| e.stage_index == stage_index) {
            return &mut self.stage_scores[pos];
        }
        self.stage_scores.push(StageScoreEntry::new(stage_index));
        let last = self.stage_scores.len() - 1;
        &mut self.stage_scores[last]
    }

    /// Record one game of a stage (`None` marks it not played). `stage_games`
    /// is the stage's required game count; `game` is 0-based.
    pub fn record_game(
        &mut self,
        stage_index: usize,
        game: usize,
        score: Option<u16>,
        stage_games: u32,
    ) -> Result<(), TournamentError> {
        if game >= stage_games as usize {
            return Err(TournamentError::GameOutOfRange {
                game,
                games: stage_games,
            });
        }
        let entry = self.stage_entry_mut(stage_index);
        if entry.scores.len() <= game {
            entry.scores.resize(game + 1, None);
        }
        entry.scores[game] = score;
        Ok(())
    }

    /// Write the carryover a bowler brings into a stage, creating the entry if absent.
    pub fn set_carryover(&mut self, stage_index: usize, carryover: u32) {
        self.stage_entry_mut(stage_index).carryover = carryover;
    }

    pub fn is_assigned_to(&self, squad: SquadId) -> bool {
        self.assigned_squads.contains(&squad)
    }
}
