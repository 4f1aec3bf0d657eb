//! Stage completion: has a bowler bowled every required game of a stage.

use crate::models::{Registration, Stage, StageScoreEntry};

/// Whether an entry holds exactly `games` recorded games.
pub fn has_all_games(entry: Option<&StageScoreEntry>, games: u32) -> bool {
    entry.map_or(false, |e| e.games_recorded() == games as usize)
}

/// A bowler is complete for stage `stage_index` iff they are currently in it
/// and have recorded every required game. Historical entries of stages a
/// bowler already advanced from never count: effective stage membership is
/// `current_stage`, not the presence of old score entries.
pub fn is_stage_complete(registration: &Registration, stage_index: usize, stage: &Stage) -> bool {
    registration.current_stage == stage_index
        && has_all_games(registration.stage_entry(stage_index), stage.games)
}
