//! Aggregated and ranked standings rows (for API / display).

use crate::models::registration::RegistrationId;
use crate::models::tournament::Stage;
use serde::{Deserialize, Serialize};

/// Per-bowler aggregate for one stage.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct StageAggregate {
    /// Sum of recorded game scores plus carryover.
    pub total: u32,
    /// Sum of recorded game scores, excluding carryover.
    pub scratch_total: u32,
    pub games_played: u32,
    /// Rounded (half-up) average over recorded games; absent when none played.
    pub average: Option<u32>,
    /// Highest single recorded game; absent when none played.
    pub high: Option<u16>,
}

/// One row of a stage leaderboard: aggregate plus 1-based position.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Standing {
    pub registration_id: RegistrationId,
    pub player_name: String,
    pub position: u32,
    /// Whether the bowler has completed every required game of the stage.
    pub complete: bool,
    #[serde(flatten)]
    pub aggregate: StageAggregate,
}

impl Standing {
    pub fn is_top_three(&self) -> bool {
        self.position <= 3
    }

    /// Whether this position falls inside the stage's advancing cut.
    pub fn is_advancing(&self, stage: &Stage) -> bool {
        self.position <= stage.advancing_count()
    }
}

/// Outcome of one advancement run: independent per-bowler writes, counted.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct AdvancementReport {
    pub advanced: u32,
    pub failed: u32,
}
