//! Format resolution: staged vs. single-stage classification.

use crate::models::TournamentFormat;

/// Games per bowler assumed when a single-stage format leaves it unset.
pub const DEFAULT_GAMES_PER_BOWLER: u32 = 3;

/// How a tournament's scores are aggregated and whether advancement is reachable.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum FormatKind {
    /// One block of games, one leaderboard, no advancement.
    SingleStage { games_per_bowler: u32 },
    /// Multi-phase format driven by the stage definitions.
    Staged,
}

/// Classify a format descriptor.
pub fn classify(format: &TournamentFormat) -> FormatKind {
    if format.has_stages {
        FormatKind::Staged
    } else {
        FormatKind::SingleStage {
            games_per_bowler: format
                .games_per_bowler
                .filter(|g| *g > 0)
                .unwrap_or(DEFAULT_GAMES_PER_BOWLER),
        }
    }
}
