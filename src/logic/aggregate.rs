//! Stage aggregation: totals, average, and high game from recorded scores.

use crate::models::{StageAggregate, StageScoreEntry};

/// Integer round-half-up of `n / d`. `d` must be positive.
pub(crate) fn round_half_up(n: u64, d: u64) -> u64 {
    (2 * n + d) / (2 * d)
}

/// Aggregate one bowler's entry for a stage. Only recorded games count:
/// a partially played stage still yields a valid average over the games
/// played so far, and no games played yields no average (never a zero).
pub fn aggregate_stage(entry: Option<&StageScoreEntry>) -> StageAggregate {
    let Some(entry) = entry else {
        return StageAggregate::default();
    };
    let scratch_total: u32 = entry.recorded().map(u32::from).sum();
    let games_played = entry.games_recorded() as u32;
    let average = if games_played > 0 {
        Some(round_half_up(scratch_total as u64, games_played as u64) as u32)
    } else {
        None
    };
    StageAggregate {
        total: scratch_total + entry.carryover,
        scratch_total,
        games_played,
        average,
        high: entry.recorded().max(),
    }
}
