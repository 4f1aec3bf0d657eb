//! Leaderboard ranking: order aggregated rows and assign positions.

use crate::logic::aggregate::aggregate_stage;
use crate::logic::completion::has_all_games;
use crate::logic::format::{classify, FormatKind};
use crate::models::{Registration, Standing, Tournament};

/// Sort rows descending by total and assign 1-based positions.
///
/// Tie-break: equal totals order by higher scratch total, then player name
/// ascending; rows still tied keep their input order (stable sort). The
/// source data carries no stronger ranking criterion, so this is a
/// documented but arbitrary choice.
pub fn assign_positions(mut rows: Vec<Standing>) -> Vec<Standing> {
    rows.sort_by(|a, b| {
        b.aggregate
            .total
            .cmp(&a.aggregate.total)
            .then(b.aggregate.scratch_total.cmp(&a.aggregate.scratch_total))
            .then_with(|| a.player_name.cmp(&b.player_name))
    });
    for (i, row) in rows.iter_mut().enumerate() {
        row.position = (i + 1) as u32;
    }
    rows
}

/// Aggregated, ranked leaderboard for one stage.
///
/// Rows cover bowlers currently in the stage plus bowlers who recorded
/// scores there before advancing (historical display); the `complete` flag
/// still follows current-stage membership, so advanced bowlers are never
/// re-reported as completing a past stage.
pub fn stage_standings(
    tournament: &Tournament,
    registrations: &[Registration],
    stage_index: usize,
) -> Vec<Standing> {
    let required_games = match classify(&tournament.format) {
        FormatKind::Staged => tournament.stage(stage_index).games,
        FormatKind::SingleStage { games_per_bowler } => games_per_bowler,
    };
    let rows: Vec<Standing> = registrations
        .iter()
        .filter(|r| r.current_stage == stage_index || r.stage_entry(stage_index).is_some())
        .map(|r| Standing {
            registration_id: r.id,
            player_name: r.player_name.clone(),
            position: 0,
            complete: r.current_stage == stage_index
                && has_all_games(r.stage_entry(stage_index), required_games),
            aggregate: aggregate_stage(r.stage_entry(stage_index)),
        })
        .collect();
    assign_positions(rows)
}
