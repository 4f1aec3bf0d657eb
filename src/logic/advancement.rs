//! Advancement: promote the top finishers of a completed stage and seed the
//! carryover pinfall they bring into the next one.

use crate::logic::aggregate::{aggregate_stage, round_half_up};
use crate::logic::completion::is_stage_complete;
use crate::logic::rank::assign_positions;
use crate::models::{
    AdvancementReport, Registration, RegistrationId, Standing, Tournament, TournamentError,
    TournamentId,
};
use crate::store::{RecordStore, RegistrationPatch, StoreError};

/// One planned promotion: a single registration moving up one stage.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AdvancementMove {
    pub registration_id: RegistrationId,
    pub player_name: String,
    pub from_stage: usize,
    pub to_stage: usize,
    /// Pinfall the bowler brings into `to_stage`.
    pub carryover: u32,
}

/// Plan advancement for every eligible stage, in ascending stage order.
///
/// Per stage: take bowlers whose `current_stage` is the stage and who have
/// completed it, rank them by stage total (carryover included), and promote
/// the top `advancing_bowlers` (everyone eligible when the pool is smaller).
/// The final stage and stages without an advancing rule are skipped.
///
/// Pure planning against the given snapshot: the `current_stage` filter is
/// what makes repeated runs self-limiting, since already-advanced bowlers no
/// longer match their old stage.
pub fn plan_advancement(
    tournament: &Tournament,
    registrations: &[Registration],
) -> Result<Vec<AdvancementMove>, TournamentError> {
    if !tournament.format.has_stages {
        return Err(TournamentError::NotStaged);
    }
    let stages = &tournament.format.stages;
    let mut moves = Vec::new();
    for from in 0..stages.len().saturating_sub(1) {
        let stage = &stages[from];
        let take = stage.advancing_count();
        if take == 0 {
            continue;
        }
        let next = &stages[from + 1];
        let pool: Vec<Standing> = registrations
            .iter()
            .filter(|r| is_stage_complete(r, from, stage))
            .map(|r| Standing {
                registration_id: r.id,
                player_name: r.player_name.clone(),
                position: 0,
                complete: true,
                aggregate: aggregate_stage(r.stage_entry(from)),
            })
            .collect();
        for row in assign_positions(pool).into_iter().take(take as usize) {
            let carryover = if next.carryover_pinfall {
                let pct = next.carryover_percentage.unwrap_or(100);
                round_half_up(row.aggregate.total as u64 * pct as u64, 100) as u32
            } else {
                0
            };
            moves.push(AdvancementMove {
                registration_id: row.registration_id,
                player_name: row.player_name,
                from_stage: from,
                to_stage: from + 1,
                carryover,
            });
        }
    }
    Ok(moves)
}

/// Plan and apply advancement for a tournament.
///
/// Each promotion is an independent per-registration write: raise
/// `current_stage` and attach the carryover to the next stage's entry.
/// Writes are not transactional; failures are counted and never rolled
/// back. Re-running converges, because planning skips bowlers whose
/// `current_stage` already moved.
pub fn run_advancement(
    store: &mut dyn RecordStore,
    tournament_id: TournamentId,
) -> Result<AdvancementReport, StoreError> {
    let tournament = store.get_tournament(tournament_id)?;
    let registrations = store.list_registrations(tournament_id)?;
    let moves = plan_advancement(&tournament, &registrations)?;

    let mut report = AdvancementReport::default();
    for mv in moves {
        let patch = RegistrationPatch {
            current_stage: Some(mv.to_stage),
            stage_carryover: Some((mv.to_stage, mv.carryover)),
            game_score: None,
        };
        match store.update_registration(mv.registration_id, patch) {
            Ok(()) => {
                report.advanced += 1;
                log::info!(
                    "Advanced {} to stage {} with carryover {}",
                    mv.player_name,
                    mv.to_stage,
                    mv.carryover
                );
            }
            Err(e) => {
                report.failed += 1;
                log::warn!("Failed to advance {}: {}", mv.player_name, e);
            }
        }
    }
    log::info!(
        "Advancement for tournament {}: {} advanced, {} failed",
        tournament_id,
        report.advanced,
        report.failed
    );
    Ok(report)
}
