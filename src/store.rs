//! Record store: the persistence contract the engine reads and writes
//! through, plus the in-memory implementation backing the web binary and tests.

use crate::logic::{classify, FormatKind};
use crate::models::{
    Registration, RegistrationId, SquadId, Tournament, TournamentError, TournamentFormat,
    TournamentId,
};
use chrono::{DateTime, Utc};
use std::collections::HashMap;

/// Errors from record-store operations.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum StoreError {
    TournamentNotFound(TournamentId),
    RegistrationNotFound(RegistrationId),
    /// A write the tournament rules reject (bad stage, full squad, ...).
    Rejected(TournamentError),
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::TournamentNotFound(_) => write!(f, "No tournament"),
            StoreError::RegistrationNotFound(_) => write!(f, "No registration"),
            StoreError::Rejected(e) => write!(f, "{}", e),
        }
    }
}

impl From<TournamentError> for StoreError {
    fn from(e: TournamentError) -> Self {
        StoreError::Rejected(e)
    }
}

/// A game-score write: one game of one stage (`None` records it not played).
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct GameScoreWrite {
    pub stage_index: usize,
    /// 0-based game number within the stage.
    pub game: usize,
    pub score: Option<u16>,
}

/// Partial update to one registration. Unset fields are left unchanged.
#[derive(Clone, Debug, Default)]
pub struct RegistrationPatch {
    pub current_stage: Option<usize>,
    /// (stage index, carryover) to write, creating the stage entry if absent.
    pub stage_carryover: Option<(usize, u32)>,
    pub game_score: Option<GameScoreWrite>,
}

/// The store contract the engine consumes. Writes are independent
/// per-registration operations; there is no cross-record transaction.
pub trait RecordStore {
    fn get_tournament(&self, id: TournamentId) -> Result<Tournament, StoreError>;
    fn list_registrations(&self, tournament_id: TournamentId)
        -> Result<Vec<Registration>, StoreError>;
    fn update_registration(
        &mut self,
        id: RegistrationId,
        patch: RegistrationPatch,
    ) -> Result<(), StoreError>;
}

/// In-memory store: tournaments and their registrations, keyed by id.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tournaments: HashMap<TournamentId, Tournament>,
    registrations: HashMap<TournamentId, Vec<Registration>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a tournament from a validated format descriptor; returns its id.
    pub fn create_tournament(
        &mut self,
        name: impl Into<String>,
        format: TournamentFormat,
    ) -> Result<TournamentId, StoreError> {
        let tournament = Tournament::new(name, format)?;
        let id = tournament.id;
        self.tournaments.insert(id, tournament);
        self.registrations.insert(id, Vec::new());
        Ok(id)
    }

    /// Add a squad to a tournament; returns the squad id.
    pub fn add_squad(
        &mut self,
        tournament_id: TournamentId,
        name: impl Into<String>,
        capacity: u32,
        schedule: DateTime<Utc>,
    ) -> Result<SquadId, StoreError> {
        let tournament = self
            .tournaments
            .get_mut(&tournament_id)
            .ok_or(StoreError::TournamentNotFound(tournament_id))?;
        Ok(tournament.add_squad(name, capacity, schedule))
    }

    /// Register a bowler, optionally into squads. Names are unique per
    /// tournament (case-insensitive); squads must exist and have room.
    pub fn add_registration(
        &mut self,
        tournament_id: TournamentId,
        player_name: &str,
        squads: &[SquadId],
    ) -> Result<RegistrationId, StoreError> {
        let tournament = self
            .tournaments
            .get(&tournament_id)
            .ok_or(StoreError::TournamentNotFound(tournament_id))?;
        let regs = self
            .registrations
            .get(&tournament_id)
            .ok_or(StoreError::TournamentNotFound(tournament_id))?;

        let name = player_name.trim();
        if regs.iter().any(|r| r.player_name.eq_ignore_ascii_case(name)) {
            return Err(TournamentError::DuplicatePlayerName.into());
        }
        for &squad_id in squads {
            let squad = tournament
                .squad(squad_id)
                .ok_or(TournamentError::SquadNotFound(squad_id))?;
            let assigned = regs.iter().filter(|r| r.is_assigned_to(squad_id)).count();
            if assigned >= squad.capacity as usize {
                return Err(TournamentError::SquadFull {
                    squad: squad.name.clone(),
                    capacity: squad.capacity,
                }
                .into());
            }
        }

        let mut registration = Registration::new(name);
        registration.assigned_squads = squads.to_vec();
        let id = registration.id;
        self.registrations
            .get_mut(&tournament_id)
            .ok_or(StoreError::TournamentNotFound(tournament_id))?
            .push(registration);
        Ok(id)
    }

    /// Read one registration by id.
    pub fn get_registration(&self, id: RegistrationId) -> Result<Registration, StoreError> {
        self.registrations
            .values()
            .flatten()
            .find(|r| r.id == id)
            .cloned()
            .ok_or(StoreError::RegistrationNotFound(id))
    }

    fn tournament_of(&self, id: RegistrationId) -> Result<TournamentId, StoreError> {
        self.registrations
            .iter()
            .find(|(_, regs)| regs.iter().any(|r| r.id == id))
            .map(|(tid, _)| *tid)
            .ok_or(StoreError::RegistrationNotFound(id))
    }

    /// Required game count of a stage, for validating writes against it.
    fn stage_games(tournament: &Tournament, stage_index: usize) -> Result<u32, StoreError> {
        match classify(&tournament.format) {
            FormatKind::Staged => tournament
                .format
                .stages
                .get(stage_index)
                .map(|s| s.games)
                .ok_or_else(|| TournamentError::InvalidStage { stage: stage_index }.into()),
            FormatKind::SingleStage { games_per_bowler } => {
                if stage_index == 0 {
                    Ok(games_per_bowler)
                } else {
                    Err(TournamentError::InvalidStage { stage: stage_index }.into())
                }
            }
        }
    }
}

impl RecordStore for MemoryStore {
    fn get_tournament(&self, id: TournamentId) -> Result<Tournament, StoreError> {
        self.tournaments
            .get(&id)
            .cloned()
            .ok_or(StoreError::TournamentNotFound(id))
    }

    fn list_registrations(
        &self,
        tournament_id: TournamentId,
    ) -> Result<Vec<Registration>, StoreError> {
        self.registrations
            .get(&tournament_id)
            .cloned()
            .ok_or(StoreError::TournamentNotFound(tournament_id))
    }

    fn update_registration(
        &mut self,
        id: RegistrationId,
        patch: RegistrationPatch,
    ) -> Result<(), StoreError> {
        let tournament_id = self.tournament_of(id)?;
        let tournament = self
            .tournaments
            .get(&tournament_id)
            .ok_or(StoreError::TournamentNotFound(tournament_id))?;

        // Validate the whole patch against the format before touching anything,
        // so a rejected patch leaves the registration unchanged.
        let stage_count = tournament.format.stages.len();
        if let Some(stage) = patch.current_stage {
            if tournament.format.has_stages && stage >= stage_count {
                return Err(TournamentError::InvalidStage { stage }.into());
            }
            if !tournament.format.has_stages && stage != 0 {
                return Err(TournamentError::InvalidStage { stage }.into());
            }
        }
        if let Some((stage_index, carryover)) = patch.stage_carryover {
            Self::stage_games(tournament, stage_index)?;
            if stage_index == 0 && carryover != 0 {
                return Err(TournamentError::QualifyingStageCarryover.into());
            }
        }
        let game_limit = match &patch.game_score {
            Some(w) => Some(Self::stage_games(tournament, w.stage_index)?),
            None => None,
        };

        let registration = self
            .registrations
            .get_mut(&tournament_id)
            .ok_or(StoreError::TournamentNotFound(tournament_id))?
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or(StoreError::RegistrationNotFound(id))?;

        if let Some(stage) = patch.current_stage {
            if stage < registration.current_stage {
                return Err(TournamentError::StageRegression {
                    from: registration.current_stage,
                    to: stage,
                }
                .into());
            }
            registration.current_stage = stage;
        }
        if let Some((stage_index, carryover)) = patch.stage_carryover {
            registration.set_carryover(stage_index, carryover);
        }
        if let Some(write) = patch.game_score {
            // game_limit is Some whenever game_score is, per the block above
            let games = game_limit.unwrap_or(0);
            registration.record_game(write.stage_index, write.game, write.score, games)?;
        }
        Ok(())
    }
}
