//! Bowling tournament web app: stage scoring and advancement engine, with
//! models and a record-store contract.

pub mod logic;
pub mod models;
pub mod store;

pub use logic::{
    aggregate_stage, assign_positions, classify, has_all_games, is_stage_complete,
    plan_advancement, run_advancement, stage_standings, AdvancementMove, FormatKind,
    DEFAULT_GAMES_PER_BOWLER,
};
pub use models::{
    normalize_game_score, AdvancementReport, Registration, RegistrationId, Squad, SquadId, Stage,
    StageAggregate, StageScoreEntry, Standing, Tournament, TournamentError, TournamentFormat,
    TournamentId, MAX_GAME_SCORE,
};
pub use store::{GameScoreWrite, MemoryStore, RecordStore, RegistrationPatch, StoreError};
