//! Data structures for the bowling tournament: tournaments, registrations, standings.

mod registration;
mod standings;
mod tournament;

pub use registration::{
    normalize_game_score, Registration, RegistrationId, StageScoreEntry, MAX_GAME_SCORE,
};
pub use standings::{AdvancementReport, StageAggregate, Standing};
pub use tournament::{
    Squad, SquadId, Stage, Tournament, TournamentError, TournamentFormat, TournamentId,
};
