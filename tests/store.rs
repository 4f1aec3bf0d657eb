//! Integration tests for the in-memory record store: registration rules,
//! squad capacity, and patch validation.

use bowling_tournament_web::{
    GameScoreWrite, MemoryStore, RecordStore, RegistrationPatch, Stage, StoreError,
    TournamentError, TournamentFormat, TournamentId,
};
use chrono::Utc;

fn staged_format() -> TournamentFormat {
    TournamentFormat {
        has_stages: true,
        stages: vec![
            Stage {
                name: "Qualifying".to_string(),
                games: 3,
                advancing_bowlers: Some(2),
                carryover_pinfall: false,
                carryover_percentage: None,
            },
            Stage {
                name: "Final".to_string(),
                games: 1,
                advancing_bowlers: None,
                carryover_pinfall: true,
                carryover_percentage: None,
            },
        ],
        games_per_bowler: None,
    }
}

fn staged_tournament(store: &mut MemoryStore) -> TournamentId {
    store.create_tournament("City Open", staged_format()).unwrap()
}

#[test]
fn staged_format_must_have_stages() {
    let mut store = MemoryStore::new();
    let result = store.create_tournament(
        "Broken",
        TournamentFormat {
            has_stages: true,
            stages: vec![],
            games_per_bowler: None,
        },
    );
    assert_eq!(
        result,
        Err(StoreError::Rejected(TournamentError::EmptyStages))
    );
}

#[test]
fn duplicate_player_name_is_rejected_case_insensitive() {
    let mut store = MemoryStore::new();
    let tid = staged_tournament(&mut store);
    store.add_registration(tid, "Anna", &[]).unwrap();
    assert_eq!(
        store.add_registration(tid, "  anna ", &[]),
        Err(StoreError::Rejected(TournamentError::DuplicatePlayerName))
    );
}

#[test]
fn squad_capacity_is_enforced() {
    let mut store = MemoryStore::new();
    let tid = staged_tournament(&mut store);
    let squad = store.add_squad(tid, "Squad A", 1, Utc::now()).unwrap();

    store.add_registration(tid, "Anna", &[squad]).unwrap();
    match store.add_registration(tid, "Ben", &[squad]) {
        Err(StoreError::Rejected(TournamentError::SquadFull { capacity, .. })) => {
            assert_eq!(capacity, 1)
        }
        other => panic!("expected SquadFull, got {:?}", other),
    }
}

#[test]
fn unknown_squad_is_rejected() {
    let mut store = MemoryStore::new();
    let tid = staged_tournament(&mut store);
    let bogus = uuid::Uuid::new_v4();
    assert_eq!(
        store.add_registration(tid, "Anna", &[bogus]),
        Err(StoreError::Rejected(TournamentError::SquadNotFound(bogus)))
    );
}

#[test]
fn game_index_beyond_stage_games_is_rejected() {
    let mut store = MemoryStore::new();
    let tid = staged_tournament(&mut store);
    let rid = store.add_registration(tid, "Anna", &[]).unwrap();

    let result = store.update_registration(
        rid,
        RegistrationPatch {
            game_score: Some(GameScoreWrite {
                stage_index: 0,
                game: 3, // stage requires 3 games: valid games are 0..=2
                score: Some(200),
            }),
            ..Default::default()
        },
    );
    assert_eq!(
        result,
        Err(StoreError::Rejected(TournamentError::GameOutOfRange {
            game: 3,
            games: 3
        }))
    );
}

#[test]
fn score_write_to_undefined_stage_is_rejected() {
    let mut store = MemoryStore::new();
    let tid = staged_tournament(&mut store);
    let rid = store.add_registration(tid, "Anna", &[]).unwrap();

    let result = store.update_registration(
        rid,
        RegistrationPatch {
            game_score: Some(GameScoreWrite {
                stage_index: 5,
                game: 0,
                score: Some(200),
            }),
            ..Default::default()
        },
    );
    assert_eq!(
        result,
        Err(StoreError::Rejected(TournamentError::InvalidStage { stage: 5 }))
    );
}

#[test]
fn current_stage_never_moves_backwards() {
    let mut store = MemoryStore::new();
    let tid = staged_tournament(&mut store);
    let rid = store.add_registration(tid, "Anna", &[]).unwrap();

    store
        .update_registration(
            rid,
            RegistrationPatch {
                current_stage: Some(1),
                ..Default::default()
            },
        )
        .unwrap();
    let result = store.update_registration(
        rid,
        RegistrationPatch {
            current_stage: Some(0),
            ..Default::default()
        },
    );
    assert_eq!(
        result,
        Err(StoreError::Rejected(TournamentError::StageRegression {
            from: 1,
            to: 0
        }))
    );
}

#[test]
fn qualifying_stage_takes_no_carryover() {
    let mut store = MemoryStore::new();
    let tid = staged_tournament(&mut store);
    let rid = store.add_registration(tid, "Anna", &[]).unwrap();

    let result = store.update_registration(
        rid,
        RegistrationPatch {
            stage_carryover: Some((0, 50)),
            ..Default::default()
        },
    );
    assert_eq!(
        result,
        Err(StoreError::Rejected(
            TournamentError::QualifyingStageCarryover
        ))
    );
}

#[test]
fn rejected_patch_leaves_registration_unchanged() {
    let mut store = MemoryStore::new();
    let tid = staged_tournament(&mut store);
    let rid = store.add_registration(tid, "Anna", &[]).unwrap();

    // current_stage bump bundled with an invalid game write: nothing applies.
    let result = store.update_registration(
        rid,
        RegistrationPatch {
            current_stage: Some(1),
            stage_carryover: None,
            game_score: Some(GameScoreWrite {
                stage_index: 5,
                game: 0,
                score: Some(200),
            }),
        },
    );
    assert!(result.is_err());
    assert_eq!(store.get_registration(rid).unwrap().current_stage, 0);
}

#[test]
fn unknown_ids_are_not_found() {
    let store = MemoryStore::new();
    let tid = uuid::Uuid::new_v4();
    assert_eq!(
        store.get_tournament(tid),
        Err(StoreError::TournamentNotFound(tid))
    );
    let rid = uuid::Uuid::new_v4();
    assert_eq!(
        store.get_registration(rid),
        Err(StoreError::RegistrationNotFound(rid))
    );
}
