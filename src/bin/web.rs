//! Single binary web server: HTML from templates/, static from /static, API via REST.
//! Run with: cargo run --bin web
//! Listens on 0.0.0.0:8080 by default so the app is reachable via DNS on a VPS.
//! Override with env: HOST (e.g. 0.0.0.0), PORT (e.g. 8080).

use actix_files::Files;
use actix_web::{
    get, post, put,
    web::{self, Data, Json, Path, Query},
    App, HttpResponse, HttpServer, Responder,
};
use bowling_tournament_web::{
    normalize_game_score, run_advancement, stage_standings, GameScoreWrite, MemoryStore,
    RecordStore, Registration, RegistrationId, RegistrationPatch, SquadId, StoreError, Tournament,
    TournamentError, TournamentFormat, TournamentId,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::RwLock;

/// In-memory state: one record store behind a lock. The write lock also
/// serializes advancement runs, so two operators cannot double-advance.
type AppState = Data<RwLock<MemoryStore>>;

#[derive(Serialize)]
struct HealthResponse {
    ok: bool,
    service: &'static str,
}

#[derive(Deserialize)]
struct CreateTournamentBody {
    name: String,
    format: TournamentFormat,
}

#[derive(Deserialize)]
struct AddSquadBody {
    name: String,
    capacity: u32,
    schedule: DateTime<Utc>,
}

#[derive(Deserialize)]
struct RegisterBody {
    player_name: String,
    #[serde(default)]
    squads: Vec<SquadId>,
}

#[derive(Deserialize)]
struct RecordScoreBody {
    /// Stage to record into; defaults to the bowler's current stage.
    stage: Option<usize>,
    /// 0-based game number within the stage.
    game: usize,
    /// Pinfall for the game; null (or out-of-range) marks it not played.
    score: Option<i64>,
}

#[derive(Deserialize)]
struct StandingsQuery {
    #[serde(default)]
    stage: usize,
    /// Restrict to one squad (qualifying-stage display grouping).
    squad: Option<SquadId>,
}

/// Path segment: tournament id (e.g. /api/tournaments/{id})
#[derive(Deserialize)]
struct TournamentPath {
    id: TournamentId,
}

/// Path segment: registration id (e.g. /api/registrations/{rid}/scores)
#[derive(Deserialize)]
struct RegistrationPath {
    rid: RegistrationId,
}

/// Tournament detail: definition plus its registrations.
#[derive(Serialize)]
struct TournamentView {
    tournament: Tournament,
    registrations: Vec<Registration>,
}

fn error_json(e: &StoreError) -> HttpResponse {
    let body = serde_json::json!({ "error": e.to_string() });
    match e {
        StoreError::TournamentNotFound(_) | StoreError::RegistrationNotFound(_) => {
            HttpResponse::NotFound().json(body)
        }
        StoreError::Rejected(_) => HttpResponse::BadRequest().json(body),
    }
}

#[get("/api/health")]
async fn api_health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        ok: true,
        service: "bowling-tournament-web",
    })
}

/// Avoid 404 in browser tab: favicon not required for app logic.
#[get("/favicon.ico")]
async fn favicon() -> HttpResponse {
    HttpResponse::NoContent().finish()
}

/// Create a new tournament from a format descriptor (validated here).
#[post("/api/tournaments")]
async fn api_create_tournament(state: AppState, body: Json<CreateTournamentBody>) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    let body = body.into_inner();
    match g.create_tournament(body.name, body.format) {
        Ok(id) => match g.get_tournament(id) {
            Ok(t) => HttpResponse::Ok().json(t),
            Err(e) => error_json(&e),
        },
        Err(e) => error_json(&e),
    }
}

/// Get a tournament with its registrations (404 if not found).
#[get("/api/tournaments/{id}")]
async fn api_get_tournament(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    let g = match state.read() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    let tournament = match g.get_tournament(path.id) {
        Ok(t) => t,
        Err(e) => return error_json(&e),
    };
    match g.list_registrations(path.id) {
        Ok(registrations) => HttpResponse::Ok().json(TournamentView {
            tournament,
            registrations,
        }),
        Err(e) => error_json(&e),
    }
}

/// Add a squad to a tournament.
#[post("/api/tournaments/{id}/squads")]
async fn api_add_squad(
    state: AppState,
    path: Path<TournamentPath>,
    body: Json<AddSquadBody>,
) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    let body = body.into_inner();
    match g.add_squad(path.id, body.name, body.capacity, body.schedule) {
        Ok(squad_id) => HttpResponse::Ok().json(serde_json::json!({ "squad_id": squad_id })),
        Err(e) => error_json(&e),
    }
}

/// Register a bowler (optionally into squads).
#[post("/api/tournaments/{id}/registrations")]
async fn api_register(
    state: AppState,
    path: Path<TournamentPath>,
    body: Json<RegisterBody>,
) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    match g.add_registration(path.id, &body.player_name, &body.squads) {
        Ok(rid) => match g.get_registration(rid) {
            Ok(r) => HttpResponse::Ok().json(r),
            Err(e) => error_json(&e),
        },
        Err(e) => error_json(&e),
    }
}

/// Record one game score for a registration. Out-of-range or null input is
/// stored as "not played", never as a zero and never as an error.
#[put("/api/registrations/{rid}/scores")]
async fn api_record_score(
    state: AppState,
    path: Path<RegistrationPath>,
    body: Json<RecordScoreBody>,
) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    let registration = match g.get_registration(path.rid) {
        Ok(r) => r,
        Err(e) => return error_json(&e),
    };
    let stage_index = body.stage.unwrap_or(registration.current_stage);
    let patch = RegistrationPatch {
        current_stage: None,
        stage_carryover: None,
        game_score: Some(GameScoreWrite {
            stage_index,
            game: body.game,
            score: normalize_game_score(body.score),
        }),
    };
    match g.update_registration(path.rid, patch) {
        Ok(()) => match g.get_registration(path.rid) {
            Ok(r) => HttpResponse::Ok().json(r),
            Err(e) => error_json(&e),
        },
        Err(e) => error_json(&e),
    }
}

/// Aggregated, ranked standings for one stage (optionally one squad).
#[get("/api/tournaments/{id}/standings")]
async fn api_standings(
    state: AppState,
    path: Path<TournamentPath>,
    query: Query<StandingsQuery>,
) -> HttpResponse {
    let g = match state.read() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    let tournament = match g.get_tournament(path.id) {
        Ok(t) => t,
        Err(e) => return error_json(&e),
    };
    if tournament.format.has_stages && query.stage >= tournament.format.stages.len() {
        return error_json(&StoreError::Rejected(TournamentError::InvalidStage {
            stage: query.stage,
        }));
    }
    if !tournament.format.has_stages && query.stage != 0 {
        return error_json(&StoreError::Rejected(TournamentError::InvalidStage {
            stage: query.stage,
        }));
    }
    let mut registrations = match g.list_registrations(path.id) {
        Ok(r) => r,
        Err(e) => return error_json(&e),
    };
    if let Some(squad_id) = query.squad {
        if tournament.squad(squad_id).is_none() {
            return error_json(&StoreError::Rejected(TournamentError::SquadNotFound(
                squad_id,
            )));
        }
        registrations.retain(|r| r.is_assigned_to(squad_id));
    }
    let standings = stage_standings(&tournament, &registrations, query.stage);
    HttpResponse::Ok().json(standings)
}

/// Run advancement for every eligible stage. Safe to re-run: bowlers already
/// advanced are skipped. On a single-stage tournament this is "not
/// applicable" (400), not a crash.
#[post("/api/tournaments/{id}/advance")]
async fn api_advance(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    match run_advancement(&mut *g, path.id) {
        Ok(report) => HttpResponse::Ok().json(report),
        Err(e) => error_json(&e),
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let host = std::env::var("HOST").unwrap_or_else(|_| default_host());
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or_else(default_port);
    let bind = (host.as_str(), port);
    log::info!("Starting server at http://{}:{}", bind.0, bind.1);

    let state = Data::new(RwLock::new(MemoryStore::new()));

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .route("/", web::get().to(serve_index_async))
            .service(api_health)
            .service(favicon)
            .service(api_create_tournament)
            .service(api_get_tournament)
            .service(api_add_squad)
            .service(api_register)
            .service(api_record_score)
            .service(api_standings)
            .service(api_advance)
            .service(Files::new("/static", "static").show_files_listing())
    })
    .bind(bind)?
    .run()
    .await
}

async fn serve_index_async() -> HttpResponse {
    let html = include_str!("../../templates/index.html");
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(html)
}
