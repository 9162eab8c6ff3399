//! Single binary web server: organizer and spectator REST API over the
//! tournament engine, backed by the in-memory document store.
//! Run with: cargo run --bin web
//! Listens on 0.0.0.0:8080 by default; override with env: HOST, PORT.

use actix_files::Files;
use actix_session::{storage::CookieSessionStore, Session, SessionMiddleware};
use actix_web::{
    get, post, put,
    web::{Data, Json, Path},
    App, HttpResponse, HttpServer, Responder,
};
use padel_tournament_web::{
    advance_round, record_score, reopen, start_tournament, Entrant, Format, MemoryStore, Mode,
    RemoteStore, TournamentConfig, TournamentDocument, TournamentError, TournamentId,
    TournamentSession,
};
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use uuid::Uuid;

/// Shared process state: the store plus one session per open tournament.
struct AppState {
    store: Arc<MemoryStore>,
    sessions: RwLock<HashMap<TournamentId, Arc<TournamentSession>>>,
}

impl AppState {
    fn new() -> Self {
        Self {
            store: Arc::new(MemoryStore::new()),
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// Session for a tournament id, opening it from the store on first
    /// access (spectators joining by link).
    fn session(&self, id: TournamentId) -> Result<Arc<TournamentSession>, TournamentError> {
        if let Ok(sessions) = self.sessions.read() {
            if let Some(session) = sessions.get(&id) {
                return Ok(Arc::clone(session));
            }
        }
        let mut sessions = self
            .sessions
            .write()
            .map_err(|_| TournamentError::Persistence("session registry lock poisoned".into()))?;
        if let Some(session) = sessions.get(&id) {
            return Ok(Arc::clone(session));
        }
        let session = Arc::new(TournamentSession::open(
            Arc::clone(&self.store) as Arc<dyn RemoteStore>,
            id,
        )?);
        Arc::clone(&session).spawn_change_listener();
        sessions.insert(id, Arc::clone(&session));
        Ok(session)
    }
}

#[derive(serde::Serialize)]
struct HealthResponse {
    ok: bool,
    service: &'static str,
}

#[derive(Deserialize)]
struct TeamBody {
    name: String,
    player_1: String,
    player_2: String,
}

#[derive(Deserialize)]
struct CreateTournamentBody {
    name: String,
    format: Format,
    #[serde(default)]
    mode: Mode,
    #[serde(default = "default_points_per_match")]
    points_per_match: u32,
    #[serde(default = "default_fixed_points")]
    fixed_points: bool,
    #[serde(default = "default_court_count")]
    court_count: u32,
    #[serde(default)]
    round_count: Option<u32>,
    /// Player names (individual modes).
    #[serde(default)]
    entrants: Vec<String>,
    /// Team entries (team modes).
    #[serde(default)]
    teams: Vec<TeamBody>,
}

fn default_points_per_match() -> u32 {
    24
}

fn default_fixed_points() -> bool {
    true
}

fn default_court_count() -> u32 {
    1
}

#[derive(Deserialize)]
struct ScoreBody {
    score_1: Option<f64>,
    score_2: Option<f64>,
}

#[derive(Deserialize)]
struct RenameBody {
    name: String,
}

/// Path segment: tournament id (e.g. /api/tournaments/{id})
#[derive(Deserialize)]
struct TournamentPath {
    id: TournamentId,
}

#[derive(Deserialize)]
struct TournamentMatchPath {
    id: TournamentId,
    match_id: Uuid,
}

#[derive(Deserialize)]
struct TournamentEntrantPath {
    id: TournamentId,
    entrant_id: Uuid,
}

fn error_response(e: &TournamentError) -> HttpResponse {
    let body = serde_json::json!({ "error": e.to_string() });
    match e {
        TournamentError::NotFound(_) => HttpResponse::NotFound().json(body),
        TournamentError::Persistence(_) => HttpResponse::InternalServerError().json(body),
        _ => HttpResponse::BadRequest().json(body),
    }
}

fn organiser_cookie(id: TournamentId) -> String {
    format!("organiser:{}", id)
}

/// The write credential: the cookie session must hold the document's key.
fn is_organiser(session: &Session, doc: &TournamentDocument) -> bool {
    matches!(
        session.get::<String>(&organiser_cookie(doc.id)),
        Ok(Some(key)) if key == doc.meta.organiser_key
    )
}

#[get("/api/health")]
async fn api_health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        ok: true,
        service: "padel-tournament-web",
    })
}

/// Avoid 404 in browser tab: favicon not required for app logic.
#[get("/favicon.ico")]
async fn favicon() -> HttpResponse {
    HttpResponse::NoContent().finish()
}

/// Create a tournament in Setup. The creator's cookie session receives the
/// organiser key; the response carries the full document.
#[post("/api/tournaments")]
async fn api_create_tournament(
    state: Data<AppState>,
    session: Session,
    body: Json<CreateTournamentBody>,
) -> HttpResponse {
    let config = TournamentConfig {
        format: body.format,
        mode: body.mode,
        points_per_match: body.points_per_match,
        fixed_points: body.fixed_points,
        court_count: body.court_count,
        round_count: body.round_count,
    };
    let entrants: Vec<Entrant> = if body.mode == Mode::Team || body.format == Format::League {
        body.teams
            .iter()
            .enumerate()
            .map(|(i, t)| Entrant::team(t.name.clone(), i, t.player_1.clone(), t.player_2.clone()))
            .collect()
    } else {
        body.entrants
            .iter()
            .enumerate()
            .map(|(i, name)| Entrant::player(name.trim(), i))
            .collect()
    };
    let document = TournamentDocument::new(body.name.trim(), config, entrants);
    let id = document.id;
    let key = document.meta.organiser_key.clone();

    let tournament_session = match TournamentSession::create(
        Arc::clone(&state.store) as Arc<dyn RemoteStore>,
        document,
    ) {
        Ok(s) => Arc::new(s),
        Err(e) => return error_response(&e),
    };
    Arc::clone(&tournament_session).spawn_change_listener();
    let snapshot = match tournament_session.snapshot() {
        Ok(doc) => doc,
        Err(e) => return error_response(&e),
    };
    let mut sessions = match state.sessions.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    sessions.insert(id, tournament_session);
    if let Err(e) = session.insert(organiser_cookie(id), key) {
        log::warn!("failed to store organiser key in session: {}", e);
    }
    HttpResponse::Ok().json(snapshot)
}

/// Get a tournament by id (404 if the store has no document).
#[get("/api/tournaments/{id}")]
async fn api_get_tournament(state: Data<AppState>, path: Path<TournamentPath>) -> HttpResponse {
    match state.session(path.id).and_then(|s| s.snapshot()) {
        Ok(doc) => HttpResponse::Ok().json(doc),
        Err(e) => error_response(&e),
    }
}

/// Current standings, recomputed from the recorded scores.
#[get("/api/tournaments/{id}/standings")]
async fn api_get_standings(state: Data<AppState>, path: Path<TournamentPath>) -> HttpResponse {
    match state.session(path.id).and_then(|s| s.standings()) {
        Ok(standings) => HttpResponse::Ok().json(standings),
        Err(e) => error_response(&e),
    }
}

/// Generate fixtures and activate the tournament (organiser only).
#[post("/api/tournaments/{id}/start")]
async fn api_start_tournament(
    state: Data<AppState>,
    session: Session,
    path: Path<TournamentPath>,
) -> HttpResponse {
    with_organiser(&state, &session, path.id, start_tournament)
}

/// Record a score pair on a match (organiser only).
#[put("/api/tournaments/{id}/matches/{match_id}/score")]
async fn api_record_score(
    state: Data<AppState>,
    session: Session,
    path: Path<TournamentMatchPath>,
    body: Json<ScoreBody>,
) -> HttpResponse {
    with_organiser(&state, &session, path.id, |doc| {
        record_score(doc, path.match_id, body.score_1, body.score_2)
    })
}

/// Advance past the current round once complete (organiser only).
#[post("/api/tournaments/{id}/advance")]
async fn api_advance_round(
    state: Data<AppState>,
    session: Session,
    path: Path<TournamentPath>,
) -> HttpResponse {
    with_organiser(&state, &session, path.id, advance_round)
}

/// Reopen a completed tournament for corrections (organiser only).
#[post("/api/tournaments/{id}/reopen")]
async fn api_reopen_tournament(
    state: Data<AppState>,
    session: Session,
    path: Path<TournamentPath>,
) -> HttpResponse {
    with_organiser(&state, &session, path.id, reopen)
}

/// Rename an entrant; identity never changes (organiser only).
#[put("/api/tournaments/{id}/entrants/{entrant_id}/name")]
async fn api_rename_entrant(
    state: Data<AppState>,
    session: Session,
    path: Path<TournamentEntrantPath>,
    body: Json<RenameBody>,
) -> HttpResponse {
    with_organiser(&state, &session, path.id, |doc| {
        doc.rename_entrant(path.entrant_id, body.name.trim())
    })
}

/// Run an organiser-gated mutation through the session and respond with
/// the updated document.
fn with_organiser(
    state: &AppState,
    session: &Session,
    id: TournamentId,
    f: impl FnOnce(&mut TournamentDocument) -> Result<(), TournamentError>,
) -> HttpResponse {
    let tournament_session = match state.session(id) {
        Ok(s) => s,
        Err(e) => return error_response(&e),
    };
    let doc = match tournament_session.snapshot() {
        Ok(doc) => doc,
        Err(e) => return error_response(&e),
    };
    if !is_organiser(session, &doc) {
        return HttpResponse::Forbidden()
            .json(serde_json::json!({ "error": "Organiser key required" }));
    }
    match tournament_session.mutate(f) {
        Ok(()) => match tournament_session.snapshot() {
            Ok(doc) => HttpResponse::Ok().json(doc),
            Err(e) => error_response(&e),
        },
        Err(e) => error_response(&e),
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

    let state = Data::new(AppState::new());
    let cookie_key = actix_web::cookie::Key::generate();

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(
                SessionMiddleware::builder(CookieSessionStore::default(), cookie_key.clone())
                    .cookie_secure(false)
                    .build(),
            )
            .service(api_health)
            .service(favicon)
            .service(api_create_tournament)
            .service(api_get_tournament)
            .service(api_get_standings)
            .service(api_start_tournament)
            .service(api_record_score)
            .service(api_advance_round)
            .service(api_reopen_tournament)
            .service(api_rename_entrant)
            .service(Files::new("/static", "static"))
    })
    .bind(bind)?
    .run()
    .await
}
