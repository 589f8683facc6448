//! Single binary web server: JSON API over one GameManager per organizer session.
//! Run with: cargo run --bin web
//! Listens on 0.0.0.0:8080 by default. Override with env: HOST, PORT.
//! Sessions are saved as DATA_DIR/<session id>.json (DATA_DIR defaults to "data").

use actix_web::{
    delete, get, post, put,
    web::{Data, Json, Path},
    App, HttpResponse, HttpServer, Responder,
};
use badminton_game_manager::{
    CourtId, GameId, GameManager, JsonFileRepository, ManagerError, PlayerId, PlayerProfile,
    SessionId, UpdateError,
};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;
use std::time::{Duration, Instant};

/// Per-session entry: manager state + last activity time (for auto-cleanup).
struct SessionEntry {
    manager: GameManager,
    last_activity: Instant,
}

/// In-memory sessions by id. Idle entries are evicted; their saved file stays on disk.
type AppState = Data<RwLock<HashMap<SessionId, SessionEntry>>>;

struct AppConfig {
    data_dir: PathBuf,
}

/// Inactivity threshold: sessions not accessed for this long are dropped from memory.
const INACTIVITY_TIMEOUT: Duration = Duration::from_secs(12 * 3600);

/// Number of games returned by the stats endpoint.
const RECENT_GAMES: usize = 10;

#[derive(serde::Serialize)]
struct HealthResponse {
    ok: bool,
    service: &'static str,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlayerIdsBody {
    player_ids: [PlayerId; 4],
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConfirmBody {
    court_id: Option<CourtId>,
}

#[derive(Deserialize)]
struct CourtNameBody {
    #[serde(default)]
    name: String,
}

#[derive(Deserialize)]
struct SessionPath {
    id: SessionId,
}

#[derive(Deserialize)]
struct SessionPlayerPath {
    id: SessionId,
    player_id: PlayerId,
}

#[derive(Deserialize)]
struct SessionGamePath {
    id: SessionId,
    game_id: GameId,
}

#[derive(Deserialize)]
struct SessionCourtPath {
    id: SessionId,
    court_id: CourtId,
}

fn session_repo(config: &AppConfig, id: SessionId) -> JsonFileRepository {
    JsonFileRepository::new(config.data_dir.join(format!("{}.json", id)))
}

fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(serde_json::json!({ "error": "No session" }))
}

fn error_response(e: &ManagerError) -> HttpResponse {
    let body = serde_json::json!({ "error": e.to_string() });
    match e {
        ManagerError::PlayerNotFound(_)
        | ManagerError::GameNotFound(_)
        | ManagerError::CourtNotFound(_) => HttpResponse::NotFound().json(body),
        _ => HttpResponse::BadRequest().json(body),
    }
}

/// In-memory entry for `id`, loading it from disk if it was evicted.
fn session_entry<'a>(
    sessions: &'a mut HashMap<SessionId, SessionEntry>,
    config: &AppConfig,
    id: SessionId,
) -> Option<&'a mut SessionEntry> {
    if !sessions.contains_key(&id) {
        let repo = session_repo(config, id);
        if !repo.path().exists() {
            return None;
        }
        match GameManager::load(id, &repo) {
            Ok(manager) => {
                sessions.insert(
                    id,
                    SessionEntry {
                        manager,
                        last_activity: Instant::now(),
                    },
                );
            }
            Err(e) => {
                log::warn!("Could not load session {}: {}", id, e);
                return None;
            }
        }
    }
    sessions.get_mut(&id)
}

/// Run one mutation on a session, save it, and respond with the full state.
/// A failed save leaves the in-memory session as it was.
fn with_session<F>(state: &AppState, config: &AppConfig, id: SessionId, f: F) -> HttpResponse
where
    F: FnOnce(&mut GameManager) -> Result<(), ManagerError>,
{
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    let entry = match session_entry(&mut g, config, id) {
        Some(e) => e,
        None => return not_found(),
    };
    entry.last_activity = Instant::now();
    match entry.manager.update_and_save(&session_repo(config, id), f) {
        Ok(()) => HttpResponse::Ok().json(&entry.manager),
        Err(UpdateError::Manager(e)) => error_response(&e),
        Err(UpdateError::Storage(e)) => {
            log::error!("Failed to save session {}: {}", id, e);
            HttpResponse::InternalServerError().json(serde_json::json!({ "error": e.to_string() }))
        }
    }
}

#[get("/api/health")]
async fn api_health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        ok: true,
        service: "badminton-game-manager",
    })
}

/// Create a new session (returns it with id; client stores id for subsequent requests).
#[post("/api/sessions")]
async fn api_create_session(state: AppState, config: Data<AppConfig>) -> HttpResponse {
    let manager = GameManager::new();
    let id = manager.id;
    if let Err(e) = manager.save(&session_repo(&config, id)) {
        log::error!("Failed to save session {}: {}", id, e);
        return HttpResponse::InternalServerError().json(serde_json::json!({ "error": e.to_string() }));
    }
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    log::info!("Created session {}", id);
    let entry = g.entry(id).or_insert(SessionEntry {
        manager,
        last_activity: Instant::now(),
    });
    HttpResponse::Ok().json(&entry.manager)
}

/// Get a session by id (404 if unknown). Touching it refreshes last_activity.
#[get("/api/sessions/{id}")]
async fn api_get_session(state: AppState, config: Data<AppConfig>, path: Path<SessionPath>) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    match session_entry(&mut g, &config, path.id) {
        Some(entry) => {
            entry.last_activity = Instant::now();
            HttpResponse::Ok().json(&entry.manager)
        }
        None => not_found(),
    }
}

/// Per-player game counts and the most recent games.
#[get("/api/sessions/{id}/stats")]
async fn api_session_stats(state: AppState, config: Data<AppConfig>, path: Path<SessionPath>) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    match session_entry(&mut g, &config, path.id) {
        Some(entry) => {
            entry.last_activity = Instant::now();
            let m = &entry.manager;
            HttpResponse::Ok().json(serde_json::json!({
                "players": m.player_stats(),
                "recentGames": m.recent_games(RECENT_GAMES),
                "totalGames": m.games.len(),
            }))
        }
        None => not_found(),
    }
}

#[post("/api/sessions/{id}/players")]
async fn api_add_player(
    state: AppState,
    config: Data<AppConfig>,
    path: Path<SessionPath>,
    body: Json<PlayerProfile>,
) -> HttpResponse {
    with_session(&state, &config, path.id, |m| {
        m.add_player(body.into_inner()).map(|_| ())
    })
}

/// Remove every player and the whole game log.
#[delete("/api/sessions/{id}/players")]
async fn api_reset_players(state: AppState, config: Data<AppConfig>, path: Path<SessionPath>) -> HttpResponse {
    with_session(&state, &config, path.id, |m| {
        m.reset_players();
        Ok(())
    })
}

/// Clear all rests and pins.
#[post("/api/sessions/{id}/players/reset-states")]
async fn api_reset_player_states(
    state: AppState,
    config: Data<AppConfig>,
    path: Path<SessionPath>,
) -> HttpResponse {
    with_session(&state, &config, path.id, |m| {
        m.reset_player_states();
        Ok(())
    })
}

#[put("/api/sessions/{id}/players/{player_id}")]
async fn api_update_player(
    state: AppState,
    config: Data<AppConfig>,
    path: Path<SessionPlayerPath>,
    body: Json<PlayerProfile>,
) -> HttpResponse {
    with_session(&state, &config, path.id, |m| {
        m.update_player(path.player_id, body.into_inner())
    })
}

#[delete("/api/sessions/{id}/players/{player_id}")]
async fn api_remove_player(
    state: AppState,
    config: Data<AppConfig>,
    path: Path<SessionPlayerPath>,
) -> HttpResponse {
    with_session(&state, &config, path.id, |m| {
        m.remove_player(path.player_id).map(|_| ())
    })
}

/// Toggle active / resting.
#[post("/api/sessions/{id}/players/{player_id}/status")]
async fn api_toggle_status(
    state: AppState,
    config: Data<AppConfig>,
    path: Path<SessionPlayerPath>,
) -> HttpResponse {
    with_session(&state, &config, path.id, |m| {
        m.toggle_status(path.player_id).map(|_| ())
    })
}

#[post("/api/sessions/{id}/players/{player_id}/pin")]
async fn api_toggle_pinned(
    state: AppState,
    config: Data<AppConfig>,
    path: Path<SessionPlayerPath>,
) -> HttpResponse {
    with_session(&state, &config, path.id, |m| {
        m.toggle_pinned(path.player_id).map(|_| ())
    })
}

#[post("/api/sessions/{id}/pick/random")]
async fn api_pick_random(state: AppState, config: Data<AppConfig>, path: Path<SessionPath>) -> HttpResponse {
    with_session(&state, &config, path.id, |m| m.propose_random().map(|_| ()))
}

#[post("/api/sessions/{id}/pick/smart")]
async fn api_pick_smart(state: AppState, config: Data<AppConfig>, path: Path<SessionPath>) -> HttpResponse {
    with_session(&state, &config, path.id, |m| m.propose_smart().map(|_| ()))
}

#[post("/api/sessions/{id}/pick/custom")]
async fn api_pick_custom(
    state: AppState,
    config: Data<AppConfig>,
    path: Path<SessionPath>,
    body: Json<PlayerIdsBody>,
) -> HttpResponse {
    with_session(&state, &config, path.id, |m| {
        m.propose_custom(body.player_ids).map(|_| ())
    })
}

/// Confirm the proposal; with a court id the game also starts on that court.
#[post("/api/sessions/{id}/pick/confirm")]
async fn api_pick_confirm(
    state: AppState,
    config: Data<AppConfig>,
    path: Path<SessionPath>,
    body: Option<Json<ConfirmBody>>,
) -> HttpResponse {
    let court_id = body.and_then(|b| b.court_id);
    with_session(&state, &config, path.id, |m| {
        let confirmed = match court_id {
            Some(court_id) => m.confirm_proposal_on_court(court_id),
            None => m.confirm_proposal(),
        };
        confirmed.map(|_| ())
    })
}

#[post("/api/sessions/{id}/pick/reject")]
async fn api_pick_reject(state: AppState, config: Data<AppConfig>, path: Path<SessionPath>) -> HttpResponse {
    with_session(&state, &config, path.id, |m| m.reject_proposal().map(|_| ()))
}

#[post("/api/sessions/{id}/pick/cancel")]
async fn api_pick_cancel(state: AppState, config: Data<AppConfig>, path: Path<SessionPath>) -> HttpResponse {
    with_session(&state, &config, path.id, |m| m.cancel_proposal())
}

#[delete("/api/sessions/{id}/games")]
async fn api_reset_games(state: AppState, config: Data<AppConfig>, path: Path<SessionPath>) -> HttpResponse {
    with_session(&state, &config, path.id, |m| {
        m.reset_games();
        Ok(())
    })
}

#[delete("/api/sessions/{id}/games/{game_id}")]
async fn api_remove_game(
    state: AppState,
    config: Data<AppConfig>,
    path: Path<SessionGamePath>,
) -> HttpResponse {
    with_session(&state, &config, path.id, |m| {
        m.remove_game(path.game_id).map(|_| ())
    })
}

#[post("/api/sessions/{id}/courts")]
async fn api_add_court(
    state: AppState,
    config: Data<AppConfig>,
    path: Path<SessionPath>,
    body: Option<Json<CourtNameBody>>,
) -> HttpResponse {
    let name = body.map(|b| b.into_inner().name).unwrap_or_default();
    with_session(&state, &config, path.id, |m| {
        m.add_court(&name);
        Ok(())
    })
}

/// End every court game and remove all courts.
#[delete("/api/sessions/{id}/courts")]
async fn api_reset_courts(state: AppState, config: Data<AppConfig>, path: Path<SessionPath>) -> HttpResponse {
    with_session(&state, &config, path.id, |m| {
        m.reset_courts();
        Ok(())
    })
}

#[put("/api/sessions/{id}/courts/{court_id}")]
async fn api_rename_court(
    state: AppState,
    config: Data<AppConfig>,
    path: Path<SessionCourtPath>,
    body: Json<CourtNameBody>,
) -> HttpResponse {
    with_session(&state, &config, path.id, |m| {
        m.rename_court(path.court_id, &body.name)
    })
}

#[delete("/api/sessions/{id}/courts/{court_id}")]
async fn api_remove_court(
    state: AppState,
    config: Data<AppConfig>,
    path: Path<SessionCourtPath>,
) -> HttpResponse {
    with_session(&state, &config, path.id, |m| m.remove_court(path.court_id))
}

/// Start a game on a free court with four hand-picked players.
#[post("/api/sessions/{id}/courts/{court_id}/assign")]
async fn api_assign_court(
    state: AppState,
    config: Data<AppConfig>,
    path: Path<SessionCourtPath>,
    body: Json<PlayerIdsBody>,
) -> HttpResponse {
    with_session(&state, &config, path.id, |m| {
        m.assign_court(path.court_id, body.player_ids)
    })
}

#[post("/api/sessions/{id}/courts/{court_id}/end")]
async fn api_end_court_game(
    state: AppState,
    config: Data<AppConfig>,
    path: Path<SessionCourtPath>,
) -> HttpResponse {
    with_session(&state, &config, path.id, |m| m.end_court_game(path.court_id))
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let host = std::env::var("HOST").unwrap_or_else(|_| default_host());
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or_else(default_port);
    let data_dir = std::env::var("DATA_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| default_data_dir());
    let bind = (host.as_str(), port);
    log::info!("Starting server at http://{}:{}", bind.0, bind.1);
    log::info!("Saving sessions under {}", data_dir.display());

    let state = Data::new(RwLock::new(HashMap::<SessionId, SessionEntry>::new()));
    let config = Data::new(AppConfig { data_dir });

    // Background task: every 30 minutes, drop sessions inactive for 12+ hours from memory
    let state_cleanup = state.clone();
    actix_web::rt::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(30 * 60));
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        loop {
            interval.tick().await;
            let mut g = match state_cleanup.write() {
                Ok(guard) => guard,
                Err(_) => continue,
            };
            let before = g.len();
            g.retain(|_, entry| entry.last_activity.elapsed() < INACTIVITY_TIMEOUT);
            let removed = before - g.len();
            if removed > 0 {
                log::info!("Evicted {} inactive session(s) (no activity for 12h)", removed);
            }
        }
    });

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .app_data(config.clone())
            .service(api_health)
            .service(api_create_session)
            .service(api_get_session)
            .service(api_session_stats)
            .service(api_add_player)
            .service(api_reset_players)
            .service(api_reset_player_states)
            .service(api_update_player)
            .service(api_remove_player)
            .service(api_toggle_status)
            .service(api_toggle_pinned)
            .service(api_pick_random)
            .service(api_pick_smart)
            .service(api_pick_custom)
            .service(api_pick_confirm)
            .service(api_pick_reject)
            .service(api_pick_cancel)
            .service(api_reset_games)
            .service(api_remove_game)
            .service(api_add_court)
            .service(api_reset_courts)
            .service(api_rename_court)
            .service(api_remove_court)
            .service(api_assign_court)
            .service(api_end_court_game)
    })
    .bind(bind)?
    .run()
    .await
}
