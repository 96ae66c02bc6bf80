//! Single binary web server: JSON API over seasons, schedules and playoff brackets.
//! Run with: cargo run --bin web
//! Listens on 0.0.0.0:8080 by default. Override with env: HOST, PORT.
//! Routes that write require the `X-Admin-Token` header when ADMIN_TOKEN is set.

use actix_web::{
    delete, get, post, put,
    web::{Data, Json, Path, ServiceConfig},
    App, HttpRequest, HttpResponse, HttpServer, Responder,
};
use chrono::{NaiveDate, Utc};
use league_playoffs::{
    advance_winner, champion, clear_seeds, generate_bracket, generate_schedule, reseed_teams,
    seed_teams, start_game, Bracket, BracketId, LeagueError, LeagueStore, MemoryStore, NewBracket,
    PlayoffGame, PlayoffTeam, SeasonId, SeedAssignment, ServerConfig, TeamId,
};
use serde::{Deserialize, Serialize};
use std::sync::RwLock;

/// In-memory league data. Every write operation holds the write lock for its whole run,
/// so concurrent schedule generations or advancements never interleave.
type AppState = Data<RwLock<MemoryStore>>;

type AppConfig = Data<ServerConfig>;

const ADMIN_HEADER: &str = "X-Admin-Token";

#[derive(Serialize)]
struct HealthResponse {
    ok: bool,
    service: &'static str,
}

#[derive(Deserialize)]
struct CreateSeasonBody {
    name: String,
}

#[derive(Deserialize)]
struct AddTeamBody {
    name: String,
}

#[derive(Deserialize)]
struct TeamRecordBody {
    wins: u32,
    losses: u32,
}

#[derive(Deserialize)]
struct GenerateScheduleBody {
    /// First game date; defaults to today.
    #[serde(default)]
    start_date: Option<NaiveDate>,
}

#[derive(Deserialize)]
struct SeedTeamsBody {
    team_ids: Vec<TeamId>,
}

#[derive(Deserialize)]
struct ReseedTeamsBody {
    teams: Vec<SeedAssignment>,
}

#[derive(Deserialize)]
struct AdvanceWinnerBody {
    winner_team_id: TeamId,
}

/// Path segment: season id (e.g. /api/seasons/{id})
#[derive(Deserialize)]
struct SeasonPath {
    id: SeasonId,
}

/// Path segment: team id (e.g. /api/teams/{id})
#[derive(Deserialize)]
struct TeamPath {
    id: TeamId,
}

/// Path segment: bracket id (e.g. /api/brackets/{id})
#[derive(Deserialize)]
struct BracketPath {
    id: BracketId,
}

/// Path segments: bracket id, round and position (e.g. /api/brackets/{id}/games/{round}/{position})
#[derive(Deserialize)]
struct GamePath {
    id: BracketId,
    round: u32,
    position: u32,
}

/// Bracket with its seeds (by seed) and games (by round, position).
#[derive(Serialize)]
struct BracketView {
    bracket: Bracket,
    teams: Vec<PlayoffTeam>,
    games: Vec<PlayoffGame>,
    champion: Option<TeamId>,
}

fn bracket_view(store: &MemoryStore, id: BracketId) -> Result<BracketView, LeagueError> {
    let bracket = store.get_bracket(id)?;
    let teams = store.list_playoff_teams(id)?;
    let games = store.list_playoff_games(id)?;
    let champion = champion(&games);
    Ok(BracketView {
        bracket,
        teams,
        games,
        champion,
    })
}

fn error_response(e: &LeagueError) -> HttpResponse {
    let body = serde_json::json!({ "error": e.to_string(), "code": e.code() });
    if e.is_not_found() {
        HttpResponse::NotFound().json(body)
    } else if matches!(e, LeagueError::BracketCorruption { .. }) {
        HttpResponse::Conflict().json(body)
    } else {
        HttpResponse::BadRequest().json(body)
    }
}

fn lock_error() -> HttpResponse {
    HttpResponse::InternalServerError().body("lock error")
}

/// Admin gate: `Some(response)` when the request must be rejected.
fn reject_non_admin(req: &HttpRequest, config: &ServerConfig) -> Option<HttpResponse> {
    let token = req
        .headers()
        .get(ADMIN_HEADER)
        .and_then(|v| v.to_str().ok());
    if config.is_admin(token) {
        None
    } else {
        Some(HttpResponse::Unauthorized().json(serde_json::json!({ "error": "Unauthorized" })))
    }
}

#[get("/api/health")]
async fn api_health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        ok: true,
        service: "league-playoffs",
    })
}

#[post("/api/seasons")]
async fn api_create_season(
    req: HttpRequest,
    config: AppConfig,
    state: AppState,
    body: Json<CreateSeasonBody>,
) -> HttpResponse {
    if let Some(denied) = reject_non_admin(&req, &config) {
        return denied;
    }
    let name = body.name.trim();
    if name.is_empty() {
        return HttpResponse::BadRequest().json(serde_json::json!({ "error": "Name is required" }));
    }
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    let season = g.create_season(name);
    log::info!("Created season {} ({})", season.id, season.name);
    HttpResponse::Created().json(season)
}

#[get("/api/seasons/{id}/teams")]
async fn api_list_teams(state: AppState, path: Path<SeasonPath>) -> HttpResponse {
    let g = match state.read() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    match g.list_teams(path.id) {
        Ok(teams) => HttpResponse::Ok().json(teams),
        Err(e) => error_response(&e),
    }
}

#[post("/api/seasons/{id}/teams")]
async fn api_add_team(
    req: HttpRequest,
    config: AppConfig,
    state: AppState,
    path: Path<SeasonPath>,
    body: Json<AddTeamBody>,
) -> HttpResponse {
    if let Some(denied) = reject_non_admin(&req, &config) {
        return denied;
    }
    if body.name.trim().is_empty() {
        return HttpResponse::BadRequest().json(serde_json::json!({ "error": "Name is required" }));
    }
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    match g.add_team(path.id, body.name.as_str()) {
        Ok(team) => HttpResponse::Created().json(team),
        Err(e) => error_response(&e),
    }
}

/// Set a team's record (result entry happens outside this app; this is its write path).
#[put("/api/teams/{id}/record")]
async fn api_set_team_record(
    req: HttpRequest,
    config: AppConfig,
    state: AppState,
    path: Path<TeamPath>,
    body: Json<TeamRecordBody>,
) -> HttpResponse {
    if let Some(denied) = reject_non_admin(&req, &config) {
        return denied;
    }
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    match g.set_team_record(path.id, body.wins, body.losses) {
        Ok(team) => HttpResponse::Ok().json(team),
        Err(e) => error_response(&e),
    }
}

/// Generate the home-and-away round robin for a season.
#[post("/api/seasons/{id}/schedule")]
async fn api_generate_schedule(
    req: HttpRequest,
    config: AppConfig,
    state: AppState,
    path: Path<SeasonPath>,
    body: Option<Json<GenerateScheduleBody>>,
) -> HttpResponse {
    if let Some(denied) = reject_non_admin(&req, &config) {
        return denied;
    }
    let start_date = body
        .and_then(|b| b.start_date)
        .unwrap_or_else(|| Utc::now().date_naive());
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    match generate_schedule(&mut *g, path.id, start_date) {
        Ok(created) => HttpResponse::Ok().json(serde_json::json!({ "games_created": created })),
        Err(e) => error_response(&e),
    }
}

#[get("/api/seasons/{id}/games")]
async fn api_list_games(state: AppState, path: Path<SeasonPath>) -> HttpResponse {
    let g = match state.read() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    match g.list_games(path.id) {
        Ok(games) => HttpResponse::Ok().json(games),
        Err(e) => error_response(&e),
    }
}

/// Remove a season's schedule (needed before regenerating it).
#[delete("/api/seasons/{id}/games")]
async fn api_clear_games(
    req: HttpRequest,
    config: AppConfig,
    state: AppState,
    path: Path<SeasonPath>,
) -> HttpResponse {
    if let Some(denied) = reject_non_admin(&req, &config) {
        return denied;
    }
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    match g.clear_games(path.id) {
        Ok(removed) => {
            log::info!("Removed {} game(s) from season {}", removed, path.id);
            HttpResponse::Ok().json(serde_json::json!({ "games_removed": removed }))
        }
        Err(e) => error_response(&e),
    }
}

#[post("/api/seasons/{id}/brackets")]
async fn api_create_bracket(
    req: HttpRequest,
    config: AppConfig,
    state: AppState,
    path: Path<SeasonPath>,
    body: Json<NewBracket>,
) -> HttpResponse {
    if let Some(denied) = reject_non_admin(&req, &config) {
        return denied;
    }
    if body.name.trim().is_empty() {
        return HttpResponse::BadRequest().json(serde_json::json!({ "error": "Name is required" }));
    }
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    match g.create_bracket(path.id, body.into_inner()) {
        Ok(bracket) => {
            log::info!("Created {} bracket {} ({})", bracket.bracket_type, bracket.id, bracket.name);
            HttpResponse::Created().json(bracket)
        }
        Err(e) => error_response(&e),
    }
}

#[get("/api/brackets/{id}")]
async fn api_get_bracket(state: AppState, path: Path<BracketPath>) -> HttpResponse {
    let g = match state.read() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    match bracket_view(&g, path.id) {
        Ok(view) => HttpResponse::Ok().json(view),
        Err(e) => error_response(&e),
    }
}

#[get("/api/seasons/{id}")]
async fn api_get_season(state: AppState, path: Path<SeasonPath>) -> HttpResponse {
    let g = match state.read() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    match g.get_season(path.id) {
        Ok(season) => HttpResponse::Ok().json(season),
        Err(e) => error_response(&e),
    }
}

/// Delete a season with its teams, schedule and brackets.
#[delete("/api/seasons/{id}")]
async fn api_delete_season(
    req: HttpRequest,
    config: AppConfig,
    state: AppState,
    path: Path<SeasonPath>,
) -> HttpResponse {
    if let Some(denied) = reject_non_admin(&req, &config) {
        return denied;
    }
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    match g.delete_season(path.id) {
        Ok(()) => {
            log::info!("Deleted season {}", path.id);
            HttpResponse::NoContent().finish()
        }
        Err(e) => error_response(&e),
    }
}

#[get("/api/seasons/{id}/brackets")]
async fn api_list_brackets(state: AppState, path: Path<SeasonPath>) -> HttpResponse {
    let g = match state.read() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    match g.list_brackets(path.id) {
        Ok(brackets) => HttpResponse::Ok().json(brackets),
        Err(e) => error_response(&e),
    }
}

/// Delete a bracket with its seeds and games.
#[delete("/api/brackets/{id}")]
async fn api_delete_bracket(
    req: HttpRequest,
    config: AppConfig,
    state: AppState,
    path: Path<BracketPath>,
) -> HttpResponse {
    if let Some(denied) = reject_non_admin(&req, &config) {
        return denied;
    }
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    match g.delete_bracket(path.id) {
        Ok(()) => HttpResponse::NoContent().finish(),
        Err(e) => error_response(&e),
    }
}

/// Seed teams into a bracket by record (replaces previous seeding).
#[post("/api/brackets/{id}/teams")]
async fn api_seed_teams(
    req: HttpRequest,
    config: AppConfig,
    state: AppState,
    path: Path<BracketPath>,
    body: Json<SeedTeamsBody>,
) -> HttpResponse {
    if let Some(denied) = reject_non_admin(&req, &config) {
        return denied;
    }
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    match seed_teams(&mut *g, path.id, &body.team_ids) {
        Ok(seeded) => HttpResponse::Created().json(serde_json::json!({ "teams_seeded": seeded })),
        Err(e) => error_response(&e),
    }
}

/// Manually reorder seeds.
#[put("/api/brackets/{id}/teams")]
async fn api_reseed_teams(
    req: HttpRequest,
    config: AppConfig,
    state: AppState,
    path: Path<BracketPath>,
    body: Json<ReseedTeamsBody>,
) -> HttpResponse {
    if let Some(denied) = reject_non_admin(&req, &config) {
        return denied;
    }
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    match reseed_teams(&mut *g, path.id, &body.teams) {
        Ok(seeded) => HttpResponse::Ok().json(serde_json::json!({ "teams_seeded": seeded })),
        Err(e) => error_response(&e),
    }
}

#[delete("/api/brackets/{id}/teams")]
async fn api_clear_seeds(
    req: HttpRequest,
    config: AppConfig,
    state: AppState,
    path: Path<BracketPath>,
) -> HttpResponse {
    if let Some(denied) = reject_non_admin(&req, &config) {
        return denied;
    }
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    match clear_seeds(&mut *g, path.id) {
        Ok(removed) => HttpResponse::Ok().json(serde_json::json!({ "teams_removed": removed })),
        Err(e) => error_response(&e),
    }
}

/// Build the game tree from the current seeds.
#[post("/api/brackets/{id}/generate")]
async fn api_generate_bracket(
    req: HttpRequest,
    config: AppConfig,
    state: AppState,
    path: Path<BracketPath>,
) -> HttpResponse {
    if let Some(denied) = reject_non_admin(&req, &config) {
        return denied;
    }
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    match generate_bracket(&mut *g, path.id) {
        Ok(created) => HttpResponse::Ok().json(serde_json::json!({ "games_created": created })),
        Err(e) => error_response(&e),
    }
}

#[post("/api/brackets/{id}/games/{round}/{position}/start")]
async fn api_start_game(
    req: HttpRequest,
    config: AppConfig,
    state: AppState,
    path: Path<GamePath>,
) -> HttpResponse {
    if let Some(denied) = reject_non_admin(&req, &config) {
        return denied;
    }
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    if let Err(e) = start_game(&mut *g, path.id, path.round, path.position) {
        return error_response(&e);
    }
    match bracket_view(&g, path.id) {
        Ok(view) => HttpResponse::Ok().json(view),
        Err(e) => error_response(&e),
    }
}

/// Record a game's winner and move it into the next round.
#[post("/api/brackets/{id}/games/{round}/{position}/winner")]
async fn api_advance_winner(
    req: HttpRequest,
    config: AppConfig,
    state: AppState,
    path: Path<GamePath>,
    body: Json<AdvanceWinnerBody>,
) -> HttpResponse {
    if let Some(denied) = reject_non_admin(&req, &config) {
        return denied;
    }
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    match advance_winner(&mut *g, path.id, path.round, path.position, body.winner_team_id) {
        Ok(advancement) => HttpResponse::Ok().json(advancement),
        Err(e) => error_response(&e),
    }
}

fn routes(cfg: &mut ServiceConfig) {
    cfg.service(api_health)
        .service(api_create_season)
        .service(api_get_season)
        .service(api_delete_season)
        .service(api_list_teams)
        .service(api_add_team)
        .service(api_set_team_record)
        .service(api_generate_schedule)
        .service(api_list_games)
        .service(api_clear_games)
        .service(api_create_bracket)
        .service(api_list_brackets)
        .service(api_get_bracket)
        .service(api_delete_bracket)
        .service(api_seed_teams)
        .service(api_reseed_teams)
        .service(api_clear_seeds)
        .service(api_generate_bracket)
        .service(api_start_game)
        .service(api_advance_winner);
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // A missing .env file is fine; variables may come from the real environment.
    let _ = dotenvy::dotenv();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = match ServerConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            log::error!("{}", e);
            return Err(std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string()));
        }
    };
    if config.admin_token.is_none() {
        log::warn!("ADMIN_TOKEN is not set: admin routes are open to every client");
    }
    let bind = (config.host.clone(), config.port);
    log::info!("Starting server at http://{}:{}", bind.0, bind.1);

    let state = Data::new(RwLock::new(MemoryStore::new()));
    let config = Data::new(config);

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .app_data(config.clone())
            .configure(routes)
    })
    .bind(bind)?
    .run()
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{http::StatusCode, test};

    fn app_data(config: ServerConfig) -> (AppState, AppConfig) {
        (
            Data::new(RwLock::new(MemoryStore::new())),
            Data::new(config),
        )
    }

    #[actix_web::test]
    async fn season_brackets_are_listed_and_deleted_with_the_season() {
        let (state, config) = app_data(ServerConfig::default());
        let season_id = {
            let mut g = state.write().unwrap();
            let season = g.create_season("Spring");
            for name in ["Playoffs", "Consolation"] {
                let new = NewBracket {
                    name: name.to_string(),
                    ..Default::default()
                };
                g.create_bracket(season.id, new).unwrap();
            }
            season.id
        };
        let app = test::init_service(
            App::new()
                .app_data(state.clone())
                .app_data(config.clone())
                .configure(routes),
        )
        .await;

        let req = test::TestRequest::get()
            .uri(&format!("/api/seasons/{}/brackets", season_id))
            .to_request();
        let brackets: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(brackets.as_array().map(Vec::len), Some(2));

        let req = test::TestRequest::delete()
            .uri(&format!("/api/seasons/{}", season_id))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NO_CONTENT);

        let req = test::TestRequest::get()
            .uri(&format!("/api/seasons/{}/brackets", season_id))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);
        assert!(state.read().unwrap().get_season(season_id).is_err());
    }

    #[actix_web::test]
    async fn deleting_a_season_needs_the_admin_token() {
        let config = ServerConfig {
            admin_token: Some("s3cret".to_string()),
            ..ServerConfig::default()
        };
        let (state, config) = app_data(config);
        let season_id = state.write().unwrap().create_season("Spring").id;
        let app = test::init_service(
            App::new()
                .app_data(state.clone())
                .app_data(config.clone())
                .configure(routes),
        )
        .await;

        let req = test::TestRequest::delete()
            .uri(&format!("/api/seasons/{}", season_id))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::UNAUTHORIZED);

        let req = test::TestRequest::delete()
            .uri(&format!("/api/seasons/{}", season_id))
            .insert_header((ADMIN_HEADER, "s3cret"))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NO_CONTENT);
    }
}
