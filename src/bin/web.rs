//! Single binary web server: load divisions and query eliminations via REST.
//! Run with: cargo run --bin web
//! Listens on 0.0.0.0:8080 by default.
//! Override with env: HOST (e.g. 0.0.0.0), PORT (e.g. 8080).

use actix_web::{
    body::BoxBody,
    delete,
    dev::{ServiceFactory, ServiceRequest, ServiceResponse},
    get, post,
    web::{Data, Json, Path, Query},
    App, HttpResponse, HttpServer, Responder,
};
use division_elimination::{
    parse_division, Division, DivisionError, EliminationEngine, Solver, TeamRecord,
};
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::RwLock;
use std::time::{Duration, Instant};
use uuid::Uuid;

type DivisionId = Uuid;

/// Per-division entry: loaded data + last activity time (for auto-cleanup).
struct DivisionEntry {
    division: Division,
    last_activity: Instant,
}

/// In-memory state: loaded divisions by ID. Entries are removed after inactivity.
type AppState = Data<RwLock<HashMap<DivisionId, DivisionEntry>>>;

/// Inactivity threshold: divisions not accessed for this long are removed.
const INACTIVITY_TIMEOUT: Duration = Duration::from_secs(2 * 3600);

#[derive(serde::Serialize)]
struct HealthResponse {
    ok: bool,
    service: &'static str,
}

#[derive(serde::Serialize)]
struct DivisionResponse<'a> {
    id: DivisionId,
    #[serde(flatten)]
    division: &'a Division,
}

#[derive(Deserialize)]
struct CreateDivisionBody {
    teams: Vec<TeamRecord>,
}

#[derive(Deserialize)]
struct SolverQuery {
    #[serde(default)]
    solver: Solver,
}

/// Path segment: division id (e.g. /api/divisions/{id})
#[derive(Deserialize)]
struct DivisionPath {
    id: DivisionId,
}

/// Path segments: division id and team name (e.g. /api/divisions/{id}/teams/{team})
#[derive(Deserialize)]
struct DivisionTeamPath {
    id: DivisionId,
    team: String,
}

fn error_response(e: &DivisionError) -> HttpResponse {
    let body = serde_json::json!({ "error": e.to_string() });
    match e {
        DivisionError::UnknownTeam(_) => HttpResponse::NotFound().json(body),
        _ => HttpResponse::BadRequest().json(body),
    }
}

fn no_division() -> HttpResponse {
    HttpResponse::NotFound().json(serde_json::json!({ "error": "No division" }))
}

fn insert_division(state: &AppState, division: Division) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    for issue in division.schedule_issues() {
        log::warn!("Inconsistent schedule: {}", issue);
    }
    let id = Uuid::new_v4();
    log::info!("Loaded division {} with {} teams", id, division.team_count());
    let response = HttpResponse::Ok().json(DivisionResponse {
        id,
        division: &division,
    });
    g.insert(
        id,
        DivisionEntry {
            division,
            last_activity: Instant::now(),
        },
    );
    response
}

#[get("/api/health")]
async fn api_health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        ok: true,
        service: "division-elimination",
    })
}

/// Load a division from JSON team records (returns it with id).
#[post("/api/divisions")]
async fn api_create_division(state: AppState, body: Json<CreateDivisionBody>) -> HttpResponse {
    match Division::new(body.into_inner().teams) {
        Ok(division) => insert_division(&state, division),
        Err(e) => error_response(&e),
    }
}

/// Load a division from standings text (count, then one line per team).
#[post("/api/divisions/standings")]
async fn api_create_division_from_standings(state: AppState, body: String) -> HttpResponse {
    match parse_division(&body) {
        Ok(division) => insert_division(&state, division),
        Err(e) => error_response(&e),
    }
}

/// Get a division by id (404 if not found). Touching it refreshes last_activity.
#[get("/api/divisions/{id}")]
async fn api_get_division(state: AppState, path: Path<DivisionPath>) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    match g.get_mut(&path.id) {
        Some(entry) => {
            entry.last_activity = Instant::now();
            HttpResponse::Ok().json(DivisionResponse {
                id: path.id,
                division: &entry.division,
            })
        }
        None => no_division(),
    }
}

#[delete("/api/divisions/{id}")]
async fn api_delete_division(state: AppState, path: Path<DivisionPath>) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    match g.remove(&path.id) {
        Some(_) => HttpResponse::NoContent().finish(),
        None => no_division(),
    }
}

/// One team's record.
#[get("/api/divisions/{id}/teams/{team}")]
async fn api_get_team(state: AppState, path: Path<DivisionTeamPath>) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    let entry = match g.get_mut(&path.id) {
        Some(e) => e,
        None => return no_division(),
    };
    entry.last_activity = Instant::now();
    match entry.division.team(&path.team) {
        Ok(team) => HttpResponse::Ok().json(team),
        Err(e) => error_response(&e),
    }
}

/// Is the team eliminated, and by which teams.
#[get("/api/divisions/{id}/teams/{team}/elimination")]
async fn api_team_elimination(
    state: AppState,
    path: Path<DivisionTeamPath>,
    query: Query<SolverQuery>,
) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    let entry = match g.get_mut(&path.id) {
        Some(e) => e,
        None => return no_division(),
    };
    entry.last_activity = Instant::now();
    match EliminationEngine::with_solver(&entry.division, query.solver).analyze(&path.team) {
        Ok(result) => HttpResponse::Ok().json(result),
        Err(e) => error_response(&e),
    }
}

/// Elimination answers for every team, in division order.
#[get("/api/divisions/{id}/report")]
async fn api_division_report(
    state: AppState,
    path: Path<DivisionPath>,
    query: Query<SolverQuery>,
) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    let entry = match g.get_mut(&path.id) {
        Some(e) => e,
        None => return no_division(),
    };
    entry.last_activity = Instant::now();
    match EliminationEngine::with_solver(&entry.division, query.solver).report() {
        Ok(report) => HttpResponse::Ok().json(report),
        Err(e) => error_response(&e),
    }
}

/// All routes over the shared division map.
fn app(
    state: AppState,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<BoxBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(state)
        .service(api_health)
        .service(api_create_division)
        .service(api_create_division_from_standings)
        .service(api_get_division)
        .service(api_delete_division)
        .service(api_get_team)
        .service(api_team_elimination)
        .service(api_division_report)
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

    let state = Data::new(RwLock::new(HashMap::<DivisionId, DivisionEntry>::new()));

    // Background task: every 10 minutes, drop divisions nobody has queried recently
    let state_cleanup = state.clone();
    actix_web::rt::spawn(async move {
        let mut interval = actix_web::rt::time::interval(Duration::from_secs(10 * 60));
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
                log::info!("Cleaned up {} inactive division(s)", removed);
            }
        }
    });

    HttpServer::new(move || app(state.clone()))
        .bind(bind)?
        .run()
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{http::StatusCode, test};
    use serde_json::{json, Value};

    const STANDINGS: &str = "4
Atlanta       83 71  8  0 1 6 1
Philadelphia  80 79  3  1 0 0 2
New_York      78 78  6  6 0 0 0
Montreal      77 82  3  1 2 0 0
";

    fn empty_state() -> AppState {
        Data::new(RwLock::new(HashMap::new()))
    }

    fn four_teams() -> Value {
        json!({ "teams": [
            { "name": "Atlanta", "wins": 83, "losses": 71, "remaining": 8, "against": [0, 1, 6, 1] },
            { "name": "Philadelphia", "wins": 80, "losses": 79, "remaining": 3, "against": [1, 0, 0, 2] },
            { "name": "New_York", "wins": 78, "losses": 78, "remaining": 6, "against": [6, 0, 0, 0] },
            { "name": "Montreal", "wins": 77, "losses": 82, "remaining": 3, "against": [1, 2, 0, 0] },
        ]})
    }

    #[actix_web::test]
    async fn health() {
        let app = test::init_service(app(empty_state())).await;
        let req = test::TestRequest::get().uri("/api/health").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["ok"], true);
    }

    #[actix_web::test]
    async fn create_query_delete() {
        let app = test::init_service(app(empty_state())).await;

        let req = test::TestRequest::post()
            .uri("/api/divisions")
            .set_json(four_teams())
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = test::read_body_json(resp).await;
        let id = body["id"].as_str().unwrap().to_string();
        assert_eq!(body["teams"].as_array().unwrap().len(), 4);

        let req = test::TestRequest::get()
            .uri(&format!("/api/divisions/{}/teams/Philadelphia/elimination", id))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["eliminated"], true);
        assert_eq!(body["method"], "flow");
        assert_eq!(body["certificate"], json!(["Atlanta", "New_York"]));

        let req = test::TestRequest::get()
            .uri(&format!("/api/divisions/{}/teams/Atlanta", id))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["wins"], 83);

        let req = test::TestRequest::delete()
            .uri(&format!("/api/divisions/{}", id))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NO_CONTENT);

        let req = test::TestRequest::get()
            .uri(&format!("/api/divisions/{}", id))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "No division");
    }

    #[actix_web::test]
    async fn unknown_division_is_not_found() {
        let app = test::init_service(app(empty_state())).await;
        for uri in [
            format!("/api/divisions/{}", Uuid::new_v4()),
            format!("/api/divisions/{}/report", Uuid::new_v4()),
            format!("/api/divisions/{}/teams/Atlanta/elimination", Uuid::new_v4()),
        ] {
            let req = test::TestRequest::get().uri(&uri).to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::NOT_FOUND, "{}", uri);
        }
    }

    #[actix_web::test]
    async fn unknown_team_is_not_found() {
        let app = test::init_service(app(empty_state())).await;
        let req = test::TestRequest::post()
            .uri("/api/divisions")
            .set_json(four_teams())
            .to_request();
        let body: Value = test::read_body_json(test::call_service(&app, req).await).await;
        let id = body["id"].as_str().unwrap().to_string();

        for uri in [
            format!("/api/divisions/{}/teams/Boston", id),
            format!("/api/divisions/{}/teams/Boston/elimination", id),
        ] {
            let req = test::TestRequest::get().uri(&uri).to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::NOT_FOUND, "{}", uri);
            let body: Value = test::read_body_json(resp).await;
            assert_eq!(body["error"], "Unknown team: Boston");
        }
    }

    #[actix_web::test]
    async fn invalid_division_is_bad_request() {
        let app = test::init_service(app(empty_state())).await;
        let short_row = json!({ "teams": [
            { "name": "A", "wins": 1, "losses": 0, "remaining": 1, "against": [0, 1] },
            { "name": "B", "wins": 0, "losses": 1, "remaining": 1, "against": [1] },
        ]});
        let duplicate = json!({ "teams": [
            { "name": "A", "wins": 1, "losses": 0, "remaining": 1, "against": [0, 1] },
            { "name": "A", "wins": 0, "losses": 1, "remaining": 1, "against": [1, 0] },
        ]});
        for body in [short_row, duplicate] {
            let req = test::TestRequest::post()
                .uri("/api/divisions")
                .set_json(body)
                .to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
            let body: Value = test::read_body_json(resp).await;
            assert!(body["error"].is_string());
        }

        let req = test::TestRequest::post()
            .uri("/api/divisions/standings")
            .set_payload("2\nA 1 0 1 0 1\nB 0 1")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn standings_text_and_solver_choice() {
        let app = test::init_service(app(empty_state())).await;
        let req = test::TestRequest::post()
            .uri("/api/divisions/standings")
            .insert_header(("content-type", "text/plain"))
            .set_payload(STANDINGS)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = test::read_body_json(resp).await;
        let id = body["id"].as_str().unwrap().to_string();

        let mut reports = Vec::new();
        for solver in ["edmonds-karp", "dinic"] {
            let req = test::TestRequest::get()
                .uri(&format!("/api/divisions/{}/report?solver={}", id, solver))
                .to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::OK);
            let body: Value = test::read_body_json(resp).await;
            reports.push(body);
        }
        assert_eq!(reports[0], reports[1]);
        let eliminated: Vec<bool> = reports[0]
            .as_array()
            .unwrap()
            .iter()
            .map(|e| e["eliminated"].as_bool().unwrap())
            .collect();
        assert_eq!(eliminated, [false, true, false, true]);

        let req = test::TestRequest::get()
            .uri(&format!("/api/divisions/{}/report?solver=simplex", id))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }
}
