use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
    routing::{delete, get},
    Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::RwLock;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use uuid::Uuid;

use crate::config::AppConfig;
use crate::models::{
    ApiResponse, BracketMatchupView, Division, HighScoreReport, LeagueTeam, PlayoffMatchup, PlayoffTable,
    StandingRecord, TeamProfile, WeekMatchup,
};
use crate::services::{bracket_week_view, high_score_report, resolve_team, sort_teams, Dashboard, EspnFetcher};
use crate::store::{PlayoffMatchupStore, StoreError, FIRST_WEEK, LAST_WEEK};

/// Where handlers get league documents from.
enum LeagueSource {
    Espn(EspnFetcher),
    #[cfg(test)]
    Fixed(Vec<crate::services::espn_fetcher::LeagueData>),
}

#[derive(Clone)]
pub struct AppState {
    config: Arc<AppConfig>,
    source: Arc<LeagueSource>,
    store: Arc<RwLock<PlayoffMatchupStore>>,
}

impl AppState {
    pub fn new(config: AppConfig, store: PlayoffMatchupStore) -> anyhow::Result<Self> {
        let fetcher = EspnFetcher::new(&config)?;
        Ok(Self::with_source(config, LeagueSource::Espn(fetcher), store))
    }

    fn with_source(config: AppConfig, source: LeagueSource, store: PlayoffMatchupStore) -> Self {
        Self {
            config: Arc::new(config),
            source: Arc::new(source),
            store: Arc::new(RwLock::new(store)),
        }
    }

    async fn dashboard(&self) -> Dashboard {
        match self.source.as_ref() {
            LeagueSource::Espn(fetcher) => Dashboard::load(&self.config, fetcher).await,
            #[cfg(test)]
            LeagueSource::Fixed(leagues) => Dashboard::from_leagues(&self.config, leagues.clone()),
        }
    }
}

pub async fn serve(config: AppConfig, port: u16) -> anyhow::Result<()> {
    let store = PlayoffMatchupStore::load(&config.matchups_file).await?;
    let state = AppState::new(config, store)?;

    let app = create_router().with_state(state);

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port)).await?;
    tracing::info!("LeagueDash API server listening on port {}", port);

    axum::serve(listener, app).await?;
    Ok(())
}

fn create_router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_check))
        .route("/standings", get(get_standings_handler))
        .route("/standings/divisions", get(get_divisions_handler))
        .route("/playoffs", get(get_playoffs_handler))
        .route("/high-scores", get(get_high_scores_handler))
        .route("/matchups", get(get_matchups_handler))
        .route("/teams", get(get_teams_handler))
        .route("/teams/{league}/{team_id}", get(get_team_profile_handler))
        .route("/bracket", get(get_bracket_weeks_handler).post(create_matchup_handler))
        .route("/bracket/{week}", get(get_bracket_week_handler))
        .route("/bracket/{week}/{id}", delete(delete_matchup_handler))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
}

type ApiError = (StatusCode, Json<ApiResponse<()>>);
type ApiResult<T> = Result<Json<ApiResponse<T>>, ApiError>;

fn failure(status: StatusCode, message: impl Into<String>) -> ApiError {
    (status, Json(ApiResponse::error(message.into())))
}

fn data_unavailable() -> ApiError {
    failure(StatusCode::SERVICE_UNAVAILABLE, "League data unavailable")
}

fn store_failure(e: StoreError) -> ApiError {
    let status = match &e {
        StoreError::SameTeam | StoreError::Duplicate(..) | StoreError::InvalidWeek(_) => StatusCode::BAD_REQUEST,
        StoreError::NotFound(..) => StatusCode::NOT_FOUND,
        StoreError::Io(_) | StoreError::Json(_) => {
            tracing::error!("Playoff matchup store failed: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    failure(status, e.to_string())
}

// Health check endpoint
async fn health_check() -> Json<ApiResponse<&'static str>> {
    Json(ApiResponse::success("LeagueDash API is running"))
}

// GET /standings - All teams in seeding order, without the weekly bonus
async fn get_standings_handler(State(state): State<AppState>) -> ApiResult<Vec<StandingRecord>> {
    let mut standings = state.dashboard().await.standings;
    if standings.is_empty() {
        return Err(data_unavailable());
    }
    sort_teams(&mut standings);
    Ok(Json(ApiResponse::success(standings)))
}

// GET /standings/divisions - Per-league standings
async fn get_divisions_handler(State(state): State<AppState>) -> ApiResult<Vec<Division>> {
    let dash = state.dashboard().await;
    if dash.standings.is_empty() {
        return Err(data_unavailable());
    }
    Ok(Json(ApiResponse::success(dash.divisions(&state.config))))
}

// GET /playoffs - Cross-league seeding with qualifiers and the bonus award
async fn get_playoffs_handler(State(state): State<AppState>) -> ApiResult<PlayoffTable> {
    match state.dashboard().await.table {
        Some(table) => Ok(Json(ApiResponse::success(table))),
        None => Err(data_unavailable()),
    }
}

// GET /high-scores - Top score of every week plus a season summary
async fn get_high_scores_handler(State(state): State<AppState>) -> ApiResult<HighScoreReport> {
    let dash = state.dashboard().await;
    Ok(Json(ApiResponse::success(high_score_report(dash.matchups.as_deref()))))
}

// GET /matchups?week=N - Games for a week, defaulting to the current one
#[derive(Deserialize)]
struct MatchupsQuery {
    week: Option<u32>,
}

async fn get_matchups_handler(
    State(state): State<AppState>,
    Query(params): Query<MatchupsQuery>,
) -> ApiResult<Vec<WeekMatchup>> {
    let dash = state.dashboard().await;
    let week = params.week.unwrap_or(dash.current_week);
    Ok(Json(ApiResponse::success(dash.week_matchups(&state.config, week))))
}

// GET /teams - Every team across leagues
#[derive(Serialize)]
struct TeamListing {
    #[serde(flatten)]
    team: LeagueTeam,
    owner: Option<String>,
}

async fn get_teams_handler(State(state): State<AppState>) -> ApiResult<Vec<TeamListing>> {
    let teams = state
        .dashboard()
        .await
        .teams()
        .into_iter()
        .map(|team| TeamListing {
            owner: state.config.owner_of(&team.team_name),
            team,
        })
        .collect();
    Ok(Json(ApiResponse::success(teams)))
}

// GET /teams/{league}/{team_id} - Roster, results and seed for one team
async fn get_team_profile_handler(
    State(state): State<AppState>,
    Path((league, team_id)): Path<(String, u32)>,
) -> ApiResult<TeamProfile> {
    let dash = state.dashboard().await;
    match dash.find_team(&league, team_id) {
        Some(team) => Ok(Json(ApiResponse::success(dash.team_profile(&state.config, &team)))),
        None => Err(failure(
            StatusCode::NOT_FOUND,
            format!("No team {} in league {}", team_id, league),
        )),
    }
}

// GET /bracket - Weeks that have playoff matchups
async fn get_bracket_weeks_handler(State(state): State<AppState>) -> ApiResult<Vec<u32>> {
    let weeks = state.store.read().await.weeks();
    Ok(Json(ApiResponse::success(weeks)))
}

// GET /bracket/{week} - Matchups for a week with seeds and live scores
async fn get_bracket_week_handler(
    State(state): State<AppState>,
    Path(week): Path<u32>,
) -> ApiResult<Vec<BracketMatchupView>> {
    let matchups = state.store.read().await.matchups_for_week(week).to_vec();
    if matchups.is_empty() {
        return Ok(Json(ApiResponse::success(Vec::new())));
    }

    let dash = state.dashboard().await;
    let views = bracket_week_view(&state.config, &matchups, week, dash.table.as_ref(), &dash.leagues);
    Ok(Json(ApiResponse::success(views)))
}

// POST /bracket - Create a playoff matchup
#[derive(Deserialize)]
struct TeamSelector {
    league: Option<String>,
    name: String,
}

#[derive(Deserialize)]
struct CreateMatchupRequest {
    week: u32,
    team1: TeamSelector,
    team2: TeamSelector,
}

async fn create_matchup_handler(
    State(state): State<AppState>,
    Json(request): Json<CreateMatchupRequest>,
) -> ApiResult<PlayoffMatchup> {
    if !(FIRST_WEEK..=LAST_WEEK).contains(&request.week) {
        return Err(store_failure(StoreError::InvalidWeek(request.week)));
    }

    let teams = state.dashboard().await.teams();
    let lookup = |selector: &TeamSelector| {
        resolve_team(&teams, selector.league.as_deref(), &selector.name)
            .cloned()
            .ok_or_else(|| failure(StatusCode::NOT_FOUND, format!("Team '{}' not found", selector.name)))
    };
    let team1 = lookup(&request.team1)?;
    let team2 = lookup(&request.team2)?;

    let mut store = state.store.write().await;
    let created = store
        .add(request.week, team1.into(), team2.into())
        .map_err(store_failure)?
        .clone();
    store.save().await.map_err(store_failure)?;

    Ok(Json(ApiResponse::success(created)))
}

// DELETE /bracket/{week}/{id} - Remove a playoff matchup
async fn delete_matchup_handler(
    State(state): State<AppState>,
    Path((week, id)): Path<(u32, Uuid)>,
) -> ApiResult<PlayoffMatchup> {
    let mut store = state.store.write().await;
    let removed = store.remove(week, id).map_err(store_failure)?;
    store.save().await.map_err(store_failure)?;
    tracing::info!(
        "Deleted matchup {} for week {}: {} vs {}",
        id,
        week,
        removed.team1.team_name,
        removed.team2.team_name
    );
    Ok(Json(ApiResponse::success(removed)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LeagueConfig;
    use crate::services::espn_fetcher::LeagueData;
    use crate::services::SeedingRules;
    use axum::body::Body;
    use axum::http::{Method, Request};
    use std::collections::HashMap;
    use tempfile::TempDir;
    use tower::ServiceExt;

    fn config(temp_dir: &TempDir) -> AppConfig {
        AppConfig {
            leagues: crate::config::parse_leagues("Doinks=1").unwrap(),
            season: 2025,
            // Nothing listens here, so every league fetch fails fast.
            api_base: "http://127.0.0.1:9".to_string(),
            espn_s2: None,
            espn_swid: None,
            matchups_file: temp_dir.path().join("playoff_matchups.json"),
            owners: HashMap::new(),
            seeding: SeedingRules::default(),
        }
    }

    fn app(temp_dir: &TempDir) -> Router {
        let config = config(temp_dir);
        let store = PlayoffMatchupStore::new(&config.matchups_file);
        create_router().with_state(AppState::new(config, store).unwrap())
    }

    const DOINKS_JSON: &str = r#"{
        "scoringPeriodId": 3,
        "teams": [
            {"id": 1, "name": "Ray Finkle",
             "record": {"overall": {"wins": 2, "losses": 0, "pointsFor": 250.0, "pointsAgainst": 180.0}}},
            {"id": 2, "name": "SMAUX",
             "record": {"overall": {"wins": 0, "losses": 2, "pointsFor": 180.0, "pointsAgainst": 250.0}}}
        ],
        "schedule": [
            {"matchupPeriodId": 1, "home": {"teamId": 1, "totalPoints": 130.0}, "away": {"teamId": 2, "totalPoints": 90.0}}
        ]
    }"#;

    fn app_with_doinks(temp_dir: &TempDir) -> Router {
        let config = config(temp_dir);
        let store = PlayoffMatchupStore::new(&config.matchups_file);
        let leagues = vec![LeagueData {
            league: LeagueConfig {
                name: "Doinks".to_string(),
                id: "1".to_string(),
            },
            data: Some(serde_json::from_str(DOINKS_JSON).unwrap()),
        }];
        create_router().with_state(AppState::with_source(config, LeagueSource::Fixed(leagues), store))
    }

    async fn send(app: Router, method: Method, uri: &str, body: Option<&str>) -> (StatusCode, serde_json::Value) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(body.map(|b| Body::from(b.to_string())).unwrap_or_else(Body::empty))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_health() {
        let temp_dir = TempDir::new().unwrap();
        let (status, body) = send(app(&temp_dir), Method::GET, "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["data"], "LeagueDash API is running");
    }

    #[tokio::test]
    async fn test_playoffs_table() {
        let temp_dir = TempDir::new().unwrap();
        let (status, body) = send(app_with_doinks(&temp_dir), Method::GET, "/playoffs", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        let entries = body["data"]["entries"].as_array().unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0]["team_name"], "Ray Finkle");
        assert_eq!(entries[0]["rank"], 1);
        // 130.0 is the season high, worth half a win.
        assert_eq!(entries[0]["wins"], 2.5);
        assert_eq!(body["data"]["qualifiers"][0]["league_winner"], "Ray Finkle");
        assert_eq!(body["data"]["bonus"]["week"], 1);
    }

    #[tokio::test]
    async fn test_create_matchup_then_view_week() {
        let temp_dir = TempDir::new().unwrap();
        let app = app_with_doinks(&temp_dir);

        let request = r#"{"week": 15, "team1": {"name": "ray finkle"}, "team2": {"league": "Doinks", "name": "SMAUX"}}"#;
        let (status, body) = send(app.clone(), Method::POST, "/bracket", Some(request)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["team1"]["team_name"], "Ray Finkle");
        assert_eq!(body["data"]["team2"]["team_name"], "SMAUX");
        assert!(temp_dir.path().join("playoff_matchups.json").exists());

        // Same pairing in reverse order is rejected.
        let reversed = r#"{"week": 15, "team1": {"name": "SMAUX"}, "team2": {"name": "Ray Finkle"}}"#;
        let (status, _) = send(app.clone(), Method::POST, "/bracket", Some(reversed)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (_, body) = send(app.clone(), Method::GET, "/bracket", None).await;
        assert_eq!(body["data"], serde_json::json!([15]));

        let (status, body) = send(app, Method::GET, "/bracket/15", None).await;
        assert_eq!(status, StatusCode::OK);
        let views = body["data"].as_array().unwrap();
        assert_eq!(views.len(), 1);
        assert_eq!(views[0]["team1"]["seed"], 1);
        assert_eq!(views[0]["team2"]["seed"], 2);
        assert!(views[0]["team1"]["score"].is_null());
    }

    #[tokio::test]
    async fn test_playoffs_unavailable_without_data() {
        let temp_dir = TempDir::new().unwrap();
        let (status, body) = send(app(&temp_dir), Method::GET, "/playoffs", None).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["success"], false);
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn test_empty_bracket() {
        let temp_dir = TempDir::new().unwrap();
        let (status, body) = send(app(&temp_dir), Method::GET, "/bracket", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"], serde_json::json!([]));

        let (status, body) = send(app(&temp_dir), Method::GET, "/bracket/15", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"], serde_json::json!([]));
    }

    #[tokio::test]
    async fn test_create_rejects_week_out_of_range() {
        let temp_dir = TempDir::new().unwrap();
        let body = r#"{"week": 19, "team1": {"name": "SMAUX"}, "team2": {"name": "Booters"}}"#;
        let (status, body) = send(app(&temp_dir), Method::POST, "/bracket", Some(body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Week 19 must be between 1 and 18");
    }

    #[tokio::test]
    async fn test_delete_unknown_matchup() {
        let temp_dir = TempDir::new().unwrap();
        let uri = format!("/bracket/15/{}", Uuid::new_v4());
        let (status, body) = send(app(&temp_dir), Method::DELETE, &uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["success"], false);
    }
}
