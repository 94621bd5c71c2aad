use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::error::AppError;
use crate::models::{ApiResponse, MatchData};
use crate::services::{
    comparison, group_by_date, AiClient, FixtureClient, HeatmapRow, Orchestrator, RadarAxis,
};

pub async fn serve(port: u16) -> anyhow::Result<()> {
    let state = Arc::new(Orchestrator::new(AiClient::new(), FixtureClient::new()));

    let app = create_router().with_state(state);

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port)).await?;
    tracing::info!("Betlens API server listening on port {}", port);

    axum::serve(listener, app).await?;
    Ok(())
}

fn create_router() -> Router<Arc<Orchestrator>> {
    Router::new()
        .route("/health", get(health_check))
        .route("/matches/weekly", get(weekly_matches_handler))
        .route("/matches/select", post(select_match_handler))
        .route(
            "/session/match",
            get(current_match_handler).put(replace_match_handler),
        )
        .route("/session/fetch-stats", post(fetch_stats_handler))
        .route("/session/analyze", post(analyze_handler))
        .route("/session/analysis", get(latest_analysis_handler))
        .route("/session/comparison", get(comparison_handler))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
}

// Success/error envelopes shared by every handler
fn ok<T: Serialize>(data: T) -> Response {
    Json(ApiResponse::success(data)).into_response()
}

fn fail(e: AppError) -> Response {
    let status = if e.is_input_error() {
        StatusCode::BAD_REQUEST
    } else {
        tracing::error!("Request failed: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    };
    (status, Json(ApiResponse::<()>::error(e.to_string()))).into_response()
}

// Health check endpoint
async fn health_check() -> Json<ApiResponse<&'static str>> {
    Json(ApiResponse::success("Betlens API is running"))
}

// GET /matches/weekly - This week's fixtures grouped by day
async fn weekly_matches_handler(State(state): State<Arc<Orchestrator>>) -> Response {
    match state.weekly_matches().await {
        Ok(matches) => ok(group_by_date(matches)),
        Err(e) => fail(e),
    }
}

// POST /matches/select - Replace the working match from the weekly list
#[derive(Deserialize)]
struct SelectMatchRequest {
    id: String,
}

async fn select_match_handler(
    State(state): State<Arc<Orchestrator>>,
    Json(request): Json<SelectMatchRequest>,
) -> Response {
    match state.select_match(&request.id).await {
        Ok(selected) => ok(selected),
        Err(e) => fail(e),
    }
}

// GET /session/match - The current working match
async fn current_match_handler(State(state): State<Arc<Orchestrator>>) -> Response {
    ok(state.current_match().await)
}

// PUT /session/match - Wholesale replacement from the form
async fn replace_match_handler(
    State(state): State<Arc<Orchestrator>>,
    Json(data): Json<MatchData>,
) -> Response {
    ok(state.replace_match(data).await)
}

// POST /session/fetch-stats - Concurrent AI stats + tactical context fetch,
// merged atomically into the working match
async fn fetch_stats_handler(State(state): State<Arc<Orchestrator>>) -> Response {
    match state.fetch_stats().await {
        Ok(merged) => ok(merged),
        Err(e) => fail(e),
    }
}

// POST /session/analyze - Generate the betting analysis (busy-guarded)
async fn analyze_handler(State(state): State<Arc<Orchestrator>>) -> Response {
    match state.analyze().await {
        Ok(analysis) => ok(analysis),
        Err(e) => fail(e),
    }
}

// GET /session/analysis - Latest analysis, if one was generated
async fn latest_analysis_handler(State(state): State<Arc<Orchestrator>>) -> Response {
    ok(state.latest_analysis().await)
}

// GET /session/comparison - Heatmap rows and radar axes for the working match
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ComparisonView {
    home_team: String,
    away_team: String,
    heatmap: Vec<HeatmapRow>,
    radar: Vec<RadarAxis>,
}

async fn comparison_handler(State(state): State<Arc<Orchestrator>>) -> Response {
    let data = state.current_match().await;
    ok(ComparisonView {
        heatmap: comparison::heatmap(&data.home_team, &data.away_team),
        radar: comparison::radar(&data.home_team, &data.away_team),
        home_team: data.home_team.name,
        away_team: data.away_team.name,
    })
}
