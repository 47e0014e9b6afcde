//! HTTP route handlers.

use askama::Template;
use axum::{
    Json, Router,
    extract::{Path, State},
    http::{HeaderMap, StatusCode, header},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
};
use tower_http::services::ServeDir;

use crate::domain::StationId;

use super::dto::*;
use super::state::AppState;
use super::templates::*;

/// Create the application router.
///
/// `static_dir` is the path to the static assets directory.
pub fn create_router(state: AppState, static_dir: &str) -> Router {
    Router::new()
        .route("/", get(index_page))
        .route("/health", get(health))
        .route("/stations", get(station_list))
        .route("/stations/reload", post(reload_stations))
        .route("/stations/retry", post(retry_connection))
        .route("/stations/:id", get(station_detail))
        .nest_service("/static", ServeDir::new(static_dir))
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Dashboard page. The station list fragment is polled by the page itself.
async fn index_page() -> impl IntoResponse {
    Html(
        IndexTemplate
            .render()
            .unwrap_or_else(|e| format!("Template error: {}", e)),
    )
}

/// Check if request accepts HTML.
fn accepts_html(headers: &HeaderMap) -> bool {
    headers
        .get(header::ACCEPT)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|accept| accept.contains("text/html"))
}

/// The station list: HTML fragment or JSON based on Accept header.
async fn station_list(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    render_station_list(&state, &headers).await
}

/// Trigger an immediate directory re-fetch (the "Refresh station list"
/// action), then render the current list state.
async fn reload_stations(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    state.probes.invalidate_all();
    state.feed.refresh_now();
    render_station_list(&state, &headers).await
}

/// Retry a failed feed connection immediately (the "Try again." action),
/// independent of the automatic countdown.
async fn retry_connection(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    state.feed.refresh_now();
    render_station_list(&state, &headers).await
}

async fn render_station_list(state: &AppState, headers: &HeaderMap) -> Result<Response, AppError> {
    let stations = state.directory.snapshot().await;
    let loading = state.feed.is_loading();
    let error = state.feed.has_error();
    let countdown = state.feed.countdown();

    if accepts_html(headers) {
        let view = StationListView::build(loading, error, &stations, countdown);
        let html = StationListTemplate { view }
            .render()
            .map_err(|e| AppError::Internal {
                message: format!("Template error: {}", e),
            })?;

        Ok(Html(html).into_response())
    } else {
        let results: Vec<StationResult> = sorted_by_label(&stations)
            .into_iter()
            .map(StationResult::from_station)
            .collect();

        Ok(Json(StationListResponse {
            loading,
            error,
            retry_in_secs: countdown,
            station_count: results.len(),
            stations: results,
        })
        .into_response())
    }
}

/// Station detail view, reached by selecting a row.
async fn station_detail(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    let id = StationId::parse(&id).map_err(|_| AppError::BadRequest {
        message: format!("Invalid station id: {id}"),
    })?;

    let Some(station) = state.directory.get(&id).await else {
        if accepts_html(&headers) {
            let html = ErrorTemplate {
                title: "Station not found".to_string(),
                message: format!("No station with id {id} is currently known."),
            }
            .render()
            .map_err(|e| AppError::Internal {
                message: format!("Template error: {}", e),
            })?;

            return Ok((StatusCode::NOT_FOUND, Html(html)).into_response());
        }

        return Err(AppError::NotFound {
            message: format!("No station with id {id}"),
        });
    };

    // Probe the station for its overview, but degrade to the directory
    // record alone if the probe fails.
    let overview = if station.is_reachable() {
        match state
            .probes
            .fetch_overview(&station.host, station.port)
            .await
        {
            Ok(overview) => Some(overview),
            Err(e) => {
                tracing::warn!(station = %station.id, error = %e, "overview fetch failed");
                None
            }
        }
    } else {
        None
    };

    if accepts_html(&headers) {
        let detail = StationDetailView::from_parts(&station, overview.as_deref());
        let html = StationDetailTemplate { station: detail }
            .render()
            .map_err(|e| AppError::Internal {
                message: format!("Template error: {}", e),
            })?;

        Ok(Html(html).into_response())
    } else {
        Ok(Json(StationDetailResponse::from_parts(
            &station,
            overview.as_deref(),
        ))
        .into_response())
    }
}
