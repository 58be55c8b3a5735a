use axum::{
    Router,
    extract::{Query, State},
    http::{StatusCode, header},
    response::{IntoResponse, Json},
    routing::get,
};
use chrono::Utc;
use tracing::{debug, instrument, warn};

use super::views::{self, DashboardSettings, EXPORT_FILE_NAME, Legend, SearchResponse};
use super::{AppState, SearchParams, SearchRequest};
use crate::ErFinderError;
use crate::facilities::{SearchResult, filter_and_rank};

type ApiError = (StatusCode, String);

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/categories", get(get_categories))
        .route("/legend", get(get_legend))
        .route("/settings", get(get_settings))
        .route("/search", get(search))
        .route("/search.csv", get(search_csv))
        .with_state(state)
}

fn to_api_error(err: ErFinderError) -> ApiError {
    match err {
        ErFinderError::Validation { .. } => (StatusCode::BAD_REQUEST, err.to_string()),
        other => {
            warn!("Dashboard request failed: {}", other);
            (StatusCode::INTERNAL_SERVER_ERROR, other.user_message())
        }
    }
}

fn run_search<'a>(state: &'a AppState, request: &SearchRequest) -> SearchResult<'a> {
    let result = filter_and_rank(
        state.table.records(),
        &request.reference,
        request.radius_km,
        &request.category_set(),
    );
    debug!(
        "{} of {} facilities within {} km of {}",
        result.filtered.len(),
        state.table.len(),
        request.radius_km,
        request.reference.format_coordinates()
    );
    result
}

async fn get_categories(State(state): State<AppState>) -> Json<Vec<String>> {
    Json(state.table.categories())
}

async fn get_legend() -> Json<Legend> {
    Json(Legend::current())
}

async fn get_settings(State(state): State<AppState>) -> Json<DashboardSettings> {
    Json(DashboardSettings::from(state.config.as_ref()))
}

#[instrument(skip(state))]
async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<SearchResponse>, ApiError> {
    let request = params
        .resolve(&state.config, &state.table)
        .map_err(to_api_error)?;
    let result = run_search(&state, &request);

    Ok(Json(SearchResponse::build(
        &request,
        &result,
        state.config.map_zoom,
        Utc::now(),
    )))
}

#[instrument(skip(state))]
async fn search_csv(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<impl IntoResponse, ApiError> {
    let request = params
        .resolve(&state.config, &state.table)
        .map_err(to_api_error)?;
    let result = run_search(&state, &request);
    let body = views::export_csv(&result.filtered).map_err(to_api_error)?;

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{EXPORT_FILE_NAME}\""),
            ),
        ],
        body,
    ))
}
