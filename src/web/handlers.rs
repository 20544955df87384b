//! HTTP request handlers

use super::error::ApiError;
use super::state::AppState;
use crate::results::MovieRecord;
use crate::search::{SearchRequest, TitleLookupRequest};
use axum::{
    extract::{rejection::JsonRejection, State},
    response::IntoResponse,
    Json,
};
use serde::Serialize;
use tracing::{error, warn};

/// Search results response
#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub success: bool,
    pub query: String,
    pub results: Vec<MovieRecord>,
    pub count: usize,
}

/// Title lookup response
#[derive(Debug, Serialize)]
pub struct MovieResponse {
    pub success: bool,
    pub movie: MovieRecord,
}

fn log_failure(handler: &str, err: &ApiError) {
    match err {
        ApiError::Internal(message) => error!("Error in {}: {}", handler, message),
        ApiError::Validation(message) | ApiError::NotFound(message) => {
            warn!("Rejected {}: {}", handler, message)
        }
    }
}

/// Natural-language movie search
pub async fn find_movies(
    State(state): State<AppState>,
    payload: Result<Json<SearchRequest>, JsonRejection>,
) -> Result<Json<SearchResponse>, ApiError> {
    search_movies(&state, payload).await.map(Json).map_err(|e| {
        log_failure("find_movies", &e);
        e
    })
}

async fn search_movies(
    state: &AppState,
    payload: Result<Json<SearchRequest>, JsonRejection>,
) -> Result<SearchResponse, ApiError> {
    let Json(request) = payload?;
    let results = state.movies.find_movies(&request).await?;
    Ok(SearchResponse {
        success: true,
        query: request.query.trim().to_string(),
        count: results.len(),
        results,
    })
}

/// Case-insensitive title lookup
pub async fn find_movie_by_title(
    State(state): State<AppState>,
    payload: Result<Json<TitleLookupRequest>, JsonRejection>,
) -> Result<Json<MovieResponse>, ApiError> {
    lookup_title(&state, payload).await.map(Json).map_err(|e| {
        log_failure("find_movie_by_title", &e);
        e
    })
}

async fn lookup_title(
    state: &AppState,
    payload: Result<Json<TitleLookupRequest>, JsonRejection>,
) -> Result<MovieResponse, ApiError> {
    let Json(request) = payload?;
    match state.movies.find_by_title(&request).await? {
        Some(movie) => Ok(MovieResponse {
            success: true,
            movie,
        }),
        None => Err(ApiError::NotFound(format!(
            "Movie with title \"{}\" not found",
            request.title.trim()
        ))),
    }
}

/// Health check handler
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": state.service_name()
    }))
}
