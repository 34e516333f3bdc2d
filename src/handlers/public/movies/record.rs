use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};
use serde_json::{json, Value};

use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::models::{Movie, MoviePatch};
use crate::state::AppState;

/// GET /movies/:id
pub async fn movie_get(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Movie> {
    let movie = state.movies.get_movie(&id).await?;
    Ok(ApiResponse::success(movie))
}

/// PATCH /movies/:id - only the fields present in the body change
pub async fn movie_patch(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<MoviePatch>, JsonRejection>,
) -> ApiResult<Movie> {
    let Json(patch) = payload.map_err(ApiError::from)?;
    let movie = state.movies.update_movie(&id, patch).await?;
    Ok(ApiResponse::success(movie))
}

/// DELETE /movies/:id
pub async fn movie_delete(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Value> {
    state.movies.delete_movie(&id).await?;
    Ok(ApiResponse::success(json!({ "message": "Movie successfully deleted." })))
}
