use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    Json,
};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::models::{Movie, NewMovie};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub genre: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct Created {
    #[serde(rename = "newMovie")]
    pub new_movie: Movie,
}

/// GET /movies - all movies, or those tagged with `?genre=` (case-insensitive)
pub async fn movies_get(
    State(state): State<AppState>,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> ApiResult<Vec<Movie>> {
    let Query(query) = query.map_err(ApiError::from)?;
    let movies = state.movies.list_movies(query.genre.as_deref()).await?;
    Ok(ApiResponse::success(movies))
}

/// POST /movies - 201 with `{ "newMovie": ... }`
pub async fn movies_post(
    State(state): State<AppState>,
    payload: Result<Json<NewMovie>, JsonRejection>,
) -> ApiResult<Created> {
    let Json(input) = payload.map_err(ApiError::from)?;
    let movie = state.movies.create_movie(input).await?;

    tracing::info!(movie_id = %movie.id, title = %movie.title, "Movie created");
    Ok(ApiResponse::created(Created { new_movie: movie }))
}
