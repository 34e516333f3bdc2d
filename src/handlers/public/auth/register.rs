// handlers/public/auth/register.rs - POST /register handler

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde_json::{json, Value};

use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::models::Credentials;
use crate::state::AppState;

/// POST /register - 200 `{ "id": ... }`, 400 for short or taken usernames
pub async fn register_post(
    State(state): State<AppState>,
    payload: Result<Json<Credentials>, JsonRejection>,
) -> ApiResult<Value> {
    let Json(credentials) = payload.map_err(ApiError::from)?;
    let id = state
        .auth
        .register(&credentials.username, &credentials.password)
        .await?;

    Ok(ApiResponse::success(json!({ "id": id })))
}
