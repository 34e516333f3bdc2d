// handlers/public/auth/login.rs - POST /login handler

use axum::{
    extract::{rejection::JsonRejection, State},
    response::IntoResponse,
    Json,
};
use axum_extra::extract::CookieJar;
use serde::Serialize;

use crate::auth::cookie::access_cookie;
use crate::error::ApiError;
use crate::middleware::ApiResponse;
use crate::models::{Credentials, UserIdentity};
use crate::services::ServiceError;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub user: UserIdentity,
    pub token: String,
}

/// POST /login - authenticate and receive the `access_token` cookie
///
/// Expected Output (Success):
/// ```json
/// {
///   "user": { "id": "user_uuid", "username": "alice" },
///   "token": "eyJhbGciOiJIUzI1NiI..."
/// }
/// ```
///
/// Bad credentials are a 401 and no cookie is set.
pub async fn login_post(
    State(state): State<AppState>,
    jar: CookieJar,
    payload: Result<Json<Credentials>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(credentials) = payload.map_err(ApiError::from)?;

    let user = state
        .auth
        .login(&credentials.username, &credentials.password)
        .await
        .map_err(|e| match e {
            ServiceError::Validation(msg) => {
                tracing::warn!(username = %credentials.username, "Login failed");
                ApiError::unauthorized(msg)
            }
            other => other.into(),
        })?;

    let token = state.auth.issue_token(&user)?;
    let cookie = access_cookie(token.clone(), state.auth.token_ttl_secs(), state.cookie_secure);

    tracing::info!(user_id = %user.id, "User logged in");
    Ok((jar.add(cookie), ApiResponse::success(LoginResponse { user, token })))
}
