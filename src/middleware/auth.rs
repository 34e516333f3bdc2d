use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use axum_extra::extract::CookieJar;
use serde::Serialize;
use uuid::Uuid;

use crate::auth::cookie::ACCESS_TOKEN_COOKIE;
use crate::auth::Claims;
use crate::error::ApiError;
use crate::services::AuthFailure;
use crate::state::AppState;

/// Authenticated user context extracted from the access token
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AuthUser {
    pub id: Uuid,
    pub username: String,
}

impl From<Claims> for AuthUser {
    fn from(claims: Claims) -> Self {
        Self {
            id: claims.id,
            username: claims.username,
        }
    }
}

/// Validates the access token and injects `AuthUser` into the request.
///
/// The `access_token` cookie is checked first; a Bearer header is accepted
/// for non-browser clients. No token at all is a 403, a bad or expired one a 401.
pub async fn require_access_token(
    State(state): State<AppState>,
    jar: CookieJar,
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = jar
        .get(ACCESS_TOKEN_COOKIE)
        .map(|cookie| cookie.value().to_string())
        .or_else(|| extract_bearer_token(&headers))
        .ok_or(AuthFailure::MissingToken)?;

    let claims = state.auth.verify_token(&token).map_err(|e| {
        tracing::debug!("Rejected access token: {}", e);
        ApiError::from(e)
    })?;

    request.extensions_mut().insert(AuthUser::from(claims));
    Ok(next.run(request).await)
}

/// Extract a token from an `Authorization: Bearer ...` header
fn extract_bearer_token(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(axum::http::header::AUTHORIZATION)?.to_str().ok()?;
    value
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_string)
}
