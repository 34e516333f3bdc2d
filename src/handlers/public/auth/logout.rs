// handlers/public/auth/logout.rs - POST /logout handler

use axum::response::IntoResponse;
use axum_extra::extract::CookieJar;
use serde_json::json;

use crate::auth::cookie::removal_cookie;
use crate::middleware::ApiResponse;

/// POST /logout - always clears the cookie, with or without a valid session
pub async fn logout_post(jar: CookieJar) -> impl IntoResponse {
    (
        jar.add(removal_cookie()),
        ApiResponse::success(json!({ "message": "Logout successful" })),
    )
}
