use axum::Extension;

use crate::middleware::{ApiResponse, ApiResult, AuthUser};

/// GET /protected - identity carried by the caller's access token
///
/// Expected Output:
/// ```json
/// { "id": "user_uuid", "username": "alice" }
/// ```
pub async fn protected_get(Extension(user): Extension<AuthUser>) -> ApiResult<AuthUser> {
    tracing::debug!(user_id = %user.id, "Protected resource accessed");
    Ok(ApiResponse::success(user))
}
