// handlers/public/system.rs - GET / and GET /health

use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::error::ApiError;
use crate::state::AppState;

/// GET / - service name, version and endpoint list
pub async fn root() -> Json<Value> {
    Json(json!({
        "name": "Movies API",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "home": "/ (public)",
            "health": "/health (public)",
            "movies": "/movies[/:id] (public)",
            "auth": "/register, /login, /logout (public)",
            "protected": "/protected (access_token cookie)",
        }
    }))
}

/// GET /health - 503 when the store backend cannot be reached
pub async fn health(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    if let Err(e) = state.movies.health_check().await {
        tracing::warn!("Health check failed: {:?}", e);
        return Err(ApiError::service_unavailable("Store unavailable"));
    }

    Ok(Json(json!({
        "status": "ok",
        "timestamp": chrono::Utc::now(),
    })))
}
