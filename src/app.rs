use axum::{
    http::{header, HeaderValue, Method},
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::config::SecurityConfig;
use crate::handlers::{protected, public};
use crate::middleware::require_access_token;
use crate::state::AppState;

/// Full application router with global middleware applied.
pub fn app(state: AppState, security: &SecurityConfig) -> Router {
    let mut router = Router::new()
        // Public
        .route("/", get(public::system::root))
        .route("/health", get(public::system::health))
        .merge(movie_routes())
        .merge(auth_public_routes())
        // Protected
        .merge(protected_routes(state.clone()))
        .with_state(state);

    if security.enable_cors {
        router = router.layer(cors_layer(&security.cors_origins));
    }

    router.layer(TraceLayer::new_for_http())
}

fn movie_routes() -> Router<AppState> {
    use public::movies;

    Router::new()
        .route("/movies", get(movies::movies_get).post(movies::movies_post))
        .route(
            "/movies/:id",
            get(movies::movie_get)
                .patch(movies::movie_patch)
                .delete(movies::movie_delete),
        )
}

fn auth_public_routes() -> Router<AppState> {
    use public::auth;

    Router::new()
        .route("/register", post(auth::register_post))
        .route("/login", post(auth::login_post))
        .route("/logout", post(auth::logout_post))
}

fn protected_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/protected", get(protected::auth::protected_get))
        .route_layer(middleware::from_fn_with_state(state, require_access_token))
}

/// Credentialed CORS for the configured origins; an empty list allows any origin
/// without credentials.
fn cors_layer(origins: &[String]) -> CorsLayer {
    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin '{}'", origin);
                None
            }
        })
        .collect();

    if allowed.is_empty() {
        return CorsLayer::permissive();
    }

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed))
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_credentials(true)
}
