// handlers/protected/mod.rs - Protected handlers (access token required)
//
// Every route in this tier is wrapped in middleware::require_access_token,
// which injects the caller as an `AuthUser` request extension.

pub mod auth;
