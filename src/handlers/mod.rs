// handlers/mod.rs - Two-tier handler layout
//
// Public (no token) → Protected (access token required, see middleware::auth)

pub mod public;
pub mod protected;
