// handlers/public/mod.rs - Public handlers (no authentication required)
//
// Service info, health, the movie catalogue and token acquisition.

pub mod auth;
pub mod movies;
pub mod system;
