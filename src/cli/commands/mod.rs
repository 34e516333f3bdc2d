pub mod auth;
pub mod movies;
