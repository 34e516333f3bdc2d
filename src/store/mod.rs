//! Persistence seams for movies and users.
//!
//! Two interchangeable backends implement each trait: an in-process map guarded by a
//! `tokio::sync::RwLock` and PostgreSQL via `sqlx`.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::models::{Movie, MoviePatch, User};

pub use memory::{MemoryMovieStore, MemoryUserStore};
pub use postgres::{PgMovieStore, PgUserStore};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Username already exists")]
    DuplicateUsername,

    #[error("Invalid seed data: {0}")]
    Seed(String),

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

#[async_trait]
pub trait MovieStore: Send + Sync {
    /// All movies ordered by title, optionally restricted to a case-insensitive genre match.
    async fn list(&self, genre: Option<&str>) -> Result<Vec<Movie>, StoreError>;

    async fn get(&self, id: Uuid) -> Result<Option<Movie>, StoreError>;

    /// Persists a new record and returns it as stored.
    async fn insert(&self, movie: Movie) -> Result<Movie, StoreError>;

    /// Applies `patch` and returns the updated record, or `None` when `id` does not exist.
    async fn update(&self, id: Uuid, patch: MoviePatch) -> Result<Option<Movie>, StoreError>;

    /// Removes the movie and its genre links. Returns whether a movie was removed.
    async fn delete(&self, id: Uuid) -> Result<bool, StoreError>;

    async fn ping(&self) -> Result<(), StoreError>;
}

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError>;

    /// Fails with `StoreError::DuplicateUsername` when the username is taken.
    async fn insert(&self, user: User) -> Result<(), StoreError>;
}
