use std::collections::HashMap;
use std::path::Path;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::info;
use uuid::Uuid;

use super::{MovieStore, StoreError, UserStore};
use crate::models::{GenreInput, Movie, MoviePatch, User};

#[derive(Default)]
pub struct MemoryMovieStore {
    movies: RwLock<HashMap<Uuid, Movie>>,
}

impl MemoryMovieStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_movies(movies: impl IntoIterator<Item = Movie>) -> Self {
        let movies = movies
            .into_iter()
            .map(|mut movie| {
                movie.genre = GenreInput::List(std::mem::take(&mut movie.genre)).into_labels();
                (movie.id, movie)
            })
            .collect();
        Self {
            movies: RwLock::new(movies),
        }
    }

    /// Loads a JSON array of movies, e.g. `data/movies.json`.
    pub fn from_seed_file(path: &Path) -> Result<Self, StoreError> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| StoreError::Seed(format!("{}: {}", path.display(), e)))?;
        let movies: Vec<Movie> = serde_json::from_str(&raw)
            .map_err(|e| StoreError::Seed(format!("{}: {}", path.display(), e)))?;

        info!("Loaded {} seed movies from {}", movies.len(), path.display());
        Ok(Self::with_movies(movies))
    }
}

fn sort_by_title(movies: &mut [Movie]) {
    movies.sort_by(|a, b| a.title.cmp(&b.title).then(a.id.cmp(&b.id)));
}

#[async_trait]
impl MovieStore for MemoryMovieStore {
    async fn list(&self, genre: Option<&str>) -> Result<Vec<Movie>, StoreError> {
        let movies = self.movies.read().await;
        let mut found: Vec<Movie> = movies
            .values()
            .filter(|m| genre.map_or(true, |g| m.has_genre(g)))
            .cloned()
            .collect();
        sort_by_title(&mut found);
        Ok(found)
    }

    async fn get(&self, id: Uuid) -> Result<Option<Movie>, StoreError> {
        Ok(self.movies.read().await.get(&id).cloned())
    }

    async fn insert(&self, movie: Movie) -> Result<Movie, StoreError> {
        let mut movies = self.movies.write().await;
        movies.insert(movie.id, movie.clone());
        Ok(movie)
    }

    async fn update(&self, id: Uuid, patch: MoviePatch) -> Result<Option<Movie>, StoreError> {
        let mut movies = self.movies.write().await;
        let Some(movie) = movies.get_mut(&id) else {
            return Ok(None);
        };
        patch.apply_to(movie);
        Ok(Some(movie.clone()))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        Ok(self.movies.write().await.remove(&id).is_some())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

/// Users keyed by username.
#[derive(Default)]
pub struct MemoryUserStore {
    users: RwLock<HashMap<String, User>>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        Ok(self.users.read().await.get(username).cloned())
    }

    async fn insert(&self, user: User) -> Result<(), StoreError> {
        // Check and insert under one write lock.
        let mut users = self.users.write().await;
        if users.contains_key(&user.username) {
            return Err(StoreError::DuplicateUsername);
        }
        users.insert(user.username.clone(), user);
        Ok(())
    }
}
