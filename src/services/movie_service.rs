use std::sync::Arc;

use rust_decimal::Decimal;
use tracing::debug;
use uuid::Uuid;

use super::ServiceError;
use crate::models::{Movie, MoviePatch, NewMovie};
use crate::store::MovieStore;

pub const MOVIE_NOT_FOUND: &str = "Movie not found";
pub const NO_MOVIE_FOR_ID: &str = "No movie found with the given ID.";

/// Movie CRUD on top of whichever `MovieStore` was injected.
#[derive(Clone)]
pub struct MovieService {
    store: Arc<dyn MovieStore>,
}

impl MovieService {
    pub fn new(store: Arc<dyn MovieStore>) -> Self {
        Self { store }
    }

    pub async fn list_movies(&self, genre: Option<&str>) -> Result<Vec<Movie>, ServiceError> {
        let genre = genre.map(str::trim).filter(|g| !g.is_empty());
        self.store
            .list(genre)
            .await
            .map_err(ServiceError::storage("Error fetching movies"))
    }

    pub async fn get_movie(&self, id: &str) -> Result<Movie, ServiceError> {
        let id = parse_id(id, MOVIE_NOT_FOUND)?;
        self.store
            .get(id)
            .await
            .map_err(ServiceError::storage("Error fetching movie"))?
            .ok_or_else(|| ServiceError::NotFound(MOVIE_NOT_FOUND.to_string()))
    }

    pub async fn create_movie(&self, input: NewMovie) -> Result<Movie, ServiceError> {
        validate_new(&input)?;
        let movie = Movie::from_new(input);
        debug!(movie_id = %movie.id, "Creating movie");

        self.store
            .insert(movie)
            .await
            .map_err(ServiceError::storage("Error creating movie"))
    }

    pub async fn update_movie(&self, id: &str, patch: MoviePatch) -> Result<Movie, ServiceError> {
        let id = parse_id(id, MOVIE_NOT_FOUND)?;
        validate_patch(&patch)?;
        self.store
            .update(id, patch)
            .await
            .map_err(ServiceError::storage("Error updating movie"))?
            .ok_or_else(|| ServiceError::NotFound(MOVIE_NOT_FOUND.to_string()))
    }

    pub async fn delete_movie(&self, id: &str) -> Result<(), ServiceError> {
        let id = parse_id(id, NO_MOVIE_FOR_ID)?;
        let removed = self
            .store
            .delete(id)
            .await
            .map_err(ServiceError::storage("Error deleting movie"))?;

        if removed {
            debug!(movie_id = %id, "Deleted movie");
            Ok(())
        } else {
            Err(ServiceError::NotFound(NO_MOVIE_FOR_ID.to_string()))
        }
    }

    pub async fn health_check(&self) -> Result<(), ServiceError> {
        self.store
            .ping()
            .await
            .map_err(ServiceError::storage("Store unavailable"))
    }
}

/// Ids that are not UUIDs cannot name a movie, so they resolve to not-found.
fn parse_id(id: &str, not_found: &str) -> Result<Uuid, ServiceError> {
    Uuid::parse_str(id.trim()).map_err(|_| ServiceError::NotFound(not_found.to_string()))
}

fn validate_new(input: &NewMovie) -> Result<(), ServiceError> {
    check_text("title", &input.title)?;
    check_text("director", &input.director)?;
    check_positive("year", input.year)?;
    check_positive("duration", input.duration)?;
    if let Some(rate) = input.rate {
        check_rate(rate)?;
    }
    Ok(())
}

fn validate_patch(patch: &MoviePatch) -> Result<(), ServiceError> {
    if let Some(title) = &patch.title {
        check_text("title", title)?;
    }
    if let Some(director) = &patch.director {
        check_text("director", director)?;
    }
    if let Some(year) = patch.year {
        check_positive("year", year)?;
    }
    if let Some(duration) = patch.duration {
        check_positive("duration", duration)?;
    }
    if let Some(rate) = patch.rate {
        check_rate(rate)?;
    }
    Ok(())
}

fn check_text(field: &str, value: &str) -> Result<(), ServiceError> {
    if value.trim().is_empty() {
        return Err(ServiceError::Validation(format!("Movie {} must not be empty", field)));
    }
    Ok(())
}

fn check_positive(field: &str, value: i32) -> Result<(), ServiceError> {
    if value <= 0 {
        return Err(ServiceError::Validation(format!("Movie {} must be a positive number", field)));
    }
    Ok(())
}

/// Rates live in 0..=10, which also fits the `NUMERIC(3, 1)` column.
fn check_rate(rate: Decimal) -> Result<(), ServiceError> {
    if rate < Decimal::ZERO || rate > Decimal::TEN {
        return Err(ServiceError::Validation("Movie rate must be between 0 and 10".to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::GenreInput;
    use crate::store::{MemoryMovieStore, StoreError};
    use async_trait::async_trait;
    use rust_decimal::Decimal;

    fn service() -> MovieService {
        MovieService::new(Arc::new(MemoryMovieStore::new()))
    }

    fn inception() -> NewMovie {
        NewMovie {
            title: "Inception".into(),
            year: 2010,
            director: "Nolan".into(),
            duration: 148,
            rate: None,
            poster: Some("x".into()),
            genre: Some(GenreInput::List(vec!["Sci-Fi".into(), "Action".into()])),
        }
    }

    #[tokio::test]
    async fn created_movie_is_immediately_readable() {
        let movies = service();
        let created = movies.create_movie(inception()).await.unwrap();
        let fetched = movies.get_movie(&created.id.to_string()).await.unwrap();

        assert_eq!(created, fetched);
        assert_eq!(fetched.title, "Inception");
        assert_eq!(fetched.year, 2010);
        assert_eq!(fetched.director, "Nolan");
        assert_eq!(fetched.duration, 148);
        assert_eq!(fetched.rate, Decimal::ZERO);
        assert_eq!(fetched.poster.as_deref(), Some("x"));
    }

    #[tokio::test]
    async fn ids_are_fresh() {
        let movies = service();
        let a = movies.create_movie(inception()).await.unwrap();
        let b = movies.create_movie(inception()).await.unwrap();
        assert_ne!(a.id, b.id);
    }

    #[tokio::test]
    async fn genre_filter_is_case_insensitive_and_trimmed() {
        let movies = service();
        movies.create_movie(inception()).await.unwrap();

        let upper = movies.list_movies(Some("ACTION")).await.unwrap();
        let lower = movies.list_movies(Some("action")).await.unwrap();
        assert_eq!(upper, lower);
        assert_eq!(upper.len(), 1);

        assert!(movies.list_movies(Some("Horror")).await.unwrap().is_empty());
        assert_eq!(movies.list_movies(Some("  ")).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn unknown_or_malformed_id_is_not_found() {
        let movies = service();
        let random = Uuid::new_v4().to_string();
        for id in ["does-not-exist", random.as_str()] {
            match movies.get_movie(id).await {
                Err(ServiceError::NotFound(msg)) => assert_eq!(msg, MOVIE_NOT_FOUND),
                other => panic!("expected not found, got {:?}", other),
            }
        }
    }

    #[tokio::test]
    async fn update_missing_movie_is_not_found() {
        let movies = service();
        let patch = MoviePatch { rate: Some(Decimal::from(9)), ..Default::default() };
        let result = movies.update_movie(&Uuid::new_v4().to_string(), patch).await;
        assert!(matches!(result, Err(ServiceError::NotFound(_))));
        assert!(movies.list_movies(None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn rate_only_update_keeps_other_fields() {
        let movies = service();
        let created = movies.create_movie(inception()).await.unwrap();

        let patch = MoviePatch { rate: Some(Decimal::from(9)), ..Default::default() };
        let updated = movies.update_movie(&created.id.to_string(), patch).await.unwrap();

        assert_eq!(updated.rate, Decimal::from(9));
        assert_eq!(Movie { rate: created.rate, ..updated }, created);
    }

    #[tokio::test]
    async fn delete_missing_movie_leaves_store_unchanged() {
        let movies = service();
        let created = movies.create_movie(inception()).await.unwrap();

        match movies.delete_movie(&Uuid::new_v4().to_string()).await {
            Err(ServiceError::NotFound(msg)) => assert_eq!(msg, NO_MOVIE_FOR_ID),
            other => panic!("expected not found, got {:?}", other),
        }
        assert_eq!(movies.list_movies(None).await.unwrap(), vec![created.clone()]);

        movies.delete_movie(&created.id.to_string()).await.unwrap();
        assert!(movies.list_movies(None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn invalid_new_movie_is_rejected_before_storage() {
        let movies = service();
        let cases = [
            NewMovie { title: "  ".into(), ..inception() },
            NewMovie { director: String::new(), ..inception() },
            NewMovie { year: -5, ..inception() },
            NewMovie { duration: 0, ..inception() },
            NewMovie { rate: Some(Decimal::from(1000)), ..inception() },
            NewMovie { rate: Some(Decimal::new(-1, 1)), ..inception() },
        ];

        for input in cases {
            let described = format!("{:?}", input);
            assert!(
                matches!(movies.create_movie(input).await, Err(ServiceError::Validation(_))),
                "accepted {}",
                described
            );
        }
        assert!(movies.list_movies(None).await.unwrap().is_empty());

        let edge = NewMovie { rate: Some(Decimal::TEN), ..inception() };
        assert_eq!(movies.create_movie(edge).await.unwrap().rate, Decimal::TEN);
    }

    #[tokio::test]
    async fn invalid_patch_leaves_movie_unchanged() {
        let movies = service();
        let created = movies.create_movie(inception()).await.unwrap();
        let id = created.id.to_string();

        let cases = [
            MoviePatch { rate: Some(Decimal::from(11)), ..Default::default() },
            MoviePatch { year: Some(0), ..Default::default() },
            MoviePatch { duration: Some(-100), ..Default::default() },
            MoviePatch { title: Some(String::new()), ..Default::default() },
            MoviePatch { director: Some(" ".into()), ..Default::default() },
        ];
        for patch in cases {
            assert!(matches!(
                movies.update_movie(&id, patch).await,
                Err(ServiceError::Validation(_))
            ));
        }

        assert_eq!(movies.get_movie(&id).await.unwrap(), created);
    }

    struct BrokenStore;

    #[async_trait]
    impl MovieStore for BrokenStore {
        async fn list(&self, _genre: Option<&str>) -> Result<Vec<Movie>, StoreError> {
            Err(StoreError::Database(sqlx::Error::PoolTimedOut))
        }
        async fn get(&self, _id: Uuid) -> Result<Option<Movie>, StoreError> {
            Err(StoreError::Database(sqlx::Error::PoolTimedOut))
        }
        async fn insert(&self, _movie: Movie) -> Result<Movie, StoreError> {
            Err(StoreError::Database(sqlx::Error::PoolTimedOut))
        }
        async fn update(&self, _id: Uuid, _patch: MoviePatch) -> Result<Option<Movie>, StoreError> {
            Err(StoreError::Database(sqlx::Error::PoolTimedOut))
        }
        async fn delete(&self, _id: Uuid) -> Result<bool, StoreError> {
            Err(StoreError::Database(sqlx::Error::PoolTimedOut))
        }
        async fn ping(&self) -> Result<(), StoreError> {
            Err(StoreError::Database(sqlx::Error::PoolTimedOut))
        }
    }

    #[tokio::test]
    async fn store_failures_carry_generic_message_and_cause() {
        let movies = MovieService::new(Arc::new(BrokenStore));

        let err = movies.create_movie(inception()).await.unwrap_err();
        assert_eq!(err.to_string(), "Error creating movie");
        let source = std::error::Error::source(&err).expect("cause retained");
        assert!(source.to_string().contains("timed out"));

        let err = movies.delete_movie(&Uuid::new_v4().to_string()).await.unwrap_err();
        assert_eq!(err.to_string(), "Error deleting movie");
    }
}
