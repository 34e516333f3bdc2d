use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder, Transaction};
use uuid::Uuid;

use super::{MovieStore, StoreError, UserStore};
use crate::database::models::{MovieRow, UserRow};
use crate::models::{Movie, MoviePatch, User};

const MOVIE_SELECT: &str = r#"
    SELECT
        m.id, m.title, m.year, m.director, m.duration, m.poster, m.rate,
        COALESCE(
            ARRAY_AGG(g.name ORDER BY g.name) FILTER (WHERE g.name IS NOT NULL),
            ARRAY[]::TEXT[]
        ) AS genre
    FROM movie m
    LEFT JOIN movie_genres mg ON mg.movie_id = m.id
    LEFT JOIN genre g ON g.id = mg.genre_id
"#;

/// Movies in the `movie` / `genre` / `movie_genres` tables.
///
/// Genre rows are matched by case-insensitive name and never created here; unknown
/// names are skipped. Writes touching more than one table run in a transaction.
#[derive(Clone)]
pub struct PgMovieStore {
    pool: PgPool,
}

impl PgMovieStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn link_genres(
        tx: &mut Transaction<'_, Postgres>,
        movie_id: Uuid,
        genres: &[String],
    ) -> Result<(), StoreError> {
        for name in genres {
            sqlx::query(
                "INSERT INTO movie_genres (movie_id, genre_id)
                 SELECT $1, id FROM genre WHERE LOWER(name) = LOWER($2)
                 ON CONFLICT DO NOTHING",
            )
            .bind(movie_id)
            .bind(name)
            .execute(&mut **tx)
            .await?;
        }
        Ok(())
    }
}

/// `UPDATE movie SET col = $n, ...` covering only the supplied fields.
fn build_update(id: Uuid, patch: &MoviePatch) -> QueryBuilder<'_, Postgres> {
    let mut builder = QueryBuilder::new("UPDATE movie SET ");
    let mut columns = builder.separated(", ");

    if let Some(title) = &patch.title {
        columns.push("title = ").push_bind_unseparated(title);
    }
    if let Some(year) = patch.year {
        columns.push("year = ").push_bind_unseparated(year);
    }
    if let Some(duration) = patch.duration {
        columns.push("duration = ").push_bind_unseparated(duration);
    }
    if let Some(director) = &patch.director {
        columns.push("director = ").push_bind_unseparated(director);
    }
    if let Some(rate) = patch.rate {
        columns.push("rate = ").push_bind_unseparated(rate);
    }
    if let Some(poster) = &patch.poster {
        columns.push("poster = ").push_bind_unseparated(poster);
    }

    builder.push(" WHERE id = ").push_bind(id);
    builder
}

#[async_trait]
impl MovieStore for PgMovieStore {
    async fn list(&self, genre: Option<&str>) -> Result<Vec<Movie>, StoreError> {
        let rows = match genre {
            Some(genre) => {
                let sql = format!(
                    "{MOVIE_SELECT}
                     WHERE EXISTS (
                        SELECT 1 FROM movie_genres fmg
                        JOIN genre fg ON fg.id = fmg.genre_id
                        WHERE fmg.movie_id = m.id AND LOWER(fg.name) = LOWER($1)
                     )
                     GROUP BY m.id
                     ORDER BY m.title, m.id"
                );
                sqlx::query_as::<_, MovieRow>(&sql)
                    .bind(genre)
                    .fetch_all(&self.pool)
                    .await?
            }
            None => {
                let sql = format!("{MOVIE_SELECT} GROUP BY m.id ORDER BY m.title, m.id");
                sqlx::query_as::<_, MovieRow>(&sql).fetch_all(&self.pool).await?
            }
        };

        Ok(rows.into_iter().map(Movie::from).collect())
    }

    async fn get(&self, id: Uuid) -> Result<Option<Movie>, StoreError> {
        let sql = format!("{MOVIE_SELECT} WHERE m.id = $1 GROUP BY m.id");
        let row = sqlx::query_as::<_, MovieRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(Movie::from))
    }

    async fn insert(&self, movie: Movie) -> Result<Movie, StoreError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            "INSERT INTO movie (id, title, year, director, duration, poster, rate)
             VALUES ($1, $2, $3, $4, $5, $6, $7)",
        )
        .bind(movie.id)
        .bind(&movie.title)
        .bind(movie.year)
        .bind(&movie.director)
        .bind(movie.duration)
        .bind(&movie.poster)
        .bind(movie.rate)
        .execute(&mut *tx)
        .await?;

        Self::link_genres(&mut tx, movie.id, &movie.genre).await?;
        tx.commit().await?;

        // Re-read so the genre list reflects the rows that actually matched.
        self.get(movie.id)
            .await?
            .ok_or(StoreError::Database(sqlx::Error::RowNotFound))
    }

    async fn update(&self, id: Uuid, patch: MoviePatch) -> Result<Option<Movie>, StoreError> {
        let mut tx = self.pool.begin().await?;

        let exists = sqlx::query_scalar::<_, Uuid>("SELECT id FROM movie WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;
        if exists.is_none() {
            return Ok(None);
        }

        if patch.has_column_changes() {
            build_update(id, &patch).build().execute(&mut *tx).await?;
        }

        if let Some(genres) = &patch.genre {
            sqlx::query("DELETE FROM movie_genres WHERE movie_id = $1")
                .bind(id)
                .execute(&mut *tx)
                .await?;
            Self::link_genres(&mut tx, id, genres).await?;
        }

        tx.commit().await?;
        self.get(id).await
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM movie_genres WHERE movie_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        let result = sqlx::query("DELETE FROM movie WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(result.rows_affected() > 0)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

/// Users in the `"user"` table; uniqueness is backed by the `username` constraint.
#[derive(Clone)]
pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"SELECT id, username, password FROM "user" WHERE username = $1"#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(User::from))
    }

    async fn insert(&self, user: User) -> Result<(), StoreError> {
        let result = sqlx::query(r#"INSERT INTO "user" (id, username, password) VALUES ($1, $2, $3)"#)
            .bind(user.id)
            .bind(&user.username)
            .bind(&user.password_hash)
            .execute(&self.pool)
            .await;

        match result {
            Ok(_) => Ok(()),
            Err(sqlx::Error::Database(db)) if db.is_unique_violation() => Err(StoreError::DuplicateUsername),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    #[test]
    fn update_binds_only_supplied_columns() {
        let patch = MoviePatch {
            rate: Some(Decimal::from(9)),
            poster: Some(Some("p.jpg".into())),
            ..Default::default()
        };
        let id = Uuid::new_v4();
        let builder = build_update(id, &patch);
        assert_eq!(builder.sql(), "UPDATE movie SET rate = $1, poster = $2 WHERE id = $3");
    }

    #[test]
    fn null_poster_is_bound_as_a_column_change() {
        let patch = MoviePatch {
            poster: Some(None),
            ..Default::default()
        };
        let builder = build_update(Uuid::new_v4(), &patch);
        assert_eq!(builder.sql(), "UPDATE movie SET poster = $1 WHERE id = $2");
    }

    #[test]
    fn update_never_interpolates_values() {
        let patch = MoviePatch {
            title: Some("Robert'); DROP TABLE movie; --".into()),
            ..Default::default()
        };
        let builder = build_update(Uuid::new_v4(), &patch);
        assert!(!builder.sql().contains("DROP"));
    }
}
