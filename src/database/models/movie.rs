use rust_decimal::Decimal;
use sqlx::FromRow;
use uuid::Uuid;

use crate::models::Movie;

/// Row shape produced by the movie select, with genre names aggregated into an array.
#[derive(Debug, Clone, FromRow)]
pub struct MovieRow {
    pub id: Uuid,
    pub title: String,
    pub year: i32,
    pub director: String,
    pub duration: i32,
    pub poster: Option<String>,
    pub rate: Decimal,
    pub genre: Vec<String>,
}

impl From<MovieRow> for Movie {
    fn from(row: MovieRow) -> Self {
        Movie {
            id: row.id,
            title: row.title,
            year: row.year,
            director: row.director,
            duration: row.duration,
            rate: row.rate,
            poster: row.poster,
            genre: row.genre,
        }
    }
}
