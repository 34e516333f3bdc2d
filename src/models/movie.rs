use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A movie record as stored and as returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    pub id: Uuid,
    pub title: String,
    pub year: i32,
    pub director: String,
    pub duration: i32,
    #[serde(default)]
    pub rate: Decimal,
    #[serde(default)]
    pub poster: Option<String>,
    #[serde(default)]
    pub genre: Vec<String>,
}

impl Movie {
    /// Builds a fresh record from create input, assigning a new id.
    pub fn from_new(input: NewMovie) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: input.title,
            year: input.year,
            director: input.director,
            duration: input.duration,
            rate: input.rate.unwrap_or(Decimal::ZERO),
            poster: input.poster,
            genre: input.genre.map(GenreInput::into_labels).unwrap_or_default(),
        }
    }

    /// Case-insensitive genre membership.
    pub fn has_genre(&self, name: &str) -> bool {
        let wanted = name.to_lowercase();
        self.genre.iter().any(|g| g.to_lowercase() == wanted)
    }
}

/// Genre labels as clients send them: either a JSON array or a comma-separated string.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum GenreInput {
    List(Vec<String>),
    Csv(String),
}

impl GenreInput {
    /// Trimmed, non-empty labels with case-insensitive duplicates removed.
    /// First spelling wins.
    pub fn into_labels(self) -> Vec<String> {
        let raw: Vec<String> = match self {
            GenreInput::List(items) => items,
            GenreInput::Csv(s) => s.split(',').map(str::to_string).collect(),
        };

        let mut labels: Vec<String> = Vec::with_capacity(raw.len());
        for item in raw {
            let label = item.trim();
            if label.is_empty() {
                continue;
            }
            let lowered = label.to_lowercase();
            if labels.iter().any(|l| l.to_lowercase() == lowered) {
                continue;
            }
            labels.push(label.to_string());
        }
        labels
    }
}

/// Body of `POST /movies`.
#[derive(Debug, Clone, Deserialize)]
pub struct NewMovie {
    pub title: String,
    pub year: i32,
    pub director: String,
    pub duration: i32,
    #[serde(default)]
    pub rate: Option<Decimal>,
    #[serde(default)]
    pub poster: Option<String>,
    #[serde(default)]
    pub genre: Option<GenreInput>,
}

/// Body of `PATCH /movies/:id`. `None` leaves the field untouched.
/// `poster` is nullable: `Some(None)` (JSON `null`) clears it.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MoviePatch {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub duration: Option<i32>,
    #[serde(default)]
    pub director: Option<String>,
    #[serde(default)]
    pub rate: Option<Decimal>,
    #[serde(default, deserialize_with = "deserialize_nullable")]
    pub poster: Option<Option<String>>,
    #[serde(default, deserialize_with = "deserialize_genre")]
    pub genre: Option<Vec<String>>,
}

// Only reached when the key is present, so `null` becomes `Some(None)`.
fn deserialize_nullable<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}

fn deserialize_genre<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let input = Option::<GenreInput>::deserialize(deserializer)?;
    Ok(input.map(GenreInput::into_labels))
}

impl MoviePatch {
    /// True when at least one `movie` column would change.
    pub fn has_column_changes(&self) -> bool {
        self.title.is_some()
            || self.year.is_some()
            || self.duration.is_some()
            || self.director.is_some()
            || self.rate.is_some()
            || self.poster.is_some()
    }

    /// Overwrites the supplied fields on `movie`. A supplied genre list replaces the old one.
    pub fn apply_to(self, movie: &mut Movie) {
        if let Some(title) = self.title {
            movie.title = title;
        }
        if let Some(year) = self.year {
            movie.year = year;
        }
        if let Some(duration) = self.duration {
            movie.duration = duration;
        }
        if let Some(director) = self.director {
            movie.director = director;
        }
        if let Some(rate) = self.rate {
            movie.rate = rate;
        }
        if let Some(poster) = self.poster {
            movie.poster = poster;
        }
        if let Some(genre) = self.genre {
            movie.genre = genre;
        }
    }
}
