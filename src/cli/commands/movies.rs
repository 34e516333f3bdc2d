use clap::{Args, Subcommand};
use rust_decimal::Decimal;
use serde_json::{Map, Value};

use crate::cli::client::ApiClient;
use crate::cli::utils::{output_json, split_genres};

#[derive(Subcommand)]
pub enum MovieCommands {
    #[command(about = "List movies, optionally filtered by genre")]
    List {
        #[arg(long, help = "Genre name (case-insensitive)")]
        genre: Option<String>,
    },

    #[command(about = "Show a single movie")]
    Get {
        #[arg(help = "Movie ID")]
        id: String,
    },

    #[command(about = "Create a movie")]
    Create {
        #[arg(long)]
        title: String,
        #[arg(long)]
        year: i32,
        #[arg(long)]
        director: String,
        #[arg(long, help = "Duration in minutes")]
        duration: i32,
        #[arg(long, help = "Comma-separated genre names")]
        genre: Option<String>,
        #[arg(long)]
        rate: Option<Decimal>,
        #[arg(long)]
        poster: Option<String>,
    },

    #[command(about = "Update fields of an existing movie")]
    Update {
        #[arg(help = "Movie ID")]
        id: String,
        #[command(flatten)]
        fields: MovieFields,
    },

    #[command(about = "Delete a movie")]
    Delete {
        #[arg(help = "Movie ID")]
        id: String,
    },
}

/// Optional fields for `movies update`; only the flags given are sent.
#[derive(Args, Default)]
pub struct MovieFields {
    #[arg(long)]
    pub title: Option<String>,
    #[arg(long)]
    pub year: Option<i32>,
    #[arg(long)]
    pub director: Option<String>,
    #[arg(long, help = "Duration in minutes")]
    pub duration: Option<i32>,
    #[arg(long, help = "Comma-separated genre names; replaces the current set")]
    pub genre: Option<String>,
    #[arg(long)]
    pub rate: Option<Decimal>,
    #[arg(long)]
    pub poster: Option<String>,
}

impl MovieFields {
    fn into_body(self) -> Map<String, Value> {
        let mut body = Map::new();
        if let Some(title) = self.title {
            body.insert("title".into(), title.into());
        }
        if let Some(year) = self.year {
            body.insert("year".into(), year.into());
        }
        if let Some(director) = self.director {
            body.insert("director".into(), director.into());
        }
        if let Some(duration) = self.duration {
            body.insert("duration".into(), duration.into());
        }
        if let Some(genre) = self.genre {
            body.insert("genre".into(), split_genres(&genre).into());
        }
        if let Some(rate) = self.rate {
            body.insert("rate".into(), serde_json::to_value(rate).unwrap_or(Value::Null));
        }
        if let Some(poster) = self.poster {
            body.insert("poster".into(), poster.into());
        }
        body
    }
}

pub async fn handle(cmd: MovieCommands, client: &ApiClient) -> anyhow::Result<()> {
    let response = match cmd {
        MovieCommands::List { genre } => {
            let mut url = client.endpoint(&["movies"])?;
            if let Some(genre) = genre {
                url.query_pairs_mut().append_pair("genre", &genre);
            }
            client.get(url).await?
        }
        MovieCommands::Get { id } => client.get(client.endpoint(&["movies", id.as_str()])?).await?,
        MovieCommands::Create {
            title,
            year,
            director,
            duration,
            genre,
            rate,
            poster,
        } => {
            let fields = MovieFields {
                title: Some(title),
                year: Some(year),
                director: Some(director),
                duration: Some(duration),
                genre,
                rate,
                poster,
            };
            client
                .post(client.endpoint(&["movies"])?, &fields.into_body())
                .await?
        }
        MovieCommands::Update { id, fields } => {
            let body = fields.into_body();
            if body.is_empty() {
                anyhow::bail!("Nothing to update: pass at least one field flag");
            }
            client.patch(client.endpoint(&["movies", id.as_str()])?, &body).await?
        }
        MovieCommands::Delete { id } => client.delete(client.endpoint(&["movies", id.as_str()])?).await?,
    };

    output_json(&response)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn only_given_fields_are_sent() {
        let fields = MovieFields {
            rate: Some(Decimal::new(85, 1)),
            genre: Some("Drama, Crime".into()),
            ..Default::default()
        };

        assert_eq!(
            Value::Object(fields.into_body()),
            json!({"rate": 8.5, "genre": ["Drama", "Crime"]})
        );
    }
}
