pub mod client;
pub mod commands;
pub mod utils;

use clap::{Parser, Subcommand};
use url::Url;

use client::ApiClient;

#[derive(Parser)]
#[command(name = "movies")]
#[command(about = "Movies CLI - Command-line client for the Movies API")]
#[command(version)]
pub struct Cli {
    #[arg(
        long,
        global = true,
        env = "MOVIES_API_URL",
        default_value = "http://localhost:1234",
        help = "Base URL of the Movies API server"
    )]
    pub server: Url,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Movie catalogue operations")]
    Movies {
        #[command(subcommand)]
        cmd: commands::movies::MovieCommands,
    },

    #[command(about = "Registration, login and token checks")]
    Auth {
        #[command(subcommand)]
        cmd: commands::auth::AuthCommands,
    },
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let client = ApiClient::new(cli.server)?;

    match cli.command {
        Commands::Movies { cmd } => commands::movies::handle(cmd, &client).await,
        Commands::Auth { cmd } => commands::auth::handle(cmd, &client).await,
    }
}
