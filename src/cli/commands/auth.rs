use clap::Subcommand;
use reqwest::Method;
use serde_json::json;

use crate::cli::client::ApiClient;
use crate::cli::utils::output_json;

#[derive(Subcommand)]
pub enum AuthCommands {
    #[command(about = "Register new user")]
    Register {
        #[arg(help = "Username")]
        username: String,
        #[arg(help = "Password")]
        password: String,
    },

    #[command(about = "Login and print the issued token")]
    Login {
        #[arg(help = "Username")]
        username: String,
        #[arg(help = "Password")]
        password: String,
    },

    #[command(about = "Show the user a token belongs to")]
    Whoami {
        #[arg(long, env = "MOVIES_API_TOKEN", help = "Access token from `auth login`")]
        token: String,
    },
}

pub async fn handle(cmd: AuthCommands, client: &ApiClient) -> anyhow::Result<()> {
    let response = match cmd {
        AuthCommands::Register { username, password } => {
            let body = json!({ "username": username, "password": password });
            client.post(client.endpoint(&["register"])?, &body).await?
        }
        AuthCommands::Login { username, password } => {
            let body = json!({ "username": username, "password": password });
            client.post(client.endpoint(&["login"])?, &body).await?
        }
        AuthCommands::Whoami { token } => {
            let request = client
                .request(Method::GET, client.endpoint(&["protected"])?)
                .bearer_auth(token);
            client.send(request).await?
        }
    };

    output_json(&response)
}
