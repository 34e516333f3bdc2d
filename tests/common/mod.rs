#![allow(dead_code)]

use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use reqwest::{header, Response, StatusCode};
use tokio::task::JoinHandle;

use movies_api::config::AppConfig;
use movies_api::store::{MemoryMovieStore, MemoryUserStore};
use movies_api::{app, AppState};

/// Router served on a free local port for the lifetime of one test.
pub struct TestServer {
    pub port: u16,
    pub base_url: String,
    handle: JoinHandle<()>,
}

impl TestServer {
    /// Empty memory stores, development security settings
    pub async fn start() -> Result<Self> {
        Self::start_with(MemoryMovieStore::new()).await
    }

    /// Memory store preloaded from `data/movies.json`
    pub async fn start_seeded() -> Result<Self> {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("data/movies.json");
        Self::start_with(MemoryMovieStore::from_seed_file(&path)?).await
    }

    async fn start_with(movies: MemoryMovieStore) -> Result<Self> {
        let security = AppConfig::development().security;
        let state = AppState::new(Arc::new(movies), Arc::new(MemoryUserStore::new()), &security)?;
        let router = app(state, &security);

        // Pick an unused port for isolation
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);
        let listener = tokio::net::TcpListener::bind(("127.0.0.1", port))
            .await
            .with_context(|| format!("failed to bind {}", base_url))?;

        let handle = tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, router).await {
                eprintln!("test server stopped: {e}");
            }
        });

        let server = Self { port, base_url, handle };
        server.wait_ready(Duration::from_secs(5)).await?;
        Ok(server)
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let client = reqwest::Client::new();
        let deadline = Instant::now() + timeout;
        loop {
            if Instant::now() > deadline {
                break;
            }
            if let Ok(resp) = client.get(self.url("/health")).send().await {
                if resp.status() == StatusCode::OK {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        anyhow::bail!("server did not become ready on {} within {:?}", self.base_url, timeout)
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Raw `Set-Cookie` header for `name`, if the response carried one.
pub fn set_cookie(response: &Response, name: &str) -> Option<String> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .find(|value| value.starts_with(&format!("{}=", name)))
        .map(str::to_string)
}

/// `name=value` pair from a `Set-Cookie` header, ready for a `Cookie` request header.
pub fn cookie_pair(set_cookie: &str) -> String {
    set_cookie.split(';').next().unwrap_or_default().trim().to_string()
}
