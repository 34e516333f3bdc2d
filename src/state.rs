use std::sync::Arc;

use tracing::info;

use crate::auth::{JwtError, TokenKeys};
use crate::config::{AppConfig, SecurityConfig, StoreBackend};
use crate::database::DatabaseManager;
use crate::services::{AuthService, MovieService};
use crate::store::{MemoryMovieStore, MemoryUserStore, MovieStore, PgMovieStore, PgUserStore, UserStore};

/// Shared handler state. Cloned per request; the stores sit behind `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub movies: MovieService,
    pub auth: AuthService,
    pub cookie_secure: bool,
}

impl AppState {
    pub fn new(
        movie_store: Arc<dyn MovieStore>,
        user_store: Arc<dyn UserStore>,
        security: &SecurityConfig,
    ) -> Result<Self, JwtError> {
        let keys = TokenKeys::new(&security.jwt_secret, security.token_expiry_secs)?;
        Ok(Self {
            movies: MovieService::new(movie_store),
            auth: AuthService::new(user_store, keys),
            cookie_secure: security.require_https,
        })
    }

    /// Empty memory stores
    pub fn in_memory(security: &SecurityConfig) -> Result<Self, JwtError> {
        Self::new(
            Arc::new(MemoryMovieStore::new()),
            Arc::new(MemoryUserStore::new()),
            security,
        )
    }

    /// Builds the stores selected by `config.store.backend`.
    pub async fn from_config(config: &AppConfig) -> anyhow::Result<Self> {
        let state = match config.store.backend {
            StoreBackend::Memory => {
                let movies = match &config.store.seed_file {
                    Some(path) => {
                        let store = MemoryMovieStore::from_seed_file(path)?;
                        info!("Seeded memory store from {}", path.display());
                        store
                    }
                    None => MemoryMovieStore::new(),
                };
                Self::new(Arc::new(movies), Arc::new(MemoryUserStore::new()), &config.security)?
            }
            StoreBackend::Postgres => {
                let pool = DatabaseManager::connect(&config.database).await?;
                if config.database.bootstrap {
                    DatabaseManager::bootstrap(&pool).await?;
                    info!("Database schema applied");
                }
                Self::new(
                    Arc::new(PgMovieStore::new(pool.clone())),
                    Arc::new(PgUserStore::new(pool)),
                    &config.security,
                )?
            }
        };

        info!("Using {:?} store backend", config.store.backend);
        Ok(state)
    }
}
