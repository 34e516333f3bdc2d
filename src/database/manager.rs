use std::str::FromStr;
use std::time::Duration;

use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::{Executor, PgPool};
use thiserror::Error;
use tracing::info;

use crate::config::DatabaseConfig;

/// Idempotent table layout for the PostgreSQL stores.
pub const SCHEMA_SQL: &str = include_str!("schema.sql");

/// Errors from DatabaseManager
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Invalid database URL")]
    InvalidDatabaseUrl,

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

/// Builds and checks the PostgreSQL connection pool shared by the stores.
pub struct DatabaseManager;

impl DatabaseManager {
    /// Open a pool using the configured URL or discrete connection fields
    pub async fn connect(config: &DatabaseConfig) -> Result<PgPool, DatabaseError> {
        let options = Self::connect_options(config)?;

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.connection_timeout))
            .connect_with(options)
            .await?;

        info!(
            "Created database pool for {}:{}/{}",
            config.host, config.port, config.database
        );
        Ok(pool)
    }

    fn connect_options(config: &DatabaseConfig) -> Result<PgConnectOptions, DatabaseError> {
        if let Some(url) = &config.url {
            return PgConnectOptions::from_str(url).map_err(|_| DatabaseError::InvalidDatabaseUrl);
        }

        let options = PgConnectOptions::new()
            .host(&config.host)
            .port(config.port)
            .username(&config.user)
            .database(&config.database);

        if config.password.is_empty() {
            Ok(options)
        } else {
            Ok(options.password(&config.password))
        }
    }

    /// Creates tables and seeds the genre list when missing
    pub async fn bootstrap(pool: &PgPool) -> Result<(), DatabaseError> {
        pool.execute(SCHEMA_SQL).await?;
        info!("Database schema is in place");
        Ok(())
    }
}
