use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;
use thiserror::Error;

use crate::auth::{token_lifetime, JwtError};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub server: ServerConfig,
    pub store: StoreConfig,
    pub database: DatabaseConfig,
    pub security: SecurityConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    Memory,
    Postgres,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    pub backend: StoreBackend,
    /// JSON array of movies loaded into the memory store at startup.
    pub seed_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    #[serde(skip_serializing)]
    pub password: String,
    pub database: String,
    /// Full `postgres://` URL; takes precedence over the discrete fields.
    #[serde(skip_serializing)]
    pub url: Option<String>,
    pub max_connections: u32,
    pub connection_timeout: u64,
    /// Apply `schema.sql` on startup.
    pub bootstrap: bool,
    /// Parse failure of a JSON `DATABASE_URL`, reported by `AppConfig::validate`.
    #[serde(skip)]
    pub descriptor_error: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    #[serde(skip_serializing)]
    pub jwt_secret: String,
    pub token_expiry_secs: u64,
    /// Marks the session cookie `Secure`.
    pub require_https: bool,
    pub enable_cors: bool,
    pub cors_origins: Vec<String>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("JWT_SECRET must be set in {0:?} mode")]
    MissingSecret(Environment),

    #[error("Invalid DATABASE_URL descriptor: {0}")]
    InvalidDatabaseDescriptor(String),

    #[error("Invalid SECURITY_TOKEN_EXPIRY_SECS: {0}")]
    InvalidTokenExpiry(#[source] JwtError),
}

/// Connection descriptor given as JSON in `DATABASE_URL`, e.g.
/// `{"host":"db","user":"root","port":5432,"password":"","database":"moviesdb"}`.
#[derive(Debug, Default, Deserialize)]
struct DatabaseDescriptor {
    host: Option<String>,
    port: Option<u16>,
    user: Option<String>,
    password: Option<String>,
    database: Option<String>,
}

impl DatabaseConfig {
    /// Accepts either a `postgres://` URL or a JSON object with connection fields.
    pub fn apply_descriptor(&mut self, raw: &str) -> Result<(), ConfigError> {
        let raw = raw.trim();
        if !raw.starts_with('{') {
            self.url = Some(raw.to_string());
            return Ok(());
        }

        let descriptor: DatabaseDescriptor = serde_json::from_str(raw)
            .map_err(|e| ConfigError::InvalidDatabaseDescriptor(e.to_string()))?;
        if let Some(host) = descriptor.host {
            self.host = host;
        }
        if let Some(port) = descriptor.port {
            self.port = port;
        }
        if let Some(user) = descriptor.user {
            self.user = user;
        }
        if let Some(password) = descriptor.password {
            self.password = password;
        }
        if let Some(database) = descriptor.database {
            self.database = database;
        }
        self.url = None;
        Ok(())
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        // Set defaults based on environment, then override with specific env vars
        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_overrides(|key| env::var(key).ok())
    }

    /// Applies overrides from any key/value source; `from_env` passes the process environment.
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        // Server overrides
        if let Some(v) = lookup("MOVIES_API_PORT").or_else(|| lookup("PORT")) {
            self.server.port = v.parse().unwrap_or(self.server.port);
        }

        // Store overrides
        if let Some(v) = lookup("STORE_BACKEND") {
            match v.to_ascii_lowercase().as_str() {
                "memory" => self.store.backend = StoreBackend::Memory,
                "postgres" | "postgresql" => self.store.backend = StoreBackend::Postgres,
                other => tracing::warn!("Ignoring unknown STORE_BACKEND '{}'", other),
            }
        }
        if let Some(v) = lookup("MOVIES_SEED_FILE") {
            self.store.seed_file = Some(PathBuf::from(v));
        }

        // Database overrides
        if let Some(v) = lookup("DATABASE_HOST") {
            self.database.host = v;
        }
        if let Some(v) = lookup("DATABASE_PORT") {
            self.database.port = v.parse().unwrap_or(self.database.port);
        }
        if let Some(v) = lookup("DATABASE_USER") {
            self.database.user = v;
        }
        if let Some(v) = lookup("DATABASE_PASSWORD") {
            self.database.password = v;
        }
        if let Some(v) = lookup("DATABASE_NAME") {
            self.database.database = v;
        }
        if let Some(v) = lookup("DATABASE_URL") {
            if let Err(ConfigError::InvalidDatabaseDescriptor(msg)) = self.database.apply_descriptor(&v) {
                self.database.descriptor_error = Some(msg);
            }
        }
        if let Some(v) = lookup("DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections = v.parse().unwrap_or(self.database.max_connections);
        }
        if let Some(v) = lookup("DATABASE_CONNECTION_TIMEOUT") {
            self.database.connection_timeout = v.parse().unwrap_or(self.database.connection_timeout);
        }
        if let Some(v) = lookup("DATABASE_BOOTSTRAP") {
            self.database.bootstrap = v.parse().unwrap_or(self.database.bootstrap);
        }

        // Security overrides
        if let Some(v) = lookup("JWT_SECRET") {
            self.security.jwt_secret = v;
        }
        if let Some(v) = lookup("SECURITY_TOKEN_EXPIRY_SECS") {
            self.security.token_expiry_secs = v.parse().unwrap_or(self.security.token_expiry_secs);
        }
        if let Some(v) = lookup("SECURITY_REQUIRE_HTTPS") {
            self.security.require_https = v.parse().unwrap_or(self.security.require_https);
        }
        if let Some(v) = lookup("SECURITY_ENABLE_CORS") {
            self.security.enable_cors = v.parse().unwrap_or(self.security.enable_cors);
        }
        if let Some(v) = lookup("SECURITY_CORS_ORIGINS") {
            self.security.cors_origins = v
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
        }

        self
    }

    /// Startup checks that cannot be expressed as defaults.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.security.jwt_secret.is_empty() {
            return Err(ConfigError::MissingSecret(self.environment));
        }
        if let Some(msg) = &self.database.descriptor_error {
            return Err(ConfigError::InvalidDatabaseDescriptor(msg.clone()));
        }
        token_lifetime(self.security.token_expiry_secs).map_err(ConfigError::InvalidTokenExpiry)?;
        Ok(())
    }

    pub fn development() -> Self {
        Self {
            environment: Environment::Development,
            server: ServerConfig { port: 1234 },
            store: StoreConfig {
                backend: StoreBackend::Memory,
                seed_file: None,
            },
            database: DatabaseConfig::local(10, 30),
            security: SecurityConfig {
                jwt_secret: "development-secret-change-me".to_string(),
                token_expiry_secs: 60 * 60,
                require_https: false,
                enable_cors: true,
                cors_origins: vec!["http://localhost:3000".to_string(), "http://localhost:5173".to_string()],
            },
        }
    }

    pub fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            server: ServerConfig { port: 1234 },
            store: StoreConfig {
                backend: StoreBackend::Postgres,
                seed_file: None,
            },
            database: DatabaseConfig::local(20, 10),
            security: SecurityConfig {
                jwt_secret: String::new(),
                token_expiry_secs: 60 * 60,
                require_https: true,
                enable_cors: true,
                cors_origins: vec!["https://staging.example.com".to_string()],
            },
        }
    }

    pub fn production() -> Self {
        Self {
            environment: Environment::Production,
            server: ServerConfig { port: 1234 },
            store: StoreConfig {
                backend: StoreBackend::Postgres,
                seed_file: None,
            },
            database: DatabaseConfig::local(50, 5),
            security: SecurityConfig {
                jwt_secret: String::new(),
                token_expiry_secs: 60 * 60,
                require_https: true,
                enable_cors: false,
                cors_origins: Vec::new(),
            },
        }
    }
}

impl DatabaseConfig {
    fn local(max_connections: u32, connection_timeout: u64) -> Self {
        Self {
            host: "localhost".to_string(),
            port: 5432,
            user: "postgres".to_string(),
            password: String::new(),
            database: "moviesdb".to_string(),
            url: None,
            max_connections,
            connection_timeout,
            bootstrap: false,
            descriptor_error: None,
        }
    }
}

// Global singleton config - initialized once at startup
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

// Convenience function for accessing config
pub fn config() -> &'static AppConfig {
    &CONFIG
}

#[macro_export]
macro_rules! is_production {
    () => {
        matches!($crate::config::CONFIG.environment, $crate::config::Environment::Production)
    };
}
