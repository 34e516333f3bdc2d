pub mod auth_service;
pub mod movie_service;

use thiserror::Error;

pub use auth_service::AuthService;
pub use movie_service::MovieService;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Failure kinds shared by the services. Mapped to HTTP statuses only in `crate::error`.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Validation(String),

    /// Underlying infrastructure failure. `operation` is the client-safe message,
    /// `source` keeps the cause for logs.
    #[error("{operation}")]
    Storage {
        operation: &'static str,
        #[source]
        source: BoxError,
    },

    #[error(transparent)]
    Auth(#[from] AuthFailure),
}

impl ServiceError {
    /// Adapter for `map_err` that tags a failure with a client-safe operation message.
    pub(crate) fn storage<E>(operation: &'static str) -> impl FnOnce(E) -> ServiceError
    where
        E: Into<BoxError>,
    {
        move |source| ServiceError::Storage {
            operation,
            source: source.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AuthFailure {
    #[error("Access not authorized")]
    MissingToken,
    #[error("Access not authorized")]
    InvalidToken,
    #[error("Access token expired")]
    Expired,
}
