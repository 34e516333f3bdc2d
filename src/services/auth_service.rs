use std::sync::Arc;

use tokio::task;
use tracing::{debug, info};
use uuid::Uuid;

use super::{AuthFailure, ServiceError};
use crate::auth::password::{hash_password, verify_password};
use crate::auth::{Claims, TokenKeys};
use crate::models::{User, UserIdentity};
use crate::store::{StoreError, UserStore};

pub const INVALID_CREDENTIALS: &str = "Invalid username or password";
pub const USERNAME_TAKEN: &str = "Username already exists";

const MIN_USERNAME_LEN: usize = 3;
const MIN_PASSWORD_LEN: usize = 6;

/// Registration, credential checks and token issue/verification.
#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserStore>,
    keys: TokenKeys,
}

impl AuthService {
    pub fn new(users: Arc<dyn UserStore>, keys: TokenKeys) -> Self {
        Self { users, keys }
    }

    /// Token lifetime in seconds, also used as the cookie max-age.
    pub fn token_ttl_secs(&self) -> i64 {
        self.keys.ttl().num_seconds()
    }

    pub async fn register(&self, username: &str, password: &str) -> Result<Uuid, ServiceError> {
        let username = username.trim();
        validate_credentials(username, password)?;

        let existing = self
            .users
            .find_by_username(username)
            .await
            .map_err(ServiceError::storage("Error registering user"))?;
        if existing.is_some() {
            debug!(username, "Registration rejected: username taken");
            return Err(ServiceError::Validation(USERNAME_TAKEN.to_string()));
        }

        let password = password.to_owned();
        let password_hash = task::spawn_blocking(move || hash_password(&password))
            .await
            .map_err(ServiceError::storage("Error registering user"))?
            .map_err(ServiceError::storage("Error registering user"))?;

        let user = User {
            id: Uuid::new_v4(),
            username: username.to_string(),
            password_hash,
        };
        let id = user.id;

        match self.users.insert(user).await {
            Ok(()) => {
                info!(user_id = %id, username, "User registered");
                Ok(id)
            }
            // Lost a race with a concurrent registration of the same name.
            Err(StoreError::DuplicateUsername) => Err(ServiceError::Validation(USERNAME_TAKEN.to_string())),
            Err(e) => Err(ServiceError::storage("Error registering user")(e)),
        }
    }

    /// Unknown user and wrong password fail with the same message.
    pub async fn login(&self, username: &str, password: &str) -> Result<UserIdentity, ServiceError> {
        let user = self
            .users
            .find_by_username(username.trim())
            .await
            .map_err(ServiceError::storage("Error logging in"))?;

        let Some(user) = user else {
            debug!(username, "Login rejected: unknown user");
            return Err(ServiceError::Validation(INVALID_CREDENTIALS.to_string()));
        };

        let password = password.to_owned();
        let stored_hash = user.password_hash.clone();
        let valid = task::spawn_blocking(move || verify_password(&password, &stored_hash))
            .await
            .map_err(ServiceError::storage("Error logging in"))?;

        if !valid {
            debug!(user_id = %user.id, "Login rejected: password mismatch");
            return Err(ServiceError::Validation(INVALID_CREDENTIALS.to_string()));
        }

        Ok(UserIdentity::from(&user))
    }

    pub fn issue_token(&self, identity: &UserIdentity) -> Result<String, ServiceError> {
        self.keys
            .generate(identity)
            .map_err(ServiceError::storage("Error issuing token"))
    }

    pub fn verify_token(&self, token: &str) -> Result<Claims, ServiceError> {
        if token.trim().is_empty() {
            return Err(AuthFailure::MissingToken.into());
        }
        Ok(self.keys.validate(token)?)
    }
}

fn validate_credentials(username: &str, password: &str) -> Result<(), ServiceError> {
    if username.chars().count() < MIN_USERNAME_LEN {
        return Err(ServiceError::Validation(format!(
            "Username must be at least {} characters long",
            MIN_USERNAME_LEN
        )));
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ServiceError::Validation(format!(
            "Password must be at least {} characters long",
            MIN_PASSWORD_LEN
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryUserStore;
    use chrono::{Duration, Utc};

    fn service() -> AuthService {
        let keys = TokenKeys::new("test-secret", 3600).unwrap();
        AuthService::new(Arc::new(MemoryUserStore::new()), keys)
    }

    #[tokio::test]
    async fn register_then_login_succeeds() {
        let auth = service();
        let id = auth.register("alice", "hunter22").await.unwrap();

        let identity = auth.login("alice", "hunter22").await.unwrap();
        assert_eq!(identity.id, id);
        assert_eq!(identity.username, "alice");
    }

    #[tokio::test]
    async fn duplicate_registration_fails_without_mutation() {
        let auth = service();
        let first = auth.register("alice", "hunter22").await.unwrap();

        match auth.register("alice", "different-pass").await {
            Err(ServiceError::Validation(msg)) => assert_eq!(msg, USERNAME_TAKEN),
            other => panic!("expected validation failure, got {:?}", other),
        }

        // The original password still works and the id is unchanged.
        let identity = auth.login("alice", "hunter22").await.unwrap();
        assert_eq!(identity.id, first);
        assert!(auth.login("alice", "different-pass").await.is_err());
    }

    #[tokio::test]
    async fn short_credentials_are_rejected() {
        let auth = service();
        assert!(matches!(auth.register("al", "hunter22").await, Err(ServiceError::Validation(_))));
        assert!(matches!(auth.register("alice", "123").await, Err(ServiceError::Validation(_))));
    }

    #[tokio::test]
    async fn unknown_user_and_wrong_password_look_the_same() {
        let auth = service();
        auth.register("alice", "hunter22").await.unwrap();

        let unknown = auth.login("bob", "hunter22").await.unwrap_err();
        let wrong = auth.login("alice", "nope-nope").await.unwrap_err();
        assert_eq!(unknown.to_string(), INVALID_CREDENTIALS);
        assert_eq!(wrong.to_string(), INVALID_CREDENTIALS);
    }

    #[tokio::test]
    async fn issued_token_verifies() {
        let auth = service();
        let identity = UserIdentity { id: Uuid::new_v4(), username: "alice".into() };
        let token = auth.issue_token(&identity).unwrap();

        let claims = auth.verify_token(&token).unwrap();
        assert_eq!(claims.identity(), identity);
        assert_eq!(auth.token_ttl_secs(), 3600);
    }

    #[test]
    fn expired_and_missing_tokens_fail() {
        let keys = TokenKeys::new("test-secret", 3600).unwrap();
        let auth = AuthService::new(Arc::new(MemoryUserStore::new()), keys.clone());
        let identity = UserIdentity { id: Uuid::new_v4(), username: "alice".into() };

        let stale = keys.generate_at(&identity, Utc::now() - Duration::minutes(61)).unwrap();
        assert!(matches!(auth.verify_token(&stale), Err(ServiceError::Auth(AuthFailure::Expired))));
        assert!(matches!(auth.verify_token(""), Err(ServiceError::Auth(AuthFailure::MissingToken))));
        assert!(matches!(
            auth.verify_token("garbage"),
            Err(ServiceError::Auth(AuthFailure::InvalidToken))
        ));
    }
}
