pub mod cookie;
pub mod password;

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::UserIdentity;
use crate::services::AuthFailure;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub id: Uuid,
    pub username: String,
    pub exp: i64,
    pub iat: i64,
}

impl Claims {
    /// `None` when `issued_at + ttl` falls outside the representable date range.
    pub fn new(identity: &UserIdentity, issued_at: DateTime<Utc>, ttl: Duration) -> Option<Self> {
        let expires_at = issued_at.checked_add_signed(ttl)?;
        Some(Self {
            id: identity.id,
            username: identity.username.clone(),
            exp: expires_at.timestamp(),
            iat: issued_at.timestamp(),
        })
    }

    pub fn identity(&self) -> UserIdentity {
        UserIdentity {
            id: self.id,
            username: self.username.clone(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum JwtError {
    #[error("JWT generation error: {0}")]
    TokenGeneration(String),
    #[error("Invalid JWT secret")]
    InvalidSecret,
    #[error("Token lifetime must be between 1 and 31536000 seconds, got {0}")]
    InvalidLifetime(u64),
}

/// Upper bound for `SECURITY_TOKEN_EXPIRY_SECS`: one year.
pub const MAX_TOKEN_TTL_SECS: u64 = 60 * 60 * 24 * 365;

/// Accepted token lifetime as a signed duration, rejecting zero and anything over a year.
pub fn token_lifetime(ttl_secs: u64) -> Result<Duration, JwtError> {
    if ttl_secs == 0 || ttl_secs > MAX_TOKEN_TTL_SECS {
        return Err(JwtError::InvalidLifetime(ttl_secs));
    }
    i64::try_from(ttl_secs)
        .ok()
        .and_then(Duration::try_seconds)
        .ok_or(JwtError::InvalidLifetime(ttl_secs))
}

/// HS256 signing material plus the token lifetime.
#[derive(Clone)]
pub struct TokenKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl TokenKeys {
    pub fn new(secret: &str, ttl_secs: u64) -> Result<Self, JwtError> {
        if secret.is_empty() {
            return Err(JwtError::InvalidSecret);
        }

        Ok(Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl: token_lifetime(ttl_secs)?,
        })
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn generate(&self, identity: &UserIdentity) -> Result<String, JwtError> {
        self.generate_at(identity, Utc::now())
    }

    pub fn generate_at(&self, identity: &UserIdentity, issued_at: DateTime<Utc>) -> Result<String, JwtError> {
        let claims = Claims::new(identity, issued_at, self.ttl)
            .ok_or_else(|| JwtError::TokenGeneration("token expiry out of range".to_string()))?;
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| JwtError::TokenGeneration(e.to_string()))
    }

    /// Checks signature and expiry with no leeway.
    pub fn validate(&self, token: &str) -> Result<Claims, AuthFailure> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        decode::<Claims>(token, &self.decoding, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => AuthFailure::Expired,
                _ => AuthFailure::InvalidToken,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity() -> UserIdentity {
        UserIdentity {
            id: Uuid::new_v4(),
            username: "alice".into(),
        }
    }

    #[test]
    fn empty_secret_is_rejected() {
        assert!(matches!(TokenKeys::new("", 3600), Err(JwtError::InvalidSecret)));
    }

    #[test]
    fn out_of_range_lifetimes_are_rejected() {
        for ttl in [0, MAX_TOKEN_TTL_SECS + 1, 10_000_000_000_000, u64::MAX] {
            assert!(
                matches!(TokenKeys::new("secret", ttl), Err(JwtError::InvalidLifetime(v)) if v == ttl),
                "ttl {} accepted",
                ttl
            );
        }
    }

    #[test]
    fn longest_lifetime_issues_valid_tokens() {
        let keys = TokenKeys::new("secret", MAX_TOKEN_TTL_SECS).unwrap();
        let claims = keys.validate(&keys.generate(&identity()).unwrap()).unwrap();
        assert_eq!(claims.exp - claims.iat, MAX_TOKEN_TTL_SECS as i64);
    }

    #[test]
    fn expiry_past_the_calendar_fails_without_panicking() {
        let keys = TokenKeys::new("secret", 3600).unwrap();
        let result = keys.generate_at(&identity(), DateTime::<Utc>::MAX_UTC);
        assert!(matches!(result, Err(JwtError::TokenGeneration(_))));
    }

    #[test]
    fn fresh_token_round_trips_identity() {
        let keys = TokenKeys::new("secret", 3600).unwrap();
        let who = identity();
        let token = keys.generate(&who).unwrap();

        let claims = keys.validate(&token).unwrap();
        assert_eq!(claims.identity(), who);
        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[test]
    fn expired_token_fails() {
        let keys = TokenKeys::new("secret", 3600).unwrap();
        let token = keys
            .generate_at(&identity(), Utc::now() - Duration::hours(2))
            .unwrap();

        assert_eq!(keys.validate(&token), Err(AuthFailure::Expired));
    }

    #[test]
    fn altered_payload_fails() {
        let keys = TokenKeys::new("secret", 3600).unwrap();
        let token = keys.generate(&identity()).unwrap();

        let mut parts: Vec<String> = token.split('.').map(str::to_string).collect();
        let payload = &mut parts[1];
        let mid = payload.len() / 2;
        let replacement = if &payload[mid..mid + 1] == "A" { "B" } else { "A" };
        payload.replace_range(mid..mid + 1, replacement);
        let tampered = parts.join(".");

        assert_eq!(keys.validate(&tampered), Err(AuthFailure::InvalidToken));
    }

    #[test]
    fn other_secret_fails() {
        let token = TokenKeys::new("secret", 3600).unwrap().generate(&identity()).unwrap();
        let other = TokenKeys::new("another", 3600).unwrap();
        assert_eq!(other.validate(&token), Err(AuthFailure::InvalidToken));
    }
}
