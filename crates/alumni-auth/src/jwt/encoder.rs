//! Session token signing.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{EncodingKey, Header, encode};
use uuid::Uuid;

use alumni_core::config::AuthConfig;
use alumni_core::error::AppError;

use super::claims::Claims;

/// Identity and authority to embed in a new token.
#[derive(Debug, Clone)]
pub struct TokenSubject<'a> {
    pub user_id: Uuid,
    pub username: &'a str,
    pub email: &'a str,
    pub roles: Vec<String>,
    pub permissions: Vec<String>,
}

/// Creates HS256-signed session tokens.
#[derive(Clone)]
pub struct JwtEncoder {
    encoding_key: EncodingKey,
    ttl: Duration,
}

impl std::fmt::Debug for JwtEncoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtEncoder").field("ttl", &self.ttl).finish()
    }
}

impl JwtEncoder {
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(config.jwt_secret.as_bytes()),
            ttl: Duration::minutes(config.token_ttl_minutes as i64),
        }
    }

    /// Token lifetime applied by [`JwtEncoder::issue`].
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Mint a token for `subject` expiring one TTL from now.
    pub fn issue(&self, subject: TokenSubject<'_>) -> Result<(String, DateTime<Utc>), AppError> {
        let now = Utc::now();
        let expires_at = now + self.ttl;
        let claims = Claims {
            sub: subject.user_id,
            username: subject.username.to_string(),
            email: subject.email.to_string(),
            roles: subject.roles,
            permissions: subject.permissions,
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        };
        let token = self.sign(&claims)?;
        Ok((token, expires_at))
    }

    /// Sign arbitrary claims as-is.
    pub fn sign(&self, claims: &Claims) -> Result<String, AppError> {
        encode(&Header::default(), claims, &self.encoding_key)
            .map_err(|e| AppError::internal(format!("Failed to encode session token: {e}")))
    }
}
