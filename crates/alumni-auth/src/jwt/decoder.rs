//! Session token verification.

use jsonwebtoken::errors::ErrorKind as JwtErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use tracing::debug;

use alumni_core::config::AuthConfig;
use alumni_core::error::AppError;

use super::claims::Claims;

/// Validates session tokens. Every failure is an authentication error.
#[derive(Clone)]
pub struct JwtDecoder {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl std::fmt::Debug for JwtDecoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtDecoder")
            .field("validation", &self.validation)
            .finish()
    }
}

impl JwtDecoder {
    pub fn new(config: &AuthConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        // A token checked after its expiry must always fail.
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            validation,
        }
    }

    /// Check signature and expiry and return the embedded claims.
    pub fn decode(&self, token: &str) -> Result<Claims, AppError> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
            debug!(error = %e, "Session token rejected");
            match e.kind() {
                JwtErrorKind::ExpiredSignature => AppError::authentication("Token has expired"),
                JwtErrorKind::InvalidSignature => {
                    AppError::authentication("Invalid token signature")
                }
                _ => AppError::authentication("Invalid token"),
            }
        })?;

        // `exp == now` passes the library check; treat it as expired too.
        if data.claims.is_expired() {
            return Err(AppError::authentication("Token has expired"));
        }
        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};
    use uuid::Uuid;

    use alumni_core::ErrorKind;

    use super::*;
    use crate::jwt::encoder::{JwtEncoder, TokenSubject};

    fn config(secret: &str) -> AuthConfig {
        AuthConfig {
            jwt_secret: secret.to_string(),
            ..AuthConfig::default()
        }
    }

    fn subject() -> TokenSubject<'static> {
        TokenSubject {
            user_id: Uuid::new_v4(),
            username: "alice",
            email: "alice@x.com",
            roles: vec!["alumni".into()],
            permissions: vec!["view_alumni".into(), "view_directory".into()],
        }
    }

    #[test]
    fn test_issue_then_decode() {
        let config = config("unit-test-secret");
        let (token, expires_at) = JwtEncoder::new(&config).issue(subject()).unwrap();
        let claims = JwtDecoder::new(&config).decode(&token).unwrap();

        assert_eq!(claims.username, "alice");
        assert_eq!(claims.roles, vec!["alumni"]);
        assert_eq!(claims.exp, expires_at.timestamp());
        assert!(expires_at > Utc::now() + Duration::days(6));
    }

    #[test]
    fn test_expired_token_is_authentication_error() {
        let config = config("unit-test-secret");
        let encoder = JwtEncoder::new(&config);
        let now = Utc::now().timestamp();

        for exp in [now - 3600, now - 1, now] {
            let claims = Claims {
                sub: Uuid::new_v4(),
                username: "alice".into(),
                email: "alice@x.com".into(),
                roles: vec![],
                permissions: vec![],
                iat: now - 7200,
                exp,
            };
            let token = encoder.sign(&claims).unwrap();
            let err = JwtDecoder::new(&config).decode(&token).unwrap_err();
            assert_eq!(err.kind, ErrorKind::Authentication, "exp offset {}", exp - now);
        }
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let (token, _) = JwtEncoder::new(&config("secret-a")).issue(subject()).unwrap();
        let err = JwtDecoder::new(&config("secret-b")).decode(&token).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Authentication);
    }

    #[test]
    fn test_garbage_rejected() {
        let decoder = JwtDecoder::new(&config("secret"));
        for token in ["", "not-a-token", "a.b.c"] {
            let err = decoder.decode(token).unwrap_err();
            assert_eq!(err.kind, ErrorKind::Authentication);
        }
    }
}
