//! Authenticator: credential check, permission resolution, token issuance.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use alumni_auth::jwt::{Claims, JwtDecoder, JwtEncoder, TokenSubject};
use alumni_core::config::AuthConfig;
use alumni_core::result::AppResult;
use alumni_database::store::RoleStore;
use alumni_entity::role::PermissionSet;

use crate::credential::CredentialStore;

/// Public-safe projection returned with a fresh token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthenticatedUser {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub roles: Vec<String>,
    pub permissions: Vec<String>,
}

/// Result of a successful login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginOutcome {
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub user: AuthenticatedUser,
}

/// Issues and verifies session tokens.
#[derive(Debug, Clone)]
pub struct Authenticator {
    credentials: CredentialStore,
    roles: Arc<dyn RoleStore>,
    encoder: JwtEncoder,
    decoder: JwtDecoder,
}

impl Authenticator {
    pub fn new(credentials: CredentialStore, roles: Arc<dyn RoleStore>, config: &AuthConfig) -> Self {
        Self {
            credentials,
            roles,
            encoder: JwtEncoder::new(config),
            decoder: JwtDecoder::new(config),
        }
    }

    /// Verify credentials and mint a token carrying the union of the
    /// permission sets of every role the user holds right now.
    pub async fn login(&self, username: &str, password: &str) -> AppResult<LoginOutcome> {
        let found = self.credentials.verify_credentials(username, password).await?;

        // One lookup per held role.
        let mut permissions = PermissionSet::new();
        for summary in &found.roles {
            if let Some(role) = self.roles.find_by_id(summary.id).await? {
                permissions.extend_from(&role.permissions);
            }
        }

        let roles = found.role_names();
        let permissions = permissions.into_vec();
        let user = found.user;

        let (token, expires_at) = self.encoder.issue(TokenSubject {
            user_id: user.id,
            username: &user.username,
            email: &user.email,
            roles: roles.clone(),
            permissions: permissions.clone(),
        })?;

        info!(user_id = %user.id, username = %user.username, roles = ?roles, "User logged in");

        Ok(LoginOutcome {
            token,
            expires_at,
            user: AuthenticatedUser {
                id: user.id,
                username: user.username,
                email: user.email,
                first_name: user.first_name,
                last_name: user.last_name,
                roles,
                permissions,
            },
        })
    }

    /// Check signature and expiry. Any failure is an authentication error.
    pub fn verify(&self, token: &str) -> AppResult<Claims> {
        self.decoder.decode(token)
    }
}
