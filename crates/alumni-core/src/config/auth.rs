//! Authentication configuration.

use serde::{Deserialize, Serialize};

/// How far the last-admin protection reaches when a role is stripped or a
/// user is deleted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdminFloor {
    /// Refuse only when the target user's sole role is `admin`.
    #[default]
    PerUser,
    /// Additionally refuse when the change would leave no admin holder at all.
    System,
}

/// Credential and session-token configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Secret key for token signing (HMAC-SHA256).
    #[serde(default = "default_jwt_secret")]
    pub jwt_secret: String,
    /// Token lifetime in minutes.
    #[serde(default = "default_token_ttl")]
    pub token_ttl_minutes: u64,
    /// Minimum password length.
    #[serde(default = "default_password_min")]
    pub password_min_length: usize,
    /// Role given at registration when none (or an unknown one) is requested.
    #[serde(default = "default_role")]
    pub default_role: String,
    /// Reach of the last-admin protection.
    #[serde(default)]
    pub admin_floor: AdminFloor,
    /// Delete the new user again when the initial role cannot be assigned.
    #[serde(default)]
    pub atomic_registration: bool,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: default_jwt_secret(),
            token_ttl_minutes: default_token_ttl(),
            password_min_length: default_password_min(),
            default_role: default_role(),
            admin_floor: AdminFloor::default(),
            atomic_registration: false,
        }
    }
}

fn default_jwt_secret() -> String {
    "CHANGE_ME_IN_PRODUCTION".to_string()
}

fn default_token_ttl() -> u64 {
    7 * 24 * 60
}

fn default_password_min() -> usize {
    6
}

fn default_role() -> String {
    "alumni".to_string()
}
