//! Development helpers: demo accounts and raw user inspection.
//!
//! Only compiled with the `dev-endpoints` feature. The HTTP layer mounts
//! these in the development environment only.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use alumni_core::error::{AppError, ErrorKind};
use alumni_core::result::AppResult;
use alumni_database::store::{AssignmentStore, RoleStore, UserStore};
use alumni_entity::user::User;

use crate::assignment::AssignmentLedger;
use crate::credential::{CredentialStore, NewUser};

/// Password shared by every demo account.
pub const DEMO_PASSWORD: &str = "Demo@123";

/// (username, email, role)
const DEMO_ACCOUNTS: [(&str, &str, &str); 4] = [
    ("admin_user", "admin@university.edu", "admin"),
    ("manager_user", "manager@university.edu", "manager"),
    ("alumni_user", "alumni@university.edu", "alumni"),
    ("guest_user", "guest@university.edu", "guest"),
];

/// Full user row, password hash included.
#[derive(Debug, Clone, Serialize)]
pub struct RawUser {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub is_active: bool,
    pub roles: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SeededAccount {
    pub username: String,
    pub role: String,
    pub created: bool,
}

#[derive(Debug, Clone)]
pub struct DevTools {
    credentials: CredentialStore,
    ledger: AssignmentLedger,
    users: Arc<dyn UserStore>,
    roles: Arc<dyn RoleStore>,
    assignments: Arc<dyn AssignmentStore>,
}

impl DevTools {
    pub fn new(
        credentials: CredentialStore,
        ledger: AssignmentLedger,
        users: Arc<dyn UserStore>,
        roles: Arc<dyn RoleStore>,
        assignments: Arc<dyn AssignmentStore>,
    ) -> Self {
        warn!("Development tools enabled");
        Self {
            credentials,
            ledger,
            users,
            roles,
            assignments,
        }
    }

    /// Create the demo accounts, or reset their passwords when they already
    /// exist, and make sure each holds its role. Safe to run repeatedly.
    pub async fn seed_demo_users(&self) -> AppResult<Vec<SeededAccount>> {
        let mut seeded = Vec::with_capacity(DEMO_ACCOUNTS.len());

        for (username, email, role_name) in DEMO_ACCOUNTS {
            let (user_id, created) = match self.users.find_by_username(username).await? {
                Some(existing) => {
                    self.credentials.set_password(existing.id, DEMO_PASSWORD).await?;
                    (existing.id, false)
                }
                None => {
                    let id = self
                        .credentials
                        .register(NewUser {
                            username: username.to_string(),
                            email: email.to_string(),
                            password: DEMO_PASSWORD.to_string(),
                            first_name: None,
                            last_name: None,
                            phone: None,
                        })
                        .await?;
                    (id, true)
                }
            };

            let role = self
                .roles
                .find_by_name(role_name)
                .await?
                .ok_or_else(|| AppError::not_found(format!("Role '{role_name}' not found")))?;

            match self.ledger.assign_role(user_id, role.id, None).await {
                Ok(_) => {}
                Err(e) if e.kind == ErrorKind::Conflict => {}
                Err(e) => return Err(e),
            }

            seeded.push(SeededAccount {
                username: username.to_string(),
                role: role_name.to_string(),
                created,
            });
        }

        info!(accounts = seeded.len(), "Demo users seeded");
        Ok(seeded)
    }

    pub async fn list_raw_users(&self) -> AppResult<Vec<RawUser>> {
        let users = self.users.list().await?;
        let mut raw = Vec::with_capacity(users.len());
        for user in users {
            raw.push(self.to_raw(user).await?);
        }
        Ok(raw)
    }

    pub async fn inspect_user(&self, username: &str) -> AppResult<RawUser> {
        let user = self
            .users
            .find_by_username(username)
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))?;
        self.to_raw(user).await
    }

    async fn to_raw(&self, user: User) -> AppResult<RawUser> {
        let roles = self
            .assignments
            .roles_for_user(user.id)
            .await?
            .into_iter()
            .map(|r| r.name)
            .collect();
        Ok(RawUser {
            id: user.id,
            username: user.username,
            email: user.email,
            password_hash: user.password_hash,
            first_name: user.first_name,
            last_name: user.last_name,
            phone: user.phone,
            is_active: user.is_active,
            roles,
            created_at: user.created_at,
            updated_at: user.updated_at,
        })
    }
}
