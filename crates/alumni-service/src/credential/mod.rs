//! Credential store: user records with salted password hashes.

use std::sync::Arc;

use tracing::{info, warn};
use uuid::Uuid;

use alumni_auth::password::{PasswordHasher, PasswordValidator};
use alumni_core::error::{AppError, ErrorKind};
use alumni_core::result::AppResult;
use alumni_database::store::{AssignmentStore, UserStore};
use alumni_entity::user::{CreateUser, UpdateUser, User, UserProfile, UserWithRoles};

use crate::validation::validate_phone;

/// Plaintext registration data. The password never leaves this service
/// unhashed.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
}

/// Persists users and checks their passwords.
#[derive(Debug, Clone)]
pub struct CredentialStore {
    users: Arc<dyn UserStore>,
    assignments: Arc<dyn AssignmentStore>,
    hasher: PasswordHasher,
    validator: PasswordValidator,
}

impl CredentialStore {
    pub fn new(
        users: Arc<dyn UserStore>,
        assignments: Arc<dyn AssignmentStore>,
        hasher: PasswordHasher,
        validator: PasswordValidator,
    ) -> Self {
        Self {
            users,
            assignments,
            hasher,
            validator,
        }
    }

    /// Create a user with no roles and return its id.
    ///
    /// The username/email lookup runs before the insert; the schema's unique
    /// constraints still reject a concurrent duplicate as a conflict.
    pub async fn register(&self, new_user: NewUser) -> AppResult<Uuid> {
        self.validator.validate(&new_user.password)?;
        if let Some(phone) = &new_user.phone {
            validate_phone(phone)?;
        }

        if self
            .users
            .find_by_username_or_email(&new_user.username, &new_user.email)
            .await?
            .is_some()
        {
            return Err(AppError::conflict(
                "User already exists with this email or username",
            ));
        }

        let password_hash = self.hash(new_user.password).await?;
        let user = self
            .users
            .create(&CreateUser {
                username: new_user.username,
                email: new_user.email,
                password_hash,
                first_name: new_user.first_name,
                last_name: new_user.last_name,
                phone: new_user.phone,
            })
            .await?;

        info!(user_id = %user.id, username = %user.username, "User registered");
        Ok(user.id)
    }

    /// Check a username/password pair against active users and return the
    /// user joined with its current roles. The username is trimmed the same
    /// way registration trims it.
    pub async fn verify_credentials(&self, username: &str, password: &str) -> AppResult<UserWithRoles> {
        let user = self
            .users
            .find_by_username(username.trim())
            .await?
            .filter(|u| u.is_active)
            .ok_or_else(|| AppError::authentication("User not found"))?;

        if !self.verify(password, &user.password_hash).await? {
            warn!(user_id = %user.id, "Login rejected: invalid password");
            return Err(AppError::authentication("Invalid password"));
        }

        let roles = self.assignments.roles_for_user(user.id).await?;
        Ok(UserWithRoles { user, roles })
    }

    /// Administrative override. Does not check the old password and must
    /// only be reachable from trusted flows.
    pub async fn set_password(&self, user_id: Uuid, new_password: &str) -> AppResult<()> {
        self.validator.validate(new_password)?;
        let password_hash = self.hash(new_password.to_string()).await?;
        self.users.update_password(user_id, &password_hash).await?;

        info!(user_id = %user_id, "Password set administratively");
        Ok(())
    }

    /// A wrong old password is a `Validation` error.
    pub async fn change_password(
        &self,
        user_id: Uuid,
        old_password: &str,
        new_password: &str,
    ) -> AppResult<()> {
        let user = self.require_user(user_id).await?;

        if !self.verify(old_password, &user.password_hash).await? {
            return Err(AppError::validation("Old password is incorrect"));
        }
        self.validator.validate(new_password)?;

        let password_hash = self.hash(new_password.to_string()).await?;
        self.users.update_password(user_id, &password_hash).await?;

        info!(user_id = %user_id, "Password changed");
        Ok(())
    }

    pub async fn get_profile(&self, user_id: Uuid) -> AppResult<UserProfile> {
        let user = self.require_user(user_id).await?;
        Ok(UserProfile::from(&user))
    }

    /// Update the caller's own name and phone. Omitted fields are kept.
    pub async fn update_profile(
        &self,
        user_id: Uuid,
        first_name: Option<String>,
        last_name: Option<String>,
        phone: Option<String>,
    ) -> AppResult<UserProfile> {
        if let Some(phone) = &phone {
            validate_phone(phone)?;
        }
        let user = self
            .users
            .update(
                user_id,
                &UpdateUser {
                    first_name,
                    last_name,
                    phone,
                    is_active: None,
                },
            )
            .await?;
        Ok(UserProfile::from(&user))
    }

    async fn require_user(&self, user_id: Uuid) -> AppResult<User> {
        self.users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))
    }

    async fn hash(&self, password: String) -> AppResult<String> {
        let hasher = self.hasher.clone();
        tokio::task::spawn_blocking(move || hasher.hash_password(&password))
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Internal, "Hashing task failed", e))?
    }

    async fn verify(&self, password: &str, hash: &str) -> AppResult<bool> {
        let hasher = self.hasher.clone();
        let password = password.to_string();
        let hash = hash.to_string();
        tokio::task::spawn_blocking(move || hasher.verify_password(&password, &hash))
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Internal, "Verification task failed", e))?
    }
}
