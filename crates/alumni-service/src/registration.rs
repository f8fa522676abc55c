//! Self-service registration: create the user, then grant the starting role.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use alumni_auth::password::PasswordValidator;
use alumni_core::config::AuthConfig;
use alumni_core::error::AppError;
use alumni_core::result::AppResult;
use alumni_database::store::{RoleStore, UserStore};
use alumni_entity::role::Role;

use crate::assignment::AssignmentLedger;
use crate::credential::{CredentialStore, NewUser};
use crate::validation::{validate_email, validate_username};

/// Registration form as submitted by the client.
#[derive(Debug, Clone, Deserialize)]
pub struct Registration {
    pub username: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    /// Requested starting role. Unknown names fall back to the default role.
    pub selected_role: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RegistrationOutcome {
    #[serde(rename = "id")]
    pub user_id: Uuid,
    pub username: String,
    pub email: String,
    /// `None` when no starting role could be granted.
    pub role: Option<String>,
}

/// Two-phase registration.
///
/// Phase one persists the user, phase two assigns the starting role. The
/// phases are not transactional. With `atomic_registration` off a phase-two
/// failure leaves a roleless user behind; with it on the user is deleted
/// again before the error is returned.
#[derive(Debug, Clone)]
pub struct RegistrationService {
    credentials: CredentialStore,
    ledger: AssignmentLedger,
    users: Arc<dyn UserStore>,
    roles: Arc<dyn RoleStore>,
    validator: PasswordValidator,
    default_role: String,
    atomic: bool,
}

impl RegistrationService {
    pub fn new(
        credentials: CredentialStore,
        ledger: AssignmentLedger,
        users: Arc<dyn UserStore>,
        roles: Arc<dyn RoleStore>,
        config: &AuthConfig,
    ) -> Self {
        Self {
            credentials,
            ledger,
            users,
            roles,
            validator: PasswordValidator::new(config),
            default_role: config.default_role.clone(),
            atomic: config.atomic_registration,
        }
    }

    pub async fn register(&self, form: Registration) -> AppResult<RegistrationOutcome> {
        // Nothing is persisted until every field check passes.
        self.validator
            .validate_confirmation(&form.password, &form.confirm_password)?;
        validate_username(&form.username)?;
        validate_email(&form.email)?;

        let username = form.username.trim().to_string();
        let email = form.email.trim().to_string();

        let user_id = self
            .credentials
            .register(NewUser {
                username: username.clone(),
                email: email.clone(),
                password: form.password,
                first_name: form.first_name,
                last_name: form.last_name,
                phone: form.phone,
            })
            .await?;

        let role = match self.grant_starting_role(user_id, form.selected_role.as_deref()).await {
            Ok(role) => role,
            Err(err) if self.atomic => {
                self.roll_back(user_id).await;
                return Err(err);
            }
            Err(err) => {
                warn!(user_id = %user_id, error = %err, "Registered user left without a role");
                return Err(err);
            }
        };

        info!(
            user_id = %user_id,
            username = %username,
            role = ?role,
            "Registration completed"
        );

        Ok(RegistrationOutcome {
            user_id,
            username,
            email,
            role,
        })
    }

    /// Returns the granted role name, or `None` when neither the requested
    /// nor the default role exists and registration is not atomic.
    async fn grant_starting_role(
        &self,
        user_id: Uuid,
        requested: Option<&str>,
    ) -> AppResult<Option<String>> {
        let Some(role) = self.resolve_role(requested).await? else {
            if self.atomic {
                return Err(AppError::not_found("Default role not found"));
            }
            warn!(
                user_id = %user_id,
                default_role = %self.default_role,
                "No starting role available, user registered without a role"
            );
            return Ok(None);
        };

        self.ledger.assign_role(user_id, role.id, None).await?;
        Ok(Some(role.name))
    }

    async fn resolve_role(&self, requested: Option<&str>) -> AppResult<Option<Role>> {
        if let Some(name) = requested.map(str::trim).filter(|n| !n.is_empty()) {
            if let Some(role) = self.roles.find_by_name(name).await? {
                return Ok(Some(role));
            }
        }
        self.roles.find_by_name(&self.default_role).await
    }

    async fn roll_back(&self, user_id: Uuid) {
        match self.users.delete(user_id).await {
            Ok(_) => warn!(user_id = %user_id, "Registration rolled back"),
            Err(e) => warn!(user_id = %user_id, error = %e, "Failed to roll back registration"),
        }
    }
}
