//! Administrative user management.

use std::sync::Arc;

use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use alumni_core::config::AdminFloor;
use alumni_core::error::AppError;
use alumni_core::result::AppResult;
use alumni_database::store::{AssignmentStore, RoleStore, UserStore};
use alumni_entity::role::{ADMIN_ROLE, Role, RoleSummary};
use alumni_entity::user::{UpdateUser, User, UserProfile, UserSummary};

use crate::validation::validate_phone;

/// A user with the full definition of every role they hold.
#[derive(Debug, Clone, Serialize)]
pub struct UserDetail {
    #[serde(flatten)]
    pub profile: UserProfile,
    pub roles: Vec<Role>,
}

#[derive(Debug, Clone)]
pub struct UserAdminService {
    users: Arc<dyn UserStore>,
    roles: Arc<dyn RoleStore>,
    assignments: Arc<dyn AssignmentStore>,
    admin_floor: AdminFloor,
}

impl UserAdminService {
    pub fn new(
        users: Arc<dyn UserStore>,
        roles: Arc<dyn RoleStore>,
        assignments: Arc<dyn AssignmentStore>,
        admin_floor: AdminFloor,
    ) -> Self {
        Self {
            users,
            roles,
            assignments,
            admin_floor,
        }
    }

    /// Every user with the names of their roles.
    pub async fn list_users(&self) -> AppResult<Vec<UserSummary>> {
        let users = self.users.list().await?;
        let mut summaries = Vec::with_capacity(users.len());
        for user in &users {
            let roles = self.assignments.roles_for_user(user.id).await?;
            summaries.push(UserSummary {
                profile: UserProfile::from(user),
                roles: roles.into_iter().map(|r| r.name).collect(),
            });
        }
        Ok(summaries)
    }

    pub async fn get_user(&self, id: Uuid) -> AppResult<UserDetail> {
        let user = self.require_user(id).await?;
        let mut roles = Vec::new();
        for summary in self.assignments.roles_for_user(id).await? {
            if let Some(role) = self.roles.find_by_id(summary.id).await? {
                roles.push(role);
            }
        }
        Ok(UserDetail {
            profile: UserProfile::from(&user),
            roles,
        })
    }

    /// Omitted fields keep their current values.
    pub async fn update_user(&self, id: Uuid, changes: UpdateUser) -> AppResult<UserProfile> {
        if let Some(phone) = &changes.phone {
            validate_phone(phone)?;
        }
        self.require_user(id).await?;
        let user = self.users.update(id, &changes).await?;
        info!(user_id = %id, is_active = user.is_active, "User updated");
        Ok(UserProfile::from(&user))
    }

    /// Remove the user's assignments, then the user.
    pub async fn delete_user(&self, id: Uuid) -> AppResult<()> {
        let user = self.require_user(id).await?;
        let held = self.assignments.roles_for_user(id).await?;

        if let Some(admin) = held.iter().find(|r| r.name == ADMIN_ROLE) {
            if held.len() == 1 {
                return Err(AppError::policy("Cannot delete admin user"));
            }
            // Drop the admin grant first so a concurrent delete or revoke
            // cannot take the last administrator with it.
            if self.admin_floor == AdminFloor::System
                && !self
                    .assignments
                    .delete_unless_last_holder(id, admin.id)
                    .await?
            {
                return Err(AppError::policy(
                    "Cannot delete the only remaining administrator",
                ));
            }
        }

        let released = self.assignments.delete_for_user(id).await?;
        self.users.delete(id).await?;

        info!(user_id = %id, username = %user.username, released, "User deleted");
        Ok(())
    }

    pub async fn user_roles(&self, id: Uuid) -> AppResult<Vec<RoleSummary>> {
        self.require_user(id).await?;
        self.assignments.roles_for_user(id).await
    }

    async fn require_user(&self, id: Uuid) -> AppResult<User> {
        self.users
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))
    }
}
