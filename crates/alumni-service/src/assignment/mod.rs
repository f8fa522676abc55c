//! User-role assignment ledger.

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use alumni_core::config::AdminFloor;
use alumni_core::error::AppError;
use alumni_core::result::AppResult;
use alumni_database::store::{AssignmentStore, RoleStore, UserStore};
use alumni_entity::assignment::UserRoleAssignment;
use alumni_entity::role::{ADMIN_ROLE, Role, RoleSummary};

/// Grants and revokes roles, recording who assigned each one.
#[derive(Debug, Clone)]
pub struct AssignmentLedger {
    users: Arc<dyn UserStore>,
    roles: Arc<dyn RoleStore>,
    assignments: Arc<dyn AssignmentStore>,
    admin_floor: AdminFloor,
}

impl AssignmentLedger {
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

    /// `assigned_by` is `None` for self-registration and system seeding.
    pub async fn assign_role(
        &self,
        user_id: Uuid,
        role_id: Uuid,
        assigned_by: Option<Uuid>,
    ) -> AppResult<UserRoleAssignment> {
        self.require_user(user_id).await?;
        let role = self.require_role(role_id).await?;

        if self.assignments.find(user_id, role_id).await?.is_some() {
            return Err(AppError::conflict("User already has this role"));
        }

        let assignment = UserRoleAssignment::new(user_id, role_id, assigned_by);
        self.assignments.insert(&assignment).await?;

        info!(
            user_id = %user_id,
            role = %role.name,
            assigned_by = ?assigned_by,
            "Role assigned"
        );
        Ok(assignment)
    }

    /// Revoke a role.
    ///
    /// Always refuses to strip `admin` from a user whose only role it is.
    /// Under [`AdminFloor::System`] it also refuses when that user is the
    /// last admin holder anywhere.
    pub async fn remove_role(&self, user_id: Uuid, role_id: Uuid) -> AppResult<()> {
        self.require_user(user_id).await?;
        let role = self.require_role(role_id).await?;

        let held = self.assignments.roles_for_user(user_id).await?;
        if !held.iter().any(|r| r.id == role_id) {
            return Err(AppError::not_found("User does not have this role"));
        }

        let is_admin = role.name == ADMIN_ROLE;
        if is_admin && held.len() == 1 {
            return Err(AppError::policy("Cannot remove last admin role"));
        }

        if is_admin && self.admin_floor == AdminFloor::System {
            if !self
                .assignments
                .delete_unless_last_holder(user_id, role_id)
                .await?
            {
                return Err(AppError::policy(
                    "Cannot remove the only remaining administrator",
                ));
            }
        } else {
            self.assignments.delete(user_id, role_id).await?;
        }

        info!(user_id = %user_id, role = %role.name, "Role removed");
        Ok(())
    }

    /// Roles held by a user, without their permission sets.
    pub async fn get_user_roles(&self, user_id: Uuid) -> AppResult<Vec<RoleSummary>> {
        self.require_user(user_id).await?;
        self.assignments.roles_for_user(user_id).await
    }

    async fn require_user(&self, user_id: Uuid) -> AppResult<()> {
        self.users
            .find_by_id(user_id)
            .await?
            .map(|_| ())
            .ok_or_else(|| AppError::not_found("User not found"))
    }

    async fn require_role(&self, role_id: Uuid) -> AppResult<Role> {
        self.roles
            .find_by_id(role_id)
            .await?
            .ok_or_else(|| AppError::not_found("Role not found"))
    }
}
