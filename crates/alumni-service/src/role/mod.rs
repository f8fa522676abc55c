//! Role registry: named roles and their permission sets.

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use alumni_core::error::AppError;
use alumni_core::result::AppResult;
use alumni_database::store::{AssignmentStore, RoleStore};
use alumni_entity::role::{CreateRole, PermissionSet, Role, UpdateRole, is_built_in};
use alumni_entity::user::RoleHolder;

use crate::validation::{require_non_blank, validate_role_name};

/// Manages roles. Built-in roles cannot be edited through [`RoleRegistry::update_role`]
/// or deleted, though single permissions may still be added or removed.
#[derive(Debug, Clone)]
pub struct RoleRegistry {
    roles: Arc<dyn RoleStore>,
    assignments: Arc<dyn AssignmentStore>,
}

impl RoleRegistry {
    pub fn new(roles: Arc<dyn RoleStore>, assignments: Arc<dyn AssignmentStore>) -> Self {
        Self { roles, assignments }
    }

    pub async fn create_role(
        &self,
        name: &str,
        description: Option<String>,
        permissions: impl IntoIterator<Item = String>,
    ) -> AppResult<Role> {
        validate_role_name(name)?;
        let permissions: PermissionSet = permissions
            .into_iter()
            .filter(|p| !p.trim().is_empty())
            .collect();

        let role = self
            .roles
            .create(&CreateRole {
                name: name.trim().to_string(),
                description,
                permissions,
            })
            .await?;

        info!(role_id = %role.id, name = %role.name, "Role created");
        Ok(role)
    }

    pub async fn get_role(&self, id: Uuid) -> AppResult<Option<Role>> {
        self.roles.find_by_id(id).await
    }

    pub async fn get_role_by_name(&self, name: &str) -> AppResult<Option<Role>> {
        self.roles.find_by_name(name).await
    }

    /// Like [`RoleRegistry::get_role`] but a missing role is `NotFound`.
    pub async fn require_role(&self, id: Uuid) -> AppResult<Role> {
        self.get_role(id)
            .await?
            .ok_or_else(|| AppError::not_found("Role not found"))
    }

    /// All roles ordered by name.
    pub async fn list_roles(&self) -> AppResult<Vec<Role>> {
        self.roles.list().await
    }

    /// Omitted fields keep their current values.
    pub async fn update_role(&self, id: Uuid, changes: UpdateRole) -> AppResult<Role> {
        let current = self.require_role(id).await?;
        if current.is_built_in() {
            return Err(AppError::policy("Cannot edit built-in roles"));
        }
        if let Some(name) = &changes.name {
            validate_role_name(name)?;
        }
        if changes.is_empty() {
            return Ok(current);
        }

        let role = self.roles.update(id, &changes).await?;
        info!(role_id = %id, name = %role.name, "Role updated");
        Ok(role)
    }

    /// Remove every assignment of the role, then the role itself.
    pub async fn delete_role(&self, id: Uuid) -> AppResult<()> {
        let role = self.require_role(id).await?;
        if is_built_in(&role.name) {
            return Err(AppError::policy("Cannot delete built-in roles"));
        }

        let released = self.assignments.delete_for_role(id).await?;
        self.roles.delete(id).await?;

        info!(role_id = %id, name = %role.name, released, "Role deleted");
        Ok(())
    }

    /// Idempotent. Returns the resulting set.
    pub async fn add_permission(&self, id: Uuid, permission: &str) -> AppResult<PermissionSet> {
        require_non_blank(permission, "Permission")?;
        let set = self.roles.add_permission(id, permission.trim()).await?;
        info!(role_id = %id, permission = %permission.trim(), "Permission added");
        Ok(set)
    }

    /// Idempotent. Returns the resulting set.
    pub async fn remove_permission(&self, id: Uuid, permission: &str) -> AppResult<PermissionSet> {
        require_non_blank(permission, "Permission")?;
        let set = self.roles.remove_permission(id, permission.trim()).await?;
        info!(role_id = %id, permission = %permission.trim(), "Permission removed");
        Ok(set)
    }

    /// Users currently holding the role.
    pub async fn role_users(&self, id: Uuid) -> AppResult<Vec<RoleHolder>> {
        self.require_role(id).await?;
        self.assignments.users_with_role(id).await
    }
}
