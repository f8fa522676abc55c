//! Process-local store implementing every store trait.
//!
//! A single state behind a Tokio `RwLock` backs all four traits, so each
//! trait method is atomic with respect to the others. Uniqueness rules
//! mirror the PostgreSQL schema's constraints.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Datelike, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use alumni_core::error::AppError;
use alumni_core::result::AppResult;
use alumni_core::types::{PageRequest, PageResponse};
use alumni_entity::alumni::{Alumni, AlumniFields, AlumniYearCount};
use alumni_entity::assignment::UserRoleAssignment;
use alumni_entity::role::builtin::seed_definitions;
use alumni_entity::role::{CreateRole, PermissionSet, Role, RoleSummary, UpdateRole};
use alumni_entity::user::{CreateUser, RoleHolder, UpdateUser, User};

use crate::store::{AlumniStore, AssignmentStore, RoleStore, UserStore};

#[derive(Debug, Default)]
struct MemoryState {
    users: HashMap<Uuid, User>,
    roles: HashMap<Uuid, Role>,
    assignments: Vec<UserRoleAssignment>,
    alumni: HashMap<Uuid, Alumni>,
}

/// In-memory implementation of the user, role, assignment and alumni stores.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    state: Arc<RwLock<MemoryState>>,
}

impl MemoryStore {
    /// An empty store with no roles at all.
    pub fn new() -> Self {
        Self::default()
    }

    /// A store holding the built-in roles, as the initial migration seeds them.
    pub fn with_builtin_roles() -> Self {
        let mut state = MemoryState::default();
        let now = Utc::now();
        for (name, description, permissions) in seed_definitions() {
            let role = Role {
                id: Uuid::now_v7(),
                name: name.to_string(),
                description: Some(description.to_string()),
                permissions: permissions.iter().copied().collect(),
                created_at: now,
                updated_at: now,
            };
            state.roles.insert(role.id, role);
        }
        Self {
            state: Arc::new(RwLock::new(state)),
        }
    }

    /// Number of stored assignment rows, for asserting on duplicates.
    pub async fn assignment_count(&self) -> usize {
        self.state.read().await.assignments.len()
    }

    /// Number of stored users.
    pub async fn user_count(&self) -> usize {
        self.state.read().await.users.len()
    }
}

fn role_not_found(id: Uuid) -> AppError {
    AppError::not_found(format!("Role {id} not found"))
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        Ok(self.state.read().await.users.get(&id).cloned())
    }

    async fn find_by_username(&self, username: &str) -> AppResult<Option<User>> {
        let state = self.state.read().await;
        Ok(state.users.values().find(|u| u.username == username).cloned())
    }

    async fn find_by_username_or_email(
        &self,
        username: &str,
        email: &str,
    ) -> AppResult<Option<User>> {
        let state = self.state.read().await;
        Ok(state
            .users
            .values()
            .find(|u| u.username == username || u.email == email)
            .cloned())
    }

    async fn list(&self) -> AppResult<Vec<User>> {
        let state = self.state.read().await;
        let mut users: Vec<User> = state.users.values().cloned().collect();
        users.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(users)
    }

    async fn create(&self, data: &CreateUser) -> AppResult<User> {
        let mut state = self.state.write().await;
        if state.users.values().any(|u| u.username == data.username) {
            return Err(AppError::conflict(format!(
                "Username '{}' already exists",
                data.username
            )));
        }
        if state.users.values().any(|u| u.email == data.email) {
            return Err(AppError::conflict("Email already in use"));
        }

        let now = Utc::now();
        let user = User {
            id: Uuid::now_v7(),
            username: data.username.clone(),
            email: data.email.clone(),
            password_hash: data.password_hash.clone(),
            first_name: data.first_name.clone(),
            last_name: data.last_name.clone(),
            phone: data.phone.clone(),
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        state.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn update(&self, id: Uuid, data: &UpdateUser) -> AppResult<User> {
        let mut state = self.state.write().await;
        let user = state
            .users
            .get_mut(&id)
            .ok_or_else(|| AppError::not_found(format!("User {id} not found")))?;
        data.apply_to(user);
        user.updated_at = Utc::now();
        Ok(user.clone())
    }

    async fn update_password(&self, id: Uuid, password_hash: &str) -> AppResult<()> {
        let mut state = self.state.write().await;
        let user = state
            .users
            .get_mut(&id)
            .ok_or_else(|| AppError::not_found(format!("User {id} not found")))?;
        user.password_hash = password_hash.to_string();
        user.updated_at = Utc::now();
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let mut state = self.state.write().await;
        if state.assignments.iter().any(|a| a.user_id == id) {
            return Err(AppError::database(format!(
                "User {id} is still referenced by role assignments"
            )));
        }
        for assignment in state.assignments.iter_mut() {
            if assignment.assigned_by == Some(id) {
                assignment.assigned_by = None;
            }
        }
        Ok(state.users.remove(&id).is_some())
    }
}

#[async_trait]
impl RoleStore for MemoryStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Role>> {
        Ok(self.state.read().await.roles.get(&id).cloned())
    }

    async fn find_by_name(&self, name: &str) -> AppResult<Option<Role>> {
        let state = self.state.read().await;
        Ok(state.roles.values().find(|r| r.name == name).cloned())
    }

    async fn list(&self) -> AppResult<Vec<Role>> {
        let state = self.state.read().await;
        let mut roles: Vec<Role> = state.roles.values().cloned().collect();
        roles.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(roles)
    }

    async fn create(&self, data: &CreateRole) -> AppResult<Role> {
        let mut state = self.state.write().await;
        if state.roles.values().any(|r| r.name == data.name) {
            return Err(AppError::conflict("Role with this name already exists"));
        }

        let now = Utc::now();
        let role = Role {
            id: Uuid::now_v7(),
            name: data.name.clone(),
            description: data.description.clone(),
            permissions: data.permissions.clone(),
            created_at: now,
            updated_at: now,
        };
        state.roles.insert(role.id, role.clone());
        Ok(role)
    }

    async fn update(&self, id: Uuid, data: &UpdateRole) -> AppResult<Role> {
        let mut state = self.state.write().await;
        if let Some(name) = &data.name {
            if state.roles.values().any(|r| r.id != id && &r.name == name) {
                return Err(AppError::conflict("Role with this name already exists"));
            }
        }

        let role = state.roles.get_mut(&id).ok_or_else(|| role_not_found(id))?;
        if let Some(name) = &data.name {
            role.name = name.clone();
        }
        if let Some(description) = &data.description {
            role.description = Some(description.clone());
        }
        if let Some(permissions) = &data.permissions {
            role.permissions = permissions.clone();
        }
        role.updated_at = Utc::now();
        Ok(role.clone())
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let mut state = self.state.write().await;
        if state.assignments.iter().any(|a| a.role_id == id) {
            return Err(AppError::database(format!(
                "Role {id} is still referenced by user assignments"
            )));
        }
        Ok(state.roles.remove(&id).is_some())
    }

    async fn add_permission(&self, id: Uuid, permission: &str) -> AppResult<PermissionSet> {
        let mut state = self.state.write().await;
        let role = state.roles.get_mut(&id).ok_or_else(|| role_not_found(id))?;
        if role.permissions.insert(permission) {
            role.updated_at = Utc::now();
        }
        Ok(role.permissions.clone())
    }

    async fn remove_permission(&self, id: Uuid, permission: &str) -> AppResult<PermissionSet> {
        let mut state = self.state.write().await;
        let role = state.roles.get_mut(&id).ok_or_else(|| role_not_found(id))?;
        if role.permissions.remove(permission) {
            role.updated_at = Utc::now();
        }
        Ok(role.permissions.clone())
    }
}

#[async_trait]
impl AssignmentStore for MemoryStore {
    async fn insert(&self, assignment: &UserRoleAssignment) -> AppResult<()> {
        let mut state = self.state.write().await;
        if !state.users.contains_key(&assignment.user_id) {
            return Err(AppError::database("Assignment references a missing user"));
        }
        if !state.roles.contains_key(&assignment.role_id) {
            return Err(AppError::database("Assignment references a missing role"));
        }
        if state
            .assignments
            .iter()
            .any(|a| a.user_id == assignment.user_id && a.role_id == assignment.role_id)
        {
            return Err(AppError::conflict("User already has this role"));
        }
        state.assignments.push(assignment.clone());
        Ok(())
    }

    async fn delete(&self, user_id: Uuid, role_id: Uuid) -> AppResult<bool> {
        let mut state = self.state.write().await;
        let before = state.assignments.len();
        state
            .assignments
            .retain(|a| !(a.user_id == user_id && a.role_id == role_id));
        Ok(state.assignments.len() < before)
    }

    async fn delete_for_role(&self, role_id: Uuid) -> AppResult<u64> {
        let mut state = self.state.write().await;
        let before = state.assignments.len();
        state.assignments.retain(|a| a.role_id != role_id);
        Ok((before - state.assignments.len()) as u64)
    }

    async fn delete_for_user(&self, user_id: Uuid) -> AppResult<u64> {
        let mut state = self.state.write().await;
        let before = state.assignments.len();
        state.assignments.retain(|a| a.user_id != user_id);
        Ok((before - state.assignments.len()) as u64)
    }

    async fn roles_for_user(&self, user_id: Uuid) -> AppResult<Vec<RoleSummary>> {
        let state = self.state.read().await;
        let mut roles: Vec<RoleSummary> = state
            .assignments
            .iter()
            .filter(|a| a.user_id == user_id)
            .filter_map(|a| state.roles.get(&a.role_id))
            .map(Role::summary)
            .collect();
        roles.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(roles)
    }

    async fn users_with_role(&self, role_id: Uuid) -> AppResult<Vec<RoleHolder>> {
        let state = self.state.read().await;
        let mut holders: Vec<RoleHolder> = state
            .assignments
            .iter()
            .filter(|a| a.role_id == role_id)
            .filter_map(|a| state.users.get(&a.user_id))
            .map(|u| RoleHolder {
                id: u.id,
                username: u.username.clone(),
                email: u.email.clone(),
                first_name: u.first_name.clone(),
                last_name: u.last_name.clone(),
            })
            .collect();
        holders.sort_by(|a, b| a.username.cmp(&b.username));
        Ok(holders)
    }

    async fn count_holders(&self, role_id: Uuid) -> AppResult<u64> {
        let state = self.state.read().await;
        Ok(state.assignments.iter().filter(|a| a.role_id == role_id).count() as u64)
    }

    async fn delete_unless_last_holder(&self, user_id: Uuid, role_id: Uuid) -> AppResult<bool> {
        let mut state = self.state.write().await;
        let holders = state.assignments.iter().filter(|a| a.role_id == role_id).count();
        let held = state
            .assignments
            .iter()
            .any(|a| a.user_id == user_id && a.role_id == role_id);
        if !held || holders <= 1 {
            return Ok(false);
        }
        state
            .assignments
            .retain(|a| !(a.user_id == user_id && a.role_id == role_id));
        Ok(true)
    }

    async fn find(&self, user_id: Uuid, role_id: Uuid) -> AppResult<Option<UserRoleAssignment>> {
        let state = self.state.read().await;
        Ok(state
            .assignments
            .iter()
            .find(|a| a.user_id == user_id && a.role_id == role_id)
            .cloned())
    }
}

#[async_trait]
impl AlumniStore for MemoryStore {
    async fn list(&self, page: PageRequest) -> AppResult<PageResponse<Alumni>> {
        let state = self.state.read().await;
        let mut records: Vec<Alumni> = state.alumni.values().cloned().collect();
        records.sort_by(|a, b| {
            (a.last_name.as_str(), a.first_name.as_str())
                .cmp(&(b.last_name.as_str(), b.first_name.as_str()))
        });
        let total = records.len() as u64;
        let items = records
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.limit() as usize)
            .collect();
        Ok(PageResponse::new(items, page, total))
    }

    async fn search(&self, query: &str) -> AppResult<Vec<Alumni>> {
        let state = self.state.read().await;
        let mut records: Vec<Alumni> = state
            .alumni
            .values()
            .filter(|a| a.matches(query))
            .cloned()
            .collect();
        records.sort_by(|a, b| a.last_name.cmp(&b.last_name));
        Ok(records)
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Alumni>> {
        Ok(self.state.read().await.alumni.get(&id).cloned())
    }

    async fn create(&self, fields: &AlumniFields) -> AppResult<Alumni> {
        let mut state = self.state.write().await;
        if state.alumni.values().any(|a| a.email == fields.email) {
            return Err(AppError::conflict("Alumni with this email already exists"));
        }
        let record = fields.clone().into_record();
        state.alumni.insert(record.id, record.clone());
        Ok(record)
    }

    async fn update(&self, id: Uuid, fields: &AlumniFields) -> AppResult<Alumni> {
        let mut state = self.state.write().await;
        if state
            .alumni
            .values()
            .any(|a| a.id != id && a.email == fields.email)
        {
            return Err(AppError::conflict("Alumni with this email already exists"));
        }
        let record = state
            .alumni
            .get_mut(&id)
            .ok_or_else(|| AppError::not_found(format!("Alumni {id} not found")))?;
        record.apply(fields.clone());
        Ok(record.clone())
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        Ok(self.state.write().await.alumni.remove(&id).is_some())
    }

    async fn count_by_year(&self) -> AppResult<Vec<AlumniYearCount>> {
        let state = self.state.read().await;
        let mut years: BTreeMap<i32, i64> = BTreeMap::new();
        for record in state.alumni.values() {
            *years.entry(record.created_at.year()).or_default() += 1;
        }
        Ok(years
            .into_iter()
            .rev()
            .map(|(year, total_alumni)| AlumniYearCount { year, total_alumni })
            .collect())
    }
}
