//! Store traits and the bundle handed to services.
//!
//! Every trait is object-safe so that services hold `Arc<dyn ...>` handles
//! and never learn which backend they run against.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;
use uuid::Uuid;

use alumni_core::config::{DatabaseConfig, StoreProvider};
use alumni_core::result::AppResult;
use alumni_core::types::{PageRequest, PageResponse};
use alumni_entity::alumni::{Alumni, AlumniFields, AlumniYearCount};
use alumni_entity::assignment::UserRoleAssignment;
use alumni_entity::role::{CreateRole, PermissionSet, Role, RoleSummary, UpdateRole};
use alumni_entity::user::{CreateUser, RoleHolder, UpdateUser, User};

use crate::connection::DatabasePool;
use crate::memory::MemoryStore;
use crate::migration::run_migrations;
use crate::repositories::{
    PgAlumniRepository, PgAssignmentRepository, PgRoleRepository, PgUserRepository,
};

/// Persisted user records.
#[async_trait]
pub trait UserStore: Send + Sync + std::fmt::Debug + 'static {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>>;

    async fn find_by_username(&self, username: &str) -> AppResult<Option<User>>;

    /// First user whose username or email matches either argument.
    async fn find_by_username_or_email(
        &self,
        username: &str,
        email: &str,
    ) -> AppResult<Option<User>>;

    /// Users ordered by creation time, newest first.
    async fn list(&self) -> AppResult<Vec<User>>;

    /// Insert a user. A duplicate username or email is a `Conflict`.
    async fn create(&self, data: &CreateUser) -> AppResult<User>;

    /// Apply a partial update. A missing user is `NotFound`.
    async fn update(&self, id: Uuid, data: &UpdateUser) -> AppResult<User>;

    /// Replace the stored hash. A missing user is `NotFound`.
    async fn update_password(&self, id: Uuid, password_hash: &str) -> AppResult<()>;

    /// Returns `false` if no such user existed.
    async fn delete(&self, id: Uuid) -> AppResult<bool>;
}

/// Roles and their permission sets.
#[async_trait]
pub trait RoleStore: Send + Sync + std::fmt::Debug + 'static {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Role>>;

    async fn find_by_name(&self, name: &str) -> AppResult<Option<Role>>;

    /// All roles ordered by name.
    async fn list(&self) -> AppResult<Vec<Role>>;

    /// Insert a role. A duplicate name is a `Conflict`.
    async fn create(&self, data: &CreateRole) -> AppResult<Role>;

    /// Apply a partial update. A present permission set replaces the
    /// current one. A missing role is `NotFound`.
    async fn update(&self, id: Uuid, data: &UpdateRole) -> AppResult<Role>;

    /// Delete the role row only. Returns `false` if it did not exist.
    async fn delete(&self, id: Uuid) -> AppResult<bool>;

    /// Add one permission and return the resulting set. Already present is a no-op.
    async fn add_permission(&self, id: Uuid, permission: &str) -> AppResult<PermissionSet>;

    /// Remove one permission and return the resulting set. Absent is a no-op.
    async fn remove_permission(&self, id: Uuid, permission: &str) -> AppResult<PermissionSet>;
}

/// The user-role association ledger.
#[async_trait]
pub trait AssignmentStore: Send + Sync + std::fmt::Debug + 'static {
    /// Record an assignment. An existing (user, role) pair is a `Conflict`.
    async fn insert(&self, assignment: &UserRoleAssignment) -> AppResult<()>;

    /// Returns `false` if the pair did not exist.
    async fn delete(&self, user_id: Uuid, role_id: Uuid) -> AppResult<bool>;

    /// Remove every assignment of a role. Returns how many were removed.
    async fn delete_for_role(&self, role_id: Uuid) -> AppResult<u64>;

    /// Remove every assignment of a user. Returns how many were removed.
    async fn delete_for_user(&self, user_id: Uuid) -> AppResult<u64>;

    /// Roles held by a user, ordered by name, without permissions.
    async fn roles_for_user(&self, user_id: Uuid) -> AppResult<Vec<RoleSummary>>;

    /// Users holding a role, ordered by username.
    async fn users_with_role(&self, role_id: Uuid) -> AppResult<Vec<RoleHolder>>;

    /// Number of users holding a role.
    async fn count_holders(&self, role_id: Uuid) -> AppResult<u64>;

    /// Remove the pair only while another user still holds the role.
    ///
    /// The holder count and the delete happen as one step, so two callers
    /// cannot both pass the check and strip the last holder between them.
    /// Returns `false` and leaves the ledger untouched when the user is the
    /// only holder or does not hold the role.
    async fn delete_unless_last_holder(&self, user_id: Uuid, role_id: Uuid) -> AppResult<bool>;

    async fn find(&self, user_id: Uuid, role_id: Uuid) -> AppResult<Option<UserRoleAssignment>>;
}

/// The alumni directory.
#[async_trait]
pub trait AlumniStore: Send + Sync + std::fmt::Debug + 'static {
    /// A page of records ordered by last name, then first name.
    async fn list(&self, page: PageRequest) -> AppResult<PageResponse<Alumni>>;

    /// Records whose name, email or company contains `query`, case-insensitively.
    async fn search(&self, query: &str) -> AppResult<Vec<Alumni>>;

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Alumni>>;

    /// Insert a record. A duplicate email is a `Conflict`.
    async fn create(&self, fields: &AlumniFields) -> AppResult<Alumni>;

    /// Overwrite every editable field. A missing record is `NotFound`.
    async fn update(&self, id: Uuid, fields: &AlumniFields) -> AppResult<Alumni>;

    async fn delete(&self, id: Uuid) -> AppResult<bool>;

    /// Record counts grouped by the year each record was created, newest first.
    async fn count_by_year(&self) -> AppResult<Vec<AlumniYearCount>>;
}

#[derive(Debug, Clone)]
enum Backend {
    Postgres(DatabasePool),
    Memory,
}

/// One handle per store, all backed by the same provider.
#[derive(Debug, Clone)]
pub struct Stores {
    pub users: Arc<dyn UserStore>,
    pub roles: Arc<dyn RoleStore>,
    pub assignments: Arc<dyn AssignmentStore>,
    pub alumni: Arc<dyn AlumniStore>,
    backend: Backend,
}

impl Stores {
    /// Build the stores selected by `config.provider`, connecting and
    /// migrating PostgreSQL when required.
    pub async fn connect(config: &DatabaseConfig) -> AppResult<Self> {
        match config.provider {
            StoreProvider::Postgres => {
                let db = DatabasePool::connect(config).await?;
                if config.run_migrations {
                    run_migrations(db.pool()).await?;
                }
                Ok(Self::postgres(db))
            }
            StoreProvider::Memory => {
                info!("Using in-memory store; data will not survive a restart");
                Ok(Self::memory(MemoryStore::with_builtin_roles()))
            }
        }
    }

    pub fn postgres(db: DatabasePool) -> Self {
        let pool = db.pool().clone();
        Self {
            users: Arc::new(PgUserRepository::new(pool.clone())),
            roles: Arc::new(PgRoleRepository::new(pool.clone())),
            assignments: Arc::new(PgAssignmentRepository::new(pool.clone())),
            alumni: Arc::new(PgAlumniRepository::new(pool)),
            backend: Backend::Postgres(db),
        }
    }

    /// All four stores share the one in-memory state.
    pub fn memory(store: MemoryStore) -> Self {
        Self {
            users: Arc::new(store.clone()),
            roles: Arc::new(store.clone()),
            assignments: Arc::new(store.clone()),
            alumni: Arc::new(store),
            backend: Backend::Memory,
        }
    }

    pub fn provider(&self) -> StoreProvider {
        match self.backend {
            Backend::Postgres(_) => StoreProvider::Postgres,
            Backend::Memory => StoreProvider::Memory,
        }
    }

    pub async fn health_check(&self) -> AppResult<()> {
        match &self.backend {
            Backend::Postgres(db) => db.health_check().await,
            Backend::Memory => Ok(()),
        }
    }

    pub async fn close(&self) {
        if let Backend::Postgres(db) = &self.backend {
            db.close().await;
        }
    }
}
