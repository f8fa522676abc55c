//! Role repository implementation.
//!
//! Permission sets live in `role_permissions`, one row per (role, permission)
//! with a composite primary key, so adding or removing a single permission is
//! one atomic statement and never a read-modify-write of the whole set.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgConnection, PgPool};
use uuid::Uuid;

use alumni_core::error::{AppError, ErrorKind};
use alumni_core::result::AppResult;
use alumni_entity::role::{CreateRole, PermissionSet, Role, UpdateRole};

use crate::store::RoleStore;

#[derive(Debug, FromRow)]
struct RoleRow {
    id: Uuid,
    name: String,
    description: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl RoleRow {
    fn with_permissions(self, permissions: PermissionSet) -> Role {
        Role {
            id: self.id,
            name: self.name,
            description: self.description,
            permissions,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

fn map_name_conflict(e: sqlx::Error, action: &'static str) -> AppError {
    match e {
        sqlx::Error::Database(ref db_err) if db_err.constraint() == Some("roles_name_key") => {
            AppError::conflict("Role with this name already exists")
        }
        _ => AppError::with_source(ErrorKind::Database, action, e),
    }
}

async fn load_permissions(conn: &mut PgConnection, role_id: Uuid) -> AppResult<PermissionSet> {
    let permissions: Vec<String> = sqlx::query_scalar(
        "SELECT permission FROM role_permissions WHERE role_id = $1 ORDER BY permission",
    )
    .bind(role_id)
    .fetch_all(conn)
    .await
    .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to load permissions", e))?;

    Ok(permissions.into_iter().collect())
}

async fn insert_permissions(
    conn: &mut PgConnection,
    role_id: Uuid,
    permissions: &PermissionSet,
) -> AppResult<()> {
    if permissions.is_empty() {
        return Ok(());
    }
    let values: Vec<String> = permissions.clone().into_vec();
    sqlx::query(
        "INSERT INTO role_permissions (role_id, permission) \
         SELECT $1, UNNEST($2::text[]) \
         ON CONFLICT DO NOTHING",
    )
    .bind(role_id)
    .bind(&values)
    .execute(conn)
    .await
    .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to store permissions", e))?;
    Ok(())
}

/// Repository for the `roles` and `role_permissions` tables.
#[derive(Debug, Clone)]
pub struct PgRoleRepository {
    pool: PgPool,
}

impl PgRoleRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn hydrate(&self, row: Option<RoleRow>) -> AppResult<Option<Role>> {
        let Some(row) = row else {
            return Ok(None);
        };
        let mut conn = self
            .pool
            .acquire()
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to acquire connection", e))?;
        let permissions = load_permissions(&mut conn, row.id).await?;
        Ok(Some(row.with_permissions(permissions)))
    }

    async fn exists(&self, id: Uuid) -> AppResult<bool> {
        sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM roles WHERE id = $1)")
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to check role", e))
    }

    async fn current_permissions(&self, id: Uuid) -> AppResult<PermissionSet> {
        let mut conn = self
            .pool
            .acquire()
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to acquire connection", e))?;
        load_permissions(&mut conn, id).await
    }
}

#[async_trait]
impl RoleStore for PgRoleRepository {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Role>> {
        let row = sqlx::query_as::<_, RoleRow>("SELECT * FROM roles WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find role", e))?;
        self.hydrate(row).await
    }

    async fn find_by_name(&self, name: &str) -> AppResult<Option<Role>> {
        let row = sqlx::query_as::<_, RoleRow>("SELECT * FROM roles WHERE name = $1")
            .bind(name)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find role by name", e)
            })?;
        self.hydrate(row).await
    }

    async fn list(&self) -> AppResult<Vec<Role>> {
        let rows = sqlx::query_as::<_, RoleRow>("SELECT * FROM roles ORDER BY name")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list roles", e))?;

        let pairs: Vec<(Uuid, String)> =
            sqlx::query_as("SELECT role_id, permission FROM role_permissions")
                .fetch_all(&self.pool)
                .await
                .map_err(|e| {
                    AppError::with_source(ErrorKind::Database, "Failed to list permissions", e)
                })?;

        let mut grouped: HashMap<Uuid, PermissionSet> = HashMap::new();
        for (role_id, permission) in pairs {
            grouped.entry(role_id).or_default().insert(permission);
        }

        Ok(rows
            .into_iter()
            .map(|row| {
                let permissions = grouped.remove(&row.id).unwrap_or_default();
                row.with_permissions(permissions)
            })
            .collect())
    }

    async fn create(&self, data: &CreateRole) -> AppResult<Role> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to begin transaction", e))?;

        let row = sqlx::query_as::<_, RoleRow>(
            "INSERT INTO roles (id, name, description) VALUES ($1, $2, $3) RETURNING *",
        )
        .bind(Uuid::now_v7())
        .bind(&data.name)
        .bind(&data.description)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| map_name_conflict(e, "Failed to create role"))?;

        insert_permissions(&mut tx, row.id, &data.permissions).await?;
        let permissions = load_permissions(&mut tx, row.id).await?;

        tx.commit()
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to commit role", e))?;

        Ok(row.with_permissions(permissions))
    }

    async fn update(&self, id: Uuid, data: &UpdateRole) -> AppResult<Role> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to begin transaction", e))?;

        let row = sqlx::query_as::<_, RoleRow>(
            "UPDATE roles SET name = COALESCE($2, name), \
                              description = COALESCE($3, description), \
                              updated_at = NOW() \
             WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(&data.name)
        .bind(&data.description)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| map_name_conflict(e, "Failed to update role"))?
        .ok_or_else(|| AppError::not_found(format!("Role {id} not found")))?;

        if let Some(permissions) = &data.permissions {
            sqlx::query("DELETE FROM role_permissions WHERE role_id = $1")
                .bind(id)
                .execute(&mut *tx)
                .await
                .map_err(|e| {
                    AppError::with_source(ErrorKind::Database, "Failed to replace permissions", e)
                })?;
            insert_permissions(&mut tx, id, permissions).await?;
        }
        let permissions = load_permissions(&mut tx, id).await?;

        tx.commit()
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to commit role", e))?;

        Ok(row.with_permissions(permissions))
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM roles WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to delete role", e))?;

        Ok(result.rows_affected() > 0)
    }

    async fn add_permission(&self, id: Uuid, permission: &str) -> AppResult<PermissionSet> {
        sqlx::query(
            "INSERT INTO role_permissions (role_id, permission) VALUES ($1, $2) \
             ON CONFLICT DO NOTHING",
        )
        .bind(id)
        .bind(permission)
        .execute(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err)
                if db_err.constraint() == Some("role_permissions_role_id_fkey") =>
            {
                AppError::not_found(format!("Role {id} not found"))
            }
            _ => AppError::with_source(ErrorKind::Database, "Failed to add permission", e),
        })?;

        self.current_permissions(id).await
    }

    async fn remove_permission(&self, id: Uuid, permission: &str) -> AppResult<PermissionSet> {
        if !self.exists(id).await? {
            return Err(AppError::not_found(format!("Role {id} not found")));
        }

        sqlx::query("DELETE FROM role_permissions WHERE role_id = $1 AND permission = $2")
            .bind(id)
            .bind(permission)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to remove permission", e)
            })?;

        self.current_permissions(id).await
    }
}
