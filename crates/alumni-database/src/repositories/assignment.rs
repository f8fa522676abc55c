//! User-role assignment repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use alumni_core::error::{AppError, ErrorKind};
use alumni_core::result::AppResult;
use alumni_entity::assignment::UserRoleAssignment;
use alumni_entity::role::RoleSummary;
use alumni_entity::user::RoleHolder;

use crate::store::AssignmentStore;

/// Repository for the `user_roles` table.
#[derive(Debug, Clone)]
pub struct PgAssignmentRepository {
    pool: PgPool,
}

impl PgAssignmentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AssignmentStore for PgAssignmentRepository {
    async fn insert(&self, assignment: &UserRoleAssignment) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO user_roles (user_id, role_id, assigned_by, assigned_at) \
             VALUES ($1, $2, $3, $4)",
        )
        .bind(assignment.user_id)
        .bind(assignment.role_id)
        .bind(assignment.assigned_by)
        .bind(assignment.assigned_at)
        .execute(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err) if db_err.constraint() == Some("user_roles_pkey") => {
                AppError::conflict("User already has this role")
            }
            _ => AppError::with_source(ErrorKind::Database, "Failed to assign role", e),
        })?;
        Ok(())
    }

    async fn delete(&self, user_id: Uuid, role_id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM user_roles WHERE user_id = $1 AND role_id = $2")
            .bind(user_id)
            .bind(role_id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to remove role", e))?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_for_role(&self, role_id: Uuid) -> AppResult<u64> {
        let result = sqlx::query("DELETE FROM user_roles WHERE role_id = $1")
            .bind(role_id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to clear role assignments", e)
            })?;

        Ok(result.rows_affected())
    }

    async fn delete_for_user(&self, user_id: Uuid) -> AppResult<u64> {
        let result = sqlx::query("DELETE FROM user_roles WHERE user_id = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to clear user assignments", e)
            })?;

        Ok(result.rows_affected())
    }

    async fn roles_for_user(&self, user_id: Uuid) -> AppResult<Vec<RoleSummary>> {
        sqlx::query_as::<_, RoleSummary>(
            "SELECT r.id, r.name, r.description \
             FROM roles r JOIN user_roles ur ON ur.role_id = r.id \
             WHERE ur.user_id = $1 \
             ORDER BY r.name",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to load user roles", e))
    }

    async fn users_with_role(&self, role_id: Uuid) -> AppResult<Vec<RoleHolder>> {
        sqlx::query_as::<_, RoleHolder>(
            "SELECT u.id, u.username, u.email, u.first_name, u.last_name \
             FROM users u JOIN user_roles ur ON ur.user_id = u.id \
             WHERE ur.role_id = $1 \
             ORDER BY u.username",
        )
        .bind(role_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to load role holders", e))
    }

    async fn count_holders(&self, role_id: Uuid) -> AppResult<u64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM user_roles WHERE role_id = $1")
            .bind(role_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to count role holders", e)
            })?;
        Ok(count as u64)
    }

    async fn delete_unless_last_holder(&self, user_id: Uuid, role_id: Uuid) -> AppResult<bool> {
        let fail = |e: sqlx::Error| {
            AppError::with_source(ErrorKind::Database, "Failed to remove role", e)
        };
        let mut tx = self.pool.begin().await.map_err(fail)?;

        // Concurrent removals of the same role queue up on the role row, so
        // each one counts holders after the previous one has committed.
        let locked: Option<Uuid> = sqlx::query_scalar("SELECT id FROM roles WHERE id = $1 FOR UPDATE")
            .bind(role_id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(fail)?;
        if locked.is_none() {
            return Ok(false);
        }

        let result = sqlx::query(
            "DELETE FROM user_roles WHERE user_id = $1 AND role_id = $2 \
             AND (SELECT COUNT(*) FROM user_roles WHERE role_id = $2) > 1",
        )
        .bind(user_id)
        .bind(role_id)
        .execute(&mut *tx)
        .await
        .map_err(fail)?;

        tx.commit().await.map_err(fail)?;
        Ok(result.rows_affected() > 0)
    }

    async fn find(&self, user_id: Uuid, role_id: Uuid) -> AppResult<Option<UserRoleAssignment>> {
        sqlx::query_as::<_, UserRoleAssignment>(
            "SELECT * FROM user_roles WHERE user_id = $1 AND role_id = $2",
        )
        .bind(user_id)
        .bind(role_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find assignment", e))
    }
}
