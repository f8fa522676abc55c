//! Assignment row model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// One (user, role) pair with its provenance. The pair is unique.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct UserRoleAssignment {
    pub user_id: Uuid,
    pub role_id: Uuid,
    /// The assigning user; `None` for self-registration and system seeding.
    pub assigned_by: Option<Uuid>,
    pub assigned_at: DateTime<Utc>,
}

impl UserRoleAssignment {
    pub fn new(user_id: Uuid, role_id: Uuid, assigned_by: Option<Uuid>) -> Self {
        Self {
            user_id,
            role_id,
            assigned_by,
            assigned_at: Utc::now(),
        }
    }

    /// Whether the assignment was made by the system rather than a user.
    pub fn is_system(&self) -> bool {
        self.assigned_by.is_none()
    }
}
