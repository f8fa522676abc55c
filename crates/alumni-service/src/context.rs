//! Request context carrying the authenticated caller.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use alumni_auth::jwt::Claims;

/// Who is acting on the current request.
///
/// Built from verified token claims by the API layer and passed into
/// service methods that record provenance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestContext {
    pub user_id: Uuid,
    pub username: String,
    /// Role names from the token, possibly stale.
    pub roles: Vec<String>,
    pub permissions: Vec<String>,
    pub request_time: DateTime<Utc>,
}

impl RequestContext {
    pub fn from_claims(claims: &Claims) -> Self {
        Self {
            user_id: claims.sub,
            username: claims.username.clone(),
            roles: claims.roles.clone(),
            permissions: claims.permissions.clone(),
            request_time: Utc::now(),
        }
    }
}
