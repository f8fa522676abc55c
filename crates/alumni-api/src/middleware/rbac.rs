//! Role and permission guards for route groups.
//!
//! Layered with `from_fn_with_state`, using the requirement itself as the
//! middleware state. Must sit behind [`super::auth::require_auth`].

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;

use alumni_auth::guard::AccessRequirement;
use alumni_auth::jwt::Claims;
use alumni_core::error::AppError;

use crate::error::ApiError;

pub async fn require_access(
    State(requirement): State<AccessRequirement>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let claims = request
        .extensions()
        .get::<Claims>()
        .ok_or_else(|| AppError::authentication("No token provided").with_code("NO_TOKEN"))?;

    if let Err(denied) = requirement.check(claims) {
        tracing::info!(
            user_id = %claims.sub,
            path = %request.uri().path(),
            reason = %denied,
            "Access denied"
        );
        return Err(AppError::from(denied).into());
    }

    Ok(next.run(request).await)
}

/// `admin` only.
pub fn admin() -> AccessRequirement {
    AccessRequirement::any_role(["admin"])
}

/// `admin` or `manager`.
pub fn staff() -> AccessRequirement {
    AccessRequirement::any_role(["admin", "manager"])
}

/// Any role allowed to edit directory entries.
pub fn directory_editor() -> AccessRequirement {
    AccessRequirement::any_role(["admin", "manager", "alumni"])
}

pub fn manage_alumni() -> AccessRequirement {
    AccessRequirement::permission("manage_alumni")
}
