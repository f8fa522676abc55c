//! User administration handlers. Mounted behind the staff guard; role
//! assignment routes add the admin guard.

use axum::Json;
use axum::extract::State;

use alumni_entity::assignment::UserRoleAssignment;
use alumni_entity::role::RoleSummary;
use alumni_entity::user::{UserProfile, UserSummary};
use alumni_service::UserDetail;

use crate::dto::request::{RoleAssignmentRequest, UpdateUserRequest};
use crate::dto::response::ApiResponse;
use crate::error::ApiError;
use crate::extractors::{AuthUser, PathId, ValidJson};
use crate::state::AppState;

/// GET /api/users
pub async fn list_users(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<UserSummary>>>, ApiError> {
    Ok(Json(ApiResponse::ok(state.users.list_users().await?)))
}

/// GET /api/users/{id}
pub async fn get_user(
    State(state): State<AppState>,
    PathId(id): PathId,
) -> Result<Json<ApiResponse<UserDetail>>, ApiError> {
    Ok(Json(ApiResponse::ok(state.users.get_user(id).await?)))
}

/// PUT /api/users/{id}
pub async fn update_user(
    State(state): State<AppState>,
    PathId(id): PathId,
    ValidJson(req): ValidJson<UpdateUserRequest>,
) -> Result<Json<ApiResponse<UserProfile>>, ApiError> {
    let profile = state.users.update_user(id, req.into()).await?;
    Ok(Json(ApiResponse::with_message(
        "User updated successfully",
        profile,
    )))
}

/// DELETE /api/users/{id}
pub async fn delete_user(
    State(state): State<AppState>,
    PathId(id): PathId,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    state.users.delete_user(id).await?;
    Ok(Json(ApiResponse::message("User deleted successfully")))
}

/// GET /api/users/{id}/roles
pub async fn user_roles(
    State(state): State<AppState>,
    PathId(id): PathId,
) -> Result<Json<ApiResponse<Vec<RoleSummary>>>, ApiError> {
    Ok(Json(ApiResponse::ok(state.users.user_roles(id).await?)))
}

/// POST /api/users/{id}/assign-role
pub async fn assign_role(
    State(state): State<AppState>,
    auth: AuthUser,
    PathId(id): PathId,
    ValidJson(req): ValidJson<RoleAssignmentRequest>,
) -> Result<Json<ApiResponse<UserRoleAssignment>>, ApiError> {
    let assignment = state
        .ledger
        .assign_role(id, req.role_id, Some(auth.user_id))
        .await?;
    Ok(Json(ApiResponse::with_message(
        "Role assigned successfully",
        assignment,
    )))
}

/// POST /api/users/{id}/remove-role
pub async fn remove_role(
    State(state): State<AppState>,
    PathId(id): PathId,
    ValidJson(req): ValidJson<RoleAssignmentRequest>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    state.ledger.remove_role(id, req.role_id).await?;
    Ok(Json(ApiResponse::message("Role removed successfully")))
}
