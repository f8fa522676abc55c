//! Role management handlers. Mounted behind the admin guard.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;

use alumni_entity::role::Role;
use alumni_entity::user::RoleHolder;

use crate::dto::request::{CreateRoleRequest, PermissionRequest, UpdateRoleRequest};
use crate::dto::response::{ApiResponse, PermissionsResponse};
use crate::error::ApiError;
use crate::extractors::{PathId, ValidJson};
use crate::state::AppState;

/// POST /api/roles
pub async fn create_role(
    State(state): State<AppState>,
    ValidJson(req): ValidJson<CreateRoleRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Role>>), ApiError> {
    let role = state
        .roles
        .create_role(&req.name, req.description, req.permissions)
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message("Role created successfully", role)),
    ))
}

/// GET /api/roles
pub async fn list_roles(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<Role>>>, ApiError> {
    Ok(Json(ApiResponse::ok(state.roles.list_roles().await?)))
}

/// GET /api/roles/{id}
pub async fn get_role(
    State(state): State<AppState>,
    PathId(id): PathId,
) -> Result<Json<ApiResponse<Role>>, ApiError> {
    Ok(Json(ApiResponse::ok(state.roles.require_role(id).await?)))
}

/// PUT /api/roles/{id}
pub async fn update_role(
    State(state): State<AppState>,
    PathId(id): PathId,
    ValidJson(req): ValidJson<UpdateRoleRequest>,
) -> Result<Json<ApiResponse<Role>>, ApiError> {
    let role = state.roles.update_role(id, req.into()).await?;
    Ok(Json(ApiResponse::with_message("Role updated successfully", role)))
}

/// DELETE /api/roles/{id}
pub async fn delete_role(
    State(state): State<AppState>,
    PathId(id): PathId,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    state.roles.delete_role(id).await?;
    Ok(Json(ApiResponse::message("Role deleted successfully")))
}

/// POST /api/roles/{id}/add-permission
pub async fn add_permission(
    State(state): State<AppState>,
    PathId(id): PathId,
    ValidJson(req): ValidJson<PermissionRequest>,
) -> Result<Json<ApiResponse<PermissionsResponse>>, ApiError> {
    let set = state.roles.add_permission(id, &req.permission).await?;
    Ok(Json(ApiResponse::with_message(
        "Permission added successfully",
        PermissionsResponse {
            permissions: set.into_vec(),
        },
    )))
}

/// POST /api/roles/{id}/remove-permission
pub async fn remove_permission(
    State(state): State<AppState>,
    PathId(id): PathId,
    ValidJson(req): ValidJson<PermissionRequest>,
) -> Result<Json<ApiResponse<PermissionsResponse>>, ApiError> {
    let set = state.roles.remove_permission(id, &req.permission).await?;
    Ok(Json(ApiResponse::with_message(
        "Permission removed successfully",
        PermissionsResponse {
            permissions: set.into_vec(),
        },
    )))
}

/// GET /api/roles/{id}/users
pub async fn role_users(
    State(state): State<AppState>,
    PathId(id): PathId,
) -> Result<Json<ApiResponse<Vec<RoleHolder>>>, ApiError> {
    Ok(Json(ApiResponse::ok(state.roles.role_users(id).await?)))
}
