//! Development-only handlers. Compiled with the `dev-endpoints` feature and
//! mounted only in the development environment.

use axum::Json;
use axum::extract::{Path, State};

use alumni_service::devtools::{RawUser, SeededAccount};

use crate::dto::response::ApiResponse;
use crate::error::ApiError;
use crate::state::AppState;

/// POST /api/debug/seed-demo-users
pub async fn seed_demo_users(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<SeededAccount>>>, ApiError> {
    let seeded = state.devtools.seed_demo_users().await?;
    Ok(Json(ApiResponse::with_message("Demo users ready", seeded)))
}

/// GET /api/debug/users
pub async fn list_users(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<RawUser>>>, ApiError> {
    Ok(Json(ApiResponse::ok(state.devtools.list_raw_users().await?)))
}

/// GET /api/debug/users/{username}
pub async fn inspect_user(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Result<Json<ApiResponse<RawUser>>, ApiError> {
    Ok(Json(ApiResponse::ok(
        state.devtools.inspect_user(&username).await?,
    )))
}
