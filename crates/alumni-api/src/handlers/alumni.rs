//! Alumni directory handlers.

use axum::Json;
use axum::extract::{Query, State};
use axum::http::StatusCode;

use alumni_core::types::PageResponse;
use alumni_entity::alumni::{Alumni, AlumniYearCount};

use crate::dto::request::{AlumniRequest, SearchQuery};
use crate::dto::response::ApiResponse;
use crate::error::ApiError;
use crate::extractors::{PaginationParams, PathId, ValidJson};
use crate::state::AppState;

/// GET /api/alumni
pub async fn list_alumni(
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> Result<Json<ApiResponse<PageResponse<Alumni>>>, ApiError> {
    let page = state.alumni.list(params.into_page_request()).await?;
    Ok(Json(ApiResponse::ok(page)))
}

/// GET /api/alumni/search?q=
pub async fn search_alumni(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<ApiResponse<Vec<Alumni>>>, ApiError> {
    Ok(Json(ApiResponse::ok(state.alumni.search(&query.q).await?)))
}

/// GET /api/alumni/statistics
pub async fn alumni_statistics(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<AlumniYearCount>>>, ApiError> {
    let stats = state.alumni.statistics().await?;
    Ok(Json(ApiResponse::with_message(
        "Statistics retrieved successfully",
        stats,
    )))
}

/// GET /api/alumni/{id}
pub async fn get_alumni(
    State(state): State<AppState>,
    PathId(id): PathId,
) -> Result<Json<ApiResponse<Alumni>>, ApiError> {
    Ok(Json(ApiResponse::ok(state.alumni.get(id).await?)))
}

/// POST /api/alumni
pub async fn create_alumni(
    State(state): State<AppState>,
    ValidJson(req): ValidJson<AlumniRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Alumni>>), ApiError> {
    let record = state.alumni.create(req.into()).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message(
            "Alumni created successfully",
            record,
        )),
    ))
}

/// PUT /api/alumni/{id}
pub async fn update_alumni(
    State(state): State<AppState>,
    PathId(id): PathId,
    ValidJson(req): ValidJson<AlumniRequest>,
) -> Result<Json<ApiResponse<Alumni>>, ApiError> {
    let record = state.alumni.update(id, req.into()).await?;
    Ok(Json(ApiResponse::with_message(
        "Alumni updated successfully",
        record,
    )))
}

/// DELETE /api/alumni/{id}
pub async fn delete_alumni(
    State(state): State<AppState>,
    PathId(id): PathId,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    state.alumni.delete(id).await?;
    Ok(Json(ApiResponse::message("Alumni deleted successfully")))
}
