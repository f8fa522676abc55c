//! Auth handlers: register, login, verify, profile and password change.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;

use alumni_auth::jwt::Claims;
use alumni_core::error::AppError;
use alumni_entity::user::UserProfile;
use alumni_service::RegistrationOutcome;

use crate::dto::request::{
    ChangePasswordRequest, LoginRequest, RegisterRequest, UpdateProfileRequest,
};
use crate::dto::response::{ApiResponse, LoginResponse};
use crate::error::ApiError;
use crate::extractors::{AuthUser, ValidJson};
use crate::state::AppState;

/// POST /api/auth/register
pub async fn register(
    State(state): State<AppState>,
    ValidJson(req): ValidJson<RegisterRequest>,
) -> Result<(StatusCode, Json<ApiResponse<RegistrationOutcome>>), ApiError> {
    let outcome = state.registration.register(req.into()).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message(
            "User registered successfully",
            outcome,
        )),
    ))
}

/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    ValidJson(req): ValidJson<LoginRequest>,
) -> Result<Json<ApiResponse<LoginResponse>>, ApiError> {
    let outcome = state
        .authenticator
        .login(&req.username, &req.password)
        .await?;

    Ok(Json(ApiResponse::with_message(
        "Login successful",
        LoginResponse {
            token: outcome.token,
            expires_at: outcome.expires_at,
            user: outcome.user,
        },
    )))
}

/// GET /api/auth/verify
pub async fn verify(auth: AuthUser) -> Json<ApiResponse<Claims>> {
    Json(ApiResponse::ok(auth.claims))
}

/// GET /api/auth/profile
pub async fn get_profile(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<UserProfile>>, ApiError> {
    let profile = state.credentials.get_profile(auth.user_id).await?;
    Ok(Json(ApiResponse::ok(profile)))
}

/// PUT /api/auth/profile
pub async fn update_profile(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidJson(req): ValidJson<UpdateProfileRequest>,
) -> Result<Json<ApiResponse<UserProfile>>, ApiError> {
    let profile = state
        .credentials
        .update_profile(auth.user_id, req.first_name, req.last_name, req.phone)
        .await?;
    Ok(Json(ApiResponse::with_message(
        "Profile updated successfully",
        profile,
    )))
}

/// POST /api/auth/change-password
pub async fn change_password(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidJson(req): ValidJson<ChangePasswordRequest>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    if req.new_password != req.confirm_password {
        return Err(AppError::validation("Passwords do not match").into());
    }
    state
        .credentials
        .change_password(auth.user_id, &req.old_password, &req.new_password)
        .await?;
    Ok(Json(ApiResponse::message("Password changed successfully")))
}
