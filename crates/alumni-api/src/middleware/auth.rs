//! Bearer-token authentication middleware.

use axum::extract::{Request, State};
use axum::http::header::AUTHORIZATION;
use axum::middleware::Next;
use axum::response::Response;

use alumni_core::error::AppError;

use crate::error::ApiError;
use crate::state::AppState;

/// Rejects requests without a valid session token and stores the decoded
/// claims in the request extensions for the handlers and guards behind it.
///
/// The `Bearer ` prefix is optional.
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.strip_prefix("Bearer ").unwrap_or(v).trim())
        .filter(|t| !t.is_empty())
        .ok_or_else(|| AppError::authentication("No token provided").with_code("NO_TOKEN"))?;

    let claims = state.authenticator.verify(token).map_err(|e| {
        tracing::debug!(error = %e.message, "Token rejected");
        AppError::authentication("Invalid or expired token").with_code("INVALID_TOKEN")
    })?;

    request.extensions_mut().insert(claims);
    Ok(next.run(request).await)
}
