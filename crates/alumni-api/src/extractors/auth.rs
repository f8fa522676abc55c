//! `AuthUser` extractor: the caller's identity as established by the auth
//! middleware.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use alumni_auth::jwt::Claims;
use alumni_core::error::AppError;
use alumni_service::context::RequestContext;

use crate::error::ApiError;

/// Authenticated caller available in handlers behind `require_auth`.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub context: RequestContext,
    pub claims: Claims,
}

impl std::ops::Deref for AuthUser {
    type Target = RequestContext;
    fn deref(&self) -> &Self::Target {
        &self.context
    }
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let claims = parts
            .extensions
            .get::<Claims>()
            .cloned()
            .ok_or_else(|| AppError::authentication("No token provided").with_code("NO_TOKEN"))?;

        Ok(Self {
            context: RequestContext::from_claims(&claims),
            claims,
        })
    }
}
