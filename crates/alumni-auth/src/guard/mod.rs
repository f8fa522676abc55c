//! Per-route access requirements evaluated against token claims.
//!
//! A requirement may name a set of roles (any one suffices) and a single
//! permission (exact membership). The role check runs first.

use thiserror::Error;

use alumni_core::error::AppError;

use crate::jwt::Claims;

/// Why a request with valid claims was refused.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccessDenied {
    /// None of the required roles is held.
    #[error("Insufficient role: requires one of [{}]", .required.join(", "))]
    InsufficientRole {
        required: Vec<String>,
        held: Vec<String>,
    },
    /// The required permission is not in the claims' permission set.
    #[error("Permission denied: requires '{required}'")]
    PermissionDenied { required: String },
}

impl AccessDenied {
    /// Stable code reported to clients.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InsufficientRole { .. } => "INSUFFICIENT_ROLE",
            Self::PermissionDenied { .. } => "PERMISSION_DENIED",
        }
    }
}

impl From<AccessDenied> for AppError {
    fn from(denied: AccessDenied) -> Self {
        let code = denied.code();
        AppError::authorization(denied.to_string()).with_code(code)
    }
}

/// Roles and/or permission a route demands.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccessRequirement {
    roles: Vec<String>,
    permission: Option<String>,
}

impl AccessRequirement {
    /// Satisfied by holding any one of `roles`.
    pub fn any_role<I, S>(roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            roles: roles.into_iter().map(Into::into).collect(),
            permission: None,
        }
    }

    /// Satisfied by holding `permission` exactly.
    pub fn permission(permission: impl Into<String>) -> Self {
        Self {
            roles: Vec::new(),
            permission: Some(permission.into()),
        }
    }

    /// Additionally require `permission`.
    pub fn and_permission(mut self, permission: impl Into<String>) -> Self {
        self.permission = Some(permission.into());
        self
    }

    /// Evaluate against decoded claims.
    pub fn check(&self, claims: &Claims) -> Result<(), AccessDenied> {
        if !self.roles.is_empty() && !claims.has_any_role(&self.roles) {
            return Err(AccessDenied::InsufficientRole {
                required: self.roles.clone(),
                held: claims.roles.clone(),
            });
        }
        if let Some(permission) = &self.permission {
            if !claims.has_permission(permission) {
                return Err(AccessDenied::PermissionDenied {
                    required: permission.clone(),
                });
            }
        }
        Ok(())
    }
}
