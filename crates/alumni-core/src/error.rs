//! Unified application error types.
//!
//! Every crate maps its internal failures into [`AppError`] so that errors
//! propagate through `?` unchanged until the HTTP boundary turns them into
//! a status code and a JSON body.

use std::fmt;
use thiserror::Error;

/// Error category. Each kind maps onto exactly one HTTP status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum ErrorKind {
    /// Malformed or out-of-range input.
    Validation,
    /// Bad credentials, or a missing, invalid or expired token.
    Authentication,
    /// The caller lacks the role or permission the operation requires.
    Authorization,
    /// The requested entity does not exist.
    NotFound,
    /// A unique field or pair already exists.
    Conflict,
    /// A protection rule refused the operation (built-in roles, last admin).
    Policy,
    /// Unexpected failure.
    Internal,
    /// The database driver failed.
    Database,
    /// Configuration could not be loaded or is inconsistent.
    Configuration,
    /// A value could not be serialized or deserialized.
    Serialization,
}

impl ErrorKind {
    /// Machine-readable code used when the error carries no specific one.
    pub fn default_code(self) -> &'static str {
        match self {
            Self::Validation => "VALIDATION_ERROR",
            Self::Authentication => "UNAUTHORIZED",
            Self::Authorization => "FORBIDDEN",
            Self::NotFound => "NOT_FOUND",
            Self::Conflict => "CONFLICT",
            Self::Policy => "POLICY_VIOLATION",
            Self::Internal | Self::Database | Self::Configuration | Self::Serialization => {
                "INTERNAL_ERROR"
            }
        }
    }

    /// Whether the kind represents a server-side fault rather than a client mistake.
    pub fn is_server_fault(self) -> bool {
        matches!(
            self,
            Self::Internal | Self::Database | Self::Configuration | Self::Serialization
        )
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Validation => write!(f, "VALIDATION"),
            Self::Authentication => write!(f, "AUTHENTICATION"),
            Self::Authorization => write!(f, "AUTHORIZATION"),
            Self::NotFound => write!(f, "NOT_FOUND"),
            Self::Conflict => write!(f, "CONFLICT"),
            Self::Policy => write!(f, "POLICY"),
            Self::Internal => write!(f, "INTERNAL"),
            Self::Database => write!(f, "DATABASE"),
            Self::Configuration => write!(f, "CONFIGURATION"),
            Self::Serialization => write!(f, "SERIALIZATION"),
        }
    }
}

/// The unified application error.
///
/// `code` refines the kind for clients that need to tell apart failures of
/// the same category (for example `NO_TOKEN` versus `INVALID_TOKEN`, both
/// authentication errors).
#[derive(Debug, Error)]
#[error("{kind}: {message}")]
pub struct AppError {
    /// The category of error.
    pub kind: ErrorKind,
    /// A human-readable error message.
    pub message: String,
    /// Specific machine-readable code, if any.
    pub code: Option<&'static str>,
    /// Optional underlying cause.
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl AppError {
    /// Create a new application error.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            code: None,
            source: None,
        }
    }

    /// Create a new application error with an underlying cause.
    pub fn with_source(
        kind: ErrorKind,
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            kind,
            message: message.into(),
            code: None,
            source: Some(Box::new(source)),
        }
    }

    /// Attach a specific machine-readable code.
    pub fn with_code(mut self, code: &'static str) -> Self {
        self.code = Some(code);
        self
    }

    /// The specific code if one was attached, else the kind's default.
    pub fn code(&self) -> &'static str {
        self.code.unwrap_or_else(|| self.kind.default_code())
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, message)
    }

    pub fn authentication(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Authentication, message)
    }

    pub fn authorization(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Authorization, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Conflict, message)
    }

    /// Create a policy error (built-in role protection, last-admin guard).
    pub fn policy(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Policy, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal, message)
    }

    pub fn database(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Database, message)
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Configuration, message)
    }
}

impl Clone for AppError {
    fn clone(&self) -> Self {
        Self {
            kind: self.kind,
            message: self.message.clone(),
            code: self.code,
            source: None,
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::with_source(
            ErrorKind::Serialization,
            format!("JSON serialization error: {err}"),
            err,
        )
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        Self::with_source(ErrorKind::Internal, format!("I/O error: {err}"), err)
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        Self::with_source(
            ErrorKind::Configuration,
            format!("Configuration error: {err}"),
            err,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_falls_back_to_kind_default() {
        let err = AppError::policy("cannot delete built-in roles");
        assert_eq!(err.code(), "POLICY_VIOLATION");

        let err = AppError::authentication("no token provided").with_code("NO_TOKEN");
        assert_eq!(err.code(), "NO_TOKEN");
        assert_eq!(err.kind, ErrorKind::Authentication);
    }

    #[test]
    fn test_clone_keeps_code_drops_source() {
        let io = std::io::Error::other("disk gone");
        let err = AppError::with_source(ErrorKind::Database, "query failed", io)
            .with_code("DB_DOWN");
        let cloned = err.clone();
        assert_eq!(cloned.code, Some("DB_DOWN"));
        assert!(cloned.source.is_none());
    }

    #[test]
    fn test_server_fault_kinds() {
        assert!(ErrorKind::Database.is_server_fault());
        assert!(!ErrorKind::Conflict.is_server_fault());
        assert_eq!(ErrorKind::Serialization.default_code(), "INTERNAL_ERROR");
    }
}
