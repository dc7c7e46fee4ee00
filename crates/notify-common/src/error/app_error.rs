//! Application error types
//!
//! Unified error handling for the worker and anything embedding the services.

use notify_core::DomainError;
use std::fmt;

use crate::config::ConfigError;

/// Application-wide error type
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    // Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    // Resource errors
    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    // Database errors
    #[error("Database error: {0}")]
    Database(String),

    // Schema bootstrap errors
    #[error("Schema error: {0}")]
    Schema(String),

    // Internal errors
    #[error("Internal error")]
    Internal(#[source] anyhow::Error),

    // Domain errors
    #[error(transparent)]
    Domain(#[from] DomainError),

    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),
}

impl AppError {
    /// Get error code for structured logs
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::NotFound(_) => "NOT_FOUND",
            Self::Conflict(_) => "CONFLICT",
            Self::Database(_) => "DATABASE_ERROR",
            Self::Schema(_) => "SCHEMA_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
            Self::Config(_) => "CONFIG_ERROR",
            Self::Domain(e) => e.code(),
        }
    }

    /// Errors caused by the caller's input rather than the environment
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        match self {
            Self::Validation(_) | Self::NotFound(_) | Self::Conflict(_) => true,
            Self::Domain(e) => {
                e.is_not_found() || e.is_validation() || e.is_conflict() || e.is_business_rule()
            }
            _ => false,
        }
    }

    /// Create a not found error for a resource type
    #[must_use]
    pub fn not_found(resource: impl fmt::Display) -> Self {
        Self::NotFound(resource.to_string())
    }

    /// Create a validation error
    #[must_use]
    pub fn validation(msg: impl fmt::Display) -> Self {
        Self::Validation(msg.to_string())
    }

    /// Create an internal error from any error
    pub fn internal(err: impl Into<anyhow::Error>) -> Self {
        Self::Internal(err.into())
    }
}

impl From<ConfigError> for AppError {
    fn from(err: ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use notify_core::{DispatchId, NotificationId};

    #[test]
    fn test_error_codes() {
        assert_eq!(AppError::not_found("dispatch").error_code(), "NOT_FOUND");
        assert_eq!(AppError::Schema("x".into()).error_code(), "SCHEMA_ERROR");
        let err = AppError::from(DomainError::DispatchNotFound(DispatchId::new(1)));
        assert_eq!(err.error_code(), "UNKNOWN_DISPATCH");
    }

    #[test]
    fn test_is_client_error() {
        assert!(AppError::validation("bad").is_client_error());
        assert!(AppError::from(DomainError::NotSpawned(NotificationId::new(1))).is_client_error());
        assert!(!AppError::Database("down".into()).is_client_error());
        assert!(!AppError::internal(anyhow::anyhow!("boom")).is_client_error());
    }

    #[test]
    fn test_config_error_conversion() {
        let err = AppError::from(ConfigError::MissingVar("DATABASE_URL"));
        assert_eq!(err.error_code(), "CONFIG_ERROR");
        assert_eq!(
            err.to_string(),
            "Configuration error: Missing required environment variable: DATABASE_URL"
        );
    }
}
