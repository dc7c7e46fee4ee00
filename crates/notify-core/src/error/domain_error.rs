//! Domain errors - error types for the domain layer

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::value_objects::{DispatchId, EventId, NotificationId, UserId};

/// Domain layer errors
#[derive(Debug, Error)]
pub enum DomainError {
    // =========================================================================
    // Not Found Errors
    // =========================================================================
    #[error("Notification not found: {0}")]
    NotificationNotFound(NotificationId),

    #[error("Dispatch not found: {0}")]
    DispatchNotFound(DispatchId),

    #[error("Preferences not found for user: {0}")]
    PreferencesNotFound(UserId),

    #[error("Event not found: {0}")]
    EventNotFound(EventId),

    // =========================================================================
    // Validation Errors
    // =========================================================================
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Invalid channel: {0:?}")]
    InvalidChannel(String),

    #[error("Invalid frequency: {0:?}")]
    InvalidFrequency(String),

    #[error("{field} too long: max {max} characters")]
    FieldTooLong { field: &'static str, max: usize },

    #[error("{field} ({at}) precedes creation time ({created_at})")]
    TimestampBeforeCreation {
        field: &'static str,
        at: DateTime<Utc>,
        created_at: DateTime<Utc>,
    },

    // =========================================================================
    // Conflict Errors
    // =========================================================================
    #[error("Preferences already exist for user: {0}")]
    PreferencesAlreadyExist(UserId),

    // =========================================================================
    // Business Rule Violations
    // =========================================================================
    #[error("Notification {0} has not been spawned")]
    NotSpawned(NotificationId),

    #[error("Dispatch cannot be sent at {sent} before its notification spawned at {spawned}")]
    SentBeforeSpawn {
        sent: DateTime<Utc>,
        spawned: DateTime<Utc>,
    },

    // =========================================================================
    // Infrastructure Errors (wrapped)
    // =========================================================================
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl DomainError {
    /// Get a stable error code string
    pub fn code(&self) -> &'static str {
        match self {
            // Not Found
            Self::NotificationNotFound(_) => "UNKNOWN_NOTIFICATION",
            Self::DispatchNotFound(_) => "UNKNOWN_DISPATCH",
            Self::PreferencesNotFound(_) => "UNKNOWN_PREFERENCES",
            Self::EventNotFound(_) => "UNKNOWN_EVENT",

            // Validation
            Self::ValidationError(_) => "VALIDATION_ERROR",
            Self::InvalidChannel(_) => "INVALID_CHANNEL",
            Self::InvalidFrequency(_) => "INVALID_FREQUENCY",
            Self::FieldTooLong { .. } => "FIELD_TOO_LONG",
            Self::TimestampBeforeCreation { .. } => "TIMESTAMP_BEFORE_CREATION",

            // Conflict
            Self::PreferencesAlreadyExist(_) => "PREFERENCES_ALREADY_EXIST",

            // Business Rules
            Self::NotSpawned(_) => "NOT_SPAWNED",
            Self::SentBeforeSpawn { .. } => "SENT_BEFORE_SPAWN",

            // Infrastructure
            Self::DatabaseError(_) => "DATABASE_ERROR",
            Self::InternalError(_) => "INTERNAL_ERROR",
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::NotificationNotFound(_)
                | Self::DispatchNotFound(_)
                | Self::PreferencesNotFound(_)
                | Self::EventNotFound(_)
        )
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::ValidationError(_)
                | Self::InvalidChannel(_)
                | Self::InvalidFrequency(_)
                | Self::FieldTooLong { .. }
                | Self::TimestampBeforeCreation { .. }
        )
    }

    /// Check if this is a conflict error
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::PreferencesAlreadyExist(_))
    }

    /// Check if this is a lifecycle rule violation
    pub fn is_business_rule(&self) -> bool {
        matches!(self, Self::NotSpawned(_) | Self::SentBeforeSpawn { .. })
    }
}
