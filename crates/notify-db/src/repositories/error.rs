//! Error handling utilities for repositories

use notify_core::error::DomainError;
use notify_core::value_objects::{DispatchId, NotificationId, UserId};
use sqlx::Error as SqlxError;

/// Convert SQLx error to DomainError
pub fn map_db_error(e: SqlxError) -> DomainError {
    DomainError::DatabaseError(e.to_string())
}

/// Check for unique violation and return appropriate error or fallback
pub fn map_unique_violation<F>(e: SqlxError, on_unique: F) -> DomainError
where
    F: FnOnce() -> DomainError,
{
    if let Some(db_err) = e.as_database_error() {
        if db_err.is_unique_violation() {
            return on_unique();
        }
    }
    DomainError::DatabaseError(e.to_string())
}

/// Whether the error is a violation of the named CHECK constraint
pub fn is_check_violation(e: &SqlxError, constraint: &str) -> bool {
    e.as_database_error()
        .is_some_and(|db_err| db_err.is_check_violation() && db_err.constraint() == Some(constraint))
}

pub fn notification_not_found(id: NotificationId) -> DomainError {
    DomainError::NotificationNotFound(id)
}

pub fn dispatch_not_found(id: DispatchId) -> DomainError {
    DomainError::DispatchNotFound(id)
}

pub fn preferences_not_found(user_id: UserId) -> DomainError {
    DomainError::PreferencesNotFound(user_id)
}
