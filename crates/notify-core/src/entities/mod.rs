//! Domain entities - notification records and their lifecycle predicates

mod dispatch;
mod notification;
mod preferences;

pub use dispatch::Dispatch;
pub use notification::Notification;
pub use preferences::Preferences;

use crate::error::DomainError;

/// Reject optional text longer than its column allows
pub(crate) fn check_len(
    field: &'static str,
    value: Option<&str>,
    max: usize,
) -> Result<(), DomainError> {
    match value {
        Some(v) if v.chars().count() > max => Err(DomainError::FieldTooLong { field, max }),
        _ => Ok(()),
    }
}
