//! Model to entity mappers
//!
//! Rows store channel and frequency as strings; converting a row into an
//! entity parses them, so these are `TryFrom` rather than `From`.

mod dispatch;
mod notification;
mod preferences;

use notify_core::DomainError;

/// Convert a batch of rows, failing on the first unparsable one
pub fn map_rows<M, E>(rows: Vec<M>) -> Result<Vec<E>, DomainError>
where
    E: TryFrom<M, Error = DomainError>,
{
    rows.into_iter().map(E::try_from).collect()
}
