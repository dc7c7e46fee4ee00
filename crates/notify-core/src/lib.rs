//! # notify-core
//!
//! Domain layer for the notification subsystem: entities, value objects, repository
//! traits, and domain errors. This crate has zero dependencies on infrastructure
//! (database driver, runtime, configuration).

pub mod entities;
pub mod error;
pub mod traits;
pub mod value_objects;

// Re-export commonly used types at crate root
pub use entities::{Dispatch, Notification, Preferences};
pub use error::DomainError;
pub use traits::{
    DispatchConfigLookup, DispatchKey, DispatchRepository, DispatchTemplate, DueCursor,
    EventDirectory, EventSummary, NotificationRepository, PreferencesRepository,
    RecipientResolver, RepoResult, SpawnOutcome,
};
pub use value_objects::{
    Channel, DispatchId, EventId, Frequency, NotificationId, PreferencesId, UserId,
};
