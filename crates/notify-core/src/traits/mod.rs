//! Ports - interfaces the infrastructure layer implements

mod lookups;
mod repositories;

pub use lookups::{
    DispatchConfigLookup, DispatchKey, DispatchTemplate, EventDirectory, EventSummary,
    RecipientResolver,
};
pub use repositories::{
    DispatchRepository, DueCursor, NotificationRepository, PreferencesRepository, RepoResult,
    SpawnOutcome,
};
