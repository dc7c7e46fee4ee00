//! Repository implementations
//!
//! PostgreSQL implementations of the ports defined in notify-core.

mod dispatch;
mod error;
mod event_directory;
mod notification;
mod preferences;
mod recipient;

pub use dispatch::PgDispatchRepository;
pub use event_directory::PgEventDirectory;
pub use notification::PgNotificationRepository;
pub use preferences::PgPreferencesRepository;
pub use recipient::PgRecipientResolver;
