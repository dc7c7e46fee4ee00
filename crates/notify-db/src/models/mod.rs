//! Database models - SQLx-compatible structs for the notification tables

mod dispatch;
mod notification;
mod preferences;

pub use dispatch::DispatchModel;
pub use notification::NotificationModel;
pub use preferences::PreferencesModel;
