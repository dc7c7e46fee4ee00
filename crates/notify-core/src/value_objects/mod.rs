//! Value objects - immutable types that represent domain concepts

mod channel;
mod frequency;
mod ids;

pub use channel::Channel;
pub use frequency::Frequency;
pub use ids::{DispatchId, EventId, NotificationId, PreferencesId, UserId};
