//! Response DTOs
//!
//! All response DTOs implement `Serialize` so they can be logged as
//! structured fields or returned by an embedding API.

use chrono::{DateTime, Utc};
use serde::Serialize;

use notify_core::value_objects::{
    Channel, DispatchId, EventId, Frequency, NotificationId, UserId,
};

/// A user's notification preferences
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PreferencesResponse {
    pub user_id: UserId,
    pub channel: Channel,
    pub frequency: Frequency,
    pub enabled: bool,
    pub updated_at: DateTime<Utc>,
}

/// A notification as seen by its recipient
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NotificationResponse {
    pub id: NotificationId,
    pub user_id: UserId,
    pub event_id: EventId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    pub due: DateTime<Utc>,
    pub spawned: Option<DateTime<Utc>>,
    pub read: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// A delivery attempt
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DispatchResponse {
    pub id: DispatchId,
    pub notification_id: NotificationId,
    pub channel: Channel,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub view: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spec: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub batch_spec: Option<String>,
    pub to_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bcc_address: Option<String>,
    pub sent: Option<DateTime<Utc>>,
}

/// Outcome counts of one spawn pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SpawnReport {
    /// Due notifications fetched
    pub examined: usize,
    /// Claimed by this pass, with or without dispatches
    pub spawned: usize,
    /// Claimed without dispatches (disabled or already read)
    pub suppressed: usize,
    /// Claimed by another writer first
    pub already_spawned: usize,
    /// Left unclaimed and still due: the event could not be found, a planned
    /// dispatch failed validation, or the spawn time preceded creation
    pub skipped: usize,
    pub dispatches_created: usize,
}

impl SpawnReport {
    /// Merge the counts of another pass into this one
    pub fn absorb(&mut self, other: SpawnReport) {
        self.examined += other.examined;
        self.spawned += other.spawned;
        self.suppressed += other.suppressed;
        self.already_spawned += other.already_spawned;
        self.skipped += other.skipped;
        self.dispatches_created += other.dispatches_created;
    }

    /// Whether the pass found nothing to do
    pub fn is_idle(&self) -> bool {
        self.examined == 0
    }
}
