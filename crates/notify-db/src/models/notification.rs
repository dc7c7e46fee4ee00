//! Notification database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for notifications table
#[derive(Debug, Clone, FromRow)]
pub struct NotificationModel {
    pub id: i64,
    pub user_id: i64,
    pub event_id: i64,
    pub role: Option<String>,
    pub due: DateTime<Utc>,
    pub spawned: Option<DateTime<Utc>>,
    pub read: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl NotificationModel {
    /// Check if the row is still waiting to spawn
    #[inline]
    pub fn is_unspawned(&self) -> bool {
        self.spawned.is_none()
    }
}
