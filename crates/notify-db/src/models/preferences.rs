//! Preferences database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for notification_preferences table
#[derive(Debug, Clone, FromRow)]
pub struct PreferencesModel {
    pub id: i64,
    pub user_id: i64,
    pub channel: String,
    pub frequency: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
