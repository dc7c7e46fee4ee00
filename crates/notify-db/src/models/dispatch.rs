//! Dispatch database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for notification_dispatches table
#[derive(Debug, Clone, FromRow)]
pub struct DispatchModel {
    pub id: i64,
    pub notification_id: i64,
    pub channel: String,
    pub view: Option<String>,
    pub spec: Option<String>,
    pub batch_spec: Option<String>,
    pub to_address: Option<String>,
    pub bcc_address: Option<String>,
    pub sent: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl DispatchModel {
    /// Check if the dispatch has been sent
    #[inline]
    pub fn is_sent(&self) -> bool {
        self.sent.is_some()
    }
}
