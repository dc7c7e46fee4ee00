//! Repository traits (ports) - define the interface for data access
//!
//! The domain layer defines what it needs, and the infrastructure layer
//! provides the implementation. Relationships are navigated through explicit
//! query methods keyed by foreign key, never through back-references.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::entities::{Dispatch, Notification, Preferences};
use crate::error::DomainError;
use crate::value_objects::{DispatchId, EventId, NotificationId, UserId};

/// Result type for repository operations
pub type RepoResult<T> = Result<T, DomainError>;

// ============================================================================
// Preferences Repository
// ============================================================================

#[async_trait]
pub trait PreferencesRepository: Send + Sync {
    /// Find the preferences row for a user
    async fn find_by_user(&self, user_id: UserId) -> RepoResult<Option<Preferences>>;

    /// Insert a preferences row, failing if the user already has one
    async fn create(&self, preferences: &Preferences) -> RepoResult<Preferences>;

    /// Update channel and frequency
    async fn update(&self, preferences: &Preferences) -> RepoResult<Preferences>;

    /// Fetch the user's row, inserting the defaults if none exists
    async fn get_or_create(&self, user_id: UserId) -> RepoResult<Preferences>;
}

// ============================================================================
// Notification Repository
// ============================================================================

/// Result of trying to spawn a notification
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpawnOutcome {
    /// This caller claimed the row; holds the dispatches that were inserted
    Spawned(Vec<Dispatch>),
    /// Another writer set `spawned` first; nothing was inserted
    AlreadySpawned,
}

/// Position in the due queue, which is ordered by `(due, id)`
///
/// Passing the key of the last row examined to `find_due` resumes the scan
/// after it, so rows a caller leaves unclaimed do not come back in the same
/// sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DueCursor {
    pub due: DateTime<Utc>,
    pub id: NotificationId,
}

impl DueCursor {
    /// Whether `notification` sorts strictly after this position
    pub fn precedes(&self, notification: &Notification) -> bool {
        (notification.due, notification.id) > (self.due, self.id)
    }
}

impl From<&Notification> for DueCursor {
    fn from(notification: &Notification) -> Self {
        Self {
            due: notification.due,
            id: notification.id,
        }
    }
}

#[async_trait]
pub trait NotificationRepository: Send + Sync {
    /// Find notification by ID
    async fn find_by_id(&self, id: NotificationId) -> RepoResult<Option<Notification>>;

    /// Most recent notifications for a user
    async fn find_by_user(&self, user_id: UserId, limit: i64) -> RepoResult<Vec<Notification>>;

    /// All notifications generated for an event
    async fn find_by_event(&self, event_id: EventId) -> RepoResult<Vec<Notification>>;

    /// Insert a notification, returning it with its assigned id
    async fn create(&self, notification: &Notification) -> RepoResult<Notification>;

    /// Notifications with `due <= now` and no `spawned`, ordered by
    /// `(due, id)` and starting after `after` when given
    async fn find_due(
        &self,
        now: DateTime<Utc>,
        after: Option<DueCursor>,
        limit: i64,
    ) -> RepoResult<Vec<Notification>>;

    /// Claim the notification by stamping `spawned` (only if still unset)
    /// and insert `dispatches` in the same transaction.
    async fn spawn(
        &self,
        id: NotificationId,
        spawned_at: DateTime<Utc>,
        dispatches: &[Dispatch],
    ) -> RepoResult<SpawnOutcome>;

    /// Stamp `read` if unset; returns the current row
    async fn mark_read(&self, id: NotificationId, at: DateTime<Utc>) -> RepoResult<Notification>;

    /// Count unread notifications for a user
    async fn count_unread(&self, user_id: UserId) -> RepoResult<i64>;
}

// ============================================================================
// Dispatch Repository
// ============================================================================

#[async_trait]
pub trait DispatchRepository: Send + Sync {
    /// Find dispatch by ID
    async fn find_by_id(&self, id: DispatchId) -> RepoResult<Option<Dispatch>>;

    /// All dispatches of a notification
    async fn find_by_notification(
        &self,
        notification_id: NotificationId,
    ) -> RepoResult<Vec<Dispatch>>;

    /// Unsent dispatches, oldest first
    async fn find_pending(&self, limit: i64) -> RepoResult<Vec<Dispatch>>;

    /// Stamp `sent` if unset. A second call leaves the first value intact
    /// and returns the row as stored.
    async fn mark_sent(&self, id: DispatchId, at: DateTime<Utc>) -> RepoResult<Dispatch>;
}
