//! Notification entity - notifies a user about an event

use chrono::{DateTime, Utc};

use super::check_len;
use crate::error::DomainError;
use crate::value_objects::{EventId, NotificationId, UserId};

/// A notification scheduled to spawn dispatches once it is due
///
/// `role` records which role the user matched when the notification was
/// generated, so the dispatch configuration can be looked up by role at spawn
/// time. `read` may be stamped before `spawned`, in which case the user has
/// already seen it and no dispatches are created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub id: NotificationId,
    pub user_id: UserId,
    pub event_id: EventId,
    pub role: Option<String>,
    pub due: DateTime<Utc>,
    pub spawned: Option<DateTime<Utc>>,
    pub read: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Notification {
    pub const ROLE_MAX_LEN: usize = 64;

    /// Create a new notification due at `due`
    pub fn new(user_id: UserId, event_id: EventId, due: DateTime<Utc>) -> Self {
        let now = Utc::now();
        Self {
            id: NotificationId::default(),
            user_id,
            event_id,
            role: None,
            due,
            spawned: None,
            read: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Record the role the user matched
    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.role = Some(role.into());
        self
    }

    /// Check column limits before persisting
    pub fn validate(&self) -> Result<(), DomainError> {
        check_len("role", self.role.as_deref(), Self::ROLE_MAX_LEN)
    }

    /// Due at `now` and not yet spawned
    #[inline]
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.due <= now && self.spawned.is_none()
    }

    #[inline]
    pub fn is_spawned(&self) -> bool {
        self.spawned.is_some()
    }

    #[inline]
    pub fn is_read(&self) -> bool {
        self.read.is_some()
    }

    /// Read before it was even due
    pub fn read_before_due(&self) -> bool {
        self.read.is_some_and(|read| read < self.due)
    }

    /// Whether spawning should create dispatches.
    ///
    /// False once the user has read the notification before it was spawned;
    /// a read that precedes `due` is the common case of this.
    pub fn should_dispatch(&self) -> bool {
        match (self.read, self.spawned) {
            (None, _) => true,
            (Some(read), Some(spawned)) => read >= spawned,
            (Some(_), None) => false,
        }
    }

    /// Stamp `spawned`. Returns false if it was already set.
    pub fn mark_spawned(&mut self, at: DateTime<Utc>) -> Result<bool, DomainError> {
        if self.spawned.is_some() {
            return Ok(false);
        }
        self.ensure_after_creation("spawned", at)?;
        self.spawned = Some(at);
        self.updated_at = at;
        Ok(true)
    }

    /// Stamp `read`. Returns false if it was already set.
    pub fn mark_read(&mut self, at: DateTime<Utc>) -> Result<bool, DomainError> {
        if self.read.is_some() {
            return Ok(false);
        }
        self.ensure_after_creation("read", at)?;
        self.read = Some(at);
        self.updated_at = at;
        Ok(true)
    }

    fn ensure_after_creation(
        &self,
        field: &'static str,
        at: DateTime<Utc>,
    ) -> Result<(), DomainError> {
        if at < self.created_at {
            return Err(DomainError::TimestampBeforeCreation {
                field,
                at,
                created_at: self.created_at,
            });
        }
        Ok(())
    }
}
