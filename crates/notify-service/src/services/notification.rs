//! Notification service
//!
//! Creates notifications and tracks whether their recipient has read them.

use chrono::{DateTime, Duration, Utc};
use tracing::{debug, info, instrument};
use validator::Validate;

use notify_core::entities::Notification;
use notify_core::value_objects::{EventId, NotificationId, UserId};

use crate::dto::{CreateNotificationRequest, NotificationResponse};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// Default and maximum page size for listing
const DEFAULT_LIMIT: i64 = 50;
const MAX_LIMIT: i64 = 100;

/// Notification service
pub struct NotificationService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> NotificationService<'a> {
    /// Create a new NotificationService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Create a notification, due now or after the requested delay
    #[instrument(skip(self, request), fields(user_id = request.user_id, event_id = request.event_id))]
    pub async fn notify(
        &self,
        request: CreateNotificationRequest,
    ) -> ServiceResult<NotificationResponse> {
        request.validate()?;

        let now = Utc::now();
        let due = now + Duration::seconds(request.delay_secs.unwrap_or(0));

        let mut notification = Notification::new(
            UserId::new(request.user_id),
            EventId::new(request.event_id),
            due,
        );
        if let Some(role) = request.role {
            notification = notification.with_role(role);
        }
        notification.validate()?;

        let created = self.ctx.notification_repo().create(&notification).await?;
        info!(notification_id = %created.id, due = %created.due, "Notification created");

        Ok(NotificationResponse::from(created))
    }

    /// Mark a notification read now
    #[instrument(skip(self))]
    pub async fn mark_read(&self, id: NotificationId) -> ServiceResult<NotificationResponse> {
        self.mark_read_at(id, Utc::now()).await
    }

    /// Mark a notification read at `at`; the first read time is kept
    #[instrument(skip(self))]
    pub async fn mark_read_at(
        &self,
        id: NotificationId,
        at: DateTime<Utc>,
    ) -> ServiceResult<NotificationResponse> {
        let mut notification = self
            .ctx
            .notification_repo()
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Notification", id))?;

        if !notification.mark_read(at)? {
            debug!(notification_id = %id, "Notification already read");
            return Ok(NotificationResponse::from(notification));
        }

        let updated = self.ctx.notification_repo().mark_read(id, at).await?;
        info!(notification_id = %id, "Notification read");
        Ok(NotificationResponse::from(updated))
    }

    /// List a user's most recent notifications
    #[instrument(skip(self))]
    pub async fn list_for_user(
        &self,
        user_id: UserId,
        limit: Option<i64>,
    ) -> ServiceResult<Vec<NotificationResponse>> {
        let limit = limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
        let notifications = self
            .ctx
            .notification_repo()
            .find_by_user(user_id, limit)
            .await?;

        Ok(notifications.into_iter().map(NotificationResponse::from).collect())
    }

    /// Number of notifications the user has not read
    #[instrument(skip(self))]
    pub async fn unread_count(&self, user_id: UserId) -> ServiceResult<i64> {
        Ok(self.ctx.notification_repo().count_unread(user_id).await?)
    }
}
