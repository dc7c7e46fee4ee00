//! Dispatch service
//!
//! Exposes pending deliveries to whatever sends them and records when they
//! went out.

use chrono::{DateTime, Utc};
use tracing::{debug, info, instrument};

use notify_core::value_objects::{DispatchId, NotificationId};
use notify_core::DomainError;

use crate::dto::DispatchResponse;

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// Dispatch service
pub struct DispatchService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> DispatchService<'a> {
    /// Create a new DispatchService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Oldest unsent dispatches first
    #[instrument(skip(self))]
    pub async fn pending(&self, limit: i64) -> ServiceResult<Vec<DispatchResponse>> {
        let dispatches = self
            .ctx
            .dispatch_repo()
            .find_pending(limit.max(1))
            .await?;

        Ok(dispatches.into_iter().map(DispatchResponse::from).collect())
    }

    /// Dispatches spawned for one notification
    #[instrument(skip(self))]
    pub async fn for_notification(
        &self,
        notification_id: NotificationId,
    ) -> ServiceResult<Vec<DispatchResponse>> {
        let dispatches = self
            .ctx
            .dispatch_repo()
            .find_by_notification(notification_id)
            .await?;

        Ok(dispatches.into_iter().map(DispatchResponse::from).collect())
    }

    /// Record a dispatch as sent now
    #[instrument(skip(self))]
    pub async fn mark_sent(&self, id: DispatchId) -> ServiceResult<DispatchResponse> {
        self.mark_sent_at(id, Utc::now()).await
    }

    /// Record a dispatch as sent at `at`; the first send time is kept
    ///
    /// # Errors
    /// `NotSpawned` if the owning notification has not spawned, and
    /// `SentBeforeSpawn` if `at` precedes the spawn time.
    #[instrument(skip(self))]
    pub async fn mark_sent_at(
        &self,
        id: DispatchId,
        at: DateTime<Utc>,
    ) -> ServiceResult<DispatchResponse> {
        let dispatch = self
            .ctx
            .dispatch_repo()
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Dispatch", id))?;

        if !dispatch.is_pending() {
            debug!(dispatch_id = %id, "Dispatch already sent");
            return Ok(DispatchResponse::from(dispatch));
        }

        let notification = self
            .ctx
            .notification_repo()
            .find_by_id(dispatch.notification_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Notification", dispatch.notification_id))?;

        let spawned = notification
            .spawned
            .ok_or(DomainError::NotSpawned(notification.id))?;
        if at < spawned {
            return Err(DomainError::SentBeforeSpawn { sent: at, spawned }.into());
        }

        let sent = self.ctx.dispatch_repo().mark_sent(id, at).await?;
        info!(
            dispatch_id = %id,
            notification_id = %sent.notification_id,
            channel = sent.channel.as_str(),
            "Dispatch sent"
        );
        Ok(DispatchResponse::from(sent))
    }
}
