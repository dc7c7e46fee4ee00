//! PostgreSQL implementation of DispatchRepository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::{debug, instrument};

use notify_core::entities::Dispatch;
use notify_core::traits::{DispatchRepository, RepoResult};
use notify_core::value_objects::{DispatchId, NotificationId};

use crate::mappers::map_rows;
use crate::models::DispatchModel;

use super::error::{dispatch_not_found, map_db_error};

/// PostgreSQL implementation of DispatchRepository
#[derive(Clone)]
pub struct PgDispatchRepository {
    pool: PgPool,
}

impl PgDispatchRepository {
    /// Create a new PgDispatchRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DispatchRepository for PgDispatchRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: DispatchId) -> RepoResult<Option<Dispatch>> {
        let result = sqlx::query_as::<_, DispatchModel>(
            r#"
            SELECT id, notification_id, channel, view, spec, batch_spec, to_address,
                   bcc_address, sent, created_at, updated_at
            FROM notification_dispatches
            WHERE id = $1
            "#,
        )
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        result.map(Dispatch::try_from).transpose()
    }

    #[instrument(skip(self))]
    async fn find_by_notification(
        &self,
        notification_id: NotificationId,
    ) -> RepoResult<Vec<Dispatch>> {
        let results = sqlx::query_as::<_, DispatchModel>(
            r#"
            SELECT id, notification_id, channel, view, spec, batch_spec, to_address,
                   bcc_address, sent, created_at, updated_at
            FROM notification_dispatches
            WHERE notification_id = $1
            ORDER BY id ASC
            "#,
        )
        .bind(notification_id.into_inner())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        map_rows(results)
    }

    #[instrument(skip(self))]
    async fn find_pending(&self, limit: i64) -> RepoResult<Vec<Dispatch>> {
        let results = sqlx::query_as::<_, DispatchModel>(
            r#"
            SELECT id, notification_id, channel, view, spec, batch_spec, to_address,
                   bcc_address, sent, created_at, updated_at
            FROM notification_dispatches
            WHERE sent IS NULL
            ORDER BY created_at ASC, id ASC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        map_rows(results)
    }

    #[instrument(skip(self))]
    async fn mark_sent(&self, id: DispatchId, at: DateTime<Utc>) -> RepoResult<Dispatch> {
        let updated = sqlx::query_as::<_, DispatchModel>(
            r#"
            UPDATE notification_dispatches
            SET sent = $2, updated_at = NOW()
            WHERE id = $1 AND sent IS NULL
            RETURNING id, notification_id, channel, view, spec, batch_spec, to_address,
                      bcc_address, sent, created_at, updated_at
            "#,
        )
        .bind(id.into_inner())
        .bind(at)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        match updated {
            Some(model) => Dispatch::try_from(model),
            None => {
                debug!(dispatch_id = %id, "Dispatch already sent");
                self.find_by_id(id)
                    .await?
                    .ok_or_else(|| dispatch_not_found(id))
            }
        }
    }
}
