//! PostgreSQL implementation of NotificationRepository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, Transaction};
use tracing::{debug, instrument};

use notify_core::entities::{Dispatch, Notification};
use notify_core::error::DomainError;
use notify_core::traits::{DueCursor, NotificationRepository, RepoResult, SpawnOutcome};
use notify_core::value_objects::{EventId, NotificationId, UserId};

use crate::mappers::map_rows;
use crate::models::{DispatchModel, NotificationModel};
use crate::schema::{READ_AFTER_CREATED, SPAWNED_AFTER_CREATED};

use super::error::{is_check_violation, map_db_error, notification_not_found};

/// PostgreSQL implementation of NotificationRepository
#[derive(Clone)]
pub struct PgNotificationRepository {
    pool: PgPool,
}

impl PgNotificationRepository {
    /// Create a new PgNotificationRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn exists(&self, id: NotificationId) -> RepoResult<bool> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM notifications WHERE id = $1)")
            .bind(id.into_inner())
            .fetch_one(&self.pool)
            .await
            .map_err(map_db_error)
    }

    /// Error for a timestamp the CHECK constraints rejected as preceding creation
    async fn before_creation(
        &self,
        id: NotificationId,
        field: &'static str,
        at: DateTime<Utc>,
    ) -> DomainError {
        match self.find_by_id(id).await {
            Ok(Some(notification)) => DomainError::TimestampBeforeCreation {
                field,
                at,
                created_at: notification.created_at,
            },
            Ok(None) => notification_not_found(id),
            Err(e) => e,
        }
    }

    async fn insert_dispatch(
        tx: &mut Transaction<'_, Postgres>,
        notification_id: NotificationId,
        dispatch: &Dispatch,
    ) -> RepoResult<Dispatch> {
        dispatch.validate()?;

        let model = sqlx::query_as::<_, DispatchModel>(
            r#"
            INSERT INTO notification_dispatches (notification_id, channel, view, spec, batch_spec,
                                                 to_address, bcc_address, sent)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id, notification_id, channel, view, spec, batch_spec, to_address,
                      bcc_address, sent, created_at, updated_at
            "#,
        )
        .bind(notification_id.into_inner())
        .bind(dispatch.channel.as_str())
        .bind(dispatch.view.as_deref())
        .bind(dispatch.spec.as_deref())
        .bind(dispatch.batch_spec.as_deref())
        .bind(dispatch.to_address.as_deref())
        .bind(dispatch.bcc_address.as_deref())
        .bind(dispatch.sent)
        .fetch_one(&mut **tx)
        .await
        .map_err(map_db_error)?;

        Dispatch::try_from(model)
    }
}

#[async_trait]
impl NotificationRepository for PgNotificationRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: NotificationId) -> RepoResult<Option<Notification>> {
        let result = sqlx::query_as::<_, NotificationModel>(
            r#"
            SELECT id, user_id, event_id, role, due, spawned, read, created_at, updated_at
            FROM notifications
            WHERE id = $1
            "#,
        )
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        result.map(Notification::try_from).transpose()
    }

    #[instrument(skip(self))]
    async fn find_by_user(&self, user_id: UserId, limit: i64) -> RepoResult<Vec<Notification>> {
        let results = sqlx::query_as::<_, NotificationModel>(
            r#"
            SELECT id, user_id, event_id, role, due, spawned, read, created_at, updated_at
            FROM notifications
            WHERE user_id = $1
            ORDER BY created_at DESC, id DESC
            LIMIT $2
            "#,
        )
        .bind(user_id.into_inner())
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        map_rows(results)
    }

    #[instrument(skip(self))]
    async fn find_by_event(&self, event_id: EventId) -> RepoResult<Vec<Notification>> {
        let results = sqlx::query_as::<_, NotificationModel>(
            r#"
            SELECT id, user_id, event_id, role, due, spawned, read, created_at, updated_at
            FROM notifications
            WHERE event_id = $1
            ORDER BY id ASC
            "#,
        )
        .bind(event_id.into_inner())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        map_rows(results)
    }

    #[instrument(skip(self, notification), fields(user_id = %notification.user_id, event_id = %notification.event_id))]
    async fn create(&self, notification: &Notification) -> RepoResult<Notification> {
        notification.validate()?;

        let model = sqlx::query_as::<_, NotificationModel>(
            r#"
            INSERT INTO notifications (user_id, event_id, role, due, spawned, read,
                                       created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id, user_id, event_id, role, due, spawned, read, created_at, updated_at
            "#,
        )
        .bind(notification.user_id.into_inner())
        .bind(notification.event_id.into_inner())
        .bind(notification.role.as_deref())
        .bind(notification.due)
        .bind(notification.spawned)
        .bind(notification.read)
        .bind(notification.created_at)
        .bind(notification.updated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        Notification::try_from(model)
    }

    #[instrument(skip(self))]
    async fn find_due(
        &self,
        now: DateTime<Utc>,
        after: Option<DueCursor>,
        limit: i64,
    ) -> RepoResult<Vec<Notification>> {
        let results = sqlx::query_as::<_, NotificationModel>(
            r#"
            SELECT id, user_id, event_id, role, due, spawned, read, created_at, updated_at
            FROM notifications
            WHERE due <= $1 AND spawned IS NULL
              AND ($2::timestamptz IS NULL OR (due, id) > ($2, $3::bigint))
            ORDER BY due ASC, id ASC
            LIMIT $4
            "#,
        )
        .bind(now)
        .bind(after.map(|c| c.due))
        .bind(after.map(|c| c.id.into_inner()))
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        map_rows(results)
    }

    #[instrument(skip(self, dispatches), fields(dispatches = dispatches.len()))]
    async fn spawn(
        &self,
        id: NotificationId,
        spawned_at: DateTime<Utc>,
        dispatches: &[Dispatch],
    ) -> RepoResult<SpawnOutcome> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        // The affected-row count is the claim: only one writer can move
        // `spawned` from NULL.
        let claimed = sqlx::query(
            r#"
            UPDATE notifications
            SET spawned = $2, updated_at = NOW()
            WHERE id = $1 AND spawned IS NULL
            "#,
        )
        .bind(id.into_inner())
        .bind(spawned_at)
        .execute(&mut *tx)
        .await;

        let claimed = match claimed {
            Ok(claimed) => claimed,
            Err(e) if is_check_violation(&e, SPAWNED_AFTER_CREATED) => {
                drop(tx);
                return Err(self.before_creation(id, "spawned", spawned_at).await);
            }
            Err(e) => return Err(map_db_error(e)),
        };

        if claimed.rows_affected() == 0 {
            drop(tx);
            if self.exists(id).await? {
                debug!(notification_id = %id, "Notification already spawned");
                return Ok(SpawnOutcome::AlreadySpawned);
            }
            return Err(notification_not_found(id));
        }

        let mut created = Vec::with_capacity(dispatches.len());
        for dispatch in dispatches {
            created.push(Self::insert_dispatch(&mut tx, id, dispatch).await?);
        }

        tx.commit().await.map_err(map_db_error)?;
        Ok(SpawnOutcome::Spawned(created))
    }

    #[instrument(skip(self))]
    async fn mark_read(&self, id: NotificationId, at: DateTime<Utc>) -> RepoResult<Notification> {
        let updated = sqlx::query_as::<_, NotificationModel>(
            r#"
            UPDATE notifications
            SET read = $2, updated_at = NOW()
            WHERE id = $1 AND read IS NULL
            RETURNING id, user_id, event_id, role, due, spawned, read, created_at, updated_at
            "#,
        )
        .bind(id.into_inner())
        .bind(at)
        .fetch_optional(&self.pool)
        .await;

        let updated = match updated {
            Ok(updated) => updated,
            Err(e) if is_check_violation(&e, READ_AFTER_CREATED) => {
                return Err(self.before_creation(id, "read", at).await);
            }
            Err(e) => return Err(map_db_error(e)),
        };

        match updated {
            Some(model) => Notification::try_from(model),
            None => self
                .find_by_id(id)
                .await?
                .ok_or_else(|| notification_not_found(id)),
        }
    }

    #[instrument(skip(self))]
    async fn count_unread(&self, user_id: UserId) -> RepoResult<i64> {
        sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM notifications
            WHERE user_id = $1 AND read IS NULL
            "#,
        )
        .bind(user_id.into_inner())
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)
    }
}
