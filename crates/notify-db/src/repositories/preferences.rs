//! PostgreSQL implementation of PreferencesRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{debug, instrument};

use notify_core::entities::Preferences;
use notify_core::error::DomainError;
use notify_core::traits::{PreferencesRepository, RepoResult};
use notify_core::value_objects::UserId;

use crate::models::PreferencesModel;

use super::error::{map_db_error, map_unique_violation, preferences_not_found};

/// PostgreSQL implementation of PreferencesRepository
#[derive(Clone)]
pub struct PgPreferencesRepository {
    pool: PgPool,
}

impl PgPreferencesRepository {
    /// Create a new PgPreferencesRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PreferencesRepository for PgPreferencesRepository {
    #[instrument(skip(self))]
    async fn find_by_user(&self, user_id: UserId) -> RepoResult<Option<Preferences>> {
        let result = sqlx::query_as::<_, PreferencesModel>(
            r#"
            SELECT id, user_id, channel, frequency, created_at, updated_at
            FROM notification_preferences
            WHERE user_id = $1
            "#,
        )
        .bind(user_id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        result.map(Preferences::try_from).transpose()
    }

    #[instrument(skip(self, preferences), fields(user_id = %preferences.user_id))]
    async fn create(&self, preferences: &Preferences) -> RepoResult<Preferences> {
        let model = sqlx::query_as::<_, PreferencesModel>(
            r#"
            INSERT INTO notification_preferences (user_id, channel, frequency, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, user_id, channel, frequency, created_at, updated_at
            "#,
        )
        .bind(preferences.user_id.into_inner())
        .bind(preferences.channel.as_str())
        .bind(preferences.frequency.as_str())
        .bind(preferences.created_at)
        .bind(preferences.updated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            map_unique_violation(e, || DomainError::PreferencesAlreadyExist(preferences.user_id))
        })?;

        Preferences::try_from(model)
    }

    #[instrument(skip(self, preferences), fields(user_id = %preferences.user_id))]
    async fn update(&self, preferences: &Preferences) -> RepoResult<Preferences> {
        let model = sqlx::query_as::<_, PreferencesModel>(
            r#"
            UPDATE notification_preferences
            SET channel = $2, frequency = $3, updated_at = NOW()
            WHERE user_id = $1
            RETURNING id, user_id, channel, frequency, created_at, updated_at
            "#,
        )
        .bind(preferences.user_id.into_inner())
        .bind(preferences.channel.as_str())
        .bind(preferences.frequency.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?
        .ok_or_else(|| preferences_not_found(preferences.user_id))?;

        Preferences::try_from(model)
    }

    #[instrument(skip(self))]
    async fn get_or_create(&self, user_id: UserId) -> RepoResult<Preferences> {
        let inserted = sqlx::query(
            r#"
            INSERT INTO notification_preferences (user_id)
            VALUES ($1)
            ON CONFLICT (user_id) DO NOTHING
            "#,
        )
        .bind(user_id.into_inner())
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        if inserted.rows_affected() > 0 {
            debug!(%user_id, "Default preferences created");
        }

        self.find_by_user(user_id)
            .await?
            .ok_or_else(|| preferences_not_found(user_id))
    }
}
