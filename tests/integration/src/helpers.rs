//! Test helpers for integration tests
//!
//! Provides a connected service context over a freshly initialized schema
//! and helpers for seeding the external users and events tables.

use std::sync::Arc;

use anyhow::Result;
use notify_common::{AppConfig, SpawnerConfig};
use notify_core::value_objects::{EventId, UserId};
use notify_db::{
    create_pool, initialize_schema, notification_schema, DatabaseConfig, PgPool, SchemaConfig,
    SCHEMA_LOCK_KEY,
};
use notify_service::{DispatchRegistry, ServiceContext};
use notify_worker::SpawnWorker;

/// Connected test environment
pub struct TestEnv {
    pub config: AppConfig,
    pub pool: PgPool,
    pub ctx: ServiceContext,
}

impl TestEnv {
    /// Connect with the shared test registry
    pub async fn start() -> Result<Self> {
        Self::start_with_registry(crate::fixtures::test_registry()).await
    }

    /// Connect, create the stand-in external tables and the notification schema
    pub async fn start_with_registry(registry: DispatchRegistry) -> Result<Self> {
        let config = test_config()?;
        let pool = create_pool(&DatabaseConfig::from(&config.database)).await?;

        create_external_tables(&pool, &config).await?;
        let tables = notification_schema(&SchemaConfig::from(&config.schema))?;
        initialize_schema(&pool, &tables).await?;

        let ctx = ServiceContext::postgres(pool.clone(), &config.schema, Arc::new(registry))
            .map_err(|e| anyhow::anyhow!("Service context error: {e}"))?;

        Ok(Self { config, pool, ctx })
    }

    /// A worker over this environment's context
    pub fn worker(&self) -> SpawnWorker {
        SpawnWorker::new(
            self.ctx.clone(),
            &SpawnerConfig {
                interval_secs: 1,
                batch_size: 50,
                dispatch_config_path: None,
            },
        )
    }

    /// Insert a user with the given email and phone
    pub async fn seed_user(&self, email: &str, phone: Option<&str>) -> Result<UserId> {
        let schema = &self.config.schema;
        let phone_column = schema.users_phone_column.as_deref().unwrap_or("phone");
        let sql = format!(
            "INSERT INTO {} ({}, {phone_column}) VALUES ($1, $2) RETURNING id",
            schema.users_table, schema.users_email_column
        );
        let id: i64 = sqlx::query_scalar(&sql)
            .bind(email)
            .bind(phone)
            .fetch_one(&self.pool)
            .await?;
        Ok(UserId::new(id))
    }

    /// Insert an event of the given context and type
    pub async fn seed_event(&self, context_type: &str, event_type: &str) -> Result<EventId> {
        let schema = &self.config.schema;
        let sql = format!(
            "INSERT INTO {} ({}, {}) VALUES ($1, $2) RETURNING id",
            schema.events_table, schema.events_context_type_column, schema.events_type_column
        );
        let id: i64 = sqlx::query_scalar(&sql)
            .bind(context_type)
            .bind(event_type)
            .fetch_one(&self.pool)
            .await?;
        Ok(EventId::new(id))
    }
}

/// Minimal versions of the tables owned by the host application
async fn create_external_tables(pool: &PgPool, config: &AppConfig) -> Result<()> {
    let schema = &config.schema;
    let phone_column = schema.users_phone_column.as_deref().unwrap_or("phone");

    let mut tx = pool.begin().await?;
    sqlx::query("SELECT pg_advisory_xact_lock($1)")
        .bind(SCHEMA_LOCK_KEY)
        .execute(&mut *tx)
        .await?;

    sqlx::query(&format!(
        "CREATE TABLE IF NOT EXISTS {} (id BIGSERIAL PRIMARY KEY, {} TEXT, {phone_column} TEXT)",
        schema.users_table, schema.users_email_column
    ))
    .execute(&mut *tx)
    .await?;

    sqlx::query(&format!(
        "CREATE TABLE IF NOT EXISTS {} (id BIGSERIAL PRIMARY KEY, {} TEXT, {} TEXT)",
        schema.events_table, schema.events_context_type_column, schema.events_type_column
    ))
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(())
}

/// Create a test configuration
pub fn test_config() -> Result<AppConfig> {
    // Load from environment or use defaults
    dotenvy::dotenv().ok();

    let config = AppConfig::from_env().map_err(|e| anyhow::anyhow!("Config error: {e}"))?;

    Ok(config)
}

/// Helper to check if test environment is available
pub fn check_test_env() -> bool {
    if std::env::var("DATABASE_URL").is_err() {
        eprintln!("Skipping test: DATABASE_URL not set");
        return false;
    }

    true
}
