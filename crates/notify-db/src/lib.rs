//! # notify-db
//!
//! Database layer implementing the notification repository traits with
//! PostgreSQL via SQLx.
//!
//! ## Overview
//!
//! - Connection pool management
//! - Explicit schema definitions and a schema initializer
//! - Database models with SQLx `FromRow` derives
//! - Model → entity mappers
//! - Repository implementations, including the claim-row spawn transaction
//!
//! ## Usage
//!
//! ```rust,ignore
//! use notify_db::{create_pool, initialize_schema, notification_schema, DatabaseConfig, SchemaConfig};
//! use notify_db::PgNotificationRepository;
//!
//! async fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     let pool = create_pool(&DatabaseConfig::from_env()).await?;
//!     initialize_schema(&pool, &notification_schema(&SchemaConfig::default())?).await?;
//!     let notifications = PgNotificationRepository::new(pool);
//!     Ok(())
//! }
//! ```

pub mod mappers;
pub mod models;
pub mod pool;
pub mod repositories;
pub mod schema;

// Re-export commonly used types
pub use pool::{create_pool, create_pool_from_env, DatabaseConfig, PgPool};
pub use repositories::{
    PgDispatchRepository, PgEventDirectory, PgNotificationRepository, PgPreferencesRepository,
    PgRecipientResolver,
};
pub use schema::{
    initialize_schema, notification_schema, SchemaConfig, SchemaError, TableSchema,
    SCHEMA_LOCK_KEY,
};
