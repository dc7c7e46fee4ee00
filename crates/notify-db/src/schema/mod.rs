//! Explicit schema definitions
//!
//! The notification tables are described as plain data and handed to
//! [`initialize_schema`] at process start. There is no global registry: the
//! caller decides which definitions to apply and when.

mod definitions;
mod identifier;

pub use definitions::{
    notification_schema, SchemaConfig, DISPATCHES_TABLE, NOTIFICATIONS_TABLE, PREFERENCES_TABLE,
    READ_AFTER_CREATED, SPAWNED_AFTER_CREATED,
};
pub use identifier::validate_identifier;

use sqlx::PgPool;
use tracing::{info, instrument};

/// Schema errors
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    #[error("Invalid SQL identifier: {0:?}")]
    InvalidIdentifier(String),

    #[error("Failed to apply schema for {table}: {source}")]
    Apply {
        table: &'static str,
        #[source]
        source: sqlx::Error,
    },

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// DDL for one table and its indexes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSchema {
    pub name: &'static str,
    pub statements: Vec<String>,
}

impl TableSchema {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            statements: Vec::new(),
        }
    }

    pub fn statement(mut self, sql: impl Into<String>) -> Self {
        self.statements.push(sql.into());
        self
    }
}

/// Advisory lock key held while the schema is applied
pub const SCHEMA_LOCK_KEY: i64 = 0x6e6f_7469_6679;

/// Apply table definitions in order inside a single transaction.
///
/// Every statement is idempotent (`IF NOT EXISTS`), so this is safe to run on
/// each start. Concurrent callers are serialized on [`SCHEMA_LOCK_KEY`].
#[instrument(skip_all, fields(tables = tables.len()))]
pub async fn initialize_schema(pool: &PgPool, tables: &[TableSchema]) -> Result<(), SchemaError> {
    let mut tx = pool.begin().await?;

    sqlx::query("SELECT pg_advisory_xact_lock($1)")
        .bind(SCHEMA_LOCK_KEY)
        .execute(&mut *tx)
        .await?;

    for table in tables {
        for statement in &table.statements {
            sqlx::query(statement)
                .execute(&mut *tx)
                .await
                .map_err(|source| SchemaError::Apply {
                    table: table.name,
                    source,
                })?;
        }
        info!(table = table.name, "Schema applied");
    }

    tx.commit().await?;
    Ok(())
}
