//! Table definitions for preferences, notifications and dispatches

use notify_common::SchemaSettings;

use super::{validate_identifier, SchemaError, TableSchema};

pub const PREFERENCES_TABLE: &str = "notification_preferences";
pub const NOTIFICATIONS_TABLE: &str = "notifications";
pub const DISPATCHES_TABLE: &str = "notification_dispatches";

/// CHECK constraints guarding the notification timestamps
pub const SPAWNED_AFTER_CREATED: &str = "notifications_spawned_after_created";
pub const READ_AFTER_CREATED: &str = "notifications_read_after_created";

/// External tables the notification tables reference
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaConfig {
    pub users_table: String,
    pub events_table: String,
}

impl Default for SchemaConfig {
    fn default() -> Self {
        Self {
            users_table: "auth_users".to_string(),
            events_table: "activity_events".to_string(),
        }
    }
}

impl From<&SchemaSettings> for SchemaConfig {
    fn from(settings: &SchemaSettings) -> Self {
        Self {
            users_table: settings.users_table.clone(),
            events_table: settings.events_table.clone(),
        }
    }
}

/// Build the definitions for all three tables, parents first
pub fn notification_schema(config: &SchemaConfig) -> Result<Vec<TableSchema>, SchemaError> {
    let users = validate_identifier(&config.users_table)?;
    let events = validate_identifier(&config.events_table)?;

    let preferences = TableSchema::new(PREFERENCES_TABLE).statement(format!(
        r#"
        CREATE TABLE IF NOT EXISTS {PREFERENCES_TABLE} (
            id BIGSERIAL PRIMARY KEY,
            user_id BIGINT NOT NULL UNIQUE REFERENCES {users}(id) ON DELETE CASCADE,
            channel VARCHAR(6) NOT NULL DEFAULT 'email',
            frequency VARCHAR(96) NOT NULL DEFAULT 'immediately',
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#
    ));

    let notifications = TableSchema::new(NOTIFICATIONS_TABLE)
        .statement(format!(
            r#"
            CREATE TABLE IF NOT EXISTS {NOTIFICATIONS_TABLE} (
                id BIGSERIAL PRIMARY KEY,
                user_id BIGINT NOT NULL REFERENCES {users}(id) ON DELETE CASCADE,
                event_id BIGINT NOT NULL REFERENCES {events}(id) ON DELETE CASCADE,
                role VARCHAR(64),
                due TIMESTAMPTZ NOT NULL,
                spawned TIMESTAMPTZ,
                read TIMESTAMPTZ,
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                CONSTRAINT {SPAWNED_AFTER_CREATED}
                    CHECK (spawned IS NULL OR spawned >= created_at),
                CONSTRAINT {READ_AFTER_CREATED}
                    CHECK (read IS NULL OR read >= created_at)
            )
            "#
        ))
        .statement(format!(
            "CREATE INDEX IF NOT EXISTS idx_notifications_user \
             ON {NOTIFICATIONS_TABLE} (user_id, created_at DESC)"
        ))
        .statement(format!(
            "CREATE INDEX IF NOT EXISTS idx_notifications_event ON {NOTIFICATIONS_TABLE} (event_id)"
        ))
        .statement(format!(
            "CREATE INDEX IF NOT EXISTS idx_notifications_unspawned_due \
             ON {NOTIFICATIONS_TABLE} (due) WHERE spawned IS NULL"
        ));

    let dispatches = TableSchema::new(DISPATCHES_TABLE)
        .statement(format!(
            r#"
            CREATE TABLE IF NOT EXISTS {DISPATCHES_TABLE} (
                id BIGSERIAL PRIMARY KEY,
                notification_id BIGINT NOT NULL
                    REFERENCES {NOTIFICATIONS_TABLE}(id) ON DELETE CASCADE,
                channel VARCHAR(6) NOT NULL CHECK (channel <> ''),
                view VARCHAR(128),
                spec VARCHAR(255),
                batch_spec VARCHAR(255),
                to_address VARCHAR(255),
                bcc_address VARCHAR(255),
                sent TIMESTAMPTZ,
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )
            "#
        ))
        .statement(format!(
            "CREATE INDEX IF NOT EXISTS idx_notification_dispatches_notification \
             ON {DISPATCHES_TABLE} (notification_id)"
        ))
        .statement(format!(
            "CREATE INDEX IF NOT EXISTS idx_notification_dispatches_pending \
             ON {DISPATCHES_TABLE} (created_at) WHERE sent IS NULL"
        ));

    Ok(vec![preferences, notifications, dispatches])
}
