//! Application configuration structs
//!
//! Loads configuration from environment variables (and a `.env` file if present).

use serde::Deserialize;
use std::env;
use std::str::FromStr;
use std::time::Duration;

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub app: AppSettings,
    pub database: DatabaseConfig,
    pub spawner: SpawnerConfig,
    pub schema: SchemaSettings,
}

/// General application settings
#[derive(Debug, Clone, Deserialize)]
pub struct AppSettings {
    #[serde(default = "default_app_name")]
    pub name: String,
    #[serde(default = "default_env")]
    pub env: Environment,
}

/// Environment type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    #[must_use]
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }

    #[must_use]
    pub fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }

    fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "production" => Some(Self::Production),
            "staging" => Some(Self::Staging),
            "development" => Some(Self::Development),
            _ => None,
        }
    }
}

/// Database configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

/// Spawn loop configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SpawnerConfig {
    #[serde(default = "default_spawn_interval_secs")]
    pub interval_secs: u64,
    #[serde(default = "default_spawn_batch_size")]
    pub batch_size: i64,
    /// File with the dispatch mappings registered at startup
    #[serde(default)]
    pub dispatch_config_path: Option<String>,
}

impl SpawnerConfig {
    /// Loop period; never shorter than one second
    #[must_use]
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs.max(1))
    }
}

/// Names of the external tables the notification schema points at
#[derive(Debug, Clone, Deserialize)]
pub struct SchemaSettings {
    /// Create the notification tables at startup
    #[serde(default)]
    pub auto_create: bool,
    #[serde(default = "default_users_table")]
    pub users_table: String,
    #[serde(default = "default_users_email_column")]
    pub users_email_column: String,
    #[serde(default)]
    pub users_phone_column: Option<String>,
    #[serde(default = "default_events_table")]
    pub events_table: String,
    #[serde(default = "default_events_context_type_column")]
    pub events_context_type_column: String,
    #[serde(default = "default_events_type_column")]
    pub events_type_column: String,
}

impl Default for SchemaSettings {
    fn default() -> Self {
        Self {
            auto_create: false,
            users_table: default_users_table(),
            users_email_column: default_users_email_column(),
            users_phone_column: None,
            events_table: default_events_table(),
            events_context_type_column: default_events_context_type_column(),
            events_type_column: default_events_type_column(),
        }
    }
}

// Default value functions
fn default_app_name() -> String {
    "notify-worker".to_string()
}

fn default_env() -> Environment {
    Environment::Development
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

fn default_spawn_interval_secs() -> u64 {
    30
}

fn default_spawn_batch_size() -> i64 {
    100
}

fn default_users_table() -> String {
    "auth_users".to_string()
}

fn default_users_email_column() -> String {
    "email".to_string()
}

fn default_events_table() -> String {
    "activity_events".to_string()
}

fn default_events_context_type_column() -> String {
    "parent_type".to_string()
}

fn default_events_type_column() -> String {
    "type_".to_string()
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    /// Returns an error if required environment variables are missing or malformed
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let schema_defaults = SchemaSettings::default();

        Ok(Self {
            app: AppSettings {
                name: lookup("APP_NAME").unwrap_or_else(default_app_name),
                env: lookup("APP_ENV")
                    .and_then(|s| Environment::parse(&s))
                    .unwrap_or_default(),
            },
            database: DatabaseConfig {
                url: lookup("DATABASE_URL").ok_or(ConfigError::MissingVar("DATABASE_URL"))?,
                max_connections: parse_var(&lookup, "DATABASE_MAX_CONNECTIONS")?
                    .unwrap_or_else(default_max_connections),
                min_connections: parse_var(&lookup, "DATABASE_MIN_CONNECTIONS")?
                    .unwrap_or_else(default_min_connections),
            },
            spawner: SpawnerConfig {
                interval_secs: parse_var(&lookup, "SPAWN_INTERVAL_SECS")?
                    .unwrap_or_else(default_spawn_interval_secs),
                batch_size: parse_var(&lookup, "SPAWN_BATCH_SIZE")?
                    .unwrap_or_else(default_spawn_batch_size),
                dispatch_config_path: lookup("DISPATCH_CONFIG_PATH"),
            },
            schema: SchemaSettings {
                auto_create: parse_flag(&lookup, "SCHEMA_AUTO_CREATE")?.unwrap_or(false),
                users_table: lookup("USERS_TABLE").unwrap_or(schema_defaults.users_table),
                users_email_column: lookup("USERS_EMAIL_COLUMN")
                    .unwrap_or(schema_defaults.users_email_column),
                users_phone_column: lookup("USERS_PHONE_COLUMN"),
                events_table: lookup("EVENTS_TABLE").unwrap_or(schema_defaults.events_table),
                events_context_type_column: lookup("EVENTS_CONTEXT_TYPE_COLUMN")
                    .unwrap_or(schema_defaults.events_context_type_column),
                events_type_column: lookup("EVENTS_TYPE_COLUMN")
                    .unwrap_or(schema_defaults.events_type_column),
            },
        })
    }
}

fn parse_var<F, T>(lookup: &F, key: &'static str) -> Result<Option<T>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    lookup(key)
        .map(|raw| {
            raw.trim()
                .parse()
                .map_err(|_| ConfigError::InvalidValue(key, raw))
        })
        .transpose()
}

fn parse_flag<F>(lookup: &F, key: &'static str) -> Result<Option<bool>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|raw| match raw.trim().to_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            _ => Err(ConfigError::InvalidValue(key, raw)),
        })
        .transpose()
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(&'static str),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_environment_is_production() {
        assert!(!Environment::Development.is_production());
        assert!(!Environment::Staging.is_production());
        assert!(Environment::Production.is_production());
    }

    #[test]
    fn test_environment_is_development() {
        assert!(Environment::Development.is_development());
        assert!(!Environment::Staging.is_development());
        assert!(!Environment::Production.is_development());
    }

    #[test]
    fn test_minimal_config_uses_defaults() {
        let config =
            AppConfig::from_lookup(lookup_from(&[("DATABASE_URL", "postgres://localhost/n")]))
                .unwrap();
        assert_eq!(config.app.name, "notify-worker");
        assert_eq!(config.app.env, Environment::Development);
        assert_eq!(config.database.max_connections, 10);
        assert_eq!(config.spawner.interval(), Duration::from_secs(30));
        assert_eq!(config.spawner.batch_size, 100);
        assert!(config.spawner.dispatch_config_path.is_none());
        assert!(!config.schema.auto_create);
        assert_eq!(config.schema.users_table, "auth_users");
        assert_eq!(config.schema.events_table, "activity_events");
    }

    #[test]
    fn test_missing_database_url() {
        let err = AppConfig::from_lookup(lookup_from(&[])).unwrap_err();
        assert!(matches!(err, ConfigError::MissingVar("DATABASE_URL")));
    }

    #[test]
    fn test_overrides() {
        let config = AppConfig::from_lookup(lookup_from(&[
            ("DATABASE_URL", "postgres://localhost/n"),
            ("APP_ENV", "Production"),
            ("SPAWN_INTERVAL_SECS", "5"),
            ("SPAWN_BATCH_SIZE", "25"),
            ("SCHEMA_AUTO_CREATE", "true"),
            ("USERS_TABLE", "users"),
            ("USERS_PHONE_COLUMN", "phone"),
            ("DISPATCH_CONFIG_PATH", "dispatch.toml"),
        ]))
        .unwrap();
        assert!(config.app.env.is_production());
        assert_eq!(config.spawner.interval_secs, 5);
        assert_eq!(config.spawner.batch_size, 25);
        assert!(config.schema.auto_create);
        assert_eq!(config.schema.users_table, "users");
        assert_eq!(config.schema.users_phone_column.as_deref(), Some("phone"));
        assert_eq!(
            config.spawner.dispatch_config_path.as_deref(),
            Some("dispatch.toml")
        );
    }

    #[test]
    fn test_invalid_number() {
        let err = AppConfig::from_lookup(lookup_from(&[
            ("DATABASE_URL", "postgres://localhost/n"),
            ("SPAWN_BATCH_SIZE", "lots"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue("SPAWN_BATCH_SIZE", _)));
    }

    #[test]
    fn test_invalid_flag() {
        let err = AppConfig::from_lookup(lookup_from(&[
            ("DATABASE_URL", "postgres://localhost/n"),
            ("SCHEMA_AUTO_CREATE", "maybe"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue("SCHEMA_AUTO_CREATE", _)));
    }
}
