//! Dispatch configuration registry
//!
//! Maps `(context type, event type, role)` to the dispatch templates a
//! notification spawns. Built once at process start, either in code or from a
//! mapping file, and handed to the services through the context.

use std::collections::HashMap;

use config::{Config, File, FileFormat};
use serde::Deserialize;
use tracing::debug;

use notify_common::AppError;
use notify_core::traits::{DispatchConfigLookup, DispatchKey, DispatchTemplate};
use notify_core::value_objects::Channel;

use crate::services::ServiceResult;

/// One entry of a mapping file
#[derive(Debug, Clone, Deserialize)]
pub struct DispatchMapping {
    pub context_type: String,
    pub event_type: String,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub channel: Option<Channel>,
    #[serde(default)]
    pub view: Option<String>,
    #[serde(default)]
    pub spec: Option<String>,
    #[serde(default)]
    pub batch_spec: Option<String>,
    #[serde(default)]
    pub bcc_address: Option<String>,
}

impl DispatchMapping {
    fn into_parts(self) -> (DispatchKey, DispatchTemplate) {
        (
            DispatchKey::new(self.context_type, self.event_type, self.role),
            DispatchTemplate {
                channel: self.channel,
                view: self.view,
                spec: self.spec,
                batch_spec: self.batch_spec,
                bcc_address: self.bcc_address,
            },
        )
    }
}

/// Top-level shape of a mapping file
///
/// ```toml
/// [[dispatches]]
/// context_type = "Job"
/// event_type = "created"
/// role = "customer"
/// view = "jobs/created"
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DispatchMappings {
    #[serde(default)]
    pub dispatches: Vec<DispatchMapping>,
}

/// In-memory dispatch configuration
///
/// Registrations with a role only match notifications carrying that role.
/// Registrations without a role apply to every role that has no registration
/// of its own.
#[derive(Debug, Clone, Default)]
pub struct DispatchRegistry {
    entries: HashMap<DispatchKey, Vec<DispatchTemplate>>,
}

impl DispatchRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a template under `key`
    pub fn register(&mut self, key: DispatchKey, template: DispatchTemplate) -> &mut Self {
        self.entries.entry(key).or_default().push(template);
        self
    }

    /// Build a registry from parsed mappings
    pub fn from_mappings(mappings: DispatchMappings) -> Self {
        let mut registry = Self::new();
        for mapping in mappings.dispatches {
            let (key, template) = mapping.into_parts();
            registry.register(key, template);
        }
        registry
    }

    /// Load a mapping file; the format follows the file extension
    ///
    /// # Errors
    /// Returns `AppError::Config` if the file is missing or malformed
    pub fn load(path: &str) -> ServiceResult<Self> {
        let mappings = Config::builder()
            .add_source(File::with_name(path).required(true))
            .build()
            .and_then(|c| c.try_deserialize::<DispatchMappings>())
            .map_err(|e| AppError::Config(format!("dispatch mappings {path}: {e}")))?;

        let registry = Self::from_mappings(mappings);
        debug!(path, keys = registry.len(), "Loaded dispatch mappings");
        Ok(registry)
    }

    /// Parse mappings held in memory
    ///
    /// # Errors
    /// Returns `AppError::Config` if the content is malformed
    pub fn parse(content: &str, format: FileFormat) -> ServiceResult<Self> {
        let mappings = Config::builder()
            .add_source(File::from_str(content, format))
            .build()
            .and_then(|c| c.try_deserialize::<DispatchMappings>())
            .map_err(|e| AppError::Config(format!("dispatch mappings: {e}")))?;

        Ok(Self::from_mappings(mappings))
    }

    /// Number of distinct keys
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl DispatchConfigLookup for DispatchRegistry {
    fn lookup(&self, key: &DispatchKey) -> Vec<DispatchTemplate> {
        if key.role.is_some() {
            if let Some(templates) = self.entries.get(key) {
                return templates.clone();
            }
        }
        self.entries
            .get(&key.any_role())
            .cloned()
            .unwrap_or_default()
    }
}
