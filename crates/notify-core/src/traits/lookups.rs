//! Lookups consulted at spawn time
//!
//! Dispatch configuration is registered against `(context type, event type,
//! role)` and looked up when a notification spawns rather than when it is
//! created, so dispatches always use the latest configuration.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::repositories::RepoResult;
use crate::value_objects::{Channel, EventId, UserId};

/// What a dispatch configuration is registered against
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DispatchKey {
    pub context_type: String,
    pub event_type: String,
    pub role: Option<String>,
}

impl DispatchKey {
    pub fn new(
        context_type: impl Into<String>,
        event_type: impl Into<String>,
        role: Option<String>,
    ) -> Self {
        Self {
            context_type: context_type.into(),
            event_type: event_type.into(),
            role,
        }
    }

    /// Same key with the role dropped
    pub fn any_role(&self) -> Self {
        Self {
            context_type: self.context_type.clone(),
            event_type: self.event_type.clone(),
            role: None,
        }
    }
}

/// Blueprint for one dispatch
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchTemplate {
    /// Restrict to users whose preferred channel matches
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

impl DispatchTemplate {
    /// Whether this template produces a dispatch for the given channel
    pub fn applies_to(&self, channel: Channel) -> bool {
        self.channel.is_none_or(|c| c == channel)
    }
}

/// Spawn-time source of dispatch templates
pub trait DispatchConfigLookup: Send + Sync {
    fn lookup(&self, key: &DispatchKey) -> Vec<DispatchTemplate>;
}

/// The parts of an activity event needed to key a dispatch lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventSummary {
    pub id: EventId,
    pub context_type: String,
    pub event_type: String,
}

/// Read access to the external events table
#[async_trait]
pub trait EventDirectory: Send + Sync {
    async fn find_event(&self, id: EventId) -> RepoResult<Option<EventSummary>>;
}

/// Resolves the address a channel delivers to
#[async_trait]
pub trait RecipientResolver: Send + Sync {
    async fn resolve(&self, user_id: UserId, channel: Channel) -> RepoResult<Option<String>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_any_role_drops_role() {
        let key = DispatchKey::new("Job", "created", Some("customer".into()));
        let any = key.any_role();
        assert_eq!(any.context_type, "Job");
        assert_eq!(any.event_type, "created");
        assert!(any.role.is_none());
    }

    #[test]
    fn test_template_channel_filter() {
        let open = DispatchTemplate::default();
        assert!(open.applies_to(Channel::Email));
        assert!(open.applies_to(Channel::Sms));

        let sms_only = DispatchTemplate {
            channel: Some(Channel::Sms),
            ..Default::default()
        };
        assert!(sms_only.applies_to(Channel::Sms));
        assert!(!sms_only.applies_to(Channel::Email));
    }

    #[test]
    fn test_template_deserializes_with_defaults() {
        let template: DispatchTemplate =
            serde_json::from_str(r#"{"view": "job_created", "channel": "email"}"#).unwrap();
        assert_eq!(template.view.as_deref(), Some("job_created"));
        assert_eq!(template.channel, Some(Channel::Email));
        assert!(template.spec.is_none());
    }
}
