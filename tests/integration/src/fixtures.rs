//! Test fixtures and data generators
//!
//! Provides reusable test data for integration tests.

use std::sync::atomic::{AtomicU64, Ordering};

use notify_core::traits::{DispatchKey, DispatchTemplate};
use notify_core::value_objects::{Channel, EventId, UserId};
use notify_service::dto::CreateNotificationRequest;
use notify_service::DispatchRegistry;

/// Counter for unique test data
static COUNTER: AtomicU64 = AtomicU64::new(1);

/// Get a unique suffix for test data
pub fn unique_suffix() -> u64 {
    COUNTER.fetch_add(1, Ordering::SeqCst)
}

/// Unique email address for a seeded user
pub fn unique_email() -> String {
    format!(
        "user{}_{}@example.com",
        std::process::id(),
        unique_suffix()
    )
}

/// Registry shared by every lifecycle test
///
/// `Job/created` sends one email template to everyone, plus an SMS-only
/// template for vendors.
pub fn test_registry() -> DispatchRegistry {
    let mut registry = DispatchRegistry::new();
    registry
        .register(
            DispatchKey::new("Job", "created", None),
            DispatchTemplate {
                view: Some("jobs/created".to_string()),
                spec: Some("jobs/created_spec".to_string()),
                batch_spec: Some("jobs/digest".to_string()),
                ..Default::default()
            },
        )
        .register(
            DispatchKey::new("Job", "created", Some("vendor".to_string())),
            DispatchTemplate {
                channel: Some(Channel::Sms),
                view: Some("jobs/vendor_sms".to_string()),
                ..Default::default()
            },
        );
    registry
}

/// Notification request due immediately
pub fn notify_now(user_id: UserId, event_id: EventId, role: Option<&str>) -> CreateNotificationRequest {
    CreateNotificationRequest {
        user_id: user_id.into_inner(),
        event_id: event_id.into_inner(),
        role: role.map(str::to_string),
        delay_secs: None,
    }
}

/// Notification request due after `delay_secs`
pub fn notify_later(user_id: UserId, event_id: EventId, delay_secs: i64) -> CreateNotificationRequest {
    CreateNotificationRequest {
        delay_secs: Some(delay_secs),
        ..notify_now(user_id, event_id, None)
    }
}
