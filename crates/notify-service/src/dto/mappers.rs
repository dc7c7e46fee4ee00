//! Entity to DTO mappers
//!
//! Implements `From` conversions from domain entities to response DTOs.

use notify_core::entities::{Dispatch, Notification, Preferences};

use super::responses::{DispatchResponse, NotificationResponse, PreferencesResponse};

impl From<&Preferences> for PreferencesResponse {
    fn from(prefs: &Preferences) -> Self {
        Self {
            user_id: prefs.user_id,
            channel: prefs.channel,
            frequency: prefs.frequency,
            enabled: prefs.is_enabled(),
            updated_at: prefs.updated_at,
        }
    }
}

impl From<Preferences> for PreferencesResponse {
    fn from(prefs: Preferences) -> Self {
        Self::from(&prefs)
    }
}

impl From<Notification> for NotificationResponse {
    fn from(notification: Notification) -> Self {
        Self {
            id: notification.id,
            user_id: notification.user_id,
            event_id: notification.event_id,
            role: notification.role,
            due: notification.due,
            spawned: notification.spawned,
            read: notification.read,
            created_at: notification.created_at,
        }
    }
}

impl From<Dispatch> for DispatchResponse {
    fn from(dispatch: Dispatch) -> Self {
        Self {
            id: dispatch.id,
            notification_id: dispatch.notification_id,
            channel: dispatch.channel,
            view: dispatch.view,
            spec: dispatch.spec,
            batch_spec: dispatch.batch_spec,
            to_address: dispatch.to_address,
            bcc_address: dispatch.bcc_address,
            sent: dispatch.sent,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use notify_core::value_objects::{Frequency, UserId};

    #[test]
    fn test_preferences_response_reports_enabled() {
        let prefs = Preferences::new(UserId::new(1)).with_frequency(Frequency::Never);
        let response = PreferencesResponse::from(&prefs);
        assert!(!response.enabled);

        let response = PreferencesResponse::from(prefs.with_frequency(Frequency::Weekly));
        assert!(response.enabled);
    }
}
