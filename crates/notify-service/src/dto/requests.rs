//! Request DTOs
//!
//! All request DTOs implement `Deserialize` and `Validate` for input validation.

use serde::Deserialize;
use validator::Validate;

// ============================================================================
// Notification Requests
// ============================================================================

/// Create a notification for a user about an event
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateNotificationRequest {
    #[validate(range(min = 1, message = "User id must be positive"))]
    pub user_id: i64,

    #[validate(range(min = 1, message = "Event id must be positive"))]
    pub event_id: i64,

    /// Role the user matched for this event
    #[validate(length(min = 1, max = 64, message = "Role must be 1-64 characters"))]
    pub role: Option<String>,

    /// Seconds from now until the notification falls due
    #[validate(range(min = 0, max = 31_536_000, message = "Delay must be 0 to 1 year"))]
    pub delay_secs: Option<i64>,
}

// ============================================================================
// Preferences Requests
// ============================================================================

/// Change a user's channel and/or frequency
#[derive(Debug, Clone, Deserialize, Validate, Default)]
pub struct UpdatePreferencesRequest {
    #[validate(length(min = 1, max = 6, message = "Channel must be 1-6 characters"))]
    pub channel: Option<String>,

    #[validate(length(min = 1, max = 32, message = "Frequency must be 1-32 characters"))]
    pub frequency: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_notification_validation() {
        let valid = CreateNotificationRequest {
            user_id: 1,
            event_id: 2,
            role: Some("customer".to_string()),
            delay_secs: Some(3600),
        };
        assert!(valid.validate().is_ok());

        // Invalid - empty role
        let empty_role = CreateNotificationRequest {
            role: Some(String::new()),
            ..valid.clone()
        };
        assert!(empty_role.validate().is_err());

        // Invalid - role too long
        let long_role = CreateNotificationRequest {
            role: Some("r".repeat(65)),
            ..valid.clone()
        };
        assert!(long_role.validate().is_err());

        // Invalid - negative delay
        let negative = CreateNotificationRequest {
            delay_secs: Some(-1),
            ..valid.clone()
        };
        assert!(negative.validate().is_err());

        // Invalid - unassigned user id
        let no_user = CreateNotificationRequest {
            user_id: 0,
            ..valid
        };
        assert!(no_user.validate().is_err());
    }

    #[test]
    fn test_update_preferences_validation() {
        assert!(UpdatePreferencesRequest::default().validate().is_ok());

        let valid = UpdatePreferencesRequest {
            channel: Some("sms".to_string()),
            frequency: Some("never".to_string()),
        };
        assert!(valid.validate().is_ok());

        let long_channel = UpdatePreferencesRequest {
            channel: Some("carrier-pigeon".to_string()),
            frequency: None,
        };
        assert!(long_channel.validate().is_err());
    }
}
