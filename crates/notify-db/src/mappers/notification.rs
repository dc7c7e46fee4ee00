//! Notification model -> entity mapper

use notify_core::entities::Notification;
use notify_core::value_objects::{EventId, NotificationId, UserId};
use notify_core::DomainError;

use crate::models::NotificationModel;

impl TryFrom<NotificationModel> for Notification {
    type Error = DomainError;

    fn try_from(model: NotificationModel) -> Result<Self, Self::Error> {
        Ok(Notification {
            id: NotificationId::new(model.id),
            user_id: UserId::new(model.user_id),
            event_id: EventId::new(model.event_id),
            role: model.role,
            due: model.due,
            spawned: model.spawned,
            read: model.read,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}
