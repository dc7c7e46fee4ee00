//! Dispatch model -> entity mapper

use notify_core::entities::Dispatch;
use notify_core::value_objects::{Channel, DispatchId, NotificationId};
use notify_core::DomainError;

use crate::models::DispatchModel;

impl TryFrom<DispatchModel> for Dispatch {
    type Error = DomainError;

    fn try_from(model: DispatchModel) -> Result<Self, Self::Error> {
        Ok(Dispatch {
            id: DispatchId::new(model.id),
            notification_id: NotificationId::new(model.notification_id),
            channel: Channel::parse(&model.channel)?,
            view: model.view,
            spec: model.spec,
            batch_spec: model.batch_spec,
            to_address: model.to_address,
            bcc_address: model.bcc_address,
            sent: model.sent,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}
