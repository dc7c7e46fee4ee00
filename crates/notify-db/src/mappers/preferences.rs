//! Preferences model -> entity mapper

use notify_core::entities::Preferences;
use notify_core::value_objects::{Channel, Frequency, PreferencesId, UserId};
use notify_core::DomainError;

use crate::models::PreferencesModel;

impl TryFrom<PreferencesModel> for Preferences {
    type Error = DomainError;

    fn try_from(model: PreferencesModel) -> Result<Self, Self::Error> {
        Ok(Preferences {
            id: PreferencesId::new(model.id),
            user_id: UserId::new(model.user_id),
            channel: Channel::parse(&model.channel)?,
            frequency: Frequency::parse(&model.frequency)?,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}
