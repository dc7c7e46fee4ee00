//! Preferences service
//!
//! Reads and changes how (channel) and how often (frequency) a user is
//! notified.

use tracing::{info, instrument};
use validator::Validate;

use notify_core::value_objects::{Channel, Frequency, UserId};

use crate::dto::{PreferencesResponse, UpdatePreferencesRequest};

use super::context::ServiceContext;
use super::error::ServiceResult;

/// Preferences service
pub struct PreferencesService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> PreferencesService<'a> {
    /// Create a new PreferencesService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Get a user's preferences, creating the default row on first access
    #[instrument(skip(self))]
    pub async fn get_preferences(&self, user_id: UserId) -> ServiceResult<PreferencesResponse> {
        let prefs = self.ctx.preferences_repo().get_or_create(user_id).await?;
        Ok(PreferencesResponse::from(prefs))
    }

    /// Update a user's channel and/or frequency
    #[instrument(skip(self, request))]
    pub async fn update_preferences(
        &self,
        user_id: UserId,
        request: UpdatePreferencesRequest,
    ) -> ServiceResult<PreferencesResponse> {
        request.validate()?;

        // Parse before touching storage so a bad value changes nothing
        let channel = request.channel.as_deref().map(Channel::parse).transpose()?;
        let frequency = request
            .frequency
            .as_deref()
            .map(Frequency::parse)
            .transpose()?;

        let mut prefs = self.ctx.preferences_repo().get_or_create(user_id).await?;

        let mut changed = false;
        if let Some(channel) = channel.filter(|c| *c != prefs.channel) {
            prefs.set_channel(channel);
            changed = true;
        }
        if let Some(frequency) = frequency.filter(|f| *f != prefs.frequency) {
            prefs.set_frequency(frequency);
            changed = true;
        }

        if changed {
            prefs = self.ctx.preferences_repo().update(&prefs).await?;
            info!(
                user_id = %user_id,
                channel = prefs.channel.as_str(),
                frequency = prefs.frequency.as_str(),
                "Notification preferences updated"
            );
        }

        Ok(PreferencesResponse::from(prefs))
    }
}
