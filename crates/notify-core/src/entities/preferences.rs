//! Preferences entity - how and when a user wants to be notified

use chrono::{DateTime, Utc};

use crate::value_objects::{Channel, Frequency, PreferencesId, UserId};

/// A user's notification preferences (one row per user)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Preferences {
    pub id: PreferencesId,
    pub user_id: UserId,
    pub channel: Channel,
    pub frequency: Frequency,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Preferences {
    /// Create preferences with the defaults (email, immediately)
    pub fn new(user_id: UserId) -> Self {
        let now = Utc::now();
        Self {
            id: PreferencesId::default(),
            user_id,
            channel: Channel::default(),
            frequency: Frequency::default(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_channel(mut self, channel: Channel) -> Self {
        self.channel = channel;
        self
    }

    pub fn with_frequency(mut self, frequency: Frequency) -> Self {
        self.frequency = frequency;
        self
    }

    /// True iff the user never wants to be notified
    #[inline]
    pub fn is_disabled(&self) -> bool {
        self.frequency == Frequency::Never
    }

    /// Negation of [`Preferences::is_disabled`]
    #[inline]
    pub fn is_enabled(&self) -> bool {
        !self.is_disabled()
    }

    /// True iff notifications should be dispatched as soon as they are due
    #[inline]
    pub fn wants_immediate(&self) -> bool {
        self.frequency == Frequency::Immediately
    }

    pub fn set_channel(&mut self, channel: Channel) {
        self.channel = channel;
        self.updated_at = Utc::now();
    }

    pub fn set_frequency(&mut self, frequency: Frequency) {
        self.frequency = frequency;
        self.updated_at = Utc::now();
    }
}
