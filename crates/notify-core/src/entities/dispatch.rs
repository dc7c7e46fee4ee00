//! Dispatch entity - one delivery attempt of a notification

use chrono::{DateTime, Utc};

use super::check_len;
use crate::error::DomainError;
use crate::value_objects::{Channel, DispatchId, NotificationId};

/// Delivery of a notification through a channel to an address
///
/// `to_address` and `bcc_address` hold whatever primary identifier the
/// channel needs (email address, phone number, ...).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dispatch {
    pub id: DispatchId,
    pub notification_id: NotificationId,
    pub channel: Channel,
    pub view: Option<String>,
    pub spec: Option<String>,
    pub batch_spec: Option<String>,
    pub to_address: Option<String>,
    pub bcc_address: Option<String>,
    pub sent: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Dispatch {
    pub const VIEW_MAX_LEN: usize = 128;
    pub const SPEC_MAX_LEN: usize = 255;
    pub const ADDRESS_MAX_LEN: usize = 255;

    /// Create a new unsent dispatch
    pub fn new(notification_id: NotificationId, channel: Channel) -> Self {
        let now = Utc::now();
        Self {
            id: DispatchId::default(),
            notification_id,
            channel,
            view: None,
            spec: None,
            batch_spec: None,
            to_address: None,
            bcc_address: None,
            sent: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_view(mut self, view: Option<String>) -> Self {
        self.view = view;
        self
    }

    pub fn with_spec(mut self, spec: Option<String>) -> Self {
        self.spec = spec;
        self
    }

    pub fn with_batch_spec(mut self, batch_spec: Option<String>) -> Self {
        self.batch_spec = batch_spec;
        self
    }

    pub fn with_to_address(mut self, to_address: Option<String>) -> Self {
        self.to_address = to_address;
        self
    }

    pub fn with_bcc_address(mut self, bcc_address: Option<String>) -> Self {
        self.bcc_address = bcc_address;
        self
    }

    /// Check column limits before persisting
    pub fn validate(&self) -> Result<(), DomainError> {
        check_len("view", self.view.as_deref(), Self::VIEW_MAX_LEN)?;
        check_len("spec", self.spec.as_deref(), Self::SPEC_MAX_LEN)?;
        check_len("batch_spec", self.batch_spec.as_deref(), Self::SPEC_MAX_LEN)?;
        check_len("to_address", self.to_address.as_deref(), Self::ADDRESS_MAX_LEN)?;
        check_len("bcc_address", self.bcc_address.as_deref(), Self::ADDRESS_MAX_LEN)
    }

    /// Not sent yet
    #[inline]
    pub fn is_pending(&self) -> bool {
        self.sent.is_none()
    }

    /// Stamp `sent`. Idempotent: returns false and keeps the first value if
    /// it was already sent.
    pub fn mark_sent(&mut self, at: DateTime<Utc>) -> bool {
        if self.sent.is_some() {
            return false;
        }
        self.sent = Some(at);
        self.updated_at = at;
        true
    }
}
