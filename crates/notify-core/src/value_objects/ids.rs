//! Typed row identifiers
//!
//! Every table uses a `BIGSERIAL` primary key. Wrapping the raw `i64` in a
//! dedicated type per table keeps a notification id from being passed where a
//! dispatch id is expected.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            /// Wrap a raw database id
            #[inline]
            pub const fn new(id: i64) -> Self {
                Self(id)
            }

            /// Get the inner i64 value
            #[inline]
            pub const fn into_inner(self) -> i64 {
                self.0
            }

            /// Check if the id is zero (not yet persisted)
            #[inline]
            pub const fn is_unassigned(&self) -> bool {
                self.0 == 0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<i64> for $name {
            fn from(id: i64) -> Self {
                Self(id)
            }
        }

        impl From<$name> for i64 {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

define_id!(
    /// Id of a user row in the external users table
    UserId
);
define_id!(
    /// Id of an activity event in the external events table
    EventId
);
define_id!(
    /// Id of a `notification_preferences` row
    PreferencesId
);
define_id!(
    /// Id of a `notifications` row
    NotificationId
);
define_id!(
    /// Id of a `notification_dispatches` row
    DispatchId
);
