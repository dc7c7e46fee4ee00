//! Business logic services
//!
//! Services borrow a `ServiceContext` and orchestrate domain operations over
//! the repositories and spawn-time lookups it holds.

pub mod context;
pub mod dispatch;
pub mod error;
pub mod notification;
pub mod preferences;
pub mod spawn;

pub use context::{ServiceContext, ServiceContextBuilder};
pub use dispatch::DispatchService;
pub use error::{ServiceError, ServiceResult};
pub use notification::NotificationService;
pub use preferences::PreferencesService;
pub use spawn::{SpawnPass, SpawnService};
