//! # notify-service
//!
//! Application layer: preferences, notification creation, spawning of due
//! notifications into dispatches, and delivery bookkeeping.

pub mod dto;
pub mod registry;
pub mod services;

pub use registry::{DispatchMapping, DispatchMappings, DispatchRegistry};
pub use services::{
    DispatchService, NotificationService, PreferencesService, ServiceContext,
    ServiceContextBuilder, ServiceError, ServiceResult, SpawnPass, SpawnService,
};

#[cfg(any(test, feature = "test-util"))]
pub mod fakes;
