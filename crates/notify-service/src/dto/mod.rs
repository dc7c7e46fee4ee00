//! Data transfer objects for service inputs and outputs
//!
//! This module provides:
//! - Request DTOs with validation
//! - Response DTOs for serializing results and reports
//! - Mappers for converting domain entities to DTOs

pub mod mappers;
pub mod requests;
pub mod responses;

pub use requests::{CreateNotificationRequest, UpdatePreferencesRequest};
pub use responses::{DispatchResponse, NotificationResponse, PreferencesResponse, SpawnReport};
