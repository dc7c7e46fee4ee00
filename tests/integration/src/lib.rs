//! Integration test utilities for the notification worker
//!
//! This crate provides helpers for running end-to-end lifecycle tests
//! against PostgreSQL: create, spawn, read, and send.

pub mod fixtures;
pub mod helpers;

pub use fixtures::*;
pub use helpers::*;
