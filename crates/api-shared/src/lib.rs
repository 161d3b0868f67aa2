//! # API Shared
//!
//! Shared utilities and definitions for HMS APIs.
//!
//! Contains:
//! - Wire types (`types` module) with OpenAPI schemas
//! - Shared services like `HealthService`
//! - Authentication header helpers
//!
//! Used by `api-rest` and the `hms-run` binary.

pub mod auth;
pub mod health;
pub mod types;

pub use health::HealthService;
pub use types::*;
