//! # API Shared
//!
//! Shared definitions for the RxPad front-ends.
//!
//! Contains:
//! - Wire types (`wire` module) serialised by both the REST and tool surfaces
//! - Shared services like `HealthService`
//!
//! Used by `rxpad-core`, `api-rest` and `api-tools`.

pub mod health;
pub mod wire;

pub use health::HealthService;
pub use wire::*;
