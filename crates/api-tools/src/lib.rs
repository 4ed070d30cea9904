//! # API Tools
//!
//! Tool-invocation front-end for RxPad.
//!
//! Handles:
//! - The four named tools and their argument schemas (`service`)
//! - The newline-delimited JSON-RPC transport over stdio (`transport`)
//!
//! Tool failures are reported as `Error: <message>` text payloads, never as transport errors.
//! Uses `rxpad-core` for every operation.

#![warn(rust_2018_idioms)]

pub mod service;
pub mod transport;

#[cfg(test)]
pub(crate) mod test_support;

pub use service::{ToolDefinition, ToolOutput, ToolService};
pub use transport::{serve, serve_stdio};
