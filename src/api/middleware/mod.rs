//! HTTP middleware.
//!
//! - [`tracing`] - Request/response tracing

pub mod tracing;
