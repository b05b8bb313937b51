//! HTTP module
//!
//! Provides the request executor and its configuration.
//!
//! # Features
//!
//! - **Authenticated JSON requests**: bearer token, JSON body, user agent
//! - **Error classification**: permanent vs temporary failures
//! - **Request timing**: every request is timed and logged
//! - **Calling context**: request-id and B3 trace header forwarding

mod client;
mod config;
mod context;

pub use client::{with_updated_by, ApiClient};
pub use config::{ClientConfig, ClientConfigBuilder, DEFAULT_REQUEST_ID_HEADER};
pub use context::{CallContext, SPAN_ID_HEADER, TRACE_ID_HEADER};
