// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::doc_markdown)]

//! # JSON API Client
//!
//! An authenticated client for JSON REST APIs.
//!
//! ## Features
//!
//! - **Request executor**: bearer auth, JSON bodies, timed and logged calls
//! - **Error classification**: permanent vs temporary (429, 5xx, timeouts)
//! - **Retry with backoff**: exponential, capped, temporary errors only
//! - **Path builder**: `client.req().segment("users").segment(42).get()`
//! - **Lazy pagination**: follows `links.next` one page at a time
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use futures::StreamExt;
//! use json_api_client::{ApiClient, ClientConfig, Result};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let client = ApiClient::new(
//!         ClientConfig::builder()
//!             .base_url("https://api.example.com")
//!             .auth_token("token")
//!             .build(),
//!     )?;
//!
//!     let user = client.req().segment("users").segment(42).get().send().await?;
//!
//!     let mut users = client.iter_collection("users", client.req().segment("users").get());
//!     while let Some(user) = users.next().await {
//!         println!("{}", user?);
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! PathBuilder ──► BoundCall ──► retry::with_backoff ──► ApiClient::request
//!                     │                                        │
//!                     └──────── iter_collection ◄──── Page ◄───┘
//! ```

#![warn(clippy::all)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types and classification
pub mod error;

/// Common types and type aliases
pub mod types;

/// Request executor, configuration and calling context
pub mod http;

/// Retry with exponential backoff
pub mod retry;

/// Fluent resource path builder
pub mod path;

/// Linked collection pagination
pub mod pagination;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use http::{ApiClient, CallContext, ClientConfig, ClientConfigBuilder};
pub use pagination::{ModelStream, NextPage, Page};
pub use path::{BoundCall, PathAccess, PathBuilder};
pub use retry::{with_backoff, RetryPolicy};
pub use types::*;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
