//! CLI module
//!
//! Command-line interface over the client library.
//!
//! # Commands
//!
//! - `status` - Query the API health endpoint
//! - `get` - Send a single GET to a resource path
//! - `list` - Stream every item of a paginated collection

mod commands;
mod runner;

pub use commands::{parse_key_val, Cli, Commands, OutputFormat};
pub use runner::Runner;
