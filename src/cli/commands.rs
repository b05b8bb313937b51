//! CLI commands and argument parsing

use clap::{Parser, Subcommand};
use std::time::Duration;

/// JSON API client CLI
#[derive(Parser, Debug)]
#[command(name = "json-api-client")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// API base URL
    #[arg(short, long, global = true, env = "API_BASE_URL", default_value = "")]
    pub base_url: String,

    /// Bearer token sent with every request
    #[arg(short = 't', long, global = true, env = "API_AUTH_TOKEN", default_value = "")]
    pub auth_token: String,

    /// Send requests at all (false turns every call into a no-op)
    #[arg(
        long,
        global = true,
        env = "API_ENABLED",
        default_value_t = true,
        action = clap::ArgAction::Set
    )]
    pub enabled: bool,

    /// Header carrying the request id
    #[arg(
        long,
        global = true,
        env = "API_REQUEST_ID_HEADER",
        default_value = crate::http::DEFAULT_REQUEST_ID_HEADER
    )]
    pub request_id_header: String,

    /// Request id to forward
    #[arg(long, global = true)]
    pub request_id: Option<String>,

    /// B3 span id to forward
    #[arg(long, global = true)]
    pub span_id: Option<String>,

    /// B3 trace id to forward
    #[arg(long, global = true)]
    pub trace_id: Option<String>,

    /// Per-request timeout in seconds
    #[arg(long, global = true, default_value = "30", value_parser = parse_seconds)]
    pub timeout: Duration,

    /// Output format
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Query the API's _status endpoint
    Status,

    /// GET a single resource
    Get {
        /// Path segments, e.g. `users 42`
        #[arg(required = true)]
        segments: Vec<String>,

        /// Query parameter (repeatable)
        #[arg(short, long = "query", value_parser = parse_key_val)]
        query: Vec<(String, String)>,

        /// Retry temporary failures with backoff
        #[arg(long)]
        retry: bool,
    },

    /// Stream every item of a paginated collection
    List {
        /// Collection field holding the items, e.g. `users`
        model: String,

        /// Path segments of the first page (defaults to the model name)
        segments: Vec<String>,

        /// Query parameter for the first page (repeatable)
        #[arg(short, long = "query", value_parser = parse_key_val)]
        query: Vec<(String, String)>,

        /// Stop after this many items
        #[arg(long)]
        max_items: Option<usize>,
    },
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Compact JSON (one value per line)
    Json,
    /// Indented JSON
    Pretty,
}

/// Parse a `key=value` pair
pub fn parse_key_val(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("invalid KEY=VALUE: no `=` found in `{s}`"))?;

    if key.is_empty() {
        return Err(format!("invalid KEY=VALUE: empty key in `{s}`"));
    }
    Ok((key.to_string(), value.to_string()))
}

fn parse_seconds(s: &str) -> Result<Duration, String> {
    s.parse::<u64>()
        .map(Duration::from_secs)
        .map_err(|e| format!("invalid timeout `{s}`: {e}"))
}
