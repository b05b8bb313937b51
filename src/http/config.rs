//! Client configuration
//!
//! Immutable once built; every clone of an [`ApiClient`](super::ApiClient)
//! shares the same `ClientConfig` read-only.

use crate::retry::RetryPolicy;
use std::time::Duration;

/// Header carrying the caller's request id, unless overridden
pub const DEFAULT_REQUEST_ID_HEADER: &str = "X-Request-ID";

/// Configuration for the API client
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL that relative request paths are joined onto
    pub base_url: String,
    /// Bearer token sent with every request
    pub auth_token: String,
    /// When false, every request is a no-op returning `None`
    pub enabled: bool,
    /// Client name in the user agent
    pub client_name: String,
    /// Client version in the user agent
    pub client_version: String,
    /// Header used to forward the calling context's request id
    pub request_id_header: String,
    /// Per-request transport timeout
    pub timeout: Duration,
    /// Retry policy for find-style reads
    pub retry: RetryPolicy,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            auth_token: String::new(),
            enabled: true,
            client_name: crate::NAME.to_string(),
            client_version: crate::VERSION.to_string(),
            request_id_header: DEFAULT_REQUEST_ID_HEADER.to_string(),
            timeout: Duration::from_secs(30),
            retry: RetryPolicy::default(),
        }
    }
}

impl ClientConfig {
    /// Create a new config builder
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::default()
    }

    /// `User-agent` header value
    pub fn user_agent(&self) -> String {
        format!("{}/{}", self.client_name, self.client_version)
    }
}

/// Builder for client config
#[derive(Default)]
pub struct ClientConfigBuilder {
    config: ClientConfig,
}

impl ClientConfigBuilder {
    /// Set the base URL
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.base_url = url.into();
        self
    }

    /// Set the bearer token
    pub fn auth_token(mut self, token: impl Into<String>) -> Self {
        self.config.auth_token = token.into();
        self
    }

    /// Enable or disable the client
    pub fn enabled(mut self, enabled: bool) -> Self {
        self.config.enabled = enabled;
        self
    }

    /// Set the client name used in the user agent
    pub fn client_name(mut self, name: impl Into<String>) -> Self {
        self.config.client_name = name.into();
        self
    }

    /// Set the client version used in the user agent
    pub fn client_version(mut self, version: impl Into<String>) -> Self {
        self.config.client_version = version.into();
        self
    }

    /// Override the request-id header name
    pub fn request_id_header(mut self, header: impl Into<String>) -> Self {
        self.config.request_id_header = header.into();
        self
    }

    /// Set the request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Set the retry policy
    pub fn retry(mut self, policy: RetryPolicy) -> Self {
        self.config.retry = policy;
        self
    }

    /// Build the config
    pub fn build(self) -> ClientConfig {
        self.config
    }
}
