//! Error types for the API client
//!
//! Every public API returns `Result<T, Error>`. The HTTP-facing variants form
//! the classification the retry wrapper depends on:
//!
//! - [`Error::Api`]: the request never produced an HTTP response
//! - [`Error::Http`]: a permanent HTTP failure (4xx other than 429)
//! - [`Error::HttpTemporary`]: a retryable HTTP failure (429, 5xx, timeout)
//! - [`Error::InvalidResponse`]: a 2xx response whose body is not JSON

use serde_json::Value;
use thiserror::Error;

/// Status reported for failures that never received an HTTP response
pub const REQUEST_ERROR_STATUS_CODE: u16 = 503;

/// Message used when neither the response body nor the transport has one
pub const REQUEST_ERROR_MESSAGE: &str = "Request failed";

/// The main error type for the API client
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Transport / HTTP Errors
    // ============================================================================
    #[error("API request failed: {message}")]
    Api { message: String },

    #[error("HTTP {status}: {message}")]
    Http {
        status: u16,
        message: String,
        body: Option<Value>,
    },

    #[error("HTTP {} (temporary): {message}", status_label(.status))]
    HttpTemporary {
        status: Option<u16>,
        message: String,
        body: Option<Value>,
    },

    #[error("Invalid response: {message}")]
    InvalidResponse {
        status: Option<u16>,
        message: String,
        body: Option<String>,
    },

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    // ============================================================================
    // Payload / Configuration Errors
    // ============================================================================
    #[error("Failed to encode JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid payload: {message}")]
    InvalidPayload { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },
}

fn status_label(status: &Option<u16>) -> String {
    status.map_or_else(|| "timeout".to_string(), |s| s.to_string())
}

impl Error {
    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create an invalid payload error
    pub fn invalid_payload(message: impl Into<String>) -> Self {
        Self::InvalidPayload {
            message: message.into(),
        }
    }

    /// Create an invalid response error that has no HTTP context
    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self::InvalidResponse {
            status: None,
            message: message.into(),
            body: None,
        }
    }

    /// Classify an HTTP response with status >= 400
    pub fn from_status(status: u16, body_text: &str) -> Self {
        let body = serde_json::from_str::<Value>(body_text).ok();
        let message = error_message(body.as_ref(), body_text);

        if is_temporary_status(status) {
            Self::HttpTemporary {
                status: Some(status),
                message,
                body,
            }
        } else {
            Self::Http {
                status,
                message,
                body,
            }
        }
    }

    /// Classify a transport failure (no response was obtained)
    pub fn from_transport(error: &reqwest::Error) -> Self {
        if error.is_timeout() {
            return Self::HttpTemporary {
                status: None,
                message: error.to_string(),
                body: None,
            };
        }
        Self::Api {
            message: error.to_string(),
        }
    }

    /// Check if this error may be retried
    pub fn is_temporary(&self) -> bool {
        matches!(self, Error::HttpTemporary { .. })
    }

    /// Check if this error came from an HTTP response (or a timeout waiting for one)
    pub fn is_http(&self) -> bool {
        matches!(self, Error::Http { .. } | Error::HttpTemporary { .. })
    }

    /// Check if the server answered 404
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    /// The HTTP status of the response, if one was received
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Http { status, .. } => Some(*status),
            Error::HttpTemporary { status, .. } | Error::InvalidResponse { status, .. } => *status,
            _ => None,
        }
    }

    /// Status code used for reporting; failures without a response report 503
    pub fn status_code(&self) -> u16 {
        self.status().unwrap_or(REQUEST_ERROR_STATUS_CODE)
    }

    /// Human-readable message without the variant prefix
    pub fn message(&self) -> String {
        match self {
            Error::Api { message }
            | Error::Http { message, .. }
            | Error::HttpTemporary { message, .. }
            | Error::InvalidResponse { message, .. }
            | Error::InvalidPayload { message }
            | Error::Config { message } => message.clone(),
            other => other.to_string(),
        }
    }

    /// Decoded JSON body of the failed response, if it had one
    pub fn body(&self) -> Option<&Value> {
        match self {
            Error::Http { body, .. } | Error::HttpTemporary { body, .. } => body.as_ref(),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(error: reqwest::Error) -> Self {
        Self::from_transport(&error)
    }
}

/// 429 and every 5xx are worth another attempt
pub fn is_temporary_status(status: u16) -> bool {
    status == 429 || (500..=599).contains(&status)
}

fn error_message(body: Option<&Value>, body_text: &str) -> String {
    if let Some(message) = body.and_then(|b| b.get("error")).and_then(Value::as_str) {
        return message.to_string();
    }
    let text = body_text.trim();
    if text.is_empty() {
        REQUEST_ERROR_MESSAGE.to_string()
    } else {
        text.to_string()
    }
}

/// Result type alias for the API client
pub type Result<T> = std::result::Result<T, Error>;
