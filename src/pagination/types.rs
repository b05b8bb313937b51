//! Page parsing
//!
//! A collection page is a JSON object holding the items under the model's
//! plural name plus an optional continuation link:
//!
//! ```json
//! {"users": [{"id": 1}, {"id": 2}], "links": {"next": "https://api/users?page=2"}}
//! ```

use crate::error::{Error, Result};
use serde_json::Value;

/// Default location of the continuation link in a page body
pub const DEFAULT_NEXT_PATH: &str = "links.next";

/// Result of the next page computation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NextPage {
    /// Another page is available at this URL
    Continue {
        /// Continuation URL, fetched exactly as given
        url: String,
    },
    /// No more pages
    Done,
}

impl NextPage {
    /// Create a continuation to the given URL
    pub fn with_url(url: impl Into<String>) -> Self {
        Self::Continue { url: url.into() }
    }

    /// Check if this is a done result
    pub fn is_done(&self) -> bool {
        matches!(self, Self::Done)
    }

    /// Check if this is a continue result
    pub fn is_continue(&self) -> bool {
        matches!(self, Self::Continue { .. })
    }

    /// Continuation URL, if any
    pub fn url(&self) -> Option<&str> {
        match self {
            Self::Continue { url } => Some(url),
            Self::Done => None,
        }
    }
}

/// One decoded page of a collection
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    /// Items in server order
    pub items: Vec<Value>,
    /// Where to go next
    pub next: NextPage,
}

impl Page {
    /// Split a page body into its items and continuation.
    ///
    /// The collection field must be present and hold an array. A missing,
    /// empty or non-string link at `next_path` means this is the last page.
    pub fn from_body(body: Value, model_name: &str, next_path: &str) -> Result<Self> {
        let next = match extract_path(&body, next_path) {
            Some(Value::String(url)) if !url.is_empty() => NextPage::with_url(url.as_str()),
            _ => NextPage::Done,
        };

        let Value::Object(mut map) = body else {
            return Err(Error::invalid_response(format!(
                "Expected a JSON object holding '{model_name}', got {}",
                json_kind(&body)
            )));
        };

        let items = match map.remove(model_name) {
            Some(Value::Array(items)) => items,
            Some(other) => {
                return Err(Error::invalid_response(format!(
                    "Field '{model_name}' is {}, expected an array",
                    json_kind(&other)
                )))
            }
            None => {
                return Err(Error::invalid_response(format!(
                    "Response has no '{model_name}' field"
                )))
            }
        };

        Ok(Self { items, next })
    }

    /// Check if this is the last page
    pub fn is_last(&self) -> bool {
        self.next.is_done()
    }
}

/// Walk a dotted path (`links.next`, optionally prefixed with `$.`)
pub fn extract_path<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    let path = path.strip_prefix("$.").unwrap_or(path);

    let mut current = value;
    for part in path.split('.').filter(|p| !p.is_empty()) {
        match current {
            Value::Object(map) => {
                current = map.get(part)?;
            }
            _ => return None,
        }
    }

    Some(current)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
