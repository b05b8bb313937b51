//! Path builder
//!
//! Composes nested resource paths by chaining segments and ends the chain
//! at an HTTP verb, which yields a [`BoundCall`]:
//!
//! ```rust,ignore
//! let lots = client
//!     .req()
//!     .segment("frameworks")
//!     .segment("g-cloud-7")
//!     .segment("lots")
//!     .get()
//!     .send()
//!     .await?;
//! ```
//!
//! Builders are immutable values; every `segment` returns a new builder.
//! No retry or auth logic lives here.

use crate::error::{Error, Result};
use crate::http::ApiClient;
use crate::retry;
use crate::types::{Method, QueryParams};
use serde_json::Value;
use std::fmt::Display;

/// An immutable, partially built resource path
#[derive(Debug, Clone)]
pub struct PathBuilder {
    client: ApiClient,
    prefix: String,
}

/// Result of a symbolic access on a [`PathBuilder`]
#[derive(Debug, Clone)]
pub enum PathAccess {
    /// The name was a path segment
    Segment(PathBuilder),
    /// The name was a verb; the call is ready to send
    Call(BoundCall),
}

impl PathBuilder {
    /// Create a builder at the root path
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            prefix: "/".to_string(),
        }
    }

    /// The path accumulated so far
    pub fn path(&self) -> &str {
        &self.prefix
    }

    /// Append a segment. Surrounding and repeated `/` are dropped, so the
    /// result never contains an empty segment.
    #[must_use]
    pub fn segment(&self, name: impl Display) -> Self {
        let name = name.to_string();
        let mut prefix = self.prefix.clone();

        for part in name.split('/').filter(|p| !p.is_empty()) {
            if !prefix.ends_with('/') {
                prefix.push('/');
            }
            prefix.push_str(part);
        }

        Self {
            client: self.client.clone(),
            prefix,
        }
    }

    /// Append several segments in order
    #[must_use]
    pub fn segments<I>(&self, names: I) -> Self
    where
        I: IntoIterator,
        I::Item: Display,
    {
        names
            .into_iter()
            .fold(self.clone(), |builder, name| builder.segment(name))
    }

    /// Symbolic access: a lowercase verb name (`get`, `post`, ...) ends the
    /// chain, anything else extends it. `GET` or `Users` stay segments.
    pub fn access(&self, name: &str) -> PathAccess {
        let lowercase = !name.bytes().any(|b| b.is_ascii_uppercase());
        let verb = Method::from_name(name).filter(|_| lowercase);
        match verb {
            Some(method) => PathAccess::Call(self.verb(method)),
            None => PathAccess::Segment(self.segment(name)),
        }
    }

    /// Bind the accumulated path to a verb
    pub fn verb(&self, method: Method) -> BoundCall {
        BoundCall {
            client: self.client.clone(),
            method,
            path: self.prefix.clone(),
            params: QueryParams::new(),
            body: None,
        }
    }

    /// GET the accumulated path
    pub fn get(&self) -> BoundCall {
        self.verb(Method::GET)
    }

    /// HEAD the accumulated path
    pub fn head(&self) -> BoundCall {
        self.verb(Method::HEAD)
    }

    /// POST a JSON body to the accumulated path
    pub fn post(&self, body: Value) -> BoundCall {
        self.verb(Method::POST).json(body)
    }

    /// PUT a JSON body to the accumulated path
    pub fn put(&self, body: Value) -> BoundCall {
        self.verb(Method::PUT).json(body)
    }

    /// PATCH the accumulated path with a JSON body
    pub fn patch(&self, body: Value) -> BoundCall {
        self.verb(Method::PATCH).json(body)
    }

    /// DELETE the accumulated path
    pub fn delete(&self) -> BoundCall {
        self.verb(Method::DELETE)
    }

    /// OPTIONS on the accumulated path
    pub fn options(&self) -> BoundCall {
        self.verb(Method::OPTIONS)
    }

    /// TRACE the accumulated path
    pub fn trace(&self) -> BoundCall {
        self.verb(Method::TRACE)
    }

    /// CONNECT to the accumulated path
    pub fn connect(&self) -> BoundCall {
        self.verb(Method::CONNECT)
    }
}

/// A request bound to a verb and path, awaiting only params and body.
///
/// Cloneable and re-sendable; each `send` issues a fresh request.
#[derive(Debug, Clone)]
pub struct BoundCall {
    client: ApiClient,
    method: Method,
    path: String,
    params: QueryParams,
    body: Option<Value>,
}

impl BoundCall {
    /// Add a query parameter
    #[must_use]
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.push((key.into(), value.into()));
        self
    }

    /// Set JSON body
    #[must_use]
    pub fn json(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Bound verb
    pub fn method(&self) -> Method {
        self.method
    }

    /// Bound path, relative to the client's base URL
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Query parameters in insertion order
    pub fn params(&self) -> &[(String, String)] {
        &self.params
    }

    /// JSON body, if any
    pub fn body(&self) -> Option<&Value> {
        self.body.as_ref()
    }

    /// Client the call is sent through, including its calling context
    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    /// Send once
    pub async fn send(&self) -> Result<Option<Value>> {
        self.client
            .request(self.method, &self.path, &self.params, self.body.as_ref())
            .await
    }

    /// Send through the retry wrapper. Only read verbs may be retried.
    pub async fn send_with_retry(&self) -> Result<Option<Value>> {
        if !self.method.is_read() {
            return Err(Error::config(format!(
                "{} {} cannot be retried: only read requests are retried",
                self.method, self.path
            )));
        }

        let operation = format!("{} {}", self.method, self.path);
        retry::with_backoff(&self.client.config().retry, &operation, || self.send()).await
    }
}

#[cfg(test)]
mod tests;
