//! Request executor
//!
//! Performs exactly one HTTP call per request and returns the decoded JSON
//! body, or a classified [`Error`]:
//! - transport failures become `Api` (or `HttpTemporary` for timeouts)
//! - statuses >= 400 become `Http` / `HttpTemporary`
//! - 2xx bodies that are not JSON become `InvalidResponse`
//!
//! Nothing here retries; see [`crate::retry`].

use super::config::ClientConfig;
use super::context::CallContext;
use crate::error::{Error, Result};
use crate::path::PathBuilder;
use crate::types::Method;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, USER_AGENT};
use reqwest::{Client, RequestBuilder};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};
use url::Url;

/// Authenticated JSON API client
///
/// Cheap to clone: clones share the configuration and connection pool.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    config: Arc<ClientConfig>,
    base_url: Option<Url>,
    context: Option<Arc<CallContext>>,
}

impl ApiClient {
    /// Create a new client from configuration
    pub fn new(config: ClientConfig) -> Result<Self> {
        let client = Client::builder().timeout(config.timeout).build()?;
        let base_url = parse_base_url(&config.base_url)?;

        Ok(Self {
            client,
            config: Arc::new(config),
            base_url,
            context: None,
        })
    }

    /// A clone of this client that forwards the given calling context
    #[must_use]
    pub fn with_context(&self, context: CallContext) -> Self {
        let mut client = self.clone();
        client.context = Some(Arc::new(context));
        client
    }

    /// Client configuration
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Attached calling context, if any
    pub fn context(&self) -> Option<&CallContext> {
        self.context.as_deref()
    }

    /// Check if requests are actually sent
    pub fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    /// Start building a resource path from the root
    pub fn req(&self) -> PathBuilder {
        PathBuilder::new(self.clone())
    }

    /// GET with optional query parameters
    pub async fn get(&self, url: &str, params: &[(String, String)]) -> Result<Option<Value>> {
        self.request(Method::GET, url, params, None).await
    }

    /// POST a JSON payload
    pub async fn post(&self, url: &str, data: &Value) -> Result<Option<Value>> {
        self.request(Method::POST, url, &[], Some(data)).await
    }

    /// PUT a JSON payload
    pub async fn put(&self, url: &str, data: &Value) -> Result<Option<Value>> {
        self.request(Method::PUT, url, &[], Some(data)).await
    }

    /// PATCH a JSON payload
    pub async fn patch(&self, url: &str, data: &Value) -> Result<Option<Value>> {
        self.request(Method::PATCH, url, &[], Some(data)).await
    }

    /// DELETE, optionally with a JSON payload
    pub async fn delete(&self, url: &str, data: Option<&Value>) -> Result<Option<Value>> {
        self.request(Method::DELETE, url, &[], data).await
    }

    /// POST with `updated_by` stamped into the payload
    pub async fn post_with_updated_by(
        &self,
        url: &str,
        data: &Value,
        user: &str,
    ) -> Result<Option<Value>> {
        let data = with_updated_by(data, user)?;
        self.post(url, &data).await
    }

    /// PUT with `updated_by` stamped into the payload
    pub async fn put_with_updated_by(
        &self,
        url: &str,
        data: &Value,
        user: &str,
    ) -> Result<Option<Value>> {
        let data = with_updated_by(data, user)?;
        self.put(url, &data).await
    }

    /// DELETE with `updated_by` stamped into the payload
    pub async fn delete_with_updated_by(
        &self,
        url: &str,
        data: &Value,
        user: &str,
    ) -> Result<Option<Value>> {
        let data = with_updated_by(data, user)?;
        self.delete(url, Some(&data)).await
    }

    /// Query the API's `_status` endpoint.
    ///
    /// A failed call is not an error here: its JSON body is returned as-is,
    /// otherwise a `{"status": "error", "message": ...}` payload is built.
    pub async fn get_status(&self) -> Result<Option<Value>> {
        match self.get("_status", &[]).await {
            Ok(status) => Ok(status),
            Err(
                e @ (Error::Api { .. }
                | Error::Http { .. }
                | Error::HttpTemporary { .. }
                | Error::InvalidResponse { .. }),
            ) => Ok(Some(match e.body() {
                Some(body) => body.clone(),
                None => json!({
                    "status": "error",
                    "message": e.message(),
                }),
            })),
            Err(e) => Err(e),
        }
    }

    /// Make a single request and decode the JSON response.
    ///
    /// Returns `Ok(None)` without any I/O when the client is disabled.
    pub async fn request(
        &self,
        method: Method,
        url: &str,
        params: &[(String, String)],
        body: Option<&Value>,
    ) -> Result<Option<Value>> {
        if !self.config.enabled {
            return Ok(None);
        }

        let url = self.resolve_url(url)?;
        debug!(api_method = %method, api_url = %url, "API request {} {}", method, url);

        let mut req = self
            .client
            .request(method.into(), url.clone())
            .header(CONTENT_TYPE, "application/json")
            .header(AUTHORIZATION, format!("Bearer {}", self.config.auth_token))
            .header(USER_AGENT, self.config.user_agent());

        if let Some(context) = &self.context {
            for (name, value) in context.headers(&self.config.request_id_header) {
                req = req.header(name, value);
            }
        }

        if !params.is_empty() {
            req = req.query(params);
        }

        if let Some(body) = body {
            req = req.body(serde_json::to_vec(body)?);
        }

        let start = Instant::now();
        let outcome = send(req).await;
        let elapsed = start.elapsed();

        let (status, text) = match outcome {
            Ok(response) => response,
            Err(e) => {
                log_failure(method, &url, &e, elapsed);
                return Err(e);
            }
        };

        info!(
            api_method = %method,
            api_url = %url,
            api_status = status,
            api_time = elapsed.as_secs_f64(),
            "API {} request on {} finished in {:?}",
            method,
            url,
            elapsed
        );

        match serde_json::from_str::<Value>(&text) {
            Ok(value) => Ok(Some(value)),
            Err(_) => Err(Error::InvalidResponse {
                status: Some(status),
                message: "No JSON object could be decoded".to_string(),
                body: Some(text),
            }),
        }
    }

    /// Resolve a request URL against the base URL.
    ///
    /// Absolute `http(s)://` URLs are used unchanged; anything else has its
    /// leading `/` stripped and is joined below the base URL's path.
    pub fn resolve_url(&self, url: &str) -> Result<Url> {
        if url.starts_with("http://") || url.starts_with("https://") {
            return Ok(Url::parse(url)?);
        }

        let base = self
            .base_url
            .as_ref()
            .ok_or_else(|| Error::config("No base URL configured for a relative request path"))?;
        Ok(base.join(url.trim_start_matches('/'))?)
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.config.base_url)
            .field("enabled", &self.config.enabled)
            .field("has_context", &self.context.is_some())
            .finish_non_exhaustive()
    }
}

/// Copy of a JSON object payload with `updated_by` set to `user`
pub fn with_updated_by(data: &Value, user: &str) -> Result<Value> {
    let mut object = data
        .as_object()
        .cloned()
        .ok_or_else(|| Error::invalid_payload("updated_by can only be added to a JSON object"))?;
    object.insert("updated_by".to_string(), Value::String(user.to_string()));
    Ok(Value::Object(object))
}

/// Send the request and read the body, classifying any failure
async fn send(req: RequestBuilder) -> Result<(u16, String)> {
    let response = req.send().await?;
    let status = response.status().as_u16();
    let text = response.text().await?;

    if status >= 400 {
        return Err(Error::from_status(status, &text));
    }
    Ok((status, text))
}

// 404s are expected lookups, keep them out of the warning stream
fn log_failure(method: Method, url: &Url, error: &Error, elapsed: Duration) {
    let status = error.status_code();
    let message = error.message();

    if error.is_not_found() {
        info!(
            api_method = %method,
            api_url = %url,
            api_status = status,
            api_error = %message,
            api_time = elapsed.as_secs_f64(),
            "API {} request on {} failed with {} '{}'",
            method,
            url,
            status,
            message
        );
    } else {
        warn!(
            api_method = %method,
            api_url = %url,
            api_status = status,
            api_error = %message,
            api_time = elapsed.as_secs_f64(),
            "API {} request on {} failed with {} '{}'",
            method,
            url,
            status,
            message
        );
    }
}

fn parse_base_url(base: &str) -> Result<Option<Url>> {
    let base = base.trim();
    if base.is_empty() {
        return Ok(None);
    }

    let mut url = Url::parse(base)?;
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(Some(url))
}
