//! Calling context
//!
//! Carries the identifiers of the inbound request an application is handling,
//! so outbound API calls can be correlated with it. Without a context the
//! request-id and B3 headers are simply not sent.

use reqwest::header::HeaderMap;

/// B3 span id header, copied verbatim
pub const SPAN_ID_HEADER: &str = "X-B3-SpanId";

/// B3 trace id header, copied verbatim
pub const TRACE_ID_HEADER: &str = "X-B3-TraceId";

/// Request-scoped identifiers forwarded on outbound requests
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallContext {
    /// Id of the inbound request
    pub request_id: Option<String>,
    /// `X-B3-SpanId` of the inbound request
    pub span_id: Option<String>,
    /// `X-B3-TraceId` of the inbound request
    pub trace_id: Option<String>,
}

impl CallContext {
    /// Create an empty context
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the request id
    #[must_use]
    pub fn request_id(mut self, id: impl Into<String>) -> Self {
        self.request_id = Some(id.into());
        self
    }

    /// Set the B3 span id
    #[must_use]
    pub fn span_id(mut self, id: impl Into<String>) -> Self {
        self.span_id = Some(id.into());
        self
    }

    /// Set the B3 trace id
    #[must_use]
    pub fn trace_id(mut self, id: impl Into<String>) -> Self {
        self.trace_id = Some(id.into());
        self
    }

    /// Build a context from inbound request headers
    pub fn from_headers(headers: &HeaderMap, request_id_header: &str) -> Self {
        let get = |name: &str| {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        };

        Self {
            request_id: get(request_id_header),
            span_id: get(SPAN_ID_HEADER),
            trace_id: get(TRACE_ID_HEADER),
        }
    }

    /// Outbound headers for this context
    pub fn headers(&self, request_id_header: &str) -> Vec<(String, String)> {
        let mut headers = Vec::new();
        if let Some(id) = &self.request_id {
            headers.push((request_id_header.to_string(), id.clone()));
        }
        if let Some(span) = &self.span_id {
            headers.push((SPAN_ID_HEADER.to_string(), span.clone()));
        }
        if let Some(trace) = &self.trace_id {
            headers.push((TRACE_ID_HEADER.to_string(), trace.clone()));
        }
        headers
    }
}
