//! The response-track payload: `Response`, created by the transport or
//! synthesized by an interceptor via `handler.resolve` (§3).

use crate::types::headers::Headers;
use crate::types::request::RequestOptions;
use serde_json::Value;
use std::sync::Arc;

/// A response. Carries a reference back to its originating request
/// options; mutation is permitted only on the response track (the pipeline
/// does not enforce this at the type level, matching the source's
/// "interceptors may mutate" contract — see §3).
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    pub request: Arc<RequestOptions>,
    pub status: u16,
    pub status_text: String,
    pub headers: Headers,
    pub body: Value,
}

impl Response {
    pub fn new(request: Arc<RequestOptions>, status: u16, body: Value) -> Self {
        Self {
            request,
            status,
            status_text: default_status_text(status).to_string(),
            headers: Headers::new(),
            body,
        }
    }

    pub fn with_status_text(mut self, status_text: impl Into<String>) -> Self {
        self.status_text = status_text.into();
        self
    }

    pub fn with_headers(mut self, headers: Headers) -> Self {
        self.headers = headers;
        self
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

fn default_status_text(status: u16) -> &'static str {
    match status {
        200 => "OK",
        201 => "Created",
        204 => "No Content",
        301 => "Moved Permanently",
        302 => "Found",
        400 => "Bad Request",
        401 => "Unauthorized",
        403 => "Forbidden",
        404 => "Not Found",
        429 => "Too Many Requests",
        500 => "Internal Server Error",
        502 => "Bad Gateway",
        503 => "Service Unavailable",
        504 => "Gateway Timeout",
        _ => "",
    }
}
