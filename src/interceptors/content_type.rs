//! The built-in content-type implication interceptor (§4.6). Always
//! occupies slot 0 of a freshly constructed [`InterceptorList`] and cannot
//! be removed by `clear`; only `InterceptorList::remove_builtin` drops it.

use async_trait::async_trait;
use tracing::debug;

use crate::config::LogSink;
use crate::types::request::RequestBody;
use crate::types::{RequestOptions, Response};

use super::handler::{RequestHandler, ResponseHandler};
use super::interceptor::Interceptor;

/// Infers `Content-Type` from the request body's shape, without ever
/// overriding a header the caller or an earlier interceptor already set.
pub struct ContentTypeInterceptor {
    log_sink: Option<LogSink>,
}

impl ContentTypeInterceptor {
    pub fn new() -> Self {
        Self { log_sink: None }
    }

    /// Also forward the "unsupported body type" diagnostic to `sink`, in
    /// addition to the `tracing::debug!` every call site already emits
    /// through (§6's single diagnostics stream).
    pub fn with_log_sink(sink: LogSink) -> Self {
        Self { log_sink: Some(sink) }
    }
}

impl Default for ContentTypeInterceptor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Interceptor for ContentTypeInterceptor {
    async fn on_request(&self, mut options: RequestOptions, handler: RequestHandler) {
        if !options.headers.contains("content-type") {
            match &options.body {
                Some(body) if body.is_form() => {
                    options
                        .headers
                        .set_if_absent("Content-Type", "multipart/form-data");
                }
                Some(body) if body.is_json_like() => {
                    options
                        .headers
                        .set_if_absent("Content-Type", "application/json");
                }
                None => {}
                Some(_) => {
                    let message = "request body shape does not imply a content-type";
                    debug!(message);
                    if let Some(sink) = &self.log_sink {
                        sink(message);
                    }
                }
            }
        }
        handler.next(options);
    }

    async fn on_response(&self, response: Response, handler: ResponseHandler) {
        handler.next(response);
    }

    fn name(&self) -> &str {
        "content-type"
    }
}
