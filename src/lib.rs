#![cfg_attr(docsrs, feature(doc_cfg))]
//! relay-http: a middleware-based interceptor pipeline for HTTP clients.
//!
//! The pipeline sits between a [`Client`] and a [`Transport`]: every
//! outbound request, every inbound response, and every raised error walks
//! an ordered list of [`Interceptor`]s before the client sees a final
//! result. Interceptors decide, per hook invocation, whether to pass the
//! payload to the next interceptor, resolve the request outright, or
//! reject it — see [`interceptors`] for the full model.
//!
//! # Quick start
//!
//! ```rust
//! use relay_http::{Client, RequestOptions};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = Client::builder()
//!         .with_base_url("https://api.example.com")
//!         .build();
//!
//!     let options = RequestOptions::get("/v1/ping");
//!     match client.dispatch(options, None).await {
//!         Ok(response) => println!("status: {}", response.status),
//!         Err(error) => println!("pipeline error: {}", error),
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Import guidance
//! - For application code, prefer `use relay_http::prelude::*;`.
//! - Library authors can import explicitly from domain modules for
//!   fine-grained control.
//!
//! # Proxy support
//!
//! The default transport picks up a proxy from the `RELAY_HTTP_PROXY_URL`
//! environment variable unless a [`ClientBuilder`] explicitly overrides it:
//!
//! ```bash
//! export RELAY_HTTP_PROXY_URL=http://proxy.example.com:8080
//! ```

pub mod client;
pub mod config;
pub mod interceptors;
pub mod metrics;
pub mod rate_limiter;
pub mod transport;
pub mod types;

#[cfg(feature = "observability")]
pub mod observability;

pub use client::{Client, ClientBuilder};
pub use config::{ClientConfig, LogSink};
pub use interceptors::{
    CancellationHandle, CancellationToken, CircuitBreakerInterceptor, ContentTypeInterceptor,
    DefaultInterceptorsBuilder, Dispatcher, ErrorHandler, Interceptor, InterceptorFn,
    InterceptorList, QueuedInterceptor, RateLimitInterceptor, RequestHandler, ResponseHandler,
    RetryInterceptor, TimeoutInterceptor,
};
pub use metrics::{Metrics, MetricsExt, NoopMetrics, NoopTimer, Timer};
pub use transport::{HttpTransport, HttpTransportConfig, Transport, TransportError};
pub use types::{
    error::ErrorCause, error::ErrorKind, error::ErrorSeverity, FormData, FormPart, Headers,
    HeaderValue, PipelineError, RequestBody, RequestOptions, Response,
};

/// Prelude with the minimal commonly used items for applications.
pub mod prelude {
    pub use crate::client::{Client, ClientBuilder};
    pub use crate::interceptors::{CancellationToken, Interceptor, InterceptorList};
    pub use crate::types::{PipelineError, RequestOptions, Response};
}
