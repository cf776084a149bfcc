//! The facade applications actually hold onto: [`Client`] wraps a
//! [`Dispatcher`], an [`InterceptorList`], and a [`Transport`] behind the
//! progressive-configuration builder idiom this codebase uses elsewhere for
//! its own client types (§6).

use std::sync::{Arc, RwLock};
use std::time::Duration;

use crate::config::ClientConfig;
use crate::interceptors::{CancellationToken, Dispatcher, Interceptor, InterceptorList};
use crate::metrics::{Metrics, NoopMetrics};
use crate::transport::{HttpTransport, HttpTransportConfig, Transport};
use crate::types::{PipelineError, RequestOptions, Response};

/// The pipeline's entry point: dispatches requests through the interceptor
/// list and reports the final response or error.
///
/// The interceptor list lives behind a lock so `request_interceptors()` (and
/// friends, once added) can mutate it between calls without needing a `&mut
/// Client` — mutation never reaches an in-flight [`Dispatcher::dispatch`]
/// call, since the dispatcher snapshots the list at the top of `dispatch`.
pub struct Client {
    dispatcher: Dispatcher,
    interceptors: RwLock<InterceptorList>,
    config: ClientConfig,
}

impl Client {
    /// Build a client with an `HttpTransport` and default configuration.
    /// Equivalent to `Client::builder().build()`.
    pub fn new() -> Self {
        ClientBuilder::new().build()
    }

    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Push an interceptor onto the end of the list.
    pub fn push_interceptor(&self, interceptor: Arc<dyn Interceptor>) {
        self.interceptors
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .push(interceptor);
    }

    /// Insert an interceptor at a specific index.
    pub fn insert_interceptor(&self, index: usize, interceptor: Arc<dyn Interceptor>) {
        self.interceptors
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .insert(index, interceptor);
    }

    /// Remove all interceptors, optionally keeping the built-in.
    pub fn clear_interceptors(&self, keep_builtin: bool) {
        self.interceptors
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .clear(keep_builtin);
    }

    pub fn interceptor_count(&self) -> usize {
        self.interceptors.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    /// Resolve `base_url` against the configured base, if `options.url` is
    /// relative and a base is configured; otherwise pass `options` through
    /// unchanged.
    fn resolve(&self, mut options: RequestOptions) -> RequestOptions {
        if let Some(base) = &self.config.base_url {
            if !options.url.starts_with("http://") && !options.url.starts_with("https://") {
                let mut url = base.trim_end_matches('/').to_string();
                if !options.url.starts_with('/') {
                    url.push('/');
                }
                url.push_str(&options.url);
                options.url = url;
            }
        }
        options
    }

    /// Dispatch a request through the interceptor pipeline, per §6.
    pub async fn dispatch(
        &self,
        options: RequestOptions,
        cancellation: Option<CancellationToken>,
    ) -> Result<Response, PipelineError> {
        let options = self.resolve(options);
        let list = self.interceptors.read().unwrap_or_else(|e| e.into_inner());
        self.dispatcher.dispatch(&list, options, cancellation).await
    }
}

impl Default for Client {
    fn default() -> Self {
        Self::new()
    }
}

/// Progressive client configuration: explicit setting > environment
/// variable > default, applied in `build()`.
pub struct ClientBuilder {
    config: ClientConfig,
    transport: Option<Arc<dyn Transport>>,
    interceptors: Option<InterceptorList>,
    use_defaults: bool,
    metrics: Option<Arc<dyn Metrics>>,
}

impl ClientBuilder {
    pub fn new() -> Self {
        Self {
            config: ClientConfig::default(),
            transport: None,
            interceptors: None,
            use_defaults: true,
            metrics: None,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.config.base_url = Some(base_url.into());
        self
    }

    pub fn with_proxy(mut self, proxy_url: impl Into<String>) -> Self {
        self.config.proxy = Some(proxy_url.into());
        self
    }

    pub fn without_proxy(mut self) -> Self {
        self.config.disable_proxy = true;
        self.config.proxy = None;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.config.default_timeout = Some(timeout);
        self
    }

    pub fn with_log_sink(mut self, sink: crate::config::LogSink) -> Self {
        self.config.log_sink = Some(sink);
        self
    }

    /// Supply a transport other than the default `reqwest`-backed one —
    /// typically a test double.
    pub fn with_transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Supply an interceptor list wholesale, instead of the default bundle
    /// ([`crate::interceptors::default_interceptors`]).
    pub fn with_interceptors(mut self, list: InterceptorList) -> Self {
        self.interceptors = Some(list);
        self
    }

    /// Skip installing the default interceptor bundle; start from just the
    /// built-in content-type interceptor.
    pub fn without_default_interceptors(mut self) -> Self {
        self.use_defaults = false;
        self
    }

    /// Report dispatch counts, duration, and success/failure through
    /// `metrics` instead of the no-op default.
    pub fn with_metrics(mut self, metrics: Arc<dyn Metrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn build(self) -> Client {
        let config = self.config.hydrate_with_env();

        let transport = self.transport.unwrap_or_else(|| {
            let mut transport_config = HttpTransportConfig::default();
            if config.disable_proxy {
                transport_config.proxy = None;
            } else if let Some(proxy) = &config.proxy {
                transport_config.proxy = Some(proxy.clone());
            }
            if let Some(timeout) = config.default_timeout {
                transport_config.timeout = timeout;
            }
            Arc::new(HttpTransport::with_config(transport_config)) as Arc<dyn Transport>
        });

        let mut interceptors = self.interceptors.unwrap_or_else(|| {
            if self.use_defaults {
                crate::interceptors::default_interceptors(transport.clone())
            } else {
                InterceptorList::new()
            }
        });

        // Route the built-in's "unsupported body type" diagnostic through
        // the configured log sink too, if the caller left the built-in in
        // place at slot 0 (§6).
        if let Some(sink) = &config.log_sink {
            if interceptors.has_builtin() {
                if let Some(slot0) = interceptors.get(0) {
                    if slot0.name() == "content-type" {
                        interceptors.set(
                            0,
                            Arc::new(crate::interceptors::ContentTypeInterceptor::with_log_sink(sink.clone())),
                        );
                    }
                }
            }
        }

        let metrics = self.metrics.unwrap_or_else(|| Arc::new(NoopMetrics));

        Client {
            dispatcher: Dispatcher::with_metrics(transport, metrics),
            interceptors: RwLock::new(interceptors),
            config,
        }
    }
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}
