//! Client configuration (ambient stack, §1). Modeled on
//! `ai_lib::config::ConnectionOptions`: an explicit, in-process options
//! struct a caller can hand to [`crate::client::ClientBuilder`], with
//! environment-variable hydration as a convenience. Configuration
//! *loading* from files is out of scope (§1) — this is just the carrier.

use std::sync::Arc;
use std::time::Duration;

/// Where the built-in content-type interceptor's diagnostic (and other
/// ambient log lines) additionally get forwarded, beyond the `tracing`
/// subscriber every call site already logs through. Defaults to a no-op;
/// set this when embedding the pipeline in a host application with its own
/// log routing.
pub type LogSink = Arc<dyn Fn(&str) + Send + Sync>;

/// Explicit connection/configuration options for a [`Client`](crate::client::Client).
///
/// Any field left as `None` falls back to environment-variable behavior
/// (see [`ClientConfig::hydrate_with_env`]) or the transport's own default.
#[derive(Clone)]
pub struct ClientConfig {
    pub base_url: Option<String>,
    pub proxy: Option<String>,
    pub default_timeout: Option<Duration>,
    pub disable_proxy: bool,
    pub log_sink: Option<LogSink>,
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url)
            .field("proxy", &self.proxy)
            .field("default_timeout", &self.default_timeout)
            .field("disable_proxy", &self.disable_proxy)
            .field("log_sink", &self.log_sink.as_ref().map(|_| "<fn>"))
            .finish()
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            proxy: None,
            default_timeout: None,
            disable_proxy: false,
            log_sink: None,
        }
    }
}

impl ClientConfig {
    /// Hydrate unset fields from environment variables (lightweight
    /// fallback logic, matching `RELAY_HTTP_PROXY_URL` already consulted by
    /// [`crate::transport::HttpTransportConfig`]).
    pub fn hydrate_with_env(mut self) -> Self {
        if self.base_url.is_none() {
            if let Ok(v) = std::env::var("RELAY_HTTP_BASE_URL") {
                self.base_url = Some(v);
            }
        }
        if self.proxy.is_none() && !self.disable_proxy {
            self.proxy = std::env::var("RELAY_HTTP_PROXY_URL").ok();
        }
        if self.default_timeout.is_none() {
            if let Ok(v) = std::env::var("RELAY_HTTP_TIMEOUT_SECS") {
                if let Ok(secs) = v.parse::<u64>() {
                    self.default_timeout = Some(Duration::from_secs(secs));
                }
            }
        }
        self
    }

    /// Send `message` to the configured log sink, if any. The built-in
    /// content-type interceptor's "unsupported body" diagnostic (§4.6) and
    /// other ambient diagnostics route through this in addition to
    /// `tracing`.
    pub fn log(&self, message: &str) {
        if let Some(sink) = &self.log_sink {
            sink(message);
        }
    }
}
