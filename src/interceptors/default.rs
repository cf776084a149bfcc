//! Convenience assembly of the example interceptors into a ready-to-use
//! [`InterceptorList`], following this codebase's usual builder pattern:
//! a config struct plus enable/disable toggles, `build()` returns the
//! assembled collection. The built-in content-type interceptor is
//! always present at index 0 since it comes from `InterceptorList::new`.

use std::sync::Arc;
use std::time::Duration;

use crate::interceptors::list::InterceptorList;
use crate::interceptors::{CircuitBreakerInterceptor, RateLimitInterceptor, RetryInterceptor, TimeoutInterceptor};
use crate::rate_limiter::RateLimiterConfig;
use crate::transport::Transport;

/// Default interceptors bundle configuration.
#[derive(Debug, Clone)]
pub struct DefaultInterceptorsConfig {
    pub retry_max_attempts: u32,
    pub retry_base_delay: Duration,
    pub retry_max_delay: Duration,
    pub timeout_duration: Duration,
    pub circuit_breaker_threshold: u32,
    pub circuit_breaker_recovery: Duration,
    pub rate_limiter: RateLimiterConfig,
}

impl Default for DefaultInterceptorsConfig {
    fn default() -> Self {
        Self {
            retry_max_attempts: 3,
            retry_base_delay: Duration::from_secs(1),
            retry_max_delay: Duration::from_secs(10),
            timeout_duration: Duration::from_secs(30),
            circuit_breaker_threshold: 5,
            circuit_breaker_recovery: Duration::from_secs(60),
            rate_limiter: RateLimiterConfig::default(),
        }
    }
}

/// Builder for a ready-to-use default [`InterceptorList`].
pub struct DefaultInterceptorsBuilder {
    config: DefaultInterceptorsConfig,
    enable_retry: bool,
    enable_timeout: bool,
    enable_circuit_breaker: bool,
    enable_rate_limit: bool,
}

impl DefaultInterceptorsBuilder {
    pub fn new() -> Self {
        Self {
            config: DefaultInterceptorsConfig::default(),
            enable_retry: true,
            enable_timeout: true,
            enable_circuit_breaker: true,
            enable_rate_limit: true,
        }
    }

    pub fn with_retry(mut self, max_attempts: u32, base_delay: Duration, max_delay: Duration) -> Self {
        self.config.retry_max_attempts = max_attempts;
        self.config.retry_base_delay = base_delay;
        self.config.retry_max_delay = max_delay;
        self
    }

    pub fn with_timeout(mut self, duration: Duration) -> Self {
        self.config.timeout_duration = duration;
        self
    }

    pub fn with_circuit_breaker(mut self, threshold: u32, recovery: Duration) -> Self {
        self.config.circuit_breaker_threshold = threshold;
        self.config.circuit_breaker_recovery = recovery;
        self
    }

    pub fn with_rate_limit(mut self, config: RateLimiterConfig) -> Self {
        self.config.rate_limiter = config;
        self
    }

    pub fn enable_retry(mut self, enable: bool) -> Self {
        self.enable_retry = enable;
        self
    }

    pub fn enable_timeout(mut self, enable: bool) -> Self {
        self.enable_timeout = enable;
        self
    }

    pub fn enable_circuit_breaker(mut self, enable: bool) -> Self {
        self.enable_circuit_breaker = enable;
        self
    }

    pub fn enable_rate_limit(mut self, enable: bool) -> Self {
        self.enable_rate_limit = enable;
        self
    }

    /// Assemble the configured interceptors onto a fresh list (built-in at
    /// index 0, then timeout, circuit breaker, rate limit, retry — retry
    /// goes last since it needs the transport to re-send directly).
    pub fn build(self, transport: Arc<dyn Transport>) -> InterceptorList {
        let mut list = InterceptorList::new();

        if self.enable_timeout {
            list.push(Arc::new(TimeoutInterceptor::new(self.config.timeout_duration)));
        }
        if self.enable_circuit_breaker {
            list.push(Arc::new(CircuitBreakerInterceptor::new(
                self.config.circuit_breaker_threshold,
                self.config.circuit_breaker_recovery,
            )));
        }
        if self.enable_rate_limit {
            list.push(Arc::new(RateLimitInterceptor::new(self.config.rate_limiter)));
        }
        if self.enable_retry {
            list.push(Arc::new(RetryInterceptor::new(
                transport,
                self.config.retry_max_attempts,
                self.config.retry_base_delay,
                self.config.retry_max_delay,
            )));
        }

        list
    }
}

impl Default for DefaultInterceptorsBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A default interceptor list with sensible defaults: timeout, circuit
/// breaker, rate limit, and retry, in that order, after the built-in.
pub fn default_interceptors(transport: Arc<dyn Transport>) -> InterceptorList {
    DefaultInterceptorsBuilder::new().build(transport)
}
