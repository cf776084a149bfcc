//! Example rate-limit interceptor (§1 lists rate-limit policies as
//! pipeline *users*, not part of the pipeline itself). Wraps the generic
//! [`crate::rate_limiter::TokenBucket`] rather than re-implementing token
//! accounting: `on_request` blocks (asynchronously) until a token is
//! available, then always calls `handler.next`. It never rejects — a
//! caller that wants a hard cap instead of backpressure should pair this
//! with a short per-request timeout.
//!
//! Wrapping this interceptor in [`crate::interceptors::QueuedInterceptor`]
//! is what turns it from a per-request throttle into the FIFO, globally
//! serialized rate limiter described in §4.8.

use async_trait::async_trait;

use crate::interceptors::handler::RequestHandler;
use crate::interceptors::interceptor::Interceptor;
use crate::rate_limiter::{RateLimiterConfig, TokenBucket};
use crate::types::RequestOptions;

pub struct RateLimitInterceptor {
    bucket: TokenBucket,
}

impl RateLimitInterceptor {
    pub fn new(config: RateLimiterConfig) -> Self {
        Self { bucket: TokenBucket::new(config) }
    }

    /// 60 requests/minute, 60-request burst — a reasonable default for an
    /// HTTP client talking to a single upstream.
    pub fn per_minute(requests_per_minute: u64) -> Self {
        Self::new(RateLimiterConfig {
            requests_per_second: (requests_per_minute / 60).max(1),
            burst_capacity: requests_per_minute.max(1),
            adaptive: false,
            initial_rate: None,
        })
    }
}

impl Default for RateLimitInterceptor {
    fn default() -> Self {
        Self::new(RateLimiterConfig::default())
    }
}

#[async_trait]
impl Interceptor for RateLimitInterceptor {
    async fn on_request(&self, options: RequestOptions, handler: RequestHandler) {
        // `RequestTooLarge` can't occur (we always ask for a single token);
        // any other error means the limiter is disabled, which is also a
        // pass-through.
        let _ = self.bucket.acquire(1).await;
        handler.next(options);
    }

    fn name(&self) -> &str {
        "rate_limit"
    }
}
