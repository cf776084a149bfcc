//! Queued interceptor scheduling (§4.8): wraps an interceptor so that,
//! across concurrently in-flight requests, only one invocation of this
//! particular interceptor instance runs at a time, in FIFO arrival order.
//!
//! Grounded on the same `tokio::sync::Semaphore` pattern used by
//! [`crate::rate_limiter::backpressure::BackpressureController`]: a
//! single-permit semaphore serializes acquire order, which `tokio::sync`
//! guarantees is FIFO.
//!
//! Simplification: a queued interceptor's ticket is held for the full
//! duration of its hook invocation rather than released the instant its
//! handler is invoked. The common pattern this feature exists for (e.g. a
//! token-refresh interceptor that awaits a refresh call and then calls
//! `handler.next`) has no work after the handler call, so the two
//! granularities coincide in practice; see `DESIGN.md`.

use async_trait::async_trait;
use tokio::sync::Semaphore;

use crate::types::{PipelineError, RequestOptions, Response};

use super::handler::{ErrorHandler, RequestHandler, ResponseHandler};
use super::interceptor::Interceptor;

pub struct QueuedInterceptor<T: Interceptor> {
    inner: T,
    gate: Semaphore,
}

impl<T: Interceptor> QueuedInterceptor<T> {
    pub fn new(inner: T) -> Self {
        Self { inner, gate: Semaphore::new(1) }
    }
}

#[async_trait]
impl<T: Interceptor> Interceptor for QueuedInterceptor<T> {
    async fn on_request(&self, options: RequestOptions, handler: RequestHandler) {
        let _permit = self.gate.acquire().await.expect("queue semaphore is never closed");
        self.inner.on_request(options, handler).await;
    }

    async fn on_response(&self, response: Response, handler: ResponseHandler) {
        let _permit = self.gate.acquire().await.expect("queue semaphore is never closed");
        self.inner.on_response(response, handler).await;
    }

    async fn on_error(&self, error: PipelineError, handler: ErrorHandler) {
        let _permit = self.gate.acquire().await.expect("queue semaphore is never closed");
        self.inner.on_error(error, handler).await;
    }

    fn name(&self) -> &str {
        self.inner.name()
    }
}
