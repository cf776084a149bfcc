//! Example circuit breaker interceptor. State machine is unchanged from
//! the pre-pipeline version; only the hook signatures and the fail-fast
//! path (now a `handler.reject`) are adapted to the handler model.

use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::interceptors::handler::{ErrorHandler, RequestHandler, ResponseHandler};
use crate::interceptors::interceptor::Interceptor;
use crate::types::error::ErrorKind;
use crate::types::{PipelineError, RequestOptions, Response};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CircuitState {
    Closed,
    Open,
    HalfOpen,
}

pub struct CircuitBreakerInterceptor {
    failure_threshold: u32,
    recovery_timeout: Duration,
    state: Arc<AtomicU32>,
    failure_count: Arc<AtomicU32>,
    last_failure_time: Arc<AtomicU64>,
}

impl CircuitBreakerInterceptor {
    pub fn new(failure_threshold: u32, recovery_timeout: Duration) -> Self {
        Self {
            failure_threshold,
            recovery_timeout,
            state: Arc::new(AtomicU32::new(0)),
            failure_count: Arc::new(AtomicU32::new(0)),
            last_failure_time: Arc::new(AtomicU64::new(0)),
        }
    }

    fn get_state(&self) -> CircuitState {
        match self.state.load(Ordering::Relaxed) {
            0 => CircuitState::Closed,
            1 => CircuitState::Open,
            _ => CircuitState::HalfOpen,
        }
    }

    fn set_state(&self, state: CircuitState) {
        self.state.store(state as u32, Ordering::Relaxed);
    }

    fn record_success(&self) {
        self.failure_count.store(0, Ordering::Relaxed);
        self.set_state(CircuitState::Closed);
    }

    fn record_failure(&self) {
        let count = self.failure_count.fetch_add(1, Ordering::Relaxed) + 1;
        let now = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_secs();
        self.last_failure_time.store(now, Ordering::Relaxed);
        if count >= self.failure_threshold {
            self.set_state(CircuitState::Open);
        }
    }

    fn should_allow_request(&self) -> bool {
        match self.get_state() {
            CircuitState::Closed | CircuitState::HalfOpen => true,
            CircuitState::Open => {
                let now = std::time::SystemTime::now()
                    .duration_since(std::time::UNIX_EPOCH)
                    .unwrap()
                    .as_secs();
                let last_failure = self.last_failure_time.load(Ordering::Relaxed);
                if now.saturating_sub(last_failure) >= self.recovery_timeout.as_secs() {
                    self.set_state(CircuitState::HalfOpen);
                    true
                } else {
                    false
                }
            }
        }
    }
}

impl Default for CircuitBreakerInterceptor {
    fn default() -> Self {
        Self::new(5, Duration::from_secs(60))
    }
}

#[async_trait]
impl Interceptor for CircuitBreakerInterceptor {
    async fn on_request(&self, options: RequestOptions, handler: RequestHandler) {
        if self.should_allow_request() {
            handler.next(options);
        } else {
            let error = PipelineError::new(Arc::new(options), ErrorKind::ConnectionError)
                .with_message("circuit breaker is open");
            handler.reject(error, false);
        }
    }

    async fn on_response(&self, response: Response, handler: ResponseHandler) {
        self.record_success();
        handler.next(response);
    }

    async fn on_error(&self, error: PipelineError, handler: ErrorHandler) {
        if matches!(error.kind, ErrorKind::ConnectionError | ErrorKind::ConnectionTimeout | ErrorKind::ReceiveTimeout) {
            self.record_failure();
        }
        handler.next(error);
    }

    fn name(&self) -> &str {
        "circuit_breaker"
    }
}
