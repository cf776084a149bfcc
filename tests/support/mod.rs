//! Shared test transport double, reworked from this codebase's earlier
//! `tests/utils/mock_transport.rs` MockTransport for the new `Transport`
//! trait: instead of canned per-method JSON responses, it answers every
//! `send()` call with a pre-built `Response`, optionally failing on the
//! Nth call (1-indexed) to exercise retry/circuit-breaker interceptors.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;

use relay_http::transport::TransportError;
use relay_http::{RequestOptions, Response, Transport};

pub struct MockTransport {
    calls: AtomicUsize,
    fail_until_call: usize,
    status: u16,
    delay: Duration,
}

impl MockTransport {
    pub fn ok() -> Self {
        Self { calls: AtomicUsize::new(0), fail_until_call: 0, status: 200, delay: Duration::ZERO }
    }

    /// Fails every call up to and including `n`, then succeeds.
    pub fn failing_first(n: usize) -> Self {
        Self { calls: AtomicUsize::new(0), fail_until_call: n, status: 200, delay: Duration::ZERO }
    }

    pub fn with_status(status: u16) -> Self {
        Self { calls: AtomicUsize::new(0), fail_until_call: 0, status, delay: Duration::ZERO }
    }

    /// Succeeds, but only after sleeping `delay` — long enough for a
    /// concurrently fired cancellation token to win the race.
    pub fn slow(delay: Duration) -> Self {
        Self { calls: AtomicUsize::new(0), fail_until_call: 0, status: 200, delay }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&self, options: &RequestOptions) -> Result<Response, TransportError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        if call <= self.fail_until_call {
            return Err(TransportError::ConnectTimeout("mock connect timeout".into()));
        }
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        let request = Arc::new(options.clone());
        if !(200..300).contains(&self.status) {
            return Err(TransportError::from_status(self.status, "mock error status".to_string()));
        }
        Ok(Response::new(request, self.status, json!({"ok": true})))
    }
}
