//! Cancellation (§4.7). Generalizes the `CancelHandle`/`oneshot` pattern
//! used for streaming cancellation elsewhere in this codebase: here, a
//! dispatch may be in-flight across many suspension points (each
//! interceptor invocation, the transport call itself), so cancellation is
//! modeled as a shared flag plus a `Notify` rather than a single-fire
//! channel, letting any number of check/await points observe the same
//! signal.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::Notify;

struct Inner {
    cancelled: AtomicBool,
    notify: Notify,
}

/// Consulted by the dispatcher at each suspension point between interceptor
/// invocations and before the transport call. Cloning shares the same
/// underlying signal.
#[derive(Clone)]
pub struct CancellationToken {
    inner: Arc<Inner>,
}

/// The caller-held half; calling `cancel` is the only way to flip the
/// token. Dropping the handle without cancelling leaves the dispatch to
/// run to completion normally.
pub struct CancellationHandle {
    inner: Arc<Inner>,
}

impl CancellationToken {
    pub fn new() -> (CancellationToken, CancellationHandle) {
        let inner = Arc::new(Inner {
            cancelled: AtomicBool::new(false),
            notify: Notify::new(),
        });
        (
            CancellationToken { inner: inner.clone() },
            CancellationHandle { inner },
        )
    }

    pub fn is_cancelled(&self) -> bool {
        self.inner.cancelled.load(Ordering::SeqCst)
    }

    /// Resolves once `cancel` has been called. A dispatch that has already
    /// observed cancellation via `is_cancelled` need not await this.
    pub async fn cancelled(&self) {
        if self.is_cancelled() {
            return;
        }
        let notified = self.inner.notify.notified();
        if self.is_cancelled() {
            return;
        }
        notified.await;
    }
}

impl CancellationHandle {
    pub fn cancel(&self) {
        self.inner.cancelled.store(true, Ordering::SeqCst);
        self.inner.notify.notify_waiters();
    }

    pub fn is_cancelled(&self) -> bool {
        self.inner.cancelled.load(Ordering::SeqCst)
    }
}
